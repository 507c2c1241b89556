use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use super::leaderboard_model::{
    LeaderboardEntry, LeaderboardMetric, LeaderboardScope, LeaderboardUser, MetricTotals,
};
use crate::catalog::Catalog;
use crate::errors::{Result, ValidationError};
use crate::ledger::{LedgerRepositoryTrait, UserAccount};

/// Pull-based state rankings.
///
/// Every call reads a fresh snapshot of accounts, so the output is a pure
/// function of stored state: identical state gives identical output.
pub struct LeaderboardService {
    ledger: Arc<dyn LedgerRepositoryTrait>,
    catalog: Arc<Catalog>,
    top_users: usize,
}

fn user_totals(account: &UserAccount) -> MetricTotals {
    MetricTotals {
        eco_points: account.balance,
        carbon_reduced: account.impact.carbon_reduced,
        water_saved: account.impact.water_saved,
        trees_planted: account.impact.trees_planted,
    }
}

/// Descending by metric, then ascending by `key`.
fn by_metric<'a>(
    metric: LeaderboardMetric,
    a: (&MetricTotals, &'a str),
    b: (&MetricTotals, &'a str),
) -> Ordering {
    b.0.value(metric)
        .cmp(&a.0.value(metric))
        .then_with(|| a.1.cmp(b.1))
}

impl LeaderboardService {
    pub fn new(
        ledger: Arc<dyn LedgerRepositoryTrait>,
        catalog: Arc<Catalog>,
        top_users: usize,
    ) -> Self {
        Self {
            ledger,
            catalog,
            top_users,
        }
    }

    /// Ranks states by `metric`. Ranks run 1..N with ties broken by state
    /// code. A `State` scope returns that state's row with its overall rank.
    pub fn rank(
        &self,
        metric: LeaderboardMetric,
        scope: &LeaderboardScope,
    ) -> Result<Vec<LeaderboardEntry>> {
        let scope_code = match scope {
            LeaderboardScope::AllStates => None,
            LeaderboardScope::State(code) => Some(
                self.catalog
                    .state(code)
                    .map(|s| s.code.clone())
                    .ok_or_else(|| ValidationError::UnknownState(code.clone()))?,
            ),
        };

        let mut by_state: HashMap<String, Vec<UserAccount>> = HashMap::new();
        for account in self.ledger.list_accounts()? {
            let Some(state) = account
                .state_code
                .as_deref()
                .and_then(|code| self.catalog.state(code))
            else {
                continue;
            };
            by_state.entry(state.code.clone()).or_default().push(account);
        }

        let mut entries: Vec<LeaderboardEntry> = self
            .catalog
            .states
            .iter()
            .map(|state| {
                let accounts = by_state.remove(&state.code).unwrap_or_default();
                let mut totals = MetricTotals {
                    eco_points: state.eco_points,
                    carbon_reduced: state.carbon_reduced,
                    water_saved: state.water_saved,
                    trees_planted: state.trees_planted,
                };
                for account in &accounts {
                    totals.add(&user_totals(account));
                }
                LeaderboardEntry {
                    state: state.name.clone(),
                    code: state.code.clone(),
                    population: state.population,
                    totals,
                    rank: 0,
                    top_users: self.top_users_of(metric, &accounts),
                }
            })
            .collect();

        entries.sort_by(|a, b| by_metric(metric, (&a.totals, &a.code), (&b.totals, &b.code)));
        for (i, entry) in entries.iter_mut().enumerate() {
            entry.rank = i as u32 + 1;
        }

        if let Some(code) = scope_code {
            entries.retain(|e| e.code == code);
        }
        Ok(entries)
    }

    fn top_users_of(&self, metric: LeaderboardMetric, accounts: &[UserAccount]) -> Vec<LeaderboardUser> {
        let mut users: Vec<LeaderboardUser> = accounts
            .iter()
            .map(|a| LeaderboardUser {
                user_id: a.id.clone(),
                display_name: a.display_name.clone(),
                level: a.level(),
                totals: user_totals(a),
                rank: 0,
            })
            .collect();
        users.sort_by(|a, b| by_metric(metric, (&a.totals, &a.user_id), (&b.totals, &b.user_id)));
        users.truncate(self.top_users);
        for (i, user) in users.iter_mut().enumerate() {
            user.rank = i as u32 + 1;
        }
        users
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use crate::ledger::{AccountChangeset, ImpactTotals, InMemoryLedgerStore, ProfileUpdate};
    use rust_decimal_macros::dec;

    fn service(store: Arc<InMemoryLedgerStore>) -> LeaderboardService {
        LeaderboardService::new(store, Arc::new(Catalog::seeded()), 3)
    }

    fn join_state(store: &InMemoryLedgerStore, user: &str, code: &str) {
        store
            .commit(AccountChangeset::new(user).profile(ProfileUpdate {
                display_name: None,
                state_code: Some(code.to_string()),
            }))
            .unwrap();
    }

    #[test]
    fn test_baseline_ranking_by_points() {
        let board = service(Arc::new(InMemoryLedgerStore::new(0)))
            .rank(LeaderboardMetric::EcoPoints, &LeaderboardScope::AllStates)
            .unwrap();
        let codes: Vec<&str> = board.iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, vec!["MH", "TN", "KA", "GJ", "UP"]);
        assert_eq!(board.iter().map(|e| e.rank).collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_user_balances_move_state_totals() {
        let store = Arc::new(InMemoryLedgerStore::new(0));
        join_state(&store, "u1", "UP");
        store.apply_delta("u1", 600_000, "bonus").unwrap();

        let board = service(store.clone())
            .rank(LeaderboardMetric::EcoPoints, &LeaderboardScope::AllStates)
            .unwrap();
        assert_eq!(board[0].code, "UP");
        assert_eq!(board[0].totals.eco_points, 1_876_540 + 600_000);
        assert_eq!(board[0].top_users[0].user_id, "u1");
    }

    #[test]
    fn test_ties_broken_by_code_and_output_is_stable() {
        let mut catalog = Catalog::seeded();
        for state in &mut catalog.states {
            state.trees_planted = 7;
        }
        let store = Arc::new(InMemoryLedgerStore::new(0));
        let service = LeaderboardService::new(store, Arc::new(catalog), 3);
        let first = service
            .rank(LeaderboardMetric::TreesPlanted, &LeaderboardScope::AllStates)
            .unwrap();
        let codes: Vec<&str> = first.iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, vec!["GJ", "KA", "MH", "TN", "UP"]);

        let second = service
            .rank(LeaderboardMetric::TreesPlanted, &LeaderboardScope::AllStates)
            .unwrap();
        assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
    }

    #[test]
    fn test_top_users_ordered_and_truncated() {
        let store = Arc::new(InMemoryLedgerStore::new(0));
        for (user, carbon) in [("a", dec!(1)), ("b", dec!(5)), ("c", dec!(5)), ("d", dec!(2))] {
            join_state(&store, user, "KA");
            store
                .commit(AccountChangeset::new(user).impact(ImpactTotals {
                    carbon_reduced: carbon,
                    ..Default::default()
                }))
                .unwrap();
        }
        let board = service(store)
            .rank(
                LeaderboardMetric::CarbonReduced,
                &LeaderboardScope::State("ka".to_string()),
            )
            .unwrap();
        assert_eq!(board.len(), 1);
        let users: Vec<&str> = board[0].top_users.iter().map(|u| u.user_id.as_str()).collect();
        assert_eq!(users, vec!["b", "c", "d"]);
        assert_eq!(board[0].totals.carbon_reduced, dec!(39813));
    }

    #[test]
    fn test_unknown_state_scope() {
        let err = service(Arc::new(InMemoryLedgerStore::new(0)))
            .rank(
                LeaderboardMetric::EcoPoints,
                &LeaderboardScope::State("XX".to_string()),
            )
            .unwrap_err();
        assert!(matches!(err, Error::Validation(ValidationError::UnknownState(_))));
    }

    #[test]
    fn test_metric_parsing_is_closed() {
        assert_eq!(
            "waterSaved".parse::<LeaderboardMetric>().unwrap(),
            LeaderboardMetric::WaterSaved
        );
        let err: Error = "population".parse::<LeaderboardMetric>().unwrap_err().into();
        assert_eq!(err.kind(), "INVALID_METRIC");
    }
}
