//! Property-based integration tests for the rewards ledger.
//!
//! Random operation sequences must never drive a balance or a perk's stock
//! below zero, and the ledger must always account for every balance change.

use std::sync::Arc;

use chrono::{NaiveDate, TimeZone, Utc};
use ecopoints_core::catalog::Catalog;
use ecopoints_core::events::NoOpDomainEventSink;
use ecopoints_core::inventory::{StockLevel, StockRepositoryTrait};
use ecopoints_core::leaderboard::{LeaderboardMetric, LeaderboardScope, LeaderboardService};
use ecopoints_core::ledger::{InMemoryLedgerStore, LedgerRepositoryTrait, ProfileUpdate};
use ecopoints_core::rewards::{RewardService, RewardServiceTrait};
use ecopoints_core::utils::FixedClock;
use ecopoints_core::RewardsConfig;
use proptest::prelude::*;

// =============================================================================
// Generators
// =============================================================================

#[derive(Debug, Clone)]
enum Op {
    Award { user: usize, amount: i64 },
    Delta { user: usize, delta: i64 },
    Redeem { user: usize, perk: usize },
    Mission { user: usize, mission: usize, day: u32 },
    Profile { user: usize, state: usize },
}

const USERS: [&str; 4] = ["asha", "ravi", "meera", "kabir"];
const PERKS: [&str; 4] = ["1", "2", "3", "4"];
const STATES: [&str; 5] = ["MH", "TN", "KA", "GJ", "UP"];

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..USERS.len(), -50i64..5_000).prop_map(|(user, amount)| Op::Award { user, amount }),
        (0..USERS.len(), -20_000i64..2_000).prop_map(|(user, delta)| Op::Delta { user, delta }),
        (0..USERS.len(), 0..PERKS.len()).prop_map(|(user, perk)| Op::Redeem { user, perk }),
        (0..USERS.len(), 1usize..=7, 9u32..=15)
            .prop_map(|(user, mission, day)| Op::Mission { user, mission, day }),
        (0..USERS.len(), 0..STATES.len()).prop_map(|(user, state)| Op::Profile { user, state }),
    ]
}

/// Catalog with small stocks so that exhaustion is actually reached.
fn arb_catalog() -> impl Strategy<Value = Catalog> {
    (
        proptest::collection::vec(0u32..4, 4),
        proptest::collection::vec(100i64..8_000, 4),
    )
        .prop_map(|(stocks, costs)| {
            let mut catalog = Catalog::seeded();
            for ((perk, stock), cost) in catalog.perks.iter_mut().zip(stocks).zip(costs) {
                perk.initial_stock = Some(stock);
                perk.points_cost = cost;
            }
            catalog
        })
}

fn service_for(catalog: Catalog, grant: i64) -> (Arc<InMemoryLedgerStore>, RewardService) {
    let clock = Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2024, 3, 15, 6, 0, 0).unwrap(),
    ));
    let store = Arc::new(InMemoryLedgerStore::with_clock(grant, clock.clone()));
    let service = RewardService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        Arc::new(catalog),
        Arc::new(NoOpDomainEventSink),
        clock,
        RewardsConfig {
            starting_grant: grant,
            ..RewardsConfig::default()
        },
    );
    service.initialize().unwrap();
    (store, service)
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Balances stay non-negative, stock stays non-negative, redemptions per
    /// perk never exceed the initial stock, and the ledger explains every balance.
    #[test]
    fn prop_invariants_hold_for_any_operation_sequence(
        catalog in arb_catalog(),
        grant in 0i64..20_000,
        ops in proptest::collection::vec(arb_op(), 1..60),
    ) {
        let initial: Vec<Option<u32>> = catalog.perks.iter().map(|p| p.initial_stock).collect();
        let (store, service) = service_for(catalog, grant);
        let rt = runtime();

        rt.block_on(async {
            for op in &ops {
                // Individual operations may legitimately fail.
                let _ = match op {
                    Op::Award { user, amount } => service
                        .award_points(USERS[*user], *amount, "prop")
                        .await
                        .map(|_| ()),
                    Op::Delta { user, delta } => store
                        .apply_delta(USERS[*user], *delta, "adjustment")
                        .map(|_| ()),
                    Op::Redeem { user, perk } => service
                        .redeem_perk(USERS[*user], PERKS[*perk])
                        .await
                        .map(|_| ()),
                    Op::Mission { user, mission, day } => service
                        .complete_mission(
                            USERS[*user],
                            &mission.to_string(),
                            NaiveDate::from_ymd_opt(2024, 3, *day),
                        )
                        .await
                        .map(|_| ()),
                    Op::Profile { user, state } => service
                        .update_profile(
                            USERS[*user],
                            ProfileUpdate {
                                display_name: None,
                                state_code: Some(STATES[*state].to_string()),
                            },
                        )
                        .await
                        .map(|_| ()),
                };
            }
        });

        for account in store.list_accounts().unwrap() {
            prop_assert!(account.balance >= 0);
            let entries = store.ledger_entries(&account.id).unwrap();
            let sum: i64 = entries.iter().map(|e| e.delta).sum();
            prop_assert_eq!(sum, account.balance);
            prop_assert!(entries.iter().all(|e| e.balance_after >= 0));
            prop_assert_eq!(entries.last().map(|e| e.balance_after).unwrap_or(0), account.balance);
        }

        for (perk_id, initial) in PERKS.iter().zip(initial) {
            let redeemed = store
                .list_accounts()
                .unwrap()
                .iter()
                .filter(|a| a.redeemed_perks.contains(*perk_id))
                .count() as u32;
            if let Some(StockLevel::Limited(left)) = store.get_stock(perk_id).unwrap() {
                let initial = initial.unwrap_or(0);
                prop_assert!(redeemed <= initial);
                prop_assert_eq!(left + redeemed, initial);
            }
        }
    }

    /// The leaderboard is a pure function of stored state.
    #[test]
    fn prop_leaderboard_is_deterministic(
        ops in proptest::collection::vec(arb_op(), 1..40),
        metric in prop_oneof![
            Just(LeaderboardMetric::EcoPoints),
            Just(LeaderboardMetric::CarbonReduced),
            Just(LeaderboardMetric::WaterSaved),
            Just(LeaderboardMetric::TreesPlanted),
        ],
    ) {
        let (store, service) = service_for(Catalog::seeded(), 1_000);
        let rt = runtime();
        rt.block_on(async {
            for op in &ops {
                let _ = match op {
                    Op::Award { user, amount } => service
                        .award_points(USERS[*user], *amount, "prop")
                        .await
                        .map(|_| ()),
                    Op::Profile { user, state } => service
                        .update_profile(
                            USERS[*user],
                            ProfileUpdate {
                                display_name: None,
                                state_code: Some(STATES[*state].to_string()),
                            },
                        )
                        .await
                        .map(|_| ()),
                    _ => Ok(()),
                };
            }
        });

        let leaderboard = LeaderboardService::new(store, Arc::new(Catalog::seeded()), 3);
        let first = leaderboard.rank(metric, &LeaderboardScope::AllStates).unwrap();
        let second = leaderboard.rank(metric, &LeaderboardScope::AllStates).unwrap();
        prop_assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
        let ranks: Vec<u32> = first.iter().map(|e| e.rank).collect();
        prop_assert_eq!(ranks, (1..=first.len() as u32).collect::<Vec<_>>());
    }
}
