use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};

use super::missions_errors::MissionError;
use super::missions_model::{MissionBoard, MissionProgress};
use crate::catalog::{Catalog, Mission};
use crate::constants::MISSION_REASON_PREFIX;
use crate::errors::Result;
use crate::ledger::{AccountChangeset, LedgerRepositoryTrait, MissionCompletion};

/// Per-day mission state. Missions reset implicitly because completions are
/// keyed by date.
pub struct MissionTracker {
    ledger: Arc<dyn LedgerRepositoryTrait>,
    catalog: Arc<Catalog>,
}

impl MissionTracker {
    pub fn new(ledger: Arc<dyn LedgerRepositoryTrait>, catalog: Arc<Catalog>) -> Self {
        Self { ledger, catalog }
    }

    pub fn mission(&self, mission_id: &str) -> Result<&Mission> {
        self.catalog
            .mission(mission_id)
            .ok_or_else(|| MissionError::MissionNotFound(mission_id.to_string()).into())
    }

    pub fn find_completion(
        &self,
        user_id: &str,
        mission_id: &str,
        date: NaiveDate,
    ) -> Result<Option<MissionCompletion>> {
        self.ledger.find_mission_completion(user_id, mission_id, date)
    }

    /// Changeset recording the completion and crediting the mission reward.
    pub fn completion_changeset(
        &self,
        user_id: &str,
        mission: &Mission,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> AccountChangeset {
        let reason = format!("{}:{}:{}", MISSION_REASON_PREFIX, mission.id, date);
        AccountChangeset::new(user_id)
            .credit(mission.points, &reason)
            .mission_completion(MissionCompletion {
                user_id: user_id.to_string(),
                mission_id: mission.id.clone(),
                date,
                points_awarded: mission.points,
                completed_at: now,
            })
            .activity_on(date)
    }

    pub fn board(&self, user_id: &str, date: NaiveDate) -> Result<MissionBoard> {
        let completions = self.ledger.mission_completions_on(user_id, date)?;
        let missions: Vec<MissionProgress> = self
            .catalog
            .missions
            .iter()
            .map(|m| MissionProgress {
                mission: m.clone(),
                completed: completions.iter().any(|c| c.mission_id == m.id),
            })
            .collect();
        Ok(MissionBoard {
            user_id: user_id.to_string(),
            date,
            completed_count: missions.iter().filter(|m| m.completed).count(),
            total_count: missions.len(),
            points_earned: completions.iter().map(|c| c.points_awarded).sum(),
            missions,
        })
    }

    /// Clears completion records. Points already awarded are kept.
    pub fn reset(&self, user_id: Option<&str>) -> Result<usize> {
        let removed = self.ledger.clear_mission_completions(user_id)?;
        log::info!(
            "Reset {} mission completions for {}",
            removed,
            user_id.unwrap_or("all users")
        );
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use crate::ledger::InMemoryLedgerStore;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn tracker() -> (Arc<InMemoryLedgerStore>, MissionTracker) {
        let store = Arc::new(InMemoryLedgerStore::new(0));
        let tracker = MissionTracker::new(store.clone(), Arc::new(Catalog::seeded()));
        (store, tracker)
    }

    #[test]
    fn test_unknown_mission() {
        let (_store, tracker) = tracker();
        assert!(matches!(
            tracker.mission("42").unwrap_err(),
            Error::Mission(MissionError::MissionNotFound(_))
        ));
    }

    #[test]
    fn test_board_reflects_completions_for_date_only() {
        let (store, tracker) = tracker();
        let m1 = tracker.mission("1").unwrap().clone();
        let m6 = tracker.mission("6").unwrap().clone();
        store
            .commit(tracker.completion_changeset("u", &m1, day(1), Utc::now()))
            .unwrap();
        store
            .commit(tracker.completion_changeset("u", &m6, day(1), Utc::now()))
            .unwrap();

        let board = tracker.board("u", day(1)).unwrap();
        assert_eq!(board.completed_count, 2);
        assert_eq!(board.total_count, 7);
        assert_eq!(board.points_earned, 110);
        assert!(board.missions[0].completed);
        assert!(!board.missions[1].completed);

        assert_eq!(tracker.board("u", day(2)).unwrap().completed_count, 0);
    }

    #[test]
    fn test_reset_keeps_points() {
        let (store, tracker) = tracker();
        let m = tracker.mission("2").unwrap().clone();
        store
            .commit(tracker.completion_changeset("u", &m, day(3), Utc::now()))
            .unwrap();
        assert_eq!(tracker.reset(Some("u")).unwrap(), 1);
        assert!(tracker.find_completion("u", "2", day(3)).unwrap().is_none());
        assert_eq!(store.find_account("u").unwrap().unwrap().balance, 30);
    }
}
