use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::catalog::Mission;
use crate::ledger::MissionCompletion;

/// Result of a mission completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionOutcome {
    pub completion: MissionCompletion,
    /// Points credited by this call; 0 when the mission was already completed.
    pub points_earned: i64,
    pub already_completed: bool,
    pub balance: i64,
    pub streak: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionProgress {
    #[serde(flatten)]
    pub mission: Mission,
    pub completed: bool,
}

/// A user's daily missions for one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionBoard {
    pub user_id: String,
    pub date: NaiveDate,
    pub missions: Vec<MissionProgress>,
    pub completed_count: usize,
    pub total_count: usize,
    pub points_earned: i64,
}
