use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{Challenge, ChallengeType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeStatus {
    Upcoming,
    Active,
    Completed,
}

impl fmt::Display for ChallengeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChallengeStatus::Upcoming => "upcoming",
            ChallengeStatus::Active => "active",
            ChallengeStatus::Completed => "completed",
        };
        f.write_str(s)
    }
}

/// Stored counters of a challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeState {
    /// Global progress, never above the challenge target.
    pub progress: u64,
    /// Number of distinct users who joined.
    pub participants: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinOutcome {
    /// False when the user had already joined.
    pub joined: bool,
    pub participants: u64,
}

/// A challenge with its live status and counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeView {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "type")]
    pub challenge_type: ChallengeType,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub target: u64,
    pub progress: u64,
    pub participants: u64,
    pub reward: i64,
    pub status: ChallengeStatus,
    /// Whether the requesting user has joined, when a user was given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub joined: Option<bool>,
}

impl ChallengeView {
    pub fn new(
        challenge: &Challenge,
        window: (DateTime<Utc>, DateTime<Utc>),
        state: ChallengeState,
        status: ChallengeStatus,
    ) -> Self {
        Self {
            id: challenge.id.clone(),
            title: challenge.title.clone(),
            description: challenge.description.clone(),
            challenge_type: challenge.challenge_type,
            starts_at: window.0,
            ends_at: window.1,
            target: challenge.target,
            progress: state.progress.min(challenge.target),
            participants: state.participants,
            reward: challenge.reward,
            status,
            joined: None,
        }
    }
}
