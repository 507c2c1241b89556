//! Domain event types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Domain events emitted by core services after successful mutations.
///
/// These events represent facts that already happened. Runtime adapters
/// translate them into notifications, logs or cache invalidation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// Points were credited to an account.
    PointsAwarded {
        user_id: String,
        amount: i64,
        reason: String,
        balance: i64,
    },

    /// A perk was redeemed and paid for.
    PerkRedeemed {
        user_id: String,
        perk_id: String,
        code: String,
        cost: i64,
        balance: i64,
    },

    BadgeUnlocked { user_id: String, badge_id: String },

    /// A mission was completed for the first time on `date`.
    MissionCompleted {
        user_id: String,
        mission_id: String,
        date: NaiveDate,
        points: i64,
    },

    /// Mission completion records were cleared. `user_id` is `None` for all users.
    MissionsReset {
        user_id: Option<String>,
        removed: usize,
    },

    /// A user joined a challenge for the first time.
    ChallengeJoined {
        user_id: String,
        challenge_id: String,
        participants: u64,
    },

    ChallengeProgressed {
        challenge_id: String,
        progress: u64,
        target: u64,
    },

    ChallengeRewardClaimed {
        user_id: String,
        challenge_id: String,
        reward: i64,
    },
}

impl DomainEvent {
    pub fn points_awarded(user_id: &str, amount: i64, reason: &str, balance: i64) -> Self {
        Self::PointsAwarded {
            user_id: user_id.to_string(),
            amount,
            reason: reason.to_string(),
            balance,
        }
    }

    pub fn perk_redeemed(user_id: &str, perk_id: &str, code: &str, cost: i64, balance: i64) -> Self {
        Self::PerkRedeemed {
            user_id: user_id.to_string(),
            perk_id: perk_id.to_string(),
            code: code.to_string(),
            cost,
            balance,
        }
    }

    pub fn badge_unlocked(user_id: &str, badge_id: &str) -> Self {
        Self::BadgeUnlocked {
            user_id: user_id.to_string(),
            badge_id: badge_id.to_string(),
        }
    }

    pub fn mission_completed(user_id: &str, mission_id: &str, date: NaiveDate, points: i64) -> Self {
        Self::MissionCompleted {
            user_id: user_id.to_string(),
            mission_id: mission_id.to_string(),
            date,
            points,
        }
    }

    pub fn missions_reset(user_id: Option<&str>, removed: usize) -> Self {
        Self::MissionsReset {
            user_id: user_id.map(str::to_string),
            removed,
        }
    }

    pub fn challenge_joined(user_id: &str, challenge_id: &str, participants: u64) -> Self {
        Self::ChallengeJoined {
            user_id: user_id.to_string(),
            challenge_id: challenge_id.to_string(),
            participants,
        }
    }

    pub fn challenge_progressed(challenge_id: &str, progress: u64, target: u64) -> Self {
        Self::ChallengeProgressed {
            challenge_id: challenge_id.to_string(),
            progress,
            target,
        }
    }

    pub fn challenge_reward_claimed(user_id: &str, challenge_id: &str, reward: i64) -> Self {
        Self::ChallengeRewardClaimed {
            user_id: user_id.to_string(),
            challenge_id: challenge_id.to_string(),
            reward,
        }
    }

    /// Short snake_case name of the event, matching its serialized tag.
    pub fn name(&self) -> &'static str {
        match self {
            DomainEvent::PointsAwarded { .. } => "points_awarded",
            DomainEvent::PerkRedeemed { .. } => "perk_redeemed",
            DomainEvent::BadgeUnlocked { .. } => "badge_unlocked",
            DomainEvent::MissionCompleted { .. } => "mission_completed",
            DomainEvent::MissionsReset { .. } => "missions_reset",
            DomainEvent::ChallengeJoined { .. } => "challenge_joined",
            DomainEvent::ChallengeProgressed { .. } => "challenge_progressed",
            DomainEvent::ChallengeRewardClaimed { .. } => "challenge_reward_claimed",
        }
    }
}
