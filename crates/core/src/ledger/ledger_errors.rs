use chrono::NaiveDate;
use thiserror::Error;

use crate::errors::ErrorClass;

/// Invariant violations detected while applying a change to an account.
///
/// Every variant is raised before any field of the account is touched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Insufficient EcoPoints: {required} required, {available} available")]
    InsufficientFunds { required: i64, available: i64 },

    #[error("Invalid amount {0}")]
    InvalidAmount(i64),

    #[error("Perk '{0}' already redeemed")]
    AlreadyRedeemed(String),

    #[error("Badge '{0}' already unlocked")]
    AlreadyUnlocked(String),

    #[error("Mission '{mission_id}' already completed on {date}")]
    MissionAlreadyCompleted { mission_id: String, date: NaiveDate },

    #[error("Reward for challenge '{0}' already claimed")]
    ChallengeRewardClaimed(String),

    #[error("Credit '{0}' was already applied")]
    DuplicateCredit(String),
}

impl LedgerError {
    pub fn kind(&self) -> &'static str {
        match self {
            LedgerError::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            LedgerError::InvalidAmount(_) => "INVALID_AMOUNT",
            LedgerError::AlreadyRedeemed(_) => "ALREADY_REDEEMED",
            LedgerError::AlreadyUnlocked(_) => "ALREADY_UNLOCKED",
            LedgerError::MissionAlreadyCompleted { .. } => "MISSION_ALREADY_COMPLETED",
            LedgerError::ChallengeRewardClaimed(_) => "CHALLENGE_REWARD_CLAIMED",
            LedgerError::DuplicateCredit(_) => "DUPLICATE_CREDIT",
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            LedgerError::InvalidAmount(_) => ErrorClass::Validation,
            _ => ErrorClass::Conflict,
        }
    }
}
