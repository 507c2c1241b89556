use chrono::NaiveDate;
use thiserror::Error;

use crate::errors::ErrorClass;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RewardError {
    #[error("Badge '{0}' not found")]
    BadgeNotFound(String),

    #[error("Activity date {date} is outside the accepted range ending {today}")]
    InvalidActivityDate { date: NaiveDate, today: NaiveDate },
}

impl RewardError {
    pub fn kind(&self) -> &'static str {
        match self {
            RewardError::BadgeNotFound(_) => "BADGE_NOT_FOUND",
            RewardError::InvalidActivityDate { .. } => "INVALID_ACTIVITY_DATE",
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            RewardError::BadgeNotFound(_) => ErrorClass::NotFound,
            RewardError::InvalidActivityDate { .. } => ErrorClass::Validation,
        }
    }
}
