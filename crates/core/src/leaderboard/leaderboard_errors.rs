use thiserror::Error;

use crate::errors::ErrorClass;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LeaderboardError {
    #[error("Unknown leaderboard metric '{0}'")]
    InvalidMetric(String),
}

impl LeaderboardError {
    pub fn kind(&self) -> &'static str {
        match self {
            LeaderboardError::InvalidMetric(_) => "INVALID_METRIC",
        }
    }

    pub fn class(&self) -> ErrorClass {
        ErrorClass::Validation
    }
}
