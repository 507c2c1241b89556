use thiserror::Error;

use super::challenges_model::ChallengeStatus;
use crate::errors::ErrorClass;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChallengeError {
    #[error("Challenge '{0}' not found")]
    ChallengeNotFound(String),

    #[error("Challenge '{id}' is {status}")]
    ChallengeNotActive { id: String, status: ChallengeStatus },

    #[error("Challenge '{0}' has not reached its target")]
    ChallengeNotCompleted(String),

    #[error("User has not joined challenge '{0}'")]
    NotParticipant(String),
}

impl ChallengeError {
    pub fn kind(&self) -> &'static str {
        match self {
            ChallengeError::ChallengeNotFound(_) => "CHALLENGE_NOT_FOUND",
            ChallengeError::ChallengeNotActive { .. } => "CHALLENGE_NOT_ACTIVE",
            ChallengeError::ChallengeNotCompleted(_) => "CHALLENGE_NOT_COMPLETED",
            ChallengeError::NotParticipant(_) => "NOT_PARTICIPANT",
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            ChallengeError::ChallengeNotFound(_) => ErrorClass::NotFound,
            _ => ErrorClass::Conflict,
        }
    }
}
