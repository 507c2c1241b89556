//! Challenges module - time-windowed collective goals.

mod challenges_errors;
mod challenges_model;
mod challenges_service;
mod challenges_traits;

pub use challenges_errors::ChallengeError;
pub use challenges_model::{ChallengeState, ChallengeStatus, ChallengeView, JoinOutcome};
pub use challenges_service::ChallengeTracker;
pub use challenges_traits::ChallengeRepositoryTrait;
