//! SQLite storage implementation for collective challenges.

mod model;
mod repository;

pub use model::{ChallengeDB, ChallengeParticipantDB};
pub use repository::ChallengeRepository;
