use super::challenges_model::{ChallengeState, JoinOutcome};
use crate::errors::Result;

/// Global challenge counters and participant sets.
pub trait ChallengeRepositoryTrait: Send + Sync {
    /// Creates the counters with `initial_progress` if absent. Returns whether
    /// they were created.
    fn seed_challenge(&self, challenge_id: &str, initial_progress: u64) -> Result<bool>;

    fn get_challenge_state(&self, challenge_id: &str) -> Result<Option<ChallengeState>>;

    /// Adds the user to the participant set. Joining twice changes nothing.
    fn add_participant(&self, challenge_id: &str, user_id: &str) -> Result<JoinOutcome>;

    fn is_participant(&self, challenge_id: &str, user_id: &str) -> Result<bool>;

    /// Adds `amount` to the progress counter, clamping the result at `cap`.
    fn add_progress(&self, challenge_id: &str, amount: u64, cap: u64) -> Result<ChallengeState>;
}
