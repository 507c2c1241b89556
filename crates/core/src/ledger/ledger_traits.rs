//! Ledger repository trait.
//!
//! The contract is synchronous: every call either commits completely or leaves
//! the stored account untouched, and never suspends while holding store state.

use chrono::NaiveDate;

use super::ledger_model::{
    AccountChangeset, CommitOutcome, LedgerEntry, MissionCompletion, Redemption, UserAccount,
};
use crate::errors::Result;

/// Durable per-user account state: balances, ledger entries, redemptions,
/// badge ownership and mission completions.
pub trait LedgerRepositoryTrait: Send + Sync {
    /// Returns the account if it exists, without creating it.
    fn find_account(&self, user_id: &str) -> Result<Option<UserAccount>>;

    /// Returns the account, creating it with the starting grant if absent.
    fn get_or_create_account(&self, user_id: &str) -> Result<UserAccount>;

    /// Snapshot of every account. Each account is read atomically.
    fn list_accounts(&self) -> Result<Vec<UserAccount>>;

    /// Atomically validates and applies a changeset to one account.
    ///
    /// Creates the account first if absent. Fails without mutating anything if
    /// the changeset would overdraw the balance, duplicate a badge, redemption,
    /// mission completion or challenge claim, or repeat a `unique_reason` credit.
    fn commit(&self, changeset: AccountChangeset) -> Result<CommitOutcome>;

    /// Applies a signed balance change and returns the new balance.
    ///
    /// Positive deltas also grant the same amount of XP.
    fn apply_delta(&self, user_id: &str, delta: i64, reason: &str) -> Result<i64> {
        let changeset = if delta > 0 {
            AccountChangeset::new(user_id).credit(delta, reason)
        } else {
            AccountChangeset::new(user_id).delta(delta, reason)
        };
        Ok(self.commit(changeset)?.account.balance)
    }

    /// Ledger entries for a user in commit order.
    fn ledger_entries(&self, user_id: &str) -> Result<Vec<LedgerEntry>>;

    /// Whether a ledger entry with exactly this reason exists for the user.
    fn has_ledger_reason(&self, user_id: &str, reason: &str) -> Result<bool>;

    /// Redemptions for a user in commit order.
    fn redemptions(&self, user_id: &str) -> Result<Vec<Redemption>>;

    /// Next value of the store-wide monotonic redemption counter.
    fn next_redemption_sequence(&self) -> Result<u64>;

    fn find_mission_completion(
        &self,
        user_id: &str,
        mission_id: &str,
        date: NaiveDate,
    ) -> Result<Option<MissionCompletion>>;

    fn mission_completions_on(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<MissionCompletion>>;

    /// Deletes mission completion records for one user, or for everyone when
    /// `user_id` is `None`. Awarded points are kept. Returns the number removed.
    fn clear_mission_completions(&self, user_id: Option<&str>) -> Result<usize>;
}
