//! RewardEngine service trait.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::rewards_model::{
    AccountSummary, BadgeCollection, BadgeUnlock, BalanceUpdate, ChallengeClaim, PerkListing,
    RedemptionReceipt,
};
use crate::challenges::{ChallengeView, JoinOutcome};
use crate::eco_meter::{FootprintInput, FootprintSubmission};
use crate::errors::Result;
use crate::ledger::{ImpactTotals, LedgerEntry, ProfileUpdate, Redemption};
use crate::missions::{MissionBoard, MissionOutcome};

/// Point-earning and point-spending operations.
///
/// Every mutation on an account is serialized per user and either applies
/// completely or not at all. Dates default to today in the platform timezone.
#[async_trait]
pub trait RewardServiceTrait: Send + Sync {
    /// Returns the account, creating it with the starting grant if needed.
    async fn get_account(&self, user_id: &str) -> Result<AccountSummary>;

    async fn update_profile(&self, user_id: &str, update: ProfileUpdate) -> Result<AccountSummary>;

    /// Credits a non-negative amount tagged with `reason`.
    async fn award_points(&self, user_id: &str, amount: i64, reason: &str) -> Result<BalanceUpdate>;

    async fn redeem_perk(&self, user_id: &str, perk_id: &str) -> Result<RedemptionReceipt>;

    /// Grants a badge. Unlocking an owned badge fails with `AlreadyUnlocked`.
    async fn unlock_badge(&self, user_id: &str, badge_id: &str) -> Result<BadgeUnlock>;

    /// Completes a mission for a date. Repeats return the existing completion
    /// with 0 points earned.
    async fn complete_mission(
        &self,
        user_id: &str,
        mission_id: &str,
        date: Option<NaiveDate>,
    ) -> Result<MissionOutcome>;

    /// Clears mission completion records for one user or for everyone.
    async fn reset_missions(&self, user_id: Option<&str>) -> Result<usize>;

    async fn join_challenge(&self, user_id: &str, challenge_id: &str) -> Result<JoinOutcome>;

    async fn contribute_to_challenge(&self, challenge_id: &str, amount: i64)
        -> Result<ChallengeView>;

    /// Credits a completed challenge's reward to a participant, once.
    async fn claim_challenge_reward(&self, user_id: &str, challenge_id: &str)
        -> Result<ChallengeClaim>;

    async fn record_impact(&self, user_id: &str, impact: ImpactTotals) -> Result<AccountSummary>;

    /// Assesses a footprint and credits its points at most once per date.
    async fn submit_footprint(
        &self,
        user_id: &str,
        input: FootprintInput,
        date: Option<NaiveDate>,
    ) -> Result<FootprintSubmission>;

    fn list_perks(&self, user_id: &str) -> Result<Vec<PerkListing>>;

    fn list_badges(&self, user_id: &str) -> Result<BadgeCollection>;

    fn mission_board(&self, user_id: &str, date: Option<NaiveDate>) -> Result<MissionBoard>;

    fn list_challenges(&self, user_id: Option<&str>) -> Result<Vec<ChallengeView>>;

    fn ledger_history(&self, user_id: &str) -> Result<Vec<LedgerEntry>>;

    fn redemptions(&self, user_id: &str) -> Result<Vec<Redemption>>;
}
