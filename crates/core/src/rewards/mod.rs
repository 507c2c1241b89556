//! Rewards module - the RewardEngine orchestrating earning and spending.

mod rewards_errors;
mod rewards_model;
mod rewards_service;
mod rewards_traits;

#[cfg(test)]
mod rewards_service_tests;

pub use rewards_errors::RewardError;
pub use rewards_model::{
    redemption_code, AccountSummary, BadgeCollection, BadgeListing, BadgeUnlock, BalanceUpdate,
    ChallengeClaim, PerkListing, RedemptionReceipt,
};
pub use rewards_service::RewardService;
pub use rewards_traits::RewardServiceTrait;
