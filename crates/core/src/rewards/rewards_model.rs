use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::catalog::{Badge, Perk};
use crate::constants::REDEMPTION_CODE_PREFIX;
use crate::ledger::UserAccount;

/// Builds the redemption code for the `sequence`-th redemption.
///
/// The store-issued sequence makes codes unique; the digest suffix makes them
/// hard to guess.
pub fn redemption_code(user_id: &str, perk_id: &str, sequence: u64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(user_id.as_bytes());
    hasher.update([0u8]);
    hasher.update(perk_id.as_bytes());
    hasher.update([0u8]);
    hasher.update(sequence.to_be_bytes());
    let digest = hex::encode(hasher.finalize());
    format!(
        "{}-{}-{:06}-{}",
        REDEMPTION_CODE_PREFIX,
        perk_id.to_uppercase(),
        sequence,
        &digest[..8]
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountSummary {
    #[serde(flatten)]
    pub account: UserAccount,
    pub level: i64,
}

impl From<UserAccount> for AccountSummary {
    fn from(account: UserAccount) -> Self {
        Self {
            level: account.level(),
            account,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceUpdate {
    pub user_id: String,
    pub balance: i64,
    pub xp: i64,
    pub level: i64,
}

impl From<&UserAccount> for BalanceUpdate {
    fn from(account: &UserAccount) -> Self {
        Self {
            user_id: account.id.clone(),
            balance: account.balance,
            xp: account.xp,
            level: account.level(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedemptionReceipt {
    pub code: String,
    pub perk_id: String,
    pub cost: i64,
    pub balance: i64,
    /// `None` for unlimited perks.
    pub remaining_stock: Option<u32>,
    pub redeemed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeUnlock {
    pub badge: Badge,
    pub unlocked_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeListing {
    #[serde(flatten)]
    pub badge: Badge,
    pub unlocked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeCollection {
    pub badges: Vec<BadgeListing>,
    pub unlocked_count: usize,
    pub total_count: usize,
}

/// A perk as seen by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerkListing {
    #[serde(flatten)]
    pub perk: Perk,
    pub remaining_stock: Option<u32>,
    pub available: bool,
    pub already_redeemed: bool,
    /// Available, not yet redeemed and affordable.
    pub can_redeem: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeClaim {
    pub challenge_id: String,
    /// 0 when the reward had already been claimed.
    pub points_credited: i64,
    pub balance: i64,
}
