//! Ledger domain models.

use std::collections::BTreeSet;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ledger_errors::LedgerError;
use crate::constants::{MAX_IMPACT_PER_RECORD, STARTING_GRANT_REASON, XP_PER_LEVEL};
use crate::errors::{Error, Result, ValidationError};

/// Cumulative environmental impact attributed to an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ImpactTotals {
    /// Kilograms of CO₂ avoided.
    pub carbon_reduced: Decimal,
    /// Litres of water saved.
    pub water_saved: u64,
    pub trees_planted: u64,
}

impl ImpactTotals {
    pub fn is_zero(&self) -> bool {
        self.carbon_reduced.is_zero() && self.water_saved == 0 && self.trees_planted == 0
    }

    /// Checks a single impact record. Each field must lie in
    /// `0..=MAX_IMPACT_PER_RECORD`.
    pub fn validate(&self) -> Result<()> {
        let max = Decimal::from(MAX_IMPACT_PER_RECORD);
        if self.carbon_reduced.is_sign_negative() && !self.carbon_reduced.is_zero() {
            return Err(impact_error("carbonReduced cannot be negative"));
        }
        if self.carbon_reduced > max {
            return Err(impact_error("carbonReduced is too large"));
        }
        if self.water_saved > MAX_IMPACT_PER_RECORD {
            return Err(impact_error("waterSaved is too large"));
        }
        if self.trees_planted > MAX_IMPACT_PER_RECORD {
            return Err(impact_error("treesPlanted is too large"));
        }
        Ok(())
    }

    /// Sum of both totals, or an error if any field would overflow.
    pub fn checked_add(&self, other: &ImpactTotals) -> Result<ImpactTotals> {
        let overflow = || impact_error("impact totals overflow");
        Ok(ImpactTotals {
            carbon_reduced: self
                .carbon_reduced
                .checked_add(other.carbon_reduced)
                .ok_or_else(overflow)?,
            water_saved: self
                .water_saved
                .checked_add(other.water_saved)
                .ok_or_else(overflow)?,
            trees_planted: self
                .trees_planted
                .checked_add(other.trees_planted)
                .ok_or_else(overflow)?,
        })
    }
}

fn impact_error(message: &str) -> Error {
    Error::Validation(ValidationError::InvalidInput(message.to_string()))
}

/// A user's rewards account. Owned by the ledger store and mutated only
/// through [`AccountChangeset`]s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub id: String,
    pub display_name: Option<String>,
    pub state_code: Option<String>,
    /// Spendable EcoPoints. Never negative.
    pub balance: i64,
    /// Sum of every credit ever applied, including the starting grant.
    pub lifetime_earned: i64,
    pub xp: i64,
    pub streak: u32,
    pub last_active_on: Option<NaiveDate>,
    pub badges: BTreeSet<String>,
    pub redeemed_perks: BTreeSet<String>,
    pub claimed_challenges: BTreeSet<String>,
    pub impact: ImpactTotals,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserAccount {
    /// A fresh account holding the starting grant.
    pub fn new(id: &str, starting_grant: i64, now: DateTime<Utc>) -> Self {
        let grant = starting_grant.max(0);
        Self {
            id: id.to_string(),
            display_name: None,
            state_code: None,
            balance: grant,
            lifetime_earned: grant,
            xp: 0,
            streak: 0,
            last_active_on: None,
            badges: BTreeSet::new(),
            redeemed_perks: BTreeSet::new(),
            claimed_challenges: BTreeSet::new(),
            impact: ImpactTotals::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// The ledger entry recording the starting grant, if any.
    pub fn starting_grant_entry(&self, sequence: u64) -> Option<LedgerEntry> {
        (self.balance > 0).then(|| LedgerEntry {
            sequence,
            user_id: self.id.clone(),
            delta: self.balance,
            balance_after: self.balance,
            reason: STARTING_GRANT_REASON.to_string(),
            created_at: self.created_at,
        })
    }

    pub fn level(&self) -> i64 {
        self.xp / XP_PER_LEVEL
    }

    /// Validates `changeset` against this account without mutating it.
    pub fn check(&self, changeset: &AccountChangeset) -> Result<()> {
        if changeset.point_delta != 0 && changeset.reason.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "reason".to_string(),
            )));
        }
        if changeset.xp_delta < 0 {
            return Err(LedgerError::InvalidAmount(changeset.xp_delta).into());
        }
        let new_balance = self
            .balance
            .checked_add(changeset.point_delta)
            .ok_or(LedgerError::InvalidAmount(changeset.point_delta))?;
        if new_balance < 0 {
            return Err(LedgerError::InsufficientFunds {
                required: -changeset.point_delta,
                available: self.balance,
            }
            .into());
        }
        if let Some(badge_id) = &changeset.grant_badge {
            if self.badges.contains(badge_id) {
                return Err(LedgerError::AlreadyUnlocked(badge_id.clone()).into());
            }
        }
        if let Some(redemption) = &changeset.redemption {
            if redemption.user_id != self.id {
                return Err(Error::Unexpected(format!(
                    "Redemption for '{}' applied to account '{}'",
                    redemption.user_id, self.id
                )));
            }
            if self.redeemed_perks.contains(&redemption.perk_id) {
                return Err(LedgerError::AlreadyRedeemed(redemption.perk_id.clone()).into());
            }
        }
        if let Some(challenge_id) = &changeset.challenge_claim {
            if self.claimed_challenges.contains(challenge_id) {
                return Err(LedgerError::ChallengeRewardClaimed(challenge_id.clone()).into());
            }
        }
        if let Some(impact) = &changeset.impact {
            impact.validate()?;
            self.impact.checked_add(impact)?;
        }
        Ok(())
    }

    /// Validates and applies `changeset`. On error the account is untouched.
    pub fn apply(&mut self, changeset: &AccountChangeset, now: DateTime<Utc>) -> Result<()> {
        self.check(changeset)?;
        let impact = match &changeset.impact {
            Some(impact) => Some(self.impact.checked_add(impact)?),
            None => None,
        };

        self.balance += changeset.point_delta;
        if changeset.point_delta > 0 {
            self.lifetime_earned = self.lifetime_earned.saturating_add(changeset.point_delta);
        }
        self.xp = self.xp.saturating_add(changeset.xp_delta);
        if let Some(badge_id) = &changeset.grant_badge {
            self.badges.insert(badge_id.clone());
        }
        if let Some(redemption) = &changeset.redemption {
            self.redeemed_perks.insert(redemption.perk_id.clone());
        }
        if let Some(challenge_id) = &changeset.challenge_claim {
            self.claimed_challenges.insert(challenge_id.clone());
        }
        if let Some(impact) = impact {
            self.impact = impact;
        }
        if let Some(profile) = &changeset.profile {
            if let Some(name) = &profile.display_name {
                self.display_name = Some(name.clone());
            }
            if let Some(code) = &profile.state_code {
                self.state_code = Some(code.clone());
            }
        }
        if let Some(day) = changeset.activity_on {
            self.register_activity(day);
        }
        self.updated_at = now;
        Ok(())
    }

    /// Advances the consecutive-day streak for activity on `day`.
    pub fn register_activity(&mut self, day: NaiveDate) {
        match self.last_active_on {
            Some(last) if day <= last => {}
            Some(last) if last.succ_opt() == Some(day) => {
                self.streak = self.streak.saturating_add(1);
                self.last_active_on = Some(day);
            }
            _ => {
                self.streak = 1;
                self.last_active_on = Some(day);
            }
        }
    }
}

/// Immutable audit record of a balance change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub sequence: u64,
    pub user_id: String,
    pub delta: i64,
    pub balance_after: i64,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

/// Immutable record of a completed perk redemption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Redemption {
    pub code: String,
    pub user_id: String,
    pub perk_id: String,
    pub cost: i64,
    pub sequence: u64,
    pub redeemed_at: DateTime<Utc>,
}

/// At most one per (user, mission, date).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionCompletion {
    pub user_id: String,
    pub mission_id: String,
    pub date: NaiveDate,
    pub points_awarded: i64,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    pub state_code: Option<String>,
}

/// A set of changes applied to one account as a single atomic unit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AccountChangeset {
    pub user_id: String,
    pub point_delta: i64,
    pub reason: String,
    /// Reject the change if a ledger entry with the same reason already exists.
    pub unique_reason: bool,
    pub xp_delta: i64,
    pub grant_badge: Option<String>,
    pub redemption: Option<Redemption>,
    pub mission_completion: Option<MissionCompletion>,
    pub challenge_claim: Option<String>,
    pub impact: Option<ImpactTotals>,
    pub profile: Option<ProfileUpdate>,
    pub activity_on: Option<NaiveDate>,
}

impl AccountChangeset {
    pub fn new(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            ..Default::default()
        }
    }

    /// Credits `amount` points and the same amount of XP.
    pub fn credit(mut self, amount: i64, reason: &str) -> Self {
        self.point_delta = amount;
        self.xp_delta = amount.max(0);
        self.reason = reason.to_string();
        self
    }

    pub fn debit(mut self, amount: i64, reason: &str) -> Self {
        self.point_delta = -amount;
        self.reason = reason.to_string();
        self
    }

    /// Signed adjustment without XP.
    pub fn delta(mut self, delta: i64, reason: &str) -> Self {
        self.point_delta = delta;
        self.reason = reason.to_string();
        self
    }

    pub fn once(mut self) -> Self {
        self.unique_reason = true;
        self
    }

    pub fn grant_badge(mut self, badge_id: &str) -> Self {
        self.grant_badge = Some(badge_id.to_string());
        self
    }

    pub fn redemption(mut self, redemption: Redemption) -> Self {
        self.redemption = Some(redemption);
        self
    }

    pub fn mission_completion(mut self, completion: MissionCompletion) -> Self {
        self.mission_completion = Some(completion);
        self
    }

    pub fn challenge_claim(mut self, challenge_id: &str) -> Self {
        self.challenge_claim = Some(challenge_id.to_string());
        self
    }

    pub fn impact(mut self, impact: ImpactTotals) -> Self {
        self.impact = Some(impact);
        self
    }

    pub fn profile(mut self, profile: ProfileUpdate) -> Self {
        self.profile = Some(profile);
        self
    }

    pub fn activity_on(mut self, day: NaiveDate) -> Self {
        self.activity_on = Some(day);
        self
    }
}

/// Result of committing a changeset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitOutcome {
    pub account: UserAccount,
    /// Present when the changeset moved the balance.
    pub entry: Option<LedgerEntry>,
}
