//! Database models for accounts and their audit trail.

use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use rust_decimal::Decimal;

use ecopoints_core::ledger::{
    ImpactTotals, LedgerEntry, MissionCompletion, Redemption, UserAccount,
};

/// Database model for accounts
#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::accounts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AccountDB {
    pub id: String,
    pub display_name: Option<String>,
    pub state_code: Option<String>,
    pub balance: i64,
    pub lifetime_earned: i64,
    pub xp: i64,
    pub streak: i32,
    pub last_active_on: Option<NaiveDate>,
    pub carbon_reduced: String,
    pub water_saved: i64,
    pub trees_planted: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

fn parse_carbon(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap_or_else(|e| {
        log::error!("Failed to parse carbon_reduced '{}': {}", value, e);
        Decimal::ZERO
    })
}

impl AccountDB {
    /// Assembles the domain account from this row and its owned sets.
    pub fn into_account(
        self,
        badges: BTreeSet<String>,
        redeemed_perks: BTreeSet<String>,
        claimed_challenges: BTreeSet<String>,
    ) -> UserAccount {
        UserAccount {
            impact: ImpactTotals {
                carbon_reduced: parse_carbon(&self.carbon_reduced),
                water_saved: self.water_saved.max(0) as u64,
                trees_planted: self.trees_planted.max(0) as u64,
            },
            id: self.id,
            display_name: self.display_name,
            state_code: self.state_code,
            balance: self.balance,
            lifetime_earned: self.lifetime_earned,
            xp: self.xp,
            streak: self.streak.max(0) as u32,
            last_active_on: self.last_active_on,
            badges,
            redeemed_perks,
            claimed_challenges,
            created_at: self.created_at.and_utc(),
            updated_at: self.updated_at.and_utc(),
        }
    }
}

impl From<&UserAccount> for AccountDB {
    fn from(account: &UserAccount) -> Self {
        Self {
            id: account.id.clone(),
            display_name: account.display_name.clone(),
            state_code: account.state_code.clone(),
            balance: account.balance,
            lifetime_earned: account.lifetime_earned,
            xp: account.xp,
            streak: i32::try_from(account.streak).unwrap_or(i32::MAX),
            last_active_on: account.last_active_on,
            carbon_reduced: account.impact.carbon_reduced.to_string(),
            water_saved: i64::try_from(account.impact.water_saved).unwrap_or(i64::MAX),
            trees_planted: i64::try_from(account.impact.trees_planted).unwrap_or(i64::MAX),
            created_at: account.created_at.naive_utc(),
            updated_at: account.updated_at.naive_utc(),
        }
    }
}

#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::account_badges)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AccountBadgeDB {
    pub user_id: String,
    pub badge_id: String,
    pub unlocked_at: NaiveDateTime,
}

#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::account_challenge_claims)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ChallengeClaimDB {
    pub user_id: String,
    pub challenge_id: String,
    pub claimed_at: NaiveDateTime,
}

#[derive(Queryable, Identifiable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::ledger_entries)]
#[diesel(primary_key(sequence))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct LedgerEntryDB {
    pub sequence: i64,
    pub user_id: String,
    pub delta: i64,
    pub balance_after: i64,
    pub reason: String,
    pub created_at: NaiveDateTime,
}

/// Sequence is assigned by SQLite on insert.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::ledger_entries)]
pub struct NewLedgerEntryDB {
    pub user_id: String,
    pub delta: i64,
    pub balance_after: i64,
    pub reason: String,
    pub created_at: NaiveDateTime,
}

impl From<LedgerEntryDB> for LedgerEntry {
    fn from(db: LedgerEntryDB) -> Self {
        Self {
            sequence: db.sequence.max(0) as u64,
            user_id: db.user_id,
            delta: db.delta,
            balance_after: db.balance_after,
            reason: db.reason,
            created_at: db.created_at.and_utc(),
        }
    }
}

#[derive(Queryable, Identifiable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::redemptions)]
#[diesel(primary_key(code))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RedemptionDB {
    pub code: String,
    pub user_id: String,
    pub perk_id: String,
    pub cost: i64,
    pub sequence: i64,
    pub redeemed_at: NaiveDateTime,
}

impl From<RedemptionDB> for Redemption {
    fn from(db: RedemptionDB) -> Self {
        Self {
            code: db.code,
            user_id: db.user_id,
            perk_id: db.perk_id,
            cost: db.cost,
            sequence: db.sequence.max(0) as u64,
            redeemed_at: db.redeemed_at.and_utc(),
        }
    }
}

impl From<&Redemption> for RedemptionDB {
    fn from(redemption: &Redemption) -> Self {
        Self {
            code: redemption.code.clone(),
            user_id: redemption.user_id.clone(),
            perk_id: redemption.perk_id.clone(),
            cost: redemption.cost,
            sequence: i64::try_from(redemption.sequence).unwrap_or(i64::MAX),
            redeemed_at: redemption.redeemed_at.naive_utc(),
        }
    }
}

#[derive(Queryable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::mission_completions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct MissionCompletionDB {
    pub user_id: String,
    pub mission_id: String,
    pub completed_on: NaiveDate,
    pub points_awarded: i64,
    pub completed_at: NaiveDateTime,
}

impl From<MissionCompletionDB> for MissionCompletion {
    fn from(db: MissionCompletionDB) -> Self {
        Self {
            user_id: db.user_id,
            mission_id: db.mission_id,
            date: db.completed_on,
            points_awarded: db.points_awarded,
            completed_at: db.completed_at.and_utc(),
        }
    }
}

impl From<&MissionCompletion> for MissionCompletionDB {
    fn from(completion: &MissionCompletion) -> Self {
        Self {
            user_id: completion.user_id.clone(),
            mission_id: completion.mission_id.clone(),
            completed_on: completion.date,
            points_awarded: completion.points_awarded,
            completed_at: completion.completed_at.naive_utc(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    #[test]
    fn test_account_row_round_trip_keeps_impact_and_streak() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 4, 30, 0).unwrap();
        let mut account = UserAccount::new("alice", 15_680, now);
        account.streak = 4;
        account.impact.carbon_reduced = dec!(12.75);
        account.impact.water_saved = 300;
        account.badges.insert("1".to_string());

        let row = AccountDB::from(&account);
        assert_eq!(row.carbon_reduced, "12.75");

        let restored = row.into_account(
            account.badges.clone(),
            BTreeSet::new(),
            BTreeSet::new(),
        );
        assert_eq!(restored, account);
    }

    #[test]
    fn test_unparseable_carbon_falls_back_to_zero() {
        assert_eq!(parse_carbon("lots"), Decimal::ZERO);
    }
}
