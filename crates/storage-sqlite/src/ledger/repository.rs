use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use diesel::SqliteConnection;

use ecopoints_core::ledger::{
    AccountChangeset, CommitOutcome, LedgerEntry, LedgerError, LedgerRepositoryTrait,
    MissionCompletion, Redemption, UserAccount,
};
use ecopoints_core::utils::{Clock, SystemClock};
use ecopoints_core::{Error, Result};

use super::model::{
    AccountBadgeDB, AccountDB, ChallengeClaimDB, LedgerEntryDB, MissionCompletionDB,
    NewLedgerEntryDB, RedemptionDB,
};
use crate::db::{get_connection, write_transaction, DbPool};
use crate::errors::{IntoCore, StorageError};
use crate::schema::{
    account_badges, account_challenge_claims, accounts, counters, ledger_entries,
    mission_completions, redemptions,
};

const REDEMPTION_COUNTER: &str = "redemption_sequence";

/// SQLite-backed ledger. Every commit runs in a single `BEGIN IMMEDIATE`
/// transaction, so concurrent writers to the same database serialize.
pub struct LedgerRepository {
    pool: Arc<DbPool>,
    starting_grant: i64,
    clock: Arc<dyn Clock>,
}

impl LedgerRepository {
    pub fn new(pool: Arc<DbPool>, starting_grant: i64) -> Self {
        Self::with_clock(pool, starting_grant, Arc::new(SystemClock))
    }

    pub fn with_clock(pool: Arc<DbPool>, starting_grant: i64, clock: Arc<dyn Clock>) -> Self {
        LedgerRepository {
            pool,
            starting_grant,
            clock,
        }
    }

    fn create_account(
        &self,
        conn: &mut SqliteConnection,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> QueryResult<UserAccount> {
        let account = UserAccount::new(user_id, self.starting_grant, now);
        diesel::insert_into(accounts::table)
            .values(AccountDB::from(&account))
            .execute(conn)?;
        if let Some(grant) = account.starting_grant_entry(0) {
            insert_entry(conn, &grant)?;
        }
        log::debug!("Created account {} with {} points", user_id, account.balance);
        Ok(account)
    }

    fn load_or_create(
        &self,
        conn: &mut SqliteConnection,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> QueryResult<UserAccount> {
        match load_account(conn, user_id)? {
            Some(account) => Ok(account),
            None => self.create_account(conn, user_id, now),
        }
    }
}

fn load_account(conn: &mut SqliteConnection, user_id: &str) -> QueryResult<Option<UserAccount>> {
    let Some(row) = accounts::table
        .find(user_id)
        .select(AccountDB::as_select())
        .first(conn)
        .optional()?
    else {
        return Ok(None);
    };

    let badges: BTreeSet<String> = account_badges::table
        .filter(account_badges::user_id.eq(user_id))
        .select(account_badges::badge_id)
        .load::<String>(conn)?
        .into_iter()
        .collect();
    let perks: BTreeSet<String> = redemptions::table
        .filter(redemptions::user_id.eq(user_id))
        .select(redemptions::perk_id)
        .load::<String>(conn)?
        .into_iter()
        .collect();
    let claims: BTreeSet<String> = account_challenge_claims::table
        .filter(account_challenge_claims::user_id.eq(user_id))
        .select(account_challenge_claims::challenge_id)
        .load::<String>(conn)?
        .into_iter()
        .collect();

    Ok(Some(row.into_account(badges, perks, claims)))
}

fn insert_entry(conn: &mut SqliteConnection, entry: &LedgerEntry) -> QueryResult<LedgerEntry> {
    let row = NewLedgerEntryDB {
        user_id: entry.user_id.clone(),
        delta: entry.delta,
        balance_after: entry.balance_after,
        reason: entry.reason.clone(),
        created_at: entry.created_at.naive_utc(),
    };
    diesel::insert_into(ledger_entries::table)
        .values(&row)
        .returning(LedgerEntryDB::as_returning())
        .get_result(conn)
        .map(LedgerEntry::from)
}

fn reason_exists(conn: &mut SqliteConnection, user_id: &str, reason: &str) -> QueryResult<bool> {
    diesel::select(diesel::dsl::exists(
        ledger_entries::table
            .filter(ledger_entries::user_id.eq(user_id))
            .filter(ledger_entries::reason.eq(reason)),
    ))
    .get_result(conn)
}

fn group_by_user(rows: Vec<(String, String)>) -> HashMap<String, BTreeSet<String>> {
    let mut grouped: HashMap<String, BTreeSet<String>> = HashMap::new();
    for (user_id, value) in rows {
        grouped.entry(user_id).or_default().insert(value);
    }
    grouped
}

impl LedgerRepositoryTrait for LedgerRepository {
    fn find_account(&self, user_id: &str) -> Result<Option<UserAccount>> {
        let mut conn = get_connection(&self.pool)?;
        load_account(&mut conn, user_id).into_core()
    }

    fn get_or_create_account(&self, user_id: &str) -> Result<UserAccount> {
        if let Some(account) = self.find_account(user_id)? {
            return Ok(account);
        }
        let now = self.clock.now();
        write_transaction(&self.pool, |conn| {
            Ok(self.load_or_create(conn, user_id, now)?)
        })
    }

    fn list_accounts(&self) -> Result<Vec<UserAccount>> {
        let mut conn = get_connection(&self.pool)?;
        conn.transaction::<_, StorageError, _>(|conn| {
            let rows = accounts::table
                .select(AccountDB::as_select())
                .order(accounts::id.asc())
                .load::<AccountDB>(conn)?;
            let mut badges = group_by_user(
                account_badges::table
                    .select((account_badges::user_id, account_badges::badge_id))
                    .load(conn)?,
            );
            let mut perks = group_by_user(
                redemptions::table
                    .select((redemptions::user_id, redemptions::perk_id))
                    .load(conn)?,
            );
            let mut claims = group_by_user(
                account_challenge_claims::table
                    .select((
                        account_challenge_claims::user_id,
                        account_challenge_claims::challenge_id,
                    ))
                    .load(conn)?,
            );

            Ok(rows
                .into_iter()
                .map(|row| {
                    let id = row.id.clone();
                    row.into_account(
                        badges.remove(&id).unwrap_or_default(),
                        perks.remove(&id).unwrap_or_default(),
                        claims.remove(&id).unwrap_or_default(),
                    )
                })
                .collect())
        })
        .into_core()
    }

    fn commit(&self, changeset: AccountChangeset) -> Result<CommitOutcome> {
        let now = self.clock.now();
        write_transaction(&self.pool, |conn| {
            let current = self.load_or_create(conn, &changeset.user_id, now)?;

            if changeset.unique_reason && reason_exists(conn, &current.id, &changeset.reason)? {
                let duplicate = LedgerError::DuplicateCredit(changeset.reason.clone());
                return Err(Error::from(duplicate).into());
            }
            if let Some(completion) = &changeset.mission_completion {
                let exists: bool = diesel::select(diesel::dsl::exists(
                    mission_completions::table.find((
                        &current.id,
                        &completion.mission_id,
                        completion.date,
                    )),
                ))
                .get_result(conn)?;
                if exists {
                    return Err(Error::from(LedgerError::MissionAlreadyCompleted {
                        mission_id: completion.mission_id.clone(),
                        date: completion.date,
                    })
                    .into());
                }
            }

            let mut next = current;
            next.apply(&changeset, now)?;

            let row = AccountDB::from(&next);
            diesel::update(accounts::table.find(&next.id))
                .set(&row)
                .execute(conn)?;

            if let Some(badge_id) = &changeset.grant_badge {
                diesel::insert_into(account_badges::table)
                    .values(AccountBadgeDB {
                        user_id: next.id.clone(),
                        badge_id: badge_id.clone(),
                        unlocked_at: now.naive_utc(),
                    })
                    .execute(conn)?;
            }
            if let Some(challenge_id) = &changeset.challenge_claim {
                diesel::insert_into(account_challenge_claims::table)
                    .values(ChallengeClaimDB {
                        user_id: next.id.clone(),
                        challenge_id: challenge_id.clone(),
                        claimed_at: now.naive_utc(),
                    })
                    .execute(conn)?;
            }
            if let Some(redemption) = &changeset.redemption {
                diesel::insert_into(redemptions::table)
                    .values(RedemptionDB::from(redemption))
                    .execute(conn)?;
            }
            if let Some(completion) = &changeset.mission_completion {
                diesel::insert_into(mission_completions::table)
                    .values(MissionCompletionDB::from(completion))
                    .execute(conn)?;
            }

            let entry = if changeset.point_delta != 0 || changeset.unique_reason {
                Some(insert_entry(
                    conn,
                    &LedgerEntry {
                        sequence: 0,
                        user_id: next.id.clone(),
                        delta: changeset.point_delta,
                        balance_after: next.balance,
                        reason: changeset.reason.clone(),
                        created_at: now,
                    },
                )?)
            } else {
                None
            };

            Ok(CommitOutcome {
                account: next,
                entry,
            })
        })
    }

    fn ledger_entries(&self, user_id: &str) -> Result<Vec<LedgerEntry>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = ledger_entries::table
            .filter(ledger_entries::user_id.eq(user_id))
            .order(ledger_entries::sequence.asc())
            .select(LedgerEntryDB::as_select())
            .load::<LedgerEntryDB>(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(LedgerEntry::from).collect())
    }

    fn has_ledger_reason(&self, user_id: &str, reason: &str) -> Result<bool> {
        let mut conn = get_connection(&self.pool)?;
        reason_exists(&mut conn, user_id, reason).into_core()
    }

    fn redemptions(&self, user_id: &str) -> Result<Vec<Redemption>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = redemptions::table
            .filter(redemptions::user_id.eq(user_id))
            .order(redemptions::sequence.asc())
            .select(RedemptionDB::as_select())
            .load::<RedemptionDB>(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(Redemption::from).collect())
    }

    fn next_redemption_sequence(&self) -> Result<u64> {
        write_transaction(&self.pool, |conn| {
            let value: i64 = diesel::update(counters::table.find(REDEMPTION_COUNTER))
                .set(counters::value.eq(counters::value + 1))
                .returning(counters::value)
                .get_result(conn)?;
            Ok(value.max(0) as u64)
        })
    }

    fn find_mission_completion(
        &self,
        user_id: &str,
        mission_id: &str,
        date: NaiveDate,
    ) -> Result<Option<MissionCompletion>> {
        let mut conn = get_connection(&self.pool)?;
        let row = mission_completions::table
            .find((user_id, mission_id, date))
            .select(MissionCompletionDB::as_select())
            .first::<MissionCompletionDB>(&mut conn)
            .optional()
            .into_core()?;
        Ok(row.map(MissionCompletion::from))
    }

    fn mission_completions_on(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<Vec<MissionCompletion>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = mission_completions::table
            .filter(mission_completions::user_id.eq(user_id))
            .filter(mission_completions::completed_on.eq(date))
            .order(mission_completions::mission_id.asc())
            .select(MissionCompletionDB::as_select())
            .load::<MissionCompletionDB>(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(MissionCompletion::from).collect())
    }

    fn clear_mission_completions(&self, user_id: Option<&str>) -> Result<usize> {
        write_transaction(&self.pool, |conn| {
            let removed = match user_id {
                Some(user_id) => diesel::delete(
                    mission_completions::table.filter(mission_completions::user_id.eq(user_id)),
                )
                .execute(conn)?,
                None => diesel::delete(mission_completions::table).execute(conn)?,
            };
            Ok(removed)
        })
    }
}
