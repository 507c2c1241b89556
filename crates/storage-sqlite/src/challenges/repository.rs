use std::sync::Arc;

use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;

use ecopoints_core::challenges::{
    ChallengeError, ChallengeRepositoryTrait, ChallengeState, JoinOutcome,
};
use ecopoints_core::{Error, Result};

use super::model::{ChallengeDB, ChallengeParticipantDB};
use crate::db::{get_connection, write_transaction, DbPool};
use crate::errors::{IntoCore, StorageError};
use crate::schema::{challenge_participants, challenges};

pub struct ChallengeRepository {
    pool: Arc<DbPool>,
}

impl ChallengeRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        ChallengeRepository { pool }
    }
}

fn to_u64(value: i64) -> u64 {
    value.max(0) as u64
}

fn to_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn participant_count(conn: &mut SqliteConnection, challenge_id: &str) -> QueryResult<u64> {
    challenge_participants::table
        .filter(challenge_participants::challenge_id.eq(challenge_id))
        .count()
        .get_result::<i64>(conn)
        .map(to_u64)
}

fn load_challenge(
    conn: &mut SqliteConnection,
    challenge_id: &str,
) -> std::result::Result<ChallengeDB, StorageError> {
    challenges::table
        .find(challenge_id)
        .select(ChallengeDB::as_select())
        .first::<ChallengeDB>(conn)
        .optional()?
        .ok_or_else(|| {
            Error::from(ChallengeError::ChallengeNotFound(challenge_id.to_string())).into()
        })
}

impl ChallengeRepositoryTrait for ChallengeRepository {
    fn seed_challenge(&self, challenge_id: &str, initial_progress: u64) -> Result<bool> {
        write_transaction(&self.pool, |conn| {
            let inserted = diesel::insert_or_ignore_into(challenges::table)
                .values(ChallengeDB {
                    challenge_id: challenge_id.to_string(),
                    progress: to_i64(initial_progress),
                    updated_at: Utc::now().naive_utc(),
                })
                .execute(conn)?;
            Ok(inserted > 0)
        })
    }

    fn get_challenge_state(&self, challenge_id: &str) -> Result<Option<ChallengeState>> {
        let mut conn = get_connection(&self.pool)?;
        conn.transaction::<_, StorageError, _>(|conn| {
            let Some(row) = challenges::table
                .find(challenge_id)
                .select(ChallengeDB::as_select())
                .first::<ChallengeDB>(conn)
                .optional()?
            else {
                return Ok(None);
            };
            Ok(Some(ChallengeState {
                progress: to_u64(row.progress),
                participants: participant_count(conn, challenge_id)?,
            }))
        })
        .into_core()
    }

    fn add_participant(&self, challenge_id: &str, user_id: &str) -> Result<JoinOutcome> {
        write_transaction(&self.pool, |conn| {
            load_challenge(conn, challenge_id)?;
            let inserted = diesel::insert_or_ignore_into(challenge_participants::table)
                .values(ChallengeParticipantDB {
                    challenge_id: challenge_id.to_string(),
                    user_id: user_id.to_string(),
                    joined_at: Utc::now().naive_utc(),
                })
                .execute(conn)?;
            Ok(JoinOutcome {
                joined: inserted > 0,
                participants: participant_count(conn, challenge_id)?,
            })
        })
    }

    fn is_participant(&self, challenge_id: &str, user_id: &str) -> Result<bool> {
        let mut conn = get_connection(&self.pool)?;
        diesel::select(diesel::dsl::exists(
            challenge_participants::table.find((challenge_id, user_id)),
        ))
        .get_result(&mut conn)
        .into_core()
    }

    fn add_progress(&self, challenge_id: &str, amount: u64, cap: u64) -> Result<ChallengeState> {
        write_transaction(&self.pool, |conn| {
            let row = load_challenge(conn, challenge_id)?;
            let progress = to_u64(row.progress).saturating_add(amount).min(cap);
            diesel::update(challenges::table.find(challenge_id))
                .set((
                    challenges::progress.eq(to_i64(progress)),
                    challenges::updated_at.eq(Utc::now().naive_utc()),
                ))
                .execute(conn)?;
            Ok(ChallengeState {
                progress,
                participants: participant_count(conn, challenge_id)?,
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::open;
    use std::thread;
    use tempfile::tempdir;

    fn setup() -> (ChallengeRepository, tempfile::TempDir) {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let pool = open(&temp_dir.path().join("challenges.db").to_string_lossy())
            .expect("Failed to open database");
        (ChallengeRepository::new(pool), temp_dir)
    }

    #[test]
    fn test_seed_keeps_existing_progress() {
        let (repo, _dir) = setup();
        assert!(repo.seed_challenge("1", 15_234_567).unwrap());
        repo.add_progress("1", 10, 20_000_000).unwrap();
        assert!(!repo.seed_challenge("1", 0).unwrap());
        let state = repo.get_challenge_state("1").unwrap().unwrap();
        assert_eq!(state.progress, 15_234_577);
    }

    #[test]
    fn test_join_is_idempotent() {
        let (repo, _dir) = setup();
        repo.seed_challenge("3", 0).unwrap();
        let first = repo.add_participant("3", "alice").unwrap();
        let second = repo.add_participant("3", "alice").unwrap();
        assert!(first.joined);
        assert!(!second.joined);
        assert_eq!(second.participants, 1);
        assert!(repo.is_participant("3", "alice").unwrap());
        assert!(!repo.is_participant("3", "bob").unwrap());
    }

    #[test]
    fn test_progress_is_clamped_at_cap() {
        let (repo, _dir) = setup();
        repo.seed_challenge("2", 49_990).unwrap();
        let state = repo.add_progress("2", 25, 50_000).unwrap();
        assert_eq!(state.progress, 50_000);
    }

    #[test]
    fn test_unknown_challenge_is_not_found() {
        let (repo, _dir) = setup();
        assert!(repo.get_challenge_state("9").unwrap().is_none());
        let err = repo.add_participant("9", "alice").unwrap_err();
        assert!(matches!(
            err,
            Error::Challenge(ChallengeError::ChallengeNotFound(_))
        ));
    }

    #[test]
    fn test_concurrent_contributions_are_not_lost() {
        let (repo, _dir) = setup();
        repo.seed_challenge("3", 0).unwrap();
        let repo = Arc::new(repo);

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let repo = Arc::clone(&repo);
                thread::spawn(move || repo.add_progress("3", 7, 1_000_000))
            })
            .collect();
        for handle in handles {
            handle.join().unwrap().unwrap();
        }
        assert_eq!(repo.get_challenge_state("3").unwrap().unwrap().progress, 70);
    }
}
