//! Database models for challenge counters and participants.

use chrono::NaiveDateTime;
use diesel::prelude::*;

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::challenges)]
#[diesel(primary_key(challenge_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ChallengeDB {
    pub challenge_id: String,
    pub progress: i64,
    pub updated_at: NaiveDateTime,
}

#[derive(Queryable, Insertable, Selectable, Debug, Clone)]
#[diesel(table_name = crate::schema::challenge_participants)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ChallengeParticipantDB {
    pub challenge_id: String,
    pub user_id: String,
    pub joined_at: NaiveDateTime,
}
