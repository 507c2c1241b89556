//! Core error types for the EcoPoints rewards engine.
//!
//! This module defines database-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, etc.) are converted to these types by the storage layer.

use thiserror::Error;

use crate::challenges::ChallengeError;
use crate::inventory::InventoryError;
use crate::leaderboard::LeaderboardError;
use crate::ledger::LedgerError;
use crate::missions::MissionError;
use crate::rewards::RewardError;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the rewards engine.
///
/// Database-specific errors are wrapped in string form to keep this type
/// database-agnostic.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Inventory error: {0}")]
    Inventory(#[from] InventoryError),

    #[error("Reward error: {0}")]
    Reward(#[from] RewardError),

    #[error("Mission error: {0}")]
    Mission(#[from] MissionError),

    #[error("Challenge error: {0}")]
    Challenge(#[from] ChallengeError),

    #[error("Leaderboard error: {0}")]
    Leaderboard(#[from] LeaderboardError),

    #[error("Timed out waiting for lock on '{0}'")]
    LockTimeout(String),

    #[error("Failed to load catalog: {0}")]
    Catalog(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Coarse classification used by request layers to pick a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Bad or missing input. Nothing was mutated.
    Validation,
    /// A referenced catalog entry does not exist.
    NotFound,
    /// The request was well formed but conflicts with current state.
    /// Nothing was mutated.
    Conflict,
    /// A per-key lock could not be acquired in time.
    Timeout,
    /// Storage or programming failure.
    Internal,
}

impl Error {
    /// Machine-readable error kind, stable across releases.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Database(_) => "DATABASE",
            Error::Validation(_) => "VALIDATION",
            Error::Ledger(e) => e.kind(),
            Error::Inventory(e) => e.kind(),
            Error::Reward(e) => e.kind(),
            Error::Mission(e) => e.kind(),
            Error::Challenge(e) => e.kind(),
            Error::Leaderboard(e) => e.kind(),
            Error::LockTimeout(_) => "LOCK_TIMEOUT",
            Error::Catalog(_) => "CATALOG",
            Error::Unexpected(_) => "UNEXPECTED",
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            Error::Validation(_) => ErrorClass::Validation,
            Error::Ledger(e) => e.class(),
            Error::Inventory(e) => e.class(),
            Error::Reward(e) => e.class(),
            Error::Mission(e) => e.class(),
            Error::Challenge(e) => e.class(),
            Error::Leaderboard(e) => e.class(),
            Error::LockTimeout(_) => ErrorClass::Timeout,
            Error::Database(_) | Error::Catalog(_) | Error::Unexpected(_) => {
                ErrorClass::Internal
            }
        }
    }
}

/// Database-agnostic error type for storage operations.
///
/// This enum uses `String` for all error details, allowing the storage layer
/// to convert storage-specific errors (Diesel, SQLite, etc.) into this format.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to establish a database connection.
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to create or configure the connection pool.
    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    /// A database query failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// The requested record was not found.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A unique constraint was violated (e.g., duplicate key).
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// A database transaction failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Database migration failed.
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Internal/unexpected database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Validation errors for user input and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Unknown state code '{0}'")]
    UnknownState(String),
}

// === From implementations for common error types ===

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Catalog(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds_are_distinct_for_conflicts_and_validation() {
        let funds: Error = LedgerError::InsufficientFunds {
            required: 1000,
            available: 10,
        }
        .into();
        assert_eq!(funds.kind(), "INSUFFICIENT_FUNDS");
        assert_eq!(funds.class(), ErrorClass::Conflict);

        let amount: Error = LedgerError::InvalidAmount(-5).into();
        assert_eq!(amount.kind(), "INVALID_AMOUNT");
        assert_eq!(amount.class(), ErrorClass::Validation);

        let missing: Error = InventoryError::PerkNotFound("9".to_string()).into();
        assert_eq!(missing.class(), ErrorClass::NotFound);
    }

    #[test]
    fn test_lock_timeout_is_timeout_class() {
        let err = Error::LockTimeout("user-1".to_string());
        assert_eq!(err.kind(), "LOCK_TIMEOUT");
        assert_eq!(err.class(), ErrorClass::Timeout);
    }
}
