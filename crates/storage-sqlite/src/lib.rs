//! SQLite storage implementation for EcoPoints.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `ecopoints-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for the ledger, perk stock and challenges
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! `core` is database-agnostic and works with traits.
//!
//! ```text
//!        core (domain)
//!              │
//!              ▼
//!   storage-sqlite (this crate)
//!              │
//!              ▼
//!          SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod challenges;
pub mod inventory;
pub mod ledger;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, init, open, run_migrations, write_transaction, DbConnection,
    DbPool,
};

pub use challenges::ChallengeRepository;
pub use inventory::StockRepository;
pub use ledger::LedgerRepository;

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export from ecopoints-core for convenience
pub use ecopoints_core::errors::{DatabaseError, Error, Result};
