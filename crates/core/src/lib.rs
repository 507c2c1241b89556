//! EcoPoints Core - rewards ledger, redemption engine and leaderboards.
//!
//! This crate contains the domain logic for the EcoPoints platform.
//! It is database-agnostic and defines store traits that are implemented
//! in memory here and durably by the `storage-sqlite` crate.

pub mod catalog;
pub mod challenges;
pub mod config;
pub mod constants;
pub mod eco_meter;
pub mod errors;
pub mod events;
pub mod inventory;
pub mod leaderboard;
pub mod ledger;
pub mod missions;
pub mod rewards;
pub mod utils;

pub use catalog::Catalog;
pub use config::RewardsConfig;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
