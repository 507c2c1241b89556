//! SQLite storage implementation for the ledger.

mod model;
mod repository;


pub use model::{
    AccountBadgeDB, AccountDB, ChallengeClaimDB, LedgerEntryDB, MissionCompletionDB,
    NewLedgerEntryDB, RedemptionDB,
};
pub use repository::LedgerRepository;
