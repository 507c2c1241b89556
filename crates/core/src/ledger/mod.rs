//! Ledger module - per-user balances, audit trail and account state.

mod ledger_errors;
mod ledger_model;
mod ledger_traits;
mod memory_store;

#[cfg(test)]
mod ledger_model_tests;

pub use ledger_errors::LedgerError;
pub use ledger_model::{
    AccountChangeset, CommitOutcome, ImpactTotals, LedgerEntry, MissionCompletion, ProfileUpdate,
    Redemption, UserAccount,
};
pub use ledger_traits::LedgerRepositoryTrait;
pub use memory_store::InMemoryLedgerStore;
