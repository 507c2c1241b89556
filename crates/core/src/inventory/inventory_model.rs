//! Stock levels and the reservation guard.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::inventory_traits::StockRepositoryTrait;
use crate::errors::Result;

/// Remaining units of a perk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "remaining", rename_all = "lowercase")]
pub enum StockLevel {
    Unlimited,
    Limited(u32),
}

impl StockLevel {
    pub fn from_initial(initial: Option<u32>) -> Self {
        match initial {
            Some(units) => StockLevel::Limited(units),
            None => StockLevel::Unlimited,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        matches!(self, StockLevel::Limited(0))
    }

    /// Remaining units, `None` for unlimited stock.
    pub fn remaining(&self) -> Option<u32> {
        match self {
            StockLevel::Unlimited => None,
            StockLevel::Limited(units) => Some(*units),
        }
    }
}

/// One unit of perk stock taken out of inventory but not yet paid for.
///
/// Must be resolved with [`commit`](Self::commit) or
/// [`release`](Self::release). A reservation dropped unresolved (for example
/// when an error is propagated with `?`) puts the unit back.
#[must_use = "a reservation must be committed or released"]
pub struct StockReservation {
    store: Arc<dyn StockRepositoryTrait>,
    perk_id: String,
    remaining: StockLevel,
    resolved: bool,
}

impl StockReservation {
    pub(crate) fn new(
        store: Arc<dyn StockRepositoryTrait>,
        perk_id: String,
        remaining: StockLevel,
    ) -> Self {
        Self {
            store,
            perk_id,
            remaining,
            resolved: false,
        }
    }

    pub fn perk_id(&self) -> &str {
        &self.perk_id
    }

    /// Stock left after this reservation was taken.
    pub fn remaining(&self) -> StockLevel {
        self.remaining
    }

    /// Makes the decrement permanent.
    pub fn commit(mut self) -> StockLevel {
        self.resolved = true;
        log::debug!("Committed stock reservation for perk {}", self.perk_id);
        self.remaining
    }

    /// Returns the unit to inventory.
    pub fn release(mut self) -> Result<StockLevel> {
        self.resolved = true;
        self.store.return_unit(&self.perk_id)
    }
}

impl Drop for StockReservation {
    fn drop(&mut self) {
        if self.resolved {
            return;
        }
        log::warn!(
            "Stock reservation for perk {} dropped unresolved; returning unit",
            self.perk_id
        );
        if let Err(e) = self.store.return_unit(&self.perk_id) {
            log::error!(
                "Failed to return reserved unit of perk {}: {}",
                self.perk_id,
                e
            );
        }
    }
}

impl fmt::Debug for StockReservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StockReservation")
            .field("perk_id", &self.perk_id)
            .field("remaining", &self.remaining)
            .field("resolved", &self.resolved)
            .finish()
    }
}
