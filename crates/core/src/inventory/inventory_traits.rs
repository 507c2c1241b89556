//! Inventory repository and service traits.

use super::inventory_model::{StockLevel, StockReservation};
use crate::errors::Result;

/// Per-perk stock counters.
///
/// Every method is atomic for its perk. Implementations must never let a
/// limited counter go below zero.
pub trait StockRepositoryTrait: Send + Sync {
    /// Current stock, or `None` if the perk was never seeded.
    fn get_stock(&self, perk_id: &str) -> Result<Option<StockLevel>>;

    /// Inserts the stock level if the perk has none yet. Returns whether it
    /// was inserted.
    fn seed_stock(&self, perk_id: &str, level: StockLevel) -> Result<bool>;

    /// Compare-and-decrement. Returns the level after taking one unit, or
    /// `InventoryError::OutOfStock` when none is left.
    fn try_take_unit(&self, perk_id: &str) -> Result<StockLevel>;

    /// Puts back one unit taken by [`try_take_unit`](Self::try_take_unit).
    fn return_unit(&self, perk_id: &str) -> Result<StockLevel>;
}

/// InventoryManager operations.
pub trait InventoryServiceTrait: Send + Sync {
    /// Seeds stock for every catalog perk that has none yet.
    fn seed_from_catalog(&self) -> Result<usize>;

    fn stock(&self, perk_id: &str) -> Result<StockLevel>;

    /// A perk is available when it is enabled and its stock is not exhausted.
    fn is_available(&self, perk_id: &str) -> Result<bool>;

    /// Atomically takes one unit of stock.
    fn reserve_unit(&self, perk_id: &str) -> Result<StockReservation>;
}
