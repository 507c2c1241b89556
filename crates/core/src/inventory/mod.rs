//! Inventory module - finite perk stock and reservations.

mod inventory_errors;
mod inventory_model;
mod inventory_service;
mod inventory_traits;

pub use inventory_errors::InventoryError;
pub use inventory_model::{StockLevel, StockReservation};
pub use inventory_service::InventoryService;
pub use inventory_traits::{InventoryServiceTrait, StockRepositoryTrait};
