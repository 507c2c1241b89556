use thiserror::Error;

use crate::errors::ErrorClass;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InventoryError {
    #[error("Perk '{0}' not found")]
    PerkNotFound(String),

    #[error("Perk '{0}' is not available")]
    PerkUnavailable(String),

    #[error("Perk '{0}' is out of stock")]
    OutOfStock(String),
}

impl InventoryError {
    pub fn kind(&self) -> &'static str {
        match self {
            InventoryError::PerkNotFound(_) => "PERK_NOT_FOUND",
            InventoryError::PerkUnavailable(_) => "PERK_UNAVAILABLE",
            InventoryError::OutOfStock(_) => "OUT_OF_STOCK",
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            InventoryError::PerkNotFound(_) => ErrorClass::NotFound,
            InventoryError::PerkUnavailable(_) | InventoryError::OutOfStock(_) => {
                ErrorClass::Conflict
            }
        }
    }
}
