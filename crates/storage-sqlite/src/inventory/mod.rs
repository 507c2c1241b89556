//! SQLite storage implementation for perk inventory.

mod model;
mod repository;

pub use model::PerkStockDB;
pub use repository::StockRepository;
