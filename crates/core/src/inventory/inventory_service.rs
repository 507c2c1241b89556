use std::sync::Arc;

use super::inventory_errors::InventoryError;
use super::inventory_model::{StockLevel, StockReservation};
use super::inventory_traits::{InventoryServiceTrait, StockRepositoryTrait};
use crate::catalog::{Catalog, Perk};
use crate::errors::Result;

/// Guards finite perk stock against overselling.
pub struct InventoryService {
    store: Arc<dyn StockRepositoryTrait>,
    catalog: Arc<Catalog>,
}

impl InventoryService {
    pub fn new(store: Arc<dyn StockRepositoryTrait>, catalog: Arc<Catalog>) -> Self {
        Self { store, catalog }
    }

    fn perk(&self, perk_id: &str) -> Result<&Perk> {
        self.catalog
            .perk(perk_id)
            .ok_or_else(|| InventoryError::PerkNotFound(perk_id.to_string()).into())
    }
}

impl InventoryServiceTrait for InventoryService {
    fn seed_from_catalog(&self) -> Result<usize> {
        let mut seeded = 0;
        for perk in &self.catalog.perks {
            if self
                .store
                .seed_stock(&perk.id, StockLevel::from_initial(perk.initial_stock))?
            {
                seeded += 1;
            }
        }
        if seeded > 0 {
            log::info!("Seeded stock for {} perks", seeded);
        }
        Ok(seeded)
    }

    fn stock(&self, perk_id: &str) -> Result<StockLevel> {
        let perk = self.perk(perk_id)?;
        // A perk missing from the store has its catalog stock.
        Ok(self
            .store
            .get_stock(perk_id)?
            .unwrap_or_else(|| StockLevel::from_initial(perk.initial_stock)))
    }

    fn is_available(&self, perk_id: &str) -> Result<bool> {
        let perk = self.perk(perk_id)?;
        Ok(perk.enabled && !self.stock(perk_id)?.is_exhausted())
    }

    fn reserve_unit(&self, perk_id: &str) -> Result<StockReservation> {
        let perk = self.perk(perk_id)?;
        if !perk.enabled {
            return Err(InventoryError::PerkUnavailable(perk_id.to_string()).into());
        }
        self.store
            .seed_stock(perk_id, StockLevel::from_initial(perk.initial_stock))?;
        let remaining = self.store.try_take_unit(perk_id)?;
        log::debug!("Reserved one unit of perk {} ({:?} left)", perk_id, remaining);
        Ok(StockReservation::new(
            self.store.clone(),
            perk_id.to_string(),
            remaining,
        ))
    }
}
