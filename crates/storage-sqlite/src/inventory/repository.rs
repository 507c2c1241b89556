use std::sync::Arc;

use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;

use ecopoints_core::inventory::{InventoryError, StockLevel, StockRepositoryTrait};
use ecopoints_core::{Error, Result};

use super::model::PerkStockDB;
use crate::db::{get_connection, write_transaction, DbPool};
use crate::errors::{IntoCore, StorageError};
use crate::schema::perk_stock;

/// Perk stock counters. Each decrement runs in its own immediate
/// transaction, so a limited counter can never be taken below zero.
pub struct StockRepository {
    pool: Arc<DbPool>,
}

impl StockRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        StockRepository { pool }
    }
}

fn load_stock(
    conn: &mut SqliteConnection,
    perk_id: &str,
) -> std::result::Result<PerkStockDB, StorageError> {
    perk_stock::table
        .find(perk_id)
        .select(PerkStockDB::as_select())
        .first::<PerkStockDB>(conn)
        .optional()?
        .ok_or_else(|| Error::from(InventoryError::PerkNotFound(perk_id.to_string())).into())
}

fn store_level(
    conn: &mut SqliteConnection,
    perk_id: &str,
    level: StockLevel,
) -> std::result::Result<StockLevel, StorageError> {
    let row = PerkStockDB::new(perk_id, level, Utc::now().naive_utc());
    diesel::update(perk_stock::table.find(perk_id))
        .set(&row)
        .execute(conn)?;
    Ok(level)
}

impl StockRepositoryTrait for StockRepository {
    fn get_stock(&self, perk_id: &str) -> Result<Option<StockLevel>> {
        let mut conn = get_connection(&self.pool)?;
        let row = perk_stock::table
            .find(perk_id)
            .select(PerkStockDB::as_select())
            .first::<PerkStockDB>(&mut conn)
            .optional()
            .into_core()?;
        Ok(row.map(|r| r.level()))
    }

    fn seed_stock(&self, perk_id: &str, level: StockLevel) -> Result<bool> {
        write_transaction(&self.pool, |conn| {
            let inserted = diesel::insert_or_ignore_into(perk_stock::table)
                .values(PerkStockDB::new(perk_id, level, Utc::now().naive_utc()))
                .execute(conn)?;
            Ok(inserted > 0)
        })
    }

    fn try_take_unit(&self, perk_id: &str) -> Result<StockLevel> {
        write_transaction(&self.pool, |conn| match load_stock(conn, perk_id)?.level() {
            StockLevel::Unlimited => Ok(StockLevel::Unlimited),
            StockLevel::Limited(0) => {
                Err(Error::from(InventoryError::OutOfStock(perk_id.to_string())).into())
            }
            StockLevel::Limited(units) => store_level(conn, perk_id, StockLevel::Limited(units - 1)),
        })
    }

    fn return_unit(&self, perk_id: &str) -> Result<StockLevel> {
        write_transaction(&self.pool, |conn| match load_stock(conn, perk_id)?.level() {
            StockLevel::Unlimited => Ok(StockLevel::Unlimited),
            StockLevel::Limited(units) => {
                store_level(conn, perk_id, StockLevel::Limited(units.saturating_add(1)))
            }
        })
    }
}
