//! Database model for perk stock.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use ecopoints_core::inventory::StockLevel;

/// `remaining` is NULL for unlimited stock.
#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::perk_stock)]
#[diesel(primary_key(perk_id))]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PerkStockDB {
    pub perk_id: String,
    pub remaining: Option<i32>,
    pub updated_at: NaiveDateTime,
}

impl PerkStockDB {
    pub fn new(perk_id: &str, level: StockLevel, updated_at: NaiveDateTime) -> Self {
        Self {
            perk_id: perk_id.to_string(),
            remaining: level
                .remaining()
                .map(|units| i32::try_from(units).unwrap_or(i32::MAX)),
            updated_at,
        }
    }

    pub fn level(&self) -> StockLevel {
        match self.remaining {
            Some(units) => StockLevel::Limited(units.max(0) as u32),
            None => StockLevel::Unlimited,
        }
    }
}
