//! Inventory item models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tradepost_core::types::{DbId, Timestamp};

/// A row from the `items` table.
///
/// `locked` is true exactly while an active listing or a pending
/// trade/offer references the item; only the engine flips it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Item {
    pub id: DbId,
    pub owner_id: DbId,
    pub name: String,
    pub tradeable: bool,
    pub marketable: bool,
    pub locked: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Fields for inserting an item (inventory sync / tests).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateItem {
    pub owner_id: DbId,
    pub name: String,
    pub tradeable: Option<bool>,
    pub marketable: Option<bool>,
}
