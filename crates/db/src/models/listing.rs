//! Marketplace listing models.

use serde::Serialize;
use sqlx::FromRow;
use tradepost_core::types::{DbId, Timestamp};

/// A row from the `marketplace_listings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Listing {
    pub id: DbId,
    pub item_id: DbId,
    pub seller_id: DbId,
    pub price_cents: i64,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Result of a reprice call.
///
/// `unchanged` is true when the requested price equals the current one;
/// the listing row (including `updated_at`) is untouched in that case.
#[derive(Debug, Clone, Serialize)]
pub struct RepriceOutcome {
    pub listing: Listing,
    pub unchanged: bool,
}
