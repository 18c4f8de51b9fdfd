//! Trade and trade-offer models.

use serde::Serialize;
use sqlx::FromRow;
use tradepost_core::types::{DbId, Timestamp};

/// A row from the `trades` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Trade {
    pub id: DbId,
    pub item_id: DbId,
    pub offerer_id: DbId,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `trade_offers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TradeOffer {
    pub id: DbId,
    pub trade_id: DbId,
    pub offerer_id: DbId,
    pub item_id: DbId,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Result of accepting an offer: the completed trade and accepted offer.
#[derive(Debug, Clone, Serialize)]
pub struct AcceptedTrade {
    pub trade: Trade,
    pub offer: TradeOffer,
}
