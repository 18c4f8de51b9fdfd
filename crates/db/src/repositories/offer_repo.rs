//! Repository for the `trade_offers` table.
//!
//! Read paths only; offer mutations live in [`crate::engine::trading`].

use sqlx::PgPool;
use tradepost_core::trading::offer_status;
use tradepost_core::types::DbId;

use crate::models::trade::TradeOffer;

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str =
    "id, trade_id, offerer_id, item_id, status, created_at, updated_at";

/// Provides read access to trade offers.
pub struct OfferRepo;

impl OfferRepo {
    /// Find an offer by its primary key.
    pub async fn find_by_id(
        exec: impl sqlx::PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<TradeOffer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM trade_offers WHERE id = $1");
        sqlx::query_as::<_, TradeOffer>(&query)
            .bind(id)
            .fetch_optional(exec)
            .await
    }

    /// All offers on a trade, oldest first.
    pub async fn list_by_trade(
        pool: &PgPool,
        trade_id: DbId,
    ) -> Result<Vec<TradeOffer>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM trade_offers
             WHERE trade_id = $1
             ORDER BY created_at ASC"
        );
        sqlx::query_as::<_, TradeOffer>(&query)
            .bind(trade_id)
            .fetch_all(pool)
            .await
    }

    /// Count pending offers on a trade (quota aggregate, computed fresh).
    pub async fn count_pending_by_trade(
        exec: impl sqlx::PgExecutor<'_>,
        trade_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM trade_offers WHERE trade_id = $1 AND status = $2",
        )
        .bind(trade_id)
        .bind(offer_status::PENDING)
        .fetch_one(exec)
        .await?;
        Ok(row.0)
    }

    /// Whether `offerer_id` already has a pending offer with `item_id` on
    /// this trade.
    pub async fn pending_duplicate_exists(
        exec: impl sqlx::PgExecutor<'_>,
        trade_id: DbId,
        offerer_id: DbId,
        item_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                 SELECT 1 FROM trade_offers
                 WHERE trade_id = $1 AND offerer_id = $2 AND item_id = $3 AND status = $4
             )",
        )
        .bind(trade_id)
        .bind(offerer_id)
        .bind(item_id)
        .bind(offer_status::PENDING)
        .fetch_one(exec)
        .await?;
        Ok(row.0)
    }
}
