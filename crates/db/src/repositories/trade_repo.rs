//! Repository for the `trades` table.
//!
//! Read paths only; trade mutations live in [`crate::engine::trading`].

use sqlx::PgPool;
use tradepost_core::trading::trade_status;
use tradepost_core::types::DbId;

use crate::models::trade::Trade;

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str = "id, item_id, offerer_id, status, created_at, updated_at";

/// Provides read access to trades.
pub struct TradeRepo;

impl TradeRepo {
    /// Find a trade by its primary key.
    pub async fn find_by_id(
        exec: impl sqlx::PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Trade>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM trades WHERE id = $1");
        sqlx::query_as::<_, Trade>(&query)
            .bind(id)
            .fetch_optional(exec)
            .await
    }

    /// Browse pending trades, newest first.
    ///
    /// Returns an empty list when nothing matches; callers treat that as a
    /// normal result, not an error.
    pub async fn list_pending(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Trade>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM trades
             WHERE status = $1
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Trade>(&query)
            .bind(trade_status::PENDING)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// A user's trades, any status, newest first.
    pub async fn list_by_offerer(pool: &PgPool, offerer_id: DbId) -> Result<Vec<Trade>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM trades
             WHERE offerer_id = $1
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Trade>(&query)
            .bind(offerer_id)
            .fetch_all(pool)
            .await
    }

    /// Count a user's pending trades (quota aggregate, computed fresh).
    pub async fn count_pending_by_offerer(
        exec: impl sqlx::PgExecutor<'_>,
        offerer_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM trades WHERE offerer_id = $1 AND status = $2",
        )
        .bind(offerer_id)
        .bind(trade_status::PENDING)
        .fetch_one(exec)
        .await?;
        Ok(row.0)
    }
}
