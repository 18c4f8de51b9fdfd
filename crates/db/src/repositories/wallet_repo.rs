//! Repository for the append-only `wallet_transactions` ledger.

use sqlx::PgPool;
use tradepost_core::types::DbId;

use crate::models::wallet::{tx_status, tx_type, WalletTransaction};

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str =
    "id, user_id, listing_id, amount_cents, tx_type, status, idempotency_key, created_at";

/// Provides ledger reads and the daily-spend aggregate. Inserts happen
/// only inside the engine's purchase transaction.
pub struct WalletRepo;

impl WalletRepo {
    /// A user's ledger entries, newest first.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<WalletTransaction>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM wallet_transactions
             WHERE user_id = $1
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, WalletTransaction>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Find a purchase transaction by its idempotency key.
    pub async fn find_by_idempotency_key(
        exec: impl sqlx::PgExecutor<'_>,
        user_id: DbId,
        key: &str,
    ) -> Result<Option<WalletTransaction>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM wallet_transactions
             WHERE user_id = $1 AND idempotency_key = $2"
        );
        sqlx::query_as::<_, WalletTransaction>(&query)
            .bind(user_id)
            .bind(key)
            .fetch_optional(exec)
            .await
    }

    /// Sum of a buyer's completed purchases since UTC midnight, in cents.
    ///
    /// Always re-derived from the ledger; the engine repeats this inside
    /// the purchase transaction rather than trusting any cached counter.
    pub async fn daily_spend_cents(
        exec: impl sqlx::PgExecutor<'_>,
        user_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(ABS(amount_cents)), 0)::BIGINT
             FROM wallet_transactions
             WHERE user_id = $1
               AND tx_type = $2
               AND status = $3
               AND created_at >= DATE_TRUNC('day', NOW() AT TIME ZONE 'UTC') AT TIME ZONE 'UTC'",
        )
        .bind(user_id)
        .bind(tx_type::PURCHASE)
        .bind(tx_status::COMPLETED)
        .fetch_one(exec)
        .await?;
        Ok(row.0)
    }
}
