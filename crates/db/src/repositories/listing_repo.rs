//! Repository for the `marketplace_listings` table.
//!
//! Read paths only. Creation, cancellation, repricing, and purchase are
//! multi-row mutations and live in [`crate::engine::market`].

use sqlx::PgPool;
use tradepost_core::market::listing_status;
use tradepost_core::types::DbId;

use crate::models::listing::Listing;

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str =
    "id, item_id, seller_id, price_cents, status, created_at, updated_at";

/// Provides read access to marketplace listings.
pub struct ListingRepo;

impl ListingRepo {
    /// Find a listing by its primary key.
    pub async fn find_by_id(
        exec: impl sqlx::PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Listing>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM marketplace_listings WHERE id = $1");
        sqlx::query_as::<_, Listing>(&query)
            .bind(id)
            .fetch_optional(exec)
            .await
    }

    /// Browse active listings, newest first.
    pub async fn list_active(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Listing>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM marketplace_listings
             WHERE status = $1
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(listing_status::ACTIVE)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// A seller's active listings, newest first.
    pub async fn list_active_by_seller(
        pool: &PgPool,
        seller_id: DbId,
    ) -> Result<Vec<Listing>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM marketplace_listings
             WHERE seller_id = $1 AND status = $2
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Listing>(&query)
            .bind(seller_id)
            .bind(listing_status::ACTIVE)
            .fetch_all(pool)
            .await
    }

    /// Count a seller's active listings (quota aggregate, computed fresh).
    pub async fn count_active_by_seller(
        exec: impl sqlx::PgExecutor<'_>,
        seller_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM marketplace_listings
             WHERE seller_id = $1 AND status = $2",
        )
        .bind(seller_id)
        .bind(listing_status::ACTIVE)
        .fetch_one(exec)
        .await?;
        Ok(row.0)
    }
}
