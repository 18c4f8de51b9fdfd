//! Repository for the `items` table.

use sqlx::PgPool;
use tradepost_core::types::DbId;

use crate::models::item::{CreateItem, Item};

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str =
    "id, owner_id, name, tradeable, marketable, locked, created_at, updated_at";

/// Provides inventory item operations.
///
/// Lock and ownership flips are deliberately absent here; only the
/// engine's transactional procedures mutate them.
pub struct ItemRepo;

impl ItemRepo {
    /// Insert a new item (inventory sync / tests).
    pub async fn create(pool: &PgPool, input: &CreateItem) -> Result<Item, sqlx::Error> {
        let query = format!(
            "INSERT INTO items (owner_id, name, tradeable, marketable)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(input.owner_id)
            .bind(&input.name)
            .bind(input.tradeable.unwrap_or(true))
            .bind(input.marketable.unwrap_or(true))
            .fetch_one(pool)
            .await
    }

    /// Find an item by its primary key.
    pub async fn find_by_id(
        exec: impl sqlx::PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Item>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM items WHERE id = $1");
        sqlx::query_as::<_, Item>(&query)
            .bind(id)
            .fetch_optional(exec)
            .await
    }

    /// List a user's items, newest first.
    pub async fn list_by_owner(pool: &PgPool, owner_id: DbId) -> Result<Vec<Item>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM items
             WHERE owner_id = $1
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Item>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }
}
