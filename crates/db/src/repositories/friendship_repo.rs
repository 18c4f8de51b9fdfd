//! Repository for the `friendships` table.

use sqlx::PgPool;
use tradepost_core::types::DbId;

use crate::models::privacy::Friendship;

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str = "id, user_id, friend_id, status, created_at, updated_at";

/// Provides the friendship predicate and row management.
pub struct FriendshipRepo;

impl FriendshipRepo {
    /// Insert a friendship row (provisioning / tests).
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        friend_id: DbId,
        status: &str,
    ) -> Result<Friendship, sqlx::Error> {
        let query = format!(
            "INSERT INTO friendships (user_id, friend_id, status)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Friendship>(&query)
            .bind(user_id)
            .bind(friend_id)
            .bind(status)
            .fetch_one(pool)
            .await
    }

    /// The symmetric friendship predicate.
    ///
    /// True when an `accepted` row exists in either direction, or when the
    /// two ids are equal (a user is always friends with themself).
    pub async fn are_friends(
        exec: impl sqlx::PgExecutor<'_>,
        a: DbId,
        b: DbId,
    ) -> Result<bool, sqlx::Error> {
        if a == b {
            return Ok(true);
        }
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS (
                 SELECT 1 FROM friendships
                 WHERE status = 'accepted'
                   AND ((user_id = $1 AND friend_id = $2)
                     OR (user_id = $2 AND friend_id = $1))
             )",
        )
        .bind(a)
        .bind(b)
        .fetch_one(exec)
        .await?;
        Ok(row.0)
    }
}
