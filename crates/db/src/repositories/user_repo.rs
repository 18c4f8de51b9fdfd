//! Repository for the `users` table.

use sqlx::PgPool;
use tradepost_core::types::DbId;

use crate::models::user::{CreateUser, User};

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str = "id, username, balance_cents, created_at, updated_at";

/// Provides account lookups and provisioning.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user together with its default privacy settings row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO users (username, balance_cents)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(input.balance_cents.unwrap_or(0))
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO privacy_settings (user_id) VALUES ($1)")
            .bind(user.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(user)
    }

    /// Find a user by its primary key.
    pub async fn find_by_id(
        exec: impl sqlx::PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(exec)
            .await
    }

    /// Adjust a user's balance by `delta_cents` (may be negative).
    ///
    /// Returns the new balance, or `None` if the user does not exist or
    /// the debit would go below zero (the `CHECK` constraint is the last
    /// line of defence; callers validate first).
    pub async fn adjust_balance(
        exec: impl sqlx::PgExecutor<'_>,
        id: DbId,
        delta_cents: i64,
    ) -> Result<Option<i64>, sqlx::Error> {
        let row: Option<(i64,)> = sqlx::query_as(
            "UPDATE users SET balance_cents = balance_cents + $2
             WHERE id = $1 AND balance_cents + $2 >= 0
             RETURNING balance_cents",
        )
        .bind(id)
        .bind(delta_cents)
        .fetch_optional(exec)
        .await?;
        Ok(row.map(|r| r.0))
    }
}
