//! Repository for the `privacy_settings` table and the access check that
//! composes settings, friendship, and the pure evaluator.

use sqlx::{PgConnection, PgPool};
use tradepost_core::privacy::{self, AccessDecision, PrivacyLevel, ResourceClass};
use tradepost_core::types::DbId;

use crate::models::privacy::{PrivacySettings, UpdatePrivacySettings};
use crate::repositories::FriendshipRepo;

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str =
    "id, user_id, inventory, trade, marketplace, created_at, updated_at";

/// Provides privacy settings access and the access-control check.
pub struct PrivacyRepo;

impl PrivacyRepo {
    /// Fetch a user's settings row, if present.
    pub async fn find_by_user(
        exec: impl sqlx::PgExecutor<'_>,
        user_id: DbId,
    ) -> Result<Option<PrivacySettings>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM privacy_settings WHERE user_id = $1");
        sqlx::query_as::<_, PrivacySettings>(&query)
            .bind(user_id)
            .fetch_optional(exec)
            .await
    }

    /// Upsert a user's settings from a patch DTO, returning the new row.
    pub async fn update(
        pool: &PgPool,
        user_id: DbId,
        input: &UpdatePrivacySettings,
    ) -> Result<PrivacySettings, sqlx::Error> {
        let query = format!(
            "INSERT INTO privacy_settings (user_id, inventory, trade, marketplace)
             VALUES ($1,
                     COALESCE($2, 'public'),
                     COALESCE($3, 'public'),
                     COALESCE($4, 'public'))
             ON CONFLICT (user_id) DO UPDATE SET
                 inventory = COALESCE($2, privacy_settings.inventory),
                 trade = COALESCE($3, privacy_settings.trade),
                 marketplace = COALESCE($4, privacy_settings.marketplace)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PrivacySettings>(&query)
            .bind(user_id)
            .bind(input.inventory.map(|l| l.as_str()))
            .bind(input.trade.map(|l| l.as_str()))
            .bind(input.marketplace.map(|l| l.as_str()))
            .fetch_one(pool)
            .await
    }

    /// Decide whether `viewer` may access `owner`'s resource of `class`,
    /// on a dedicated connection (advisory pre-check path).
    pub async fn check_access(
        pool: &PgPool,
        owner_id: DbId,
        viewer_id: Option<DbId>,
        class: ResourceClass,
    ) -> Result<AccessDecision, sqlx::Error> {
        let mut conn = pool.acquire().await?;
        Self::check_access_conn(&mut conn, owner_id, viewer_id, class).await
    }

    /// Same decision on an existing connection, so the engine can repeat
    /// it inside a transaction as the authoritative check.
    ///
    /// Read-only: two selects at most, no mutation. A missing settings row
    /// evaluates as the defaults (all public); an unparseable stored level
    /// fails closed inside the evaluator.
    pub async fn check_access_conn(
        conn: &mut PgConnection,
        owner_id: DbId,
        viewer_id: Option<DbId>,
        class: ResourceClass,
    ) -> Result<AccessDecision, sqlx::Error> {
        // Self-access short-circuits before any query.
        if viewer_id == Some(owner_id) {
            return Ok(privacy::evaluate(owner_id, viewer_id, class, None, false));
        }

        let level = match Self::find_by_user(&mut *conn, owner_id).await? {
            Some(settings) => settings.level_for(class),
            None => Some(PrivacyLevel::Public),
        };

        // Only consult the friendship table when the level requires it.
        let are_friends = match (level, viewer_id) {
            (Some(PrivacyLevel::Friends), Some(viewer)) => {
                FriendshipRepo::are_friends(&mut *conn, owner_id, viewer).await?
            }
            _ => false,
        };

        Ok(privacy::evaluate(
            owner_id,
            viewer_id,
            class,
            level,
            are_friends,
        ))
    }
}
