//! User account models.
//!
//! Users are provisioned by the surrounding storefront; this subsystem
//! only reads identities and moves balances.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tradepost_core::types::{DbId, Timestamp};

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub balance_cents: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Fields for inserting a user (used by provisioning and tests).
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub username: String,
    /// Starting balance in cents; defaults to zero.
    pub balance_cents: Option<i64>,
}
