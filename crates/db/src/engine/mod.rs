//! Transactional marketplace/trading engine.
//!
//! Every multi-row mutation in the system (lock/unlock + status change +
//! ownership transfer + balance adjustment) runs here as a single sqlx
//! transaction. Each procedure re-reads authoritative state with
//! `SELECT ... FOR UPDATE`, repeats every admission check the handlers ran
//! as advisory pre-checks, mutates all affected rows, and commits -- so a
//! failure at any point rolls back cleanly and partial application is
//! impossible.

use sqlx::PgConnection;
use tradepost_core::error::CoreError;
use tradepost_core::types::DbId;

use crate::models::item::Item;
use crate::models::listing::Listing;
use crate::models::trade::{Trade, TradeOffer};
use crate::repositories::{item_repo, listing_repo, offer_repo, trade_repo};

pub mod market;
pub mod trading;

/// Error type for engine procedures: a domain rejection or a store failure.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Domain(#[from] CoreError),

    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;

// ---------------------------------------------------------------------------
// Row-lock helpers
// ---------------------------------------------------------------------------

/// Read an item row under a row lock.
pub(crate) async fn item_for_update(
    conn: &mut PgConnection,
    id: DbId,
) -> Result<Option<Item>, sqlx::Error> {
    let query = format!(
        "SELECT {} FROM items WHERE id = $1 FOR UPDATE",
        item_repo::COLUMNS
    );
    sqlx::query_as::<_, Item>(&query)
        .bind(id)
        .fetch_optional(conn)
        .await
}

/// Read a listing row under a row lock.
pub(crate) async fn listing_for_update(
    conn: &mut PgConnection,
    id: DbId,
) -> Result<Option<Listing>, sqlx::Error> {
    let query = format!(
        "SELECT {} FROM marketplace_listings WHERE id = $1 FOR UPDATE",
        listing_repo::COLUMNS
    );
    sqlx::query_as::<_, Listing>(&query)
        .bind(id)
        .fetch_optional(conn)
        .await
}

/// Read a trade row under a row lock.
pub(crate) async fn trade_for_update(
    conn: &mut PgConnection,
    id: DbId,
) -> Result<Option<Trade>, sqlx::Error> {
    let query = format!(
        "SELECT {} FROM trades WHERE id = $1 FOR UPDATE",
        trade_repo::COLUMNS
    );
    sqlx::query_as::<_, Trade>(&query)
        .bind(id)
        .fetch_optional(conn)
        .await
}

/// Read a trade offer row under a row lock.
pub(crate) async fn offer_for_update(
    conn: &mut PgConnection,
    id: DbId,
) -> Result<Option<TradeOffer>, sqlx::Error> {
    let query = format!(
        "SELECT {} FROM trade_offers WHERE id = $1 FOR UPDATE",
        offer_repo::COLUMNS
    );
    sqlx::query_as::<_, TradeOffer>(&query)
        .bind(id)
        .fetch_optional(conn)
        .await
}

/// Lock two user rows in ascending-id order and return their balances.
///
/// The fixed order prevents deadlocks between concurrent purchases that
/// involve the same pair of users in opposite roles.
pub(crate) async fn lock_user_balances(
    conn: &mut PgConnection,
    a: DbId,
    b: DbId,
) -> Result<Vec<(DbId, i64)>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, balance_cents FROM users
         WHERE id = $1 OR id = $2
         ORDER BY id
         FOR UPDATE",
    )
    .bind(a)
    .bind(b)
    .fetch_all(conn)
    .await
}

/// Set an item's locked flag.
pub(crate) async fn set_item_locked(
    conn: &mut PgConnection,
    item_id: DbId,
    locked: bool,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE items SET locked = $2 WHERE id = $1")
        .bind(item_id)
        .bind(locked)
        .execute(conn)
        .await?;
    Ok(())
}

/// Transfer an item to a new owner and clear its lock in one statement.
pub(crate) async fn transfer_item(
    conn: &mut PgConnection,
    item_id: DbId,
    new_owner_id: DbId,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE items SET owner_id = $2, locked = FALSE WHERE id = $1")
        .bind(item_id)
        .bind(new_owner_id)
        .execute(conn)
        .await?;
    Ok(())
}

/// Clear the lock on a batch of items.
pub(crate) async fn unlock_items(
    conn: &mut PgConnection,
    item_ids: &[DbId],
) -> Result<(), sqlx::Error> {
    if item_ids.is_empty() {
        return Ok(());
    }
    sqlx::query("UPDATE items SET locked = FALSE WHERE id = ANY($1)")
        .bind(item_ids)
        .execute(conn)
        .await?;
    Ok(())
}
