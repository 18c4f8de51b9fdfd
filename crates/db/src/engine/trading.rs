//! Atomic trade negotiation procedures: post, offer, accept, reject,
//! cancel. Accepting an offer performs the two-way ownership swap and
//! disposes of sibling offers in the same transaction.

use sqlx::{PgConnection, PgPool};
use tradepost_core::error::{CoreError, QuotaKind};
use tradepost_core::policy::MarketPolicy;
use tradepost_core::privacy::ResourceClass;
use tradepost_core::trading::{offer_is_open, offer_status, trade_is_open, trade_status};
use tradepost_core::types::DbId;

use crate::models::trade::{AcceptedTrade, Trade, TradeOffer};
use crate::repositories::{offer_repo, trade_repo, OfferRepo, PrivacyRepo, TradeRepo};

use super::{
    item_for_update, offer_for_update, set_item_locked, trade_for_update, transfer_item,
    unlock_items, EngineResult,
};

/// Post a trade for an owned, tradeable, unlocked item and lock the item.
pub async fn post_trade(
    pool: &PgPool,
    offerer_id: DbId,
    item_id: DbId,
    policy: &MarketPolicy,
) -> EngineResult<Trade> {
    let mut tx = pool.begin().await?;

    let item = item_for_update(&mut tx, item_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Item",
            id: item_id,
        })?;
    if item.owner_id != offerer_id {
        return Err(CoreError::Forbidden("You do not own this item".into()).into());
    }
    if !item.tradeable {
        return Err(CoreError::Validation("This item cannot be traded".into()).into());
    }
    if item.locked {
        return Err(
            CoreError::Conflict("Item is already part of a listing or trade".into()).into(),
        );
    }

    // Authoritative quota check, repeated under the item lock.
    let current = TradeRepo::count_pending_by_offerer(&mut *tx, offerer_id).await?;
    if current >= policy.max_active_trades {
        return Err(CoreError::QuotaExceeded {
            quota: QuotaKind::ActiveTrades,
            current,
            limit: policy.max_active_trades,
        }
        .into());
    }

    let query = format!(
        "INSERT INTO trades (item_id, offerer_id) VALUES ($1, $2) RETURNING {}",
        trade_repo::COLUMNS
    );
    let trade = sqlx::query_as::<_, Trade>(&query)
        .bind(item_id)
        .bind(offerer_id)
        .fetch_one(&mut *tx)
        .await?;

    set_item_locked(&mut tx, item_id, true).await?;

    tx.commit().await?;
    tracing::info!(trade_id = trade.id, offerer_id, item_id, "trade posted");
    Ok(trade)
}

/// Attach a counter-offer to a pending trade and lock the offered item.
pub async fn post_offer(
    pool: &PgPool,
    offerer_id: DbId,
    trade_id: DbId,
    item_id: DbId,
    policy: &MarketPolicy,
) -> EngineResult<TradeOffer> {
    let mut tx = pool.begin().await?;

    let trade = trade_for_update(&mut tx, trade_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Trade",
            id: trade_id,
        })?;
    if !trade_is_open(&trade.status) {
        return Err(CoreError::Conflict("Trade is no longer open".into()).into());
    }
    if trade.offerer_id == offerer_id {
        return Err(CoreError::Validation("You cannot offer on your own trade".into()).into());
    }

    // Authoritative privacy re-check (trade class, sender vs trade owner).
    PrivacyRepo::check_access_conn(&mut tx, trade.offerer_id, Some(offerer_id), ResourceClass::Trade)
        .await?
        .into_result()?;

    // The trade row lock serializes concurrent offers on the same trade,
    // so this count cannot be raced past the cap.
    let current = OfferRepo::count_pending_by_trade(&mut *tx, trade_id).await?;
    if current >= policy.max_offers_per_trade {
        return Err(CoreError::QuotaExceeded {
            quota: QuotaKind::OffersPerTrade,
            current,
            limit: policy.max_offers_per_trade,
        }
        .into());
    }

    if OfferRepo::pending_duplicate_exists(&mut *tx, trade_id, offerer_id, item_id).await? {
        return Err(CoreError::Conflict(
            "You already have a pending offer with this item on this trade".into(),
        )
        .into());
    }

    let item = item_for_update(&mut tx, item_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Item",
            id: item_id,
        })?;
    if item.owner_id != offerer_id {
        return Err(CoreError::Forbidden("You do not own this item".into()).into());
    }
    if !item.tradeable {
        return Err(CoreError::Validation("This item cannot be traded".into()).into());
    }
    if item.locked {
        return Err(
            CoreError::Conflict("Item is already part of a listing or trade".into()).into(),
        );
    }

    let query = format!(
        "INSERT INTO trade_offers (trade_id, offerer_id, item_id)
         VALUES ($1, $2, $3)
         RETURNING {}",
        offer_repo::COLUMNS
    );
    let offer = sqlx::query_as::<_, TradeOffer>(&query)
        .bind(trade_id)
        .bind(offerer_id)
        .bind(item_id)
        .fetch_one(&mut *tx)
        .await?;

    set_item_locked(&mut tx, item_id, true).await?;

    tx.commit().await?;
    tracing::info!(offer_id = offer.id, trade_id, offerer_id, item_id, "offer posted");
    Ok(offer)
}

/// Accept an offer: two-way ownership swap, unlock both items, complete
/// the trade, and reject-and-unlock every sibling pending offer.
///
/// Siblings are rejected rather than left pending: a pending offer
/// against a closed trade would strand the offered item's lock.
pub async fn accept_offer(
    pool: &PgPool,
    owner_id: DbId,
    offer_id: DbId,
) -> EngineResult<AcceptedTrade> {
    let mut tx = pool.begin().await?;

    // Lock order is trade before offer everywhere (cancel_trade touches
    // offers while holding the trade lock), so probe the offer unlocked
    // first to learn its trade.
    let probe = OfferRepo::find_by_id(&mut *tx, offer_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "TradeOffer",
            id: offer_id,
        })?;
    let trade = trade_for_update(&mut tx, probe.trade_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Trade",
            id: probe.trade_id,
        })?;
    let offer = offer_for_update(&mut tx, offer_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "TradeOffer",
            id: offer_id,
        })?;

    if trade.offerer_id != owner_id {
        return Err(CoreError::Forbidden("Only the trade owner can accept offers".into()).into());
    }
    if !offer_is_open(&offer.status) {
        return Err(CoreError::Conflict("Offer is already resolved".into()).into());
    }
    if !trade_is_open(&trade.status) {
        return Err(CoreError::Conflict("Trade is no longer open".into()).into());
    }

    // The swap: traded item to the counter-offerer, offered item to the
    // trade owner. Both unlock in the same statement.
    transfer_item(&mut tx, trade.item_id, offer.offerer_id).await?;
    transfer_item(&mut tx, offer.item_id, trade.offerer_id).await?;

    let offer_query = format!(
        "UPDATE trade_offers SET status = $2 WHERE id = $1 RETURNING {}",
        offer_repo::COLUMNS
    );
    let accepted = sqlx::query_as::<_, TradeOffer>(&offer_query)
        .bind(offer_id)
        .bind(offer_status::ACCEPTED)
        .fetch_one(&mut *tx)
        .await?;

    let trade_query = format!(
        "UPDATE trades SET status = $2 WHERE id = $1 RETURNING {}",
        trade_repo::COLUMNS
    );
    let completed = sqlx::query_as::<_, Trade>(&trade_query)
        .bind(trade.id)
        .bind(trade_status::COMPLETED)
        .fetch_one(&mut *tx)
        .await?;

    resolve_sibling_offers(&mut tx, trade.id, offer_id, offer_status::REJECTED).await?;

    tx.commit().await?;
    tracing::info!(
        trade_id = trade.id,
        offer_id,
        trade_owner = trade.offerer_id,
        counter_offerer = accepted.offerer_id,
        "trade completed"
    );
    Ok(AcceptedTrade {
        trade: completed,
        offer: accepted,
    })
}

/// Reject a pending offer (trade owner only) and unlock its item.
pub async fn reject_offer(
    pool: &PgPool,
    owner_id: DbId,
    offer_id: DbId,
) -> EngineResult<TradeOffer> {
    let mut tx = pool.begin().await?;

    // Same trade-before-offer lock order as accept_offer.
    let probe = OfferRepo::find_by_id(&mut *tx, offer_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "TradeOffer",
            id: offer_id,
        })?;
    let trade = trade_for_update(&mut tx, probe.trade_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Trade",
            id: probe.trade_id,
        })?;
    let offer = offer_for_update(&mut tx, offer_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "TradeOffer",
            id: offer_id,
        })?;
    if trade.offerer_id != owner_id {
        return Err(CoreError::Forbidden("Only the trade owner can reject offers".into()).into());
    }
    if !offer_is_open(&offer.status) {
        return Err(CoreError::Conflict("Offer is already resolved".into()).into());
    }

    let resolved = resolve_offer(&mut tx, offer_id, offer_status::REJECTED).await?;
    set_item_locked(&mut tx, offer.item_id, false).await?;

    tx.commit().await?;
    tracing::info!(offer_id, trade_id = offer.trade_id, "offer rejected");
    Ok(resolved)
}

/// Cancel one's own pending offer and unlock its item.
pub async fn cancel_offer(
    pool: &PgPool,
    offerer_id: DbId,
    offer_id: DbId,
) -> EngineResult<TradeOffer> {
    let mut tx = pool.begin().await?;

    let offer = offer_for_update(&mut tx, offer_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "TradeOffer",
            id: offer_id,
        })?;
    if offer.offerer_id != offerer_id {
        return Err(CoreError::Forbidden("Only the offerer can cancel this offer".into()).into());
    }
    if !offer_is_open(&offer.status) {
        return Err(CoreError::Conflict("Offer is already resolved".into()).into());
    }

    let resolved = resolve_offer(&mut tx, offer_id, offer_status::CANCELLED).await?;
    set_item_locked(&mut tx, offer.item_id, false).await?;

    tx.commit().await?;
    tracing::info!(offer_id, trade_id = offer.trade_id, "offer cancelled");
    Ok(resolved)
}

/// Cancel one's own pending trade, unlock its item, and release every
/// still-pending offer (cascade).
pub async fn cancel_trade(pool: &PgPool, offerer_id: DbId, trade_id: DbId) -> EngineResult<Trade> {
    let mut tx = pool.begin().await?;

    let trade = trade_for_update(&mut tx, trade_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Trade",
            id: trade_id,
        })?;
    if trade.offerer_id != offerer_id {
        return Err(CoreError::Forbidden("Only the trade owner can cancel this trade".into()).into());
    }
    if !trade_is_open(&trade.status) {
        return Err(CoreError::Conflict("Trade is no longer open".into()).into());
    }

    let query = format!(
        "UPDATE trades SET status = $2 WHERE id = $1 RETURNING {}",
        trade_repo::COLUMNS
    );
    let cancelled = sqlx::query_as::<_, Trade>(&query)
        .bind(trade_id)
        .bind(trade_status::CANCELLED)
        .fetch_one(&mut *tx)
        .await?;

    set_item_locked(&mut tx, trade.item_id, false).await?;

    // Pending offers are cancelled (nobody rejected them) and their items
    // released in the same transaction.
    resolve_sibling_offers(&mut tx, trade_id, 0, offer_status::CANCELLED).await?;

    tx.commit().await?;
    tracing::info!(trade_id, offerer_id, "trade cancelled");
    Ok(cancelled)
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// Set a single offer's status, returning the updated row.
async fn resolve_offer(
    conn: &mut PgConnection,
    offer_id: DbId,
    status: &str,
) -> Result<TradeOffer, sqlx::Error> {
    let query = format!(
        "UPDATE trade_offers SET status = $2 WHERE id = $1 RETURNING {}",
        offer_repo::COLUMNS
    );
    sqlx::query_as::<_, TradeOffer>(&query)
        .bind(offer_id)
        .bind(status)
        .fetch_one(conn)
        .await
}

/// Resolve every pending offer on a trade except `keep_offer_id` to
/// `status` and unlock the affected items.
async fn resolve_sibling_offers(
    conn: &mut PgConnection,
    trade_id: DbId,
    keep_offer_id: DbId,
    status: &str,
) -> Result<(), sqlx::Error> {
    let released: Vec<(DbId,)> = sqlx::query_as(
        "UPDATE trade_offers SET status = $3
         WHERE trade_id = $1 AND status = $4 AND id <> $2
         RETURNING item_id",
    )
    .bind(trade_id)
    .bind(keep_offer_id)
    .bind(status)
    .bind(offer_status::PENDING)
    .fetch_all(&mut *conn)
    .await?;

    let item_ids: Vec<DbId> = released.into_iter().map(|(id,)| id).collect();
    unlock_items(conn, &item_ids).await
}
