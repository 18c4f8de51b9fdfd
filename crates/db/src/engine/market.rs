//! Atomic marketplace listing procedures: list, cancel, reprice, purchase.

use sqlx::PgPool;
use tradepost_core::error::{CoreError, QuotaKind};
use tradepost_core::market::{listing_status, validate_price};
use tradepost_core::money::{commission_cents, seller_receives_cents};
use tradepost_core::policy::MarketPolicy;
use tradepost_core::privacy::ResourceClass;
use tradepost_core::types::DbId;

use crate::models::listing::{Listing, RepriceOutcome};
use crate::models::wallet::{tx_type, PurchaseReceipt, WalletTransaction};
use crate::repositories::{listing_repo, wallet_repo, ListingRepo, PrivacyRepo, UserRepo, WalletRepo};

use super::{
    item_for_update, listing_for_update, lock_user_balances, set_item_locked, transfer_item,
    EngineResult,
};

/// Create an `active` listing for an owned, marketable, unlocked item and
/// lock the item, atomically.
pub async fn list_for_sale(
    pool: &PgPool,
    seller_id: DbId,
    item_id: DbId,
    price_cents: i64,
    policy: &MarketPolicy,
) -> EngineResult<Listing> {
    validate_price(price_cents, policy)?;

    let mut tx = pool.begin().await?;

    let item = item_for_update(&mut tx, item_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Item",
            id: item_id,
        })?;
    if item.owner_id != seller_id {
        return Err(CoreError::Forbidden("You do not own this item".into()).into());
    }
    if !item.marketable {
        return Err(CoreError::Validation("This item cannot be sold".into()).into());
    }
    if item.locked {
        return Err(
            CoreError::Conflict("Item is already part of a listing or trade".into()).into(),
        );
    }

    // Authoritative quota check, repeated under the item lock.
    let current = ListingRepo::count_active_by_seller(&mut *tx, seller_id).await?;
    if current >= policy.max_active_listings {
        return Err(CoreError::QuotaExceeded {
            quota: QuotaKind::ActiveListings,
            current,
            limit: policy.max_active_listings,
        }
        .into());
    }

    let query = format!(
        "INSERT INTO marketplace_listings (item_id, seller_id, price_cents)
         VALUES ($1, $2, $3)
         RETURNING {}",
        listing_repo::COLUMNS
    );
    let listing = sqlx::query_as::<_, Listing>(&query)
        .bind(item_id)
        .bind(seller_id)
        .bind(price_cents)
        .fetch_one(&mut *tx)
        .await?;

    set_item_locked(&mut tx, item_id, true).await?;

    tx.commit().await?;
    tracing::info!(listing_id = listing.id, seller_id, item_id, price_cents, "listing created");
    Ok(listing)
}

/// Cancel an `active` listing and unlock its item.
pub async fn cancel_listing(
    pool: &PgPool,
    seller_id: DbId,
    listing_id: DbId,
) -> EngineResult<Listing> {
    let mut tx = pool.begin().await?;

    let listing = listing_for_update(&mut tx, listing_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Listing",
            id: listing_id,
        })?;
    if listing.seller_id != seller_id {
        return Err(CoreError::Forbidden("Only the seller can cancel this listing".into()).into());
    }
    if listing.status != listing_status::ACTIVE {
        return Err(CoreError::Conflict("Listing is no longer active".into()).into());
    }

    let query = format!(
        "UPDATE marketplace_listings SET status = $2 WHERE id = $1 RETURNING {}",
        listing_repo::COLUMNS
    );
    let cancelled = sqlx::query_as::<_, Listing>(&query)
        .bind(listing_id)
        .bind(listing_status::CANCELLED)
        .fetch_one(&mut *tx)
        .await?;

    set_item_locked(&mut tx, listing.item_id, false).await?;

    tx.commit().await?;
    tracing::info!(listing_id, seller_id, "listing cancelled");
    Ok(cancelled)
}

/// Change the price of an `active` listing.
///
/// Repricing to the current price is an idempotent no-op: the row
/// (including `updated_at`) is untouched and the outcome is flagged
/// `unchanged`.
pub async fn update_price(
    pool: &PgPool,
    seller_id: DbId,
    listing_id: DbId,
    new_price_cents: i64,
    policy: &MarketPolicy,
) -> EngineResult<RepriceOutcome> {
    validate_price(new_price_cents, policy)?;

    let mut tx = pool.begin().await?;

    let listing = listing_for_update(&mut tx, listing_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Listing",
            id: listing_id,
        })?;
    if listing.seller_id != seller_id {
        return Err(CoreError::Forbidden("Only the seller can reprice this listing".into()).into());
    }
    if listing.status != listing_status::ACTIVE {
        return Err(CoreError::Conflict("Listing is no longer active".into()).into());
    }

    if listing.price_cents == new_price_cents {
        tx.commit().await?;
        return Ok(RepriceOutcome {
            listing,
            unchanged: true,
        });
    }

    let query = format!(
        "UPDATE marketplace_listings SET price_cents = $2 WHERE id = $1 RETURNING {}",
        listing_repo::COLUMNS
    );
    let updated = sqlx::query_as::<_, Listing>(&query)
        .bind(listing_id)
        .bind(new_price_cents)
        .fetch_one(&mut *tx)
        .await?;

    tx.commit().await?;
    tracing::info!(listing_id, seller_id, new_price_cents, "listing repriced");
    Ok(RepriceOutcome {
        listing: updated,
        unchanged: false,
    })
}

/// Purchase an active listing.
///
/// The charged amount is the listing row's persisted price, re-read under
/// the row lock -- caller input never reaches the ledger. A replayed
/// idempotency key returns the original receipt without re-charging.
/// Exactly one of two concurrent purchases of the same listing succeeds;
/// the loser observes the `sold` status after the winner commits.
pub async fn purchase(
    pool: &PgPool,
    buyer_id: DbId,
    listing_id: DbId,
    idempotency_key: &str,
    policy: &MarketPolicy,
) -> EngineResult<PurchaseReceipt> {
    if idempotency_key.trim().is_empty() {
        return Err(CoreError::Validation("Idempotency key must not be empty".into()).into());
    }

    let mut tx = pool.begin().await?;

    // Lock the listing first (when it exists) so a concurrent retry with
    // the same key blocks here and then sees the winner's ledger row.
    let listing = listing_for_update(&mut tx, listing_id).await?;

    if let Some(original) =
        WalletRepo::find_by_idempotency_key(&mut *tx, buyer_id, idempotency_key).await?
    {
        if original.listing_id != Some(listing_id) {
            return Err(CoreError::Conflict(
                "Idempotency key was already used for a different purchase".into(),
            )
            .into());
        }
        let listing = listing.ok_or_else(|| {
            CoreError::Internal("Ledger references a missing listing".into())
        })?;
        tx.commit().await?;
        tracing::info!(listing_id, buyer_id, idempotency_key, "purchase replayed");
        return Ok(replayed_receipt(original, listing, policy));
    }

    let listing = match listing {
        Some(l) if l.status == listing_status::ACTIVE => l,
        // Missing and not-active are indistinguishable to the buyer.
        _ => return Err(CoreError::ListingNotAvailable.into()),
    };
    if listing.seller_id == buyer_id {
        return Err(CoreError::Validation("You cannot buy your own listing".into()).into());
    }

    // Authoritative privacy re-check (marketplace class, buyer vs seller).
    PrivacyRepo::check_access_conn(
        &mut tx,
        listing.seller_id,
        Some(buyer_id),
        ResourceClass::Marketplace,
    )
    .await?
    .into_result()?;

    // Authoritative daily-limit re-check against the ledger.
    let spent = WalletRepo::daily_spend_cents(&mut *tx, buyer_id).await?;
    if spent + listing.price_cents > policy.daily_purchase_limit_cents {
        return Err(CoreError::DailyLimitExceeded {
            spent_cents: spent,
            limit_cents: policy.daily_purchase_limit_cents,
        }
        .into());
    }

    let balances = lock_user_balances(&mut tx, buyer_id, listing.seller_id).await?;
    let buyer_balance = balances
        .iter()
        .find(|(id, _)| *id == buyer_id)
        .map(|(_, b)| *b)
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: buyer_id,
        })?;
    if buyer_balance < listing.price_cents {
        return Err(CoreError::InsufficientFunds {
            required_cents: listing.price_cents,
            available_cents: buyer_balance,
        }
        .into());
    }

    let commission = commission_cents(listing.price_cents, policy.commission_bps);
    let seller_credit = seller_receives_cents(listing.price_cents, policy.commission_bps);

    UserRepo::adjust_balance(&mut *tx, buyer_id, -listing.price_cents)
        .await?
        .ok_or_else(|| CoreError::Internal("Buyer balance update failed".into()))?;
    UserRepo::adjust_balance(&mut *tx, listing.seller_id, seller_credit)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: listing.seller_id,
        })?;

    let query = format!(
        "UPDATE marketplace_listings SET status = $2 WHERE id = $1 RETURNING {}",
        listing_repo::COLUMNS
    );
    let sold = sqlx::query_as::<_, Listing>(&query)
        .bind(listing_id)
        .bind(listing_status::SOLD)
        .fetch_one(&mut *tx)
        .await?;

    transfer_item(&mut tx, listing.item_id, buyer_id).await?;

    let insert = format!(
        "INSERT INTO wallet_transactions
             (user_id, listing_id, amount_cents, tx_type, idempotency_key)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING {}",
        wallet_repo::COLUMNS
    );
    let transaction = sqlx::query_as::<_, WalletTransaction>(&insert)
        .bind(buyer_id)
        .bind(listing_id)
        .bind(-listing.price_cents)
        .bind(tx_type::PURCHASE)
        .bind(idempotency_key)
        .fetch_one(&mut *tx)
        .await?;

    sqlx::query(
        "INSERT INTO wallet_transactions (user_id, listing_id, amount_cents, tx_type)
         VALUES ($1, $2, $3, $4)",
    )
    .bind(listing.seller_id)
    .bind(listing_id)
    .bind(seller_credit)
    .bind(tx_type::SALE)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    tracing::info!(
        listing_id,
        buyer_id,
        seller_id = listing.seller_id,
        price_cents = listing.price_cents,
        commission_cents = commission,
        "purchase completed"
    );
    Ok(PurchaseReceipt {
        transaction,
        listing: sold,
        commission_cents: commission,
        seller_receives_cents: seller_credit,
        already_processed: false,
    })
}

/// Build the receipt for an idempotent replay from the original ledger row.
fn replayed_receipt(
    original: WalletTransaction,
    listing: Listing,
    policy: &MarketPolicy,
) -> PurchaseReceipt {
    let commission = commission_cents(listing.price_cents, policy.commission_bps);
    PurchaseReceipt {
        transaction: original,
        commission_cents: commission,
        seller_receives_cents: listing.price_cents - commission,
        listing,
        already_processed: true,
    }
}
