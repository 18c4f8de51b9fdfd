//! Handlers for the `/marketplace` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tradepost_core::error::{CoreError, QuotaKind};
use tradepost_core::market::listing_status;
use tradepost_core::money::price_to_cents;
use tradepost_core::privacy::ResourceClass;
use tradepost_core::types::DbId;
use tradepost_db::engine::market;
use tradepost_db::models::listing::{Listing, RepriceOutcome};
use tradepost_db::models::wallet::PurchaseReceipt;
use tradepost_db::repositories::{ListingRepo, PrivacyRepo, WalletRepo};

use crate::error::AppResult;
use crate::handlers::validate_id;
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for paginated browse endpoints.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PageQuery {
    /// Clamp to sane bounds (1..=100, offset >= 0).
    pub fn bounds(&self) -> (i64, i64) {
        let limit = self.limit.unwrap_or(50).clamp(1, 100);
        let offset = self.offset.unwrap_or(0).max(0);
        (limit, offset)
    }
}

/// Body for creating a listing.
#[derive(Debug, Deserialize)]
pub struct CreateListingRequest {
    pub item_id: DbId,
    /// Price in dollars, at most two decimal places.
    pub price: f64,
}

/// Body for repricing a listing.
#[derive(Debug, Deserialize)]
pub struct UpdatePriceRequest {
    /// New price in dollars, at most two decimal places.
    pub price: f64,
}

/// Body for purchasing a listing.
#[derive(Debug, Deserialize)]
pub struct PurchaseRequest {
    /// Caller-supplied token making a retried purchase safe.
    pub idempotency_key: String,
}

/// GET /api/v1/marketplace
///
/// Browse active listings, newest first. Public; an empty page is a
/// normal result.
pub async fn browse(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> AppResult<Json<DataResponse<Vec<Listing>>>> {
    let (limit, offset) = page.bounds();
    let listings = ListingRepo::list_active(&state.pool, limit, offset).await?;
    Ok(Json(DataResponse { data: listings }))
}

/// GET /api/v1/marketplace/users/{id}
///
/// A seller's active listings, gated by the seller's `marketplace`
/// privacy setting.
pub async fn seller_listings(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Path(seller_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Listing>>>> {
    validate_id(seller_id, "user")?;

    PrivacyRepo::check_access(
        &state.pool,
        seller_id,
        viewer.user_id(),
        ResourceClass::Marketplace,
    )
    .await?
    .into_result()?;

    let listings = ListingRepo::list_active_by_seller(&state.pool, seller_id).await?;
    Ok(Json(DataResponse { data: listings }))
}

/// POST /api/v1/marketplace
///
/// List an owned item for sale. The advisory quota check here gives an
/// early rejection; the engine repeats it inside the transaction.
pub async fn create_listing(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<CreateListingRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Listing>>)> {
    validate_id(body.item_id, "item")?;
    let price_cents = price_to_cents(body.price)?;

    let current =
        ListingRepo::count_active_by_seller(&state.pool, user.user_id).await?;
    if current >= state.config.market.max_active_listings {
        return Err(CoreError::QuotaExceeded {
            quota: QuotaKind::ActiveListings,
            current,
            limit: state.config.market.max_active_listings,
        }
        .into());
    }

    let listing = market::list_for_sale(
        &state.pool,
        user.user_id,
        body.item_id,
        price_cents,
        &state.config.market,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: listing })))
}

/// POST /api/v1/marketplace/{id}/cancel
///
/// Cancel one's own active listing; the item unlocks.
pub async fn cancel_listing(
    State(state): State<AppState>,
    user: AuthUser,
    Path(listing_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Listing>>> {
    validate_id(listing_id, "listing")?;
    let listing = market::cancel_listing(&state.pool, user.user_id, listing_id).await?;
    Ok(Json(DataResponse { data: listing }))
}

/// PUT /api/v1/marketplace/{id}/price
///
/// Reprice one's own active listing. Repricing to the current price is an
/// idempotent no-op flagged `unchanged` in the response.
pub async fn update_price(
    State(state): State<AppState>,
    user: AuthUser,
    Path(listing_id): Path<DbId>,
    Json(body): Json<UpdatePriceRequest>,
) -> AppResult<Json<DataResponse<RepriceOutcome>>> {
    validate_id(listing_id, "listing")?;
    let price_cents = price_to_cents(body.price)?;

    let outcome = market::update_price(
        &state.pool,
        user.user_id,
        listing_id,
        price_cents,
        &state.config.market,
    )
    .await?;
    Ok(Json(DataResponse { data: outcome }))
}

/// POST /api/v1/marketplace/{id}/purchase
///
/// Purchase an active listing. Privacy and daily-limit rejections happen
/// here, before any transaction starts; the engine re-checks both under
/// lock and its failure is the one surfaced in a race.
pub async fn purchase(
    State(state): State<AppState>,
    user: AuthUser,
    Path(listing_id): Path<DbId>,
    Json(body): Json<PurchaseRequest>,
) -> AppResult<Json<DataResponse<PurchaseReceipt>>> {
    validate_id(listing_id, "listing")?;

    // Advisory reads: listing snapshot, privacy, daily headroom. All are
    // re-verified inside the purchase transaction.
    let listing = ListingRepo::find_by_id(&state.pool, listing_id).await?;
    if let Some(listing) = &listing {
        if listing.status == listing_status::ACTIVE && listing.seller_id != user.user_id {
            PrivacyRepo::check_access(
                &state.pool,
                listing.seller_id,
                Some(user.user_id),
                ResourceClass::Marketplace,
            )
            .await?
            .into_result()?;

            let spent = WalletRepo::daily_spend_cents(&state.pool, user.user_id).await?;
            if spent + listing.price_cents > state.config.market.daily_purchase_limit_cents {
                return Err(CoreError::DailyLimitExceeded {
                    spent_cents: spent,
                    limit_cents: state.config.market.daily_purchase_limit_cents,
                }
                .into());
            }
        }
    }

    let receipt = market::purchase(
        &state.pool,
        user.user_id,
        listing_id,
        &body.idempotency_key,
        &state.config.market,
    )
    .await?;
    Ok(Json(DataResponse { data: receipt }))
}
