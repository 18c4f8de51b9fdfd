//! Handlers for the `/trades` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tradepost_core::error::{CoreError, QuotaKind};
use tradepost_core::privacy::ResourceClass;
use tradepost_core::trading::trade_is_open;
use tradepost_core::types::DbId;
use tradepost_db::engine::trading;
use tradepost_db::models::trade::{AcceptedTrade, Trade, TradeOffer};
use tradepost_db::repositories::{OfferRepo, PrivacyRepo, TradeRepo};

use crate::error::AppResult;
use crate::handlers::marketplace::PageQuery;
use crate::handlers::validate_id;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body for posting a trade.
#[derive(Debug, Deserialize)]
pub struct CreateTradeRequest {
    pub item_id: DbId,
}

/// Body for attaching an offer to a trade.
#[derive(Debug, Deserialize)]
pub struct CreateOfferRequest {
    pub item_id: DbId,
}

/// GET /api/v1/trades
///
/// Browse pending trades, newest first. Public; an empty page is a
/// normal result, never an error.
pub async fn browse(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> AppResult<Json<DataResponse<Vec<Trade>>>> {
    let (limit, offset) = page.bounds();
    let trades = TradeRepo::list_pending(&state.pool, limit, offset).await?;
    Ok(Json(DataResponse { data: trades }))
}

/// GET /api/v1/trades/mine
///
/// The caller's trades, any status.
pub async fn my_trades(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Trade>>>> {
    let trades = TradeRepo::list_by_offerer(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: trades }))
}

/// GET /api/v1/trades/{id}/offers
///
/// Offers on one's own trade.
pub async fn trade_offers(
    State(state): State<AppState>,
    user: AuthUser,
    Path(trade_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<TradeOffer>>>> {
    validate_id(trade_id, "trade")?;

    let trade = TradeRepo::find_by_id(&state.pool, trade_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Trade",
            id: trade_id,
        })?;
    if trade.offerer_id != user.user_id {
        return Err(CoreError::Forbidden("Only the trade owner can view offers".into()).into());
    }

    let offers = OfferRepo::list_by_trade(&state.pool, trade_id).await?;
    Ok(Json(DataResponse { data: offers }))
}

/// POST /api/v1/trades
///
/// Post a trade for an owned item. Advisory quota check here; the engine
/// repeats it inside the transaction.
pub async fn create_trade(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<CreateTradeRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Trade>>)> {
    validate_id(body.item_id, "item")?;

    let current = TradeRepo::count_pending_by_offerer(&state.pool, user.user_id).await?;
    if current >= state.config.market.max_active_trades {
        return Err(CoreError::QuotaExceeded {
            quota: QuotaKind::ActiveTrades,
            current,
            limit: state.config.market.max_active_trades,
        }
        .into());
    }

    let trade =
        trading::post_trade(&state.pool, user.user_id, body.item_id, &state.config.market).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: trade })))
}

/// POST /api/v1/trades/{id}/cancel
///
/// Cancel one's own pending trade; pending offers are released too.
pub async fn cancel_trade(
    State(state): State<AppState>,
    user: AuthUser,
    Path(trade_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Trade>>> {
    validate_id(trade_id, "trade")?;
    let trade = trading::cancel_trade(&state.pool, user.user_id, trade_id).await?;
    Ok(Json(DataResponse { data: trade }))
}

/// POST /api/v1/trades/{id}/offers
///
/// Attach a counter-offer to a pending trade. Advisory checks (privacy,
/// offer cap, duplicate) here; the engine repeats them under lock.
pub async fn create_offer(
    State(state): State<AppState>,
    user: AuthUser,
    Path(trade_id): Path<DbId>,
    Json(body): Json<CreateOfferRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<TradeOffer>>)> {
    validate_id(trade_id, "trade")?;
    validate_id(body.item_id, "item")?;

    let trade = TradeRepo::find_by_id(&state.pool, trade_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Trade",
            id: trade_id,
        })?;
    if trade_is_open(&trade.status) && trade.offerer_id != user.user_id {
        PrivacyRepo::check_access(
            &state.pool,
            trade.offerer_id,
            Some(user.user_id),
            ResourceClass::Trade,
        )
        .await?
        .into_result()?;

        let current = OfferRepo::count_pending_by_trade(&state.pool, trade_id).await?;
        if current >= state.config.market.max_offers_per_trade {
            return Err(CoreError::QuotaExceeded {
                quota: QuotaKind::OffersPerTrade,
                current,
                limit: state.config.market.max_offers_per_trade,
            }
            .into());
        }

        if OfferRepo::pending_duplicate_exists(&state.pool, trade_id, user.user_id, body.item_id)
            .await?
        {
            return Err(CoreError::Conflict(
                "You already have a pending offer with this item on this trade".into(),
            )
            .into());
        }
    }

    let offer = trading::post_offer(
        &state.pool,
        user.user_id,
        trade_id,
        body.item_id,
        &state.config.market,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: offer })))
}

/// POST /api/v1/trades/offers/{id}/accept
///
/// Accept an offer on one's own trade; items swap owners atomically.
pub async fn accept_offer(
    State(state): State<AppState>,
    user: AuthUser,
    Path(offer_id): Path<DbId>,
) -> AppResult<Json<DataResponse<AcceptedTrade>>> {
    validate_id(offer_id, "offer")?;
    let accepted = trading::accept_offer(&state.pool, user.user_id, offer_id).await?;
    Ok(Json(DataResponse { data: accepted }))
}

/// POST /api/v1/trades/offers/{id}/reject
///
/// Reject an offer on one's own trade; the offered item unlocks.
pub async fn reject_offer(
    State(state): State<AppState>,
    user: AuthUser,
    Path(offer_id): Path<DbId>,
) -> AppResult<Json<DataResponse<TradeOffer>>> {
    validate_id(offer_id, "offer")?;
    let offer = trading::reject_offer(&state.pool, user.user_id, offer_id).await?;
    Ok(Json(DataResponse { data: offer }))
}

/// POST /api/v1/trades/offers/{id}/cancel
///
/// Withdraw one's own pending offer; the offered item unlocks.
pub async fn cancel_offer(
    State(state): State<AppState>,
    user: AuthUser,
    Path(offer_id): Path<DbId>,
) -> AppResult<Json<DataResponse<TradeOffer>>> {
    validate_id(offer_id, "offer")?;
    let offer = trading::cancel_offer(&state.pool, user.user_id, offer_id).await?;
    Ok(Json(DataResponse { data: offer }))
}
