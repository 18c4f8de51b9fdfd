//! Handlers for the caller's wallet and ledger.

use axum::extract::{Query, State};
use axum::Json;
use serde::Serialize;
use tradepost_core::error::CoreError;
use tradepost_db::models::wallet::WalletTransaction;
use tradepost_db::repositories::{UserRepo, WalletRepo};

use crate::error::AppResult;
use crate::handlers::marketplace::PageQuery;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Balance plus the day's remaining purchase headroom.
#[derive(Debug, Serialize)]
pub struct WalletSummary {
    pub balance_cents: i64,
    pub daily_spent_cents: i64,
    pub daily_limit_cents: i64,
    pub daily_remaining_cents: i64,
}

/// GET /api/v1/wallet
///
/// The caller's balance and daily purchase headroom, derived fresh from
/// the ledger.
pub async fn summary(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<WalletSummary>>> {
    let account = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: user.user_id,
        })?;
    let spent = WalletRepo::daily_spend_cents(&state.pool, user.user_id).await?;
    let limit = state.config.market.daily_purchase_limit_cents;

    Ok(Json(DataResponse {
        data: WalletSummary {
            balance_cents: account.balance_cents,
            daily_spent_cents: spent,
            daily_limit_cents: limit,
            daily_remaining_cents: (limit - spent).max(0),
        },
    }))
}

/// GET /api/v1/wallet/transactions
///
/// The caller's ledger entries, newest first.
pub async fn transactions(
    State(state): State<AppState>,
    user: AuthUser,
    Query(page): Query<PageQuery>,
) -> AppResult<Json<DataResponse<Vec<WalletTransaction>>>> {
    let (limit, offset) = page.bounds();
    let entries = WalletRepo::list_by_user(&state.pool, user.user_id, limit, offset).await?;
    Ok(Json(DataResponse { data: entries }))
}
