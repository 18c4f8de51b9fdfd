//! Handlers for one's own privacy settings.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use tradepost_core::privacy::PrivacyLevel;
use tradepost_db::models::privacy::{PrivacySettings, UpdatePrivacySettings};
use tradepost_db::repositories::PrivacyRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// The caller-facing view of privacy settings.
///
/// A user who never customized anything has no settings row; the view
/// then shows the defaults.
#[derive(Debug, Serialize)]
pub struct PrivacyView {
    pub inventory: String,
    pub trade: String,
    pub marketplace: String,
}

impl PrivacyView {
    fn defaults() -> Self {
        let public = PrivacyLevel::Public.as_str().to_string();
        Self {
            inventory: public.clone(),
            trade: public.clone(),
            marketplace: public,
        }
    }
}

impl From<PrivacySettings> for PrivacyView {
    fn from(row: PrivacySettings) -> Self {
        Self {
            inventory: row.inventory,
            trade: row.trade,
            marketplace: row.marketplace,
        }
    }
}

/// GET /api/v1/privacy
///
/// The caller's privacy settings (defaults if never customized).
pub async fn get_settings(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<PrivacyView>>> {
    let view = PrivacyRepo::find_by_user(&state.pool, user.user_id)
        .await?
        .map(PrivacyView::from)
        .unwrap_or_else(PrivacyView::defaults);
    Ok(Json(DataResponse { data: view }))
}

/// PUT /api/v1/privacy
///
/// Patch the caller's privacy settings. Omitted classes keep their
/// current level; levels deserialize strictly, so an unknown value is a
/// 400 before anything is stored.
pub async fn update_settings(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<UpdatePrivacySettings>,
) -> AppResult<Json<DataResponse<PrivacyView>>> {
    let updated = PrivacyRepo::update(&state.pool, user.user_id, &body).await?;
    Ok(Json(DataResponse {
        data: PrivacyView::from(updated),
    }))
}
