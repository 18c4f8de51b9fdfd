//! Handlers for inventory views.

use axum::extract::{Path, State};
use axum::Json;
use tradepost_core::privacy::ResourceClass;
use tradepost_core::types::DbId;
use tradepost_db::models::item::Item;
use tradepost_db::repositories::{ItemRepo, PrivacyRepo};

use crate::error::AppResult;
use crate::handlers::validate_id;
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/inventory
///
/// The caller's own items.
pub async fn my_inventory(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Item>>>> {
    let items = ItemRepo::list_by_owner(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: items }))
}

/// GET /api/v1/users/{id}/inventory
///
/// Another user's items, gated by the owner's `inventory` privacy
/// setting. An empty inventory is a normal result.
pub async fn user_inventory(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Path(owner_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Item>>>> {
    validate_id(owner_id, "user")?;

    PrivacyRepo::check_access(
        &state.pool,
        owner_id,
        viewer.user_id(),
        ResourceClass::Inventory,
    )
    .await?
    .into_result()?;

    let items = ItemRepo::list_by_owner(&state.pool, owner_id).await?;
    Ok(Json(DataResponse { data: items }))
}
