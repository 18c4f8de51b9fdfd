//! Route definitions for public, privacy-gated user views.

use axum::routing::get;
use axum::Router;

use crate::handlers::inventory;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /{id}/inventory  -> user_inventory (privacy-gated)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}/inventory", get(inventory::user_inventory))
}
