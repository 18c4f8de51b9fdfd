//! Route definitions for the caller's own `/inventory`.

use axum::routing::get;
use axum::Router;

use crate::handlers::inventory;
use crate::state::AppState;

/// Routes mounted at `/inventory`.
///
/// ```text
/// GET    /                -> my_inventory
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(inventory::my_inventory))
}
