//! Route definitions for the `/privacy` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::privacy;
use crate::state::AppState;

/// Routes mounted at `/privacy`.
///
/// ```text
/// GET    /                -> get_settings
/// PUT    /                -> update_settings
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(privacy::get_settings).put(privacy::update_settings))
}
