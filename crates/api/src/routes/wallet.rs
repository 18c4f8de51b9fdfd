//! Route definitions for the `/wallet` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::wallet;
use crate::state::AppState;

/// Routes mounted at `/wallet`.
///
/// ```text
/// GET    /                -> summary
/// GET    /transactions    -> transactions
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(wallet::summary))
        .route("/transactions", get(wallet::transactions))
}
