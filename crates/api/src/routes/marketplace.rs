//! Route definitions for the `/marketplace` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::marketplace;
use crate::state::AppState;

/// Routes mounted at `/marketplace`.
///
/// ```text
/// GET    /                    -> browse
/// POST   /                    -> create_listing
/// GET    /users/{id}          -> seller_listings
/// POST   /{id}/cancel         -> cancel_listing
/// PUT    /{id}/price          -> update_price
/// POST   /{id}/purchase       -> purchase
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(marketplace::browse).post(marketplace::create_listing))
        .route("/users/{id}", get(marketplace::seller_listings))
        .route("/{id}/cancel", post(marketplace::cancel_listing))
        .route("/{id}/price", put(marketplace::update_price))
        .route("/{id}/purchase", post(marketplace::purchase))
}
