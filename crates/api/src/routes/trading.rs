//! Route definitions for the `/trades` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::trading;
use crate::state::AppState;

/// Routes mounted at `/trades`.
///
/// ```text
/// GET    /                        -> browse
/// POST   /                        -> create_trade
/// GET    /mine                    -> my_trades
/// POST   /{id}/cancel             -> cancel_trade
/// GET    /{id}/offers             -> trade_offers
/// POST   /{id}/offers             -> create_offer
/// POST   /offers/{id}/accept      -> accept_offer
/// POST   /offers/{id}/reject      -> reject_offer
/// POST   /offers/{id}/cancel      -> cancel_offer
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(trading::browse).post(trading::create_trade))
        .route("/mine", get(trading::my_trades))
        .route("/{id}/cancel", post(trading::cancel_trade))
        .route(
            "/{id}/offers",
            get(trading::trade_offers).post(trading::create_offer),
        )
        .route("/offers/{id}/accept", post(trading::accept_offer))
        .route("/offers/{id}/reject", post(trading::reject_offer))
        .route("/offers/{id}/cancel", post(trading::cancel_offer))
}
