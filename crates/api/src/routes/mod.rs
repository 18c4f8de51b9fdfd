pub mod health;
pub mod inventory;
pub mod marketplace;
pub mod privacy;
pub mod trading;
pub mod users;
pub mod wallet;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /marketplace                          browse (GET), list for sale (POST)
/// /marketplace/users/{id}               a seller's active listings
/// /marketplace/{id}/cancel              cancel listing (POST)
/// /marketplace/{id}/price               reprice (PUT)
/// /marketplace/{id}/purchase            purchase (POST)
///
/// /trades                               browse (GET), post trade (POST)
/// /trades/mine                          own trades
/// /trades/{id}/cancel                   cancel trade (POST)
/// /trades/{id}/offers                   list (GET), attach offer (POST)
/// /trades/offers/{id}/accept            accept offer (POST)
/// /trades/offers/{id}/reject            reject offer (POST)
/// /trades/offers/{id}/cancel            withdraw offer (POST)
///
/// /inventory                            own items
/// /users/{id}/inventory                 privacy-gated inventory view
///
/// /privacy                              own settings (GET, PUT)
///
/// /wallet                               balance + daily headroom
/// /wallet/transactions                  own ledger entries
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/marketplace", marketplace::router())
        .nest("/trades", trading::router())
        .nest("/inventory", inventory::router())
        .nest("/users", users::router())
        .nest("/privacy", privacy::router())
        .nest("/wallet", wallet::router())
}
