use tradepost_core::policy::MarketPolicy;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Marketplace policy ceilings.
    pub market: MarketPolicy,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            market: market_policy_from_env(),
        }
    }
}

/// Load the marketplace policy from environment variables with defaults.
///
/// | Env Var                             | Default            |
/// |-------------------------------------|--------------------|
/// | `MARKET_MIN_PRICE_CENTS`            | `1`                |
/// | `MARKET_MAX_PRICE_CENTS`            | `1000000`          |
/// | `MARKET_MAX_ACTIVE_LISTINGS`        | `10`               |
/// | `MARKET_MAX_ACTIVE_TRADES`          | `10`               |
/// | `MARKET_MAX_OFFERS_PER_TRADE`       | `20`               |
/// | `MARKET_DAILY_PURCHASE_LIMIT_CENTS` | `200000`           |
/// | `MARKET_COMMISSION_BPS`             | `500`              |
pub fn market_policy_from_env() -> MarketPolicy {
    let defaults = MarketPolicy::default();
    MarketPolicy {
        min_price_cents: env_i64("MARKET_MIN_PRICE_CENTS", defaults.min_price_cents),
        max_price_cents: env_i64("MARKET_MAX_PRICE_CENTS", defaults.max_price_cents),
        max_active_listings: env_i64("MARKET_MAX_ACTIVE_LISTINGS", defaults.max_active_listings),
        max_active_trades: env_i64("MARKET_MAX_ACTIVE_TRADES", defaults.max_active_trades),
        max_offers_per_trade: env_i64(
            "MARKET_MAX_OFFERS_PER_TRADE",
            defaults.max_offers_per_trade,
        ),
        daily_purchase_limit_cents: env_i64(
            "MARKET_DAILY_PURCHASE_LIMIT_CENTS",
            defaults.daily_purchase_limit_cents,
        ),
        commission_bps: env_u32("MARKET_COMMISSION_BPS", defaults.commission_bps),
    }
}

fn env_i64(name: &str, default: i64) -> i64 {
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .unwrap_or_else(|_| panic!("{name} must be a valid i64")),
        Err(_) => default,
    }
}

fn env_u32(name: &str, default: u32) -> u32 {
    match std::env::var(name) {
        Ok(value) => value
            .parse()
            .unwrap_or_else(|_| panic!("{name} must be a valid u32")),
        Err(_) => default,
    }
}
