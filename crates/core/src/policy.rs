//! Marketplace policy ceilings.
//!
//! Every caller-visible limit lives here as configuration rather than as a
//! literal at a call site. Handlers use these for advisory pre-checks; the
//! transactional engine re-checks the same values under lock.

/// Default maximum number of `active` listings per seller.
pub const DEFAULT_MAX_ACTIVE_LISTINGS: i64 = 10;

/// Default maximum number of `pendiente` trades per user.
pub const DEFAULT_MAX_ACTIVE_TRADES: i64 = 10;

/// Default maximum number of `pendiente` offers on a single trade.
pub const DEFAULT_MAX_OFFERS_PER_TRADE: i64 = 20;

/// Default daily purchase ceiling in cents ($2,000).
pub const DEFAULT_DAILY_PURCHASE_LIMIT_CENTS: i64 = 200_000;

/// Default minimum listing price in cents ($0.01).
pub const DEFAULT_MIN_PRICE_CENTS: i64 = 1;

/// Default maximum listing price in cents ($10,000).
pub const DEFAULT_MAX_PRICE_CENTS: i64 = 1_000_000;

/// Default marketplace commission in basis points (5%).
pub const DEFAULT_COMMISSION_BPS: u32 = 500;

/// Policy ceilings for marketplace and trading operations.
#[derive(Debug, Clone)]
pub struct MarketPolicy {
    pub min_price_cents: i64,
    pub max_price_cents: i64,
    pub max_active_listings: i64,
    pub max_active_trades: i64,
    pub max_offers_per_trade: i64,
    pub daily_purchase_limit_cents: i64,
    pub commission_bps: u32,
}

impl Default for MarketPolicy {
    fn default() -> Self {
        Self {
            min_price_cents: DEFAULT_MIN_PRICE_CENTS,
            max_price_cents: DEFAULT_MAX_PRICE_CENTS,
            max_active_listings: DEFAULT_MAX_ACTIVE_LISTINGS,
            max_active_trades: DEFAULT_MAX_ACTIVE_TRADES,
            max_offers_per_trade: DEFAULT_MAX_OFFERS_PER_TRADE,
            daily_purchase_limit_cents: DEFAULT_DAILY_PURCHASE_LIMIT_CENTS,
            commission_bps: DEFAULT_COMMISSION_BPS,
        }
    }
}

impl MarketPolicy {
    /// Validate the price bounds against this policy.
    pub fn price_in_bounds(&self, price_cents: i64) -> bool {
        price_cents >= self.min_price_cents && price_cents <= self.max_price_cents
    }
}
