use crate::types::DbId;

/// Which policy ceiling a quota rejection refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaKind {
    ActiveListings,
    ActiveTrades,
    OffersPerTrade,
}

impl QuotaKind {
    /// Machine-readable reason code surfaced to API callers.
    pub fn code(&self) -> &'static str {
        match self {
            QuotaKind::ActiveListings => "MAX_LISTINGS_REACHED",
            QuotaKind::ActiveTrades => "MAX_TRADES_REACHED",
            QuotaKind::OffersPerTrade => "MAX_OFFERS_REACHED",
        }
    }

    /// Human-readable noun for error messages.
    pub fn label(&self) -> &'static str {
        match self {
            QuotaKind::ActiveListings => "active listings",
            QuotaKind::ActiveTrades => "active trades",
            QuotaKind::OffersPerTrade => "pending offers on this trade",
        }
    }
}

/// Domain-level error taxonomy for the marketplace and trading engine.
///
/// Quota and money variants carry the counts the caller needs to render
/// remaining headroom; the API layer turns them into response payloads.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Privacy restricted: {0}")]
    PrivacyRestricted(String),

    #[error("This listing is no longer available")]
    ListingNotAvailable,

    #[error("Limit of {limit} {} reached (currently {current})", .quota.label())]
    QuotaExceeded {
        quota: QuotaKind,
        current: i64,
        limit: i64,
    },

    #[error("Daily purchase limit exceeded ({spent_cents} of {limit_cents} cents spent today)")]
    DailyLimitExceeded { spent_cents: i64, limit_cents: i64 },

    #[error("Insufficient funds ({required_cents} cents required, {available_cents} available)")]
    InsufficientFunds {
        required_cents: i64,
        available_cents: i64,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Remaining same-day headroom for a daily-limit rejection, in cents.
    ///
    /// `None` for any other variant.
    pub fn daily_remaining_cents(&self) -> Option<i64> {
        match self {
            CoreError::DailyLimitExceeded {
                spent_cents,
                limit_cents,
            } => Some((limit_cents - spent_cents).max(0)),
            _ => None,
        }
    }
}
