//! Integer-cent money arithmetic.
//!
//! All monetary amounts in the system are whole cents (`i64`). The API
//! boundary accepts prices as decimal numbers with at most two fractional
//! digits; conversion and the scale check happen here so no floating-point
//! value ever reaches the ledger.

use crate::error::CoreError;

/// Tolerance when deciding whether a decimal input has sub-cent precision.
///
/// `10.01_f64 * 100.0` is not exactly `1001.0`; anything within this epsilon
/// of a whole cent is treated as that cent.
const SCALE_EPSILON: f64 = 1e-6;

/// Convert a decimal price (dollars) into whole cents.
///
/// Rejects non-finite values, non-positive values, and values with more
/// than two decimal places.
pub fn price_to_cents(price: f64) -> Result<i64, CoreError> {
    if !price.is_finite() {
        return Err(CoreError::Validation("Price must be a number".into()));
    }
    if price <= 0.0 {
        return Err(CoreError::Validation("Price must be positive".into()));
    }

    let scaled = price * 100.0;
    let rounded = scaled.round();
    if (scaled - rounded).abs() > SCALE_EPSILON {
        return Err(CoreError::Validation(
            "Price must have at most two decimal places".into(),
        ));
    }
    if rounded > i64::MAX as f64 {
        return Err(CoreError::Validation("Price is out of range".into()));
    }

    Ok(rounded as i64)
}

/// Format a cent amount as a dollar string with two decimal places.
///
/// Negative amounts keep their sign: `-1050` formats as `"-10.50"`.
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

/// Marketplace commission for a sale price, in cents.
///
/// `commission_bps` is in basis points (1/100 of a percent). Floor
/// division, so `commission + seller_receives(..) == price` always holds.
pub fn commission_cents(price_cents: i64, commission_bps: u32) -> i64 {
    price_cents * i64::from(commission_bps) / 10_000
}

/// What the seller is credited after commission.
pub fn seller_receives_cents(price_cents: i64, commission_bps: u32) -> i64 {
    price_cents - commission_cents(price_cents, commission_bps)
}
