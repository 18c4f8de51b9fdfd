//! HTTP request handlers.
//!
//! Handlers run the advisory pre-checks (privacy, quota) and hand
//! admitted mutations to the transactional engine, which repeats every
//! check under lock. The in-transaction failure is the one surfaced.

pub mod inventory;
pub mod marketplace;
pub mod privacy;
pub mod trading;
pub mod wallet;

use tradepost_core::error::CoreError;
use tradepost_core::types::DbId;

use crate::error::AppError;

/// Reject identifiers that could never reference a row.
///
/// Path ids parse as `i64` before reaching handlers; anything non-positive
/// is malformed input, not a missing resource.
pub(crate) fn validate_id(id: DbId, what: &str) -> Result<(), AppError> {
    if id <= 0 {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Invalid {what} id"
        ))));
    }
    Ok(())
}
