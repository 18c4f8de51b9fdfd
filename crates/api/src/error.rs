use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tradepost_core::error::CoreError;
use tradepost_core::money::format_cents;
use tradepost_db::engine::EngineError;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses
/// of the shape `{ "error", "code", "details"? }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `tradepost_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<EngineError> for AppError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Domain(core) => AppError::Core(core),
            EngineError::Db(db) => AppError::Database(db),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                    None,
                ),
                CoreError::Validation(msg) => (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    msg.clone(),
                    None,
                ),
                CoreError::Conflict(msg) => {
                    (StatusCode::CONFLICT, "CONFLICT", msg.clone(), None)
                }
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone(), None)
                }
                CoreError::Forbidden(msg) => {
                    (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone(), None)
                }
                CoreError::PrivacyRestricted(msg) => (
                    StatusCode::FORBIDDEN,
                    "PRIVACY_RESTRICTED",
                    msg.clone(),
                    None,
                ),
                CoreError::ListingNotAvailable => (
                    StatusCode::CONFLICT,
                    "LISTING_NOT_AVAILABLE",
                    "This listing is no longer available".to_string(),
                    None,
                ),
                CoreError::QuotaExceeded {
                    quota,
                    current,
                    limit,
                } => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    quota.code(),
                    format!("Limit of {limit} {} reached", quota.label()),
                    Some(json!({
                        "current": current,
                        "limit": limit,
                        "remaining": (limit - current).max(0),
                    })),
                ),
                CoreError::DailyLimitExceeded {
                    spent_cents,
                    limit_cents,
                } => {
                    let remaining = (limit_cents - spent_cents).max(0);
                    (
                        StatusCode::UNPROCESSABLE_ENTITY,
                        "DAILY_LIMIT_EXCEEDED",
                        format!(
                            "Daily purchase limit of ${} exceeded; ${} remaining today",
                            format_cents(*limit_cents),
                            format_cents(remaining)
                        ),
                        Some(json!({
                            "spent_cents": spent_cents,
                            "limit_cents": limit_cents,
                            "remaining_cents": remaining,
                        })),
                    )
                }
                CoreError::InsufficientFunds {
                    required_cents,
                    available_cents,
                } => (
                    StatusCode::PAYMENT_REQUIRED,
                    "INSUFFICIENT_FUNDS",
                    format!(
                        "Insufficient funds: ${} required, ${} available",
                        format_cents(*required_cents),
                        format_cents(*available_cents)
                    ),
                    Some(json!({
                        "required_cents": required_cents,
                        "available_cents": available_cents,
                    })),
                ),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                        None,
                    )
                }
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone(), None)
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let Some(details) = details {
            body["details"] = details;
        }

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status, error code, message, and details.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map
///   to 409 -- these back the single-active-listing, single-pending-offer,
///   and idempotency-key invariants.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(
    err: &sqlx::Error,
) -> (StatusCode, &'static str, String, Option<serde_json::Value>) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
            None,
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                        None,
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
                None,
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
                None,
            )
        }
    }
}
