//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                     Error Flow in Soko API                          │
//! │                                                                     │
//! │  Handler: Result<Json<T>, ApiError>                                 │
//! │       │                                                             │
//! │       ├── DbError::NotFound ───────────────► 404 NOT_FOUND          │
//! │       ├── CoreError::Validation ───────────► 400 VALIDATION_ERROR   │
//! │       ├── CoreError::InsufficientStock ────► 409 INSUFFICIENT_STOCK │
//! │       ├── CoreError::ProductSold ──────────► 409 PRODUCT_SOLD       │
//! │       ├── CoreError::AmountMismatch ───────► 422 AMOUNT_MISMATCH    │
//! │       ├── DbError::Busy ───────────────────► 409 CONFLICT (retry)   │
//! │       └── storage failure ─────────────────► 500 DATABASE_ERROR     │
//! │                                                                     │
//! │  Body: {"code": "NOT_FOUND", "message": "Product not found: …"}     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every error kind the engine produces maps to exactly one code; nothing
//! is collapsed or swallowed on the way out.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use soko_core::CoreError;
use soko_db::DbError;

/// API error returned from HTTP handlers.
///
/// ## Serialization
/// This is what clients receive when a request fails:
/// ```json
/// {
///   "code": "INSUFFICIENT_STOCK",
///   "message": "Insufficient stock for product …: available 3, requested 5"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Requested quantity exceeds available stock (409)
    InsufficientStock,

    /// Product is sold out / withdrawn (409)
    ProductSold,

    /// Product was already marked sold (409)
    AlreadySold,

    /// Order already has a completed payment (409)
    AlreadyPaid,

    /// Payment amount does not equal the order total (422)
    AmountMismatch,

    /// Transient write contention; the request may be retried (409)
    Conflict,

    /// Database operation failed (500)
    DatabaseError,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    fn status(self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::InsufficientStock
            | ErrorCode::ProductSold
            | ErrorCode::AlreadySold
            | ErrorCode::AlreadyPaid
            | ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::AmountMismatch => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::DatabaseError | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::ProductNotFound(_) | CoreError::OrderNotFound(_) => ErrorCode::NotFound,
            CoreError::ProductSold(_) => ErrorCode::ProductSold,
            CoreError::AlreadySold(_) => ErrorCode::AlreadySold,
            CoreError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
            CoreError::AmountMismatch { .. } => ErrorCode::AmountMismatch,
            CoreError::AlreadyPaid(_) => ErrorCode::AlreadyPaid,
            CoreError::Validation(_) => ErrorCode::ValidationError,
        };
        ApiError::new(code, err.to_string())
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => {
                ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", entity, id))
            }
            DbError::Domain(core) => core.into(),
            DbError::Busy => ApiError::new(
                ErrorCode::Conflict,
                "The store is busy, please retry the request",
            ),
            other => {
                // Storage failures are logged with detail but reported
                // generically; clients get nothing actionable from SQL text.
                error!(error = %other, "Database error");
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status();
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ErrorCode::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::ValidationError.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::InsufficientStock.status(), StatusCode::CONFLICT);
        assert_eq!(
            ErrorCode::AmountMismatch.status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ErrorCode::DatabaseError.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_domain_errors_keep_their_kind() {
        let err = DbError::Domain(CoreError::InsufficientStock {
            product_id: "p-1".to_string(),
            available: 1,
            requested: 2,
        });
        let api: ApiError = err.into();
        assert_eq!(api.code, ErrorCode::InsufficientStock);
        assert!(api.message.contains("available 1"));

        let err = DbError::not_found("Product", "p-2");
        let api: ApiError = err.into();
        assert_eq!(api.code, ErrorCode::NotFound);
    }
}
