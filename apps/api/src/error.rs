//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in DeliverUS                              │
//! │                                                                         │
//! │  Mobile app                  Rust Backend                               │
//! │  ──────────                  ────────────                               │
//! │                                                                         │
//! │  POST /orders                                                           │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Handler                                                         │  │
//! │  │  Result<Json<T>, ApiError>                                       │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Field checks? ─── ValidationErrors ───────────────┐            │  │
//! │  │         │                                          │            │  │
//! │  │         ▼                                          ▼            │  │
//! │  │  Order rules?  ─── OrderRuleError ──────────── ApiError ───────►│  │
//! │  │         │                                          ▲            │  │
//! │  │         ▼                                          │            │  │
//! │  │  Database?     ─── DbError (logged, generic) ──────┘            │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  ◄────────────────────────────────────────────────────────────────────  │
//! │  422 { "code": "PRODUCT_UNAVAILABLE",                                   │
//! │        "message": "Product 7 is not available",                         │
//! │        "errors": [] }                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use deliverus_core::{FieldError, OrderRuleError, OrderStatus, ValidationErrors};
use deliverus_db::DbError;

/// API error returned from handlers.
///
/// ## Serialization
/// This is what the client receives when a request fails:
/// ```json
/// {
///   "code": "VALIDATION_ERROR",
///   "message": "2 fields failed validation",
///   "errors": [{ "field": "address", "message": "address is required" }]
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,

    /// Per-field failures; empty unless `code` is `VALIDATION_ERROR`
    pub errors: Vec<FieldError>,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Body or path could not be parsed (400)
    MalformedRequest,

    /// One or more fields failed validation (422)
    ValidationError,

    /// Stated restaurant does not exist (422)
    InvalidRestaurant,

    /// Product belongs to another restaurant (422)
    RestaurantMismatch,

    /// Referenced product does not exist (422)
    ProductNotFound,

    /// Product cannot be ordered right now (422)
    ProductUnavailable,

    /// Order id missing or unknown on edit (422)
    InvalidOrder,

    /// Order is no longer pending (409)
    OrderNotPending,

    /// Status change skipped a step (409)
    InvalidTransition,

    /// Missing or invalid bearer token (401)
    Unauthorized,

    /// Resource belongs to another customer (403)
    Forbidden,

    /// Resource not found (404)
    NotFound,

    /// Database operation failed (500)
    DatabaseError,

    /// Internal server error (500)
    Internal,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::MalformedRequest => StatusCode::BAD_REQUEST,
            ErrorCode::ValidationError
            | ErrorCode::InvalidRestaurant
            | ErrorCode::RestaurantMismatch
            | ErrorCode::ProductNotFound
            | ErrorCode::ProductUnavailable
            | ErrorCode::InvalidOrder => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::OrderNotPending | ErrorCode::InvalidTransition => StatusCode::CONFLICT,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
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
            errors: Vec::new(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Forbidden, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }

    pub fn status(&self) -> StatusCode {
        self.code.status()
    }
}

/// Converts database errors to API errors.
///
/// Infrastructure details are logged here and never sent to the client.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ApiError::not_found(&entity, id),
            DbError::StateConflict { entity, id, expected } => {
                // Edits, deletes and confirms expect pending; send and deliver
                // expect the status they start from
                let code = if expected == OrderStatus::Pending.as_str() {
                    ErrorCode::OrderNotPending
                } else {
                    ErrorCode::InvalidTransition
                };
                ApiError::new(code, format!("{} {} is no longer {}", entity, id, expected))
            }
            DbError::UniqueViolation { field, value } => ApiError::new(
                ErrorCode::ValidationError,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::ForeignKeyViolation { message } => {
                tracing::error!("Foreign key violation: {}", message);
                ApiError::new(ErrorCode::ValidationError, "Invalid reference")
            }
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Database migration failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::PoolExhausted => {
                tracing::error!("Database pool exhausted");
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts order rule violations to API errors.
impl From<OrderRuleError> for ApiError {
    fn from(err: OrderRuleError) -> Self {
        let code = match err {
            OrderRuleError::InvalidRestaurant { .. } => ErrorCode::InvalidRestaurant,
            OrderRuleError::RestaurantMismatch { .. } => ErrorCode::RestaurantMismatch,
            OrderRuleError::ProductUnavailable { .. } => ErrorCode::ProductUnavailable,
            OrderRuleError::ProductNotFound { .. } => ErrorCode::ProductNotFound,
            OrderRuleError::InvalidOrder { .. } | OrderRuleError::TotalTooLarge => {
                ErrorCode::InvalidOrder
            }
            OrderRuleError::OrderNotPending { .. } => ErrorCode::OrderNotPending,
            OrderRuleError::InvalidTransition { .. } => ErrorCode::InvalidTransition,
        };
        ApiError::new(code, err.to_string())
    }
}

/// Converts collected field failures to a single 422.
impl From<ValidationErrors> for ApiError {
    fn from(errs: ValidationErrors) -> Self {
        let message = match errs.0.as_slice() {
            [only] => only.to_string(),
            all => format!("{} fields failed validation", all.len()),
        };
        ApiError {
            code: ErrorCode::ValidationError,
            message,
            errors: errs.field_errors(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::new(ErrorCode::MalformedRequest, rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::new(ErrorCode::MalformedRequest, rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Handler result alias.
pub type ApiResult<T> = Result<T, ApiError>;
