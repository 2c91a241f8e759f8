//! # Error Types
//!
//! Domain-specific error types for deliverus-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  deliverus-core errors (this file)                                     │
//! │  ├── ValidationError   - One field failed a check                      │
//! │  ├── ValidationErrors  - Every field failure of one request            │
//! │  ├── OrderRuleError    - Cross-entity order rule violations            │
//! │  └── CoreError         - Umbrella for the two above                    │
//! │                                                                         │
//! │  deliverus-db errors (separate crate)                                  │
//! │  └── DbError           - Database operation failures                   │
//! │                                                                         │
//! │  REST API errors (apps/api)                                            │
//! │  └── ApiError          - What the client sees (JSON + status)          │
//! │                                                                         │
//! │  Flow: ValidationError → OrderRuleError → DbError → ApiError → Client  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Infrastructure failures never appear here. A restaurant lookup that fails
//! is a `DbError`; a restaurant lookup that finds nothing is
//! [`OrderRuleError::InvalidRestaurant`].

use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use crate::types::OrderStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The request body failed field validation.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// The request is well-formed but breaks an order rule.
    #[error(transparent)]
    Rule(#[from] OrderRuleError),
}

// =============================================================================
// Order Rule Error
// =============================================================================

/// Violations of the cross-entity order rules.
///
/// ## When These Occur
/// ```text
/// POST /orders { restaurantId: 1, products: [{ productId: 7, quantity: 2 }] }
///      │
///      ├── restaurant 1 missing?          → InvalidRestaurant
///      ├── product 7 missing?             → ProductNotFound
///      ├── product 7 from restaurant 2?   → RestaurantMismatch
///      └── product 7 not available?       → ProductUnavailable
///
/// PUT /orders/9 { products: [...] }
///      │
///      ├── order 9 missing?               → InvalidOrder
///      └── order 9 already sent?          → OrderNotPending
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderRuleError {
    /// The stated restaurant does not exist.
    #[error("Invalid restaurant: restaurant {restaurant_id} does not exist")]
    InvalidRestaurant { restaurant_id: i64 },

    /// A referenced product belongs to another restaurant.
    #[error(
        "Invalid restaurant: product {product_id} belongs to restaurant {actual}, not {expected}"
    )]
    RestaurantMismatch {
        product_id: i64,
        expected: i64,
        actual: i64,
    },

    /// A referenced product cannot be ordered right now.
    #[error("Product {product_id} is not available")]
    ProductUnavailable { product_id: i64 },

    /// A referenced product does not exist.
    #[error("Product {product_id} does not exist")]
    ProductNotFound { product_id: i64 },

    /// The order identifier is missing or names no order.
    #[error("Invalid order: {reason}")]
    InvalidOrder { reason: String },

    /// The order left the pending state and can no longer be changed.
    #[error("Order {order_id} is {status} and can no longer be modified")]
    OrderNotPending { order_id: i64, status: OrderStatus },

    /// Line or order totals do not fit in a money value.
    #[error("Invalid order: the total of the order is too large")]
    TotalTooLarge,

    /// A status change skipped a step or went backwards.
    #[error("Order {order_id} cannot move from {from} to {to}")]
    InvalidTransition {
        order_id: i64,
        from: OrderStatus,
        to: OrderStatus,
    },
}

impl OrderRuleError {
    /// Machine-readable code used in API responses.
    pub fn code(&self) -> &'static str {
        match self {
            OrderRuleError::InvalidRestaurant { .. } => "INVALID_RESTAURANT",
            OrderRuleError::RestaurantMismatch { .. } => "RESTAURANT_MISMATCH",
            OrderRuleError::ProductUnavailable { .. } => "PRODUCT_UNAVAILABLE",
            OrderRuleError::ProductNotFound { .. } => "PRODUCT_NOT_FOUND",
            OrderRuleError::InvalidOrder { .. } | OrderRuleError::TotalTooLarge => {
                "INVALID_ORDER"
            }
            OrderRuleError::OrderNotPending { .. } => "ORDER_NOT_PENDING",
            OrderRuleError::InvalidTransition { .. } => "INVALID_TRANSITION",
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors for a single field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// A field that must be absent was sent.
    #[error("{field} must not be present")]
    Forbidden { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be a positive integer.
    #[error("{field} must be a positive integer")]
    MustBePositive { field: String },

    /// A list that needs at least one element was empty.
    #[error("{field} must contain at least one element")]
    Empty { field: String },

    /// Wrong JSON type (e.g. a number where a string is expected).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Name of the offending field (`products[1].quantity`, `address`, ...).
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::Forbidden { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::MustBePositive { field }
            | ValidationError::Empty { field }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }
}

/// A field error as sent to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl From<&ValidationError> for FieldError {
    fn from(err: &ValidationError) -> Self {
        FieldError {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

/// Every field error found in one request.
///
/// Validation does not stop at the first failure: a client that sends an
/// empty address and a zero quantity learns about both at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("Validation failed: {}", summary(.0))]
pub struct ValidationErrors(pub Vec<ValidationError>);

fn summary(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn push(&mut self, err: ValidationError) {
        self.0.push(err);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// Field errors in the shape sent to clients.
    pub fn field_errors(&self) -> Vec<FieldError> {
        self.0.iter().map(FieldError::from).collect()
    }

    /// Returns `Ok(value)` when no error was recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(err: ValidationError) -> Self {
        ValidationErrors(vec![err])
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
