//! # Client Error Types
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Client Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │   Transport     │  │   Server said   │  │     Local state         │ │
//! │  │                 │  │   no            │  │                         │ │
//! │  │  Http           │  │  Api { status,  │  │  Cart(CartError)        │ │
//! │  │  InvalidUrl     │  │   code, ... }   │  │                         │ │
//! │  │  Decode         │  │                 │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  Every variant ends up as a danger Notification (see notify.rs).       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use deliverus_core::{FieldError, OrderRuleError, ValidationError};
use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Api {
        status: u16,
        /// `PRODUCT_UNAVAILABLE`, `ORDER_NOT_PENDING`, ...; absent when the
        /// body was not an API error document
        code: Option<String>,
        message: String,
        errors: Vec<FieldError>,
    },

    /// The request never got an answer.
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The answer could not be read as the expected type.
    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Invalid API base URL: {0}")]
    InvalidUrl(String),

    #[error(transparent)]
    Cart(#[from] CartError),
}

impl ClientError {
    /// HTTP status of an API rejection.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Machine-readable code of an API rejection.
    pub fn code(&self) -> Option<&str> {
        match self {
            ClientError::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

/// Errors of the restaurant screen cart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CartError {
    #[error("Product {product_id} is not on this restaurant's menu")]
    UnknownProduct { product_id: i64 },

    #[error("Product {product_id} is not available")]
    Unavailable { product_id: i64 },

    #[error("Select a product to confirm an order")]
    NothingSelected,

    #[error("{0}")]
    Address(#[from] ValidationError),

    #[error("Order {order_id} belongs to restaurant {order_restaurant}, not {restaurant_id}")]
    WrongRestaurant {
        order_id: i64,
        order_restaurant: i64,
        restaurant_id: i64,
    },

    #[error(transparent)]
    Rule(OrderRuleError),
}
