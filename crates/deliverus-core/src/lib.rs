//! # deliverus-core: Pure Business Logic for DeliverUS
//!
//! This crate holds the order rules of the platform as pure functions with
//! zero I/O dependencies. Both the API server and the customer client link it.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        DeliverUS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Customer client (deliverus-client)              │   │
//! │  │   Restaurants ──► Cart ──► Order summary ──► My orders          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP / JSON                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    REST API (apps/api)                          │   │
//! │  │    POST /orders, PUT /orders/{id}, GET /restaurants, ...        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ deliverus-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌────────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ validation │  │   rules   │  │   │
//! │  │   │   Order   │  │   Money   │  │  payloads  │  │ ownership │  │   │
//! │  │   │  Product  │  │ shipping  │  │   fields   │  │ pricing   │  │   │
//! │  │   └───────────┘  └───────────┘  └────────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  deliverus-db (Database Layer)                  │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Restaurant, Product, Order, OrderLine, ...)
//! - [`money`] - Money type with integer arithmetic and the shipping waiver
//! - [`error`] - Domain error types
//! - [`payload`] - Request bodies and their validated forms
//! - [`validation`] - Field validation of order requests
//! - [`rules`] - Cross-entity order rules and pricing
//!
//! ## Example Usage
//!
//! ```rust
//! use deliverus_core::money::{shipping_for, Money};
//!
//! let subtotal = Money::from_cents(1250); // 12.50€
//! let shipping = shipping_for(subtotal, Money::from_cents(250), Money::from_cents(1000));
//!
//! // Subtotal above 10.00€ ships for free
//! assert!(shipping.is_zero());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod payload;
pub mod rules;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, FieldError, OrderRuleError, ValidationError, ValidationErrors};
pub use money::Money;
pub use payload::*;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Product subtotal above which shipping costs are waived (10.00€).
///
/// The server prices orders with this value unless configured otherwise, and
/// the client's order summary uses the same number for its estimate.
pub const DEFAULT_FREE_SHIPPING_THRESHOLD: Money = Money::from_cents(1000);

/// Maximum length of a delivery address, in characters.
pub const MAX_ADDRESS_LENGTH: usize = 255;
