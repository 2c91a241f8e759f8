//! # DeliverUS API
//!
//! REST server for the DeliverUS customer app.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         API Request Flow                                │
//! │                                                                         │
//! │  Mobile app ──► axum Router (TraceLayer, CORS)                         │
//! │                        │                                                │
//! │                        ▼                                                │
//! │               ┌─────────────────┐    Customer extractor                 │
//! │               │    Handlers     │◄── (bearer JWT → customer id)         │
//! │               └────────┬────────┘                                       │
//! │                        │                                                │
//! │          ┌─────────────┴──────────────┐                                 │
//! │          ▼                            ▼                                 │
//! │  ┌────────────────┐         ┌──────────────────┐                       │
//! │  │ OrderValidator │────────►│   deliverus-db   │                       │
//! │  │ deliverus-core │         │ SQLite (WAL)     │                       │
//! │  │ rules          │         └──────────────────┘                       │
//! │  └────────────────┘                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables:
//! - `DELIVERUS_HOST` - Bind address (default: 0.0.0.0)
//! - `DELIVERUS_PORT` - HTTP port (default: 8080)
//! - `DELIVERUS_DB_PATH` - SQLite file (default: ./deliverus.db)
//! - `DELIVERUS_DB_MAX_CONNECTIONS` - Pool size (default: 5)
//! - `DELIVERUS_JWT_SECRET` - Secret shared with the auth service
//! - `DELIVERUS_JWT_LIFETIME_SECS` - Lifetime of locally issued tokens (default: 86400)
//! - `DELIVERUS_FREE_SHIPPING_THRESHOLD_CENTS` - Shipping waiver threshold (default: 1000)

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod validation;

// Re-exports
pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use routes::create_router;
pub use state::AppState;
