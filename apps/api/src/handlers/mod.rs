//! # HTTP Handlers
//!
//! One module per resource. Handlers stay thin: extract, call the validation
//! chain or a repository, map the result.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  orders.rs        POST/GET /orders                                      │
//! │                   GET/PUT/DELETE /orders/{orderId}                      │
//! │                   PATCH /orders/{orderId}/confirm|send|deliver          │
//! │                                                                         │
//! │  restaurants.rs   GET /restaurants, /restaurants/{restaurantId}         │
//! │                   GET /restaurantCategories                             │
//! │                                                                         │
//! │  products.rs      GET /products/{productId}, /products/popular          │
//! │                   GET /productCategories                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod orders;
pub mod products;
pub mod restaurants;

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: bool,
    pub version: &'static str,
}

/// `GET /health`: 200 when the database answers, 503 otherwise.
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let database = state.db.health_check().await;
    let (status, label) = if database {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        status,
        Json(HealthResponse {
            status: label,
            database,
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}
