//! Routing definitions for the DeliverUS API.

use std::sync::Arc;

use axum::routing::{get, patch};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::{self, orders, products, restaurants};
use crate::state::AppState;

// =============================================================================
// Router Creation
// =============================================================================

/// Creates the API router with all routes and middleware.
///
/// ```ignore
/// let state = AppState::new(db, config);
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, create_router(state)).await?;
/// ```
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        // Orders (bearer token required)
        .route("/orders", get(orders::index).post(orders::create))
        .route(
            "/orders/{order_id}",
            get(orders::show).put(orders::update).delete(orders::destroy),
        )
        .route("/orders/{order_id}/confirm", patch(orders::confirm))
        .route("/orders/{order_id}/send", patch(orders::send))
        .route("/orders/{order_id}/deliver", patch(orders::deliver))
        // Restaurants
        .route("/restaurants", get(restaurants::index))
        .route("/restaurants/{restaurant_id}", get(restaurants::show))
        .route("/restaurantCategories", get(restaurants::categories))
        // Products
        .route("/products/popular", get(products::popular))
        .route("/products/{product_id}", get(products::show))
        .route("/productCategories", get(products::categories))
        .layer(TraceLayer::new_for_http())
        .layer(create_cors_layer())
        .with_state(state)
}

/// The mobile app and its web preview call from other origins.
fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
