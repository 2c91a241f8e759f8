//! # Product Handlers

use std::sync::Arc;

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::Json;

use deliverus_core::{PopularProduct, Product, ProductCategory};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// How many products `GET /products/popular` returns.
pub const POPULAR_LIMIT: u32 = 3;

/// `GET /products/{productId}`
pub async fn show(
    State(state): State<Arc<AppState>>,
    product_id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Product>> {
    let Path(product_id) = product_id?;

    let product = state
        .db
        .products()
        .get_by_id(product_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", product_id))?;

    Ok(Json(product))
}

/// `GET /products/popular`: best sellers by units ordered.
pub async fn popular(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<PopularProduct>>> {
    Ok(Json(state.db.products().popular(POPULAR_LIMIT).await?))
}

/// `GET /productCategories`
pub async fn categories(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<ProductCategory>>> {
    Ok(Json(state.db.products().categories().await?))
}
