//! # Restaurant Handlers

use std::sync::Arc;

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::Json;

use deliverus_core::{Restaurant, RestaurantCategory, RestaurantDetail};

use crate::error::ApiResult;
use crate::state::AppState;

/// `GET /restaurants`
pub async fn index(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Restaurant>>> {
    Ok(Json(state.db.restaurants().list().await?))
}

/// `GET /restaurants/{restaurantId}`: the restaurant, its category and its
/// menu in display order.
pub async fn show(
    State(state): State<Arc<AppState>>,
    restaurant_id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<RestaurantDetail>> {
    let Path(restaurant_id) = restaurant_id?;
    Ok(Json(state.db.restaurants().get_detail(restaurant_id).await?))
}

/// `GET /restaurantCategories`
pub async fn categories(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<RestaurantCategory>>> {
    Ok(Json(state.db.restaurants().categories().await?))
}
