//! # Order Handlers

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;
use tracing::{debug, info};

use deliverus_core::rules;
use deliverus_core::{Order, OrderDetail, OrderStatus, OrderWithRestaurant};

use crate::auth::Customer;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::validation::OrderValidator;

/// `POST /orders`
pub async fn create(
    State(state): State<Arc<AppState>>,
    customer: Customer,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<OrderDetail>)> {
    let Json(body) = payload?;
    debug!(customer_id = customer.id, "create_order");

    let validated = OrderValidator::new(&state.db, state.config.free_shipping_threshold)
        .validate_create(&body)
        .await?;

    let order = state
        .db
        .orders()
        .create(
            customer.id,
            validated.restaurant.id,
            &validated.request.address,
            &validated.priced,
        )
        .await?;

    let detail = state.db.orders().get_detail(order.id).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// `GET /orders`: the caller's orders, newest first.
pub async fn index(
    State(state): State<Arc<AppState>>,
    customer: Customer,
) -> ApiResult<Json<Vec<OrderWithRestaurant>>> {
    let orders = state.db.orders().list_for_customer(customer.id).await?;
    Ok(Json(orders))
}

/// `GET /orders/{orderId}`
pub async fn show(
    State(state): State<Arc<AppState>>,
    customer: Customer,
    order_id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<OrderDetail>> {
    let Path(order_id) = order_id?;

    let detail = state.db.orders().get_detail(order_id).await?;
    customer.ensure_owns(detail.order.customer_id, order_id)?;

    Ok(Json(detail))
}

/// `PUT /orders/{orderId}`: replace address and lines, reprice.
pub async fn update(
    State(state): State<Arc<AppState>>,
    customer: Customer,
    order_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<OrderDetail>> {
    let Path(order_id) = order_id?;
    let Json(body) = payload?;
    debug!(customer_id = customer.id, order_id, "update_order");

    let validated = OrderValidator::new(&state.db, state.config.free_shipping_threshold)
        .validate_update(order_id, &body, &customer)
        .await?;

    state
        .db
        .orders()
        .update(validated.order.id, &validated.request.address, &validated.priced)
        .await?;

    let detail = state.db.orders().get_detail(order_id).await?;
    Ok(Json(detail))
}

/// `DELETE /orders/{orderId}`: only while pending.
pub async fn destroy(
    State(state): State<Arc<AppState>>,
    customer: Customer,
    order_id: Result<Path<i64>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(order_id) = order_id?;

    let order = state
        .db
        .orders()
        .get_by_id(order_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Order", order_id))?;
    customer.ensure_owns(order.customer_id, order.id)?;
    rules::ensure_pending(&order)?;

    state.db.orders().delete(order.id).await?;

    info!(order_id, customer_id = customer.id, "Order removed by customer");
    Ok(StatusCode::NO_CONTENT)
}

/// `PATCH /orders/{orderId}/confirm`: pending → in process.
pub async fn confirm(
    state: State<Arc<AppState>>,
    customer: Customer,
    order_id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Order>> {
    advance(state, customer, order_id, OrderStatus::InProcess).await
}

/// `PATCH /orders/{orderId}/send`: in process → sent.
pub async fn send(
    state: State<Arc<AppState>>,
    customer: Customer,
    order_id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Order>> {
    advance(state, customer, order_id, OrderStatus::Sent).await
}

/// `PATCH /orders/{orderId}/deliver`: sent → delivered.
pub async fn deliver(
    state: State<Arc<AppState>>,
    customer: Customer,
    order_id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Order>> {
    advance(state, customer, order_id, OrderStatus::Delivered).await
}

/// Restaurant-side status change. Any authenticated caller may drive it;
/// restaurant owner roles live in the auth service.
async fn advance(
    State(state): State<Arc<AppState>>,
    caller: Customer,
    order_id: Result<Path<i64>, PathRejection>,
    to: OrderStatus,
) -> ApiResult<Json<Order>> {
    let Path(order_id) = order_id?;

    let order = state
        .db
        .orders()
        .get_by_id(order_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Order", order_id))?;
    rules::ensure_transition(order.id, order.status, to)?;

    let order = state.db.orders().update_status(order.id, order.status, to).await?;

    debug!(order_id, caller = caller.id, status = %order.status, "Order advanced");
    Ok(Json(order))
}
