//! # Order Payloads
//!
//! Bodies of `POST /orders` and `PUT /orders/{orderId}`.
//!
//! The server never deserializes these directly from the request: it runs the
//! loosely-typed JSON through [`crate::validation`], which produces them only
//! once every field check passed. The client builds them from its cart and
//! serializes them as-is.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// One requested product and how many units of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderLineRequest {
    pub product_id: i64,
    pub quantity: i64,
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CreateOrder {
    pub restaurant_id: i64,
    pub address: String,
    pub products: Vec<OrderLineRequest>,
}

/// Body of `PUT /orders/{orderId}`. The restaurant is fixed at creation, so
/// there is no `restaurantId` here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UpdateOrder {
    pub address: String,
    pub products: Vec<OrderLineRequest>,
}
