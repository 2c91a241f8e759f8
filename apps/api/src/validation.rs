//! # Order Validation Chain
//!
//! Runs every check an order request must pass before anything is written.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  POST /orders                        PUT /orders/{id}                   │
//! │  ────────────                        ────────────────                   │
//! │  1. field checks (all collected)     1. field checks, no restaurantId   │
//! │  2. restaurant exists                2. order exists                    │
//! │       missing → INVALID_RESTAURANT        missing → INVALID_ORDER       │
//! │       lookup failed → 500                 other customer → 403          │
//! │  3. one batched product fetch        3. one batched product fetch       │
//! │  4. ownership (every line)           4. ownership vs order restaurant   │
//! │  5. availability (every line)        5. availability                    │
//! │  6. price with unit snapshots        6. order still pending             │
//! │                                      7. price with unit snapshots       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The write that follows is guarded by `status = 'pending'`, so an order
//! accepted by the restaurant between steps 6 and the write still fails.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use deliverus_core::rules::{self, PricedOrder};
use deliverus_core::validation::{validate_create_payload, validate_update_payload};
use deliverus_core::{
    CreateOrder, Money, Order, OrderLineRequest, OrderRuleError, Product, Restaurant,
    UpdateOrder,
};
use deliverus_db::Database;

use crate::auth::Customer;
use crate::error::ApiResult;

/// A create request that passed every check.
#[derive(Debug)]
pub struct ValidatedCreate {
    pub request: CreateOrder,
    pub restaurant: Restaurant,
    pub priced: PricedOrder,
}

/// An update request that passed every check.
#[derive(Debug)]
pub struct ValidatedUpdate {
    pub order: Order,
    pub request: UpdateOrder,
    pub priced: PricedOrder,
}

/// Validation chain for order create and update requests.
pub struct OrderValidator<'a> {
    db: &'a Database,
    free_shipping_threshold: Money,
}

impl<'a> OrderValidator<'a> {
    pub fn new(db: &'a Database, free_shipping_threshold: Money) -> Self {
        OrderValidator {
            db,
            free_shipping_threshold,
        }
    }

    /// Validates a `POST /orders` body.
    pub async fn validate_create(&self, body: &Value) -> ApiResult<ValidatedCreate> {
        let request = validate_create_payload(body)?;

        // A lookup error propagates as DbError (500), never as a rule failure
        let restaurant = self
            .db
            .restaurants()
            .get_by_id(request.restaurant_id)
            .await?
            .ok_or(OrderRuleError::InvalidRestaurant {
                restaurant_id: request.restaurant_id,
            })?;

        let products = self.fetch_products(&request.products).await?;
        rules::check_lines(&request.products, &products, restaurant.id)?;

        let priced = rules::price_lines(
            &request.products,
            &products,
            restaurant.shipping_costs,
            self.free_shipping_threshold,
        )?;

        debug!(
            restaurant_id = restaurant.id,
            lines = priced.lines.len(),
            total = %priced.total,
            "Create request validated"
        );

        Ok(ValidatedCreate {
            request,
            restaurant,
            priced,
        })
    }

    /// Validates a `PUT /orders/{id}` body for `customer`.
    pub async fn validate_update(
        &self,
        order_id: i64,
        body: &Value,
        customer: &Customer,
    ) -> ApiResult<ValidatedUpdate> {
        let request = validate_update_payload(body)?;

        let order = self
            .db
            .orders()
            .get_by_id(order_id)
            .await?
            .ok_or_else(|| OrderRuleError::InvalidOrder {
                reason: format!("order {} does not exist", order_id),
            })?;
        customer.ensure_owns(order.customer_id, order.id)?;

        let products = self.fetch_products(&request.products).await?;
        rules::check_lines(&request.products, &products, order.restaurant_id)?;
        rules::ensure_pending(&order)?;

        // Shipping follows the restaurant's current costs, like a new order
        let restaurant = self
            .db
            .restaurants()
            .get_by_id(order.restaurant_id)
            .await?
            .ok_or(OrderRuleError::InvalidRestaurant {
                restaurant_id: order.restaurant_id,
            })?;

        let priced = rules::price_lines(
            &request.products,
            &products,
            restaurant.shipping_costs,
            self.free_shipping_threshold,
        )?;

        debug!(order_id, lines = priced.lines.len(), total = %priced.total, "Update request validated");

        Ok(ValidatedUpdate {
            order,
            request,
            priced,
        })
    }

    /// One query for every product the request names.
    async fn fetch_products(&self, lines: &[OrderLineRequest]) -> ApiResult<HashMap<i64, Product>> {
        let ids: Vec<i64> = lines.iter().map(|line| line.product_id).collect();
        Ok(self.db.products().get_many(&ids).await?)
    }
}
