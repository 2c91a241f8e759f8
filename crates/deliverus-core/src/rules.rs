//! # Order Rules
//!
//! Cross-entity checks and pricing, run after field validation.
//!
//! ## Where These Run
//! ```text
//! validated CreateOrder / UpdateOrder
//!      │
//!      ▼
//! one batched product fetch (deliverus-db)  ──►  HashMap<product id, Product>
//!      │
//!      ▼
//! check_lines()      every product exists and belongs to the restaurant,
//!      │             THEN every product is available
//!      ▼
//! price_lines()      unit-price snapshots, subtotal, shipping waiver, total
//! ```
//!
//! Everything here is a pure function over data already in memory, so the
//! API server and the client's order summary share one implementation.

use std::collections::HashMap;

use crate::error::OrderRuleError;
use crate::money::{shipping_for, Money};
use crate::payload::OrderLineRequest;
use crate::types::{Order, OrderStatus, Product};

// =============================================================================
// Product Checks
// =============================================================================

/// Checks requested lines against the products fetched for them.
///
/// Ownership is checked on every line before availability is checked on
/// any line, so a request mixing a foreign product and an unavailable one
/// reports the foreign product.
pub fn check_lines(
    lines: &[OrderLineRequest],
    products: &HashMap<i64, Product>,
    restaurant_id: i64,
) -> Result<(), OrderRuleError> {
    for line in lines {
        let product = lookup(products, line.product_id)?;
        if product.restaurant_id != restaurant_id {
            return Err(OrderRuleError::RestaurantMismatch {
                product_id: product.id,
                expected: restaurant_id,
                actual: product.restaurant_id,
            });
        }
    }

    for line in lines {
        let product = lookup(products, line.product_id)?;
        if !product.availability {
            return Err(OrderRuleError::ProductUnavailable {
                product_id: product.id,
            });
        }
    }

    Ok(())
}

fn lookup(products: &HashMap<i64, Product>, product_id: i64) -> Result<&Product, OrderRuleError> {
    products
        .get(&product_id)
        .ok_or(OrderRuleError::ProductNotFound { product_id })
}

// =============================================================================
// Status Checks
// =============================================================================

/// Fails unless the order can still be edited or deleted.
pub fn ensure_pending(order: &Order) -> Result<(), OrderRuleError> {
    if order.status.is_pending() {
        Ok(())
    } else {
        Err(OrderRuleError::OrderNotPending {
            order_id: order.id,
            status: order.status,
        })
    }
}

/// Fails unless `to` is the status right after `from`.
pub fn ensure_transition(
    order_id: i64,
    from: OrderStatus,
    to: OrderStatus,
) -> Result<(), OrderRuleError> {
    if from.next() == Some(to) {
        Ok(())
    } else {
        Err(OrderRuleError::InvalidTransition { order_id, from, to })
    }
}

// =============================================================================
// Pricing
// =============================================================================

/// A requested line with the unit price captured from the product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedLine {
    pub product_id: i64,
    pub quantity: i64,
    pub unity_price: Money,
}

impl PricedLine {
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unity_price.multiply_quantity(self.quantity)
    }
}

/// The outcome of pricing an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedOrder {
    pub lines: Vec<PricedLine>,
    pub subtotal: Money,
    /// Restaurant shipping costs, or zero when waived.
    pub shipping_costs: Money,
    pub total: Money,
}

/// Prices lines with current product prices.
///
/// ## Example
/// ```text
/// 2 × 4.50€ + 1 × 2.00€  = 11.00€ subtotal
/// 11.00€ > 10.00€        → shipping 0.00€
/// total                  = 11.00€
/// ```
pub fn price_lines(
    lines: &[OrderLineRequest],
    products: &HashMap<i64, Product>,
    shipping_costs: Money,
    threshold: Money,
) -> Result<PricedOrder, OrderRuleError> {
    let lines = lines
        .iter()
        .map(|line| {
            lookup(products, line.product_id).map(|product| PricedLine {
                product_id: line.product_id,
                quantity: line.quantity,
                unity_price: product.price,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    // Quantities are only bounded by i64, so every step is checked
    let subtotal = lines.iter().try_fold(Money::zero(), |acc, line| {
        line.unity_price
            .checked_multiply_quantity(line.quantity)
            .and_then(|line_total| acc.checked_add(line_total))
            .ok_or(OrderRuleError::TotalTooLarge)
    })?;
    let shipping_costs = shipping_for(subtotal, shipping_costs, threshold);
    let total = subtotal
        .checked_add(shipping_costs)
        .ok_or(OrderRuleError::TotalTooLarge)?;

    Ok(PricedOrder {
        lines,
        subtotal,
        shipping_costs,
        total,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
