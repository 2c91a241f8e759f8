//! # My Orders Screens
//!
//! View models for the order list, the delete confirmation modal and the
//! order detail screen.
//!
//! ```text
//! GET /orders ──► Vec<OrderCard> ──► actions(): Details | Edit | Delete
//!                                                           │
//!                     DeleteConfirmation::open(card) ◄──────┘
//!                              │ confirm()
//!                              ▼
//!                     DELETE /orders/{id}  ──► modal closes
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use deliverus_core::{Money, OrderDetail, OrderStatus, OrderWithRestaurant};

use crate::api::DeliverUsClient;
use crate::error::ClientResult;

/// Shown when the list is empty.
pub const EMPTY_ORDERS_MESSAGE: &str = "No orders were retrieved. Are you logged in?";

/// Buttons of an order card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderAction {
    Details,
    Edit,
    Delete,
}

// =============================================================================
// Order List
// =============================================================================

/// One row of the "My Orders" list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCard {
    pub id: i64,
    pub restaurant_name: String,
    pub restaurant_logo: Option<String>,
    pub price: Money,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl OrderCard {
    pub fn from_order(order: &OrderWithRestaurant) -> Self {
        OrderCard {
            id: order.order.id,
            restaurant_name: order.restaurant.name.clone(),
            restaurant_logo: order.restaurant.logo.clone(),
            price: order.order.price,
            status: order.order.status,
            created_at: order.order.created_at,
        }
    }

    /// Details is always offered; Edit and Delete only while pending.
    pub fn actions(&self) -> Vec<OrderAction> {
        if self.status.is_pending() {
            vec![OrderAction::Delete, OrderAction::Edit, OrderAction::Details]
        } else {
            vec![OrderAction::Details]
        }
    }

    pub fn can(&self, action: OrderAction) -> bool {
        self.actions().contains(&action)
    }

    pub fn price_label(&self) -> String {
        self.price.to_string()
    }
}

/// Builds the list cards, keeping the server's newest-first order.
pub fn order_cards(orders: &[OrderWithRestaurant]) -> Vec<OrderCard> {
    orders.iter().map(OrderCard::from_order).collect()
}

/// Fetches the caller's orders as list cards.
pub async fn load_order_cards(client: &DeliverUsClient) -> ClientResult<Vec<OrderCard>> {
    let orders = client.orders().await?;
    Ok(order_cards(&orders))
}

// =============================================================================
// Delete Confirmation
// =============================================================================

/// State of the "delete this order?" modal.
///
/// Only a pending order can open it, and the `DELETE` request is sent only
/// from [`DeleteConfirmation::confirm`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteConfirmation {
    order_id: Option<i64>,
}

impl DeleteConfirmation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the modal for `card`. Returns false when the order can no
    /// longer be deleted.
    pub fn open(&mut self, card: &OrderCard) -> bool {
        if !card.can(OrderAction::Delete) {
            return false;
        }
        self.order_id = Some(card.id);
        true
    }

    pub fn cancel(&mut self) {
        self.order_id = None;
    }

    pub fn is_visible(&self) -> bool {
        self.order_id.is_some()
    }

    pub fn target(&self) -> Option<i64> {
        self.order_id
    }

    /// Sends the delete and closes the modal, whatever the outcome.
    ///
    /// Returns the removed order id, or `None` when the modal was closed.
    pub async fn confirm(&mut self, client: &DeliverUsClient) -> ClientResult<Option<i64>> {
        let Some(order_id) = self.order_id.take() else {
            return Ok(None);
        };

        client.remove_order(order_id).await?;
        info!(order_id, "Order removed");
        Ok(Some(order_id))
    }
}

// =============================================================================
// Order Detail
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetailLine {
    pub product_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub unity_price: Money,
    pub quantity: i64,
    pub line_total: Money,
}

/// The order detail screen: header plus one line per product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetailView {
    pub id: i64,
    pub restaurant_name: String,
    pub address: String,
    pub status: OrderStatus,
    pub lines: Vec<OrderDetailLine>,
    pub subtotal: Money,
    pub shipping_costs: Money,
    pub total: Money,
}

impl OrderDetailView {
    pub fn from_detail(detail: &OrderDetail) -> Self {
        let lines: Vec<OrderDetailLine> = detail
            .products
            .iter()
            .map(|line| OrderDetailLine {
                product_id: line.product_id,
                name: line.name.clone(),
                description: line.description.clone(),
                image: line.image.clone(),
                unity_price: line.unity_price,
                quantity: line.quantity,
                line_total: line.line_total(),
            })
            .collect();

        OrderDetailView {
            id: detail.order.id,
            restaurant_name: detail.restaurant.name.clone(),
            address: detail.order.address.clone(),
            status: detail.order.status,
            subtotal: lines.iter().map(|l| l.line_total).sum(),
            shipping_costs: detail.order.shipping_costs,
            total: detail.order.price,
            lines,
        }
    }

    /// The edit button on the detail screen follows the list's rule.
    pub fn is_editable(&self) -> bool {
        self.status.is_pending()
    }

    pub fn headline(&self) -> String {
        format!(
            "Delivering to {} with a total price of {}",
            self.address, self.total
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
