//! # Domain Types
//!
//! Core domain types used throughout DeliverUS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────┐   ┌─────────────────┐   ┌─────────────────┐      │
//! │  │   Restaurant     │   │     Product     │   │      Order      │      │
//! │  │  ──────────────  │   │  ─────────────  │   │  ─────────────  │      │
//! │  │  id              │◄──│  restaurant_id  │   │  restaurant_id  │      │
//! │  │  shipping_costs  │   │  price          │   │  customer_id    │      │
//! │  │  category_id     │   │  availability   │   │  status         │      │
//! │  └──────────────────┘   └────────▲────────┘   │  price          │      │
//! │                                  │            └────────▲────────┘      │
//! │                         ┌────────┴────────────────────┴──┐             │
//! │                         │           OrderLine            │             │
//! │                         │  quantity, unity_price snapshot│             │
//! │                         └────────────────────────────────┘             │
//! │                                                                         │
//! │  ┌──────────────────┐   ┌─────────────────┐   ┌─────────────────┐      │
//! │  │ RestaurantStatus │   │   OrderStatus   │   │    Categories   │      │
//! │  │  online, offline │   │  pending → ...  │   │  restaurant and │      │
//! │  │  closed, ...     │   │  → delivered    │   │  product        │      │
//! │  └──────────────────┘   └─────────────────┘   └─────────────────┘      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All identifiers are database-assigned integers. JSON field names are
//! camelCase to match the mobile client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Categories
// =============================================================================

/// Cuisine category of a restaurant ("Pizza", "Burgers", ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RestaurantCategory {
    pub id: i64,
    pub name: String,
}

/// Category of a product inside a menu ("Starters", "Drinks", ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductCategory {
    pub id: i64,
    pub name: String,
}

// =============================================================================
// Restaurant
// =============================================================================

/// Whether a restaurant is taking orders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum RestaurantStatus {
    #[default]
    Online,
    Offline,
    Closed,
    #[serde(rename = "temporarily closed")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "temporarily closed"))]
    TemporarilyClosed,
}

/// A restaurant listed on the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Restaurant {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub address: String,
    /// Flat shipping fee charged unless the order qualifies for free shipping.
    pub shipping_costs: Money,
    pub average_service_minutes: Option<f64>,
    /// Relative path of the logo image.
    pub logo: Option<String>,
    /// Relative path of the header image on the detail screen.
    pub hero_image: Option<String>,
    pub status: RestaurantStatus,
    pub restaurant_category_id: i64,
}

/// The restaurant fields embedded in order lists and popular products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RestaurantSummary {
    pub id: i64,
    pub name: String,
    pub logo: Option<String>,
}

impl From<&Restaurant> for RestaurantSummary {
    fn from(restaurant: &Restaurant) -> Self {
        RestaurantSummary {
            id: restaurant.id,
            name: restaurant.name.clone(),
            logo: restaurant.logo.clone(),
        }
    }
}

/// A restaurant with its category and its menu, as served by
/// `GET /restaurants/{restaurantId}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RestaurantDetail {
    #[serde(flatten)]
    pub restaurant: Restaurant,
    pub restaurant_category: Option<RestaurantCategory>,
    /// Menu ordered by each product's display position.
    pub products: Vec<Product>,
}

// =============================================================================
// Product
// =============================================================================

/// A menu item. Belongs to exactly one restaurant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    pub id: i64,
    pub restaurant_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Money,
    pub image: Option<String>,
    /// Display position inside the restaurant's menu.
    pub order: i64,
    /// Whether the product can be ordered right now.
    pub availability: bool,
    pub product_category_id: i64,
}

/// A best-selling product with the number of units ordered so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PopularProduct {
    #[serde(flatten)]
    pub product: Product,
    pub restaurant: RestaurantSummary,
    pub sold_product_count: i64,
}

// =============================================================================
// Order Status
// =============================================================================

/// Lifecycle of an order.
///
/// ```text
/// pending ──► in process ──► sent ──► delivered
///    │
///    └── only state in which the customer may edit or delete
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum OrderStatus {
    #[default]
    Pending,
    #[serde(rename = "in process")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "in process"))]
    InProcess,
    Sent,
    Delivered,
}

impl OrderStatus {
    /// The value stored in the database and sent over the wire.
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::InProcess => "in process",
            OrderStatus::Sent => "sent",
            OrderStatus::Delivered => "delivered",
        }
    }

    /// The status that follows this one, `None` once delivered.
    pub const fn next(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::InProcess),
            OrderStatus::InProcess => Some(OrderStatus::Sent),
            OrderStatus::Sent => Some(OrderStatus::Delivered),
            OrderStatus::Delivered => None,
        }
    }

    #[inline]
    pub const fn is_pending(&self) -> bool {
        matches!(self, OrderStatus::Pending)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "in process" => Ok(OrderStatus::InProcess),
            "sent" => Ok(OrderStatus::Sent),
            "delivered" => Ok(OrderStatus::Delivered),
            other => Err(ValidationError::InvalidFormat {
                field: "status".to_string(),
                reason: format!("unknown order status '{other}'"),
            }),
        }
    }
}

// =============================================================================
// Order
// =============================================================================

/// A customer order placed at one restaurant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Order {
    pub id: i64,
    pub restaurant_id: i64,
    pub customer_id: i64,
    pub address: String,
    pub status: OrderStatus,
    /// Total charged: product subtotal plus shipping.
    pub price: Money,
    /// Shipping actually charged (zero when waived).
    pub shipping_costs: Money,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub started_at: Option<DateTime<Utc>>,
    #[ts(as = "Option<String>")]
    pub sent_at: Option<DateTime<Utc>>,
    #[ts(as = "Option<String>")]
    pub delivered_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Product subtotal, i.e. the total without shipping.
    pub fn subtotal(&self) -> Money {
        self.price - self.shipping_costs
    }
}

/// An order with its restaurant, as listed by `GET /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderWithRestaurant {
    #[serde(flatten)]
    pub order: Order,
    pub restaurant: RestaurantSummary,
}

// =============================================================================
// Order Line
// =============================================================================

/// A persisted order line. Uses the snapshot pattern: `unity_price` is the
/// product price at the moment the order was placed or last edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderLine {
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub unity_price: Money,
}

impl OrderLine {
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unity_price.multiply_quantity(self.quantity)
    }
}

/// An order line joined with the product it refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderLineDetail {
    pub product_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub quantity: i64,
    /// Price per unit frozen at order time.
    pub unity_price: Money,
}

impl OrderLineDetail {
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unity_price.multiply_quantity(self.quantity)
    }
}

/// Everything the order detail screen shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub restaurant: RestaurantSummary,
    pub products: Vec<OrderLineDetail>,
}

// =============================================================================
// Unit Tests
// =============================================================================
