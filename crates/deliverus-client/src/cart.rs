//! # Restaurant Screen Cart
//!
//! The product → quantity map behind the restaurant detail screen.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Screen Action            Cart Method           State Change            │
//! │  ─────────────            ───────────           ────────────            │
//! │                                                                         │
//! │  Open restaurant ───────► Cart::new() ────────► every product → 0      │
//! │                                                                         │
//! │  Tap (+) ───────────────► increment() ────────► qty += 1               │
//! │                                                                         │
//! │  Tap (-) ───────────────► decrement() ────────► qty -= 1, never < 0    │
//! │                                                                         │
//! │  Dismiss order ─────────► dismiss() ──────────► every product → 0      │
//! │                                                                         │
//! │  Confirm order ─────────► confirm(address) ───► (read only) summary    │
//! │                                                                         │
//! │  Accept summary ────────► submit() ───────────► POST/PUT, then → 0     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cart lives as long as the screen and is owned by it (`&mut Cart`).
//! Edit mode ([`Cart::for_edit`]) starts from an existing order's lines and
//! submits a `PUT` instead of a `POST`.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, info};

use deliverus_core::rules::{self, PricedOrder};
use deliverus_core::validation::validate_address_text;
use deliverus_core::{
    CreateOrder, Money, OrderDetail, OrderLineRequest, OrderRuleError, Product, RestaurantDetail,
    UpdateOrder, DEFAULT_FREE_SHIPPING_THRESHOLD,
};

use crate::api::DeliverUsClient;
use crate::error::{CartError, ClientResult};

/// One selected product as shown in the order summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryLine {
    pub product_id: i64,
    pub name: String,
    pub unity_price: Money,
    pub quantity: i64,
    pub line_total: Money,
}

/// The order summary modal: lines, subtotal, shipping, total.
///
/// ```text
/// Margherita      2 × 4.50€     9.00€
/// Lemonade        1 × 2.00€     2.00€
/// ──────────────────────────────────
/// Subtotal                     11.00€
/// Shipping         (waived)     0.00€
/// Total                        11.00€
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub lines: Vec<SummaryLine>,
    pub subtotal: Money,
    pub shipping_costs: Money,
    pub total: Money,
    /// Whether shipping was waived because the subtotal passed the threshold.
    pub free_shipping: bool,
}

/// The request a confirmed cart sends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderRequest {
    Create(CreateOrder),
    Update { order_id: i64, payload: UpdateOrder },
}

/// What the summary modal shows and what accepting it sends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub summary: OrderSummary,
    pub request: OrderRequest,
}

/// The restaurant detail screen's cart.
///
/// ## Invariants
/// - Holds a quantity for every product of the restaurant, 0 by default
/// - Quantities never go below 0
/// - Only available products can be incremented
#[derive(Debug, Clone)]
pub struct Cart {
    restaurant_id: i64,
    shipping_costs: Money,
    free_shipping_threshold: Money,
    /// Menu order, for stable summaries
    menu: Vec<i64>,
    products: HashMap<i64, Product>,
    quantities: HashMap<i64, i64>,
    /// Set when editing an existing order
    editing: Option<i64>,
}

impl Cart {
    /// A cart with every product of `restaurant` at quantity 0.
    pub fn new(restaurant: &RestaurantDetail) -> Self {
        let menu: Vec<i64> = restaurant.products.iter().map(|p| p.id).collect();
        Cart {
            restaurant_id: restaurant.restaurant.id,
            shipping_costs: restaurant.restaurant.shipping_costs,
            free_shipping_threshold: DEFAULT_FREE_SHIPPING_THRESHOLD,
            quantities: menu.iter().map(|id| (*id, 0)).collect(),
            products: restaurant
                .products
                .iter()
                .map(|p| (p.id, p.clone()))
                .collect(),
            menu,
            editing: None,
        }
    }

    /// A cart pre-filled with the lines of a pending `order`, for the edit
    /// screen.
    pub fn for_edit(restaurant: &RestaurantDetail, order: &OrderDetail) -> Result<Self, CartError> {
        if order.order.restaurant_id != restaurant.restaurant.id {
            return Err(CartError::WrongRestaurant {
                order_id: order.order.id,
                order_restaurant: order.order.restaurant_id,
                restaurant_id: restaurant.restaurant.id,
            });
        }

        let mut cart = Cart::new(restaurant);
        for line in &order.products {
            // Lines for products no longer on the menu are dropped
            if let Some(quantity) = cart.quantities.get_mut(&line.product_id) {
                *quantity = line.quantity;
            }
        }
        cart.editing = Some(order.order.id);
        Ok(cart)
    }

    /// Overrides the free-shipping threshold used by the summary.
    pub fn with_free_shipping_threshold(mut self, threshold: Money) -> Self {
        self.free_shipping_threshold = threshold;
        self
    }

    pub fn restaurant_id(&self) -> i64 {
        self.restaurant_id
    }

    /// The order being edited, if any.
    pub fn editing(&self) -> Option<i64> {
        self.editing
    }

    /// Current quantity of a product (0 for unknown products).
    pub fn quantity(&self, product_id: i64) -> i64 {
        self.quantities.get(&product_id).copied().unwrap_or(0)
    }

    /// Adds one unit of an available product.
    pub fn increment(&mut self, product_id: i64) -> Result<i64, CartError> {
        let product = self
            .products
            .get(&product_id)
            .ok_or(CartError::UnknownProduct { product_id })?;
        if !product.availability {
            return Err(CartError::Unavailable { product_id });
        }

        let quantity = self.quantities.entry(product_id).or_insert(0);
        *quantity = quantity.saturating_add(1);
        Ok(*quantity)
    }

    /// Removes one unit, stopping at 0.
    ///
    /// Unavailable products can still be decremented so that an edited
    /// order can drop them.
    pub fn decrement(&mut self, product_id: i64) -> Result<i64, CartError> {
        let quantity = self
            .quantities
            .get_mut(&product_id)
            .ok_or(CartError::UnknownProduct { product_id })?;
        if *quantity > 0 {
            *quantity -= 1;
        }
        Ok(*quantity)
    }

    /// Resets every quantity to 0.
    pub fn dismiss(&mut self) {
        for quantity in self.quantities.values_mut() {
            *quantity = 0;
        }
    }

    /// Selected products with their quantity, in menu order.
    pub fn selected(&self) -> Vec<(&Product, i64)> {
        self.menu
            .iter()
            .filter_map(|id| match self.quantity(*id) {
                0 => None,
                quantity => self.products.get(id).map(|p| (p, quantity)),
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.quantities.values().all(|q| *q == 0)
    }

    /// Builds the order summary and the request to send.
    ///
    /// ## Errors
    /// - `NothingSelected` when every quantity is 0
    /// - `Unavailable` when a selected product can no longer be ordered
    /// - `Address` when the address is blank or too long
    pub fn confirm(&self, address: &str) -> Result<Confirmation, CartError> {
        let selected = self.selected();
        if selected.is_empty() {
            return Err(CartError::NothingSelected);
        }
        // An edited order can still hold a product that went unavailable
        if let Some((product, _)) = selected.iter().find(|(p, _)| !p.availability) {
            return Err(CartError::Unavailable {
                product_id: product.id,
            });
        }

        let lines: Vec<OrderLineRequest> = selected
            .into_iter()
            .map(|(product, quantity)| OrderLineRequest {
                product_id: product.id,
                quantity,
            })
            .collect();
        let address = validate_address_text(address)?;

        let priced = rules::price_lines(
            &lines,
            &self.products,
            self.shipping_costs,
            self.free_shipping_threshold,
        )
        .map_err(|err| match err {
            OrderRuleError::ProductNotFound { product_id } => {
                CartError::UnknownProduct { product_id }
            }
            other => CartError::Rule(other),
        })?;

        let summary = self.summarize(&priced);
        let request = match self.editing {
            Some(order_id) => OrderRequest::Update {
                order_id,
                payload: UpdateOrder {
                    address,
                    products: lines,
                },
            },
            None => OrderRequest::Create(CreateOrder {
                restaurant_id: self.restaurant_id,
                address,
                products: lines,
            }),
        };

        debug!(
            restaurant_id = self.restaurant_id,
            lines = summary.lines.len(),
            total = %summary.total,
            "Order confirmed locally"
        );

        Ok(Confirmation { summary, request })
    }

    /// Sends a confirmed order and clears the cart once the server accepts it.
    ///
    /// On failure the cart is left untouched so the user can fix it.
    pub async fn submit(
        &mut self,
        client: &DeliverUsClient,
        confirmation: &Confirmation,
    ) -> ClientResult<OrderDetail> {
        let order = match &confirmation.request {
            OrderRequest::Create(payload) => client.create_order(payload).await?,
            OrderRequest::Update { order_id, payload } => {
                client.update_order(*order_id, payload).await?
            }
        };

        info!(order_id = order.order.id, total = %order.order.price, "Order submitted");
        self.dismiss();
        Ok(order)
    }

    fn summarize(&self, priced: &PricedOrder) -> OrderSummary {
        let lines = priced
            .lines
            .iter()
            .map(|line| SummaryLine {
                product_id: line.product_id,
                name: self
                    .products
                    .get(&line.product_id)
                    .map(|p| p.name.clone())
                    .unwrap_or_default(),
                unity_price: line.unity_price,
                quantity: line.quantity,
                line_total: line.line_total(),
            })
            .collect();

        OrderSummary {
            lines,
            subtotal: priced.subtotal,
            shipping_costs: priced.shipping_costs,
            total: priced.total,
            free_shipping: priced.shipping_costs.is_zero() && !self.shipping_costs.is_zero(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use deliverus_core::{
        Order, OrderLineDetail, OrderStatus, Restaurant, RestaurantStatus, RestaurantSummary,
    };
    use rstest::rstest;

    fn product(id: i64, price: i64, availability: bool) -> Product {
        Product {
            id,
            restaurant_id: 1,
            name: format!("Product {}", id),
            description: None,
            price: Money::from_cents(price),
            image: None,
            order: id,
            availability,
            product_category_id: 1,
        }
    }

    /// Restaurant 1, shipping 2.50€: products 10 (4.50€), 11 (2.00€,
    /// unavailable), 12 (1.00€).
    fn restaurant() -> RestaurantDetail {
        RestaurantDetail {
            restaurant: Restaurant {
                id: 1,
                name: "Casa Pepe".to_string(),
                description: None,
                address: "Calle Feria 10".to_string(),
                shipping_costs: Money::from_cents(250),
                average_service_minutes: None,
                logo: None,
                hero_image: None,
                status: RestaurantStatus::Online,
                restaurant_category_id: 1,
            },
            restaurant_category: None,
            products: vec![product(10, 450, true), product(11, 200, false), product(12, 100, true)],
        }
    }

    fn order(restaurant_id: i64, lines: &[(i64, i64)]) -> OrderDetail {
        OrderDetail {
            order: Order {
                id: 7,
                restaurant_id,
                customer_id: 1,
                address: "Calle Betis 3".to_string(),
                status: OrderStatus::Pending,
                price: Money::zero(),
                shipping_costs: Money::zero(),
                created_at: Utc::now(),
                started_at: None,
                sent_at: None,
                delivered_at: None,
            },
            restaurant: RestaurantSummary {
                id: restaurant_id,
                name: "Casa Pepe".to_string(),
                logo: None,
            },
            products: lines
                .iter()
                .map(|(product_id, quantity)| OrderLineDetail {
                    product_id: *product_id,
                    name: String::new(),
                    description: None,
                    image: None,
                    quantity: *quantity,
                    unity_price: Money::from_cents(100),
                })
                .collect(),
        }
    }

    #[test]
    fn test_new_cart_starts_at_zero() {
        let cart = Cart::new(&restaurant());
        assert!(cart.is_empty());
        assert_eq!(cart.quantity(10), 0);
        assert_eq!(cart.quantity(11), 0);
        assert!(cart.selected().is_empty());
    }

    #[test]
    fn test_decrement_clamps_at_zero() {
        let mut cart = Cart::new(&restaurant());
        assert_eq!(cart.decrement(10).unwrap(), 0);
        assert_eq!(cart.increment(10).unwrap(), 1);
        assert_eq!(cart.decrement(10).unwrap(), 0);
        assert_eq!(cart.decrement(10).unwrap(), 0);
    }

    #[test]
    fn test_unknown_and_unavailable_products_rejected() {
        let mut cart = Cart::new(&restaurant());
        assert_eq!(
            cart.increment(99),
            Err(CartError::UnknownProduct { product_id: 99 })
        );
        assert_eq!(
            cart.increment(11),
            Err(CartError::Unavailable { product_id: 11 })
        );
        assert_eq!(
            cart.decrement(99),
            Err(CartError::UnknownProduct { product_id: 99 })
        );
    }

    #[test]
    fn test_selected_follows_menu_order() {
        let mut cart = Cart::new(&restaurant());
        cart.increment(12).unwrap();
        cart.increment(10).unwrap();
        cart.increment(10).unwrap();

        let selected: Vec<_> = cart.selected().into_iter().map(|(p, q)| (p.id, q)).collect();
        assert_eq!(selected, vec![(10, 2), (12, 1)]);
    }

    #[test]
    fn test_dismiss_resets_everything() {
        let mut cart = Cart::new(&restaurant());
        cart.increment(10).unwrap();
        cart.increment(12).unwrap();

        cart.dismiss();

        assert!(cart.is_empty());
        assert_eq!(cart.quantity(10), 0);
    }

    #[test]
    fn test_confirm_requires_a_selection() {
        let cart = Cart::new(&restaurant());
        assert_eq!(cart.confirm("Calle Betis 3"), Err(CartError::NothingSelected));
    }

    #[test]
    fn test_confirm_requires_an_address() {
        let mut cart = Cart::new(&restaurant());
        cart.increment(10).unwrap();
        assert!(matches!(cart.confirm("   "), Err(CartError::Address(_))));
    }

    #[rstest]
    // 2 × 4.50€ = 9.00€: shipping charged
    #[case(2, 0, 900, 250, 1150, false)]
    // 2 × 4.50€ + 1 × 1.00€ = 10.00€: not above threshold, still charged
    #[case(2, 1, 1000, 250, 1250, false)]
    // 3 × 4.50€ = 13.50€: waived
    #[case(3, 0, 1350, 0, 1350, true)]
    fn test_summary_totals(
        #[case] margherita: i64,
        #[case] extra: i64,
        #[case] subtotal: i64,
        #[case] shipping: i64,
        #[case] total: i64,
        #[case] free_shipping: bool,
    ) {
        let mut cart = Cart::new(&restaurant());
        for _ in 0..margherita {
            cart.increment(10).unwrap();
        }
        for _ in 0..extra {
            cart.increment(12).unwrap();
        }

        let confirmation = cart.confirm(" Calle Betis 3 ").unwrap();
        let summary = confirmation.summary;

        assert_eq!(summary.subtotal, Money::from_cents(subtotal));
        assert_eq!(summary.shipping_costs, Money::from_cents(shipping));
        assert_eq!(summary.total, Money::from_cents(total));
        assert_eq!(summary.free_shipping, free_shipping);
        assert_eq!(summary.lines[0].line_total, Money::from_cents(450 * margherita));
    }

    #[test]
    fn test_confirm_builds_create_payload() {
        let mut cart = Cart::new(&restaurant());
        cart.increment(10).unwrap();

        let confirmation = cart.confirm(" Calle Betis 3 ").unwrap();

        match confirmation.request {
            OrderRequest::Create(payload) => {
                assert_eq!(payload.restaurant_id, 1);
                assert_eq!(payload.address, "Calle Betis 3");
                assert_eq!(
                    payload.products,
                    vec![OrderLineRequest {
                        product_id: 10,
                        quantity: 1
                    }]
                );
            }
            other => panic!("expected create, got {:?}", other),
        }
    }

    #[test]
    fn test_edit_cart_prefills_and_builds_update() {
        let mut cart = Cart::for_edit(&restaurant(), &order(1, &[(10, 2), (11, 1), (99, 4)])).unwrap();

        assert_eq!(cart.editing(), Some(7));
        assert_eq!(cart.quantity(10), 2);
        assert_eq!(cart.quantity(11), 1);
        assert_eq!(cart.quantity(99), 0);

        // The unavailable line can still be removed
        assert_eq!(cart.decrement(11).unwrap(), 0);

        let confirmation = cart.confirm("Calle Betis 3").unwrap();
        match confirmation.request {
            OrderRequest::Update { order_id, payload } => {
                assert_eq!(order_id, 7);
                assert_eq!(payload.products.len(), 1);
                assert_eq!(payload.products[0].quantity, 2);
            }
            other => panic!("expected update, got {:?}", other),
        }
    }

    #[test]
    fn test_confirm_rejects_unavailable_line_kept_from_edit() {
        let mut cart = Cart::for_edit(&restaurant(), &order(1, &[(10, 1), (11, 2)])).unwrap();

        assert_eq!(
            cart.confirm("Calle Betis 3"),
            Err(CartError::Unavailable { product_id: 11 })
        );

        cart.decrement(11).unwrap();
        cart.decrement(11).unwrap();
        assert!(cart.confirm("Calle Betis 3").is_ok());
    }

    #[test]
    fn test_confirm_rejects_total_that_overflows() {
        let cart = Cart::for_edit(&restaurant(), &order(1, &[(10, i64::MAX)])).unwrap();

        assert_eq!(
            cart.confirm("Calle Betis 3"),
            Err(CartError::Rule(OrderRuleError::TotalTooLarge))
        );
    }

    #[test]
    fn test_edit_cart_for_other_restaurant_rejected() {
        let err = Cart::for_edit(&restaurant(), &order(2, &[(10, 1)])).unwrap_err();
        assert!(matches!(err, CartError::WrongRestaurant { order_restaurant: 2, .. }));
    }
}
