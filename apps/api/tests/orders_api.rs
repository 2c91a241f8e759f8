//! End-to-end tests driving the router with `oneshot` against an in-memory
//! database.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use rstest::rstest;
use serde_json::{json, Value};
use tower::ServiceExt;

use deliverus_api::{create_router, ApiConfig, AppState};
use deliverus_core::{Money, OrderStatus, Product, Restaurant, RestaurantStatus};
use deliverus_db::{Database, DbConfig, NewProduct, NewRestaurant};

const CUSTOMER: i64 = 1;
const OTHER_CUSTOMER: i64 = 2;

// =============================================================================
// Harness
// =============================================================================

/// Restaurant R1 ("Casa Pepe", shipping 2.50€) sells A (4.50€, available)
/// and B (2.00€, unavailable). Restaurant R2 sells C (6.00€).
struct TestApp {
    state: Arc<AppState>,
    router: Router,
    r1: Restaurant,
    r2: Restaurant,
    a: Product,
    b: Product,
    c: Product,
}

async fn spawn_app() -> TestApp {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();

    let pizza = db.restaurants().insert_category("Pizza").await.unwrap();
    let drinks = db.products().insert_category("Drinks").await.unwrap();

    let restaurant = |name: &str, shipping: i64| NewRestaurant {
        name: name.to_string(),
        description: None,
        address: "Av. Reina Mercedes s/n".to_string(),
        shipping_costs: Money::from_cents(shipping),
        average_service_minutes: None,
        logo: None,
        hero_image: None,
        status: RestaurantStatus::Online,
        restaurant_category_id: pizza.id,
    };
    let r1 = db.restaurants().insert(&restaurant("Casa Pepe", 250)).await.unwrap();
    let r2 = db.restaurants().insert(&restaurant("Burger Sur", 150)).await.unwrap();

    let product = |restaurant_id: i64, name: &str, price: i64, order: i64, availability: bool| {
        NewProduct {
            restaurant_id,
            name: name.to_string(),
            description: None,
            price: Money::from_cents(price),
            image: None,
            order,
            availability,
            product_category_id: drinks.id,
        }
    };
    let a = db.products().insert(&product(r1.id, "Margherita", 450, 1, true)).await.unwrap();
    let b = db.products().insert(&product(r1.id, "Lemonade", 200, 2, false)).await.unwrap();
    let c = db.products().insert(&product(r2.id, "Cheeseburger", 600, 1, true)).await.unwrap();

    let state = AppState::new(db, ApiConfig::default());
    let router = create_router(state.clone());

    TestApp {
        state,
        router,
        r1,
        r2,
        a,
        b,
        c,
    }
}

impl TestApp {
    fn token(&self, customer_id: i64) -> String {
        self.state.jwt.issue(customer_id).unwrap()
    }

    async fn call(
        &self,
        method: Method,
        uri: &str,
        customer_id: Option<i64>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(id) = customer_id {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", self.token(id)));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn create_order(&self, customer_id: i64, products: Value) -> (StatusCode, Value) {
        self.call(
            Method::POST,
            "/orders",
            Some(customer_id),
            Some(json!({
                "restaurantId": self.r1.id,
                "address": "Calle Sierpes 1",
                "products": products,
            })),
        )
        .await
    }

    async fn pending_order(&self) -> i64 {
        let (status, body) = self
            .create_order(CUSTOMER, json!([{ "productId": self.a.id, "quantity": 1 }]))
            .await;
        assert_eq!(status, StatusCode::CREATED);
        body["id"].as_i64().unwrap()
    }

    async fn advance(&self, order_id: i64, step: &str) -> (StatusCode, Value) {
        self.call(
            Method::PATCH,
            &format!("/orders/{}/{}", order_id, step),
            Some(CUSTOMER),
            None,
        )
        .await
    }
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn test_create_order_with_available_product() {
    let app = spawn_app().await;

    let (status, body) = app
        .create_order(CUSTOMER, json!([{ "productId": app.a.id, "quantity": 2 }]))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "pending");
    assert_eq!(body["customerId"], CUSTOMER);
    assert_eq!(body["restaurant"]["name"], "Casa Pepe");
    // 2 × 4.50€ = 9.00€, not above 10.00€, so shipping applies
    assert_eq!(body["shippingCosts"], 250);
    assert_eq!(body["price"], 1150);
    assert_eq!(body["products"][0]["productId"], app.a.id);
    assert_eq!(body["products"][0]["quantity"], 2);
    assert_eq!(body["products"][0]["unityPrice"], 450);
}

#[tokio::test]
async fn test_create_waives_shipping_above_threshold() {
    let app = spawn_app().await;

    let (status, body) = app
        .create_order(CUSTOMER, json!([{ "productId": app.a.id, "quantity": 3 }]))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["shippingCosts"], 0);
    assert_eq!(body["price"], 1350);
}

#[tokio::test]
async fn test_create_with_unavailable_product_fails() {
    let app = spawn_app().await;

    let (status, body) = app
        .create_order(CUSTOMER, json!([{ "productId": app.b.id, "quantity": 1 }]))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "PRODUCT_UNAVAILABLE");
}

#[tokio::test]
async fn test_create_with_foreign_product_fails() {
    let app = spawn_app().await;

    let (status, body) = app
        .create_order(
            CUSTOMER,
            json!([
                { "productId": app.a.id, "quantity": 1 },
                { "productId": app.c.id, "quantity": 1 },
            ]),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "RESTAURANT_MISMATCH");
}

#[tokio::test]
async fn test_create_for_unknown_restaurant_fails() {
    let app = spawn_app().await;

    let (status, body) = app
        .call(
            Method::POST,
            "/orders",
            Some(CUSTOMER),
            Some(json!({
                "restaurantId": 9999,
                "address": "Calle Sierpes 1",
                "products": [{ "productId": app.a.id, "quantity": 1 }],
            })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "INVALID_RESTAURANT");
}

#[rstest]
#[case::empty_products(json!({ "restaurantId": 1, "address": "x", "products": [] }), "products")]
#[case::missing_address(json!({ "restaurantId": 1, "products": [{ "productId": 1, "quantity": 1 }] }), "address")]
#[case::blank_address(json!({ "restaurantId": 1, "address": "   ", "products": [{ "productId": 1, "quantity": 1 }] }), "address")]
#[case::zero_quantity(json!({ "restaurantId": 1, "address": "x", "products": [{ "productId": 1, "quantity": 0 }] }), "products[0].quantity")]
#[case::missing_restaurant(json!({ "address": "x", "products": [{ "productId": 1, "quantity": 1 }] }), "restaurantId")]
#[tokio::test]
async fn test_create_field_validation(#[case] body: Value, #[case] field: &str) {
    let app = spawn_app().await;

    let (status, response) = app.call(Method::POST, "/orders", Some(CUSTOMER), Some(body)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response["code"], "VALIDATION_ERROR");
    let fields: Vec<&str> = response["errors"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["field"].as_str())
        .collect();
    assert!(fields.contains(&field), "{:?} missing {}", fields, field);
}

#[tokio::test]
async fn test_create_collects_every_field_error() {
    let app = spawn_app().await;

    let (status, body) = app
        .call(Method::POST, "/orders", Some(CUSTOMER), Some(json!({ "products": [] })))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = spawn_app().await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/orders")
        .header(header::AUTHORIZATION, format!("Bearer {}", app.token(CUSTOMER)))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
// One line whose total does not fit
#[case(&[9_000_000_000_000_000_000])]
// Two lines for the same product, merged before pricing
#[case(&[i64::MAX / 2 + 1, i64::MAX / 2 + 1])]
#[tokio::test]
async fn test_create_with_total_too_large_fails(#[case] quantities: &[i64]) {
    let app = spawn_app().await;
    let products: Vec<Value> = quantities
        .iter()
        .map(|quantity| json!({ "productId": app.a.id, "quantity": quantity }))
        .collect();

    let (status, body) = app.create_order(CUSTOMER, Value::from(products)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "INVALID_ORDER");

    let (_, orders) = app.call(Method::GET, "/orders", Some(CUSTOMER), None).await;
    assert!(orders.as_array().unwrap().is_empty());
}

// =============================================================================
// Update
// =============================================================================

#[rstest]
#[case::numeric(json!(1))]
#[case::null(Value::Null)]
#[case::string(json!("1"))]
#[tokio::test]
async fn test_update_rejects_restaurant_id(#[case] restaurant_id: Value) {
    let app = spawn_app().await;
    let order_id = app.pending_order().await;

    let (status, body) = app
        .call(
            Method::PUT,
            &format!("/orders/{}", order_id),
            Some(CUSTOMER),
            Some(json!({
                "restaurantId": restaurant_id,
                "address": "Calle Betis 3",
                "products": [{ "productId": app.a.id, "quantity": 1 }],
            })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["errors"][0]["field"], "restaurantId");
}

#[tokio::test]
async fn test_update_replaces_lines_and_reprices() {
    let app = spawn_app().await;
    let order_id = app.pending_order().await;

    let (status, body) = app
        .call(
            Method::PUT,
            &format!("/orders/{}", order_id),
            Some(CUSTOMER),
            Some(json!({
                "address": "  Calle Betis 3  ",
                "products": [{ "productId": app.a.id, "quantity": 4 }],
            })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["address"], "Calle Betis 3");
    assert_eq!(body["products"].as_array().unwrap().len(), 1);
    assert_eq!(body["products"][0]["quantity"], 4);
    assert_eq!(body["shippingCosts"], 0);
    assert_eq!(body["price"], 1800);
}

#[tokio::test]
async fn test_update_with_other_restaurant_product_then_after_sent() {
    let app = spawn_app().await;
    let order_id = app.pending_order().await;
    let uri = format!("/orders/{}", order_id);

    let (status, body) = app
        .call(
            Method::PUT,
            &uri,
            Some(CUSTOMER),
            Some(json!({
                "address": "Calle Betis 3",
                "products": [{ "productId": app.c.id, "quantity": 1 }],
            })),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "RESTAURANT_MISMATCH");

    assert_eq!(app.advance(order_id, "confirm").await.0, StatusCode::OK);
    assert_eq!(app.advance(order_id, "send").await.0, StatusCode::OK);

    let (status, body) = app
        .call(
            Method::PUT,
            &uri,
            Some(CUSTOMER),
            Some(json!({
                "address": "Calle Betis 3",
                "products": [{ "productId": app.a.id, "quantity": 1 }],
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "ORDER_NOT_PENDING");
}

#[tokio::test]
async fn test_update_with_unavailable_product_fails() {
    let app = spawn_app().await;
    let order_id = app.pending_order().await;
    let uri = format!("/orders/{}", order_id);

    let (status, body) = app
        .call(
            Method::PUT,
            &uri,
            Some(CUSTOMER),
            Some(json!({
                "address": "Calle Betis 3",
                "products": [
                    { "productId": app.a.id, "quantity": 2 },
                    { "productId": app.b.id, "quantity": 1 },
                ],
            })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "PRODUCT_UNAVAILABLE");

    // The order keeps its original line and price
    let (_, order) = app.call(Method::GET, &uri, Some(CUSTOMER), None).await;
    assert_eq!(order["products"].as_array().unwrap().len(), 1);
    assert_eq!(order["products"][0]["quantity"], 1);
    assert_eq!(order["price"], 700);
}

#[tokio::test]
async fn test_update_with_total_too_large_fails() {
    let app = spawn_app().await;
    let order_id = app.pending_order().await;

    let (status, body) = app
        .call(
            Method::PUT,
            &format!("/orders/{}", order_id),
            Some(CUSTOMER),
            Some(json!({
                "address": "Calle Betis 3",
                "products": [{ "productId": app.a.id, "quantity": i64::MAX }],
            })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "INVALID_ORDER");
}

#[tokio::test]
async fn test_update_of_unknown_order() {
    let app = spawn_app().await;

    let (status, body) = app
        .call(
            Method::PUT,
            "/orders/9999",
            Some(CUSTOMER),
            Some(json!({
                "address": "Calle Betis 3",
                "products": [{ "productId": app.a.id, "quantity": 1 }],
            })),
        )
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "INVALID_ORDER");
}

// =============================================================================
// Read / Delete / Ownership
// =============================================================================

#[tokio::test]
async fn test_list_is_per_customer_newest_first() {
    let app = spawn_app().await;
    let first = app.pending_order().await;
    let second = app.pending_order().await;
    app.create_order(OTHER_CUSTOMER, json!([{ "productId": app.a.id, "quantity": 1 }]))
        .await;

    let (status, body) = app.call(Method::GET, "/orders", Some(CUSTOMER), None).await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![second, first]);
    assert_eq!(body[0]["restaurant"]["id"], app.r1.id);
}

#[tokio::test]
async fn test_orders_require_token() {
    let app = spawn_app().await;

    let (status, body) = app.call(Method::GET, "/orders", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let request = Request::builder()
        .uri("/orders")
        .header(header::AUTHORIZATION, "Bearer not-a-jwt")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_other_customers_order_is_forbidden() {
    let app = spawn_app().await;
    let order_id = app.pending_order().await;
    let uri = format!("/orders/{}", order_id);

    let (status, body) = app.call(Method::GET, &uri, Some(OTHER_CUSTOMER), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");

    let (status, _) = app.call(Method::DELETE, &uri, Some(OTHER_CUSTOMER), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .call(
            Method::PUT,
            &uri,
            Some(OTHER_CUSTOMER),
            Some(json!({
                "address": "Calle Betis 3",
                "products": [{ "productId": app.a.id, "quantity": 1 }],
            })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_delete_pending_order() {
    let app = spawn_app().await;
    let order_id = app.pending_order().await;
    let uri = format!("/orders/{}", order_id);

    let (status, _) = app.call(Method::DELETE, &uri, Some(CUSTOMER), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app.call(Method::GET, &uri, Some(CUSTOMER), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_delete_non_pending_order_fails() {
    let app = spawn_app().await;
    let order_id = app.pending_order().await;
    app.advance(order_id, "confirm").await;

    let (status, body) = app
        .call(Method::DELETE, &format!("/orders/{}", order_id), Some(CUSTOMER), None)
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "ORDER_NOT_PENDING");
}

// =============================================================================
// Lifecycle
// =============================================================================

#[tokio::test]
async fn test_status_walks_one_step_at_a_time() {
    let app = spawn_app().await;
    let order_id = app.pending_order().await;

    let (status, body) = app.advance(order_id, "deliver").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_TRANSITION");

    for (step, expected) in [
        ("confirm", OrderStatus::InProcess),
        ("send", OrderStatus::Sent),
        ("deliver", OrderStatus::Delivered),
    ] {
        let (status, body) = app.advance(order_id, step).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], expected.as_str());
    }

    let (_, body) = app
        .call(Method::GET, &format!("/orders/{}", order_id), Some(CUSTOMER), None)
        .await;
    assert!(body["startedAt"].is_string());
    assert!(body["sentAt"].is_string());
    assert!(body["deliveredAt"].is_string());
}

// =============================================================================
// Restaurants / Products
// =============================================================================

#[tokio::test]
async fn test_restaurant_detail_lists_menu_in_order() {
    let app = spawn_app().await;

    let (status, body) = app
        .call(Method::GET, &format!("/restaurants/{}", app.r1.id), None, None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Casa Pepe");
    assert_eq!(body["restaurantCategory"]["name"], "Pizza");
    let menu: Vec<i64> = body["products"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    assert_eq!(menu, vec![app.a.id, app.b.id]);

    let (status, _) = app.call(Method::GET, "/restaurants/9999", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_catalog_endpoints() {
    let app = spawn_app().await;

    let (status, body) = app.call(Method::GET, "/restaurants", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
    assert_eq!(body[0]["id"], app.r2.id);

    let (status, body) = app.call(Method::GET, "/restaurantCategories", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["name"], "Pizza");

    let (status, body) = app.call(Method::GET, "/productCategories", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["name"], "Drinks");

    let (status, body) = app
        .call(Method::GET, &format!("/products/{}", app.c.id), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["restaurantId"], app.r2.id);

    let (status, _) = app.call(Method::GET, "/products/9999", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.call(Method::GET, "/products/abc", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_popular_products_ranked_by_units() {
    let app = spawn_app().await;
    app.create_order(CUSTOMER, json!([{ "productId": app.a.id, "quantity": 2 }]))
        .await;
    app.call(
        Method::POST,
        "/orders",
        Some(CUSTOMER),
        Some(json!({
            "restaurantId": app.r2.id,
            "address": "Calle Sierpes 1",
            "products": [{ "productId": app.c.id, "quantity": 5 }],
        })),
    )
    .await;

    let (status, body) = app.call(Method::GET, "/products/popular", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["id"], app.c.id);
    assert_eq!(body[0]["soldProductCount"], 5);
    assert_eq!(body[0]["restaurant"]["name"], "Burger Sur");
    assert_eq!(body[1]["id"], app.a.id);
}

#[tokio::test]
async fn test_health() {
    let app = spawn_app().await;

    let (status, body) = app.call(Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], true);
}
