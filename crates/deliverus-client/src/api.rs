//! # REST Client
//!
//! Typed calls to the DeliverUS API, one method per endpoint.
//!
//! ```text
//! screen ──► DeliverUsClient::create_order(&CreateOrder)
//!                 │  POST {base}/orders   Authorization: Bearer ...
//!                 ▼
//!            2xx ──► JSON decoded into deliverus-core types
//!            4xx/5xx ──► ClientError::Api { status, code, message, errors }
//! ```

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use deliverus_core::{
    CreateOrder, FieldError, Order, OrderDetail, OrderWithRestaurant, PopularProduct, Product,
    ProductCategory, Restaurant, RestaurantCategory, RestaurantDetail, UpdateOrder,
};

use crate::error::{ClientError, ClientResult};

/// Error document returned by the API on failure.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: Option<String>,
    message: String,
    #[serde(default)]
    errors: Vec<FieldError>,
}

/// HTTP client for the DeliverUS API.
#[derive(Debug, Clone)]
pub struct DeliverUsClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl DeliverUsClient {
    /// Creates a client for `base_url` (e.g. `http://localhost:8080`).
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        let base_url = base_url.into();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ClientError::InvalidUrl(base_url));
        }

        Ok(DeliverUsClient {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Sets the bearer token sent with every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    // =========================================================================
    // Restaurants
    // =========================================================================

    /// `GET /restaurants`
    pub async fn restaurants(&self) -> ClientResult<Vec<Restaurant>> {
        self.get("restaurants").await
    }

    /// `GET /restaurants/{id}`
    pub async fn restaurant(&self, id: i64) -> ClientResult<RestaurantDetail> {
        self.get(&format!("restaurants/{}", id)).await
    }

    /// `GET /restaurantCategories`
    pub async fn restaurant_categories(&self) -> ClientResult<Vec<RestaurantCategory>> {
        self.get("restaurantCategories").await
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// `GET /products/{id}`
    pub async fn product(&self, id: i64) -> ClientResult<Product> {
        self.get(&format!("products/{}", id)).await
    }

    /// `GET /products/popular`
    pub async fn popular_products(&self) -> ClientResult<Vec<PopularProduct>> {
        self.get("products/popular").await
    }

    /// `GET /productCategories`
    pub async fn product_categories(&self) -> ClientResult<Vec<ProductCategory>> {
        self.get("productCategories").await
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// `GET /orders`
    pub async fn orders(&self) -> ClientResult<Vec<OrderWithRestaurant>> {
        self.get("orders").await
    }

    /// `GET /orders/{id}`
    pub async fn order(&self, id: i64) -> ClientResult<OrderDetail> {
        self.get(&format!("orders/{}", id)).await
    }

    /// `POST /orders`
    pub async fn create_order(&self, payload: &CreateOrder) -> ClientResult<OrderDetail> {
        self.send_json(Method::POST, "orders", payload).await
    }

    /// `PUT /orders/{id}`
    pub async fn update_order(&self, id: i64, payload: &UpdateOrder) -> ClientResult<OrderDetail> {
        self.send_json(Method::PUT, &format!("orders/{}", id), payload)
            .await
    }

    /// `DELETE /orders/{id}`
    pub async fn remove_order(&self, id: i64) -> ClientResult<()> {
        let response = self
            .request(Method::DELETE, &format!("orders/{}", id))
            .send()
            .await?;
        check(response).await.map(|_| ())
    }

    /// `PATCH /orders/{id}/confirm`
    pub async fn confirm_order(&self, id: i64) -> ClientResult<Order> {
        self.patch(&format!("orders/{}/confirm", id)).await
    }

    /// `PATCH /orders/{id}/send`
    pub async fn send_order(&self, id: i64) -> ClientResult<Order> {
        self.patch(&format!("orders/{}/send", id)).await
    }

    /// `PATCH /orders/{id}/deliver`
    pub async fn deliver_order(&self, id: i64) -> ClientResult<Order> {
        self.patch(&format!("orders/{}/deliver", id)).await
    }

    // =========================================================================
    // Plumbing
    // =========================================================================

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        debug!(%method, %url, "API request");

        let builder = self.http.request(method, url);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.request(Method::GET, path).send().await?;
        decode(check(response).await?).await
    }

    async fn patch<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.request(Method::PATCH, path).send().await?;
        decode(check(response).await?).await
    }

    async fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let response = self.request(method, path).json(body).send().await?;
        decode(check(response).await?).await
    }
}

/// Turns a non-2xx response into `ClientError::Api`.
async fn check(response: Response) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let bytes = response.bytes().await?;
    let error = match serde_json::from_slice::<ErrorBody>(&bytes) {
        Ok(body) => ClientError::Api {
            status: status.as_u16(),
            code: body.code,
            message: body.message,
            errors: body.errors,
        },
        Err(_) => {
            let text = String::from_utf8_lossy(&bytes).trim().to_string();
            ClientError::Api {
                status: status.as_u16(),
                code: None,
                message: if text.is_empty() {
                    status.to_string()
                } else {
                    text
                },
                errors: Vec::new(),
            }
        }
    };

    warn!(status = status.as_u16(), error = %error, "API request rejected");
    Err(error)
}

async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
}

// =============================================================================
// Unit Tests
// =============================================================================
