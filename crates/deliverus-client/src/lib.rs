//! # deliverus-client: Customer App Logic
//!
//! Everything the customer app does between a tap and a rendered screen,
//! without the rendering.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       deliverus-client                                  │
//! │                                                                         │
//! │   Restaurant screen          Order summary            My orders         │
//! │   ┌──────────────┐          ┌──────────────┐        ┌──────────────┐    │
//! │   │ cart::Cart   │─confirm─►│ OrderSummary │        │ OrderCard    │    │
//! │   │  +/- per     │          │  lines       │        │ DeleteConf.  │    │
//! │   │  product     │◄─submit──│  shipping    │        │ DetailView   │    │
//! │   └──────┬───────┘          └──────────────┘        └──────┬───────┘    │
//! │          │                                                 │            │
//! │          └────────────────► api::DeliverUsClient ◄─────────┘            │
//! │                                   │  reqwest, bearer token              │
//! │                                   ▼                                     │
//! │                       Result ──► notify::Notification                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use deliverus_client::{Cart, DeliverUsClient, Notification};
//!
//! # async fn run() -> Result<(), deliverus_client::ClientError> {
//! let client = DeliverUsClient::new("http://localhost:8080")?.with_token("token");
//! let restaurant = client.restaurant(1).await?;
//!
//! let mut cart = Cart::new(&restaurant);
//! cart.increment(restaurant.products[0].id)?;
//!
//! let confirmation = cart.confirm("Calle Betis 3")?;
//! let notification = match cart.submit(&client, &confirmation).await {
//!     Ok(_) => Notification::order_created(),
//!     Err(err) => Notification::order_creation_failed(&err),
//! };
//! # let _ = notification;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cart;
pub mod error;
pub mod notify;
pub mod orders;

pub use api::DeliverUsClient;
pub use cart::{Cart, Confirmation, OrderRequest, OrderSummary, SummaryLine};
pub use error::{CartError, ClientError, ClientResult};
pub use notify::{Notification, NotificationKind};
pub use orders::{DeleteConfirmation, OrderAction, OrderCard, OrderDetailView};
