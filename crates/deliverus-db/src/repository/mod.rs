//! # Repository Module
//!
//! Database repository implementations for DeliverUS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  db.products().get_many(&[3, 7, 9])                            │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── get_many(&self, ids)      ← one query for a whole order           │
//! │  ├── list_by_restaurant(&self, restaurant_id)                          │
//! │  └── popular(&self, limit)                                             │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`RestaurantRepository`](restaurant::RestaurantRepository) - Restaurants, their menus and categories
//! - [`ProductRepository`](product::ProductRepository) - Product lookups and popularity
//! - [`OrderRepository`](order::OrderRepository) - Orders, order lines and status changes

pub mod order;
pub mod product;
pub mod restaurant;
