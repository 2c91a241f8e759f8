//! # Order Repository
//!
//! Database operations for orders and their lines.
//!
//! ## Write Guards
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Validation and persistence are separate steps. Between them the       │
//! │  restaurant may already have accepted the order:                        │
//! │                                                                         │
//! │   PUT /orders/9                        restaurant                       │
//! │     validate (status = pending) ✓                                       │
//! │                                        PATCH /orders/9/confirm          │
//! │     UPDATE orders ...                                                   │
//! │       WHERE id = 9 AND status = 'pending'   → 0 rows                    │
//! │     → DbError::StateConflict (nothing written)                         │
//! │                                                                         │
//! │  Every edit, delete and status change carries its expected status in   │
//! │  the WHERE clause, so a stale request can never overwrite a newer one. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::{FromRow, SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use deliverus_core::rules::{PricedLine, PricedOrder};
use deliverus_core::{
    Order, OrderDetail, OrderLine, OrderLineDetail, OrderStatus, OrderWithRestaurant,
    RestaurantSummary,
};

const ORDER_COLUMNS: &str = "o.id AS id, o.restaurant_id AS restaurant_id, \
     o.customer_id AS customer_id, o.address AS address, o.status AS status, o.price AS price, \
     o.shipping_costs AS shipping_costs, o.created_at AS created_at, o.started_at AS started_at, \
     o.sent_at AS sent_at, o.delivered_at AS delivered_at";

/// An order joined with the name and logo of its restaurant.
#[derive(Debug, FromRow)]
struct OrderRow {
    #[sqlx(flatten)]
    order: Order,
    restaurant_name: String,
    restaurant_logo: Option<String>,
}

impl From<OrderRow> for OrderWithRestaurant {
    fn from(row: OrderRow) -> Self {
        OrderWithRestaurant {
            restaurant: RestaurantSummary {
                id: row.order.restaurant_id,
                name: row.restaurant_name,
                logo: row.restaurant_logo,
            },
            order: row.order,
        }
    }
}

/// Repository for order database operations.
#[derive(Debug, Clone)]
pub struct OrderRepository {
    pool: SqlitePool,
}

impl OrderRepository {
    pub fn new(pool: SqlitePool) -> Self {
        OrderRepository { pool }
    }

    /// Lists a customer's orders, newest first.
    pub async fn list_for_customer(&self, customer_id: i64) -> DbResult<Vec<OrderWithRestaurant>> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            r#"
            SELECT {ORDER_COLUMNS},
                   r.name AS restaurant_name,
                   r.logo AS restaurant_logo
            FROM orders o
            INNER JOIN restaurants r ON r.id = o.restaurant_id
            WHERE o.customer_id = ?1
            ORDER BY o.created_at DESC, o.id DESC
            "#
        ))
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        debug!(customer_id, count = rows.len(), "Listed customer orders");
        Ok(rows.into_iter().map(OrderWithRestaurant::from).collect())
    }

    /// Gets an order by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Order))` - Order found
    /// * `Ok(None)` - Order not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Order>> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders o WHERE o.id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }

    /// Gets an order with its restaurant and its product lines.
    pub async fn get_detail(&self, id: i64) -> DbResult<OrderDetail> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r#"
            SELECT {ORDER_COLUMNS},
                   r.name AS restaurant_name,
                   r.logo AS restaurant_logo
            FROM orders o
            INNER JOIN restaurants r ON r.id = o.restaurant_id
            WHERE o.id = ?1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Order", id))?;

        let products = sqlx::query_as::<_, OrderLineDetail>(
            r#"
            SELECT op.product_id AS product_id, p.name AS name,
                   p.description AS description, p.image AS image,
                   op.quantity AS quantity, op.unity_price AS unity_price
            FROM order_products op
            INNER JOIN products p ON p.id = op.product_id
            WHERE op.order_id = ?1
            ORDER BY p."order", p.id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let OrderWithRestaurant { order, restaurant } = row.into();
        Ok(OrderDetail {
            order,
            restaurant,
            products,
        })
    }

    /// Gets the persisted lines of an order.
    pub async fn get_lines(&self, order_id: i64) -> DbResult<Vec<OrderLine>> {
        let lines = sqlx::query_as::<_, OrderLine>(
            r#"
            SELECT order_id, product_id, quantity, unity_price
            FROM order_products
            WHERE order_id = ?1
            ORDER BY product_id
            "#,
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Creates a pending order and its lines in one transaction.
    pub async fn create(
        &self,
        customer_id: i64,
        restaurant_id: i64,
        address: &str,
        priced: &PricedOrder,
    ) -> DbResult<Order> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO orders (
                restaurant_id, customer_id, address, status,
                price, shipping_costs, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(restaurant_id)
        .bind(customer_id)
        .bind(address)
        .bind(OrderStatus::Pending)
        .bind(priced.total)
        .bind(priced.shipping_costs)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        let order_id = result.last_insert_rowid();
        insert_lines(&mut tx, order_id, &priced.lines).await?;

        tx.commit().await?;

        info!(
            order_id,
            customer_id,
            restaurant_id,
            total = %priced.total,
            "Order created"
        );

        Ok(Order {
            id: order_id,
            restaurant_id,
            customer_id,
            address: address.to_string(),
            status: OrderStatus::Pending,
            price: priced.total,
            shipping_costs: priced.shipping_costs,
            created_at: now,
            started_at: None,
            sent_at: None,
            delivered_at: None,
        })
    }

    /// Replaces the address and every line of a pending order.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - No such order
    /// * `DbError::StateConflict` - The order is no longer pending
    pub async fn update(&self, order_id: i64, address: &str, priced: &PricedOrder) -> DbResult<Order> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE orders SET
                address = ?2,
                price = ?3,
                shipping_costs = ?4
            WHERE id = ?1 AND status = 'pending'
            "#,
        )
        .bind(order_id)
        .bind(address)
        .bind(priced.total)
        .bind(priced.shipping_costs)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(self.missing_or_conflict(&mut tx, order_id, "pending").await);
        }

        sqlx::query("DELETE FROM order_products WHERE order_id = ?1")
            .bind(order_id)
            .execute(&mut *tx)
            .await?;
        insert_lines(&mut tx, order_id, &priced.lines).await?;

        tx.commit().await?;

        info!(order_id, total = %priced.total, "Order updated");

        self.get_by_id(order_id)
            .await?
            .ok_or_else(|| DbError::not_found("Order", order_id))
    }

    /// Deletes a pending order; its lines go with it.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - No such order
    /// * `DbError::StateConflict` - The order is no longer pending
    pub async fn delete(&self, order_id: i64) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM orders WHERE id = ?1 AND status = 'pending'")
            .bind(order_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(self.missing_or_conflict(&mut tx, order_id, "pending").await);
        }

        tx.commit().await?;

        info!(order_id, "Order deleted");
        Ok(())
    }

    /// Moves an order from `from` to `to`, stamping the matching timestamp.
    ///
    /// ```text
    /// in process → started_at
    /// sent       → sent_at
    /// delivered  → delivered_at
    /// ```
    pub async fn update_status(
        &self,
        order_id: i64,
        from: OrderStatus,
        to: OrderStatus,
    ) -> DbResult<Order> {
        let column = match to {
            OrderStatus::InProcess => "started_at",
            OrderStatus::Sent => "sent_at",
            OrderStatus::Delivered => "delivered_at",
            OrderStatus::Pending => {
                return Err(DbError::Internal(
                    "orders cannot move back to pending".to_string(),
                ))
            }
        };

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(&format!(
            "UPDATE orders SET status = ?3, {column} = ?4 WHERE id = ?1 AND status = ?2"
        ))
        .bind(order_id)
        .bind(from)
        .bind(to)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(self.missing_or_conflict(&mut tx, order_id, from.as_str()).await);
        }

        tx.commit().await?;

        info!(order_id, from = %from, to = %to, "Order status changed");

        self.get_by_id(order_id)
            .await?
            .ok_or_else(|| DbError::not_found("Order", order_id))
    }

    /// Explains why a guarded write touched no row.
    async fn missing_or_conflict(
        &self,
        conn: &mut SqliteConnection,
        order_id: i64,
        expected: &str,
    ) -> DbError {
        let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM orders WHERE id = ?1")
            .bind(order_id)
            .fetch_one(&mut *conn)
            .await;

        match exists {
            Ok(0) => DbError::not_found("Order", order_id),
            Ok(_) => DbError::state_conflict("Order", order_id, expected),
            Err(e) => e.into(),
        }
    }
}

async fn insert_lines(
    conn: &mut SqliteConnection,
    order_id: i64,
    lines: &[PricedLine],
) -> DbResult<()> {
    for line in lines {
        sqlx::query(
            r#"
            INSERT INTO order_products (order_id, product_id, quantity, unity_price)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(order_id)
        .bind(line.product_id)
        .bind(line.quantity)
        .bind(line.unity_price)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
