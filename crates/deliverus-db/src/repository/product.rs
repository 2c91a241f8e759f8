//! # Product Repository
//!
//! Database operations for products and product categories.
//!
//! ## Batched Lookup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Validating an order with N lines                                       │
//! │                                                                         │
//! │  One query per line:           One query per order (get_many):          │
//! │    SELECT ... WHERE id = 3       SELECT ... WHERE id IN (3, 7, 9)       │
//! │    SELECT ... WHERE id = 7              │                               │
//! │    SELECT ... WHERE id = 9              ▼                               │
//! │    (N round-trips)               HashMap { 3 → .., 7 → .., 9 → .. }     │
//! │                                  checked in memory by deliverus-core    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use deliverus_core::{Money, PopularProduct, Product, ProductCategory, RestaurantSummary};

const PRODUCT_COLUMNS: &str = r#"id, restaurant_id, name, description, price, image, "order", availability, product_category_id"#;

/// Fields of a product to be inserted; the id is assigned by SQLite.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub restaurant_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: Money,
    pub image: Option<String>,
    pub order: i64,
    pub availability: bool,
    pub product_category_id: i64,
}

/// Row of the popularity query: product, its restaurant, units sold.
#[derive(Debug, FromRow)]
struct PopularRow {
    #[sqlx(flatten)]
    product: Product,
    restaurant_name: String,
    restaurant_logo: Option<String>,
    sold_product_count: i64,
}

impl From<PopularRow> for PopularProduct {
    fn from(row: PopularRow) -> Self {
        PopularProduct {
            restaurant: RestaurantSummary {
                id: row.product.restaurant_id,
                name: row.restaurant_name,
                logo: row.restaurant_logo,
            },
            product: row.product,
            sold_product_count: row.sold_product_count,
        }
    }
}

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Fetches every listed product in a single query, keyed by id.
    ///
    /// Ids with no product are simply absent from the map.
    pub async fn get_many(&self, ids: &[i64]) -> DbResult<HashMap<i64, Product>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id IN ("));
        let mut separated = query.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let products = query
            .build_query_as::<Product>()
            .fetch_all(&self.pool)
            .await?;

        debug!(requested = ids.len(), found = products.len(), "Batched product lookup");

        Ok(products.into_iter().map(|p| (p.id, p)).collect())
    }

    /// Lists a restaurant's menu by display position.
    pub async fn list_by_restaurant(&self, restaurant_id: i64) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            r#"SELECT {PRODUCT_COLUMNS} FROM products WHERE restaurant_id = ?1 ORDER BY "order", id"#
        ))
        .bind(restaurant_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// The best-selling products across all restaurants.
    ///
    /// Ranked by units ordered, ties broken by product id.
    pub async fn popular(&self, limit: u32) -> DbResult<Vec<PopularProduct>> {
        let rows = sqlx::query_as::<_, PopularRow>(
            r#"
            SELECT
                p.id AS id, p.restaurant_id AS restaurant_id, p.name AS name,
                p.description AS description, p.price AS price, p.image AS image,
                p."order" AS "order", p.availability AS availability,
                p.product_category_id AS product_category_id,
                r.name AS restaurant_name,
                r.logo AS restaurant_logo,
                SUM(op.quantity) AS sold_product_count
            FROM order_products op
            INNER JOIN products p ON p.id = op.product_id
            INNER JOIN restaurants r ON r.id = p.restaurant_id
            GROUP BY p.id
            ORDER BY sold_product_count DESC, p.id
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Loaded popular products");
        Ok(rows.into_iter().map(PopularProduct::from).collect())
    }

    /// Lists product categories, by name.
    pub async fn categories(&self) -> DbResult<Vec<ProductCategory>> {
        let categories = sqlx::query_as::<_, ProductCategory>(
            "SELECT id, name FROM product_categories ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    pub async fn insert_category(&self, name: &str) -> DbResult<ProductCategory> {
        let result = sqlx::query("INSERT INTO product_categories (name) VALUES (?1)")
            .bind(name)
            .execute(&self.pool)
            .await?;

        Ok(ProductCategory {
            id: result.last_insert_rowid(),
            name: name.to_string(),
        })
    }

    /// Inserts a product and returns it with its new id.
    pub async fn insert(&self, new: &NewProduct) -> DbResult<Product> {
        debug!(restaurant_id = new.restaurant_id, name = %new.name, "Inserting product");

        let result = sqlx::query(
            r#"
            INSERT INTO products (
                restaurant_id, name, description, price, image,
                "order", availability, product_category_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(new.restaurant_id)
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.price)
        .bind(&new.image)
        .bind(new.order)
        .bind(new.availability)
        .bind(new.product_category_id)
        .execute(&self.pool)
        .await?;

        Ok(Product {
            id: result.last_insert_rowid(),
            restaurant_id: new.restaurant_id,
            name: new.name.clone(),
            description: new.description.clone(),
            price: new.price,
            image: new.image.clone(),
            order: new.order,
            availability: new.availability,
            product_category_id: new.product_category_id,
        })
    }

    /// Marks a product as orderable or not.
    pub async fn set_availability(&self, id: i64, availability: bool) -> DbResult<()> {
        let result = sqlx::query("UPDATE products SET availability = ?2 WHERE id = ?1")
            .bind(id)
            .bind(availability)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        debug!(product_id = id, availability, "Product availability changed");
        Ok(())
    }

    /// Counts products.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::test_support::fixture;

    #[tokio::test]
    async fn test_get_many_returns_only_existing() {
        let f = fixture().await;

        let found = f
            .db
            .products()
            .get_many(&[f.available.id, f.foreign.id, 9999])
            .await
            .unwrap();

        assert_eq!(found.len(), 2);
        assert_eq!(found[&f.available.id], f.available);
        assert_eq!(found[&f.foreign.id].restaurant_id, f.other_restaurant.id);
        assert!(!found.contains_key(&9999));
    }

    #[tokio::test]
    async fn test_get_many_with_no_ids() {
        let f = fixture().await;
        assert!(f.db.products().get_many(&[]).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_availability_round_trips_as_bool() {
        let f = fixture().await;

        let product = f.db.products().get_by_id(f.unavailable.id).await.unwrap().unwrap();
        assert!(!product.availability);

        f.db.products().set_availability(f.unavailable.id, true).await.unwrap();
        let product = f.db.products().get_by_id(f.unavailable.id).await.unwrap().unwrap();
        assert!(product.availability);

        let err = f.db.products().set_availability(9999, true).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_popular_is_empty_without_orders() {
        let f = fixture().await;
        assert!(f.db.products().popular(3).await.unwrap().is_empty());
        assert_eq!(f.db.products().count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_categories() {
        let f = fixture().await;
        let names: Vec<_> = f
            .db
            .products()
            .categories()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Drinks"]);
    }
}
