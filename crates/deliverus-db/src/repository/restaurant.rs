//! # Restaurant Repository
//!
//! Database operations for restaurants and restaurant categories.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::product::ProductRepository;
use deliverus_core::{Money, Restaurant, RestaurantCategory, RestaurantDetail, RestaurantStatus};

const RESTAURANT_COLUMNS: &str = "id, name, description, address, shipping_costs, \
     average_service_minutes, logo, hero_image, status, restaurant_category_id";

/// Fields of a restaurant to be inserted; the id is assigned by SQLite.
#[derive(Debug, Clone)]
pub struct NewRestaurant {
    pub name: String,
    pub description: Option<String>,
    pub address: String,
    pub shipping_costs: Money,
    pub average_service_minutes: Option<f64>,
    pub logo: Option<String>,
    pub hero_image: Option<String>,
    pub status: RestaurantStatus,
    pub restaurant_category_id: i64,
}

/// Repository for restaurant database operations.
#[derive(Debug, Clone)]
pub struct RestaurantRepository {
    pool: SqlitePool,
}

impl RestaurantRepository {
    pub fn new(pool: SqlitePool) -> Self {
        RestaurantRepository { pool }
    }

    /// Lists every restaurant, by name.
    pub async fn list(&self) -> DbResult<Vec<Restaurant>> {
        let restaurants = sqlx::query_as::<_, Restaurant>(&format!(
            "SELECT {RESTAURANT_COLUMNS} FROM restaurants ORDER BY name, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = restaurants.len(), "Listed restaurants");
        Ok(restaurants)
    }

    /// Gets a restaurant by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Restaurant))` - Restaurant found
    /// * `Ok(None)` - No such restaurant
    /// * `Err(DbError)` - The lookup itself failed
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Restaurant>> {
        let restaurant = sqlx::query_as::<_, Restaurant>(&format!(
            "SELECT {RESTAURANT_COLUMNS} FROM restaurants WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(restaurant)
    }

    /// Gets a restaurant with its category and its menu.
    pub async fn get_detail(&self, id: i64) -> DbResult<RestaurantDetail> {
        let restaurant = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Restaurant", id))?;

        let restaurant_category = sqlx::query_as::<_, RestaurantCategory>(
            "SELECT id, name FROM restaurant_categories WHERE id = ?1",
        )
        .bind(restaurant.restaurant_category_id)
        .fetch_optional(&self.pool)
        .await?;

        let products = ProductRepository::new(self.pool.clone())
            .list_by_restaurant(id)
            .await?;

        debug!(restaurant_id = id, products = products.len(), "Loaded restaurant detail");

        Ok(RestaurantDetail {
            restaurant,
            restaurant_category,
            products,
        })
    }

    /// Lists restaurant categories, by name.
    pub async fn categories(&self) -> DbResult<Vec<RestaurantCategory>> {
        let categories = sqlx::query_as::<_, RestaurantCategory>(
            "SELECT id, name FROM restaurant_categories ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    pub async fn insert_category(&self, name: &str) -> DbResult<RestaurantCategory> {
        let result = sqlx::query("INSERT INTO restaurant_categories (name) VALUES (?1)")
            .bind(name)
            .execute(&self.pool)
            .await?;

        Ok(RestaurantCategory {
            id: result.last_insert_rowid(),
            name: name.to_string(),
        })
    }

    /// Inserts a restaurant and returns it with its new id.
    pub async fn insert(&self, new: &NewRestaurant) -> DbResult<Restaurant> {
        debug!(name = %new.name, "Inserting restaurant");

        let result = sqlx::query(
            r#"
            INSERT INTO restaurants (
                name, description, address, shipping_costs, average_service_minutes,
                logo, hero_image, status, restaurant_category_id
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&new.name)
        .bind(&new.description)
        .bind(&new.address)
        .bind(new.shipping_costs)
        .bind(new.average_service_minutes)
        .bind(&new.logo)
        .bind(&new.hero_image)
        .bind(new.status)
        .bind(new.restaurant_category_id)
        .execute(&self.pool)
        .await?;

        Ok(Restaurant {
            id: result.last_insert_rowid(),
            name: new.name.clone(),
            description: new.description.clone(),
            address: new.address.clone(),
            shipping_costs: new.shipping_costs,
            average_service_minutes: new.average_service_minutes,
            logo: new.logo.clone(),
            hero_image: new.hero_image.clone(),
            status: new.status,
            restaurant_category_id: new.restaurant_category_id,
        })
    }

    /// Counts restaurants.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM restaurants")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
