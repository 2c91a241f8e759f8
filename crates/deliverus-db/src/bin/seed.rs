//! # Seed Data Generator
//!
//! Populates the database with restaurants and menus for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./deliverus_dev.db
//! cargo run -p deliverus-db --bin seed
//!
//! # Specify database path
//! cargo run -p deliverus-db --bin seed -- --db ./data/deliverus.db
//! ```
//!
//! ## Generated Data
//! - Restaurant and product categories
//! - One restaurant per entry of `RESTAURANTS`, with its menu
//! - Every fourth product unavailable, to exercise the order rules

use std::env;

use deliverus_core::{Money, RestaurantStatus};
use deliverus_db::{Database, DbConfig, NewProduct, NewRestaurant};

const RESTAURANT_CATEGORIES: &[&str] = &["Pizza", "Burgers", "Spanish", "Asian", "Desserts"];

const PRODUCT_CATEGORIES: &[&str] = &["Starters", "Mains", "Drinks", "Desserts"];

/// (product name, product category index, price cents)
type Menu = &'static [(&'static str, usize, i64)];

/// (restaurant name, restaurant category index, shipping cents, menu)
const RESTAURANTS: &[(&str, usize, i64, Menu)] = &[
    (
        "Casa Félix",
        2,
        250,
        &[
            ("Salmorejo", 0, 450),
            ("Croquetas caseras", 0, 600),
            ("Carrillada ibérica", 1, 1250),
            ("Solomillo al whisky", 1, 1100),
            ("Tinto de verano", 2, 250),
            ("Tarta de queso", 3, 500),
        ],
    ),
    (
        "Pizzería Napoli",
        0,
        300,
        &[
            ("Bruschetta", 0, 400),
            ("Margherita", 1, 850),
            ("Quattro formaggi", 1, 1050),
            ("Diavola", 1, 990),
            ("Agua mineral", 2, 150),
            ("Tiramisú", 3, 450),
        ],
    ),
    (
        "100 Montaditos",
        1,
        150,
        &[
            ("Patatas bravas", 0, 300),
            ("Montadito de lomo", 1, 200),
            ("Hamburguesa clásica", 1, 750),
            ("Cerveza", 2, 180),
            ("Brownie", 3, 350),
        ],
    ),
    (
        "Wok Sevilla",
        3,
        200,
        &[
            ("Rollitos de primavera", 0, 350),
            ("Pad thai", 1, 950),
            ("Arroz tres delicias", 1, 650),
            ("Té verde", 2, 200),
            ("Mochi", 3, 400),
        ],
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./deliverus_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("DeliverUS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./deliverus_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 DeliverUS Seed Data Generator");
    println!("================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.restaurants().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} restaurants", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let mut restaurant_categories = Vec::with_capacity(RESTAURANT_CATEGORIES.len());
    for name in RESTAURANT_CATEGORIES {
        restaurant_categories.push(db.restaurants().insert_category(name).await?);
    }

    let mut product_categories = Vec::with_capacity(PRODUCT_CATEGORIES.len());
    for name in PRODUCT_CATEGORIES {
        product_categories.push(db.products().insert_category(name).await?);
    }

    let mut generated = 0;
    for (name, category, shipping, menu) in RESTAURANTS {
        let restaurant = db
            .restaurants()
            .insert(&NewRestaurant {
                name: name.to_string(),
                description: Some(format!("{} in Seville", name)),
                address: "Av. Reina Mercedes s/n, Sevilla".to_string(),
                shipping_costs: Money::from_cents(*shipping),
                average_service_minutes: Some(30.0),
                logo: None,
                hero_image: None,
                status: RestaurantStatus::Online,
                restaurant_category_id: restaurant_categories[*category].id,
            })
            .await?;

        for (position, (product, product_category, price)) in menu.iter().enumerate() {
            db.products()
                .insert(&NewProduct {
                    restaurant_id: restaurant.id,
                    name: product.to_string(),
                    description: None,
                    price: Money::from_cents(*price),
                    image: None,
                    order: position as i64,
                    availability: generated % 4 != 3,
                    product_category_id: product_categories[*product_category].id,
                })
                .await?;
            generated += 1;
        }

        println!("  {} ({} products)", restaurant.name, menu.len());
    }

    println!();
    println!(
        "✓ Seeded {} restaurants and {} products",
        RESTAURANTS.len(),
        generated
    );
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}
