//! Seed the database with demo products.
//!
//! Intended for local development. The command does nothing when the
//! products table already has rows, so it is safe to run repeatedly.

use secrecy::SecretString;
use tracing::info;

use stockroom_api::db;

/// Demo catalog rows: category, name, price, description, image, quantity.
const DEMO_PRODUCTS: [(&str, &str, &str, &str, &str, i32); 6] = [
    (
        "Beverages",
        "Espresso Beans 1kg",
        "18.50",
        "Dark roast arabica blend for espresso machines.",
        "https://placehold.co/400x300?text=Espresso+Beans",
        120,
    ),
    (
        "Beverages",
        "Oat Milk 1L",
        "2.95",
        "Barista edition oat drink.",
        "https://placehold.co/400x300?text=Oat+Milk",
        200,
    ),
    (
        "Bakery",
        "Croissant",
        "1.80",
        "Butter croissant, baked daily.",
        "https://placehold.co/400x300?text=Croissant",
        60,
    ),
    (
        "Bakery",
        "Sourdough Loaf",
        "4.50",
        "Stone-baked sourdough, 800g.",
        "https://placehold.co/400x300?text=Sourdough",
        35,
    ),
    (
        "Supplies",
        "Paper Cups 12oz (50 pack)",
        "6.20",
        "Double-walled takeaway cups.",
        "https://placehold.co/400x300?text=Paper+Cups",
        80,
    ),
    (
        "Supplies",
        "Napkins (200 pack)",
        "3.10",
        "Recycled paper napkins.",
        "https://placehold.co/400x300?text=Napkins",
        150,
    ),
];

/// Errors that can occur while seeding.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Seed demo products into an empty catalog.
///
/// # Errors
///
/// Returns an error if the database is unreachable or an insert fails.
pub async fn run() -> Result<(), SeedError> {
    dotenvy::dotenv().ok();

    let database_url = database_url()?;

    info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
        .fetch_one(&pool)
        .await?;
    if count > 0 {
        info!(products = count, "Products table is not empty, skipping seed");
        return Ok(());
    }

    for (category, name, price, description, image, quantity) in DEMO_PRODUCTS {
        sqlx::query(
            "INSERT INTO products (category, name, price, description, image, quantity)
             VALUES ($1, $2, $3::numeric, $4, $5, $6)",
        )
        .bind(category)
        .bind(name)
        .bind(price)
        .bind(description)
        .bind(image)
        .bind(quantity)
        .execute(&pool)
        .await?;
    }

    info!(products = DEMO_PRODUCTS.len(), "Seeded demo products");
    Ok(())
}

fn database_url() -> Result<SecretString, SeedError> {
    std::env::var("STOCKROOM_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| SeedError::MissingEnvVar("STOCKROOM_DATABASE_URL"))
}
