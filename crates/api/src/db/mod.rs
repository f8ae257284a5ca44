//! Database operations for the inventory `PostgreSQL`.
//!
//! ## Tables
//!
//! - `products` - Catalog entries with running stock counters
//! - `orders` - Order headers
//! - `order_lines` - Per-order `(product, amount)` line items
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p stockroom-cli -- migrate
//! ```

pub mod orders;
pub mod products;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use orders::OrderRepository;
pub use products::ProductRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., dangling product reference).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Row offset for a 1-based page: `(page - 1) * limit`.
pub(crate) fn page_offset(page: u32, limit: u32) -> i64 {
    (i64::from(page) - 1) * i64::from(limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_offset_first_page() {
        assert_eq!(page_offset(1, 10), 0);
    }

    #[test]
    fn test_page_offset_later_pages() {
        assert_eq!(page_offset(2, 10), 10);
        assert_eq!(page_offset(5, 25), 100);
    }

    #[test]
    fn test_page_offset_large_values_do_not_overflow() {
        assert_eq!(
            page_offset(u32::MAX, u32::MAX),
            (i64::from(u32::MAX) - 1) * i64::from(u32::MAX)
        );
    }
}
