//! Database operations for the product catalog.
//!
//! Plain CRUD goes through [`ProductRepository`] against the pool. The stock
//! helpers at the bottom instead take an explicit transaction handle, so a
//! batch coordinator can keep every read and write of one batch inside a
//! single transaction.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

use stockroom_core::{ProductId, StockLevel};

use super::{RepositoryError, page_offset};
use crate::models::product::{CreateProductInput, Product, UpdateProductInput};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    category: String,
    name: String,
    price: Decimal,
    description: String,
    image: String,
    quantity: i32,
    sales: i32,
    waste: i32,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        let available = StockLevel::new(row.quantity, row.sales, row.waste).available();
        Self {
            id: ProductId::new(row.id),
            category: row.category,
            name: row.name,
            price: row.price,
            description: row.description,
            image: row.image,
            quantity: row.quantity,
            sales: row.sales,
            waste: row.waste,
            available,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const PRODUCT_COLUMNS: &str = "id, category, name, price, description, image, \
     quantity, sales, waste, is_active, created_at, updated_at";

/// A product's name and stock counters, as locked inside a batch transaction.
#[derive(Debug, Clone)]
pub struct ProductStock {
    /// Display name, carried along for error reporting.
    pub name: String,
    /// The three counters as a value object.
    pub level: StockLevel,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for product catalog database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a new product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, input: &CreateProductInput) -> Result<Product, RepositoryError> {
        let row: ProductRow = sqlx::query_as(&format!(
            "INSERT INTO products (category, name, price, description, image, quantity)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&input.category)
        .bind(&input.name)
        .bind(input.price)
        .bind(&input.description)
        .bind(&input.image)
        .bind(input.quantity)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// List active products in insertion order.
    ///
    /// Returns the requested page together with the total count of active
    /// products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(&self, page: u32, limit: u32) -> Result<(Vec<Product>, i64), RepositoryError> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS}
             FROM products
             WHERE is_active = TRUE
             ORDER BY id
             LIMIT $1 OFFSET $2"
        ))
        .bind(i64::from(limit))
        .bind(page_offset(page, limit))
        .fetch_all(self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE is_active = TRUE")
            .fetch_one(self.pool)
            .await?;

        Ok((rows.into_iter().map(Into::into).collect(), total))
    }

    /// Get a product by ID. Inactive products are still reachable by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Update a product; absent input fields keep their stored values.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist and
    /// `RepositoryError::Conflict` if the update would overdraw the stock
    /// counters.
    pub async fn update(
        &self,
        id: ProductId,
        input: &UpdateProductInput,
    ) -> Result<Product, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "UPDATE products SET
                 category = COALESCE($2, category),
                 name = COALESCE($3, name),
                 price = COALESCE($4, price),
                 description = COALESCE($5, description),
                 image = COALESCE($6, image),
                 quantity = COALESCE($7, quantity),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .bind(input.category.as_deref())
        .bind(input.name.as_deref())
        .bind(input.price)
        .bind(input.description.as_deref())
        .bind(input.image.as_deref())
        .bind(input.quantity)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_check_violation()
            {
                return RepositoryError::Conflict(
                    "stock counters cannot go negative".to_string(),
                );
            }
            RepositoryError::Database(e)
        })?;

        row.map(Into::into).ok_or(RepositoryError::NotFound)
    }

    /// Soft-delete a product by clearing its active flag.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    pub async fn soft_delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE products SET is_active = FALSE, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    // =========================================================================
    // Stock helpers (transaction-scoped)
    // =========================================================================

    /// Load a product's counters inside `tx`, locking the row.
    ///
    /// `FOR UPDATE` serializes concurrent batches touching the same product;
    /// re-reads within the same transaction observe earlier
    /// [`store_stock`](Self::store_stock) writes.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn stock_for_update(
        tx: &mut Transaction<'_, Postgres>,
        id: ProductId,
    ) -> Result<Option<ProductStock>, RepositoryError> {
        let row: Option<(String, i32, i32, i32)> = sqlx::query_as(
            "SELECT name, quantity, sales, waste FROM products WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(row.map(|(name, quantity, sales, waste)| ProductStock {
            name,
            level: StockLevel::new(quantity, sales, waste),
        }))
    }

    /// Persist updated counters inside `tx`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn store_stock(
        tx: &mut Transaction<'_, Postgres>,
        id: ProductId,
        level: StockLevel,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "UPDATE products
             SET quantity = $2, sales = $3, waste = $4, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(level.quantity)
        .bind(level.sales)
        .bind(level.waste)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}
