//! Database operations for orders.
//!
//! Orders are informational records. They never touch the stock counters;
//! stock movement is handled by the batch endpoints. Order reads join the
//! products table so each line carries the full product it points at.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

use stockroom_core::{OrderId, ProductId, StockLevel};

use super::{RepositoryError, page_offset};
use crate::models::order::{
    CreateOrderInput, Order, OrderDetail, OrderLine, OrderLineDetail, UpdateOrderInput,
};
use crate::models::product::Product;

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for an order line joined with its product.
#[derive(Debug, sqlx::FromRow)]
struct LineRow {
    order_id: i32,
    amount: i32,
    product_id: i32,
    category: String,
    name: String,
    price: Decimal,
    description: String,
    image: String,
    quantity: i32,
    sales: i32,
    waste: i32,
    is_active: bool,
    product_created_at: DateTime<Utc>,
    product_updated_at: DateTime<Utc>,
}

impl LineRow {
    fn into_detail(self) -> (i32, OrderLineDetail) {
        let available = StockLevel::new(self.quantity, self.sales, self.waste).available();
        let product = Product {
            id: ProductId::new(self.product_id),
            category: self.category,
            name: self.name,
            price: self.price,
            description: self.description,
            image: self.image,
            quantity: self.quantity,
            sales: self.sales,
            waste: self.waste,
            available,
            is_active: self.is_active,
            created_at: self.product_created_at,
            updated_at: self.product_updated_at,
        };
        (
            self.order_id,
            OrderLineDetail {
                product,
                amount: self.amount,
            },
        )
    }
}

const LINE_COLUMNS: &str = "l.order_id, l.amount, \
     p.id AS product_id, p.category, p.name, p.price, p.description, p.image, \
     p.quantity, p.sales, p.waste, p.is_active, \
     p.created_at AS product_created_at, p.updated_at AS product_updated_at";

// =============================================================================
// Repository
// =============================================================================

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create an order with its lines.
    ///
    /// The header and all lines are written in one transaction, so an order
    /// referencing an unknown product leaves nothing behind.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a line references a product
    /// that does not exist.
    pub async fn create(&self, input: &CreateOrderInput) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let (id, created_at, updated_at): (i32, DateTime<Utc>, DateTime<Utc>) = sqlx::query_as(
            "INSERT INTO orders DEFAULT VALUES RETURNING id, created_at, updated_at",
        )
        .fetch_one(&mut *tx)
        .await?;

        Self::insert_lines(&mut tx, id, &input.record).await?;

        tx.commit().await?;

        Ok(Order {
            id: OrderId::new(id),
            record: input.record.clone(),
            created_at,
            updated_at,
        })
    }

    /// List orders in insertion order, with their lines joined to products.
    ///
    /// Returns the requested page together with the total order count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list(
        &self,
        page: u32,
        limit: u32,
    ) -> Result<(Vec<OrderDetail>, i64), RepositoryError> {
        let headers: Vec<(i32, DateTime<Utc>, DateTime<Utc>)> = sqlx::query_as(
            "SELECT id, created_at, updated_at FROM orders ORDER BY id LIMIT $1 OFFSET $2",
        )
        .bind(i64::from(limit))
        .bind(page_offset(page, limit))
        .fetch_all(self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(self.pool)
            .await?;

        let ids: Vec<i32> = headers.iter().map(|(id, _, _)| *id).collect();
        let mut lines = Self::fetch_lines(self.pool, &ids).await?;

        let orders = headers
            .into_iter()
            .map(|(id, created_at, updated_at)| OrderDetail {
                id: OrderId::new(id),
                record: lines.remove(&id).unwrap_or_default(),
                created_at,
                updated_at,
            })
            .collect();

        Ok((orders, total))
    }

    /// Get an order by ID, with its lines joined to products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<OrderDetail>, RepositoryError> {
        let header: Option<(i32, DateTime<Utc>, DateTime<Utc>)> = sqlx::query_as(
            "SELECT id, created_at, updated_at FROM orders WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        let Some((id, created_at, updated_at)) = header else {
            return Ok(None);
        };

        let mut lines = Self::fetch_lines(self.pool, &[id]).await?;

        Ok(Some(OrderDetail {
            id: OrderId::new(id),
            record: lines.remove(&id).unwrap_or_default(),
            created_at,
            updated_at,
        }))
    }

    /// Replace an order's lines.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist and
    /// `RepositoryError::Conflict` if a line references a product that does
    /// not exist.
    pub async fn update(
        &self,
        id: OrderId,
        input: &UpdateOrderInput,
    ) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let header: Option<(i32, DateTime<Utc>, DateTime<Utc>)> = sqlx::query_as(
            "UPDATE orders SET updated_at = NOW() WHERE id = $1
             RETURNING id, created_at, updated_at",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((order_id, created_at, updated_at)) = header else {
            return Err(RepositoryError::NotFound);
        };

        sqlx::query("DELETE FROM order_lines WHERE order_id = $1")
            .bind(order_id)
            .execute(&mut *tx)
            .await?;

        Self::insert_lines(&mut tx, order_id, &input.record).await?;

        tx.commit().await?;

        Ok(Order {
            id: OrderId::new(order_id),
            record: input.record.clone(),
            created_at,
            updated_at,
        })
    }

    /// Delete an order. Its lines go with it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order does not exist.
    pub async fn delete(&self, id: OrderId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    // =========================================================================
    // Internal helpers
    // =========================================================================

    async fn insert_lines(
        tx: &mut Transaction<'_, Postgres>,
        order_id: i32,
        lines: &[OrderLine],
    ) -> Result<(), RepositoryError> {
        let mut position = 0_i32;
        for line in lines {
            sqlx::query(
                "INSERT INTO order_lines (order_id, product_id, amount, position)
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(order_id)
            .bind(line.product_id)
            .bind(line.amount)
            .bind(position)
            .execute(&mut **tx)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e
                    && db_err.is_foreign_key_violation()
                {
                    return RepositoryError::Conflict(format!(
                        "order references unknown product {}",
                        line.product_id
                    ));
                }
                RepositoryError::Database(e)
            })?;
            position += 1;
        }
        Ok(())
    }

    /// Fetch the lines for a set of orders, grouped by order ID and sorted
    /// by line position within each order.
    async fn fetch_lines(
        pool: &PgPool,
        order_ids: &[i32],
    ) -> Result<HashMap<i32, Vec<OrderLineDetail>>, RepositoryError> {
        if order_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<LineRow> = sqlx::query_as(&format!(
            "SELECT {LINE_COLUMNS}
             FROM order_lines l
             JOIN products p ON p.id = l.product_id
             WHERE l.order_id = ANY($1)
             ORDER BY l.order_id, l.position"
        ))
        .bind(order_ids)
        .fetch_all(pool)
        .await?;

        let mut lines: HashMap<i32, Vec<OrderLineDetail>> = HashMap::new();
        for row in rows {
            let (order_id, detail) = row.into_detail();
            lines.entry(order_id).or_default().push(detail);
        }

        Ok(lines)
    }
}
