//! Stock adjustment batches.
//!
//! A batch applies one [`AdjustmentKind`] to a list of product/quantity
//! pairs inside a single database transaction. Either every item lands or
//! none do. Items are applied in order and the first failure aborts the
//! batch. Each item re-reads its row inside the transaction, so duplicate
//! product IDs see the counters left by earlier items and accumulate.
//!
//! Rows are locked with `FOR UPDATE` as they are read. Concurrent batches
//! touching the same products serialize; when the database aborts one of
//! them instead, that surfaces as [`StockBatchError::Conflict`] and the
//! client can retry.

mod error;

pub use error::StockBatchError;

use sqlx::{PgPool, Postgres, Transaction};

use stockroom_core::{AdjustmentKind, StockError};

use crate::db::{ProductRepository, RepositoryError};
use crate::models::product::StockAdjustment;

/// Postgres error codes that mean the transaction lost to a concurrent one:
/// serialization_failure and deadlock_detected.
const CONFLICT_CODES: [&str; 2] = ["40001", "40P01"];

/// Applies stock adjustment batches atomically.
pub struct StockService<'a> {
    pool: &'a PgPool,
}

impl<'a> StockService<'a> {
    /// Create a new stock service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Apply a batch of adjustments of one kind, all or nothing.
    ///
    /// # Errors
    ///
    /// Returns the error raised by the first item that could not be applied.
    /// Nothing is persisted unless every item succeeds.
    pub async fn apply_batch(
        &self,
        items: &[StockAdjustment],
        kind: AdjustmentKind,
    ) -> Result<(), StockBatchError> {
        if items.is_empty() {
            return Err(StockBatchError::InvalidInput(
                "batch must contain at least one item".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await.map_err(RepositoryError::from)?;

        match Self::apply_items(&mut tx, items, kind).await {
            Ok(()) => {
                tx.commit()
                    .await
                    .map_err(|e| map_conflict(RepositoryError::from(e).into()))?;
                tracing::info!(kind = %kind, items = items.len(), "stock batch committed");
                Ok(())
            }
            Err(err) => {
                let err = map_conflict(err);
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!(error = %rollback_err, "failed to roll back stock batch");
                }
                Err(err)
            }
        }
    }

    async fn apply_items(
        tx: &mut Transaction<'_, Postgres>,
        items: &[StockAdjustment],
        kind: AdjustmentKind,
    ) -> Result<(), StockBatchError> {
        for item in items {
            let stock = ProductRepository::stock_for_update(tx, item.product_id)
                .await?
                .ok_or(StockBatchError::NotFound(item.product_id))?;

            let level = stock.level.apply(kind, item.quantity).map_err(|err| match err {
                StockError::Insufficient {
                    available,
                    requested,
                } => StockBatchError::InsufficientStock {
                    name: stock.name.clone(),
                    available,
                    requested,
                },
                StockError::NonPositiveAmount { .. } | StockError::Overflow => {
                    StockBatchError::InvalidInput(err.to_string())
                }
            })?;

            ProductRepository::store_stock(tx, item.product_id, level).await?;
        }

        Ok(())
    }
}

/// Rewrite database-level transaction aborts as `Conflict` so callers can
/// tell a retryable race from a real failure.
fn map_conflict(err: StockBatchError) -> StockBatchError {
    if let StockBatchError::Repository(RepositoryError::Database(sqlx::Error::Database(db_err))) =
        &err
        && matches!(db_err.code().as_deref(), Some(code) if CONFLICT_CODES.contains(&code))
    {
        return StockBatchError::Conflict;
    }
    err
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use stockroom_core::ProductId;

    #[tokio::test]
    async fn test_empty_batch_rejected_before_touching_the_database() {
        // connect_lazy never opens a connection, so the early validation
        // path is exercised without a running server.
        let pool = PgPool::connect_lazy("postgres://localhost:1/unused").unwrap();
        let service = StockService::new(&pool);

        let err = service
            .apply_batch(&[], AdjustmentKind::Sales)
            .await
            .unwrap_err();
        assert!(matches!(err, StockBatchError::InvalidInput(_)));
    }

    #[test]
    fn test_not_found_message_names_the_product() {
        let err = StockBatchError::NotFound(ProductId::new(42));
        assert_eq!(err.to_string(), "Product with ID 42 not found");
    }

    #[test]
    fn test_insufficient_stock_message_reports_counts() {
        let err = StockBatchError::InsufficientStock {
            name: "Espresso Beans".to_string(),
            available: 20,
            requested: 30,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for product Espresso Beans. Available: 20, Requested: 30"
        );
    }
}
