//! Error types for stock batch processing.

use stockroom_core::ProductId;

use crate::db::RepositoryError;

/// Errors produced while applying a stock adjustment batch.
///
/// The first failing item aborts the whole batch, so one of these always
/// describes the item that stopped it.
#[derive(Debug, thiserror::Error)]
pub enum StockBatchError {
    /// A batch item referenced a product that does not exist.
    #[error("Product with ID {0} not found")]
    NotFound(ProductId),

    /// A sales or waste item asked for more than the product has available.
    #[error("Insufficient stock for product {name}. Available: {available}, Requested: {requested}")]
    InsufficientStock {
        /// Display name of the product that ran short.
        name: String,
        /// Units available when the item was applied.
        available: i32,
        /// Units the item asked for.
        requested: i32,
    },

    /// The batch or one of its items was malformed.
    #[error("{0}")]
    InvalidInput(String),

    /// The database aborted the transaction because of a concurrent batch.
    #[error("stock batch aborted by a concurrent update, retry the request")]
    Conflict,

    /// Underlying database failure.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
