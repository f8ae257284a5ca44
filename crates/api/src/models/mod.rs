//! Domain models and wire types for the inventory API.

pub mod order;
pub mod product;

use serde::Serialize;

pub use order::{CreateOrderInput, Order, OrderDetail, OrderLine, OrderLineDetail, UpdateOrderInput};
pub use product::{CreateProductInput, Product, StockAdjustment, UpdateProductInput};

/// One page of a listing, with the total count across all pages.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    /// The rows on this page.
    pub data: Vec<T>,
    /// Total matching rows across all pages.
    pub total: i64,
    /// 1-based page number that was requested.
    pub page: u32,
    /// Page size that was requested.
    pub limit: u32,
}
