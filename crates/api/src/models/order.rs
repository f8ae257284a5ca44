//! Order domain models. Orders list products with amounts and never touch
//! stock counters themselves.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockroom_core::{OrderId, ProductId};

use super::Product;

/// One `(product, amount)` line item of an order, by reference.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    /// Referenced product; must exist when the order is written.
    pub product_id: ProductId,
    /// Units ordered; must be positive.
    pub amount: i32,
}

/// An order as stored: line items keep their product references.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Ordered sequence of line items.
    pub record: Vec<OrderLine>,
    /// When the order was created.
    pub created_at: DateTime<Utc>,
    /// When the order was last updated.
    pub updated_at: DateTime<Utc>,
}

/// One line item with its product reference resolved to a full snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineDetail {
    /// The referenced product, embedded.
    pub product: Product,
    /// Units ordered.
    pub amount: i32,
}

/// An order as read: every product reference dereferenced.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    /// Unique order ID.
    pub id: OrderId,
    /// Ordered sequence of dereferenced line items.
    pub record: Vec<OrderLineDetail>,
    /// When the order was created.
    pub created_at: DateTime<Utc>,
    /// When the order was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new order.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderInput {
    /// Line items; non-empty, every product must exist.
    pub record: Vec<OrderLine>,
}

/// Input for updating an order; replaces the whole line item list.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateOrderInput {
    /// Replacement line items; same validation as on create.
    pub record: Vec<OrderLine>,
}
