//! Product domain models for the catalog and its stock counters.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use stockroom_core::{ProductId, StockLevel};

/// A catalog product with its running stock counters.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Category label (e.g., "beverages").
    pub category: String,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Decimal,
    /// Free-form description.
    pub description: String,
    /// Public URL of the product image.
    pub image: String,
    /// Total units ever stocked.
    pub quantity: i32,
    /// Cumulative units sold.
    pub sales: i32,
    /// Cumulative units discarded.
    pub waste: i32,
    /// Derived availability: `quantity - (sales + waste)`.
    pub available: i32,
    /// Soft-delete marker; inactive products are hidden from listings.
    pub is_active: bool,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// The product's counters as a stock-level value object.
    #[must_use]
    pub const fn stock(&self) -> StockLevel {
        StockLevel::new(self.quantity, self.sales, self.waste)
    }
}

/// Input for creating a new product.
///
/// Arrives as a multipart form; the image part has already been stored and
/// turned into a public URL by the time this struct exists.
#[derive(Debug, Clone)]
pub struct CreateProductInput {
    /// Category label.
    pub category: String,
    /// Display name.
    pub name: String,
    /// Unit price.
    pub price: Decimal,
    /// Free-form description.
    pub description: String,
    /// Public URL of the stored image.
    pub image: String,
    /// Initial stocked quantity.
    pub quantity: i32,
}

/// Input for updating a product. All fields optional; `None` leaves the
/// stored value unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateProductInput {
    /// New category label.
    pub category: Option<String>,
    /// New display name.
    pub name: Option<String>,
    /// New unit price.
    pub price: Option<Decimal>,
    /// New description.
    pub description: Option<String>,
    /// Public URL of a replacement image.
    pub image: Option<String>,
    /// New total stocked quantity.
    pub quantity: Option<i32>,
}

/// One entry of a stock adjustment batch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAdjustment {
    /// Product whose counters the delta applies to.
    pub product_id: ProductId,
    /// Units to add to the chosen counter; must be positive.
    pub quantity: i32,
}
