//! HTTP route handlers for the inventory API.
//!
//! # Route Structure
//!
//! ```text
//! # Products
//! POST   /products                  - Create product (multipart form)
//! GET    /products                  - List active products (paged)
//! GET    /products/{id}             - Product detail
//! PUT    /products/{id}             - Update product (multipart form)
//! PATCH  /products/{id}             - Soft-delete product
//! POST   /products/sales            - Apply a sales batch
//! POST   /products/waste            - Apply a waste batch
//! POST   /products/add-orders       - Apply a restock batch
//! POST   /products/calculate-profit - Profit remaining after salaries
//!
//! # Orders
//! POST   /orders                    - Create order
//! GET    /orders                    - List orders (paged)
//! GET    /orders/{id}               - Order detail
//! PUT    /orders/{id}               - Replace order lines
//! DELETE /orders/{id}               - Delete order
//! ```
//!
//! Liveness, readiness and the `/uploads` static mount are wired up next to
//! server startup in `main.rs`.

pub mod orders;
pub mod products;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};

use crate::state::AppState;

/// Largest accepted request body, sized for product image uploads.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(products::create).get(products::index))
        .route("/sales", post(products::sales))
        .route("/waste", post(products::waste))
        .route("/add-orders", post(products::add_orders))
        .route("/calculate-profit", post(products::calculate_profit))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .patch(products::remove),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(orders::create).get(orders::index))
        .route(
            "/{id}",
            get(orders::show).put(orders::update).delete(orders::remove),
        )
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Product catalog, stock batches, profit
        .nest("/products", product_routes())
        // Orders
        .nest("/orders", order_routes())
}
