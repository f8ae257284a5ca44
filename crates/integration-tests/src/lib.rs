//! Integration tests for Stockroom.
//!
//! # Running Tests
//!
//! ```bash
//! # Start PostgreSQL, then run migrations
//! cargo run -p stockroom-cli -- migrate
//!
//! # Start the API
//! cargo run -p stockroom-api
//!
//! # Run the integration tests
//! cargo test -p stockroom-integration-tests -- --ignored
//! ```
//!
//! Tests are `#[ignore]`d by default because they need a running server.
//! Each test creates the products it needs through the API, so the suite can
//! run against a database that already has data in it.

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

/// Minimal stand-in for an uploaded image. The server checks the declared
/// content type, not the bytes.
pub const TEST_IMAGE: &[u8] = b"\x89PNG\r\n\x1a\nstockroom integration test image";

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn api_base_url() -> String {
    std::env::var("STOCKROOM_API_BASE_URL").unwrap_or_else(|_| "http://localhost:3300".to_string())
}

/// Plain HTTP client.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn client() -> Client {
    Client::builder().build().expect("Failed to create HTTP client")
}

/// A unique display name so tests never collide on shared state.
#[must_use]
pub fn unique_name(prefix: &str) -> String {
    format!("{prefix} {}", Uuid::new_v4())
}

/// The product fields the tests assert on. Everything else in the response
/// is ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCounters {
    pub id: i32,
    pub name: String,
    pub quantity: i32,
    pub sales: i32,
    pub waste: i32,
    pub available: i32,
    pub is_active: bool,
}

/// Create a product through the API and return its counters.
///
/// # Panics
///
/// Panics if the API rejects the request.
pub async fn create_test_product(client: &Client, name: &str, quantity: i32) -> ProductCounters {
    let base_url = api_base_url();
    let form = product_form(name, quantity);

    let resp = client
        .post(format!("{base_url}/products"))
        .multipart(form)
        .send()
        .await
        .expect("Failed to create test product");

    assert_eq!(
        resp.status(),
        StatusCode::CREATED,
        "Product create should return 201"
    );
    resp.json().await.expect("Failed to parse product response")
}

/// A complete multipart form for product create.
///
/// # Panics
///
/// Panics if the image part cannot be built.
#[must_use]
pub fn product_form(name: &str, quantity: i32) -> reqwest::multipart::Form {
    reqwest::multipart::Form::new()
        .text("category", "Integration")
        .text("name", name.to_string())
        .text("price", "9.99")
        .text("description", "Created by integration tests")
        .text("quantity", quantity.to_string())
        .part(
            "image",
            reqwest::multipart::Part::bytes(TEST_IMAGE.to_vec())
                .file_name("test.png")
                .mime_str("image/png")
                .expect("Valid mime type"),
        )
}

/// Fetch a product by ID and return its counters.
///
/// # Panics
///
/// Panics if the product does not exist.
pub async fn fetch_product(client: &Client, id: i32) -> ProductCounters {
    let base_url = api_base_url();
    let resp = client
        .get(format!("{base_url}/products/{id}"))
        .send()
        .await
        .expect("Failed to fetch product");

    assert_eq!(resp.status(), StatusCode::OK, "Product fetch should return 200");
    resp.json().await.expect("Failed to parse product response")
}

/// POST a stock batch to `/products/{endpoint}` and return the raw response.
///
/// # Panics
///
/// Panics if the request cannot be sent.
pub async fn post_batch(client: &Client, endpoint: &str, items: &Value) -> reqwest::Response {
    let base_url = api_base_url();
    client
        .post(format!("{base_url}/products/{endpoint}"))
        .json(items)
        .send()
        .await
        .expect("Failed to send stock batch")
}
