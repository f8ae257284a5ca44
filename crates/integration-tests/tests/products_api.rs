//! Integration tests for the product catalog endpoints.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p stockroom-api)
//!
//! Run with: cargo test -p stockroom-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use stockroom_integration_tests::{
    TEST_IMAGE, api_base_url, client, create_test_product, product_form, unique_name,
};

// ============================================================================
// Health Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_health_endpoints() {
    let client = client();
    let base_url = api_base_url();

    let resp = client
        .get(format!("{base_url}/health"))
        .send()
        .await
        .expect("Failed to reach health endpoint");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.expect("Failed to read body"), "ok");

    let resp = client
        .get(format!("{base_url}/health/ready"))
        .send()
        .await
        .expect("Failed to reach readiness endpoint");
    assert_eq!(resp.status(), StatusCode::OK);
}

// ============================================================================
// Create & Read Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_product_create_returns_full_product() {
    let client = client();
    let base_url = api_base_url();
    let name = unique_name("Create");

    let resp = client
        .post(format!("{base_url}/products"))
        .multipart(product_form(&name, 25))
        .send()
        .await
        .expect("Failed to create product");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["name"], name);
    assert_eq!(body["category"], "Integration");
    assert_eq!(body["price"], "9.99");
    assert_eq!(body["quantity"], 25);
    assert_eq!(body["sales"], 0);
    assert_eq!(body["waste"], 0);
    assert_eq!(body["available"], 25);
    assert_eq!(body["isActive"], true);
    assert!(
        body["image"]
            .as_str()
            .expect("image should be a string")
            .contains("/uploads/"),
        "Image should record the public upload URL"
    );
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_uploaded_image_is_served_back() {
    let client = client();
    let base_url = api_base_url();

    let resp = client
        .post(format!("{base_url}/products"))
        .multipart(product_form(&unique_name("Image"), 5))
        .send()
        .await
        .expect("Failed to create product");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.expect("Failed to parse response");
    let image_url = body["image"].as_str().expect("image should be a string");

    let resp = client
        .get(image_url)
        .send()
        .await
        .expect("Failed to fetch stored image");
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = resp.bytes().await.expect("Failed to read image bytes");
    assert_eq!(bytes.as_ref(), TEST_IMAGE);
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_product_listing_shape() {
    let client = client();
    let base_url = api_base_url();
    create_test_product(&client, &unique_name("List"), 10).await;

    let resp = client
        .get(format!("{base_url}/products?page=1&limit=5"))
        .send()
        .await
        .expect("Failed to list products");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse response");
    assert!(body["data"].is_array());
    assert!(body["total"].as_i64().expect("total should be a number") >= 1);
    assert_eq!(body["page"], 1);
    assert_eq!(body["limit"], 5);
    assert!(
        body["data"]
            .as_array()
            .expect("data should be an array")
            .len()
            <= 5
    );
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_product_listing_only_contains_active_products() {
    let client = client();
    let base_url = api_base_url();
    let product = create_test_product(&client, &unique_name("Deleted"), 10).await;

    let resp = client
        .patch(format!("{base_url}/products/{}", product.id))
        .send()
        .await
        .expect("Failed to delete product");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client
        .get(format!("{base_url}/products?page=1&limit=50"))
        .send()
        .await
        .expect("Failed to list products");
    let body: Value = resp.json().await.expect("Failed to parse response");
    for item in body["data"].as_array().expect("data should be an array") {
        assert_eq!(item["isActive"], true, "Listing must only show active products");
    }
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_soft_deleted_product_still_reachable_by_id() {
    let client = client();
    let base_url = api_base_url();
    let product = create_test_product(&client, &unique_name("Tombstone"), 10).await;

    let resp = client
        .patch(format!("{base_url}/products/{}", product.id))
        .send()
        .await
        .expect("Failed to delete product");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client
        .get(format!("{base_url}/products/{}", product.id))
        .send()
        .await
        .expect("Failed to fetch product");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["isActive"], false);
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_product_get_unknown_returns_404() {
    let client = client();
    let base_url = api_base_url();

    let resp = client
        .get(format!("{base_url}/products/999999999"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = resp.json().await.expect("Failed to parse error body");
    assert_eq!(body["error"], "Product with ID 999999999 not found");
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_pagination_zero_values_rejected() {
    let client = client();
    let base_url = api_base_url();

    let resp = client
        .get(format!("{base_url}/products?page=0"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = client
        .get(format!("{base_url}/products?limit=0"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Update & Delete Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_product_update_changes_only_sent_fields() {
    let client = client();
    let base_url = api_base_url();
    let product = create_test_product(&client, &unique_name("Before"), 30).await;
    let new_name = unique_name("After");

    let form = reqwest::multipart::Form::new().text("name", new_name.clone());
    let resp = client
        .put(format!("{base_url}/products/{}", product.id))
        .multipart(form)
        .send()
        .await
        .expect("Failed to update product");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["name"], new_name);
    assert_eq!(body["quantity"], 30, "Unsent fields must keep their values");
    assert_eq!(body["price"], "9.99");
    assert_eq!(body["category"], "Integration");
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_product_update_unknown_returns_404() {
    let client = client();
    let base_url = api_base_url();

    let form = reqwest::multipart::Form::new().text("name", "ghost");
    let resp = client
        .put(format!("{base_url}/products/999999999"))
        .multipart(form)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_product_update_rejects_negative_price() {
    let client = client();
    let base_url = api_base_url();
    let product = create_test_product(&client, &unique_name("Priced"), 10).await;

    let form = reqwest::multipart::Form::new().text("price", "-1.00");
    let resp = client
        .put(format!("{base_url}/products/{}", product.id))
        .multipart(form)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Create Validation Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_product_create_missing_field_rejected() {
    let client = client();
    let base_url = api_base_url();

    // Everything except price
    let form = reqwest::multipart::Form::new()
        .text("category", "Integration")
        .text("name", unique_name("No Price"))
        .text("description", "missing price")
        .text("quantity", "5")
        .part(
            "image",
            reqwest::multipart::Part::bytes(TEST_IMAGE.to_vec())
                .file_name("test.png")
                .mime_str("image/png")
                .expect("Valid mime type"),
        );

    let resp = client
        .post(format!("{base_url}/products"))
        .multipart(form)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.expect("Failed to parse error body");
    assert_eq!(body["error"], "price is required");
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_product_create_missing_image_rejected() {
    let client = client();
    let base_url = api_base_url();

    let form = reqwest::multipart::Form::new()
        .text("category", "Integration")
        .text("name", unique_name("No Image"))
        .text("price", "1.00")
        .text("description", "missing image")
        .text("quantity", "5");

    let resp = client
        .post(format!("{base_url}/products"))
        .multipart(form)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.expect("Failed to parse error body");
    assert_eq!(body["error"], "Image file is required");
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_product_create_rejects_non_image_upload() {
    let client = client();
    let base_url = api_base_url();

    let form = reqwest::multipart::Form::new()
        .text("category", "Integration")
        .text("name", unique_name("Bad Type"))
        .text("price", "1.00")
        .text("description", "wrong content type")
        .text("quantity", "5")
        .part(
            "image",
            reqwest::multipart::Part::bytes(b"not an image".to_vec())
                .file_name("notes.txt")
                .mime_str("text/plain")
                .expect("Valid mime type"),
        );

    let resp = client
        .post(format!("{base_url}/products"))
        .multipart(form)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Profit Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_calculate_profit() {
    let client = client();
    let base_url = api_base_url();

    let resp = client
        .post(format!("{base_url}/products/calculate-profit"))
        .json(&json!({
            "salaries": [{ "salary": 3000 }, { "salary": 2000 }, { "salary": 1000 }],
            "profit": 10000,
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["remainingProfit"], "4000");
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_calculate_profit_empty_salaries_rejected() {
    let client = client();
    let base_url = api_base_url();

    let resp = client
        .post(format!("{base_url}/products/calculate-profit"))
        .json(&json!({ "salaries": [], "profit": 10000 }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
