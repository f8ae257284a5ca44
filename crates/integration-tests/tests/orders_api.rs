//! Integration tests for the order endpoints.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p stockroom-api)
//!
//! Run with: cargo test -p stockroom-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use stockroom_integration_tests::{
    api_base_url, client, create_test_product, fetch_product, unique_name,
};

/// Create an order and return its parsed body.
async fn create_order(client: &Client, record: &Value) -> Value {
    let base_url = api_base_url();
    let resp = client
        .post(format!("{base_url}/orders"))
        .json(&json!({ "record": record }))
        .send()
        .await
        .expect("Failed to create order");

    assert_eq!(resp.status(), StatusCode::CREATED, "Order create should return 201");
    resp.json().await.expect("Failed to parse order response")
}

// ============================================================================
// CRUD Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_order_create_and_fetch() {
    let client = client();
    let base_url = api_base_url();
    let a = create_test_product(&client, &unique_name("Order A"), 50).await;
    let b = create_test_product(&client, &unique_name("Order B"), 30).await;

    let order = create_order(
        &client,
        &json!([
            { "productId": a.id, "amount": 2 },
            { "productId": b.id, "amount": 1 },
        ]),
    )
    .await;
    let order_id = order["id"].as_i64().expect("Order should have an id");

    let resp = client
        .get(format!("{base_url}/orders/{order_id}"))
        .send()
        .await
        .expect("Failed to fetch order");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse order");
    let record = body["record"].as_array().expect("record should be an array");
    assert_eq!(record.len(), 2);
    assert_eq!(record[0]["product"]["name"], a.name);
    assert_eq!(record[0]["amount"], 2);
    assert_eq!(record[1]["product"]["name"], b.name);
    assert_eq!(record[1]["amount"], 1);
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_order_listing_shape() {
    let client = client();
    let base_url = api_base_url();
    let a = create_test_product(&client, &unique_name("Order List"), 50).await;
    create_order(&client, &json!([{ "productId": a.id, "amount": 1 }])).await;

    let resp = client
        .get(format!("{base_url}/orders?page=1&limit=5"))
        .send()
        .await
        .expect("Failed to list orders");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse response");
    assert!(body["data"].is_array());
    assert!(body["total"].as_i64().expect("total should be a number") >= 1);
    assert_eq!(body["page"], 1);
    assert_eq!(body["limit"], 5);
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_order_update_replaces_lines() {
    let client = client();
    let base_url = api_base_url();
    let a = create_test_product(&client, &unique_name("Old Line"), 50).await;
    let b = create_test_product(&client, &unique_name("New Line"), 50).await;

    let order = create_order(&client, &json!([{ "productId": a.id, "amount": 2 }])).await;
    let order_id = order["id"].as_i64().expect("Order should have an id");

    let resp = client
        .put(format!("{base_url}/orders/{order_id}"))
        .json(&json!({ "record": [{ "productId": b.id, "amount": 3 }] }))
        .send()
        .await
        .expect("Failed to update order");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{base_url}/orders/{order_id}"))
        .send()
        .await
        .expect("Failed to fetch order");
    let body: Value = resp.json().await.expect("Failed to parse order");
    let record = body["record"].as_array().expect("record should be an array");
    assert_eq!(record.len(), 1, "Update must replace the lines, not append");
    assert_eq!(record[0]["product"]["name"], b.name);
    assert_eq!(record[0]["amount"], 3);
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_order_delete() {
    let client = client();
    let base_url = api_base_url();
    let a = create_test_product(&client, &unique_name("Doomed"), 50).await;

    let order = create_order(&client, &json!([{ "productId": a.id, "amount": 1 }])).await;
    let order_id = order["id"].as_i64().expect("Order should have an id");

    let resp = client
        .delete(format!("{base_url}/orders/{order_id}"))
        .send()
        .await
        .expect("Failed to delete order");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(
        body["message"],
        format!("Order with ID {order_id} deleted successfully")
    );

    let resp = client
        .get(format!("{base_url}/orders/{order_id}"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_order_fetch_unknown_returns_404() {
    let client = client();
    let base_url = api_base_url();

    let resp = client
        .get(format!("{base_url}/orders/999999999"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = resp.json().await.expect("Failed to parse error body");
    assert_eq!(body["error"], "Order with ID 999999999 not found");
}

// ============================================================================
// Validation Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_order_create_empty_record_rejected() {
    let client = client();
    let base_url = api_base_url();

    let resp = client
        .post(format!("{base_url}/orders"))
        .json(&json!({ "record": [] }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_order_create_malformed_body_rejected() {
    let client = client();
    let base_url = api_base_url();

    // An array instead of the record object must get the JSON error envelope
    let resp = client
        .post(format!("{base_url}/orders"))
        .json(&json!([]))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.expect("Failed to parse error body");
    let message = body["error"]
        .as_str()
        .expect("Error body should have an error field");
    assert!(
        message.starts_with("invalid order payload"),
        "Unexpected message: {message}"
    );
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_order_create_non_positive_amount_rejected() {
    let client = client();
    let base_url = api_base_url();
    let a = create_test_product(&client, &unique_name("Zero Amount"), 50).await;

    let resp = client
        .post(format!("{base_url}/orders"))
        .json(&json!({ "record": [{ "productId": a.id, "amount": 0 }] }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_order_create_unknown_product_rejected() {
    let client = client();
    let base_url = api_base_url();

    let resp = client
        .post(format!("{base_url}/orders"))
        .json(&json!({ "record": [{ "productId": 999_999_999, "amount": 1 }] }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.expect("Failed to parse error body");
    assert_eq!(
        body["error"],
        "Invalid order data. Please check the product IDs and amounts."
    );
}

// ============================================================================
// Stock Isolation Tests
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and PostgreSQL"]
async fn test_orders_never_touch_stock_counters() {
    let client = client();
    let a = create_test_product(&client, &unique_name("Untouched"), 50).await;

    create_order(&client, &json!([{ "productId": a.id, "amount": 10 }])).await;

    let after = fetch_product(&client, a.id).await;
    assert_eq!(after.quantity, 50);
    assert_eq!(after.sales, 0);
    assert_eq!(after.waste, 0);
    assert_eq!(after.available, 50);
}
