//! Integration tests for stock entries and availability checks.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p ropero-api)
//!
//! Run with: cargo test -p ropero-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use ropero_integration_tests::{
    base_url, client, create_stock_fixture, get_cart, post_json, register_and_login,
};

#[tokio::test]
#[ignore = "Requires a running API server and database"]
async fn test_duplicate_combination_rejected() {
    let client = client();
    let base = base_url();
    let (token, _) = register_and_login(&client, true).await;

    let stock = create_stock_fixture(&client, &token, "10", 5).await;

    let resp = client
        .post(format!("{base}/api/stocks"))
        .bearer_auth(&token)
        .json(&json!({
            "garment_id": stock["garment_id"],
            "size_id": stock["size_id"],
            "color_id": stock["color_id"],
            "quantity": 3,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires a running API server and database"]
async fn test_check_availability() {
    let client = client();
    let base = base_url();
    let (token, _) = register_and_login(&client, true).await;

    let stock = create_stock_fixture(&client, &token, "10", 5).await;

    // Quantity within stock
    let resp = client
        .post(format!("{base}/api/stocks/check-availability"))
        .json(&json!({
            "garment_id": stock["garment_id"],
            "size_id": stock["size_id"],
            "color_id": stock["color_id"],
            "quantity": 5,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["available"], true);
    assert_eq!(body["current_stock"], 5);

    // Quantity beyond stock: still 200, but not available
    let resp = client
        .post(format!("{base}/api/stocks/check-availability"))
        .json(&json!({
            "garment_id": stock["garment_id"],
            "size_id": stock["size_id"],
            "color_id": stock["color_id"],
            "quantity": 6,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["available"], false);
    assert_eq!(body["current_stock"], 5);

    // Unknown combination: 404 with available=false
    let resp = client
        .post(format!("{base}/api/stocks/check-availability"))
        .json(&json!({
            "garment_id": 999_999_999,
            "size_id": 999_999_999,
            "color_id": 999_999_999,
            "quantity": 1,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["available"], false);
}

#[tokio::test]
#[ignore = "Requires a running API server and database"]
async fn test_unavailable_entry_hidden_from_check() {
    let client = client();
    let base = base_url();
    let (token, _) = register_and_login(&client, true).await;

    let stock = create_stock_fixture(&client, &token, "10", 5).await;

    // Flag the entry unavailable
    let resp = client
        .put(format!("{base}/api/stocks/{}/availability", stock["id"]))
        .bearer_auth(&token)
        .json(&json!({ "available": false }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // The combination no longer checks as available
    let resp = client
        .post(format!("{base}/api/stocks/check-availability"))
        .json(&json!({
            "garment_id": stock["garment_id"],
            "size_id": stock["size_id"],
            "color_id": stock["color_id"],
            "quantity": 1,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires a running API server and database"]
async fn test_stock_requires_existing_catalog_records() {
    let client = client();
    let base = base_url();
    let (token, _) = register_and_login(&client, true).await;

    let resp = client
        .post(format!("{base}/api/stocks"))
        .bearer_auth(&token)
        .json(&json!({
            "garment_id": 999_999_999,
            "size_id": 999_999_999,
            "color_id": 999_999_999,
            "quantity": 1,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires a running API server and database"]
async fn test_negative_quantity_rejected() {
    let client = client();
    let base = base_url();
    let (token, _) = register_and_login(&client, true).await;

    let stock = create_stock_fixture(&client, &token, "10", 5).await;

    let resp = client
        .put(format!("{base}/api/stocks/{}", stock["id"]))
        .bearer_auth(&token)
        .json(&json!({ "quantity": -1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires a running API server and database"]
async fn test_stock_listing_by_garment() {
    let client = client();
    let base = base_url();
    let (token, _) = register_and_login(&client, true).await;

    let stock = create_stock_fixture(&client, &token, "10", 5).await;

    let resp = client
        .get(format!("{base}/api/stocks/product/{}", stock["garment_id"]))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let entries: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert!(entries[0]["garment_name"].is_string());
    assert!(entries[0]["size_name"].is_string());
    assert!(entries[0]["color_name"].is_string());
}

#[tokio::test]
#[ignore = "Requires a running API server and database"]
async fn test_stock_delete_removes_cart_lines() {
    let client = client();
    let base = base_url();
    let (admin_token, _) = register_and_login(&client, true).await;
    let (token, user) = register_and_login(&client, false).await;

    let stock = create_stock_fixture(&client, &admin_token, "10", 5).await;
    let cart = get_cart(&client, &token, user["id"].as_i64().unwrap()).await;
    post_json(
        &client,
        &token,
        &format!("{base}/api/carritos/item"),
        &json!({ "cart_id": cart["id"], "stock_id": stock["id"], "quantity": 2 }),
    )
    .await;

    // The entry goes away even while a cart references it
    let resp = client
        .delete(format!("{base}/api/stocks/{}", stock["id"]))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // The cart line went with it
    let cart = get_cart(&client, &token, user["id"].as_i64().unwrap()).await;
    assert!(cart["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
#[ignore = "Requires a running API server and database"]
async fn test_stock_delete_then_garment_delete() {
    let client = client();
    let base = base_url();
    let (token, _) = register_and_login(&client, true).await;

    let stock = create_stock_fixture(&client, &token, "10", 5).await;

    // Garment delete is blocked while the stock entry exists
    let resp = client
        .delete(format!("{base}/api/prendas/{}", stock["garment_id"]))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Delete the stock entry, then the garment goes through
    let resp = client
        .delete(format!("{base}/api/stocks/{}", stock["id"]))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client
        .delete(format!("{base}/api/prendas/{}", stock["garment_id"]))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}
