//! Integration tests for the catalog (brands, sizes, colors, garments).
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p ropero-api)
//!
//! Run with: cargo test -p ropero-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use ropero_integration_tests::{
    base_url, client, create_stock_fixture, post_json, register_and_login, unique_name,
};

#[tokio::test]
#[ignore = "Requires a running API server and database"]
async fn test_brand_crud_roundtrip() {
    let client = client();
    let base = base_url();
    let (token, _) = register_and_login(&client, true).await;

    let name = unique_name("brand");
    let brand = post_json(
        &client,
        &token,
        &format!("{base}/api/marcas"),
        &json!({ "name": name }),
    )
    .await;
    assert_eq!(brand["name"], name);
    assert_eq!(brand["active"], true);

    // Partial update: only the active flag changes
    let resp = client
        .put(format!("{base}/api/marcas/{}", brand["id"]))
        .bearer_auth(&token)
        .json(&json!({ "active": false }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["name"], name);
    assert_eq!(updated["active"], false);

    let resp = client
        .delete(format!("{base}/api/marcas/{}", brand["id"]))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client
        .get(format!("{base}/api/marcas/{}", brand["id"]))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires a running API server and database"]
async fn test_duplicate_brand_name_rejected() {
    let client = client();
    let base = base_url();
    let (token, _) = register_and_login(&client, true).await;

    let name = unique_name("brand");
    post_json(
        &client,
        &token,
        &format!("{base}/api/marcas"),
        &json!({ "name": name }),
    )
    .await;

    let resp = client
        .post(format!("{base}/api/marcas"))
        .bearer_auth(&token)
        .json(&json!({ "name": name }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires a running API server and database"]
async fn test_catalog_writes_require_admin() {
    let client = client();
    let base = base_url();

    // No token at all
    let resp = client
        .post(format!("{base}/api/marcas"))
        .json(&json!({ "name": unique_name("brand") }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Regular (non-admin) token
    let (token, _) = register_and_login(&client, false).await;
    let resp = client
        .post(format!("{base}/api/marcas"))
        .bearer_auth(&token)
        .json(&json!({ "name": unique_name("brand") }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // Reads stay open
    let resp = client.get(format!("{base}/api/marcas")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires a running API server and database"]
async fn test_brand_delete_blocked_by_garments() {
    let client = client();
    let base = base_url();
    let (token, _) = register_and_login(&client, true).await;

    let brand = post_json(
        &client,
        &token,
        &format!("{base}/api/marcas"),
        &json!({ "name": unique_name("brand") }),
    )
    .await;

    post_json(
        &client,
        &token,
        &format!("{base}/api/prendas"),
        &json!({
            "name": unique_name("garment"),
            "brand_id": brand["id"],
            "price": "100",
        }),
    )
    .await;

    let resp = client
        .delete(format!("{base}/api/marcas/{}", brand["id"]))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Brand is still there
    let resp = client
        .get(format!("{base}/api/marcas/{}", brand["id"]))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires a running API server and database"]
async fn test_garment_requires_existing_brand() {
    let client = client();
    let base = base_url();
    let (token, _) = register_and_login(&client, true).await;

    let resp = client
        .post(format!("{base}/api/prendas"))
        .bearer_auth(&token)
        .json(&json!({
            "name": unique_name("garment"),
            "brand_id": 999_999_999,
            "price": "10",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires a running API server and database"]
async fn test_garment_listing_includes_brand_name() {
    let client = client();
    let base = base_url();
    let (token, _) = register_and_login(&client, true).await;

    let stock = create_stock_fixture(&client, &token, "49.99", 1).await;

    let resp = client
        .get(format!("{base}/api/prendas/{}", stock["garment_id"]))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let garment: Value = resp.json().await.unwrap();
    assert!(garment["brand_name"].is_string());
    assert_eq!(garment["price"], "49.99");
}
