//! Integration tests for the Ropero store API.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations
//! cargo run -p ropero-cli -- migrate
//!
//! # Start the API server
//! cargo run -p ropero-api
//!
//! # Run the ignored integration tests
//! cargo test -p ropero-integration-tests -- --ignored
//! ```
//!
//! The tests register throwaway accounts with unique emails, so they can run
//! repeatedly against the same database.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::missing_panics_doc)]

use reqwest::Client;
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("ROPERO_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Build an HTTP client.
#[must_use]
pub fn client() -> Client {
    Client::new()
}

/// A unique throwaway email address.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@example.com", Uuid::new_v4())
}

/// A unique throwaway name (for brands, sizes, colors, garments).
#[must_use]
pub fn unique_name(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4())
}

/// Register an account and return the created user.
pub async fn register(client: &Client, email: &str, password: &str, is_admin: bool) -> Value {
    let resp = client
        .post(format!("{}/api/users", base_url()))
        .json(&json!({
            "name": "Test User",
            "email": email,
            "password": password,
            "is_admin": is_admin,
        }))
        .send()
        .await
        .expect("Failed to register user");

    assert_eq!(resp.status(), 201, "registration should succeed");
    resp.json().await.expect("Failed to parse user")
}

/// Login and return the bearer token and the user.
pub async fn login(client: &Client, email: &str, password: &str) -> (String, Value) {
    let resp = client
        .post(format!("{}/api/users/login", base_url()))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to login");

    assert_eq!(resp.status(), 200, "login should succeed");
    let body: Value = resp.json().await.expect("Failed to parse login response");
    let token = body["token"].as_str().expect("missing token").to_owned();
    (token, body["user"].clone())
}

/// Register a fresh account and login, returning the token and user.
pub async fn register_and_login(client: &Client, is_admin: bool) -> (String, Value) {
    let email = unique_email(if is_admin { "admin" } else { "user" });
    let password = "integration-test-pw";
    register(client, &email, password, is_admin).await;
    login(client, &email, password).await
}

/// Create a full (brand, garment, size, color, stock entry) fixture with the
/// given price and quantity. Returns the stock entry as JSON.
pub async fn create_stock_fixture(
    client: &Client,
    admin_token: &str,
    price: &str,
    quantity: i64,
) -> Value {
    let base = base_url();

    let brand: Value = post_json(
        client,
        admin_token,
        &format!("{base}/api/marcas"),
        &json!({ "name": unique_name("brand") }),
    )
    .await;

    let size: Value = post_json(
        client,
        admin_token,
        &format!("{base}/api/talles"),
        &json!({ "name": unique_name("size") }),
    )
    .await;

    let color: Value = post_json(
        client,
        admin_token,
        &format!("{base}/api/colores"),
        &json!({ "name": unique_name("color"), "hex_code": "#000000" }),
    )
    .await;

    let garment: Value = post_json(
        client,
        admin_token,
        &format!("{base}/api/prendas"),
        &json!({
            "name": unique_name("garment"),
            "brand_id": brand["id"],
            "price": price,
        }),
    )
    .await;

    post_json(
        client,
        admin_token,
        &format!("{base}/api/stocks"),
        &json!({
            "garment_id": garment["id"],
            "size_id": size["id"],
            "color_id": color["id"],
            "quantity": quantity,
        }),
    )
    .await
}

/// POST a JSON body with a bearer token, asserting a 2xx response.
pub async fn post_json(client: &Client, token: &str, url: &str, body: &Value) -> Value {
    let resp = client
        .post(url)
        .bearer_auth(token)
        .json(body)
        .send()
        .await
        .expect("Failed to POST");

    let status = resp.status();
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert!(status.is_success(), "POST {url} failed: {status} {body}");
    body
}

/// Get-or-create the user's cart and return it.
pub async fn get_cart(client: &Client, token: &str, user_id: i64) -> Value {
    let resp = client
        .get(format!("{}/api/carritos/user/{user_id}", base_url()))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to get cart");

    assert_eq!(resp.status(), 200, "cart fetch should succeed");
    resp.json().await.expect("Failed to parse cart")
}
