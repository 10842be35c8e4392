//! Integration tests for accounts and authentication.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The API server running (cargo run -p ropero-api)
//!
//! Run with: cargo test -p ropero-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use ropero_integration_tests::{base_url, client, login, register, register_and_login, unique_email};

#[tokio::test]
#[ignore = "Requires a running API server and database"]
async fn test_register_login_logout_flow() {
    let client = client();
    let base = base_url();

    let email = unique_email("flow");
    let user = register(&client, &email, "integration-test-pw", false).await;
    assert_eq!(user["email"], email);
    assert_eq!(user["is_authenticated"], false);
    assert!(user.get("password").is_none());
    assert!(user.get("password_hash").is_none());

    let (token, logged_in) = login(&client, &email, "integration-test-pw").await;
    assert_eq!(logged_in["is_authenticated"], true);

    let user_id = logged_in["id"].as_i64().unwrap();
    let resp = client
        .post(format!("{base}/api/users/logout/{user_id}"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    // Flag flipped back
    let resp = client
        .get(format!("{base}/api/users/{user_id}"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Value = resp.json().await.unwrap();
    assert_eq!(fetched["is_authenticated"], false);
}

#[tokio::test]
#[ignore = "Requires a running API server and database"]
async fn test_duplicate_email_rejected_with_400() {
    let client = client();
    let base = base_url();

    let email = unique_email("dup");
    register(&client, &email, "integration-test-pw", false).await;

    let resp = client
        .post(format!("{base}/api/users"))
        .json(&json!({
            "name": "Other",
            "email": email,
            "password": "another-password",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires a running API server and database"]
async fn test_wrong_password_rejected_with_401() {
    let client = client();
    let base = base_url();

    let email = unique_email("wrongpw");
    register(&client, &email, "integration-test-pw", false).await;

    let resp = client
        .post(format!("{base}/api/users/login"))
        .json(&json!({ "email": email, "password": "not-the-password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Unknown email behaves the same
    let resp = client
        .post(format!("{base}/api/users/login"))
        .json(&json!({ "email": unique_email("ghost"), "password": "whatever-pw" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires a running API server and database"]
async fn test_invalid_email_and_short_password_rejected() {
    let client = client();
    let base = base_url();

    let resp = client
        .post(format!("{base}/api/users"))
        .json(&json!({
            "name": "Bad Email",
            "email": "not an email",
            "password": "integration-test-pw",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = client
        .post(format!("{base}/api/users"))
        .json(&json!({
            "name": "Short Password",
            "email": unique_email("shortpw"),
            "password": "short",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = client
        .post(format!("{base}/api/users"))
        .json(&json!({
            "name": "",
            "email": unique_email("noname"),
            "password": "integration-test-pw",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires a running API server and database"]
async fn test_validate_token() {
    let client = client();
    let base = base_url();

    let (token, user) = register_and_login(&client, false).await;

    let resp = client
        .post(format!("{base}/api/users/validate-token"))
        .json(&json!({ "token": token }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["valid"], true);
    assert_eq!(body["user_id"], user["id"]);

    let resp = client
        .post(format!("{base}/api/users/validate-token"))
        .json(&json!({ "token": "not.a.token" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires a running API server and database"]
async fn test_user_listing_is_admin_only() {
    let client = client();
    let base = base_url();

    let (token, _) = register_and_login(&client, false).await;
    let resp = client
        .get(format!("{base}/api/users"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let (admin_token, _) = register_and_login(&client, true).await;
    let resp = client
        .get(format!("{base}/api/users"))
        .bearer_auth(&admin_token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires a running API server and database"]
async fn test_users_cannot_touch_other_accounts() {
    let client = client();
    let base = base_url();

    let (_, target) = register_and_login(&client, false).await;
    let (token, _) = register_and_login(&client, false).await;
    let target_id = target["id"].as_i64().unwrap();

    let resp = client
        .get(format!("{base}/api/users/{target_id}"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = client
        .put(format!("{base}/api/users/{target_id}"))
        .bearer_auth(&token)
        .json(&json!({ "name": "Hijacked" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = client
        .delete(format!("{base}/api/users/{target_id}"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
#[ignore = "Requires a running API server and database"]
async fn test_delete_user_blocked_while_cart_exists() {
    let client = client();
    let base = base_url();

    let (token, user) = register_and_login(&client, false).await;
    let user_id = user["id"].as_i64().unwrap();

    // Creating the cart blocks account deletion
    let cart = ropero_integration_tests::get_cart(&client, &token, user_id).await;

    let resp = client
        .delete(format!("{base}/api/users/{user_id}"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Delete the cart first, then the account goes through
    let resp = client
        .delete(format!("{base}/api/carritos/{}", cart["id"]))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = client
        .delete(format!("{base}/api/users/{user_id}"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}
