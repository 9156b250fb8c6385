//! API tests against a running server
//!
//! Start the server, then run with: cargo test -- --ignored

use chrono::Utc;
use reqwest::{multipart, Client};
use serde_json::Value;

use equipment_registry::models::UserClaims;

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Token signed with the server's JWT secret
fn auth_token() -> String {
    let secret = std::env::var("JWT_SECRET")
        .unwrap_or_else(|_| "change-this-secret-in-production".to_string());
    let now = Utc::now().timestamp();
    UserClaims {
        sub: "tester@example.com".to_string(),
        email: "tester@example.com".to_string(),
        name: Some("Tester".to_string()),
        exp: now + 3600,
        iat: now,
    }
    .create_token(&secret)
    .expect("Failed to sign token")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_register_without_token() {
    let client = Client::new();

    let form = multipart::Form::new()
        .text("name", "Drill")
        .text("details", "18V cordless");

    let response = client
        .post(format!("{}/equipment", BASE_URL))
        .multipart(form)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_register_and_fetch() {
    let client = Client::new();
    let token = auth_token();

    let form = multipart::Form::new()
        .text("name", "Drill")
        .text("details", "18V cordless");

    let response = client
        .post(format!("{}/equipment", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .multipart(form)
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    let id = body["record"]["id"].as_i64().expect("No id in response");
    assert_eq!(body["key"], format!("equipmentRegistry/{}", id));

    let response = client
        .get(format!("{}/equipment/{}", BASE_URL, id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let record: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(record["name"], "Drill");
    assert_eq!(record["submitterEmail"], "tester@example.com");
}
