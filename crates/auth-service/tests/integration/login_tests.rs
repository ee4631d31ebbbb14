//! Integration tests for `POST /login`.

use auth_service::repositories::InMemoryIdentityStore;
use auth_test_utils::{test_identity, TestAuthServer};
use chrono::Utc;
use reqwest::StatusCode;
use serde_json::json;

async fn spawn_server() -> Result<TestAuthServer, anyhow::Error> {
    TestAuthServer::spawn(vec![
        test_identity("a@b.com", "correct", "USER"),
        test_identity("admin@b.com", "s3cret", "ADMIN"),
    ])
    .await
}

#[tokio::test]
async fn test_login_success_returns_decodable_token() -> Result<(), anyhow::Error> {
    let server = spawn_server().await?;

    let response = reqwest::Client::new()
        .post(format!("{}/login", server.url()))
        .json(&json!({"identifier": "admin@b.com", "secret": "s3cret"}))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await?;
    let token = body["token"]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("missing token"))?;

    let claims = server
        .codec()
        .decode(token, Utc::now())
        .map_err(|e| anyhow::anyhow!("token should decode: {}", e))?;
    assert_eq!(claims.sub, "admin@b.com");
    assert_eq!(claims.role, "ADMIN");

    Ok(())
}

#[tokio::test]
async fn test_login_accepts_email_password_field_names() -> Result<(), anyhow::Error> {
    let server = spawn_server().await?;

    let response = reqwest::Client::new()
        .post(format!("{}/login", server.url()))
        .json(&json!({"email": "a@b.com", "password": "correct"}))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn test_unknown_identifier_and_wrong_secret_look_the_same() -> Result<(), anyhow::Error> {
    let server = spawn_server().await?;
    let client = reqwest::Client::new();

    let unknown = client
        .post(format!("{}/login", server.url()))
        .json(&json!({"identifier": "nobody@b.com", "secret": "correct"}))
        .send()
        .await?;
    let unknown_status = unknown.status();
    let unknown_body = unknown.bytes().await?;

    let wrong = client
        .post(format!("{}/login", server.url()))
        .json(&json!({"identifier": "a@b.com", "secret": "incorrect"}))
        .send()
        .await?;
    let wrong_status = wrong.status();
    let wrong_body = wrong.bytes().await?;

    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert!(unknown_body.is_empty());
    assert_eq!(unknown_body, wrong_body);

    Ok(())
}

#[tokio::test]
async fn test_login_with_unreadable_body_is_unauthorized() -> Result<(), anyhow::Error> {
    let server = spawn_server().await?;

    let response = reqwest::Client::new()
        .post(format!("{}/login", server.url()))
        .header("content-type", "application/json")
        .body("{\"identifier\": ")
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.bytes().await?.is_empty());
    assert_eq!(server.lookup_count(), 0, "no lookup for an unreadable body");

    Ok(())
}

#[tokio::test]
async fn test_login_store_failure_is_server_error() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn_with_store(InMemoryIdentityStore::failing()).await?;

    let response = reqwest::Client::new()
        .post(format!("{}/login", server.url()))
        .json(&json!({"identifier": "a@b.com", "secret": "correct"}))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["error"]["code"], "DATABASE_ERROR");

    Ok(())
}
