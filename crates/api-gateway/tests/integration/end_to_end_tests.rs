//! Full flow: real auth service, real gateway, mocked upstream.

use crate::harness::TestGateway;
use auth_test_utils::{test_identity, TestAuthServer};
use reqwest::StatusCode;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_login_validate_and_forward() -> Result<(), anyhow::Error> {
    let auth = TestAuthServer::spawn(vec![test_identity("a@b.com", "correct", "USER")]).await?;
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_string("patients"))
        .expect(1)
        .mount(&upstream)
        .await;

    let gateway = TestGateway::with_patients_route(&auth.url(), &upstream.uri()).await?;
    let client = reqwest::Client::new();

    // Login through the gateway's public route
    let response = client
        .post(format!("{}/auth/login", gateway.url()))
        .json(&json!({"email": "a@b.com", "password": "correct"}))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await?;
    let token = body["token"]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("missing token"))?
        .to_string();

    // Validate directly against the auth service
    let response = client
        .get(format!("{}/validate", auth.url()))
        .header("authorization", format!("Bearer {}", token))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    // Forwarded through the gateway
    let response = client
        .get(format!("{}/api/patients", gateway.url()))
        .header("authorization", format!("Bearer {}", token))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await?, "patients");

    // Altered token is refused by both
    let mut altered = token.clone();
    let last = altered.pop().ok_or_else(|| anyhow::anyhow!("empty token"))?;
    altered.push(if last == 'A' { 'E' } else { 'A' });

    let response = client
        .get(format!("{}/validate", auth.url()))
        .header("authorization", format!("Bearer {}", altered))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = client
        .get(format!("{}/api/patients", gateway.url()))
        .header("authorization", format!("Bearer {}", altered))
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn test_failed_login_through_gateway() -> Result<(), anyhow::Error> {
    let auth = TestAuthServer::spawn(vec![test_identity("a@b.com", "correct", "USER")]).await?;
    let upstream = MockServer::start().await;
    let gateway = TestGateway::with_patients_route(&auth.url(), &upstream.uri()).await?;

    let response = reqwest::Client::new()
        .post(format!("{}/auth/login", gateway.url()))
        .json(&json!({"email": "a@b.com", "password": "wrong"}))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.bytes().await?.is_empty());

    Ok(())
}
