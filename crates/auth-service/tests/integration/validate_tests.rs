//! Integration tests for `GET /validate`.

use auth_test_utils::{test_identity, test_signing_key, TestAuthServer};
use auth_service::crypto::{TokenCodec, TOKEN_TTL_SECONDS};
use chrono::{Duration, Utc};
use reqwest::StatusCode;

async fn validate(server: &TestAuthServer, authorization: Option<&str>) -> reqwest::Response {
    let mut request = reqwest::Client::new().get(format!("{}/validate", server.url()));
    if let Some(value) = authorization {
        request = request.header("authorization", value);
    }
    request.send().await.expect("validate request should complete")
}

#[tokio::test]
async fn test_issued_token_validates() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(vec![test_identity("a@b.com", "correct", "USER")]).await?;
    let token = server.login("a@b.com", "correct").await?;

    let response = validate(&server, Some(&format!("Bearer {}", token))).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.bytes().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_altered_token_is_rejected() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(vec![test_identity("a@b.com", "correct", "USER")]).await?;
    let mut token = server.login("a@b.com", "correct").await?;

    let last = token.pop().ok_or_else(|| anyhow::anyhow!("empty token"))?;
    token.push(if last == 'A' { 'E' } else { 'A' });

    let response = validate(&server, Some(&format!("Bearer {}", token))).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.bytes().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_expired_token_is_rejected() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(vec![]).await?;
    let issued = Utc::now() - Duration::seconds(TOKEN_TTL_SECONDS + 60);
    let token = server.codec().encode("a@b.com", "USER", issued)?;

    let response = validate(&server, Some(&format!("Bearer {}", token))).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn test_token_from_other_key_is_rejected() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(vec![]).await?;
    let token = TokenCodec::new(&test_signing_key(42)).encode("a@b.com", "USER", Utc::now())?;

    let response = validate(&server, Some(&format!("Bearer {}", token))).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn test_malformed_headers_are_rejected() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(vec![]).await?;
    let token = server.codec().encode("a@b.com", "USER", Utc::now())?;

    let cases = [
        None,
        Some("".to_string()),
        Some(format!("Basic {}", token)),
        Some(format!("bearer {}", token)),
        Some("Bearer ".to_string()),
        Some(token.clone()),
    ];

    for case in cases {
        let response = validate(&server, case.as_deref()).await;
        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "header {:?} should be rejected",
            case
        );
        assert!(response.bytes().await?.is_empty());
    }

    Ok(())
}
