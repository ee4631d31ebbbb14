//! Enforcement behaviour over real HTTP, with the auth service and the
//! upstream mocked.

use crate::harness::{unused_local_url, TestGateway};
use reqwest::StatusCode;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Fixture {
    auth: MockServer,
    upstream: MockServer,
    gateway: TestGateway,
}

async fn fixture() -> Fixture {
    let auth = MockServer::start().await;
    let upstream = MockServer::start().await;
    let gateway = TestGateway::with_patients_route(&auth.uri(), &upstream.uri())
        .await
        .unwrap();
    Fixture {
        auth,
        upstream,
        gateway,
    }
}

async fn mount_validate(server: &MockServer, response: ResponseTemplate, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/validate"))
        .respond_with(response)
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn mount_upstream(server: &MockServer, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/api/patients"))
        .respond_with(ResponseTemplate::new(200).set_body_string("patients"))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_missing_header_never_reaches_auth_or_upstream() -> Result<(), anyhow::Error> {
    let f = fixture().await;
    mount_validate(&f.auth, ResponseTemplate::new(200), 0).await;
    mount_upstream(&f.upstream, 0).await;

    let response = reqwest::Client::new()
        .get(format!("{}/api/patients", f.gateway.url()))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.headers().get("www-authenticate").unwrap(),
        "Bearer realm=\"api-gateway\""
    );
    assert!(response.bytes().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_non_bearer_header_never_reaches_auth() -> Result<(), anyhow::Error> {
    let f = fixture().await;
    mount_validate(&f.auth, ResponseTemplate::new(200), 0).await;
    mount_upstream(&f.upstream, 0).await;

    let response = reqwest::Client::new()
        .get(format!("{}/api/patients", f.gateway.url()))
        .header("authorization", "Basic YWxpY2U6c2VjcmV0")
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn test_validated_request_is_forwarded() -> Result<(), anyhow::Error> {
    let f = fixture().await;
    Mock::given(method("GET"))
        .and(path("/validate"))
        .and(header("authorization", "Bearer good.token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&f.auth)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/patients"))
        .and(header("authorization", "Bearer good.token"))
        .respond_with(ResponseTemplate::new(200).set_body_string("patients"))
        .expect(1)
        .mount(&f.upstream)
        .await;

    let response = reqwest::Client::new()
        .get(format!("{}/api/patients", f.gateway.url()))
        .header("authorization", "Bearer good.token")
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await?, "patients");

    Ok(())
}

#[tokio::test]
async fn test_rejected_token_not_forwarded() -> Result<(), anyhow::Error> {
    let f = fixture().await;
    mount_validate(&f.auth, ResponseTemplate::new(401), 1).await;
    mount_upstream(&f.upstream, 0).await;

    let response = reqwest::Client::new()
        .get(format!("{}/api/patients", f.gateway.url()))
        .header("authorization", "Bearer bad.token")
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.bytes().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_auth_server_error_fails_closed() -> Result<(), anyhow::Error> {
    let f = fixture().await;
    mount_validate(&f.auth, ResponseTemplate::new(500), 1).await;
    mount_upstream(&f.upstream, 0).await;

    let response = reqwest::Client::new()
        .get(format!("{}/api/patients", f.gateway.url()))
        .header("authorization", "Bearer some.token")
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn test_auth_timeout_fails_closed() -> Result<(), anyhow::Error> {
    let f = fixture().await;
    // Gateway timeout is 500ms
    mount_validate(
        &f.auth,
        ResponseTemplate::new(200).set_delay(Duration::from_secs(2)),
        1,
    )
    .await;
    mount_upstream(&f.upstream, 0).await;

    let response = reqwest::Client::new()
        .get(format!("{}/api/patients", f.gateway.url()))
        .header("authorization", "Bearer slow.token")
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn test_auth_unreachable_fails_closed() -> Result<(), anyhow::Error> {
    let upstream = MockServer::start().await;
    mount_upstream(&upstream, 0).await;
    let gateway = TestGateway::with_patients_route(&unused_local_url(), &upstream.uri()).await?;

    let response = reqwest::Client::new()
        .get(format!("{}/api/patients", gateway.url()))
        .header("authorization", "Bearer some.token")
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn test_gateway_own_endpoints_need_no_token() -> Result<(), anyhow::Error> {
    let f = fixture().await;
    mount_validate(&f.auth, ResponseTemplate::new(401), 0).await;
    let client = reqwest::Client::new();

    let health = client
        .get(format!("{}/health", f.gateway.url()))
        .send()
        .await?;
    assert_eq!(health.status(), StatusCode::OK);
    assert_eq!(health.text().await?, "OK");

    let metrics = client
        .get(format!("{}/metrics", f.gateway.url()))
        .send()
        .await?;
    assert_eq!(metrics.status(), StatusCode::OK);

    Ok(())
}
