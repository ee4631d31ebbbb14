//! Routing and forwarding over real HTTP.

use crate::harness::{unused_local_url, TestGateway};
use reqwest::StatusCode;
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn allow_all(auth: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/validate"))
        .respond_with(ResponseTemplate::new(200))
        .mount(auth)
        .await;
}

#[tokio::test]
async fn test_public_auth_route_strips_prefix_and_skips_validation() -> Result<(), anyhow::Error> {
    let auth = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/validate"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&auth)
        .await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_string(r#"{"email":"a@b.com","password":"correct"}"#))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"token":"t"}"#))
        .expect(1)
        .mount(&auth)
        .await;

    let gateway = TestGateway::with_patients_route(&auth.uri(), &unused_local_url()).await?;

    let response = reqwest::Client::new()
        .post(format!("{}/auth/login", gateway.url()))
        .header("content-type", "application/json")
        .body(r#"{"email":"a@b.com","password":"correct"}"#)
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await?, r#"{"token":"t"}"#);

    Ok(())
}

#[tokio::test]
async fn test_forward_preserves_method_path_query_and_body() -> Result<(), anyhow::Error> {
    let auth = MockServer::start().await;
    allow_all(&auth).await;
    let upstream = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/patients/17"))
        .and(query_param("notify", "true"))
        .and(header("x-request-id", "req-1"))
        .and(body_string("{\"name\":\"Ada\"}"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&upstream)
        .await;

    let gateway = TestGateway::with_patients_route(&auth.uri(), &upstream.uri()).await?;

    let response = reqwest::Client::new()
        .put(format!("{}/api/patients/17?notify=true", gateway.url()))
        .header("authorization", "Bearer t")
        .header("x-request-id", "req-1")
        .body("{\"name\":\"Ada\"}")
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    Ok(())
}

#[tokio::test]
async fn test_unknown_route_is_not_found() -> Result<(), anyhow::Error> {
    let auth = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/validate"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&auth)
        .await;

    let gateway = TestGateway::with_patients_route(&auth.uri(), &unused_local_url()).await?;

    let response = reqwest::Client::new()
        .get(format!("{}/api/billing", gateway.url()))
        .header("authorization", "Bearer t")
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_upstream_down_is_bad_gateway() -> Result<(), anyhow::Error> {
    let auth = MockServer::start().await;
    allow_all(&auth).await;

    let gateway = TestGateway::with_patients_route(&auth.uri(), &unused_local_url()).await?;

    let response = reqwest::Client::new()
        .get(format!("{}/api/patients", gateway.url()))
        .header("authorization", "Bearer t")
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["error"]["code"], "UPSTREAM_UNAVAILABLE");

    Ok(())
}
