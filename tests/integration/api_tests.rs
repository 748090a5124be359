//! API integration tests for the query pipeline.
//!
//! Tests verify:
//! - Successful queries return the status with `online: true`
//! - Validation errors are cumulative, ordered and pretty-printed
//! - Query failures return the `online: false` envelope
//! - Root redirect, health check and unknown routes

use std::time::Duration;

use http::StatusCode;
use serde_json::json;

use game_query_api::{create_router, QueryRequest, RouterConfig};

use super::test_utils::{get, minecraft_status, MockQuerier};

fn router_with(querier: &MockQuerier) -> axum::Router {
    create_router(querier.clone(), RouterConfig::default().with_tracing(false))
}

// =============================================================================
// Successful Queries
// =============================================================================

#[tokio::test]
async fn test_query_success() {
    let querier = MockQuerier::online(minecraft_status());
    let router = router_with(&querier);

    let response = get(&router, "/minecraft/ip=127.0.0.1&port=25565").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.header("content-type"), Some("application/json"));
    assert!(response.body.contains("\"online\": true"));

    let body = response.json();
    assert_eq!(body["name"], "A Minecraft Server");
    assert_eq!(body["maxplayers"], 20);
    assert_eq!(body["online"], true);

    assert_eq!(
        querier.requests().await,
        vec![QueryRequest {
            game_type: "minecraft".to_string(),
            host: "127.0.0.1".to_string(),
            port: 25565,
        }]
    );
}

#[tokio::test]
async fn test_query_success_is_pretty_printed_in_order() {
    let querier = MockQuerier::online(json!({"name": "srv", "numplayers": 2}));
    let router = router_with(&querier);

    let response = get(&router, "/csgo/ip=127.0.0.1&port=27015").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.body,
        "{\n  \"name\": \"srv\",\n  \"numplayers\": 2,\n  \"online\": true\n}"
    );
}

#[tokio::test]
async fn test_query_with_hostname_and_ipv6() {
    let querier = MockQuerier::online(json!({}));
    let router = router_with(&querier);

    let response = get(&router, "/rust/ip=play.example.org&port=28015").await;
    assert_eq!(response.status, StatusCode::OK);

    let response = get(&router, "/rust/ip=::1&port=28015").await;
    assert_eq!(response.status, StatusCode::OK);

    let hosts: Vec<String> = querier
        .requests()
        .await
        .into_iter()
        .map(|r| r.host)
        .collect();
    assert_eq!(hosts, vec!["play.example.org", "::1"]);
}

#[tokio::test]
async fn test_query_trailing_slash() {
    let querier = MockQuerier::online(json!({}));
    let router = router_with(&querier);

    let response = get(&router, "/minecraft/ip=127.0.0.1&port=25565/").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(querier.requests().await[0].port, 25565);
}

#[tokio::test]
async fn test_repeated_requests_have_same_shape() {
    let querier = MockQuerier::online(minecraft_status());
    let router = router_with(&querier);

    let first = get(&router, "/minecraft/ip=127.0.0.1&port=25565").await;
    let second = get(&router, "/minecraft/ip=127.0.0.1&port=25565").await;

    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(first.body, second.body);
    assert_eq!(querier.call_count(), 2);
}

// =============================================================================
// Validation Errors
// =============================================================================

#[tokio::test]
async fn test_unknown_game() {
    let querier = MockQuerier::online(minecraft_status());
    let router = router_with(&querier);

    let response = get(&router, "/unknowngame/ip=127.0.0.1&port=25565").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.header("content-type"), Some("application/json"));
    assert_eq!(response.json(), json!([{"game": "Game is not supported."}]));
    assert_eq!(
        response.body,
        "[\n  {\n    \"game\": \"Game is not supported.\"\n  }\n]"
    );
    assert_eq!(querier.call_count(), 0);
}

#[tokio::test]
async fn test_invalid_host_and_port() {
    let querier = MockQuerier::online(minecraft_status());
    let router = router_with(&querier);

    let response = get(&router, "/minecraft/ip=not_a_host!!/&port=0").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json(),
        json!([
            {"ip": "Invalid IP address or hostname."},
            {"port": "Invalid port number."}
        ])
    );
    assert_eq!(querier.call_count(), 0);
}

#[tokio::test]
async fn test_all_fields_invalid() {
    let querier = MockQuerier::online(minecraft_status());
    let router = router_with(&querier);

    let response = get(&router, "/Minecraft/ip=localhost&port=70000").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let errors = response.json();
    let errors = errors.as_array().unwrap();
    assert_eq!(errors.len(), 3);
    assert_eq!(errors[0], json!({"game": "Game is not supported."}));
    assert_eq!(errors[1], json!({"ip": "Invalid IP address or hostname."}));
    assert_eq!(errors[2], json!({"port": "Invalid port number."}));
}

#[tokio::test]
async fn test_non_numeric_port() {
    let querier = MockQuerier::online(minecraft_status());
    let router = router_with(&querier);

    let response = get(&router, "/minecraft/ip=127.0.0.1&port=http").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json(), json!([{"port": "Invalid port number."}]));
}

#[tokio::test]
async fn test_percent_encoded_host_is_decoded_before_validation() {
    let querier = MockQuerier::online(json!({}));
    let router = router_with(&querier);

    let response = get(&router, "/minecraft/ip=%3C127.0.0.1%3E&port=25565").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json(),
        json!([{"ip": "Invalid IP address or hostname."}])
    );
}

#[tokio::test]
async fn test_invalid_utf8_host_is_a_field_error() {
    let querier = MockQuerier::online(json!({}));
    let router = router_with(&querier);

    let response = get(&router, "/minecraft/ip=%FF&port=25565").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.header("content-type"), Some("application/json"));
    assert_eq!(
        response.json(),
        json!([{"ip": "Invalid IP address or hostname."}])
    );
    assert_eq!(querier.call_count(), 0);
}

#[tokio::test]
async fn test_invalid_utf8_game_is_a_field_error() {
    let querier = MockQuerier::online(json!({}));
    let router = router_with(&querier);

    let response = get(&router, "/%C3%28/ip=127.0.0.1&port=25565").await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.json(), json!([{"game": "Game is not supported."}]));
}

// =============================================================================
// Query Failures
// =============================================================================

#[tokio::test]
async fn test_query_failure() {
    let querier = MockQuerier::failing("ECONNREFUSED");
    let router = router_with(&querier);

    let response = get(&router, "/minecraft/ip=127.0.0.1&port=25565").await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.header("content-type"), Some("application/json"));
    assert_eq!(
        response.json(),
        json!({"online": false, "error": "Failed to query the server: ECONNREFUSED"})
    );
    assert_eq!(
        response.body,
        "{\n  \"online\": false,\n  \"error\": \"Failed to query the server: ECONNREFUSED\"\n}"
    );
    assert_eq!(querier.call_count(), 1);
}

#[tokio::test]
async fn test_query_timeout() {
    let querier = MockQuerier::stalled(Duration::from_secs(30));
    let router = create_router(
        querier.clone(),
        RouterConfig::default()
            .with_query_timeout(Duration::from_millis(50))
            .with_tracing(false),
    );

    let response = get(&router, "/minecraft/ip=127.0.0.1&port=25565").await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json(),
        json!({"online": false, "error": "Failed to query the server: Query timed out after 50ms"})
    );
    assert_eq!(querier.call_count(), 1);
}

// =============================================================================
// Other Routes
// =============================================================================

#[tokio::test]
async fn test_root_redirects_to_docs() {
    let querier = MockQuerier::online(json!({}));
    let router = create_router(
        querier,
        RouterConfig::default()
            .with_docs_url("https://example.com/docs")
            .with_tracing(false),
    );

    let response = get(&router, "/").await;

    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(response.header("location"), Some("https://example.com/docs"));
}

#[tokio::test]
async fn test_health_check() {
    let router = router_with(&MockQuerier::online(json!({})));

    let response = get(&router, "/health").await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_malformed_target_is_not_found() {
    let querier = MockQuerier::online(json!({}));
    let router = router_with(&querier);

    for uri in [
        "/minecraft/127.0.0.1:25565",
        "/minecraft/ip=127.0.0.1",
        "/minecraft/port=25565&ip=127.0.0.1",
    ] {
        let response = get(&router, uri).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND, "uri {}", uri);
        assert_eq!(response.json()["error"], "not_found");
    }
    assert_eq!(querier.call_count(), 0);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let router = router_with(&MockQuerier::online(json!({})));

    let response = get(&router, "/minecraft").await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json()["error"], "not_found");
}
