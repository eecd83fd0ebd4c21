//! Tests for the HTTP module

use super::*;
use crate::error::Error;
use crate::pagination::{Cursor, PageSource};
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;
use test_case::test_case;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(base_url: &str) -> HttpClient {
    let config = HttpClientConfig::builder().base_url(base_url).build();
    HttpClient::with_config(config).unwrap()
}

// ============================================================================
// Client Tests
// ============================================================================

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert!(config.base_url.is_none());
    assert!(config.rate_limit.is_none());
    assert!(config.user_agent.starts_with("solidafy-pager/"));
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .base_url("https://api.example.com")
        .timeout(Duration::from_secs(60))
        .rate_limit(RateLimiterConfig::per_second(5))
        .header("X-Custom", "value")
        .user_agent("test-agent/1.0")
        .build();

    assert_eq!(config.base_url, Some("https://api.example.com".to_string()));
    assert_eq!(config.timeout, Duration::from_secs(60));
    assert_eq!(config.rate_limit, Some(RateLimiterConfig::per_second(5)));
    assert_eq!(
        config.default_headers.get("X-Custom"),
        Some(&"value".to_string())
    );
    assert_eq!(config.user_agent, "test-agent/1.0");

    let client = HttpClient::with_config(config).unwrap();
    assert!(client.has_rate_limiter());
}

#[test_case("/v1/things", "https://api.example.com/v1/things" ; "leading slash")]
#[test_case("v1/things", "https://api.example.com/v1/things" ; "no leading slash")]
#[test_case("https://other.example.com/x", "https://other.example.com/x" ; "absolute")]
fn test_build_url(input: &str, expected: &str) {
    let client = client_for("https://api.example.com/");
    assert_eq!(client.build_url(input), expected);
}

#[test_case("/v1/things?page=2", "https://api.example.com/v1/things?page=2" ; "path and query")]
#[test_case("/v1/things", "https://api.example.com/v1/things" ; "path only")]
#[test_case("//evil.example/steal?page=2", "https://api.example.com//evil.example/steal?page=2" ; "double slash path")]
fn test_resolve_cursor_uses_origin(cursor: &str, expected: &str) {
    let client = client_for("https://api.example.com/v1?key=base");
    assert_eq!(client.resolve_cursor(cursor).unwrap(), expected);
}

#[test]
fn test_cursor_cannot_leave_the_configured_host() {
    let client = client_for("https://api.example.com");
    let cursor = Cursor::from_more_url("https://api.example.com//evil.example/steal?page=2").unwrap();
    assert_eq!(cursor.as_str(), "//evil.example/steal?page=2");

    let resolved = url::Url::parse(&client.resolve_cursor(cursor.as_str()).unwrap()).unwrap();
    assert_eq!(resolved.host_str(), Some("api.example.com"));
    assert_eq!(resolved.path(), "//evil.example/steal");
    assert_eq!(resolved.query(), Some("page=2"));
}

#[test]
fn test_resolve_cursor_without_base_url() {
    let client = HttpClient::with_config(HttpClientConfig::default()).unwrap();
    assert!(matches!(
        client.resolve_cursor("/x?page=2"),
        Err(Error::Config { .. })
    ));
}

#[test_case("https://cdn.example.com/x?page=2", "https://cdn.example.com/x?page=2" ; "absolute")]
#[test_case("/v2/x?page=2", "https://api.example.com/v2/x?page=2" ; "root relative")]
#[test_case("x?page=2", "https://api.example.com/v1/x?page=2" ; "path relative")]
fn test_absolutize(link: &str, expected: &str) {
    let client = client_for("https://api.example.com/v1");
    assert_eq!(client.absolutize(link).unwrap(), expected);
}

#[tokio::test]
async fn test_get_json_with_query_and_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/projects"))
        .and(query_param("sort", "magic"))
        .and(header("X-Api-Key", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": 42})))
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(mock_server.uri())
        .header("X-Api-Key", "secret")
        .build();
    let client = HttpClient::with_config(config).unwrap();

    let mut query = HashMap::new();
    query.insert("sort".to_string(), "magic".to_string());
    let body = client.get_json("/api/projects", &query).await.unwrap();

    assert_eq!(body["value"], 42);
}

#[tokio::test]
async fn test_get_json_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not found"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server.uri());
    let result = client.get_json("/api/missing", &HashMap::new()).await;

    match result {
        Err(Error::HttpStatus { status, body }) => {
            assert_eq!(status, 404);
            assert_eq!(body, "Not found");
        }
        other => panic!("Expected HttpStatus error, got {other:?}"),
    }
}

// ============================================================================
// HttpSource Tests
// ============================================================================

#[test]
fn test_extract_path() {
    let value = json!({"urls": {"api": {"more": "https://x/y"}}, "data": [1, 2]});

    assert_eq!(
        extract_path(&value, "$.urls.api.more"),
        Some(&json!("https://x/y"))
    );
    assert_eq!(extract_path(&value, "data"), Some(&json!([1, 2])));
    assert_eq!(extract_path(&value, "$"), Some(&value));
    assert_eq!(extract_path(&value, "urls.missing"), None);
    assert_eq!(extract_path(&value, "data.0"), None);
}

#[test_case("$.data[*].id", vec![json!(1), json!(2)] ; "wildcard")]
#[test_case("$.links[0].href", vec![json!("/x?page=2")] ; "index")]
#[test_case("links[0].href", vec![json!("/x?page=2")] ; "index without root")]
#[test_case("$.data", vec![json!([{"id": 1}, {"id": 2}])] ; "dotted")]
#[test_case("$.missing", vec![] ; "missing")]
fn test_select_path(path: &str, expected: Vec<serde_json::Value>) {
    let value = json!({
        "data": [{"id": 1}, {"id": 2}],
        "links": [{"href": "/x?page=2"}]
    });
    assert_eq!(select_path(&value, path).unwrap(), expected);
}

#[test]
fn test_check_path() {
    assert!(check_path("urls.api.more").is_ok());
    assert!(check_path("$.data[*]").is_ok());
    assert!(matches!(check_path("$.data[").unwrap_err(), Error::JsonPath { .. }));
}

#[test]
fn test_http_source_jsonpath_extraction() {
    let source = HttpSource::new(
        client_for("https://api.example.com"),
        "/v1/projects",
        "$.result[*]",
        "$.links[0].href",
    );
    let envelope = json!({
        "result": [{"id": 7}],
        "links": [{"href": "/v1/projects?page=2"}]
    });

    assert_eq!(source.items(&envelope), vec![json!({"id": 7})]);
    assert_eq!(
        source.more_url(&envelope),
        Some("https://api.example.com/v1/projects?page=2".to_string())
    );
}

#[test]
fn test_http_source_extraction() {
    let source = HttpSource::new(
        client_for("https://api.example.com"),
        "/v1/projects",
        "projects",
        "urls.api.more_projects",
    );
    let envelope = json!({
        "projects": [{"id": 1}, {"id": 2}],
        "urls": {"api": {"more_projects": "https://api.example.com/v1/projects?cursor=abc"}}
    });

    assert_eq!(source.items(&envelope), vec![json!({"id": 1}), json!({"id": 2})]);
    let more = source.more_url(&envelope).unwrap();
    assert_eq!(
        Cursor::from_more_url(&more),
        Some(Cursor::new("/v1/projects?cursor=abc"))
    );
}

#[test]
fn test_http_source_extraction_edge_cases() {
    let source = HttpSource::new(client_for("https://api.example.com"), "/", "data", "next");

    assert!(source.items(&json!({"data": {"not": "an array"}})).is_empty());
    assert!(source.items(&json!({})).is_empty());
    assert_eq!(source.more_url(&json!({"next": null})), None);
    assert_eq!(source.more_url(&json!({"next": ""})), None);
    assert_eq!(
        source.more_url(&json!({"next": "/items?page=2"})),
        Some("https://api.example.com/items?page=2".to_string())
    );
}

#[tokio::test]
async fn test_http_source_fetches() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/items"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [3]})))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/items"))
        .and(query_param("per_page", "2"))
        .and(query_param("category", "games"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [1, 2]})))
        .mount(&mock_server)
        .await;

    let source = HttpSource::new(client_for(&mock_server.uri()), "/api/items", "data", "next")
        .with_query("per_page", "2");

    let mut params = HashMap::new();
    params.insert("category".to_string(), "games".to_string());
    let first = source.fetch_first(params).await.unwrap();
    assert_eq!(first["data"], json!([1, 2]));

    let next = source.fetch_next("/api/items?page=2").await.unwrap();
    assert_eq!(next["data"], json!([3]));
}
