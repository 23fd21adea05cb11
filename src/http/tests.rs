//! Tests for the HTTP client module

use super::*;
use crate::error::Error;
use crate::types::Method;
use std::time::Duration;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client() -> HttpClient {
    HttpClient::with_config(HttpClientConfig::builder().no_rate_limit().build()).unwrap()
}

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(15));
    assert!(config.rate_limit.is_none());
    assert!(config.user_agent.starts_with("snapshot-pager/"));
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .timeout(Duration::from_secs(60))
        .rate_limit(RateLimiterConfig::new(5, 2))
        .header("Referer", "https://quote.example.com/")
        .user_agent("test-agent/1.0")
        .build();

    assert_eq!(config.timeout, Duration::from_secs(60));
    assert_eq!(config.rate_limit, Some(RateLimiterConfig::new(5, 2)));
    assert_eq!(
        config.default_headers.get("Referer"),
        Some(&"https://quote.example.com/".to_string())
    );
    assert_eq!(config.user_agent, "test-agent/1.0");
}

#[test]
fn test_request_config_builder() {
    let config = RequestConfig::new()
        .param("pn", "1")
        .param("pz", "100")
        .header("X-Request-Id", "abc123")
        .timeout(Duration::from_secs(10));

    assert_eq!(
        config.params,
        vec![
            ("pn".to_string(), "1".to_string()),
            ("pz".to_string(), "100".to_string())
        ]
    );
    assert_eq!(
        config.headers.get("X-Request-Id"),
        Some(&"abc123".to_string())
    );
    assert_eq!(config.timeout, Some(Duration::from_secs(10)));
}

#[test]
fn test_rate_limiter_wired_from_config() {
    let client = HttpClient::with_config(
        HttpClientConfig::builder()
            .rate_limit(RateLimiterConfig::default())
            .build(),
    )
    .unwrap();
    assert!(client.has_rate_limiter());
}

#[tokio::test]
async fn test_post_form_encodes_params() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/qt/clist/get"))
        .and(body_string_contains("pn=3"))
        .and(body_string_contains("fs=m%3A0+t%3A6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = RequestConfig::new().param("pn", "3").param("fs", "m:0 t:6");
    let url = format!("{}/api/qt/clist/get", mock_server.uri());
    let body: serde_json::Value = client()
        .request_json(Method::POST, &url, config)
        .await
        .unwrap();

    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn test_get_uses_query_string() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/search"))
        .and(query_param("q", "test"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("found"))
        .mount(&mock_server)
        .await;

    let config = RequestConfig::new().param("q", "test").param("page", "2");
    let url = format!("{}/api/search", mock_server.uri());
    let text = client()
        .request_text(Method::GET, &url, config)
        .await
        .unwrap();

    assert_eq!(text, "found");
}

#[tokio::test]
async fn test_default_headers_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header("Referer", "https://quote.example.com/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let client = HttpClient::with_config(
        HttpClientConfig::builder()
            .no_rate_limit()
            .header("Referer", "https://quote.example.com/")
            .build(),
    )
    .unwrap();

    let response = client
        .get(&mock_server.uri(), RequestConfig::new())
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_status_error_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("busy"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = client()
        .post_form(&mock_server.uri(), RequestConfig::new())
        .await
        .unwrap_err();

    match err {
        Error::HttpStatus { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "busy");
        }
        other => panic!("Expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn test_rate_limited_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
        .mount(&mock_server)
        .await;

    let err = client()
        .post_form(&mock_server.uri(), RequestConfig::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::RateLimited {
            retry_after_seconds: 7
        }
    ));
}

#[tokio::test]
async fn test_timeout_is_classified() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&mock_server)
        .await;

    let config = RequestConfig::new().timeout(Duration::from_millis(100));
    let err = client()
        .post_form(&mock_server.uri(), config)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Timeout { timeout_ms: 100 }));
    assert!(err.is_network());
}
