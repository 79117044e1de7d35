//! Tests for the HTTP client module

use super::*;
use crate::auth::Credential;
use crate::error::Error;
use std::time::Duration;
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn client_for(server: &MockServer, credential: Credential) -> HttpClient {
    let config = HttpClientConfig::builder().base_url(server.uri()).build();
    HttpClient::with_config(config, credential).unwrap()
}

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.base_url.as_deref(), Some(DEFAULT_API_URL));
    assert_eq!(config.accept, DEFAULT_ACCEPT);
    assert!(config.timeout.is_none());
    assert!(config.user_agent.starts_with("gh-tally/"));
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .base_url("https://ghe.example.com/api/v3")
        .accept("application/vnd.github+json")
        .timeout(Duration::from_secs(10))
        .header("X-GitHub-Api-Version", "2022-11-28")
        .user_agent("test-agent/1.0")
        .build();

    assert_eq!(
        config.base_url,
        Some("https://ghe.example.com/api/v3".to_string())
    );
    assert_eq!(config.accept, "application/vnd.github+json");
    assert_eq!(config.timeout, Some(Duration::from_secs(10)));
    assert_eq!(
        config.default_headers.get("X-GitHub-Api-Version"),
        Some(&"2022-11-28".to_string())
    );
    assert_eq!(config.user_agent, "test-agent/1.0");

    let config = HttpClientConfig::builder().no_base_url().build();
    assert!(config.base_url.is_none());
}

#[test]
fn test_response_headers_case_insensitive() {
    let headers: ResponseHeaders = [("link", "<a>; rel=\"last\""), ("X-Total", "3")]
        .into_iter()
        .collect();

    assert_eq!(headers.get("Link"), Some("<a>; rel=\"last\""));
    assert_eq!(headers.link(), Some("<a>; rel=\"last\""));
    assert_eq!(headers.get("x-total"), Some("3"));
    assert!(headers.contains("LINK"));
    assert!(!headers.contains("etag"));
    assert_eq!(headers.len(), 2);
}

#[test]
fn test_response_headers_join_repeated_fields() {
    let mut map = reqwest::header::HeaderMap::new();
    map.append("link", "<https://x/?page=2>; rel=\"next\"".parse().unwrap());
    map.append("link", "<https://x/?page=9>; rel=\"last\"".parse().unwrap());

    let headers = ResponseHeaders::from_header_map(&map);
    assert_eq!(
        headers.link(),
        Some("<https://x/?page=2>; rel=\"next\", <https://x/?page=9>; rel=\"last\"")
    );
}

#[test]
fn test_fetch_result_items() {
    let result = FetchResult::new(ResponseHeaders::new(), serde_json::json!([1, 2, 3]));
    assert_eq!(result.item_count(), Some(3));

    let result = FetchResult::new(ResponseHeaders::new(), serde_json::json!({"a": 1}));
    assert!(result.items().is_none());
}

#[tokio::test]
async fn test_fetch_returns_headers_and_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/octo/hello/commits"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Link", "<https://x/?page=2>; rel=\"last\"")
                .insert_header("X-RateLimit-Remaining", "4999")
                .set_body_json(serde_json::json!([{"sha": "a"}, {"sha": "b"}])),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Credential::Anonymous);
    let result = client.fetch("/repos/octo/hello/commits").await.unwrap();

    assert_eq!(result.item_count(), Some(2));
    assert_eq!(result.body[1]["sha"], "b");
    assert_eq!(result.headers.link(), Some("<https://x/?page=2>; rel=\"last\""));
    assert_eq!(result.headers.get("X-RateLimit-Remaining"), Some("4999"));
}

#[tokio::test]
async fn test_fetch_sends_accept_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/octo/repos"))
        .and(header("Accept", DEFAULT_ACCEPT))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Credential::Anonymous);
    client.fetch("/users/octo/repos").await.unwrap();
}

#[tokio::test]
async fn test_fetch_sends_token_when_configured() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/secure"))
        .and(header("Authorization", "token ghp_abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([1])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Credential::token("ghp_abc"));
    let result = client.fetch("/secure").await.unwrap();
    assert_eq!(result.item_count(), Some(1));
}

#[tokio::test]
async fn test_fetch_anonymous_omits_authorization() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(header_exists("Authorization"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/public"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Credential::Anonymous);
    let result = client.fetch("/public").await.unwrap();
    assert_eq!(result.item_count(), Some(0));

    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests
        .iter()
        .all(|r: &Request| !r.headers.contains_key("authorization")));
}

#[tokio::test]
async fn test_fetch_default_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/versioned"))
        .and(header("X-GitHub-Api-Version", "2022-11-28"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(mock_server.uri())
        .header("X-GitHub-Api-Version", "2022-11-28")
        .build();
    let client = HttpClient::with_config(config, Credential::Anonymous).unwrap();
    client.fetch("/versioned").await.unwrap();
}

#[tokio::test]
async fn test_fetch_default_accept_header_does_not_duplicate() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/media"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .base_url(mock_server.uri())
        .header("Accept", "text/plain")
        .build();
    let client = HttpClient::with_config(config, Credential::Anonymous).unwrap();
    client.fetch("/media").await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    let accepts: Vec<_> = requests[0].headers.get_all("accept").iter().collect();
    assert_eq!(accepts.len(), 1);
    assert_eq!(accepts[0], DEFAULT_ACCEPT);
}

#[tokio::test]
async fn test_fetch_404_is_remote_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("{\"message\":\"Not Found\"}"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Credential::Anonymous);
    let err = client.fetch("/missing").await.unwrap_err();

    match err {
        Error::Remote { status, body } => {
            assert_eq!(status, 404);
            assert!(body.contains("Not Found"));
        }
        other => panic!("expected remote error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_fetch_does_not_retry_server_errors() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Credential::Anonymous);
    let err = client.fetch("/flaky").await.unwrap_err();

    assert_eq!(err.status(), Some(503));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_fetch_invalid_json_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Credential::Anonymous);
    let err = client.fetch("/html").await.unwrap_err();
    assert!(matches!(err, Error::JsonParse(_)));
}

#[tokio::test]
async fn test_fetch_empty_body_is_null() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/nothing"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, Credential::Anonymous);
    let result = client.fetch("/nothing").await.unwrap();
    assert!(result.body.is_null());
}

#[tokio::test]
async fn test_fetch_full_url_bypasses_base() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&mock_server)
        .await;

    // Base URL points elsewhere; the absolute URL must win
    let config = HttpClientConfig::builder()
        .base_url("http://127.0.0.1:9")
        .build();
    let client = HttpClient::with_config(config, Credential::Anonymous).unwrap();

    let result = client
        .fetch(&format!("{}/api/test", mock_server.uri()))
        .await
        .unwrap();
    assert_eq!(result.item_count(), Some(0));
}

#[tokio::test]
async fn test_fetch_through_trait_object() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([1, 2])))
        .mount(&mock_server)
        .await;

    let fetcher: Box<dyn Fetch> = Box::new(client_for(&mock_server, Credential::Anonymous));
    let result = fetcher.fetch("/items").await.unwrap();
    assert_eq!(result.item_count(), Some(2));
}

#[test]
fn test_http_client_debug_redacts_token() {
    let client = HttpClient::new(Credential::token("ghp_secret")).unwrap();
    let debug_str = format!("{client:?}");
    assert!(debug_str.contains("HttpClient"));
    assert!(!debug_str.contains("ghp_secret"));
}
