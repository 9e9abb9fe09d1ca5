//! Tests for the HTTP transport module

use super::*;
use crate::config::ClientConfig;
use crate::error::Error;
use crate::types::{Method, QueryParams, QueryValue};
use serde_json::json;
use test_case::test_case;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig::new(&format!("{}/api", server.uri()), "user", "pass").unwrap()
}

// ============================================================================
// Classification Tests
// ============================================================================

#[test_case(401 ; "unauthorized")]
#[test_case(403 ; "forbidden")]
fn test_check_status_authentication(status: u16) {
    let err = check_status(status, "denied").unwrap_err();
    assert!(matches!(err, Error::Authentication { ref body } if body == "denied"));
}

#[test]
fn test_check_status_not_found() {
    let err = check_status(404, "").unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}

#[test_case(400, "Bad request: invalid parameter" ; "bad request")]
#[test_case(409, "Conflict: object already exists" ; "conflict")]
fn test_check_status_validation(status: u16, body: &str) {
    let err = check_status(status, body).unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));
    assert!(err.to_string().contains(body));
}

#[test_case(405 ; "method not allowed")]
#[test_case(422 ; "unprocessable")]
#[test_case(429 ; "too many requests")]
#[test_case(500 ; "internal")]
#[test_case(503 ; "unavailable")]
fn test_check_status_server(status: u16) {
    let err = check_status(status, "oops").unwrap_err();
    assert_eq!(err.status(), Some(status));
    assert_eq!(err.to_string(), format!("Server error: {status}: oops"));
}

#[test_case(200 ; "ok")]
#[test_case(201 ; "created")]
#[test_case(204 ; "no content")]
#[test_case(302 ; "redirect")]
fn test_check_status_success(status: u16) {
    assert!(check_status(status, "").is_ok());
}

#[test]
fn test_decode_body_no_content() {
    // 204 short-circuits even with a non-JSON content type
    assert!(decode_body(204, "text/html", "<html/>").unwrap().is_empty());
    assert!(decode_body(200, "", "").unwrap().is_empty());
}

#[test]
fn test_decode_body_object() {
    let map = decode_body(200, "application/json;charset=UTF-8", r#"{"a": 1}"#).unwrap();
    assert_eq!(map.get("a"), Some(&json!(1)));
}

#[test]
fn test_decode_body_wrong_content_type() {
    let body = "x".repeat(500);
    let err = decode_body(200, "Text/HTML", &body).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("Content-Type='text/html'"));
    assert!(message.contains(&"x".repeat(BODY_EXCERPT_CHARS)));
    assert!(!message.contains(&"x".repeat(BODY_EXCERPT_CHARS + 1)));
}

#[test]
fn test_decode_body_invalid_json() {
    let err = decode_body(200, "application/json", "{not json").unwrap_err();
    assert!(matches!(err, Error::Server { status: None, .. }));
    assert!(err.to_string().contains("Failed to decode JSON response"));
    assert!(err.to_string().contains("{not json"));
}

#[test]
fn test_decode_body_rejects_non_object() {
    let err = decode_body(200, "application/json", "[1, 2]").unwrap_err();
    assert!(err.to_string().contains("an array"));
}

#[test]
fn test_excerpt_counts_characters() {
    let body = "é".repeat(300);
    assert_eq!(excerpt(&body).chars().count(), BODY_EXCERPT_CHARS);
}

// ============================================================================
// Request Config Tests
// ============================================================================

#[test]
fn test_request_config_query_replaces_key() {
    let config = RequestConfig::new()
        .query("pageSize", "50")
        .query("fields", "id")
        .query("pageSize", "10");

    assert_eq!(config.query_value("pageSize"), Some("10"));
    assert_eq!(config.query.len(), 2);
}

#[test]
fn test_request_config_params_take_precedence() {
    let mut extra = QueryParams::new();
    extra.insert("pageSize".to_string(), QueryValue::Int(7));
    extra.insert(
        "dimension".to_string(),
        QueryValue::List(vec!["dx:a".to_string(), "pe:b".to_string()]),
    );

    let config = RequestConfig::new().query("pageSize", "50").params(&extra);
    assert_eq!(config.query_value("pageSize"), Some("7"));
    assert_eq!(
        config.query.iter().filter(|(k, _)| k == "dimension").count(),
        2
    );
}

#[test]
fn test_target_url_joins_endpoint() {
    let config = ClientConfig::new("https://example.org/api/", "user", "pass").unwrap();
    let request = RequestConfig::new().query("paging", "false");

    assert_eq!(
        super::client::target_url(&config, Method::GET, "/dataElements.json", &request),
        "https://example.org/api/dataElements.json"
    );
    assert_eq!(
        super::client::target_url(&config, Method::DELETE, "dataElements/abc", &request),
        "https://example.org/api/dataElements/abc"
    );
}

// ============================================================================
// Async Client Tests
// ============================================================================

#[tokio::test]
async fn test_http_client_get_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/dataElements.json"))
        .and(query_param("fields", "id,displayName"))
        .and(header("Authorization", "Basic dXNlcjpwYXNz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "dataElements": [{"id": "de1"}]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpClient::new(config_for(&mock_server)).unwrap();
    let mut params = QueryParams::new();
    params.insert("fields".to_string(), "id,displayName".into());

    let body = client.get("dataElements.json", &params).await.unwrap();
    assert_eq!(body["dataElements"][0]["id"], "de1");
}

#[tokio::test]
async fn test_http_client_post_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/dataElements"))
        .and(body_json(json!({"name": "X"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"status": "OK"})))
        .mount(&mock_server)
        .await;

    let client = HttpClient::new(config_for(&mock_server)).unwrap();
    let body = client
        .request(
            Method::POST,
            "/dataElements",
            RequestConfig::new().json(json!({"name": "X"})),
        )
        .await
        .unwrap();

    assert_eq!(body["status"], "OK");
}

#[tokio::test]
async fn test_http_client_no_content() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/dataElements/abc"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let client = HttpClient::new(config_for(&mock_server)).unwrap();
    let body = client
        .request(Method::DELETE, "dataElements/abc", RequestConfig::new())
        .await
        .unwrap();

    assert!(body.is_empty());
}

#[tokio::test]
async fn test_http_client_404_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/dataElements/missing.json"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Object not found"))
        .mount(&mock_server)
        .await;

    let client = HttpClient::new(config_for(&mock_server)).unwrap();
    let err = client
        .get("dataElements/missing.json", &QueryParams::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::NotFound { ref body } if body == "Object not found"));
}

#[tokio::test]
async fn test_http_client_500_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/flaky.json"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HttpClient::new(config_for(&mock_server)).unwrap();
    let err = client
        .get("flaky.json", &QueryParams::new())
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn test_http_client_html_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/login.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string("<html>login</html>"),
        )
        .mount(&mock_server)
        .await;

    let client = HttpClient::new(config_for(&mock_server)).unwrap();
    let err = client
        .get("login.json", &QueryParams::new())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("<html>login</html>"));
}

#[test]
fn test_http_client_debug_hides_password() {
    let config = ClientConfig::new("https://example.org/api", "user", "secret").unwrap();
    let client = HttpClient::new(config).unwrap();
    let debug_str = format!("{client:?}");
    assert!(debug_str.contains("HttpClient"));
    assert!(!debug_str.contains("secret"));
}

// ============================================================================
// Blocking Client Tests
// ============================================================================

#[test]
fn test_blocking_client_get_and_errors() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let mock_server = runtime.block_on(MockServer::start());

    runtime.block_on(
        Mock::given(method("GET"))
            .and(path("/api/system/info.json"))
            .and(header("Authorization", "Basic dXNlcjpwYXNz"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"version": "2.40"})))
            .mount(&mock_server),
    );
    runtime.block_on(
        Mock::given(method("GET"))
            .and(path("/api/secret.json"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server),
    );

    let client = BlockingHttpClient::new(config_for(&mock_server)).unwrap();

    let body = client.get("system/info.json", &QueryParams::new()).unwrap();
    assert_eq!(body["version"], "2.40");

    let err = client.get("secret.json", &QueryParams::new()).unwrap_err();
    assert!(matches!(err, Error::Authentication { .. }));
}
