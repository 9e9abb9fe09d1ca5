//! Tests for CLI parsing and connection resolution

use super::commands::{params_map, split_list};
use super::runner::{analytics_query, overlay_profile};
use super::*;
use crate::config::ConnectionProfile;
use crate::types::{QueryParams, QueryValue};
use clap::Parser;
use serde_json::json;
use test_case::test_case;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test_case("level=2", "level", QueryValue::Int(2) ; "digits become int")]
#[test_case("includeChildren=TRUE", "includeChildren", QueryValue::Bool(true) ; "bool any case")]
#[test_case("paging=false", "paging", QueryValue::Bool(false) ; "false")]
#[test_case("filter=name:like:ANC", "filter", QueryValue::Str("name:like:ANC".into()) ; "colon string")]
#[test_case("query=a=b", "query", QueryValue::Str("a=b".into()) ; "split on first equals")]
#[test_case("code=-1", "code", QueryValue::Str("-1".into()) ; "negative stays string")]
fn test_parse_param(raw: &str, key: &str, value: QueryValue) {
    assert_eq!(parse_param(raw), Ok((key.to_string(), value)));
}

#[test]
fn test_parse_param_rejects_malformed() {
    assert!(parse_param("level").is_err());
    assert!(parse_param("=2").is_err());
}

#[test]
fn test_params_map_last_wins() {
    let params = params_map(&[
        ("level".to_string(), QueryValue::Int(1)),
        ("level".to_string(), QueryValue::Int(3)),
    ]);
    assert_eq!(params.get("level"), Some(&QueryValue::Int(3)));
}

#[test]
fn test_split_list() {
    assert_eq!(split_list("id, displayName,,level"), vec!["id", "displayName", "level"]);
    assert!(split_list("").is_empty());
}

#[test]
fn test_parse_list_command() {
    let cli = Cli::try_parse_from([
        "dhis2kit",
        "--base-url",
        "http://localhost:8080/api",
        "list",
        "organisationUnits",
        "--fields",
        "id,displayName,level",
        "--page-size",
        "100",
        "--total-pages",
        "--param",
        "level=2",
    ])
    .unwrap();

    match cli.command {
        Commands::List {
            resource,
            page,
            page_size,
            total_pages,
            params,
            ..
        } => {
            assert_eq!(resource, "organisationUnits");
            assert_eq!(page, None);
            assert_eq!(page_size, 100);
            assert!(total_pages);
            assert_eq!(params, vec![("level".to_string(), QueryValue::Int(2))]);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_parse_iterate_defaults() {
    let cli = Cli::try_parse_from(["dhis2kit", "iterate", "dataElements", "-v"]).unwrap();

    assert!(cli.verbose);
    match cli.command {
        Commands::Iterate {
            page_size,
            start_page,
            max_pages,
            limit,
            ..
        } => {
            assert_eq!(page_size, 100);
            assert_eq!(start_page, 1);
            assert_eq!(max_pages, None);
            assert_eq!(limit, None);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_parse_bad_param_fails() {
    let result = Cli::try_parse_from(["dhis2kit", "get", "dataElements", "abc", "--param", "x"]);
    assert!(result.is_err());
}

#[test]
fn test_flags_override_profile() {
    let cli = Cli::try_parse_from([
        "dhis2kit",
        "--base-url",
        "http://flag/api",
        "--user",
        "flag-user",
        "--password",
        "flag-pass",
        "push-dvs",
        "payload.json",
    ])
    .unwrap();
    let profile = ConnectionProfile {
        base_url: Some("http://profile/api".to_string()),
        username: Some("profile-user".to_string()),
        password: None,
        timeout_secs: Some(5),
        user_agent: Some("custom/1.0".to_string()),
    };

    let merged = overlay_profile(&cli, profile);
    assert_eq!(merged.base_url.as_deref(), Some("http://flag/api"));
    assert_eq!(merged.username.as_deref(), Some("flag-user"));
    assert_eq!(merged.password.as_deref(), Some("flag-pass"));
    assert_eq!(merged.timeout_secs, Some(5));

    let config = merged.into_config().unwrap();
    assert_eq!(config.user_agent, "custom/1.0");
}

#[test]
fn test_analytics_query() {
    let mut extra = QueryParams::new();
    extra.insert("displayProperty".to_string(), "NAME".into());

    let query = analytics_query(
        &["dx:Uvn6LCg7dVU,pe:LAST_12_MONTHS".to_string(), "ou:ImspTQPwCqd".to_string()],
        Some("co:abc"),
        &extra,
    );

    assert_eq!(
        query.get("dimension"),
        Some(&QueryValue::List(vec![
            "dx:Uvn6LCg7dVU".to_string(),
            "pe:LAST_12_MONTHS".to_string(),
            "ou:ImspTQPwCqd".to_string(),
        ]))
    );
    assert_eq!(query.get("filter"), Some(&QueryValue::Str("co:abc".to_string())));
    assert_eq!(query.len(), 3);
}

#[test]
fn test_analytics_query_without_dimensions() {
    let query = analytics_query(&[], None, &QueryParams::new());
    assert!(query.is_empty());
}

#[tokio::test]
async fn test_demo_lists_then_walks_two_pages() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/dataElements.json"))
        .and(query_param("fields", "id,displayName,valueType"))
        .and(query_param("pageSize", "5"))
        .and(query_param("totalPages", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "dataElements": [{"id": "de1", "displayName": "DE1", "valueType": "NUMBER"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let units: Vec<_> = (1..=5)
        .map(|i| json!({"id": format!("ou{i}"), "displayName": "Unit", "level": 2}))
        .collect();
    Mock::given(method("GET"))
        .and(path("/api/organisationUnits.json"))
        .and(query_param("pageSize", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "organisationUnits": units,
            "pager": {"pageCount": 4}
        })))
        .expect(2)
        .mount(&server)
        .await;

    let base_url = format!("{}/api", server.uri());
    let cli = Cli::try_parse_from([
        "dhis2kit",
        "--base-url",
        base_url.as_str(),
        "--user",
        "user",
        "--password",
        "pass",
        "demo",
    ])
    .unwrap();

    Runner::new(cli).run().await.unwrap();
    server.verify().await;
}
