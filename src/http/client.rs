//! Async HTTP transport
//!
//! Issues one request per call against the configured base URL with basic
//! auth, then hands status, content type and body to the shared classifier.
//! No retries: a failed request surfaces immediately.

use super::response::parse_response;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::types::{query_pairs, JsonObject, JsonValue, Method, QueryParams};
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::Client;
use tracing::{debug, info};

/// Configuration for a single request
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Query parameters, in insertion order
    pub query: Vec<(String, String)>,
    /// Request body (JSON)
    pub body: Option<JsonValue>,
}

impl RequestConfig {
    /// Create a new request config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a query parameter, replacing any earlier value for the key
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        self.query.retain(|(k, _)| *k != key);
        self.query.push((key, value.into()));
        self
    }

    /// Merge a parameter map; its keys replace earlier values
    #[must_use]
    pub fn params(mut self, params: &QueryParams) -> Self {
        for key in params.keys() {
            self.query.retain(|(k, _)| k != key);
        }
        self.query.extend(query_pairs(params));
        self
    }

    /// Set JSON body
    #[must_use]
    pub fn json(mut self, body: JsonValue) -> Self {
        self.body = Some(body);
        self
    }

    /// First value recorded for a query key
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Async HTTP client bound to one API base
///
/// Cloning is cheap and shares the underlying connection pool.
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    config: ClientConfig,
}

impl HttpClient {
    /// Build a client from connection settings
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        debug!("Initialized HTTP client for {}", config.base_url);
        Ok(Self { client, config })
    }

    /// Connection settings
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Make a GET request
    pub async fn get(&self, endpoint: &str, params: &QueryParams) -> Result<JsonObject> {
        self.request(Method::GET, endpoint, RequestConfig::new().params(params))
            .await
    }

    /// Make a generic request and decode the JSON object it returns
    pub async fn request(
        &self,
        method: Method,
        endpoint: &str,
        config: RequestConfig,
    ) -> Result<JsonObject> {
        let url = target_url(&self.config, method, endpoint, &config);

        let mut req = self
            .client
            .request(method.into(), &url)
            .basic_auth(&self.config.username, Some(&self.config.password));

        if !config.query.is_empty() {
            req = req.query(&config.query);
        }
        if let Some(ref body) = config.body {
            req = req.json(body);
        }

        let response = req.send().await?;
        let status = response.status().as_u16();
        let content_type = content_type(response.headers());
        let body = response.text().await?;

        parse_response(status, &content_type, &body)
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Resolve `endpoint` against the base URL and log the outgoing request
pub(crate) fn target_url(
    config: &ClientConfig,
    method: Method,
    endpoint: &str,
    request: &RequestConfig,
) -> String {
    let url = config.url(endpoint);
    info!("{} {} params={:?}", method, url, request.query);
    url
}

/// Content type header as a string, empty when absent
pub(crate) fn content_type(headers: &HeaderMap) -> String {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
