//! Blocking HTTP transport
//!
//! Mirrors [`HttpClient`](super::HttpClient) on the calling thread using
//! reqwest's blocking client. Must not be created or dropped from inside an
//! async runtime.

use super::client::{content_type, target_url, RequestConfig};
use super::response::parse_response;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::types::{JsonObject, Method, QueryParams};
use reqwest::blocking::Client;
use tracing::debug;

/// Blocking HTTP client bound to one API base
#[derive(Clone)]
pub struct BlockingHttpClient {
    client: Client,
    config: ClientConfig,
}

impl BlockingHttpClient {
    /// Build a client from connection settings
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        debug!("Initialized blocking HTTP client for {}", config.base_url);
        Ok(Self { client, config })
    }

    /// Connection settings
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Make a GET request
    pub fn get(&self, endpoint: &str, params: &QueryParams) -> Result<JsonObject> {
        self.request(Method::GET, endpoint, RequestConfig::new().params(params))
    }

    /// Make a generic request and decode the JSON object it returns
    pub fn request(
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

        let response = req.send()?;
        let status = response.status().as_u16();
        let content_type = content_type(response.headers());
        let body = response.text()?;

        parse_response(status, &content_type, &body)
    }
}

impl std::fmt::Debug for BlockingHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockingHttpClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
