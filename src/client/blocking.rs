//! Blocking DHIS2 client
//!
//! Same surface as [`Dhis2Client`](super::Dhis2Client), executed on the
//! calling thread.

use super::{metadata_params, object_endpoint};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::{BlockingHttpClient, RequestConfig};
use crate::models::AnalyticsResponse;
use crate::pagination::{IterateOptions, Page, PageRequest, PagingState};
use crate::types::{JsonObject, JsonValue, Method, QueryParams};
use serde::Serialize;
use std::iter::FusedIterator;
use tracing::debug;

/// Synchronous DHIS2 client
#[derive(Debug, Clone)]
pub struct BlockingDhis2Client {
    http: BlockingHttpClient,
}

impl BlockingDhis2Client {
    /// Create a client from connection settings
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            http: BlockingHttpClient::new(config)?,
        })
    }

    /// Create a client with default timeout and user agent
    pub fn connect(
        base_url: &str,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self> {
        Self::new(ClientConfig::new(base_url, username, password)?)
    }

    /// Connection settings
    pub fn config(&self) -> &ClientConfig {
        self.http.config()
    }

    // ========================================================================
    // Generic CRUD
    // ========================================================================

    pub fn get(&self, endpoint: &str, params: &QueryParams) -> Result<JsonObject> {
        self.http.get(endpoint, params)
    }

    pub fn post<T: Serialize + ?Sized>(&self, endpoint: &str, body: &T) -> Result<JsonObject> {
        self.send_json(Method::POST, endpoint, body)
    }

    pub fn put<T: Serialize + ?Sized>(&self, endpoint: &str, body: &T) -> Result<JsonObject> {
        self.send_json(Method::PUT, endpoint, body)
    }

    pub fn patch<T: Serialize + ?Sized>(&self, endpoint: &str, body: &T) -> Result<JsonObject> {
        self.send_json(Method::PATCH, endpoint, body)
    }

    pub fn delete(&self, endpoint: &str, params: &QueryParams) -> Result<JsonObject> {
        self.http
            .request(Method::DELETE, endpoint, RequestConfig::new().params(params))
    }

    fn send_json<T: Serialize + ?Sized>(
        &self,
        method: Method,
        endpoint: &str,
        body: &T,
    ) -> Result<JsonObject> {
        let body = serde_json::to_value(body)?;
        self.http
            .request(method, endpoint, RequestConfig::new().json(body))
    }

    // ========================================================================
    // Listing and paging
    // ========================================================================

    /// Fetch a single page of a collection
    pub fn list(&self, request: &PageRequest) -> Result<Page> {
        let body = self.http.request(
            Method::GET,
            &request.endpoint(),
            request.to_request_config(),
        )?;
        Ok(Page::new(body, request.resolved_collection_key()))
    }

    /// Lazily iterate every item of a collection across pages
    ///
    /// See [`Dhis2Client::iterate`](super::Dhis2Client::iterate); the
    /// blocking iterator follows the same rules.
    pub fn iterate(&self, template: PageRequest, options: IterateOptions) -> Items<'_> {
        Items {
            client: self,
            state: Some(PagingState::new(template, options)),
        }
    }

    // ========================================================================
    // Metadata objects
    // ========================================================================

    /// Fetch one metadata object by UID
    pub fn get_metadata<S: AsRef<str>>(
        &self,
        resource: &str,
        uid: &str,
        fields: &[S],
        extra: &QueryParams,
    ) -> Result<JsonObject> {
        let endpoint = format!("{}.json", object_endpoint(resource, uid));
        self.get(&endpoint, &metadata_params(fields, extra))
    }

    pub fn create_metadata<T: Serialize + ?Sized>(
        &self,
        resource: &str,
        payload: &T,
    ) -> Result<JsonObject> {
        self.post(resource, payload)
    }

    pub fn update_metadata<T: Serialize + ?Sized>(
        &self,
        resource: &str,
        uid: &str,
        payload: &T,
    ) -> Result<JsonObject> {
        self.put(&object_endpoint(resource, uid), payload)
    }

    pub fn patch_metadata<T: Serialize + ?Sized>(
        &self,
        resource: &str,
        uid: &str,
        payload: &T,
    ) -> Result<JsonObject> {
        self.patch(&object_endpoint(resource, uid), payload)
    }

    pub fn delete_metadata(&self, resource: &str, uid: &str) -> Result<JsonObject> {
        self.delete(&object_endpoint(resource, uid), &QueryParams::new())
    }

    // ========================================================================
    // Data value sets and analytics
    // ========================================================================

    pub fn push_data_value_set<T: Serialize + ?Sized>(&self, payload: &T) -> Result<JsonObject> {
        self.post("dataValueSets", payload)
    }

    pub fn pull_data_value_set(&self, params: &QueryParams) -> Result<JsonObject> {
        self.get("dataValueSets", params)
    }

    pub fn get_analytics(&self, params: &QueryParams) -> Result<AnalyticsResponse> {
        let raw = self.get("analytics.json", params)?;
        Ok(serde_json::from_value(JsonValue::Object(raw))?)
    }

    /// Release the client and its connection pool
    pub fn close(self) {
        debug!("Closing blocking client for {}", self.config().base_url);
    }
}

/// Lazy item iterator returned by [`BlockingDhis2Client::iterate`]
///
/// Yields `Err` at most once, after which it is exhausted.
#[derive(Debug)]
pub struct Items<'a> {
    client: &'a BlockingDhis2Client,
    state: Option<PagingState>,
}

impl Iterator for Items<'_> {
    type Item = Result<JsonValue>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let state = self.state.as_mut()?;
            if let Some(item) = state.pop_item() {
                return Some(Ok(item));
            }
            let request = state.next_request()?;

            match self.client.list(&request) {
                Ok(page) => state.absorb(page),
                Err(e) => {
                    self.state = None;
                    return Some(Err(e));
                }
            }
        }
    }
}

impl FusedIterator for Items<'_> {}
