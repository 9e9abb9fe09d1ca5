//! Async DHIS2 client
//!
//! CRUD, listing, paging iteration, data value sets and analytics on top of
//! the async transport. Every request goes through the same classifier, so
//! errors surface unmodified.

use super::{metadata_params, object_endpoint};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::{HttpClient, RequestConfig};
use crate::models::AnalyticsResponse;
use crate::pagination::{IterateOptions, Page, PageRequest, PagingState};
use crate::types::{JsonObject, JsonValue, Method, QueryParams};
use futures::stream::{self, Stream};
use serde::Serialize;
use tracing::debug;

/// Asynchronous DHIS2 client
///
/// Cheap to clone; clones share one connection pool and can issue requests
/// concurrently.
#[derive(Debug, Clone)]
pub struct Dhis2Client {
    http: HttpClient,
}

impl Dhis2Client {
    /// Create a client from connection settings
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(config)?,
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

    pub async fn get(&self, endpoint: &str, params: &QueryParams) -> Result<JsonObject> {
        self.http.get(endpoint, params).await
    }

    pub async fn post<T: Serialize + ?Sized>(&self, endpoint: &str, body: &T) -> Result<JsonObject> {
        self.send_json(Method::POST, endpoint, body).await
    }

    pub async fn put<T: Serialize + ?Sized>(&self, endpoint: &str, body: &T) -> Result<JsonObject> {
        self.send_json(Method::PUT, endpoint, body).await
    }

    pub async fn patch<T: Serialize + ?Sized>(&self, endpoint: &str, body: &T) -> Result<JsonObject> {
        self.send_json(Method::PATCH, endpoint, body).await
    }

    pub async fn delete(&self, endpoint: &str, params: &QueryParams) -> Result<JsonObject> {
        self.http
            .request(Method::DELETE, endpoint, RequestConfig::new().params(params))
            .await
    }

    async fn send_json<T: Serialize + ?Sized>(
        &self,
        method: Method,
        endpoint: &str,
        body: &T,
    ) -> Result<JsonObject> {
        let body = serde_json::to_value(body)?;
        self.http
            .request(method, endpoint, RequestConfig::new().json(body))
            .await
    }

    // ========================================================================
    // Listing and paging
    // ========================================================================

    /// Fetch a single page of a collection
    ///
    /// The resolved collection key is always present in the result.
    pub async fn list(&self, request: &PageRequest) -> Result<Page> {
        let body = self
            .http
            .request(
                Method::GET,
                &request.endpoint(),
                request.to_request_config(),
            )
            .await?;
        Ok(Page::new(body, request.resolved_collection_key()))
    }

    /// Lazily stream every item of a collection across pages
    ///
    /// Each call starts a fresh session at `options.start_page`. Pages are
    /// fetched strictly in order and only when the previous page's items
    /// have all been consumed; dropping the stream stops further fetches.
    /// The first failed fetch is yielded as an error and ends the stream.
    pub fn iterate(
        &self,
        template: PageRequest,
        options: IterateOptions,
    ) -> impl Stream<Item = Result<JsonValue>> + Send + '_ {
        let state = PagingState::new(template, options);
        stream::try_unfold(state, move |state| self.next_item(state))
    }

    async fn next_item(&self, mut state: PagingState) -> Result<Option<(JsonValue, PagingState)>> {
        loop {
            if let Some(item) = state.pop_item() {
                return Ok(Some((item, state)));
            }
            let Some(request) = state.next_request() else {
                return Ok(None);
            };
            let page = self.list(&request).await?;
            state.absorb(page);
        }
    }

    // ========================================================================
    // Metadata objects
    // ========================================================================

    /// Fetch one metadata object by UID
    pub async fn get_metadata<S: AsRef<str>>(
        &self,
        resource: &str,
        uid: &str,
        fields: &[S],
        extra: &QueryParams,
    ) -> Result<JsonObject> {
        let endpoint = format!("{}.json", object_endpoint(resource, uid));
        self.get(&endpoint, &metadata_params(fields, extra)).await
    }

    /// POST a new metadata object into a collection
    pub async fn create_metadata<T: Serialize + ?Sized>(
        &self,
        resource: &str,
        payload: &T,
    ) -> Result<JsonObject> {
        self.post(resource, payload).await
    }

    /// PUT (replace) an existing metadata object by UID
    pub async fn update_metadata<T: Serialize + ?Sized>(
        &self,
        resource: &str,
        uid: &str,
        payload: &T,
    ) -> Result<JsonObject> {
        self.put(&object_endpoint(resource, uid), payload).await
    }

    /// PATCH (partial update) a metadata object by UID
    pub async fn patch_metadata<T: Serialize + ?Sized>(
        &self,
        resource: &str,
        uid: &str,
        payload: &T,
    ) -> Result<JsonObject> {
        self.patch(&object_endpoint(resource, uid), payload).await
    }

    /// DELETE a metadata object by UID
    pub async fn delete_metadata(&self, resource: &str, uid: &str) -> Result<JsonObject> {
        self.delete(&object_endpoint(resource, uid), &QueryParams::new())
            .await
    }

    // ========================================================================
    // Data value sets and analytics
    // ========================================================================

    /// Import a data value set
    pub async fn push_data_value_set<T: Serialize + ?Sized>(&self, payload: &T) -> Result<JsonObject> {
        self.post("dataValueSets", payload).await
    }

    /// Export data value sets
    pub async fn pull_data_value_set(&self, params: &QueryParams) -> Result<JsonObject> {
        self.get("dataValueSets", params).await
    }

    /// Run an analytics query
    pub async fn get_analytics(&self, params: &QueryParams) -> Result<AnalyticsResponse> {
        let raw = self.get("analytics.json", params).await?;
        Ok(serde_json::from_value(JsonValue::Object(raw))?)
    }

    /// Release the client and its connection pool
    pub fn close(self) {
        debug!("Closing client for {}", self.config().base_url);
    }
}
