//! Pagination types
//!
//! Request template, decoded page and the normalized pager metadata.

use crate::error::Result;
use crate::http::RequestConfig;
use crate::types::{JsonObject, JsonValue, QueryParams, QueryValue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::ops::Deref;
use tracing::warn;

/// Fields requested when the caller does not choose any
pub const DEFAULT_FIELDS: &[&str] = &["id", "displayName"];

/// Page size for single-page listing
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Page size for full iteration
pub const DEFAULT_ITERATE_PAGE_SIZE: u32 = 100;

// ============================================================================
// Page Request
// ============================================================================

/// One listing request against a collection endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    /// Resource name, e.g. `dataElements`
    pub resource: String,
    /// Requested fields, sent comma-joined
    pub fields: Vec<String>,
    /// 1-based page number; omitted from the query when `None`
    pub page: Option<u32>,
    /// Requested page size
    pub page_size: u32,
    /// Ask the server for total page metadata
    pub total_pages: bool,
    /// Key the items are nested under; defaults to the resource name
    pub collection_key: Option<String>,
    /// Extra parameters, applied last
    pub extra_params: QueryParams,
}

impl PageRequest {
    /// Create a request with default fields and page size
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            fields: DEFAULT_FIELDS.iter().map(ToString::to_string).collect(),
            page: None,
            page_size: DEFAULT_PAGE_SIZE,
            total_pages: false,
            collection_key: None,
            extra_params: QueryParams::new(),
        }
    }

    /// Set the requested fields
    #[must_use]
    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Request a specific page
    #[must_use]
    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Set page size
    #[must_use]
    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = size;
        self
    }

    /// Ask for total page metadata
    #[must_use]
    pub fn total_pages(mut self, enabled: bool) -> Self {
        self.total_pages = enabled;
        self
    }

    /// Override the collection key
    #[must_use]
    pub fn collection_key(mut self, key: impl Into<String>) -> Self {
        self.collection_key = Some(key.into());
        self
    }

    /// Add an extra query parameter
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.extra_params.insert(key.into(), value.into());
        self
    }

    /// Merge several extra query parameters
    #[must_use]
    pub fn params(mut self, params: QueryParams) -> Self {
        self.extra_params.extend(params);
        self
    }

    /// Key the item array is expected under
    pub fn resolved_collection_key(&self) -> &str {
        self.collection_key.as_deref().unwrap_or(&self.resource)
    }

    /// Endpoint path, `{resource}.json`
    pub fn endpoint(&self) -> String {
        format!("{}.json", self.resource)
    }

    /// Query for this request; extra parameters win on key collisions
    pub fn to_request_config(&self) -> RequestConfig {
        let mut config = RequestConfig::new()
            .query("fields", self.fields.join(","))
            .query("pageSize", self.page_size.to_string());
        if let Some(page) = self.page {
            config = config.query("page", page.to_string());
        }
        if self.total_pages {
            config = config.query("totalPages", "true");
        }
        config.params(&self.extra_params)
    }
}

// ============================================================================
// Iterate Options
// ============================================================================

/// Controls for a full iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IterateOptions {
    /// First page to fetch
    pub start_page: u32,
    /// Hard cap on the number of pages fetched
    pub max_pages: Option<u32>,
}

impl Default for IterateOptions {
    fn default() -> Self {
        Self {
            start_page: 1,
            max_pages: None,
        }
    }
}

impl IterateOptions {
    /// Create default options (start at page 1, no cap)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the first page
    #[must_use]
    pub fn start_page(mut self, page: u32) -> Self {
        self.start_page = page;
        self
    }

    /// Cap the number of pages fetched
    #[must_use]
    pub fn max_pages(mut self, pages: u32) -> Self {
        self.max_pages = Some(pages);
        self
    }
}

// ============================================================================
// Page
// ============================================================================

/// A decoded listing response
///
/// Wraps the raw body so unknown server fields are kept; the collection key
/// is always present once a page comes back from `list`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Page {
    body: JsonObject,
}

impl Page {
    /// Wrap a body, inserting an empty list under `collection_key` if absent
    pub fn new(mut body: JsonObject, collection_key: &str) -> Self {
        body.entry(collection_key.to_string())
            .or_insert_with(|| JsonValue::Array(Vec::new()));
        Self { body }
    }

    /// Items under `collection_key`; null, absent and non-array values are empty
    pub fn items(&self, collection_key: &str) -> &[JsonValue] {
        match self.body.get(collection_key) {
            Some(JsonValue::Array(items)) => items,
            _ => &[],
        }
    }

    /// Remove and return the items under `collection_key`
    pub fn take_items(&mut self, collection_key: &str) -> Vec<JsonValue> {
        match self.body.remove(collection_key) {
            Some(JsonValue::Array(items)) => items,
            Some(JsonValue::Null) | None => Vec::new(),
            Some(other) => {
                warn!(
                    "Collection '{collection_key}' is not an array ({}), treating as empty",
                    other
                );
                Vec::new()
            }
        }
    }

    /// Decode the items under `collection_key` into typed models
    pub fn items_as<T: DeserializeOwned>(&self, collection_key: &str) -> Result<Vec<T>> {
        self.items(collection_key)
            .iter()
            .map(|item| Ok(serde_json::from_value(item.clone())?))
            .collect()
    }

    /// Normalized pager metadata
    pub fn metadata(&self) -> PagingMetadata {
        PagingMetadata::from_body(&self.body)
    }

    /// Raw body
    pub fn into_inner(self) -> JsonObject {
        self.body
    }
}

impl Deref for Page {
    type Target = JsonObject;

    fn deref(&self) -> &Self::Target {
        &self.body
    }
}

impl From<Page> for JsonObject {
    fn from(page: Page) -> Self {
        page.body
    }
}

// ============================================================================
// Paging Metadata
// ============================================================================

/// Pager information normalized from either the nested or the flat form
///
/// ```text
/// nested: {"pager": {"page": 1, "pageSize": 50, "pageCount": 4, "total": 200}}
/// flat:   {"page": 1, "pageSize": 50, "pageCount": 4, "total": 200}
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagingMetadata {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub page_count: Option<u64>,
    pub total: Option<u64>,
}

impl PagingMetadata {
    /// Extract from a response body; the nested `pager` object wins
    pub fn from_body(body: &JsonObject) -> Self {
        let source = match body.get("pager") {
            Some(JsonValue::Object(pager)) => pager,
            _ => body,
        };
        Self {
            page: int_field(source, "page"),
            page_size: int_field(source, "pageSize"),
            page_count: int_field(source, "pageCount"),
            total: int_field(source, "total"),
        }
    }
}

/// Any non-null number counts as present; negatives clamp to 0 and
/// fractions round up
fn int_field(source: &JsonObject, key: &str) -> Option<u64> {
    match source.get(key)? {
        JsonValue::Number(n) => n
            .as_u64()
            .or_else(|| n.as_i64().map(|i| i.max(0) as u64))
            .or_else(|| n.as_f64().map(float_to_count)),
        JsonValue::String(s) => {
            let s = s.trim();
            s.parse()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(float_to_count))
        }
        _ => None,
    }
}

fn float_to_count(value: f64) -> u64 {
    value.max(0.0).ceil() as u64
}
