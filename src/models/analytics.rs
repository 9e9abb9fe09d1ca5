//! Analytics responses

use crate::types::{JsonObject, JsonValue};
use serde::{Deserialize, Serialize};

/// Simplified metadata entry for one analytics dimension
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimension: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<JsonObject>>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

/// Tabular analytics result
///
/// `headers`, `metaData` and `rows` are required; a body without them is not
/// an analytics response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsResponse {
    pub headers: Vec<JsonObject>,
    #[serde(rename = "metaData")]
    pub meta_data: JsonObject,
    pub rows: Vec<Vec<JsonValue>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u64>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl AnalyticsResponse {
    /// Position of the column whose header `name` matches
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|header| header.get("name").and_then(JsonValue::as_str) == Some(name))
    }

    /// Display name of an item from `metaData.items`
    pub fn item_name(&self, uid: &str) -> Option<&str> {
        self.meta_data
            .get("items")?
            .get(uid)?
            .get("name")?
            .as_str()
    }
}
