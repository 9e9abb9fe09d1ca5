//! Typed DHIS2 records
//!
//! Wire names are camelCase. Every record keeps the fields it does not model
//! in an `extra` map, so a decoded object serializes back to what the server
//! sent.

mod analytics;
mod data_element;
mod data_set;
mod organisation;

pub use analytics::{AnalyticsMetadata, AnalyticsResponse};
pub use data_element::{CategoryCombo, CategoryOption, DataElement, OptionItem, OptionSet};
pub use data_set::DataSet;
pub use organisation::{OrganisationUnit, OrganisationUnitTree};

use crate::types::JsonObject;
use serde::{Deserialize, Serialize};

/// Reference to another object by UID
///
/// DHIS2 embeds related objects as `{"id": "..."}` unless nested fields are
/// requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl ObjectRef {
    /// Reference with only an id
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: None,
            extra: JsonObject::new(),
        }
    }
}
