//! Data sets

use super::ObjectRef;
use crate::types::JsonObject;
use serde::{Deserialize, Serialize};

/// DHIS2 data set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSet {
    pub id: String,
    pub display_name: String,
    /// e.g. `Monthly`, `Quarterly`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organisation_units: Option<Vec<ObjectRef>>,
    /// Data element UIDs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_elements: Option<Vec<String>>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl DataSet {
    /// Whether the data set is assigned to the given organisation unit
    pub fn is_assigned_to(&self, org_unit: &str) -> bool {
        self.organisation_units
            .as_deref()
            .is_some_and(|units| units.iter().any(|unit| unit.id == org_unit))
    }
}
