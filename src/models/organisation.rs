//! Organisation units and the hierarchy built from them
//!
//! Units only reference their parent and children by UID. The hierarchy is
//! resolved through [`OrganisationUnitTree`], which owns every unit and looks
//! relatives up by id.

use super::ObjectRef;
use crate::types::JsonObject;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// DHIS2 organisation unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganisationUnit {
    pub id: String,
    pub display_name: String,
    /// 1 for the root of the hierarchy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ObjectRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<ObjectRef>>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl OrganisationUnit {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            level: None,
            code: None,
            parent: None,
            children: None,
            extra: JsonObject::new(),
        }
    }

    #[must_use]
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = Some(level);
        self
    }

    #[must_use]
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent = Some(ObjectRef::new(parent_id));
        self
    }

    /// UID of the parent, if any
    pub fn parent_id(&self) -> Option<&str> {
        self.parent.as_ref().map(|p| p.id.as_str())
    }
}

// ============================================================================
// Tree
// ============================================================================

/// Organisation units indexed by UID
#[derive(Debug, Clone, Default)]
pub struct OrganisationUnitTree {
    units: HashMap<String, OrganisationUnit>,
}

impl OrganisationUnitTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a unit
    pub fn insert(&mut self, unit: OrganisationUnit) {
        self.units.insert(unit.id.clone(), unit);
    }

    pub fn get(&self, uid: &str) -> Option<&OrganisationUnit> {
        self.units.get(uid)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Parent of `uid`, if both are in the tree
    pub fn parent(&self, uid: &str) -> Option<&OrganisationUnit> {
        self.get(uid)?.parent_id().and_then(|id| self.get(id))
    }

    /// Units whose parent is `uid`, sorted by UID
    pub fn children(&self, uid: &str) -> Vec<&OrganisationUnit> {
        let mut children: Vec<_> = self
            .units
            .values()
            .filter(|unit| unit.parent_id() == Some(uid))
            .collect();
        children.sort_by(|a, b| a.id.cmp(&b.id));
        children
    }

    /// Units without a parent in the tree, sorted by UID
    pub fn roots(&self) -> Vec<&OrganisationUnit> {
        let mut roots: Vec<_> = self
            .units
            .values()
            .filter(|unit| !unit.parent_id().is_some_and(|id| self.units.contains_key(id)))
            .collect();
        roots.sort_by(|a, b| a.id.cmp(&b.id));
        roots
    }

    /// Ancestors of `uid`, parent first and root last
    ///
    /// Stops at the first parent that is not in the tree. A cyclic parent
    /// chain ends before any unit is repeated.
    pub fn ancestors(&self, uid: &str) -> Vec<&OrganisationUnit> {
        let mut seen = HashSet::from([uid]);
        let mut ancestors = Vec::new();
        let mut current = self.parent(uid);

        while let Some(unit) = current {
            if !seen.insert(unit.id.as_str()) {
                break;
            }
            ancestors.push(unit);
            current = self.parent(&unit.id);
        }
        ancestors
    }
}

impl FromIterator<OrganisationUnit> for OrganisationUnitTree {
    fn from_iter<I: IntoIterator<Item = OrganisationUnit>>(iter: I) -> Self {
        Self {
            units: iter.into_iter().map(|unit| (unit.id.clone(), unit)).collect(),
        }
    }
}
