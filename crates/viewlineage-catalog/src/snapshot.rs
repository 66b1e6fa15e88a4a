//! JSON export of a catalog
//!
//! ```json
//! {
//!   "objects": [
//!     { "package_id": "sales", "object_name": "CV_ORDERS",
//!       "object_suffix": "calculationview", "cdata": "<Calculation:scenario ...>" }
//!   ],
//!   "dependencies": [
//!     { "dependent": { "package_id": "sales", "object_name": "CV_ORDERS", "object_suffix": "calculationview" },
//!       "base": { "package_id": "sales", "object_name": "AT_CUSTOMER", "object_suffix": "attributeview" } }
//!   ],
//!   "cross_references": []
//! }
//! ```
//!
//! Upper-case column names (`PACKAGE_ID`, `OBJECT_NAME`, `OBJECT_SUFFIX`,
//! `CDATA`) as exported from the repository tables are accepted too.

use crate::adapter::{CatalogError, DependencyEdge};
use crate::memory::{InMemoryCatalog, InMemoryCatalogBuilder};
use serde::{Deserialize, Serialize};
use std::path::Path;
use viewlineage_core::ViewRecord;

/// Serialized catalog contents
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    /// Object definitions
    #[serde(default)]
    pub objects: Vec<ViewRecord>,

    /// Generic object dependency relation
    #[serde(default)]
    pub dependencies: Vec<DependencyEdge>,

    /// View-specific cross-reference relation
    #[serde(default)]
    pub cross_references: Vec<DependencyEdge>,
}

impl CatalogSnapshot {
    /// Load a snapshot from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|e| CatalogError::SnapshotRead {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json(&content)
    }

    /// Parse a snapshot from JSON text
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        serde_json::from_str(json).map_err(|e| CatalogError::InvalidSnapshot(e.to_string()))
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, CatalogError> {
        serde_json::to_string_pretty(self).map_err(|e| CatalogError::InvalidSnapshot(e.to_string()))
    }

    /// Build an in-memory catalog holding this snapshot
    pub fn into_catalog(self) -> InMemoryCatalog {
        let mut builder = InMemoryCatalogBuilder::new().with_name("Snapshot");
        for record in self.objects {
            builder = builder.with_view(record);
        }
        for edge in self.dependencies {
            builder = builder.with_dependency(edge.dependent, edge.base);
        }
        for edge in self.cross_references {
            builder = builder.with_cross_reference(edge.dependent, edge.base);
        }
        builder.build()
    }
}
