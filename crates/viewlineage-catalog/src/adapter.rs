//! Catalog adapter trait for reading view definitions and edges

use serde::{Deserialize, Serialize};
use std::fmt;
use viewlineage_core::{Diagnostic, DiagnosticCode, Location, Severity, ViewFilter, ViewId, ViewRecord};

/// A directed `dependent -> base` edge between two catalog objects
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DependencyEdge {
    /// The view that reads from `base`
    pub dependent: ViewId,

    /// The object being read
    pub base: ViewId,
}

impl DependencyEdge {
    pub fn new(dependent: ViewId, base: ViewId) -> Self {
        Self { dependent, base }
    }
}

impl fmt::Display for DependencyEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.dependent, self.base)
    }
}

/// Which catalog relation an edge comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeSource {
    /// Generic object dependency relation
    Dependency,

    /// View-specific cross-reference relation
    CrossReference,
}

impl fmt::Display for EdgeSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dependency => write!(f, "dependency"),
            Self::CrossReference => write!(f, "cross-reference"),
        }
    }
}

/// Errors that can occur when reading from a catalog
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("Connection failed: {0}")]
    ConnectionError(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Query failed: {0}")]
    QueryError(String),

    #[error("Failed to read catalog snapshot {path}: {message}")]
    SnapshotRead { path: String, message: String },

    #[error("Invalid catalog snapshot: {0}")]
    InvalidSnapshot(String),
}

impl CatalogError {
    /// Error diagnostic for a failed catalog read
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diagnostic = Diagnostic::new(DiagnosticCode::CatalogReadError, Severity::Error, self.to_string());
        match self {
            Self::SnapshotRead { path, .. } => diagnostic.with_location(Location::new(path.as_str())),
            _ => diagnostic,
        }
    }
}

/// Read-only access to a metadata catalog
///
/// Every call is a plain request/response with no retry. Failures propagate
/// to the caller unchanged.
#[async_trait::async_trait]
pub trait CatalogAdapter: Send + Sync {
    /// Get the adapter name (e.g., "InMemory")
    fn name(&self) -> &'static str;

    /// All objects whose identity matches the filter, with their definitions
    ///
    /// No restriction on object kind is applied here.
    async fn find_views(&self, filter: &ViewFilter) -> Result<Vec<ViewRecord>, CatalogError>;

    /// Base objects of `view` according to the dependency relation
    async fn dependency_edges(&self, view: &ViewId) -> Result<Vec<ViewRecord>, CatalogError>;

    /// Base objects of `view` according to the cross-reference relation
    async fn cross_reference_edges(&self, view: &ViewId) -> Result<Vec<ViewRecord>, CatalogError>;

    /// Base objects of `view` from the given relation
    async fn edges(&self, source: EdgeSource, view: &ViewId) -> Result<Vec<ViewRecord>, CatalogError> {
        match source {
            EdgeSource::Dependency => self.dependency_edges(view).await,
            EdgeSource::CrossReference => self.cross_reference_edges(view).await,
        }
    }

    /// Test the connection to the catalog
    async fn test_connection(&self) -> Result<(), CatalogError>;
}
