//! In-memory catalog adapter
//!
//! Holds view definitions and both edge relations in memory. It backs
//! snapshot-based runs and doubles as a test catalog:
//! - Simulate connection failures
//! - Simulate query latency
//! - Fail `find_views` or the edge lookups of specific views
//!
//! ## Usage
//!
//! ```rust,ignore
//! use viewlineage_catalog::{CatalogAdapter, InMemoryCatalog};
//! use viewlineage_core::{ViewId, ViewRecord};
//!
//! let catalog = InMemoryCatalog::new();
//! let a = ViewId::new("pkg", "A", "calculationview");
//! let b = ViewId::new("pkg", "B", "attributeview");
//! catalog.add_view(ViewRecord::new(a.clone(), "<Calculation:scenario/>")).await;
//! catalog.add_view(ViewRecord::new(b.clone(), "<view/>")).await;
//! catalog.add_dependency(a.clone(), b).await;
//!
//! let bases = catalog.dependency_edges(&a).await?;
//! ```

use crate::adapter::{CatalogAdapter, CatalogError, DependencyEdge};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;
use viewlineage_core::{ViewFilter, ViewId, ViewRecord};

/// Catalog backed by in-memory maps
///
/// Clones share the same underlying storage.
pub struct InMemoryCatalog {
    /// View definitions by identity
    views: Arc<RwLock<BTreeMap<ViewId, ViewRecord>>>,

    /// Generic object dependency relation
    dependencies: Arc<RwLock<Vec<DependencyEdge>>>,

    /// View-specific cross-reference relation
    cross_references: Arc<RwLock<Vec<DependencyEdge>>>,

    /// Errors to return from the edge lookups of specific views
    errors: Arc<RwLock<HashMap<ViewId, CatalogError>>>,

    /// Error to return from every `find_views` call
    query_error: Option<CatalogError>,

    /// Simulate connection failure
    fail_connection: bool,

    /// Simulate query latency (milliseconds)
    latency_ms: u64,

    /// Name to return from name() method
    adapter_name: &'static str,
}

impl InMemoryCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        InMemoryCatalogBuilder::new().build()
    }

    /// Make `test_connection` fail
    pub fn with_connection_failure(mut self) -> Self {
        self.fail_connection = true;
        self
    }

    /// Delay every call by `latency_ms` milliseconds
    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    /// Make every `find_views` call fail with `error`
    pub fn with_query_error(mut self, error: CatalogError) -> Self {
        self.query_error = Some(error);
        self
    }

    /// Set the name returned from `name()`
    pub fn with_name(mut self, name: &'static str) -> Self {
        self.adapter_name = name;
        self
    }

    /// Add or replace a view definition
    pub async fn add_view(&self, record: ViewRecord) {
        self.views.write().await.insert(record.id.clone(), record);
    }

    /// Remove a view definition, keeping any edges that mention it
    pub async fn remove_view(&self, id: &ViewId) -> Option<ViewRecord> {
        self.views.write().await.remove(id)
    }

    /// Record a `dependent -> base` edge in the dependency relation
    pub async fn add_dependency(&self, dependent: ViewId, base: ViewId) {
        self.dependencies
            .write()
            .await
            .push(DependencyEdge::new(dependent, base));
    }

    /// Record a `dependent -> base` edge in the cross-reference relation
    pub async fn add_cross_reference(&self, dependent: ViewId, base: ViewId) {
        self.cross_references
            .write()
            .await
            .push(DependencyEdge::new(dependent, base));
    }

    /// Make edge lookups for `view` fail with `error`
    pub async fn add_error(&self, view: ViewId, error: CatalogError) {
        self.errors.write().await.insert(view, error);
    }

    /// Clear all injected per-view errors
    pub async fn clear_errors(&self) {
        self.errors.write().await.clear();
    }

    pub async fn has_view(&self, id: &ViewId) -> bool {
        self.views.read().await.contains_key(id)
    }

    pub async fn view_count(&self) -> usize {
        self.views.read().await.len()
    }

    /// All stored view identities, sorted
    pub async fn view_ids(&self) -> Vec<ViewId> {
        self.views.read().await.keys().cloned().collect()
    }

    async fn simulate_latency(&self) {
        if self.latency_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.latency_ms)).await;
        }
    }

    /// Resolve the base endpoints of `view` in one edge relation
    ///
    /// Edges whose base object has no stored definition are skipped.
    async fn base_records(
        &self,
        relation: &RwLock<Vec<DependencyEdge>>,
        view: &ViewId,
    ) -> Result<Vec<ViewRecord>, CatalogError> {
        self.simulate_latency().await;

        if let Some(error) = self.errors.read().await.get(view) {
            return Err(error.clone());
        }

        let edges = relation.read().await;
        let views = self.views.read().await;

        let mut bases = Vec::new();
        for edge in edges.iter().filter(|e| &e.dependent == view) {
            match views.get(&edge.base) {
                Some(record) => bases.push(record.clone()),
                None => tracing::debug!(edge = %edge, "Skipping edge to object without definition"),
            }
        }

        Ok(bases)
    }
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for InMemoryCatalog {
    fn clone(&self) -> Self {
        Self {
            views: Arc::clone(&self.views),
            dependencies: Arc::clone(&self.dependencies),
            cross_references: Arc::clone(&self.cross_references),
            errors: Arc::clone(&self.errors),
            query_error: self.query_error.clone(),
            fail_connection: self.fail_connection,
            latency_ms: self.latency_ms,
            adapter_name: self.adapter_name,
        }
    }
}

#[async_trait::async_trait]
impl CatalogAdapter for InMemoryCatalog {
    fn name(&self) -> &'static str {
        self.adapter_name
    }

    async fn find_views(&self, filter: &ViewFilter) -> Result<Vec<ViewRecord>, CatalogError> {
        self.simulate_latency().await;

        if let Some(error) = &self.query_error {
            return Err(error.clone());
        }

        let views = self.views.read().await;
        Ok(views
            .values()
            .filter(|record| filter.matches(&record.id))
            .cloned()
            .collect())
    }

    async fn dependency_edges(&self, view: &ViewId) -> Result<Vec<ViewRecord>, CatalogError> {
        self.base_records(&self.dependencies, view).await
    }

    async fn cross_reference_edges(&self, view: &ViewId) -> Result<Vec<ViewRecord>, CatalogError> {
        self.base_records(&self.cross_references, view).await
    }

    async fn test_connection(&self) -> Result<(), CatalogError> {
        self.simulate_latency().await;

        if self.fail_connection {
            Err(CatalogError::ConnectionError(
                "Simulated connection failure".to_string(),
            ))
        } else {
            Ok(())
        }
    }
}

/// Builder for an [`InMemoryCatalog`] populated up front
///
/// Provides a fluent, synchronous API for building a catalog with
/// predefined views and edges.
///
/// # Example
///
/// ```rust,ignore
/// let catalog = InMemoryCatalogBuilder::new()
///     .with_view(ViewRecord::new(a.clone(), xml_a))
///     .with_view(ViewRecord::new(b.clone(), xml_b))
///     .with_dependency(a, b)
///     .with_latency(50)
///     .build();
/// ```
pub struct InMemoryCatalogBuilder {
    views: BTreeMap<ViewId, ViewRecord>,
    dependencies: Vec<DependencyEdge>,
    cross_references: Vec<DependencyEdge>,
    errors: HashMap<ViewId, CatalogError>,
    query_error: Option<CatalogError>,
    fail_connection: bool,
    latency_ms: u64,
    adapter_name: &'static str,
}

impl InMemoryCatalogBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self {
            views: BTreeMap::new(),
            dependencies: Vec::new(),
            cross_references: Vec::new(),
            errors: HashMap::new(),
            query_error: None,
            fail_connection: false,
            latency_ms: 0,
            adapter_name: "InMemory",
        }
    }

    /// Add a view definition
    pub fn with_view(mut self, record: ViewRecord) -> Self {
        self.views.insert(record.id.clone(), record);
        self
    }

    /// Add a dependency edge
    pub fn with_dependency(mut self, dependent: ViewId, base: ViewId) -> Self {
        self.dependencies.push(DependencyEdge::new(dependent, base));
        self
    }

    /// Add a cross-reference edge
    pub fn with_cross_reference(mut self, dependent: ViewId, base: ViewId) -> Self {
        self.cross_references.push(DependencyEdge::new(dependent, base));
        self
    }

    /// Make edge lookups for `view` fail
    pub fn with_error(mut self, view: ViewId, error: CatalogError) -> Self {
        self.errors.insert(view, error);
        self
    }

    /// Make every `find_views` call fail
    pub fn with_query_error(mut self, error: CatalogError) -> Self {
        self.query_error = Some(error);
        self
    }

    /// Enable connection failure simulation
    pub fn with_connection_failure(mut self) -> Self {
        self.fail_connection = true;
        self
    }

    /// Set simulated latency
    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    /// Set the adapter name
    pub fn with_name(mut self, name: &'static str) -> Self {
        self.adapter_name = name;
        self
    }

    /// Build the catalog
    pub fn build(self) -> InMemoryCatalog {
        InMemoryCatalog {
            views: Arc::new(RwLock::new(self.views)),
            dependencies: Arc::new(RwLock::new(self.dependencies)),
            cross_references: Arc::new(RwLock::new(self.cross_references)),
            errors: Arc::new(RwLock::new(self.errors)),
            query_error: self.query_error,
            fail_connection: self.fail_connection,
            latency_ms: self.latency_ms,
            adapter_name: self.adapter_name,
        }
    }
}

impl Default for InMemoryCatalogBuilder {
    fn default() -> Self {
        Self::new()
    }
}
