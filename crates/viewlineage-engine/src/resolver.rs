//! View-set resolution
//!
//! The top-level set is every supported view matching the filter. With
//! `recursive` set it is extended by the base endpoints of edges leaving a
//! top-level view, from both edge relations. Expansion stops after that one
//! hop: bases of expanded views are not followed.

use serde::Serialize;
use std::collections::BTreeMap;
use viewlineage_catalog::{CatalogAdapter, CatalogError, EdgeSource};
use viewlineage_core::{ViewFilter, ViewId, ViewRecord};

/// How a view entered the resolved set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// Matched the filter directly
    TopLevel,

    /// Base of a top-level view via the given relation
    Edge(EdgeSource),
}

impl std::fmt::Display for Origin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TopLevel => write!(f, "top-level"),
            Self::Edge(source) => write!(f, "{}", source),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedView {
    pub record: ViewRecord,
    pub origin: Origin,
}

/// Resolved views, deduplicated by identity and ordered by it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewSet {
    views: BTreeMap<ViewId, ResolvedView>,
}

impl ViewSet {
    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    pub fn contains(&self, id: &ViewId) -> bool {
        self.views.contains_key(id)
    }

    pub fn get(&self, id: &ViewId) -> Option<&ResolvedView> {
        self.views.get(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &ViewId> {
        self.views.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResolvedView> {
        self.views.values()
    }

    pub fn records(&self) -> impl Iterator<Item = &ViewRecord> {
        self.views.values().map(|v| &v.record)
    }

    /// Add a view unless one with the same identity is already present
    ///
    /// Returns whether the view was added.
    fn insert(&mut self, record: ViewRecord, origin: Origin) -> bool {
        if self.views.contains_key(&record.id) {
            return false;
        }
        self.views
            .insert(record.id.clone(), ResolvedView { record, origin });
        true
    }
}

/// Determine the views to analyze
///
/// Catalog calls are made one at a time and any failure aborts resolution.
pub async fn resolve<C>(catalog: &C, filter: &ViewFilter, recursive: bool) -> Result<ViewSet, CatalogError>
where
    C: CatalogAdapter + ?Sized,
{
    let mut set = ViewSet::default();

    for record in catalog.find_views(filter).await? {
        if record.kind().is_none() {
            tracing::debug!(object = %record.id, suffix = %record.id.object_suffix, "Ignoring non-view object");
            continue;
        }
        tracing::debug!(view = %record.id, "Resolved top-level view");
        set.insert(record, Origin::TopLevel);
    }

    if !recursive {
        return Ok(set);
    }

    let top_level: Vec<ViewId> = set.ids().cloned().collect();
    for id in &top_level {
        for source in [EdgeSource::Dependency, EdgeSource::CrossReference] {
            for base in catalog.edges(source, id).await? {
                if base.kind().is_none() {
                    continue;
                }
                let base_id = base.id.clone();
                if set.insert(base, Origin::Edge(source)) {
                    tracing::debug!(view = %base_id, dependent = %id, via = %source, "Resolved base view");
                }
            }
        }
    }

    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use viewlineage_catalog::InMemoryCatalogBuilder;

    fn view(name: &str) -> ViewId {
        ViewId::new("pkg", name, "calculationview")
    }

    fn record(name: &str) -> ViewRecord {
        ViewRecord::new(view(name), "<scenario/>")
    }

    fn names(set: &ViewSet) -> Vec<&str> {
        set.ids().map(|id| id.object_name.as_str()).collect()
    }

    #[tokio::test]
    async fn expansion_is_single_hop() {
        let catalog = InMemoryCatalogBuilder::new()
            .with_view(record("A"))
            .with_view(record("B"))
            .with_view(record("C"))
            .with_dependency(view("A"), view("B"))
            .with_dependency(view("B"), view("C"))
            .build();
        let filter = ViewFilter::new("pkg", "A", "*");

        let flat = resolve(&catalog, &filter, false).await.unwrap();
        assert_eq!(names(&flat), vec!["A"]);

        let expanded = resolve(&catalog, &filter, true).await.unwrap();
        assert_eq!(names(&expanded), vec!["A", "B"]);
        assert_eq!(
            expanded.get(&view("B")).map(|v| v.origin),
            Some(Origin::Edge(EdgeSource::Dependency))
        );
    }

    #[tokio::test]
    async fn both_relations_are_consulted_and_deduplicated() {
        let catalog = InMemoryCatalogBuilder::new()
            .with_view(record("A"))
            .with_view(record("B"))
            .with_view(record("X"))
            .with_dependency(view("A"), view("B"))
            .with_cross_reference(view("A"), view("B"))
            .with_cross_reference(view("A"), view("X"))
            .build();

        let set = resolve(&catalog, &ViewFilter::new("*", "A", "*"), true).await.unwrap();
        assert_eq!(names(&set), vec!["A", "B", "X"]);
        assert_eq!(
            set.get(&view("X")).map(|v| v.origin),
            Some(Origin::Edge(EdgeSource::CrossReference))
        );
    }

    #[tokio::test]
    async fn top_level_origin_wins() {
        let catalog = InMemoryCatalogBuilder::new()
            .with_view(record("A"))
            .with_view(record("B"))
            .with_dependency(view("A"), view("B"))
            .build();

        let set = resolve(&catalog, &ViewFilter::default(), true).await.unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set.get(&view("B")).map(|v| v.origin), Some(Origin::TopLevel));
    }

    #[tokio::test]
    async fn unsupported_objects_are_dropped() {
        let proc_id = ViewId::new("pkg", "P", "procedure");
        let catalog = InMemoryCatalogBuilder::new()
            .with_view(record("A"))
            .with_view(ViewRecord::new(proc_id.clone(), ""))
            .with_dependency(view("A"), proc_id.clone())
            .build();

        let set = resolve(&catalog, &ViewFilter::default(), true).await.unwrap();
        assert_eq!(names(&set), vec!["A"]);
        assert!(!set.contains(&proc_id));
    }

    #[tokio::test]
    async fn catalog_errors_propagate() {
        let catalog = InMemoryCatalogBuilder::new()
            .with_view(record("A"))
            .with_error(view("A"), CatalogError::QueryError("relation missing".to_string()))
            .build();

        assert!(resolve(&catalog, &ViewFilter::default(), false).await.is_ok());
        let err = resolve(&catalog, &ViewFilter::default(), true).await.unwrap_err();
        assert_eq!(err, CatalogError::QueryError("relation missing".to_string()));
    }
}
