//! Aggregated column lineage

use std::collections::{BTreeMap, BTreeSet};
use viewlineage_core::{ColumnFilter, ColumnRef, ReportRow};

/// Separator between view identifiers in a report row
pub const VIEW_SEPARATOR: &str = ", ";

/// Base columns mapped to the distinct set of views referencing them
///
/// Merging is a set union per column, so it is associative, commutative and
/// idempotent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LineageSet {
    columns: BTreeMap<ColumnRef, BTreeSet<String>>,
}

impl LineageSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `view` references `column`
    pub fn insert(&mut self, column: ColumnRef, view: impl Into<String>) {
        self.columns.entry(column).or_default().insert(view.into());
    }

    /// Record every column referenced by one view
    pub fn insert_view(&mut self, view: &str, columns: impl IntoIterator<Item = ColumnRef>) {
        for column in columns {
            self.insert(column, view);
        }
    }

    /// Union another lineage set into this one
    pub fn merge(&mut self, other: LineageSet) {
        for (column, views) in other.columns {
            self.columns.entry(column).or_default().extend(views);
        }
    }

    /// Number of distinct base columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Views referencing a column
    pub fn views_for(&self, column: &ColumnRef) -> Option<&BTreeSet<String>> {
        self.columns.get(column)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ColumnRef, &BTreeSet<String>)> {
        self.columns.iter()
    }

    /// Keep only the columns matching a filter
    pub fn filter(&self, filter: &ColumnFilter) -> LineageSet {
        Self {
            columns: self
                .columns
                .iter()
                .filter(|(column, _)| filter.matches(column))
                .map(|(column, views)| (column.clone(), views.clone()))
                .collect(),
        }
    }

    /// One row per column, ordered by schema, table and column
    pub fn rows(&self) -> Vec<ReportRow> {
        self.columns
            .iter()
            .map(|(column, views)| ReportRow {
                schema_name: column.schema_name.clone(),
                table_name: column.table_name.clone(),
                column_name: column.column_name.clone(),
                views: views
                    .iter()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(VIEW_SEPARATOR),
            })
            .collect()
    }
}

impl Extend<(ColumnRef, String)> for LineageSet {
    fn extend<I: IntoIterator<Item = (ColumnRef, String)>>(&mut self, iter: I) {
        for (column, view) in iter {
            self.insert(column, view);
        }
    }
}

impl FromIterator<(ColumnRef, String)> for LineageSet {
    fn from_iter<I: IntoIterator<Item = (ColumnRef, String)>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}
