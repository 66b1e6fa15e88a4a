//! Base column extraction from view definitions
//!
//! Analytic and attribute views name their base columns directly on
//! `keyMapping` and `measureMapping` elements. Calculation views declare
//! base-table data sources by id and refer to them from input mappings and
//! `columnObjectName`/`columnName` pairs.

use std::collections::{BTreeMap, BTreeSet};
use viewlineage_core::{ColumnRef, ViewKind, ViewRecord};
use viewlineage_xml::{parse_with_options, NodeTable, ParseError, ParseOptions};

/// Elements that carry a full `schemaName`/`columnObjectName`/`columnName` triple
const MAPPING_ELEMENTS: [&str; 2] = ["keyMapping", "measureMapping"];

/// `DataSource` type of a physical table
const DATA_BASE_TABLE: &str = "DATA_BASE_TABLE";

/// Parse a view definition and recover the base columns it references
///
/// Records whose suffix is not a supported view kind yield no columns.
pub fn extract(record: &ViewRecord, options: ParseOptions) -> Result<BTreeSet<ColumnRef>, ParseError> {
    let Some(kind) = record.kind() else {
        tracing::debug!(view = %record.id, suffix = %record.id.object_suffix, "Skipping unsupported object");
        return Ok(BTreeSet::new());
    };

    let table = NodeTable::new(parse_with_options(&record.cdata, options)?);
    tracing::debug!(view = %record.id, kind = %kind, nodes = table.len(), "Parsed view definition");

    Ok(extract_from_table(kind, &table))
}

/// Recover base columns from an already parsed definition
pub fn extract_from_table(kind: ViewKind, table: &NodeTable) -> BTreeSet<ColumnRef> {
    match kind {
        ViewKind::AnalyticView | ViewKind::AttributeView => mapping_columns(table),
        ViewKind::CalculationView => calculation_columns(table),
    }
}

fn mapping_columns(table: &NodeTable) -> BTreeSet<ColumnRef> {
    table
        .nodes()
        .iter()
        .filter(|n| n.is_element() && MAPPING_ELEMENTS.contains(&n.node_name.as_str()))
        .filter_map(|n| {
            Some(ColumnRef::new(
                table.attribute(n.node_id, "schemaName")?,
                table.attribute(n.node_id, "columnObjectName")?,
                table.attribute(n.node_id, "columnName")?,
            ))
        })
        .collect()
}

/// A `DATA_BASE_TABLE` data source of a calculation view
#[derive(Debug, Clone, Copy)]
struct BaseTable<'a> {
    schema: &'a str,
    table: &'a str,
}

impl BaseTable<'_> {
    fn column(&self, column: &str) -> ColumnRef {
        ColumnRef::new(self.schema, self.table, column)
    }
}

/// Base-table data sources keyed by their `id`
fn base_tables(table: &NodeTable) -> BTreeMap<&str, BaseTable<'_>> {
    let mut sources = BTreeMap::new();

    for ds in table.elements_named("DataSource") {
        if table.attribute(ds.node_id, "type") != Some(DATA_BASE_TABLE) {
            continue;
        }
        let Some(id) = table.attribute(ds.node_id, "id") else {
            continue;
        };

        let base = table
            .child_elements(ds.node_id, "columnObject")
            .find_map(|obj| {
                Some(BaseTable {
                    schema: table.attribute(obj.node_id, "schemaName")?,
                    table: table.attribute(obj.node_id, "columnObjectName")?,
                })
            });

        if let Some(base) = base {
            sources.insert(id, base);
        }
    }

    sources
}

fn calculation_columns(table: &NodeTable) -> BTreeSet<ColumnRef> {
    let sources = base_tables(table);
    let mut columns = BTreeSet::new();
    if sources.is_empty() {
        return columns;
    }

    // <input node="#ID"><mapping source="COL"/></input>
    for node_ref in table.attributes_named("node") {
        let Some(base) = node_ref
            .value()
            .strip_prefix('#')
            .and_then(|id| sources.get(id))
        else {
            continue;
        };
        let Some(owner) = node_ref.parent_node_id else {
            continue;
        };

        if let Some(source) = table.attribute(owner, "source") {
            columns.insert(base.column(source));
        }
        for mapping in table.child_elements(owner, "mapping") {
            if let Some(source) = table.attribute(mapping.node_id, "source") {
                columns.insert(base.column(source));
            }
        }
    }

    // <... columnObjectName="ID" columnName="COL"/>
    for object_ref in table.attributes_named("columnObjectName") {
        let Some(base) = sources.get(object_ref.value()) else {
            continue;
        };
        let Some(owner) = object_ref.parent_node_id else {
            continue;
        };

        if let Some(column) = table.attribute(owner, "columnName") {
            columns.insert(base.column(column));
        }
    }

    columns
}
