//! View identity, view kinds and base column references

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of information view stored in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ViewKind {
    /// Analytic view (star schema over a fact table)
    #[serde(rename = "analyticview")]
    AnalyticView,

    /// Attribute view (dimension)
    #[serde(rename = "attributeview")]
    AttributeView,

    /// Calculation view (graphical or scripted)
    #[serde(rename = "calculationview")]
    CalculationView,
}

impl ViewKind {
    /// All supported view kinds
    pub const ALL: [ViewKind; 3] = [Self::AnalyticView, Self::AttributeView, Self::CalculationView];

    /// Repository object suffix for this kind
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::AnalyticView => "analyticview",
            Self::AttributeView => "attributeview",
            Self::CalculationView => "calculationview",
        }
    }

    /// Parse an object suffix, returning `None` for objects that are not views
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        let suffix = suffix.to_ascii_lowercase().replace('-', "");
        Self::ALL.into_iter().find(|kind| kind.suffix() == suffix)
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.suffix())
    }
}

/// Identifies a repository object by package, name and suffix
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ViewId {
    /// Package path (e.g. `sales.reporting`)
    #[serde(alias = "PACKAGE_ID")]
    pub package_id: String,

    /// Object name within the package
    #[serde(alias = "OBJECT_NAME")]
    pub object_name: String,

    /// Object suffix (`analyticview`, `attributeview`, `calculationview`, ...)
    #[serde(alias = "OBJECT_SUFFIX")]
    pub object_suffix: String,
}

impl ViewId {
    /// Create a new view identifier
    pub fn new(
        package_id: impl Into<String>,
        object_name: impl Into<String>,
        object_suffix: impl Into<String>,
    ) -> Self {
        Self {
            package_id: package_id.into(),
            object_name: object_name.into(),
            object_suffix: object_suffix.into(),
        }
    }

    /// View kind, if the suffix names a supported view
    pub fn kind(&self) -> Option<ViewKind> {
        ViewKind::from_suffix(&self.object_suffix)
    }

    /// `package/object` form used in lineage output
    pub fn qualified_name(&self) -> String {
        format!("{}/{}", self.package_id, self.object_name)
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.qualified_name())
    }
}

/// A view as stored in the catalog: identity plus raw XML definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewRecord {
    /// View identity
    #[serde(flatten)]
    pub id: ViewId,

    /// Raw XML view definition
    #[serde(alias = "CDATA", default)]
    pub cdata: String,
}

impl ViewRecord {
    /// Create a new view record
    pub fn new(id: ViewId, cdata: impl Into<String>) -> Self {
        Self {
            id,
            cdata: cdata.into(),
        }
    }

    /// View kind, if supported
    pub fn kind(&self) -> Option<ViewKind> {
        self.id.kind()
    }
}

/// A physical base table column
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ColumnRef {
    /// Database schema of the base table
    pub schema_name: String,

    /// Base table name
    pub table_name: String,

    /// Column name
    pub column_name: String,
}

impl ColumnRef {
    /// Create a new column reference
    pub fn new(
        schema_name: impl Into<String>,
        table_name: impl Into<String>,
        column_name: impl Into<String>,
    ) -> Self {
        Self {
            schema_name: schema_name.into(),
            table_name: table_name.into(),
            column_name: column_name.into(),
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\".\"{}\".\"{}\"", self.schema_name, self.table_name, self.column_name)
    }
}
