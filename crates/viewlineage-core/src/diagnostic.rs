//! Diagnostic codes and error reporting
//!
//! IMPORTANT: Diagnostic codes are versioned and stable.
//! NEVER rename or remove codes - they are part of the public API.
//! Add new codes with new names only.

use serde::{Deserialize, Serialize};

/// Diagnostic code registry (v1)
///
/// These codes are STABLE and VERSIONED.
/// Do NOT rename or remove codes - only add new ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticCode {
    // XML parsing (1xxx)
    /// No token alternative matches at the current offset
    XmlTokenizationError,

    /// An element's attribute list does not tokenize into attributes
    XmlMalformedAttributes,

    /// An entity reference is not one of the predefined or numeric forms
    XmlUnknownEntity,

    /// An end tag does not close the innermost open element
    XmlMismatchedEndTag,

    /// An end tag appears with no element open
    XmlUnexpectedEndTag,

    /// The document ends while elements are still open
    XmlUnclosedElement,

    // Catalog access (2xxx)
    /// Reading views or dependency edges from the catalog failed
    CatalogReadError,

    // Lineage extraction (3xxx)
    /// A view was parsed but references no base table columns
    ViewNoBaseColumns,
}

impl DiagnosticCode {
    /// Get the diagnostic code as a stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::XmlTokenizationError => "XML_TOKENIZATION_ERROR",
            Self::XmlMalformedAttributes => "XML_MALFORMED_ATTRIBUTES",
            Self::XmlUnknownEntity => "XML_UNKNOWN_ENTITY",
            Self::XmlMismatchedEndTag => "XML_MISMATCHED_END_TAG",
            Self::XmlUnexpectedEndTag => "XML_UNEXPECTED_END_TAG",
            Self::XmlUnclosedElement => "XML_UNCLOSED_ELEMENT",
            Self::CatalogReadError => "CATALOG_READ_ERROR",
            Self::ViewNoBaseColumns => "VIEW_NO_BASE_COLUMNS",
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message
    Info,

    /// Warning - should be reviewed but not blocking
    Warn,

    /// Error - blocking issue
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Location inside a view definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// View identifier (`package/object`)
    pub file: String,

    /// Optional line number (1-indexed)
    pub line: Option<usize>,

    /// Optional column number (1-indexed)
    pub column: Option<usize>,

    /// Optional character offset into the definition (1-indexed)
    pub offset: Option<usize>,
}

impl Location {
    /// Create a new location with just a view identifier
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line: None,
            column: None,
            offset: None,
        }
    }

    /// Create a location pointing at a character offset in `text`
    ///
    /// Line and column are derived from the offset. Offsets past the end of
    /// the text are clamped to the last position.
    pub fn at_offset(file: impl Into<String>, text: &str, offset: usize) -> Self {
        let mut line = 1;
        let mut column = 1;
        for ch in text.chars().take(offset.saturating_sub(1)) {
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }

        Self {
            file: file.into(),
            line: Some(line),
            column: Some(column),
            offset: Some(offset),
        }
    }
}

/// A diagnostic message with structured metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable diagnostic code
    pub code: DiagnosticCode,

    /// Severity level
    pub severity: Severity,

    /// Human-readable message
    pub message: String,

    /// Source location (best-effort)
    pub location: Option<Location>,

    /// Name of the node being processed when the issue was found
    pub node_name: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic with minimal fields
    pub fn new(code: DiagnosticCode, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            code,
            severity,
            message: message.into(),
            location: None,
            node_name: None,
        }
    }

    /// Set the location
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Set the node name
    pub fn with_node_name(mut self, node_name: impl Into<String>) -> Self {
        self.node_name = Some(node_name.into());
        self
    }
}
