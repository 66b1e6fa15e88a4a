//! Parse errors and their structured record form

use serde::{Deserialize, Serialize};
use viewlineage_core::{Diagnostic, DiagnosticCode, Location, Severity};

/// Fatal errors raised while parsing a document
///
/// All offsets are 1-based character offsets into the parsed text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("No XML token matches at offset {offset} near '{context}'")]
    Tokenization { offset: usize, context: String },

    #[error("Malformed attribute list in <{element}> at offset {offset} near '{context}'")]
    MalformedAttributes {
        element: String,
        offset: usize,
        context: String,
    },

    #[error("Unknown entity '{token}' in {node_name} at offset {offset}")]
    UnknownEntity {
        token: String,
        offset: usize,
        node_name: String,
    },

    #[error("End tag </{found}> at offset {offset} does not close <{expected}>")]
    MismatchedEndTag {
        expected: String,
        found: String,
        offset: usize,
    },

    #[error("End tag </{found}> at offset {offset} has no open element")]
    UnexpectedEndTag { found: String, offset: usize },

    #[error("Element <{element}> opened at offset {offset} is never closed")]
    UnclosedElement { element: String, offset: usize },
}

impl ParseError {
    /// Offset of the offending markup
    pub fn offset(&self) -> usize {
        match self {
            Self::Tokenization { offset, .. }
            | Self::MalformedAttributes { offset, .. }
            | Self::UnknownEntity { offset, .. }
            | Self::MismatchedEndTag { offset, .. }
            | Self::UnexpectedEndTag { offset, .. }
            | Self::UnclosedElement { offset, .. } => *offset,
        }
    }

    /// Stable diagnostic code for this error
    pub fn code(&self) -> DiagnosticCode {
        match self {
            Self::Tokenization { .. } => DiagnosticCode::XmlTokenizationError,
            Self::MalformedAttributes { .. } => DiagnosticCode::XmlMalformedAttributes,
            Self::UnknownEntity { .. } => DiagnosticCode::XmlUnknownEntity,
            Self::MismatchedEndTag { .. } => DiagnosticCode::XmlMismatchedEndTag,
            Self::UnexpectedEndTag { .. } => DiagnosticCode::XmlUnexpectedEndTag,
            Self::UnclosedElement { .. } => DiagnosticCode::XmlUnclosedElement,
        }
    }

    /// Name of the node being built when the error occurred, if any
    pub fn node_name(&self) -> Option<&str> {
        match self {
            Self::Tokenization { .. } => None,
            Self::MalformedAttributes { element, .. } | Self::UnclosedElement { element, .. } => {
                Some(element)
            }
            Self::UnknownEntity { node_name, .. } => Some(node_name),
            Self::MismatchedEndTag { found, .. } | Self::UnexpectedEndTag { found, .. } => Some(found),
        }
    }

    /// Convert to a structured error record
    pub fn to_record(&self) -> ParseErrorRecord {
        ParseErrorRecord {
            code: self.code(),
            message: self.to_string(),
            offset: self.offset(),
            node_name: self.node_name().map(str::to_string),
        }
    }

    /// Convert to a diagnostic located in the named view's definition
    pub fn to_diagnostic(&self, view: &str, xml: &str) -> Diagnostic {
        let diagnostic = Diagnostic::new(self.code(), Severity::Error, self.to_string())
            .with_location(Location::at_offset(view, xml, self.offset()));

        match self.node_name() {
            Some(name) => diagnostic.with_node_name(name),
            None => diagnostic,
        }
    }
}

/// Structured record of a parse failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseErrorRecord {
    pub code: DiagnosticCode,
    pub message: String,
    pub offset: usize,
    pub node_name: Option<String>,
}
