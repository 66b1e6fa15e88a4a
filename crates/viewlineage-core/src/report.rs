//! Lineage report schema (stable v1)
//!
//! This schema is STABLE and VERSIONED.
//! Breaking changes require a new version.

use serde::{Deserialize, Serialize};
use crate::diagnostic::{Diagnostic, Severity};

/// Report schema version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportVersion {
    /// Major version (breaking changes)
    pub major: u32,

    /// Minor version (backward-compatible additions)
    pub minor: u32,
}

impl ReportVersion {
    /// Current report schema version
    pub const CURRENT: ReportVersion = ReportVersion { major: 1, minor: 0 };
}

impl std::fmt::Display for ReportVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// One base column and the views referencing it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    pub schema_name: String,
    pub table_name: String,
    pub column_name: String,

    /// Sorted, `", "`-joined list of `package/object` identifiers
    pub views: String,
}

/// Summary statistics for a report
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Number of views whose definitions were analyzed
    pub views_analyzed: usize,

    /// Number of views whose definitions failed to parse
    pub views_failed: usize,

    /// Number of distinct base columns found
    pub columns: usize,

    /// Number of errors
    pub errors: usize,

    /// Number of warnings
    pub warnings: usize,

    /// Number of info messages
    pub info: usize,
}

/// Lineage report (report.json v1)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineageReport {
    /// Schema version
    pub version: ReportVersion,

    /// Timestamp (RFC 3339)
    pub timestamp: String,

    /// Summary statistics
    pub summary: ReportSummary,

    /// Lineage rows, ordered by schema, table, column
    pub rows: Vec<ReportRow>,

    /// All diagnostics
    pub diagnostics: Vec<Diagnostic>,
}

impl LineageReport {
    /// Create a new empty report
    pub fn new() -> Self {
        Self {
            version: ReportVersion::CURRENT,
            timestamp: chrono::Utc::now().to_rfc3339(),
            summary: ReportSummary::default(),
            rows: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Create a report from rows and diagnostics
    pub fn from_parts(rows: Vec<ReportRow>, diagnostics: Vec<Diagnostic>) -> Self {
        let mut report = Self::new();
        report.summary.columns = rows.len();
        report.rows = rows;
        for diagnostic in diagnostics {
            report.add_diagnostic(diagnostic);
        }
        report
    }

    /// Add a diagnostic to the report
    pub fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Error => self.summary.errors += 1,
            Severity::Warn => self.summary.warnings += 1,
            Severity::Info => self.summary.info += 1,
        }

        self.diagnostics.push(diagnostic);
    }

    /// Check if the report has any errors
    pub fn has_errors(&self) -> bool {
        self.summary.errors > 0
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Save to file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let json = self.to_json()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(path, json)
    }
}

impl Default for LineageReport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::{Diagnostic, DiagnosticCode, Severity};

    fn row(column: &str, views: &str) -> ReportRow {
        ReportRow {
            schema_name: "ERP".to_string(),
            table_name: "VBAK".to_string(),
            column_name: column.to_string(),
            views: views.to_string(),
        }
    }

    #[test]
    fn empty_report() {
        let report = LineageReport::new();
        assert_eq!(report.version, ReportVersion::CURRENT);
        assert_eq!(report.summary.columns, 0);
        assert!(!report.has_errors());
    }

    #[test]
    fn report_with_rows_and_diagnostics() {
        let diagnostics = vec![
            Diagnostic::new(DiagnosticCode::XmlUnknownEntity, Severity::Error, "Unknown entity"),
            Diagnostic::new(DiagnosticCode::ViewNoBaseColumns, Severity::Info, "No columns"),
        ];

        let report = LineageReport::from_parts(vec![row("VBELN", "sales/CV_ORDERS")], diagnostics);
        assert_eq!(report.summary.columns, 1);
        assert_eq!(report.summary.errors, 1);
        assert_eq!(report.summary.info, 1);
        assert!(report.has_errors());
    }

    #[test]
    fn report_serialization() {
        let report = LineageReport::from_parts(vec![row("VBELN", "a/X, b/Y")], Vec::new());
        let json = report.to_json().unwrap();
        assert!(json.contains("\"version\""));
        assert!(json.contains("\"rows\""));
        assert!(json.contains("a/X, b/Y"));
        assert!(!json.contains("metadata"));
    }

    #[test]
    fn save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        let report = LineageReport::from_parts(
            vec![row("VBELN", "sales/CV_ORDERS")],
            vec![Diagnostic::new(DiagnosticCode::ViewNoBaseColumns, Severity::Info, "No columns")],
        );
        report.save_to_file(&path).unwrap();

        let loaded: LineageReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded, report);
    }

    #[test]
    fn save_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let report = LineageReport::new();
        assert!(report.save_to_file(&dir.path().join("missing/report.json")).is_err());
    }
}
