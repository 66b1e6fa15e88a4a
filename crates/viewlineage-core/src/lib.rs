//! ViewLineage Core
//!
//! Core domain model with stable, versioned types.
//! Never rename diagnostic codes - they are part of the public API.

pub mod diagnostic;
pub mod view;
pub mod pattern;
pub mod report;
pub mod config;

pub use diagnostic::{Diagnostic, DiagnosticCode, Severity, Location};
pub use view::{ViewId, ViewKind, ViewRecord, ColumnRef};
pub use pattern::{Pattern, ViewFilter, ColumnFilter};
pub use report::{LineageReport, ReportRow, ReportSummary, ReportVersion};
pub use config::{Config, ConfigError, Strictness, OutputFormat, CatalogConfig, ExtractionConfig, OutputConfig};
