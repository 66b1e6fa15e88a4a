//! Batch lineage pipeline: resolve, parse and extract, aggregate
//!
//! Views are processed one at a time. A view whose definition does not parse
//! either aborts the batch or is recorded as a [`ViewFailure`], depending on
//! [`Strictness`].

use crate::extractor::extract;
use crate::lineage::LineageSet;
use crate::resolver::resolve;
use serde::{Deserialize, Serialize};
use viewlineage_catalog::{CatalogAdapter, CatalogError};
use viewlineage_core::{
    ColumnFilter, Diagnostic, DiagnosticCode, ExtractionConfig, LineageReport, Location, Severity,
    Strictness, ViewFilter, ViewId, ViewRecord,
};
use viewlineage_xml::{ParseError, ParseErrorRecord, ParseOptions};

/// Errors that abort a lineage run
#[derive(Debug, thiserror::Error)]
pub enum LineageError {
    #[error("Catalog read failed: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Failed to parse view {view}: {source}")]
    ViewParse {
        view: ViewId,
        #[source]
        source: ParseError,
    },
}

impl LineageError {
    /// Error diagnostic for an aborted run
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Self::Catalog(e) => e.to_diagnostic(),
            Self::ViewParse { view, source } => {
                let diagnostic = Diagnostic::new(source.code(), Severity::Error, self.to_string())
                    .with_location(Location::new(view.qualified_name()));
                match source.node_name() {
                    Some(name) => diagnostic.with_node_name(name),
                    None => diagnostic,
                }
            }
        }
    }
}

/// A view whose definition failed to parse in a lenient run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewFailure {
    pub view: ViewId,
    pub error: ParseErrorRecord,
}

/// Lineage run settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineageOptions {
    pub strictness: Strictness,
    pub parse: ParseOptions,
    pub recursive: bool,
}

impl From<&ExtractionConfig> for LineageOptions {
    fn from(config: &ExtractionConfig) -> Self {
        Self {
            strictness: config.strictness,
            parse: ParseOptions {
                strip_whitespace_text: config.strip_whitespace_text,
            },
            recursive: config.recursive,
        }
    }
}

/// Outcome of a lineage run that was not aborted
#[derive(Debug, Clone, Default)]
pub struct LineageRun {
    /// Views analyzed, in identity order
    pub views: Vec<ViewId>,

    /// Aggregated lineage over the views that parsed
    pub lineage: LineageSet,

    /// Views that failed to parse
    pub failures: Vec<ViewFailure>,

    pub diagnostics: Vec<Diagnostic>,
}

impl LineageRun {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Build a report, keeping only rows matching `filter`
    pub fn into_report(self, filter: &ColumnFilter) -> LineageReport {
        let rows = self.lineage.filter(filter).rows();
        let mut report = LineageReport::from_parts(rows, self.diagnostics);
        report.summary.views_analyzed = self.views.len();
        report.summary.views_failed = self.failures.len();
        report
    }
}

/// Resolve the view set from the catalog and analyze it
pub async fn run<C>(catalog: &C, filter: &ViewFilter, options: &LineageOptions) -> Result<LineageRun, LineageError>
where
    C: CatalogAdapter + ?Sized,
{
    let views = resolve(catalog, filter, options.recursive).await?;
    tracing::info!(
        catalog = catalog.name(),
        filter = %filter,
        recursive = options.recursive,
        views = views.len(),
        "Resolved view set"
    );

    analyze(views.records(), options)
}

/// Extract and aggregate lineage for already resolved views
pub fn analyze<'a, I>(records: I, options: &LineageOptions) -> Result<LineageRun, LineageError>
where
    I: IntoIterator<Item = &'a ViewRecord>,
{
    let mut run = LineageRun::default();

    for record in records {
        let name = record.id.qualified_name();
        run.views.push(record.id.clone());

        match extract(record, options.parse) {
            Ok(columns) => {
                tracing::debug!(view = %name, columns = columns.len(), "Extracted base columns");
                if columns.is_empty() && record.kind().is_some() {
                    run.diagnostics.push(
                        Diagnostic::new(
                            DiagnosticCode::ViewNoBaseColumns,
                            Severity::Info,
                            format!("View {} references no base table columns", name),
                        )
                        .with_location(Location::new(name.as_str())),
                    );
                }
                run.lineage.insert_view(&name, columns);
            }
            Err(error) => {
                if options.strictness == Strictness::Strict {
                    return Err(LineageError::ViewParse {
                        view: record.id.clone(),
                        source: error,
                    });
                }

                tracing::warn!(view = %name, offset = error.offset(), error = %error, "Skipping view that failed to parse");
                run.diagnostics.push(error.to_diagnostic(&name, &record.cdata));
                run.failures.push(ViewFailure {
                    view: record.id.clone(),
                    error: error.to_record(),
                });
            }
        }
    }

    tracing::info!(
        views = run.views.len(),
        failed = run.failures.len(),
        columns = run.lineage.len(),
        "Lineage extraction complete"
    );

    Ok(run)
}
