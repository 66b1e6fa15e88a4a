//! ViewLineage engine - view set resolution and column lineage
//!
//! This crate implements the lineage logic:
//! - View-set resolution over catalog edges
//! - Base column extraction from parsed view definitions
//! - Aggregation of columns to referencing views
//! - The batch pipeline with lenient or strict failure handling

pub mod extractor;
pub mod lineage;
pub mod pipeline;
pub mod resolver;

pub use extractor::{extract, extract_from_table};
pub use lineage::LineageSet;
pub use pipeline::{analyze, run, LineageError, LineageOptions, LineageRun, ViewFailure};
pub use resolver::{resolve, Origin, ResolvedView, ViewSet};
