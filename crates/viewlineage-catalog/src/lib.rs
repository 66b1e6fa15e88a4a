//! Metadata catalog access for view lineage
//!
//! The catalog stores view definitions plus two independent edge relations:
//! generic object dependencies and view cross-references. Extraction only
//! reads from it, through the [`CatalogAdapter`] trait.
//!
//! ## Example
//!
//! ```rust,ignore
//! use viewlineage_catalog::{CatalogAdapter, CatalogSnapshot};
//! use viewlineage_core::ViewFilter;
//!
//! let catalog = CatalogSnapshot::from_file("catalog.json".as_ref())?.into_catalog();
//! let views = catalog.find_views(&ViewFilter::new("sales*", "*", "*")).await?;
//! ```

pub mod adapter;
pub mod memory;
pub mod snapshot;

pub use adapter::{CatalogAdapter, CatalogError, DependencyEdge, EdgeSource};
pub use memory::{InMemoryCatalog, InMemoryCatalogBuilder};
pub use snapshot::CatalogSnapshot;
