//! Test fixtures for catalog integration tests
//!
//! A small repository with a three-level view chain, a cross-reference and
//! a non-view object.

use viewlineage_catalog::{InMemoryCatalog, InMemoryCatalogBuilder};
use viewlineage_core::{ViewId, ViewRecord};

pub fn orders_cv() -> ViewId {
    ViewId::new("sales.reporting", "CV_ORDERS", "calculationview")
}

pub fn customer_at() -> ViewId {
    ViewId::new("sales.master", "AT_CUSTOMER", "attributeview")
}

pub fn region_at() -> ViewId {
    ViewId::new("sales.master", "AT_REGION", "attributeview")
}

pub fn revenue_an() -> ViewId {
    ViewId::new("sales.reporting", "AN_REVENUE", "analyticview")
}

pub fn cleanup_proc() -> ViewId {
    ViewId::new("sales.reporting", "CLEANUP", "procedure")
}

/// CV_ORDERS -> AT_CUSTOMER -> AT_REGION by dependency,
/// CV_ORDERS -> AN_REVENUE by cross-reference,
/// CV_ORDERS -> CLEANUP by dependency
pub fn sales_catalog() -> InMemoryCatalog {
    InMemoryCatalogBuilder::new()
        .with_view(ViewRecord::new(orders_cv(), "<Calculation:scenario id=\"CV_ORDERS\"/>"))
        .with_view(ViewRecord::new(customer_at(), "<Dimension:dimension id=\"AT_CUSTOMER\"/>"))
        .with_view(ViewRecord::new(region_at(), "<Dimension:dimension id=\"AT_REGION\"/>"))
        .with_view(ViewRecord::new(revenue_an(), "<Cube:cube id=\"AN_REVENUE\"/>"))
        .with_view(ViewRecord::new(cleanup_proc(), "CREATE PROCEDURE CLEANUP AS BEGIN END"))
        .with_dependency(orders_cv(), customer_at())
        .with_dependency(customer_at(), region_at())
        .with_dependency(orders_cv(), cleanup_proc())
        .with_cross_reference(orders_cv(), revenue_an())
        .build()
}
