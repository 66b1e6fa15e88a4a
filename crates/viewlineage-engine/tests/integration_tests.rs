//! End-to-end lineage tests over an in-memory catalog
//!
//! ```bash
//! cargo test -p viewlineage-engine --test integration_tests
//! ```

mod fixtures;

use fixtures::*;
use pretty_assertions::assert_eq;
use viewlineage_catalog::{CatalogError, InMemoryCatalog};
use viewlineage_core::{ColumnFilter, ColumnRef, Strictness, ViewFilter, ViewId, ViewRecord};
use viewlineage_engine::{run, LineageError, LineageOptions, LineageSet};

fn row_keys(lineage: &LineageSet) -> Vec<(String, String)> {
    lineage
        .rows()
        .into_iter()
        .map(|r| {
            (
                format!("{}.{}.{}", r.schema_name, r.table_name, r.column_name),
                r.views,
            )
        })
        .collect()
}

fn pair(column: &str, views: &str) -> (String, String) {
    (column.to_string(), views.to_string())
}

#[tokio::test]
async fn test_attribute_view_key_mapping() {
    let xml = r#"<dimension id="viewname"><attribute id="C"><keyMapping schemaName="S" columnObjectName="T" columnName="C"/></attribute></dimension>"#;
    let catalog = InMemoryCatalog::new();
    catalog
        .add_view(ViewRecord::new(ViewId::new("pkg", "viewname", "attributeview"), xml))
        .await;

    let result = run(&catalog, &ViewFilter::default(), &LineageOptions::default())
        .await
        .unwrap();

    assert_eq!(row_keys(&result.lineage), vec![pair("S.T.C", "pkg/viewname")]);
    assert!(!result.has_failures());
}

#[tokio::test]
async fn test_calculation_view_lineage() {
    let catalog = sales_catalog();
    let filter = ViewFilter::new("sales.reporting", "CV_ORDERS", "*");

    let result = run(&catalog, &filter, &LineageOptions::default()).await.unwrap();

    assert_eq!(result.views, vec![orders_cv()]);
    assert_eq!(
        row_keys(&result.lineage),
        vec![
            pair("ERP.VBAK.ERDAT", "sales.reporting/CV_ORDERS"),
            pair("ERP.VBAK.KUNNR", "sales.reporting/CV_ORDERS"),
            pair("ERP.VBAK.VBELN", "sales.reporting/CV_ORDERS"),
        ]
    );
}

#[tokio::test]
async fn test_recursive_run_aggregates_across_views() {
    let catalog = sales_catalog();
    let filter = ViewFilter::new("sales.reporting", "CV_ORDERS", "*");
    let options = LineageOptions {
        recursive: true,
        ..LineageOptions::default()
    };

    let result = run(&catalog, &filter, &options).await.unwrap();

    assert_eq!(result.views.len(), 3);
    assert_eq!(
        row_keys(&result.lineage),
        vec![
            pair("ERP.KNA1.KUNNR", "sales.master/AT_CUSTOMER, sales.reporting/AN_REVENUE"),
            pair("ERP.KNA1.NAME1", "sales.master/AT_CUSTOMER"),
            pair("ERP.VBAK.ERDAT", "sales.reporting/CV_ORDERS"),
            pair("ERP.VBAK.KUNNR", "sales.reporting/CV_ORDERS"),
            pair("ERP.VBAK.VBELN", "sales.reporting/CV_ORDERS"),
            pair("ERP.VBAP.NETWR", "sales.reporting/AN_REVENUE"),
            pair("ERP.VBAP.VBELN", "sales.reporting/AN_REVENUE"),
        ]
    );
}

#[tokio::test]
async fn test_lenient_run_reports_broken_view() {
    let catalog = sales_catalog();
    let filter = ViewFilter::new("sales.reporting", "CV_*", "calculationview");

    let result = run(&catalog, &filter, &LineageOptions::default()).await.unwrap();

    assert_eq!(result.views, vec![broken_cv(), orders_cv()]);
    assert_eq!(result.lineage.len(), 3);
    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].view, broken_cv());
    assert_eq!(result.failures[0].error.offset, 64);

    let report = result.into_report(&ColumnFilter::default());
    assert!(report.has_errors());
    let location = report.diagnostics[0].location.clone().unwrap();
    assert_eq!(location.file, "sales.reporting/CV_BROKEN");
    assert_eq!(location.line, Some(2));
    assert_eq!(location.column, Some(26));
}

#[tokio::test]
async fn test_strict_run_aborts() {
    let catalog = sales_catalog();
    let filter = ViewFilter::new("sales.reporting", "CV_*", "calculationview");
    let options = LineageOptions {
        strictness: Strictness::Strict,
        ..LineageOptions::default()
    };

    let err = run(&catalog, &filter, &options).await.unwrap_err();
    assert!(matches!(err, LineageError::ViewParse { ref view, .. } if *view == broken_cv()));
    assert!(err.to_string().contains("sales.reporting/CV_BROKEN"));
}

#[tokio::test]
async fn test_catalog_failure_aborts() {
    let catalog = sales_catalog()
        .with_query_error(CatalogError::ConnectionError("socket closed".to_string()));

    let err = run(&catalog, &ViewFilter::default(), &LineageOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, LineageError::Catalog(CatalogError::ConnectionError(_))));
}

#[tokio::test]
async fn test_no_matching_views() {
    let catalog = sales_catalog();
    let filter = ViewFilter::new("finance*", "*", "*");

    let result = run(&catalog, &filter, &LineageOptions::default()).await.unwrap();
    assert!(result.views.is_empty());
    assert!(result.lineage.is_empty());
    assert!(!result.has_failures());
}

#[tokio::test]
async fn test_report_applies_column_filter() {
    let catalog = sales_catalog();
    let options = LineageOptions {
        recursive: true,
        ..LineageOptions::default()
    };
    let result = run(&catalog, &ViewFilter::new("*", "CV_ORDERS", "*"), &options)
        .await
        .unwrap();

    let kunnr = ColumnRef::new("ERP", "KNA1", "KUNNR");
    assert_eq!(result.lineage.views_for(&kunnr).map(|v| v.len()), Some(2));

    let report = result.into_report(&ColumnFilter::new("ERP", "VBA%", "*"));
    let tables: Vec<&str> = report.rows.iter().map(|r| r.table_name.as_str()).collect();
    assert_eq!(tables, vec!["VBAK", "VBAK", "VBAK", "VBAP", "VBAP"]);
    assert_eq!(report.summary.columns, 5);
    assert_eq!(report.summary.views_analyzed, 3);
}

#[tokio::test]
async fn test_trait_object_catalog() {
    let catalog: Box<dyn viewlineage_catalog::CatalogAdapter> = Box::new(sales_catalog());
    let result = run(catalog.as_ref(), &ViewFilter::new("*", "AT_*", "*"), &LineageOptions::default())
        .await
        .unwrap();
    assert_eq!(result.lineage.len(), 2);
}
