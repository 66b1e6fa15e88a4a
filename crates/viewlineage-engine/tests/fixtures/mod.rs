//! Test fixtures for lineage pipeline tests
//!
//! View definitions shaped like repository exports of the three supported
//! view kinds, wired into a small catalog.

#![allow(dead_code)]

use viewlineage_catalog::{InMemoryCatalog, InMemoryCatalogBuilder};
use viewlineage_core::{ViewId, ViewRecord};

pub const CUSTOMER_ATTRIBUTE_VIEW: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Dimension:dimension xmlns:Dimension="http://www.sap.com/ndb/BiModelDimension.ecore" schemaVersion="1.2" id="AT_CUSTOMER" dimensionType="Standard">
  <descriptions defaultDescription="Customer master"/>
  <attributes>
    <attribute id="KUNNR" key="true" order="1">
      <descriptions defaultDescription="Customer"/>
      <keyMapping schemaName="ERP" columnObjectName="KNA1" columnName="KUNNR"/>
    </attribute>
    <attribute id="NAME1" order="2">
      <descriptions defaultDescription="Name &amp; title"/>
      <keyMapping schemaName="ERP" columnObjectName="KNA1" columnName="NAME1"/>
    </attribute>
  </attributes>
  <privateDataFoundation>
    <tableProxies>
      <tableProxy>
        <table schemaName="ERP" columnObjectName="KNA1"/>
      </tableProxy>
    </tableProxies>
  </privateDataFoundation>
</Dimension:dimension>
"#;

pub const REVENUE_ANALYTIC_VIEW: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Cube:cube xmlns:Cube="http://www.sap.com/ndb/BiModelCube.ecore" schemaVersion="1.5" id="AN_REVENUE">
  <privateMeasureGroup id="MeasureGroup">
    <attributes>
      <attribute id="VBELN" order="1">
        <keyMapping schemaName="ERP" columnObjectName="VBAP" columnName="VBELN"/>
      </attribute>
      <attribute id="KUNNR" order="2">
        <keyMapping schemaName="ERP" columnObjectName="KNA1" columnName="KUNNR"/>
      </attribute>
    </attributes>
    <privateDataFoundation>
      <tableProxies>
        <tableProxy centralTable="true">
          <table schemaName="ERP" columnObjectName="VBAP"/>
        </tableProxy>
      </tableProxies>
    </privateDataFoundation>
    <baseMeasures>
      <measure id="NETWR" order="3" aggregationType="sum" measureType="simple">
        <measureMapping schemaName="ERP" columnObjectName="VBAP" columnName="NETWR"/>
      </measure>
    </baseMeasures>
  </privateMeasureGroup>
</Cube:cube>
"#;

pub const ORDERS_CALCULATION_VIEW: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<Calculation:scenario xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xmlns:Calculation="http://www.sap.com/ndb/BiModelCalculation.ecore" id="CV_ORDERS" outputViewType="Aggregation">
  <dataSources>
    <DataSource id="VBAK" type="DATA_BASE_TABLE">
      <viewAttributes allViewAttributes="true"/>
      <columnObject schemaName="ERP" columnObjectName="VBAK"/>
    </DataSource>
    <DataSource id="AT_CUSTOMER" type="ATTRIBUTE_VIEW">
      <resourceUri>/sales.master/attributeviews/AT_CUSTOMER</resourceUri>
    </DataSource>
  </dataSources>
  <calculationViews>
    <calculationView xsi:type="Calculation:JoinView" id="Join_1">
      <input node="#VBAK">
        <mapping xsi:type="Calculation:AttributeMapping" target="VBELN" source="VBELN"/>
        <mapping xsi:type="Calculation:AttributeMapping" target="KUNNR" source="KUNNR"/>
      </input>
      <input node="#AT_CUSTOMER">
        <mapping xsi:type="Calculation:AttributeMapping" target="NAME1" source="NAME1"/>
      </input>
    </calculationView>
  </calculationViews>
  <logicalModel id="Join_1">
    <attributes>
      <attribute id="ERDAT" order="3">
        <keyMapping columnObjectName="VBAK" columnName="ERDAT"/>
      </attribute>
    </attributes>
  </logicalModel>
</Calculation:scenario>
"##;

pub const BROKEN_CALCULATION_VIEW: &str = r#"<Calculation:scenario id="CV_BROKEN">
  <formula>&quot;A&quot; &ne; &quot;B&quot;</formula>
</Calculation:scenario>"#;

pub fn orders_cv() -> ViewId {
    ViewId::new("sales.reporting", "CV_ORDERS", "calculationview")
}

pub fn broken_cv() -> ViewId {
    ViewId::new("sales.reporting", "CV_BROKEN", "calculationview")
}

pub fn customer_at() -> ViewId {
    ViewId::new("sales.master", "AT_CUSTOMER", "attributeview")
}

pub fn revenue_an() -> ViewId {
    ViewId::new("sales.reporting", "AN_REVENUE", "analyticview")
}

/// CV_ORDERS depends on AT_CUSTOMER and cross-references AN_REVENUE
pub fn sales_catalog() -> InMemoryCatalog {
    InMemoryCatalogBuilder::new()
        .with_view(ViewRecord::new(orders_cv(), ORDERS_CALCULATION_VIEW))
        .with_view(ViewRecord::new(broken_cv(), BROKEN_CALCULATION_VIEW))
        .with_view(ViewRecord::new(customer_at(), CUSTOMER_ATTRIBUTE_VIEW))
        .with_view(ViewRecord::new(revenue_an(), REVENUE_ANALYTIC_VIEW))
        .with_dependency(orders_cv(), customer_at())
        .with_cross_reference(orders_cv(), revenue_an())
        .build()
}
