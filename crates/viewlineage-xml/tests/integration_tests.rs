//! Integration tests for the XML tokenizer on complete view definitions

use pretty_assertions::assert_eq;
use viewlineage_xml::{
    parse, parse_with_options, DomNode, NodeTable, NodeType, ParseError, ParseErrorRecord, ParseOptions, ROOT_ID,
};

const CALCULATION_VIEW: &str = include_str!("fixtures/calculation_view.xml");

#[test]
fn calculation_view_parses_into_valid_table() {
    let table = NodeTable::new(parse(CALCULATION_VIEW).unwrap());
    assert_eq!(table.validate(), Ok(()));

    let root_children: Vec<NodeType> = table.children(ROOT_ID).map(|n| n.node_type).collect();
    assert_eq!(root_children, vec![NodeType::ProcessingInstruction, NodeType::Element]);

    let scenario = table.elements_named("Calculation:scenario").next().unwrap();
    assert_eq!(table.attribute(scenario.node_id, "id"), Some("CV_SALES_ORDERS"));
    assert_eq!(table.attribute(scenario.node_id, "xmlns:xsi"), Some("http://www.w3.org/2001/XMLSchema-instance"));
}

#[test]
fn data_sources_and_inputs_are_addressable() {
    let table = &NodeTable::new(parse(CALCULATION_VIEW).unwrap());

    let ids: Vec<&str> = table
        .elements_named("DataSource")
        .filter_map(|ds| table.attribute(ds.node_id, "id"))
        .collect();
    assert_eq!(ids, vec!["VBAK", "VBAP"]);

    let sources: Vec<(&str, &str)> = table
        .elements_named("input")
        .flat_map(|input| {
            let node = table.attribute(input.node_id, "node").unwrap_or("");
            table
                .child_elements(input.node_id, "mapping")
                .filter_map(move |m| table.attribute(m.node_id, "source").map(|s| (node, s)))
        })
        .collect();
    assert_eq!(sources, vec![("#VBAK", "VBELN"), ("#VBAP", "NETWR")]);
}

#[test]
fn entities_in_view_definitions_are_decoded() {
    let table = NodeTable::new(parse(CALCULATION_VIEW).unwrap());

    let description = table.elements_named("descriptions").next().unwrap();
    assert_eq!(table.attribute(description.node_id, "defaultDescription"), Some("Sales orders & items"));

    let formula = table.elements_named("formula").next().unwrap();
    assert_eq!(table.text_content(formula.node_id), r#"if("NETWR" > 0, "NETWR", 0)"#);
}

#[test]
fn comments_are_kept_as_nodes() {
    let table = NodeTable::new(parse(CALCULATION_VIEW).unwrap());
    let comment = table.nodes().iter().find(|n| n.node_type == NodeType::Comment).unwrap();
    assert_eq!(comment.value(), " logical model ");
    assert_eq!(table.parent(comment.node_id).map(|n| n.node_name.as_str()), Some("Calculation:scenario"));
}

#[test]
fn element_nesting_follows_stack_discipline() {
    let nodes = parse(CALCULATION_VIEW).unwrap();
    let table = NodeTable::new(nodes.clone());

    // Every element's ancestor chain is strictly decreasing and ends at the root
    for node in &nodes {
        let mut current = node.node_id;
        let mut steps = 0;
        while let Some(parent) = table.get(current).and_then(|n| n.parent_node_id) {
            assert!(parent < current);
            current = parent;
            steps += 1;
            assert!(steps <= nodes.len());
        }
        assert_eq!(current, ROOT_ID);
    }

    let join = table.elements_named("join").next().unwrap();
    let inner: Vec<&str> = table
        .children(join.node_id)
        .filter(|n| n.is_element())
        .map(|n| n.node_name.as_str())
        .collect();
    assert_eq!(inner, vec!["leftElementName", "rightElementName"]);
}

#[test]
fn keeping_whitespace_adds_only_text_nodes() {
    let stripped = parse(CALCULATION_VIEW).unwrap();
    let kept = parse_with_options(CALCULATION_VIEW, ParseOptions { strip_whitespace_text: false }).unwrap();

    assert!(kept.len() > stripped.len());
    let extra = kept.len() - stripped.len();
    let whitespace = kept
        .iter()
        .filter(|n| n.node_type == NodeType::Text && n.value().trim().is_empty())
        .count();
    assert_eq!(extra, whitespace);
    assert_eq!(NodeTable::new(kept).validate(), Ok(()));
}

#[test]
fn provenance_points_back_into_source() {
    let nodes = parse(CALCULATION_VIEW).unwrap();
    let chars: Vec<char> = CALCULATION_VIEW.chars().collect();

    for node in nodes.iter().skip(1) {
        let slice: String = chars[node.pos - 1..node.pos - 1 + node.len].iter().collect();
        assert_eq!(slice, node.token_text, "node {}", node.node_id);
    }
}

#[test]
fn truncated_definition_is_rejected() {
    let truncated = &CALCULATION_VIEW[..CALCULATION_VIEW.len() / 2];
    let err = parse(truncated).unwrap_err();
    assert!(
        matches!(err, ParseError::UnclosedElement { .. } | ParseError::Tokenization { .. }),
        "{err:?}"
    );
}

#[test]
fn node_table_survives_json_export() {
    let nodes = parse(CALCULATION_VIEW).unwrap();
    let json = serde_json::to_string(&nodes).unwrap();
    let reloaded: Vec<DomNode> = serde_json::from_str(&json).unwrap();
    assert_eq!(reloaded, nodes);

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value[0]["node_type"], "document");
    assert_eq!(value[0]["parent_node_id"], serde_json::Value::Null);
    assert_eq!(value[1]["node_type"], "processing_instruction");
}

#[test]
fn parse_error_record_json() {
    let record = parse("<a>x&foo;</a>").unwrap_err().to_record();
    let value = serde_json::to_value(&record).unwrap();

    assert_eq!(value["code"], "XML_UNKNOWN_ENTITY");
    assert_eq!(value["offset"], 5);
    assert_eq!(value["node_name"], "#text");

    let reloaded: ParseErrorRecord = serde_json::from_value(value).unwrap();
    assert_eq!(reloaded, record);
}
