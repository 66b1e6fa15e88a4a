//! Parent-indexed view over a parsed node sequence
//!
//! Built once per parse so that child lookups do not rescan the whole
//! sequence.

use crate::node::{DomNode, NodeId, NodeType, ROOT_ID};

/// A node sequence plus a `parent -> children` index
#[derive(Debug, Clone)]
pub struct NodeTable {
    nodes: Vec<DomNode>,
    children: Vec<Vec<NodeId>>,
}

/// A violated node table invariant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Node {node_id}: {message}")]
pub struct InvariantError {
    pub node_id: NodeId,
    pub message: String,
}

impl NodeTable {
    /// Index a node sequence produced by the parser
    pub fn new(nodes: Vec<DomNode>) -> Self {
        let mut children = vec![Vec::new(); nodes.len()];
        for node in &nodes {
            if let Some(parent) = node.parent_node_id {
                if let Some(siblings) = children.get_mut(parent) {
                    siblings.push(node.node_id);
                }
            }
        }
        Self { nodes, children }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in emission order
    pub fn nodes(&self) -> &[DomNode] {
        &self.nodes
    }

    pub fn get(&self, id: NodeId) -> Option<&DomNode> {
        self.nodes.get(id)
    }

    pub fn root(&self) -> Option<&DomNode> {
        self.get(ROOT_ID)
    }

    pub fn parent(&self, id: NodeId) -> Option<&DomNode> {
        self.get(id)?.parent_node_id.and_then(|p| self.get(p))
    }

    /// Direct children of a node, attributes included, in document order
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &DomNode> + '_ {
        self.children
            .get(id)
            .into_iter()
            .flatten()
            .filter_map(move |&child| self.nodes.get(child))
    }

    /// Attribute nodes of an element
    pub fn attributes(&self, id: NodeId) -> impl Iterator<Item = &DomNode> + '_ {
        self.children(id).filter(|n| n.is_attribute())
    }

    /// Value of the named attribute of an element
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attributes(id)
            .find(|n| n.node_name == name)
            .map(DomNode::value)
    }

    /// Child elements with the given name
    pub fn child_elements<'a>(&'a self, id: NodeId, name: &'a str) -> impl Iterator<Item = &'a DomNode> + 'a {
        self.children(id)
            .filter(move |n| n.is_element() && n.node_name == name)
    }

    /// Every element with the given name, in document order
    pub fn elements_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a DomNode> + 'a {
        self.nodes
            .iter()
            .filter(move |n| n.is_element() && n.node_name == name)
    }

    /// Every attribute with the given name, in document order
    pub fn attributes_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a DomNode> + 'a {
        self.nodes
            .iter()
            .filter(move |n| n.is_attribute() && n.node_name == name)
    }

    /// Concatenated text and CDATA content below a node
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        for child in self.children(id) {
            match child.node_type {
                NodeType::Text | NodeType::CData => out.push_str(child.value()),
                NodeType::Element => self.collect_text(child.node_id, out),
                _ => {}
            }
        }
    }

    /// Check the structural invariants of the node sequence
    ///
    /// - ids equal positions and the root is the only parentless node
    /// - every parent was emitted earlier and is the document or an element
    /// - attributes directly follow their element, before any other child
    pub fn validate(&self) -> Result<(), InvariantError> {
        let fail = |node_id: NodeId, message: &str| InvariantError {
            node_id,
            message: message.to_string(),
        };

        let root = self.root().ok_or_else(|| fail(ROOT_ID, "missing document root"))?;
        if root.node_type != NodeType::Document || root.parent_node_id.is_some() {
            return Err(fail(ROOT_ID, "root must be a parentless document node"));
        }

        for (index, node) in self.nodes.iter().enumerate().skip(1) {
            if node.node_id != index {
                return Err(fail(index, "node id does not match its position"));
            }

            let parent_id = node
                .parent_node_id
                .ok_or_else(|| fail(index, "non-root node without parent"))?;
            if parent_id >= index {
                return Err(fail(index, "parent emitted after child"));
            }

            let parent = &self.nodes[parent_id];
            if !matches!(parent.node_type, NodeType::Document | NodeType::Element) {
                return Err(fail(index, "parent is neither document nor element"));
            }

            if node.is_attribute() {
                if !parent.is_element() {
                    return Err(fail(index, "attribute parent is not an element"));
                }
                let contiguous = self.nodes[parent_id + 1..index]
                    .iter()
                    .all(|n| n.is_attribute() && n.parent_node_id == Some(parent_id));
                if !contiguous {
                    return Err(fail(index, "attribute does not directly follow its element"));
                }
            }
        }

        Ok(())
    }
}
