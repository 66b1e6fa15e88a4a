//! DOM-like node records emitted by the parser

use serde::{Deserialize, Serialize};
use std::fmt;

/// Node identifier: index of the node in emission order
pub type NodeId = usize;

/// Id of the synthetic document root
pub const ROOT_ID: NodeId = 0;

/// DOM node types
///
/// `EntityReference`, `Entity`, `DocumentFragment` and `Notation` complete
/// the DOM enumeration but are never produced by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Element,
    Attribute,
    Text,
    CData,
    EntityReference,
    Entity,
    ProcessingInstruction,
    Comment,
    Document,
    DocumentType,
    DocumentFragment,
    Notation,
}

impl NodeType {
    /// W3C DOM `nodeType` constant
    pub fn dom_code(&self) -> u8 {
        match self {
            Self::Element => 1,
            Self::Attribute => 2,
            Self::Text => 3,
            Self::CData => 4,
            Self::EntityReference => 5,
            Self::Entity => 6,
            Self::ProcessingInstruction => 7,
            Self::Comment => 8,
            Self::Document => 9,
            Self::DocumentType => 10,
            Self::DocumentFragment => 11,
            Self::Notation => 12,
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Element => "element",
            Self::Attribute => "attribute",
            Self::Text => "text",
            Self::CData => "cdata",
            Self::EntityReference => "entity-reference",
            Self::Entity => "entity",
            Self::ProcessingInstruction => "processing-instruction",
            Self::Comment => "comment",
            Self::Document => "document",
            Self::DocumentType => "document-type",
            Self::DocumentFragment => "document-fragment",
            Self::Notation => "notation",
        };
        write!(f, "{}", name)
    }
}

/// One node of a parsed document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomNode {
    /// Position in emission order (0 is the document root)
    pub node_id: NodeId,

    /// Parent node, `None` only for the root
    pub parent_node_id: Option<NodeId>,

    pub node_type: NodeType,

    /// Tag, attribute, PI target or doctype name; `#text`, `#comment` or
    /// `#document` for the rest
    pub node_name: String,

    /// Decoded value for text-like nodes and attributes
    pub node_value: Option<String>,

    /// Raw matched source text
    pub token_text: String,

    /// 1-based character offset of `token_text` in the source
    pub pos: usize,

    /// Length of `token_text` in characters
    pub len: usize,
}

impl DomNode {
    /// The synthetic document root
    pub fn document() -> Self {
        Self {
            node_id: ROOT_ID,
            parent_node_id: None,
            node_type: NodeType::Document,
            node_name: "#document".to_string(),
            node_value: None,
            token_text: String::new(),
            pos: 1,
            len: 0,
        }
    }

    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }

    pub fn is_attribute(&self) -> bool {
        self.node_type == NodeType::Attribute
    }

    /// Value as a string slice, empty when absent
    pub fn value(&self) -> &str {
        self.node_value.as_deref().unwrap_or("")
    }
}
