//! Regex-driven XML tokenizer producing a flat, parent-linked node table
//!
//! View definitions are parsed into a pre-order sequence of [`DomNode`]s
//! rooted at a synthetic document node (id 0). [`NodeTable`] indexes the
//! sequence by parent so structural queries stay close to linear.
//!
//! ## Example
//!
//! ```rust
//! use viewlineage_xml::{parse, NodeTable, NodeType};
//!
//! let nodes = parse(r#"<a x="1"><b/>text</a>"#).unwrap();
//! let table = NodeTable::new(nodes);
//! let a = table.elements_named("a").next().unwrap();
//! assert_eq!(table.attribute(a.node_id, "x"), Some("1"));
//! assert_eq!(table.children(a.node_id).filter(|n| n.node_type == NodeType::Text).count(), 1);
//! ```

pub mod entity;
pub mod error;
pub mod node;
pub mod parser;
pub mod table;

pub use entity::{decode, EntityError};
pub use error::{ParseError, ParseErrorRecord};
pub use node::{DomNode, NodeId, NodeType, ROOT_ID};
pub use parser::{parse, parse_with_options, ParseOptions};
pub use table::{InvariantError, NodeTable};
