//! Tokenizer and tree builder
//!
//! The document is scanned left to right with a single composite pattern.
//! Every match must start exactly at the cursor; a gap means the input is not
//! well-formed and parsing stops with [`ParseError::Tokenization`].
//!
//! Start tags capture their attribute list loosely and re-tokenize it with a
//! second pattern, so a broken attribute list surfaces as
//! [`ParseError::MalformedAttributes`] with the failing offset rather than as
//! a generic tokenization failure.

use crate::entity::{decode, EntityError};
use crate::error::ParseError;
use crate::node::{DomNode, NodeId, NodeType, ROOT_ID};
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Qualified name: optional `prefix:` with no namespace semantics
const QNAME: &str = r"[A-Za-z_][\w.\-]*(?::[A-Za-z_][\w.\-]*)?";

/// Characters of context reported on each side of a tokenization failure
const CONTEXT_CHARS: usize = 20;

static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    let quoted = r#"(?:"[^"]*"|'[^']*')"#;
    let pattern = [
        format!(r"(?P<pi><\?(?P<pi_target>{QNAME})(?:\s+(?P<pi_data>.*?))?\s*\?>)"),
        r"(?P<comment><!--(?P<comment_text>(?:[^-]|-[^-])*)-->)".to_string(),
        r"(?P<cdata><!\[CDATA\[(?P<cdata_text>.*?)\]\]>)".to_string(),
        format!(
            r"(?P<doctype><!DOCTYPE\s+(?P<doctype_name>{QNAME})(?:\s+(?:SYSTEM\s+{quoted}|PUBLIC\s+{quoted}\s+{quoted}))?\s*>)"
        ),
        format!(
            r#"(?P<start><(?P<start_name>{QNAME})(?P<attrs>(?:[^>"'/]|"[^"]*"|'[^']*'|/[^>])*)(?P<self_closing>/)?>)"#
        ),
        format!(r"(?P<end></(?P<end_name>{QNAME})\s*>)"),
        r"(?P<text>[^<]+)".to_string(),
    ]
    .join("|");

    Regex::new(&format!("(?s){}", pattern)).unwrap()
});

static ATTRIBUTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(
        r#"\s+(?P<name>{QNAME})\s*=\s*(?:"(?P<dq>[^"]*)"|'(?P<sq>[^']*)')"#
    ))
    .unwrap()
});

/// Parser options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Suppress text nodes whose raw text is all whitespace
    pub strip_whitespace_text: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            strip_whitespace_text: true,
        }
    }
}

/// Parse a document with default options
pub fn parse(xml: &str) -> Result<Vec<DomNode>, ParseError> {
    parse_with_options(xml, ParseOptions::default())
}

/// Parse a document into a pre-order node sequence rooted at node 0
pub fn parse_with_options(xml: &str, options: ParseOptions) -> Result<Vec<DomNode>, ParseError> {
    let mut state = ParserState::new();
    let mut cursor = 0;
    let mut char_pos = 1;

    while cursor < xml.len() {
        let id = state.reserve();
        let parent = state.parent();

        let caps = match TOKEN_RE.captures_at(xml, cursor) {
            Some(caps) if caps.get(0).is_some_and(|m| m.start() == cursor) => caps,
            _ => {
                return Err(ParseError::Tokenization {
                    offset: char_pos,
                    context: surrounding(xml, cursor),
                })
            }
        };

        let text = caps.get(0).map_or("", |m| m.as_str());
        let token = Token {
            text,
            pos: char_pos,
            len: text.chars().count(),
        };

        if caps.name("pi").is_some() {
            let target = group(&caps, "pi_target");
            let data = group(&caps, "pi_data").to_string();
            state.emit(token.node(id, parent, NodeType::ProcessingInstruction, target, Some(data)));
        } else if caps.name("comment").is_some() {
            let value = group(&caps, "comment_text").to_string();
            state.emit(token.node(id, parent, NodeType::Comment, "#comment", Some(value)));
        } else if caps.name("cdata").is_some() {
            let value = group(&caps, "cdata_text").to_string();
            state.emit(token.node(id, parent, NodeType::CData, "#text", Some(value)));
        } else if caps.name("doctype").is_some() {
            let name = group(&caps, "doctype_name");
            state.emit(token.node(id, parent, NodeType::DocumentType, name, None));
        } else if caps.name("start").is_some() {
            start_tag(&mut state, id, parent, &caps, &token)?;
        } else if caps.name("end").is_some() {
            state.release();
            state.close(group(&caps, "end_name"), token.pos)?;
        } else {
            text_run(&mut state, id, parent, &token, options)?;
        }

        cursor += token.text.len();
        char_pos += token.len;
    }

    state.finish()
}

/// Mutable state threaded through one parse
struct ParserState {
    next_id: NodeId,
    element_stack: Vec<NodeId>,
    output: Vec<DomNode>,
}

impl ParserState {
    fn new() -> Self {
        Self {
            next_id: ROOT_ID + 1,
            element_stack: vec![ROOT_ID],
            output: vec![DomNode::document()],
        }
    }

    /// Tentatively take the next node id
    fn reserve(&mut self) -> NodeId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Give back the id reserved for a token that emits no node
    fn release(&mut self) {
        self.next_id -= 1;
    }

    /// Current insertion parent
    fn parent(&self) -> NodeId {
        self.element_stack.last().copied().unwrap_or(ROOT_ID)
    }

    fn emit(&mut self, node: DomNode) {
        debug_assert_eq!(node.node_id, self.output.len());
        self.output.push(node);
    }

    /// Pop the innermost open element, checking the end tag names it
    fn close(&mut self, name: &str, offset: usize) -> Result<(), ParseError> {
        if self.element_stack.len() <= 1 {
            return Err(ParseError::UnexpectedEndTag {
                found: name.to_string(),
                offset,
            });
        }

        let open = self.parent();
        let expected = &self.output[open].node_name;
        if expected != name {
            return Err(ParseError::MismatchedEndTag {
                expected: expected.clone(),
                found: name.to_string(),
                offset,
            });
        }

        self.element_stack.pop();
        Ok(())
    }

    fn finish(self) -> Result<Vec<DomNode>, ParseError> {
        if let Some(&open) = self.element_stack.get(1..).and_then(|s| s.last()) {
            let node = &self.output[open];
            return Err(ParseError::UnclosedElement {
                element: node.node_name.clone(),
                offset: node.pos,
            });
        }
        Ok(self.output)
    }
}

/// A matched span of the source
struct Token<'a> {
    text: &'a str,
    pos: usize,
    len: usize,
}

impl Token<'_> {
    fn node(
        &self,
        node_id: NodeId,
        parent: NodeId,
        node_type: NodeType,
        node_name: &str,
        node_value: Option<String>,
    ) -> DomNode {
        DomNode {
            node_id,
            parent_node_id: Some(parent),
            node_type,
            node_name: node_name.to_string(),
            node_value,
            token_text: self.text.to_string(),
            pos: self.pos,
            len: self.len,
        }
    }
}

fn group<'h>(caps: &Captures<'h>, name: &str) -> &'h str {
    caps.name(name).map_or("", |m| m.as_str())
}

fn start_tag(
    state: &mut ParserState,
    id: NodeId,
    parent: NodeId,
    caps: &Captures<'_>,
    token: &Token<'_>,
) -> Result<(), ParseError> {
    let name = group(caps, "start_name");
    state.emit(token.node(id, parent, NodeType::Element, name, None));

    if let (Some(tag), Some(attrs)) = (caps.get(0), caps.name("attrs")) {
        let attrs_pos = token.pos + tag.as_str()[..attrs.start() - tag.start()].chars().count();
        attributes(state, id, name, attrs.as_str(), attrs_pos)?;
    }

    if caps.name("self_closing").is_none() {
        state.element_stack.push(id);
    }
    Ok(())
}

/// Tokenize an attribute list, emitting one Attribute node per match
fn attributes(
    state: &mut ParserState,
    element_id: NodeId,
    element: &str,
    list: &str,
    list_pos: usize,
) -> Result<(), ParseError> {
    let mut at = 0;
    let mut char_at = list_pos;

    while at < list.len() {
        let caps = match ATTRIBUTE_RE.captures_at(list, at) {
            Some(caps) if caps.get(0).is_some_and(|m| m.start() == at) => caps,
            _ => {
                let rest = &list[at..];
                if rest.trim().is_empty() {
                    break;
                }
                let leading = rest.chars().take_while(|c| c.is_whitespace()).count();
                return Err(ParseError::MalformedAttributes {
                    element: element.to_string(),
                    offset: char_at + leading,
                    context: rest.trim().chars().take(CONTEXT_CHARS).collect(),
                });
            }
        };

        let (Some(whole), Some(name)) = (caps.get(0), caps.name("name")) else {
            break;
        };
        let raw = caps.name("dq").or_else(|| caps.name("sq"));
        let raw_value = raw.map_or("", |m| m.as_str());

        let value_pos = raw.map_or(char_at, |m| char_at + list[at..m.start()].chars().count());
        let value = decode(raw_value).map_err(|e| entity_error(e, value_pos, name.as_str()))?;

        let token_text = &list[name.start()..whole.end()];
        let attr_id = state.reserve();
        state.emit(DomNode {
            node_id: attr_id,
            parent_node_id: Some(element_id),
            node_type: NodeType::Attribute,
            node_name: name.as_str().to_string(),
            node_value: Some(value.into_owned()),
            token_text: token_text.to_string(),
            pos: char_at + list[at..name.start()].chars().count(),
            len: token_text.chars().count(),
        });

        char_at += whole.as_str().chars().count();
        at = whole.end();
    }

    Ok(())
}

fn text_run(
    state: &mut ParserState,
    id: NodeId,
    parent: NodeId,
    token: &Token<'_>,
    options: ParseOptions,
) -> Result<(), ParseError> {
    if options.strip_whitespace_text && token.text.chars().all(char::is_whitespace) {
        state.release();
        return Ok(());
    }

    let value = decode(token.text).map_err(|e| entity_error(e, token.pos, "#text"))?;
    state.emit(token.node(id, parent, NodeType::Text, "#text", Some(value.into_owned())));
    Ok(())
}

/// Rebase an entity error from span-relative to document offset
fn entity_error(err: EntityError, span_pos: usize, node_name: &str) -> ParseError {
    match err {
        EntityError::UnknownEntity { token, offset } => ParseError::UnknownEntity {
            token,
            offset: span_pos + offset - 1,
            node_name: node_name.to_string(),
        },
    }
}

/// Source text around a byte offset, for error messages
fn surrounding(xml: &str, at: usize) -> String {
    let start = xml[..at]
        .char_indices()
        .rev()
        .nth(CONTEXT_CHARS - 1)
        .map_or(0, |(i, _)| i);
    let end = xml[at..]
        .char_indices()
        .nth(CONTEXT_CHARS)
        .map_or(xml.len(), |(i, _)| at + i);
    xml[start..end].to_string()
}
