//! Generic parse tree handed to the core by a grammar-driven parser.
//!
//! The tree carries no node kinds of its own: records are tagged by an optional
//! `type` string and everything else is plain nesting, exactly as a parser
//! generator emits it as JSON. The builder is the only consumer.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A node of the generic parse tree.
///
/// Deserializes from JSON without any schema: objects become [`Record`]s,
/// arrays become [`ParseNode::Seq`], strings become tokens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParseNode {
    Null,
    Int(i64),
    Token(String),
    Seq(Vec<ParseNode>),
    Record(Record),
}

/// A parse record: an optional `type` tag plus named fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, ParseNode>,
}

// Long operator chains nest one record per operator, so the default
// recursive drop would use one stack frame per level.
impl Drop for Record {
    fn drop(&mut self) {
        let mut pending: Vec<ParseNode> = std::mem::take(&mut self.fields).into_values().collect();
        while let Some(node) = pending.pop() {
            match node {
                ParseNode::Record(mut record) => {
                    pending.extend(std::mem::take(&mut record.fields).into_values());
                }
                ParseNode::Seq(items) => pending.extend(items),
                _ => {}
            }
        }
    }
}

impl ParseNode {
    /// Build a tagged record from `(field, value)` pairs.
    pub fn record<'a>(tag: &str, fields: impl IntoIterator<Item = (&'a str, ParseNode)>) -> Self {
        ParseNode::Record(Record {
            tag: Some(tag.into()),
            fields: fields
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        })
    }

    pub fn token(text: &str) -> Self {
        ParseNode::Token(text.into())
    }

    /// The `type` tag, if this node is a tagged record.
    pub fn tag(&self) -> Option<&str> {
        match self {
            ParseNode::Record(record) => record.tag.as_deref(),
            _ => None,
        }
    }

    pub fn field(&self, name: &str) -> Option<&ParseNode> {
        match self {
            ParseNode::Record(record) => record.fields.get(name),
            _ => None,
        }
    }

    /// Elements of a sequence node; `None` for anything else.
    pub fn as_seq(&self) -> Option<&[ParseNode]> {
        match self {
            ParseNode::Seq(items) => Some(items),
            _ => None,
        }
    }

    /// Text of a token node.
    pub fn as_token(&self) -> Option<&str> {
        match self {
            ParseNode::Token(text) => Some(text),
            _ => None,
        }
    }

    /// Integer payload, accepting numeric tokens as well as integers.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParseNode::Int(value) => Some(*value),
            ParseNode::Token(text) => text.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ParseNode::Null)
    }
}
