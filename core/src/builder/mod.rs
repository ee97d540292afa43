//! Lowering pass from the generic parse tree to the typed AST.
//!
//! Lowering never fails as a whole. A parse node the builder cannot make sense
//! of (unknown `type`, missing tag, missing field) is replaced by the empty
//! marker, reported as a [`Diagnostic`], and lowering carries on with its
//! siblings. Empty markers are dropped from statement and argument lists;
//! where a child slot must be filled they become [`NodeKind::Empty`] nodes,
//! which fail only if evaluation reaches them.
//!
//! ## Example
//!
//! ```
//! use sprig_core::{builder, parse_tree::ParseNode};
//!
//! let program = vec![ParseNode::record("integer", [("value", ParseNode::Int(1))])];
//! let lowered = builder::lower(&program);
//! assert_eq!(lowered.ast.statements().len(), 1);
//! assert!(lowered.diagnostics.is_empty());
//! ```
//!
//! [`NodeKind::Empty`]: crate::ast::NodeKind::Empty

mod diagnostic;
mod lower;

#[cfg(test)]
mod lower_test;

pub use diagnostic::{Diagnostic, Severity};

use crate::{ast::Ast, parse_tree::ParseNode};

/// Output of lowering: the AST plus whatever soft failures were seen.
#[derive(Debug, Clone)]
pub struct Lowered {
    pub ast: Ast,
    pub diagnostics: Vec<Diagnostic>,
}

/// Lower a program given as its list of top-level statements.
pub fn lower(statements: &[ParseNode]) -> Lowered {
    lower::AstBuilder::new().build(statements)
}

/// Lower a whole parse-tree document.
///
/// A sequence is read as the list of top-level statements; any other node is
/// taken as a program with that single statement.
pub fn lower_tree(tree: &ParseNode) -> Lowered {
    match tree.as_seq() {
        Some(statements) => lower(statements),
        None => lower(core::slice::from_ref(tree)),
    }
}
