//! Typed AST produced by lowering.
//!
//! All nodes of a program live in one [`Ast`] arena. A node's children are
//! fixed when it is allocated; the arena then records each child's parent as a
//! [`NodeId`] back-link used for diagnostics and context only.

mod node;
mod tree;


pub use node::{ArithmeticOp, Callable, Declaration, Node, NodeId, NodeKind, RelationalOp};
pub use tree::Ast;
