//! Runtime evaluation errors.
//!
//! Every evaluation error is fatal to the run: the evaluator stops at the first
//! one and the environment keeps whatever mutations happened before it.

use thiserror::Error;

use crate::ast::NodeId;

/// An evaluation failure together with the node that caused it.
#[derive(Debug, Error)]
#[error("{kind} at node {node} `{context}`")]
pub struct EvalError {
    pub kind: EvalErrorKind,
    pub node: NodeId,
    /// One-line rendering of the offending node.
    pub context: String,
}

#[derive(Debug, Error)]
pub enum EvalErrorKind {
    #[error("unbound identifier `{name}`")]
    UnboundIdentifier { name: String },

    #[error("assignment to undeclared variable `{name}`")]
    UndeclaredAssignment { name: String },

    #[error("unknown function `{name}`")]
    UnknownFunction { name: String },

    /// A user-defined function. Only builtins can be called.
    #[error("function `{name}` is not supported")]
    UnsupportedFunction { name: String },

    /// A statement, an empty branch or `print` used where an integer is needed.
    #[error("expression produces no value")]
    VoidValue,

    #[error("division by zero")]
    DivisionByZero,

    /// The node stands in for a parse node that could not be lowered.
    #[error("cannot evaluate a node that failed to lower")]
    EmptyNode,

    #[error("evaluation depth {depth} exceeds maximum of {max_depth}")]
    DepthExceeded { depth: usize, max_depth: usize },

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}
