//! Tree-walking evaluator for lowered programs.
//!
//! The evaluator walks the [`Ast`] depth-first, one statement at a time, on a
//! single thread. Expressions evaluate to integers; declarations, assignments
//! and calls run for effect.
//!
//! ## Design Principles
//!
//! - **Never panic**: malformed trees, overflow and bad programs surface as
//!   [`EvalError`]s
//! - **Stack-safe**: the stack grows on demand for deep trees, and depth
//!   tracking bounds runaway recursion
//! - **Fail fast**: the first error ends the run
//!
//! ## Example
//!
//! ```
//! use sprig_core::{builder, evaluator, parse_tree::ParseNode};
//!
//! let value = |v| ParseNode::record("integer", [("value", ParseNode::Int(v))]);
//! let print = ParseNode::record(
//!     "function",
//!     [
//!         ("fcn_name", ParseNode::token("print")),
//!         ("params", ParseNode::Seq(vec![value(99)])),
//!     ],
//! );
//! let lowered = builder::lower(&[print]);
//!
//! let mut out = Vec::new();
//! evaluator::run(&lowered.ast, &mut out).unwrap();
//! assert_eq!(out, b"99\n");
//! ```

mod error;
mod eval;
mod operators;


pub use error::{EvalError, EvalErrorKind};
pub use eval::Evaluator;

use std::io::Write;

use crate::{ast::Ast, environment::Environment};

/// Configuration options for program execution.
#[derive(Debug, Clone)]
pub struct EvaluatorOptions {
    /// Maximum evaluation stack depth (for recursion protection).
    ///
    /// Default: 1000
    pub max_depth: usize,
}

impl Default for EvaluatorOptions {
    fn default() -> Self {
        Self { max_depth: 1000 }
    }
}

/// Run a program with default options, returning the final bindings.
pub fn run<W: Write>(ast: &Ast, out: W) -> Result<Environment, EvalError> {
    run_with_options(EvaluatorOptions::default(), ast, out)
}

/// Run a program with custom options, returning the final bindings.
pub fn run_with_options<W: Write>(
    options: EvaluatorOptions,
    ast: &Ast,
    out: W,
) -> Result<Environment, EvalError> {
    let mut evaluator = Evaluator::new(options, ast, out);
    evaluator.run()?;
    Ok(evaluator.into_environment())
}
