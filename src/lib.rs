//! Sprig - a tiny integer scripting language
//!
//! # Overview
//!
//! A sprig program is a flat list of statements over signed integers:
//! `let` declarations, assignments, `if`/`else` with branch scopes, the four
//! arithmetic operators, six relational operators, and a `print` builtin.
//!
//! Execution is a three stage pipeline:
//!
//! 1. [`sprig_syntax::parse`] turns source text into a generic parse tree
//!    (the same shape a parse-tree JSON dump carries)
//! 2. [`builder::lower`] lowers it into a typed [`ast::Ast`], collecting
//!    soft diagnostics for unusable nodes
//! 3. [`evaluator`] walks the AST, writing `print` output to a sink
//!
//! # Quick Start
//!
//! ```
//! use sprig::{EvaluatorOptions, run_source};
//!
//! let mut out = Vec::new();
//! let run = run_source("let a = 3, b = 4\nprint(a * b)", EvaluatorOptions::default(), &mut out)
//!     .unwrap();
//!
//! assert_eq!(out, b"12\n");
//! assert_eq!(run.env.lookup("b"), Some(4));
//! ```

pub use sprig_core::{
    ast, builder, builtins, environment, evaluator, parse_tree, value,
    builder::{Diagnostic, Severity},
    environment::Environment,
    evaluator::{EvalError, EvalErrorKind, EvaluatorOptions},
    parse_tree::ParseNode,
};
pub use sprig_syntax::{SyntaxError, parse};

use std::io::Write;

use thiserror::Error;

/// Any failure while running a program.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// The result of a completed run.
#[derive(Debug)]
pub struct Run {
    /// Top-level bindings after the last statement.
    pub env: Environment,
    /// Soft lowering diagnostics, in parse-tree order.
    pub diagnostics: Vec<Diagnostic>,
}

/// Parse, lower and execute source text.
pub fn run_source<W: Write>(
    source: &str,
    options: EvaluatorOptions,
    out: W,
) -> Result<Run, Error> {
    let nodes = parse(source)?;
    run_parse_tree(&nodes, options, out)
}

/// Lower and execute an already parsed program.
pub fn run_parse_tree<W: Write>(
    nodes: &[ParseNode],
    options: EvaluatorOptions,
    out: W,
) -> Result<Run, Error> {
    let lowered = builder::lower(nodes);
    let env = evaluator::run_with_options(options, &lowered.ast, out)?;
    Ok(Run {
        env,
        diagnostics: lowered.diagnostics,
    })
}
