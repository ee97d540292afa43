//! Sprig core: lowering and evaluation.
//!
//! A grammar-driven parser hands over a generic [`parse_tree::ParseNode`] tree.
//! [`builder`] lowers it into a typed [`ast::Ast`], and [`evaluator`] executes
//! that AST against an [`environment::Environment`], writing `print` output to
//! a caller-supplied sink.

pub mod ast;
pub mod builder;
pub mod builtins;
pub mod environment;
pub mod evaluator;
pub mod parse_tree;
pub mod stack;
pub mod value;

/// Test utilities for enabling logging in tests
#[cfg(test)]
pub mod test_utils {
    use crate::parse_tree::ParseNode;

    /// Initialize tracing subscriber for tests with DEBUG level
    /// Call this at the start of tests where you want to see logging output
    pub fn init_test_logging() {
        use tracing_subscriber::{EnvFilter, fmt};

        // Try to initialize, ignore error if already initialized
        let _ = fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    }

    /// Deserialize a parse tree written with `serde_json::json!`.
    pub fn parse_tree(value: serde_json::Value) -> ParseNode {
        serde_json::from_value(value).expect("test parse tree should deserialize")
    }

    /// Deserialize a list of top-level statements.
    pub fn statements(value: serde_json::Value) -> Vec<ParseNode> {
        serde_json::from_value(value).expect("test statements should deserialize")
    }
}
