//! Text front end for sprig programs.
//!
//! Parses source text with a pest grammar and emits the same generic
//! [`ParseNode`](sprig_core::parse_tree::ParseNode) shapes a JSON parse-tree
//! dump would contain, so the result feeds straight into
//! [`sprig_core::builder::lower`].

mod error;
mod parser;


pub use error::SyntaxError;
pub use parser::{ProgramParser, Rule, parse};
