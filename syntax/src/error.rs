use pest::error::{InputLocation, LineColLocation};
use thiserror::Error;

use crate::parser::Rule;

/// Source text that does not match the program grammar.
#[derive(Debug, Error)]
#[error("syntax error: {0}")]
pub struct SyntaxError(Box<pest::error::Error<Rule>>);

impl SyntaxError {
    /// One-based line and column where the error starts.
    pub fn line_col(&self) -> (usize, usize) {
        match self.0.line_col {
            LineColLocation::Pos(pos) => pos,
            LineColLocation::Span(start, _) => start,
        }
    }

    /// Byte range of the offending input; empty for a single position.
    pub fn span(&self) -> (usize, usize) {
        match self.0.location {
            InputLocation::Pos(pos) => (pos, pos),
            InputLocation::Span(span) => span,
        }
    }

    /// The error message without the rendered source excerpt.
    pub fn message(&self) -> String {
        self.0.variant.message().into_owned()
    }
}

impl From<pest::error::Error<Rule>> for SyntaxError {
    fn from(err: pest::error::Error<Rule>) -> Self {
        SyntaxError(Box::new(err))
    }
}
