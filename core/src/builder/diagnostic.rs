use core::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Severity {
    /// A parse node with a `type` tag the builder does not know, or a
    /// malformed record.
    Warning,
    /// A parse node with no `type` tag at all (punctuation, grouping).
    Info,
}

/// A soft lowering failure. Lowering continues after recording one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// The offending `type` tag; `None` for untagged nodes.
    pub tag: Option<String>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        write!(f, "{level}: {}", self.message)
    }
}
