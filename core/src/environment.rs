//! Variable bindings for one program run.
//!
//! The environment is a stack of scopes searched from innermost to outermost.
//! The bottom scope holds top-level bindings and is never popped; the
//! evaluator pushes a child scope for each `if` branch it runs.
//!
//! - **declare** binds in the innermost scope, creating or overwriting.
//! - **assign** overwrites the nearest existing binding and fails when there
//!   is none.
//!
//! ```text
//! let a = 1
//! if 1 { let b = 2  a = a + b }   // b lives in the branch scope, a is updated
//! print(a)                         // 3
//! ```

use core::fmt;
use hashbrown::HashMap;

type Frame = HashMap<String, i64>;

#[derive(Debug, Clone)]
pub struct Environment {
    scopes: Vec<Frame>,
}

impl Environment {
    /// Create an environment holding only the (empty) top-level scope.
    pub fn new() -> Self {
        Self {
            scopes: vec![Frame::new()],
        }
    }

    /// Enter a child scope.
    pub fn push(&mut self) {
        self.scopes.push(Frame::new());
    }

    /// Leave the innermost child scope.
    ///
    /// The top-level scope cannot be popped.
    pub fn pop(&mut self) -> Result<(), PopError> {
        if self.scopes.len() <= 1 {
            return Err(PopError::TopLevel);
        }
        self.scopes.pop();
        Ok(())
    }

    /// Number of scopes currently on the stack, top-level included.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Look up a name, searching scopes from innermost to outermost.
    pub fn lookup(&self, name: &str) -> Option<i64> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name).copied())
    }

    /// Bind `name` in the innermost scope.
    pub fn declare(&mut self, name: &str, value: i64) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), value);
        }
    }

    /// Overwrite the nearest existing binding of `name`.
    pub fn assign(&mut self, name: &str, value: i64) -> Result<(), AssignError> {
        match self
            .scopes
            .iter_mut()
            .rev()
            .find_map(|scope| scope.get_mut(name))
        {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(AssignError::NotDeclared(name.to_string())),
        }
    }

    /// Bindings of the top-level scope, sorted by name.
    pub fn globals(&self) -> Vec<(&str, i64)> {
        let mut bindings: Vec<(&str, i64)> = self.scopes[0]
            .iter()
            .map(|(name, value)| (name.as_str(), *value))
            .collect();
        bindings.sort_unstable_by_key(|(name, _)| *name);
        bindings
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

/// Error when assigning to a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignError {
    /// No scope binds the name.
    NotDeclared(String),
}

impl fmt::Display for AssignError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssignError::NotDeclared(name) => write!(f, "Name '{}' is not declared", name),
        }
    }
}

/// Error when leaving a scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PopError {
    /// Only the top-level scope is left.
    TopLevel,
}

impl fmt::Display for PopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PopError::TopLevel => write!(f, "Cannot pop the top-level scope"),
        }
    }
}
