//! Runtime values.

/// Integer produced by a comparison that holds.
pub const TRUE: i64 = 1;
/// Integer produced by a comparison that fails.
pub const FALSE: i64 = 0;

/// Result of evaluating a node.
///
/// Integers are the only data; `Void` is what statements, empty branches and
/// `print` evaluate to, and it cannot be used as an operand.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    Void,
}

/// Non-zero integers are true.
pub fn is_truthy(value: i64) -> bool {
    value != FALSE
}

pub fn from_bool(value: bool) -> i64 {
    if value { TRUE } else { FALSE }
}
