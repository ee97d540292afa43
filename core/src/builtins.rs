//! Natively implemented callables.

use std::io::Write;

use crate::value::Value;

/// Separator placed between the arguments of a single `print` call.
pub const PRINT_SEPARATOR: &str = "|";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Print,
}

impl Builtin {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "print" => Some(Self::Print),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Print => "print",
        }
    }

    /// Run the builtin on already-evaluated arguments.
    pub fn call(self, args: &[i64], out: &mut dyn Write) -> std::io::Result<Value> {
        match self {
            Self::Print => {
                writeln!(out, "{}", format_print_line(args))?;
                Ok(Value::Void)
            }
        }
    }
}

/// The text `print` emits for `args`, without the trailing newline.
pub fn format_print_line(args: &[i64]) -> String {
    args.iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(PRINT_SEPARATOR)
}
