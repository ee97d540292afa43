//! Binary operator implementations.

use crate::{
    ast::{ArithmeticOp, RelationalOp},
    evaluator::EvalErrorKind,
    value,
};

/// Evaluate an arithmetic operation.
///
/// Uses wrapping arithmetic to prevent panics on overflow. Division truncates
/// toward zero; dividing by zero returns an error.
pub(super) fn eval_arithmetic(
    op: ArithmeticOp,
    left: i64,
    right: i64,
) -> Result<i64, EvalErrorKind> {
    match op {
        ArithmeticOp::Add => Ok(left.wrapping_add(right)),
        ArithmeticOp::Sub => Ok(left.wrapping_sub(right)),
        ArithmeticOp::Mul => Ok(left.wrapping_mul(right)),
        ArithmeticOp::Div => {
            if right == 0 {
                Err(EvalErrorKind::DivisionByZero)
            } else {
                // wrapping_div covers i64::MIN / -1
                Ok(left.wrapping_div(right))
            }
        }
    }
}

/// Evaluate a comparison, producing [`value::TRUE`] or [`value::FALSE`].
pub(super) fn eval_relational(op: RelationalOp, left: i64, right: i64) -> i64 {
    let holds = match op {
        RelationalOp::Lt => left < right,
        RelationalOp::Le => left <= right,
        RelationalOp::Gt => left > right,
        RelationalOp::Ge => left >= right,
        RelationalOp::Eq => left == right,
        RelationalOp::Neq => left != right,
    };
    value::from_bool(holds)
}
