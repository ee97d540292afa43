//! Core evaluation logic.

use std::io::Write;

use tracing::{debug, trace};

use super::{
    EvaluatorOptions,
    error::{EvalError, EvalErrorKind},
    operators,
};
use crate::{
    ast::{Ast, Callable, NodeId, NodeKind},
    environment::Environment,
    stack::ensure_sufficient_stack,
    value::{self, Value},
};

/// Evaluator for one lowered program.
///
/// Output of `print` goes to `out`; bindings live in the evaluator's
/// [`Environment`] and can be inspected after the run.
pub struct Evaluator<'a, W: Write> {
    options: EvaluatorOptions,
    ast: &'a Ast,
    env: Environment,
    out: W,
    depth: usize,
}

impl<'a, W: Write> Evaluator<'a, W> {
    /// Create an evaluator with an empty environment.
    pub fn new(options: EvaluatorOptions, ast: &'a Ast, out: W) -> Self {
        Self {
            options,
            ast,
            env: Environment::new(),
            out,
            depth: 0,
        }
    }

    pub fn into_environment(self) -> Environment {
        self.env
    }

    /// Execute the program's statements in order.
    ///
    /// Stops at the first error without running later statements.
    pub fn run(&mut self) -> Result<(), EvalError> {
        let ast = self.ast;
        for &statement in ast.statements() {
            trace!(node = %statement, "executing statement");
            self.exec(statement)?;
        }
        debug!(statements = ast.statements().len(), "program finished");
        Ok(())
    }

    /// Execute a node, returning its value (`Void` for pure statements).
    pub fn exec(&mut self, id: NodeId) -> Result<Value, EvalError> {
        // Check depth before recursing
        if self.depth >= self.options.max_depth {
            return Err(self.error(
                id,
                EvalErrorKind::DepthExceeded {
                    depth: self.depth,
                    max_depth: self.options.max_depth,
                },
            ));
        }

        self.depth += 1;
        let result = ensure_sufficient_stack(|| self.exec_inner(id));
        self.depth -= 1;

        result
    }

    /// Evaluate a node that must produce an integer.
    fn eval_int(&mut self, id: NodeId) -> Result<i64, EvalError> {
        match self.exec(id)? {
            Value::Int(value) => Ok(value),
            Value::Void => Err(self.error(id, EvalErrorKind::VoidValue)),
        }
    }

    fn exec_inner(&mut self, id: NodeId) -> Result<Value, EvalError> {
        let ast = self.ast;
        match ast.kind(id) {
            NodeKind::Program { statements } => {
                for &statement in statements {
                    self.exec(statement)?;
                }
                Ok(Value::Void)
            }

            NodeKind::Value(value) => Ok(Value::Int(*value)),

            NodeKind::Identifier(name) => match self.env.lookup(name) {
                Some(value) => Ok(Value::Int(value)),
                None => Err(self.error(
                    id,
                    EvalErrorKind::UnboundIdentifier { name: name.clone() },
                )),
            },

            NodeKind::ArithmeticExpr { op, left, right } => {
                // Left operand is fully evaluated before the right one
                let left = self.eval_int(*left)?;
                let right = self.eval_int(*right)?;
                operators::eval_arithmetic(*op, left, right)
                    .map(Value::Int)
                    .map_err(|kind| self.error(id, kind))
            }

            NodeKind::BooleanExpr { op, left, right } => {
                let left = self.eval_int(*left)?;
                let right = self.eval_int(*right)?;
                Ok(Value::Int(operators::eval_relational(*op, left, right)))
            }

            NodeKind::VariableDec { declarations } => {
                // Each declaration sees the ones before it in the same statement
                for decl in declarations {
                    let value = self.eval_int(decl.expr)?;
                    trace!(name = %decl.name, value, "declare");
                    self.env.declare(&decl.name, value);
                }
                Ok(Value::Void)
            }

            NodeKind::Assignment { target, expr } => {
                let value = self.eval_int(*expr)?;
                trace!(name = %target, value, "assign");
                self.env.assign(target, value).map_err(|_| {
                    self.error(
                        id,
                        EvalErrorKind::UndeclaredAssignment {
                            name: target.clone(),
                        },
                    )
                })?;
                Ok(Value::Void)
            }

            NodeKind::If {
                evaluation,
                statements,
                else_statements,
            } => {
                let condition = self.eval_int(*evaluation)?;
                if value::is_truthy(condition) {
                    self.exec_branch(statements)
                } else {
                    self.exec_branch(else_statements)
                }
            }

            NodeKind::Params(params) => {
                for &param in params {
                    self.eval_int(param)?;
                }
                Ok(Value::Void)
            }

            NodeKind::FunctionCall {
                name,
                params,
                callable,
            } => {
                let args = match ast.kind(*params) {
                    NodeKind::Params(args) => args.as_slice(),
                    _ => &[],
                };
                let mut values = Vec::with_capacity(args.len());
                for &arg in args {
                    values.push(self.eval_int(arg)?);
                }

                match callable {
                    Callable::Builtin(builtin) => match builtin.call(&values, &mut self.out) {
                        Ok(result) => Ok(result),
                        Err(e) => Err(self.error(id, EvalErrorKind::Output(e))),
                    },
                    Callable::Unlowered(body) if body.is_null() => {
                        Err(self.error(id, EvalErrorKind::UnknownFunction { name: name.clone() }))
                    }
                    Callable::Unlowered(_) => Err(self.error(
                        id,
                        EvalErrorKind::UnsupportedFunction { name: name.clone() },
                    )),
                }
            }

            NodeKind::Empty => Err(self.error(id, EvalErrorKind::EmptyNode)),
        }
    }

    /// Run a branch body in its own scope; its value is the last statement's.
    fn exec_branch(&mut self, statements: &[NodeId]) -> Result<Value, EvalError> {
        self.env.push();
        let mut result = Ok(Value::Void);
        for &statement in statements {
            result = self.exec(statement);
            if result.is_err() {
                break;
            }
        }
        let popped = self.env.pop();
        debug_assert!(popped.is_ok(), "branch scope missing");
        result
    }

    fn error(&self, id: NodeId, kind: EvalErrorKind) -> EvalError {
        EvalError {
            kind,
            node: id,
            context: self.ast.describe(id),
        }
    }
}
