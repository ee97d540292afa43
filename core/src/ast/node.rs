use core::fmt;

use crate::{builtins::Builtin, parse_tree::ParseNode};

/// Index of a node inside its owning [`Ast`](super::Ast).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ArithmeticOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithmeticOp {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "+" => Some(ArithmeticOp::Add),
            "-" => Some(ArithmeticOp::Sub),
            "*" => Some(ArithmeticOp::Mul),
            "/" => Some(ArithmeticOp::Div),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ArithmeticOp::Add => "+",
            ArithmeticOp::Sub => "-",
            ArithmeticOp::Mul => "*",
            ArithmeticOp::Div => "/",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RelationalOp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Neq,
}

impl RelationalOp {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "<" => Some(RelationalOp::Lt),
            "<=" => Some(RelationalOp::Le),
            ">" => Some(RelationalOp::Gt),
            ">=" => Some(RelationalOp::Ge),
            "==" => Some(RelationalOp::Eq),
            "!=" => Some(RelationalOp::Neq),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RelationalOp::Lt => "<",
            RelationalOp::Le => "<=",
            RelationalOp::Gt => ">",
            RelationalOp::Ge => ">=",
            RelationalOp::Eq => "==",
            RelationalOp::Neq => "!=",
        }
    }
}

/// What a function call node dispatches to.
#[derive(Debug, Clone, PartialEq)]
pub enum Callable {
    Builtin(Builtin),
    /// A user function whose body stays in parse-tree form. Calling it fails.
    Unlowered(ParseNode),
}

/// One `name = expr` entry of a `let` statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub name: String,
    pub expr: NodeId,
}

/// The closed set of AST node kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Program {
        statements: Vec<NodeId>,
    },
    Value(i64),
    Identifier(String),
    ArithmeticExpr {
        op: ArithmeticOp,
        left: NodeId,
        right: NodeId,
    },
    BooleanExpr {
        op: RelationalOp,
        left: NodeId,
        right: NodeId,
    },
    VariableDec {
        declarations: Vec<Declaration>,
    },
    Assignment {
        target: String,
        expr: NodeId,
    },
    If {
        evaluation: NodeId,
        statements: Vec<NodeId>,
        else_statements: Vec<NodeId>,
    },
    Params(Vec<NodeId>),
    FunctionCall {
        name: String,
        params: NodeId,
        callable: Callable,
    },
    /// Stand-in for a parse node that could not be lowered.
    Empty,
}

impl NodeKind {
    /// Direct children, in evaluation order.
    pub fn children(&self) -> Vec<NodeId> {
        match self {
            NodeKind::Program { statements } => statements.clone(),
            NodeKind::Value(_) | NodeKind::Identifier(_) | NodeKind::Empty => Vec::new(),
            NodeKind::ArithmeticExpr { left, right, .. }
            | NodeKind::BooleanExpr { left, right, .. } => vec![*left, *right],
            NodeKind::VariableDec { declarations } => {
                declarations.iter().map(|decl| decl.expr).collect()
            }
            NodeKind::Assignment { expr, .. } => vec![*expr],
            NodeKind::If {
                evaluation,
                statements,
                else_statements,
            } => core::iter::once(*evaluation)
                .chain(statements.iter().copied())
                .chain(else_statements.iter().copied())
                .collect(),
            NodeKind::Params(params) => params.clone(),
            NodeKind::FunctionCall { params, .. } => vec![*params],
        }
    }

    /// Short lowercase name of the kind, used in dumps and error messages.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Program { .. } => "program",
            NodeKind::Value(_) => "value",
            NodeKind::Identifier(_) => "identifier",
            NodeKind::ArithmeticExpr { .. } => "arithmetic_expr",
            NodeKind::BooleanExpr { .. } => "boolean_expr",
            NodeKind::VariableDec { .. } => "variable_dec",
            NodeKind::Assignment { .. } => "assignment",
            NodeKind::If { .. } => "if",
            NodeKind::Params(_) => "params",
            NodeKind::FunctionCall { .. } => "function",
            NodeKind::Empty => "empty",
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, NodeKind::Empty)
    }
}

/// A node together with its back-link to the parent.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
}
