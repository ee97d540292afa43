use core::fmt;

use super::node::{Callable, Node, NodeId, NodeKind};
use crate::stack::ensure_sufficient_stack;

/// Arena holding every node of one lowered program.
///
/// Nodes refer to each other by [`NodeId`]. The parent link is a plain index and
/// never owns anything; dropping the `Ast` drops all nodes at once.
#[derive(Debug, Clone, PartialEq)]
pub struct Ast {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Ast {
    pub(crate) fn new() -> Self {
        Self {
            nodes: Vec::new(),
            root: NodeId(0),
        }
    }

    /// Allocate a node and point each of its children back at it.
    pub(crate) fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        for child in kind.children() {
            debug_assert!(child < id, "children are allocated before their parent");
            debug_assert!(self.nodes[child.index()].parent.is_none(), "node has two parents");
            self.nodes[child.index()].parent = Some(id);
        }
        self.nodes.push(Node { kind, parent: None });
        id
    }

    pub(crate) fn set_root(&mut self, root: NodeId) {
        self.root = root;
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.kind(id).children()
    }

    /// Top-level statements of the program, in execution order.
    pub fn statements(&self) -> &[NodeId] {
        match self.kind(self.root) {
            NodeKind::Program { statements } => statements,
            _ => &[],
        }
    }

    /// Walk parent links from `id` up to the root, excluding `id` itself.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        core::iter::successors(self.parent(id), move |&current| self.parent(current))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// One-line rendering of a node and its subtree, e.g. `(a + 1)`.
    pub fn describe(&self, id: NodeId) -> String {
        ensure_sufficient_stack(|| self.describe_inner(id))
    }

    fn describe_inner(&self, id: NodeId) -> String {
        match self.kind(id) {
            NodeKind::Program { statements } => {
                format!("program of {} statements", statements.len())
            }
            NodeKind::Value(value) => value.to_string(),
            NodeKind::Identifier(name) => name.clone(),
            NodeKind::ArithmeticExpr { op, left, right } => {
                format!("({} {} {})", self.describe(*left), op.as_str(), self.describe(*right))
            }
            NodeKind::BooleanExpr { op, left, right } => {
                format!("({} {} {})", self.describe(*left), op.as_str(), self.describe(*right))
            }
            NodeKind::VariableDec { declarations } => {
                let parts: Vec<String> = declarations
                    .iter()
                    .map(|decl| format!("{} = {}", decl.name, self.describe(decl.expr)))
                    .collect();
                format!("let {}", parts.join(", "))
            }
            NodeKind::Assignment { target, expr } => {
                format!("{} = {}", target, self.describe(*expr))
            }
            NodeKind::If { evaluation, .. } => {
                format!("if {} {{ .. }}", self.describe(*evaluation))
            }
            NodeKind::Params(params) => {
                let parts: Vec<String> = params.iter().map(|p| self.describe(*p)).collect();
                parts.join(", ")
            }
            NodeKind::FunctionCall { name, params, .. } => {
                format!("{}({})", name, self.describe(*params))
            }
            NodeKind::Empty => "<empty>".to_string(),
        }
    }

    fn fmt_node(&self, f: &mut fmt::Formatter<'_>, id: NodeId, depth: usize) -> fmt::Result {
        ensure_sufficient_stack(|| self.fmt_node_inner(f, id, depth))
    }

    fn fmt_node_inner(&self, f: &mut fmt::Formatter<'_>, id: NodeId, depth: usize) -> fmt::Result {
        let indent = depth * 2;
        let kind = self.kind(id);
        write!(f, "{:indent$}{} {}", "", id, kind.name())?;
        match kind {
            NodeKind::Value(value) => write!(f, " {value}")?,
            NodeKind::Identifier(name) => write!(f, " {name}")?,
            NodeKind::ArithmeticExpr { op, .. } => write!(f, " {}", op.as_str())?,
            NodeKind::BooleanExpr { op, .. } => write!(f, " {}", op.as_str())?,
            NodeKind::Assignment { target, .. } => write!(f, " {target}")?,
            NodeKind::FunctionCall { name, callable, .. } => match callable {
                Callable::Builtin(builtin) => write!(f, " {name} [builtin {}]", builtin.name())?,
                Callable::Unlowered(_) => write!(f, " {name} [unlowered]")?,
            },
            _ => {}
        }
        writeln!(f)?;

        match kind {
            NodeKind::VariableDec { declarations } => {
                for decl in declarations {
                    writeln!(f, "{:width$}{} =", "", decl.name, width = indent + 2)?;
                    self.fmt_node(f, decl.expr, depth + 2)?;
                }
            }
            NodeKind::If {
                evaluation,
                statements,
                else_statements,
            } => {
                self.fmt_node(f, *evaluation, depth + 1)?;
                writeln!(f, "{:width$}then", "", width = indent + 2)?;
                for stmt in statements {
                    self.fmt_node(f, *stmt, depth + 2)?;
                }
                if !else_statements.is_empty() {
                    writeln!(f, "{:width$}else", "", width = indent + 2)?;
                    for stmt in else_statements {
                        self.fmt_node(f, *stmt, depth + 2)?;
                    }
                }
            }
            _ => {
                for child in kind.children() {
                    self.fmt_node(f, child, depth + 1)?;
                }
            }
        }
        Ok(())
    }
}

/// Indented tree dump, one node per line.
impl fmt::Display for Ast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nodes.is_empty() {
            return Ok(());
        }
        self.fmt_node(f, self.root, 0)
    }
}
