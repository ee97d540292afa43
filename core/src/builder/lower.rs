//! Lowering from the generic parse tree to the typed AST.

use tracing::{debug, trace, warn};

use super::{
    Lowered,
    diagnostic::{Diagnostic, Severity},
};
use crate::{
    ast::{ArithmeticOp, Ast, Callable, Declaration, NodeId, NodeKind, RelationalOp},
    builtins::Builtin,
    parse_tree::ParseNode,
    stack::ensure_sufficient_stack,
};

/// Single-use builder for one program.
pub(super) struct AstBuilder {
    ast: Ast,
    diagnostics: Vec<Diagnostic>,
}

impl AstBuilder {
    pub(super) fn new() -> Self {
        Self {
            ast: Ast::new(),
            diagnostics: Vec::new(),
        }
    }

    pub(super) fn build(mut self, statements: &[ParseNode]) -> Lowered {
        let statements = self.lower_sequence(statements);
        let root = self.ast.alloc(NodeKind::Program { statements });
        self.ast.set_root(root);
        debug!(
            nodes = self.ast.len(),
            diagnostics = self.diagnostics.len(),
            "lowered program"
        );
        Lowered {
            ast: self.ast,
            diagnostics: self.diagnostics,
        }
    }

    /// Lower every element in order, dropping the ones that produce no node.
    fn lower_sequence(&mut self, items: &[ParseNode]) -> Vec<NodeId> {
        let mut ids = Vec::with_capacity(items.len());
        for item in items {
            if let Some(id) = self.lower_node(item) {
                ids.push(id);
            }
        }
        ids
    }

    /// Lower a node that must occupy a slot; an unusable node becomes `Empty`.
    fn lower_required(&mut self, node: Option<&ParseNode>) -> NodeId {
        match node.and_then(|node| self.lower_node(node)) {
            Some(id) => id,
            None => self.ast.alloc(NodeKind::Empty),
        }
    }

    /// Lower one parse node. `None` is the empty marker.
    fn lower_node(&mut self, node: &ParseNode) -> Option<NodeId> {
        ensure_sufficient_stack(|| self.lower_node_inner(node))
    }

    fn lower_node_inner(&mut self, node: &ParseNode) -> Option<NodeId> {
        let Some(tag) = node.tag() else {
            debug!(?node, "skipping parse node without a type");
            self.diagnostics.push(Diagnostic {
                severity: Severity::Info,
                message: "parse node has no type".to_string(),
                tag: None,
            });
            return None;
        };
        trace!(tag, "lowering");

        let kind = match tag {
            "integer" => match node.field("value").and_then(ParseNode::as_int) {
                Some(value) => NodeKind::Value(value),
                None => return self.malformed(tag, "missing integer `value`"),
            },
            "identifier" => match name_field(node, "name") {
                Some(name) => NodeKind::Identifier(name.to_string()),
                None => return self.malformed(tag, "missing `name`"),
            },
            "arithmetic_expr" => {
                let Some([left, op, right]) = binary_params(node) else {
                    return self.malformed(tag, "`params` is not [left, operator, right]");
                };
                let Some(op) = op.as_token().and_then(ArithmeticOp::from_token) else {
                    return self.malformed(tag, "unknown arithmetic operator");
                };
                let left = self.lower_required(Some(ungroup(left)));
                let right = self.lower_required(Some(ungroup(right)));
                NodeKind::ArithmeticExpr { op, left, right }
            }
            "boolean_expr" => {
                let Some([left, op, right]) = binary_params(node) else {
                    return self.malformed(tag, "`params` is not [left, operator, right]");
                };
                let Some(op) = op.as_token().and_then(RelationalOp::from_token) else {
                    return self.malformed(tag, "unknown relational operator");
                };
                let left = self.lower_required(Some(ungroup(left)));
                let right = self.lower_required(Some(ungroup(right)));
                NodeKind::BooleanExpr { op, left, right }
            }
            "variable_dec" => {
                let mut declarations = Vec::new();
                for entry in seq_field(node, "declarations") {
                    match (entry.tag(), name_field(entry, "name")) {
                        (Some("assignment"), Some(name)) => {
                            let name = name.to_string();
                            let expr = self.lower_required(entry.field("expr"));
                            declarations.push(Declaration { name, expr });
                        }
                        _ => {
                            self.malformed(tag, "declaration is not a `name = expr` pair");
                        }
                    }
                }
                NodeKind::VariableDec { declarations }
            }
            "assignment" => {
                let Some(target) = name_field(node, "name") else {
                    return self.malformed(tag, "missing `name`");
                };
                let target = target.to_string();
                let expr = self.lower_required(node.field("expr"));
                NodeKind::Assignment { target, expr }
            }
            "if" => {
                let evaluation = self.lower_required(node.field("evaluation"));
                let statements = self.lower_sequence(seq_field(node, "statements"));
                let else_statements = self.lower_sequence(seq_field(node, "else_statements"));
                NodeKind::If {
                    evaluation,
                    statements,
                    else_statements,
                }
            }
            "function" => {
                let Some(name) = name_field(node, "fcn_name") else {
                    return self.malformed(tag, "missing `fcn_name`");
                };
                let name = name.to_string();
                let args = self.lower_sequence(seq_field(node, "params"));
                let params = self.ast.alloc(NodeKind::Params(args));
                let callable = match Builtin::from_name(&name) {
                    Some(builtin) => Callable::Builtin(builtin),
                    None => Callable::Unlowered(
                        node.field("body").cloned().unwrap_or(ParseNode::Null),
                    ),
                };
                NodeKind::FunctionCall {
                    name,
                    params,
                    callable,
                }
            }
            other => {
                warn!(tag = other, "{other} is an invalid statement type");
                self.diagnostics.push(Diagnostic {
                    severity: Severity::Warning,
                    message: format!("{other} is an invalid statement type"),
                    tag: Some(other.to_string()),
                });
                return None;
            }
        };

        Some(self.ast.alloc(kind))
    }

    fn malformed(&mut self, tag: &str, problem: &str) -> Option<NodeId> {
        warn!(tag, problem, "malformed parse node");
        self.diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            message: format!("malformed {tag} node: {problem}"),
            tag: Some(tag.to_string()),
        });
        None
    }
}

/// Strip bracket grouping around an operand.
///
/// An untagged sequence longer than one is an `[open, inner, close]` group and
/// stands for its middle element; a one-element sequence stands for its only
/// element. Nested groups are stripped repeatedly.
fn ungroup(mut node: &ParseNode) -> &ParseNode {
    while let Some(items) = node.as_seq() {
        node = match items {
            [only] => only,
            [_, inner, ..] => inner,
            [] => break,
        };
    }
    node
}

fn binary_params(node: &ParseNode) -> Option<&[ParseNode; 3]> {
    node.field("params")?.as_seq()?.try_into().ok()
}

fn name_field<'a>(node: &'a ParseNode, field: &str) -> Option<&'a str> {
    node.field(field)?.as_token()
}

/// A sequence-valued field; absent or `null` reads as empty.
fn seq_field<'a>(node: &'a ParseNode, field: &str) -> &'a [ParseNode] {
    node.field(field).and_then(ParseNode::as_seq).unwrap_or(&[])
}
