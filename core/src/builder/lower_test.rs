//! Unit tests for lowering.

use super::*;
use crate::{
    ast::{ArithmeticOp, Callable, NodeId, NodeKind, RelationalOp},
    builtins::Builtin,
    test_utils::{init_test_logging, parse_tree, statements},
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn lower_json(value: serde_json::Value) -> Lowered {
    init_test_logging();
    lower(&statements(value))
}

fn only_statement(lowered: &Lowered) -> NodeId {
    let stmts = lowered.ast.statements();
    assert_eq!(stmts.len(), 1, "expected exactly one statement");
    stmts[0]
}

#[test]
fn test_integer() {
    let lowered = lower_json(json!([{ "type": "integer", "value": 42 }]));
    let id = only_statement(&lowered);
    assert_eq!(lowered.ast.kind(id), &NodeKind::Value(42));
    assert!(lowered.diagnostics.is_empty());
}

#[test]
fn test_integer_from_numeric_token() {
    let lowered = lower_json(json!([{ "type": "integer", "value": "-1" }]));
    let id = only_statement(&lowered);
    assert_eq!(lowered.ast.kind(id), &NodeKind::Value(-1));
}

#[test]
fn test_identifier() {
    let lowered = lower_json(json!([{ "type": "identifier", "name": "a" }]));
    let id = only_statement(&lowered);
    assert_eq!(lowered.ast.kind(id), &NodeKind::Identifier("a".to_string()));
}

#[test]
fn test_arithmetic_links_both_sides() {
    let lowered = lower_json(json!([{
        "type": "arithmetic_expr",
        "params": [
            { "type": "integer", "value": 3 },
            "-",
            { "type": "integer", "value": 1 }
        ]
    }]));
    let ast = &lowered.ast;
    let id = only_statement(&lowered);

    let NodeKind::ArithmeticExpr { op, left, right } = ast.kind(id) else {
        panic!("expected arithmetic_expr, got {:?}", ast.kind(id));
    };
    assert_eq!(*op, ArithmeticOp::Sub);
    assert_eq!(ast.kind(*left), &NodeKind::Value(3));
    assert_eq!(ast.kind(*right), &NodeKind::Value(1));
    assert_eq!(ast.parent(*left), Some(id));
    assert_eq!(ast.parent(*right), Some(id));
    assert_eq!(ast.parent(id), Some(ast.root()));
}

#[test]
fn test_bracket_grouped_operands_are_unwrapped() {
    // (3-1)*(3+1)
    let lowered = lower_json(json!([{
        "type": "arithmetic_expr",
        "params": [
            ["(", {
                "type": "arithmetic_expr",
                "params": [
                    { "type": "integer", "value": 3 },
                    "-",
                    { "type": "integer", "value": 1 }
                ]
            }, ")"],
            "*",
            ["(", {
                "type": "arithmetic_expr",
                "params": [
                    { "type": "integer", "value": 3 },
                    "+",
                    { "type": "integer", "value": 1 }
                ]
            }, ")"]
        ]
    }]));
    let ast = &lowered.ast;
    let id = only_statement(&lowered);

    let NodeKind::ArithmeticExpr { op, left, right } = ast.kind(id) else {
        panic!("expected arithmetic_expr");
    };
    assert_eq!(*op, ArithmeticOp::Mul);
    assert!(matches!(ast.kind(*left), NodeKind::ArithmeticExpr { op: ArithmeticOp::Sub, .. }));
    assert!(matches!(ast.kind(*right), NodeKind::ArithmeticExpr { op: ArithmeticOp::Add, .. }));
    assert_eq!(ast.describe(id), "((3 - 1) * (3 + 1))");
    assert!(lowered.diagnostics.is_empty());
}

#[test]
fn test_single_element_operand_is_unwrapped() {
    let lowered = lower_json(json!([{
        "type": "boolean_expr",
        "params": [[{ "type": "integer", "value": 9 }], "<", { "type": "integer", "value": 10 }]
    }]));
    let id = only_statement(&lowered);
    assert_eq!(lowered.ast.describe(id), "(9 < 10)");
}

#[test]
fn test_boolean_operators() {
    for (token, expected) in [
        ("<", RelationalOp::Lt),
        ("<=", RelationalOp::Le),
        (">", RelationalOp::Gt),
        (">=", RelationalOp::Ge),
        ("==", RelationalOp::Eq),
        ("!=", RelationalOp::Neq),
    ] {
        let lowered = lower_json(json!([{
            "type": "boolean_expr",
            "params": [{ "type": "integer", "value": 9 }, token, { "type": "integer", "value": 9 }]
        }]));
        let id = only_statement(&lowered);
        assert!(
            matches!(lowered.ast.kind(id), NodeKind::BooleanExpr { op, .. } if *op == expected),
            "operator {token}"
        );
    }
}

#[test]
fn test_arithmetic_operator_in_boolean_expr_is_rejected() {
    let lowered = lower_json(json!([{
        "type": "boolean_expr",
        "params": [{ "type": "integer", "value": 1 }, "+", { "type": "integer", "value": 2 }]
    }]));
    assert!(lowered.ast.statements().is_empty());
    assert_eq!(lowered.diagnostics.len(), 1);
    assert_eq!(lowered.diagnostics[0].tag.as_deref(), Some("boolean_expr"));
}

#[test]
fn test_variable_dec_keeps_declaration_order() {
    let lowered = lower_json(json!([{
        "type": "variable_dec",
        "declarations": [
            { "type": "assignment", "name": "e", "expr": { "type": "integer", "value": 99 } },
            { "type": "assignment", "name": "f", "expr": { "type": "integer", "value": 100 } },
            { "type": "assignment", "name": "g", "expr": {
                "type": "arithmetic_expr",
                "params": [
                    { "type": "identifier", "name": "e" },
                    "+",
                    { "type": "identifier", "name": "f" }
                ]
            } }
        ]
    }]));
    let ast = &lowered.ast;
    let id = only_statement(&lowered);

    let NodeKind::VariableDec { declarations } = ast.kind(id) else {
        panic!("expected variable_dec");
    };
    let names: Vec<&str> = declarations.iter().map(|d| d.name.as_str()).collect();
    assert_eq!(names, vec!["e", "f", "g"]);
    for decl in declarations {
        assert_eq!(ast.parent(decl.expr), Some(id));
    }
    assert_eq!(ast.describe(id), "let e = 99, f = 100, g = (e + f)");
}

#[test]
fn test_variable_dec_drops_malformed_declaration() {
    let lowered = lower_json(json!([{
        "type": "variable_dec",
        "declarations": [
            { "type": "integer", "value": 1 },
            { "type": "assignment", "name": "a", "expr": { "type": "integer", "value": 2 } }
        ]
    }]));
    let id = only_statement(&lowered);
    assert_eq!(lowered.ast.describe(id), "let a = 2");
    assert_eq!(lowered.diagnostics.len(), 1);
}

#[test]
fn test_assignment() {
    let lowered = lower_json(json!([{
        "type": "assignment",
        "name": "a",
        "expr": { "type": "identifier", "name": "b" }
    }]));
    let ast = &lowered.ast;
    let id = only_statement(&lowered);
    let NodeKind::Assignment { target, expr } = ast.kind(id) else {
        panic!("expected assignment");
    };
    assert_eq!(target, "a");
    assert_eq!(ast.parent(*expr), Some(id));
}

#[test]
fn test_if_with_and_without_else() {
    let lowered = lower_json(json!([
        {
            "type": "if",
            "evaluation": { "type": "integer", "value": 1 },
            "statements": [{ "type": "integer", "value": 99 }],
            "else_statements": [{ "type": "integer", "value": 100 }]
        },
        {
            "type": "if",
            "evaluation": { "type": "integer", "value": 0 },
            "statements": [{ "type": "integer", "value": 99 }]
        }
    ]));
    let ast = &lowered.ast;
    let stmts = ast.statements();
    assert_eq!(stmts.len(), 2);

    let NodeKind::If {
        evaluation,
        statements,
        else_statements,
    } = ast.kind(stmts[0])
    else {
        panic!("expected if");
    };
    assert_eq!(ast.parent(*evaluation), Some(stmts[0]));
    assert_eq!(statements.len(), 1);
    assert_eq!(else_statements.len(), 1);
    assert_eq!(ast.parent(statements[0]), Some(stmts[0]));
    assert_eq!(ast.parent(else_statements[0]), Some(stmts[0]));

    let NodeKind::If { else_statements, .. } = ast.kind(stmts[1]) else {
        panic!("expected if");
    };
    assert!(else_statements.is_empty());
    assert!(lowered.diagnostics.is_empty());
}

#[test]
fn test_print_binds_builtin_and_filters_untyped_params() {
    let lowered = lower_json(json!([{
        "type": "function",
        "fcn_name": "print",
        "params": [
            { "type": "identifier", "name": "e" },
            ",",
            { "type": "identifier", "name": "f" }
        ],
        "body": null
    }]));
    let ast = &lowered.ast;
    let id = only_statement(&lowered);

    let NodeKind::FunctionCall {
        name,
        params,
        callable,
    } = ast.kind(id)
    else {
        panic!("expected function");
    };
    assert_eq!(name, "print");
    assert_eq!(callable, &Callable::Builtin(Builtin::Print));
    assert_eq!(ast.parent(*params), Some(id));

    let NodeKind::Params(args) = ast.kind(*params) else {
        panic!("expected params");
    };
    assert_eq!(args.len(), 2);
    for arg in args {
        assert_eq!(ast.parent(*arg), Some(*params));
    }
    // The comma token is reported, not kept
    assert_eq!(lowered.diagnostics.len(), 1);
    assert_eq!(lowered.diagnostics[0].severity, Severity::Info);
}

#[test]
fn test_user_function_keeps_raw_body() {
    let body = json!([{ "type": "integer", "value": 1 }]);
    let lowered = lower_json(json!([{
        "type": "function",
        "fcn_name": "foo",
        "params": [],
        "body": body.clone()
    }]));
    let id = only_statement(&lowered);
    let NodeKind::FunctionCall { callable, .. } = lowered.ast.kind(id) else {
        panic!("expected function");
    };
    assert_eq!(callable, &Callable::Unlowered(parse_tree(body)));
}

#[test]
fn test_unknown_type_is_soft_failure() {
    let lowered = lower_json(json!([
        { "type": "while", "body": [] },
        { "type": "integer", "value": 5 }
    ]));
    let id = only_statement(&lowered);
    assert_eq!(lowered.ast.kind(id), &NodeKind::Value(5));
    assert_eq!(
        lowered.diagnostics,
        vec![Diagnostic {
            severity: Severity::Warning,
            message: "while is an invalid statement type".to_string(),
            tag: Some("while".to_string()),
        }]
    );
}

#[test]
fn test_unknown_operand_becomes_empty_node() {
    let lowered = lower_json(json!([{
        "type": "assignment",
        "name": "a",
        "expr": { "type": "lambda" }
    }]));
    let ast = &lowered.ast;
    let id = only_statement(&lowered);
    let NodeKind::Assignment { expr, .. } = ast.kind(id) else {
        panic!("expected assignment");
    };
    assert_eq!(ast.kind(*expr), &NodeKind::Empty);
    assert_eq!(ast.parent(*expr), Some(id));
    assert_eq!(lowered.diagnostics.len(), 1);
}

#[test]
fn test_malformed_integer_is_reported() {
    let lowered = lower_json(json!([{ "type": "integer" }]));
    assert!(lowered.ast.statements().is_empty());
    assert_eq!(lowered.diagnostics[0].tag.as_deref(), Some("integer"));
}

#[test]
fn test_every_node_except_root_has_a_parent() {
    let lowered = lower_json(json!([
        { "type": "variable_dec", "declarations": [
            { "type": "assignment", "name": "a", "expr": { "type": "integer", "value": 3 } }
        ] },
        { "type": "function", "fcn_name": "print", "params": [{
            "type": "if",
            "evaluation": { "type": "boolean_expr", "params": [
                { "type": "identifier", "name": "a" }, ">", { "type": "integer", "value": 2 }
            ] },
            "statements": [{ "type": "integer", "value": 1 }],
            "else_statements": [{ "type": "integer", "value": 2 }]
        }] }
    ]));
    let ast = &lowered.ast;
    for index in 0..ast.len() {
        let id = NodeId(index as u32);
        if id == ast.root() {
            assert_eq!(ast.parent(id), None);
        } else {
            assert!(ast.parent(id).is_some(), "node {id} has no parent");
            assert!(ast.ancestors(id).all(|ancestor| ancestor != id));
            assert_eq!(ast.ancestors(id).last(), Some(ast.root()));
        }
    }
}

#[test]
fn test_lowering_twice_is_identical() {
    let program = statements(json!([
        { "type": "variable_dec", "declarations": [
            { "type": "assignment", "name": "a", "expr": { "type": "integer", "value": 3 } }
        ] },
        { "type": "assignment", "name": "a", "expr": { "type": "arithmetic_expr", "params": [
            { "type": "identifier", "name": "a" }, "*", { "type": "integer", "value": 2 }
        ] } }
    ]));
    let first = lower(&program);
    let second = lower(&program);
    assert_eq!(first.ast, second.ast);
    assert_eq!(first.diagnostics, second.diagnostics);
}

#[test]
fn test_lower_tree_accepts_single_statement() {
    let lowered = lower_tree(&parse_tree(json!({ "type": "integer", "value": 1 })));
    assert_eq!(lowered.ast.statements().len(), 1);
}
