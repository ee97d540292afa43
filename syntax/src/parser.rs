use lazy_static::lazy_static;
use pest::Parser;
use pest::iterators::Pair;
use pest::pratt_parser::{Assoc, Op, PrattParser};
use pest_derive::Parser;
use sprig_core::parse_tree::ParseNode;
use tracing::debug;

use crate::error::SyntaxError;

lazy_static! {
    // Note: precedence is defined lowest to highest.
    static ref PRATT_PARSER: PrattParser<Rule> = PrattParser::new()
        // (lowest precedence)
        // Relational operators.
        .op(
            Op::infix(Rule::lt, Assoc::Left) |
            Op::infix(Rule::le, Assoc::Left) |
            Op::infix(Rule::gt, Assoc::Left) |
            Op::infix(Rule::ge, Assoc::Left) |
            Op::infix(Rule::eq, Assoc::Left) |
            Op::infix(Rule::neq, Assoc::Left)
        )                                               // `<`, `<=`, `>`, `>=`, `==`, `!=`

        // Arithmetic operators.
        .op(
            Op::infix(Rule::add, Assoc::Left) |
            Op::infix(Rule::sub, Assoc::Left)
        )                                               // `+`, `-`
        .op(
            Op::infix(Rule::mul, Assoc::Left) |
            Op::infix(Rule::div, Assoc::Left)
        )                                               // `*`, `/`
        // (highest precedence)
        ;
}

#[derive(Parser)]
#[grammar = "program.pest"]
pub struct ProgramParser;

/// Parse source text into the list of top-level parse nodes.
pub fn parse(source: &str) -> Result<Vec<ParseNode>, SyntaxError> {
    let mut pairs = ProgramParser::parse(Rule::program, source)?;
    let program = pairs.next().ok_or_else(|| {
        pest::error::Error::new_from_pos(
            pest::error::ErrorVariant::CustomError {
                message: "missing program pair".to_string(),
            },
            pest::Position::from_start(source),
        )
    })?;

    let mut statements = Vec::new();
    for pair in program.into_inner() {
        if pair.as_rule() != Rule::EOI {
            statements.push(parse_statement(pair)?);
        }
    }
    debug!(statements = statements.len(), "parsed program");
    Ok(statements)
}

fn parse_statement(pair: Pair<Rule>) -> Result<ParseNode, SyntaxError> {
    match pair.as_rule() {
        Rule::variable_dec => {
            let declarations = pair
                .into_inner()
                .filter(|p| p.as_rule() == Rule::declaration)
                .map(parse_assignment)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(ParseNode::record(
                "variable_dec",
                [("declarations", ParseNode::Seq(declarations))],
            ))
        }
        Rule::assignment => parse_assignment(pair),
        Rule::expression => parse_expr(pair),
        _ => Err(malformed(&pair, "expected a statement")),
    }
}

/// Both `name = expr` forms, inside and outside `let`.
fn parse_assignment(pair: Pair<Rule>) -> Result<ParseNode, SyntaxError> {
    let span_pair = pair.clone();
    let mut inner = pair.into_inner();
    let (Some(name), Some(expr)) = (inner.next(), inner.next()) else {
        return Err(malformed(&span_pair, "expected `name = expression`"));
    };
    Ok(ParseNode::record(
        "assignment",
        [
            ("name", ParseNode::token(name.as_str())),
            ("expr", parse_expr(expr)?),
        ],
    ))
}

/// Parse an `expression` pair.
///
/// Parenthesized operands of a binary operator stay wrapped as
/// `["(", inner, ")"]`; a parenthesized expression standing on its own is
/// returned unwrapped.
fn parse_expr(pair: Pair<Rule>) -> Result<ParseNode, SyntaxError> {
    if pair.as_rule() != Rule::expression {
        return Err(malformed(&pair, "expected an expression"));
    }
    let node = PRATT_PARSER
        .map_primary(parse_operand)
        .map_infix(|lhs, op, rhs| {
            let tag = match op.as_rule() {
                Rule::add | Rule::sub | Rule::mul | Rule::div => "arithmetic_expr",
                _ => "boolean_expr",
            };
            Ok(ParseNode::record(
                tag,
                [(
                    "params",
                    ParseNode::Seq(vec![lhs?, ParseNode::token(op.as_str()), rhs?]),
                )],
            ))
        })
        .parse(pair.into_inner())?;

    Ok(match node {
        ParseNode::Seq(mut items) if is_group(&items) => items.swap_remove(1),
        other => other,
    })
}

fn parse_operand(pair: Pair<Rule>) -> Result<ParseNode, SyntaxError> {
    match pair.as_rule() {
        Rule::integer => {
            let value = pair
                .as_str()
                .parse::<i64>()
                .map_err(|_| malformed(&pair, "integer literal out of range"))?;
            Ok(ParseNode::record("integer", [("value", ParseNode::Int(value))]))
        }

        Rule::identifier => Ok(ParseNode::record(
            "identifier",
            [("name", ParseNode::token(pair.as_str()))],
        )),

        Rule::group => {
            let Some(inner) = pair.clone().into_inner().next() else {
                return Err(malformed(&pair, "empty parentheses"));
            };
            Ok(ParseNode::Seq(vec![
                ParseNode::token("("),
                parse_expr(inner)?,
                ParseNode::token(")"),
            ]))
        }

        Rule::call => {
            let span_pair = pair.clone();
            let mut inner = pair.into_inner();
            let Some(name) = inner.next() else {
                return Err(malformed(&span_pair, "call without a name"));
            };
            let params = inner.map(parse_expr).collect::<Result<Vec<_>, _>>()?;
            Ok(ParseNode::record(
                "function",
                [
                    ("fcn_name", ParseNode::token(name.as_str())),
                    ("params", ParseNode::Seq(params)),
                    ("body", ParseNode::Null),
                ],
            ))
        }

        Rule::if_expr => {
            let span_pair = pair.clone();
            let mut inner = pair
                .into_inner()
                .filter(|p| !matches!(p.as_rule(), Rule::kw_if | Rule::kw_else));
            let (Some(evaluation), Some(then_block)) = (inner.next(), inner.next()) else {
                return Err(malformed(&span_pair, "expected `if condition { .. }`"));
            };

            let mut fields = vec![
                ("evaluation", parse_expr(evaluation)?),
                ("statements", parse_block(then_block)?),
            ];
            if let Some(else_block) = inner.next() {
                fields.push(("else_statements", parse_block(else_block)?));
            }
            Ok(ParseNode::record("if", fields))
        }

        _ => Err(malformed(&pair, "expected an operand")),
    }
}

fn parse_block(pair: Pair<Rule>) -> Result<ParseNode, SyntaxError> {
    let statements = pair
        .into_inner()
        .map(parse_statement)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(ParseNode::Seq(statements))
}

fn is_group(items: &[ParseNode]) -> bool {
    matches!(
        items,
        [open, _, close] if open.as_token() == Some("(") && close.as_token() == Some(")")
    )
}

fn malformed(pair: &Pair<Rule>, message: &str) -> SyntaxError {
    pest::error::Error::new_from_span(
        pest::error::ErrorVariant::CustomError {
            message: message.to_string(),
        },
        pair.as_span(),
    )
    .into()
}
