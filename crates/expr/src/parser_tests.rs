// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn eval(input: &str) -> f64 {
    parse(input).unwrap().evaluate().unwrap()
}

#[yare::parameterized(
    precedence = { "2+2*2", 6.0 },
    parens_override = { "(2+2)*2", 8.0 },
    chained_mul = { "6*6*5", 180.0 },
    mixed = { "(380-54)/2", 163.0 },
    left_assoc_sub = { "2-3-4", -5.0 },
    left_assoc_div = { "8/4/2", 1.0 },
    whitespace = { " 1 + 2 * 3 ", 7.0 },
    decimals = { "1.5*2", 3.0 },
    single_literal = { "42", 42.0 },
    redundant_parens = { "((((5))))", 5.0 },
)]
fn parses_and_evaluates(input: &str, expected: f64) {
    assert_eq!(eval(input), expected);
}

#[test]
fn builds_left_leaning_tree() {
    let ast = parse("1-2-3").unwrap();
    let expected = Ast::BinOp {
        op: Operator::Sub,
        left: Box::new(Ast::BinOp {
            op: Operator::Sub,
            left: Box::new(Ast::Number(1.0)),
            right: Box::new(Ast::Number(2.0)),
        }),
        right: Box::new(Ast::Number(3.0)),
    };
    assert_eq!(ast, expected);
}

#[test]
fn mul_binds_tighter_than_add() {
    let ast = parse("2+3*4").unwrap();
    match ast {
        Ast::BinOp { op: Operator::Add, right, .. } => match *right {
            Ast::BinOp { op: Operator::Mul, .. } => {}
            other => panic!("expected mul on the right, got {:?}", other),
        },
        other => panic!("expected add at the root, got {:?}", other),
    }
}

#[yare::parameterized(
    trailing_op = { "2+" },
    leading_op = { "*2" },
    adjacent_ops = { "2+*3" },
    adjacent_numbers = { "1.2.3" },
    open_paren = { "(2+3" },
    close_paren = { "2+3)" },
    empty_parens = { "()" },
    lone_paren = { "(" },
)]
fn rejects_malformed(input: &str) {
    assert!(parse(input).is_err(), "expected parse failure for {:?}", input);
}

#[test]
fn deep_nesting_parses() {
    let mut text = String::new();
    for _ in 0..64 {
        text.push('(');
    }
    text.push('7');
    for _ in 0..64 {
        text.push(')');
    }
    assert_eq!(eval(&text), 7.0);
}

#[test]
fn unbalanced_close_reports_unexpected_token() {
    assert_eq!(
        parse("2)3"),
        Err(ParseError::UnexpectedToken { found: ")".to_string(), pos: 1 })
    );
}
