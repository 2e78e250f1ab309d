//! Expression parsing tests

use super::*;
use crate::frontend::lexer::tokens::{Literal, TokenKind};
use crate::frontend::parser::parse_expr;
use crate::frontend::types::{ChanDir, Type};

fn expr(src: &str) -> Expr {
    let (e, errors) = parse_expr(src);
    assert!(errors.is_empty(), "unexpected errors for {:?}: {:?}", src, errors);
    e
}

/// Parse, print and re-parse; the printed forms must agree
fn round_trip(src: &str) {
    let first = expr(src).to_string();
    let second = expr(&first).to_string();
    assert_eq!(first, second, "round trip of {:?}", src);
}

#[test]
fn test_parse_literals() {
    assert!(matches!(expr("42").kind, ExprKind::BasicLiteral(Literal::Int(_))));
    assert!(matches!(expr("3.14").kind, ExprKind::BasicLiteral(Literal::Float(_))));
    assert!(matches!(expr("2i").kind, ExprKind::BasicLiteral(Literal::Imaginary(_))));
    assert!(matches!(expr("\"hi\"").kind, ExprKind::BasicLiteral(Literal::String(_))));
    assert!(matches!(expr("'x'").kind, ExprKind::BasicLiteral(Literal::Rune('x'))));
}

#[test]
fn test_precedence() {
    let e = expr("1 + 2 * 3");
    let ExprKind::Binary { op, right, .. } = &e.kind else {
        panic!("expected binary, got {:?}", e.kind);
    };
    assert_eq!(*op, TokenKind::Add);
    assert!(matches!(right.kind, ExprKind::Binary { op: TokenKind::Mul, .. }));

    assert_eq!(expr("a || b && c == d").to_string(), "a || b && c == d");
    assert_eq!(expr("(a + b) * c").to_string(), "(a + b) * c");
    assert_eq!(expr("a - (b - c)").to_string(), "a - (b - c)");
    assert_eq!(expr("2 ^ 3 * 4").to_string(), "2 ^ 3 * 4");
}

#[test]
fn test_unary_binds_tighter() {
    let e = expr("-x * y");
    let ExprKind::Binary { left, .. } = &e.kind else {
        panic!("expected binary");
    };
    assert!(matches!(left.kind, ExprKind::Unary { op: TokenKind::Sub, .. }));
    assert!(matches!(expr("<-ch").kind, ExprKind::Unary { op: TokenKind::ChanOp, .. }));
    assert!(matches!(expr("&x").kind, ExprKind::Unary { op: TokenKind::Ref, .. }));
}

#[test]
fn test_selector_index_call() {
    let e = expr("a.b[1](x, y...)");
    let ExprKind::Call {
        func,
        args,
        ellipsis,
        ..
    } = &e.kind
    else {
        panic!("expected call");
    };
    assert_eq!(args.len(), 2);
    assert!(*ellipsis);
    assert!(matches!(func.kind, ExprKind::Index { .. }));
}

#[test]
fn test_slice_expressions() {
    let e = expr("s[1:2:3]");
    let ExprKind::Index { indices, .. } = &e.kind else {
        panic!("expected index");
    };
    assert!(matches!(
        indices[0].kind,
        ExprKind::Slice {
            low: Some(_),
            high: Some(_),
            max: Some(_)
        }
    ));
    let e = expr("t[:, 1]");
    let ExprKind::Index { indices, .. } = &e.kind else {
        panic!("expected index");
    };
    assert_eq!(indices.len(), 2);
    assert!(matches!(indices[0].kind, ExprKind::Slice { low: None, high: None, .. }));
}

#[test]
fn test_type_assertion() {
    let e = expr("x.(int)");
    assert!(matches!(e.kind, ExprKind::TypeAssert { ty: Some(_), .. }));
}

#[test]
fn test_composite_literals() {
    assert!(matches!(expr("Point{1, 2}").kind, ExprKind::CompLiteral { .. }));
    assert!(matches!(expr("[]int{1, 2}").kind, ExprKind::SliceLiteral { .. }));
    assert!(matches!(expr("[...]int{1, 2}").kind, ExprKind::ArrayLiteral { .. }));
    assert!(matches!(expr("map[string]int{\"a\": 1}").kind, ExprKind::MapLiteral { .. }));
    assert!(matches!(expr("pkg.T{X: 1}").kind, ExprKind::CompLiteral { .. }));

    let e = expr("[][]int{{1}, {2, 3}}");
    let ExprKind::SliceLiteral { values, .. } = &e.kind else {
        panic!("expected slice literal");
    };
    let ExprKind::CompLiteral { ty, values: inner, .. } = &values[1].kind else {
        panic!("expected elided literal");
    };
    assert!(ty.is_invalid());
    assert_eq!(inner.len(), 2);
}

#[test]
fn test_table_literal() {
    let e = expr("[|]int{{|\"a\", \"b\"|}, {1, 2}, {3, 4}}");
    let ExprKind::TableLiteral {
        ty,
        col_names,
        rows,
    } = &e.kind
    else {
        panic!("expected table literal, got {:?}", e.kind);
    };
    assert!(matches!(ty, Type::Table(_)));
    assert_eq!(col_names.len(), 2);
    assert_eq!(rows.len(), 2);
}

#[test]
fn test_mixed_keys_rejected() {
    let (_, errors) = parse_expr("T{a: 1, 2}");
    assert!(!errors.is_empty());
}

#[test]
fn test_func_literal() {
    let e = expr("func(a, b int, s ...string) (n int, err error) { return }");
    let ExprKind::FuncLiteral(func) = &e.kind else {
        panic!("expected func literal");
    };
    assert_eq!(func.param_names, vec!["a", "b", "s"]);
    assert_eq!(func.result_names, vec!["n", "err"]);
    assert!(func.ty.variadic);
    assert!(matches!(func.ty.params[2], Type::Slice(_)));
}

#[test]
fn test_bare_result_names_are_types() {
    let e = expr("func() (a, b, c) {}");
    let ExprKind::FuncLiteral(func) = &e.kind else {
        panic!("expected func literal");
    };
    assert_eq!(func.ty.results.len(), 3);
    assert!(func.result_names.is_empty());
    assert_eq!(func.ty.results[0], Type::unresolved("a"));
}

#[test]
fn test_types_in_expressions() {
    let e = expr("make(chan<- int, 2)");
    let ExprKind::Call { args, .. } = &e.kind else {
        panic!("expected call");
    };
    let ExprKind::TypeExpr(Type::Chan(dir, _)) = &args[0].kind else {
        panic!("expected chan type");
    };
    assert_eq!(*dir, ChanDir::Send);
}

#[test]
fn test_array_length_must_be_literal() {
    let (_, errors) = parse_expr("[n]int{}");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("array length"));
}

#[test]
fn test_misplaced_ellipsis() {
    let (_, errors) = parse_expr("func(a ...int, b int) {}");
    assert!(errors.iter().any(|d| d.message.contains("final parameter")));
}

#[test]
fn test_expression_round_trip() {
    for src in [
        "a + b*c - d",
        "-(-x)",
        "f(x)(y)[z].w",
        "x.(T)",
        "[]int{1, 2, 3}",
        "map[string][]int{\"a\": {1}, \"b\": nil}",
        "func(x int) int { return x * 2 }",
        "s[1:]",
        "\"tab\\tnewline\\n\"",
        "'\\''",
        "1.0",
        "struct{X int; Y string}{1, \"y\"}",
        "$$ echo hi | grep h $$",
    ] {
        round_trip(src);
    }
}

#[test]
fn test_every_expression_has_an_id() {
    let a = expr("x");
    let b = expr("x");
    assert_ne!(a.id, b.id);
}
