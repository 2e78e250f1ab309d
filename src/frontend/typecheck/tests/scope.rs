//! Scopes, free variables and incremental checking

use super::{assert_error, check_ok, type_of_var};
use crate::frontend::parser::ast::{ExprKind, FuncLiteral, StmtKind};
use crate::frontend::parser::{parse, LineParser};
use crate::frontend::typecheck::Checker;

fn func_literal(kind: &StmtKind) -> &FuncLiteral {
    match kind {
        StmtKind::Assign { right, .. } => match &right[0].kind {
            ExprKind::FuncLiteral(f) => f,
            other => panic!("expected function literal, got {:?}", other),
        },
        StmtKind::Simple(e) => match &e.kind {
            ExprKind::FuncLiteral(f) => f,
            other => panic!("expected function literal, got {:?}", other),
        },
        other => panic!("expected function literal, got {:?}", other),
    }
}

#[test]
fn test_free_variables() {
    let (_, file) = check_ok("x := 1\ny := 2\nf := func(a int) int {\n\tz := a\n\treturn x + z\n}\n");
    let f = func_literal(&file.stmts[2].kind);
    assert_eq!(f.ty.free_vars, vec!["x".to_string()]);
}

#[test]
fn test_free_variables_nested() {
    let (_, file) = check_ok(
        "x := 1\nouter := func() func() int {\n\ty := 2\n\treturn func() int {\n\t\treturn x + y\n\t}\n}\n",
    );
    let outer = func_literal(&file.stmts[1].kind);
    assert_eq!(outer.ty.free_vars, vec!["x".to_string()]);
}

#[test]
fn test_free_named_types() {
    let (_, file) = check_ok("type P struct {\n\tX int\n}\nf := func() int {\n\tvar p P\n\treturn p.X\n}\n");
    let f = func_literal(&file.stmts[1].kind);
    assert!(f.ty.free_vars.is_empty());
    assert_eq!(f.ty.free_mdik.len(), 1);
    assert_eq!(f.ty.free_mdik[0].name, "P");
}

#[test]
fn test_named_function_free_vars() {
    let (_, file) = check_ok("limit := 10\nfunc clamp(v int) int {\n\tif v > limit {\n\t\treturn limit\n\t}\n\treturn v\n}\n");
    let f = func_literal(&file.stmts[1].kind);
    assert_eq!(f.name, "clamp");
    assert_eq!(f.ty.free_vars, vec!["limit".to_string()]);
}

#[test]
fn test_shadowing() {
    let (checker, _) = check_ok("x := 1\nif true {\n\tx := \"s\"\n\ty := x + \"t\"\n}\nz := x + 1\n");
    assert_eq!(type_of_var(&checker, "z"), "int");
}

#[test]
fn test_variadic_calls() {
    let decl = "func sum(xs ...int) int {\n\tt := 0\n\tfor _, x := range xs {\n\t\tt += x\n\t}\n\treturn t\n}\n";
    let (checker, _) = check_ok(&format!("{}a := sum()\nb := sum(1, 2, 3)\nc := sum([]int{{1, 2}}...)\n", decl));
    assert_eq!(type_of_var(&checker, "a"), "int");
    assert_eq!(type_of_var(&checker, "sum"), "func(...int) int");
    assert_error(&format!("{}sum(1, \"a\")\n", decl), "cannot use");
    assert_error("func f(a int) {\n}\nf([]int{1}...)\n", "cannot use ... in call to non-variadic f");
}

#[test]
fn test_print_builtins() {
    check_ok("print()\nprint(1, \"a\", 2.5)\nprintf(\"%d\\n\", 3)\nerr := errorf(\"bad %s\", \"x\")\nvar e error = err\n");
}

#[test]
fn test_add_is_incremental() {
    let mut checker = Checker::new();
    let (mut file, errors) = parse("t.ng", "x := 1\ny := x + 1\n");
    assert!(errors.is_empty());
    for stmt in &mut file.stmts {
        checker.add(stmt).unwrap();
    }
    assert_eq!(checker.lookup("y").unwrap().ty.to_string(), "int");
}

#[test]
fn test_add_rolls_back_on_error() {
    let mut checker = Checker::new();
    let (mut file, _) = parse("t.ng", "a := 1\nb, c := 2, undefined\nd := 4\n");
    checker.add(&mut file.stmts[0]).unwrap();
    let errors = checker.add(&mut file.stmts[1]).unwrap_err();
    assert!(errors.to_string().contains("undeclared identifier: undefined"));
    assert!(checker.lookup("b").is_none());
    assert!(checker.lookup("a").is_some());
    checker.add(&mut file.stmts[2]).unwrap();
}

#[test]
fn test_line_parser_feeds_checker() {
    let mut parser = LineParser::new("repl");
    let mut checker = Checker::new();
    let mut stmts = Vec::new();
    for line in ["func double(n int) int {", "\treturn n * 2", "}", "v := double(21)"] {
        let result = parser.parse_line(line);
        assert!(result.errors.is_empty(), "{:?}", result.errors);
        stmts.extend(result.stmts);
    }
    for stmt in &mut stmts {
        checker.add(stmt).unwrap();
    }
    assert_eq!(checker.lookup("v").unwrap().ty.to_string(), "int");
}

#[test]
fn test_types_with_prefix() {
    let (checker, _) = check_ok("count := 1\ncounter := 2\ntype Coord int\n");
    assert_eq!(checker.types_with_prefix("coun"), vec!["count", "counter"]);
    let names = checker.types_with_prefix("co");
    assert!(names.contains(&"complex".to_string()));
    assert!(names.contains(&"copy".to_string()));
    assert!(!names.contains(&"Coord".to_string()));
}
