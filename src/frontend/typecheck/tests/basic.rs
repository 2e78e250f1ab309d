//! Constants, untyped values and operators

use super::{assert_error, check_errors, check_ok, type_of_var};

#[test]
fn test_untyped_defaults() {
    let (checker, _) = check_ok("a := 1\nb := 2.5\nc := 'x'\nd := \"s\"\ne := true\nf := 1i\n");
    assert_eq!(type_of_var(&checker, "a"), "int");
    assert_eq!(type_of_var(&checker, "b"), "float64");
    assert_eq!(type_of_var(&checker, "c"), "int32");
    assert_eq!(type_of_var(&checker, "d"), "string");
    assert_eq!(type_of_var(&checker, "e"), "bool");
    assert_eq!(type_of_var(&checker, "f"), "complex128");
}

#[test]
fn test_mixed_untyped_constants() {
    let (checker, _) = check_ok("x := 1 + 2.5\n");
    assert_eq!(type_of_var(&checker, "x"), "float64");
}

#[test]
fn test_constant_folding() {
    let (checker, _) = check_ok("const c = 2^10 + 3\n");
    let obj = checker.lookup("c").unwrap();
    assert_eq!(obj.value.as_ref().and_then(|v| v.as_i64()), Some(1027));
    assert_eq!(obj.ty.to_string(), "untyped integer");
}

#[test]
fn test_const_value_recorded() {
    let (checker, file) = check_ok("x := 6 * 7\n");
    let crate::frontend::parser::ast::StmtKind::Assign { right, .. } = &file.stmts[0].kind else {
        panic!("expected assignment");
    };
    let value = checker.const_value(&right[0]).and_then(|v| v.as_i64());
    assert_eq!(value, Some(42));
}

#[test]
fn test_int64_bounds() {
    check_ok("var a int64 = 2^63 - 1\n");
    assert_error("var a int64 = 2^63\n", "overflows int64");
}

#[test]
fn test_small_int_bounds() {
    check_ok("var a int8 = -128\nvar b uint8 = 255\n");
    assert_error("var a int8 = 128\n", "overflows int8");
    assert_error("var b uint8 = -1\n", "overflows uint8");
}

#[test]
fn test_float_overflow() {
    check_ok("var f float64 = 1e300\n");
    assert_error("var f float64 = 1e400\n", "overflows float64");
    assert_error("var g float32 = 1e40\n", "overflows float32");
}

#[test]
fn test_truncation() {
    assert_error("var i int = 2.5\n", "truncated");
    check_ok("var i int = 2.0\n");
}

#[test]
fn test_division_by_zero() {
    assert_error("x := 1 / 0\n", "division by zero");
}

#[test]
fn test_mismatched_types() {
    assert_error(
        "var a int = 1\nvar b float64 = 2\nc := a + b\n",
        "mismatched types int and float64",
    );
}

#[test]
fn test_typed_untyped_operand() {
    let (checker, _) = check_ok("var a int32 = 1\nb := a + 2\n");
    assert_eq!(type_of_var(&checker, "b"), "int32");
}

#[test]
fn test_nil_comparison() {
    assert_error("b := nil == nil\n", "invalid comparison");
    check_ok("var p *int\nb := p == nil\n");
}

#[test]
fn test_untyped_nil_assignment() {
    assert_error("x := nil\n", "use of untyped nil");
}

#[test]
fn test_blank_as_value() {
    assert_error("x := _\n", "used as value");
}

#[test]
fn test_non_bool_condition() {
    assert_error("if 1 {\n}\n", "non-bool");
}

#[test]
fn test_comparison_is_untyped_bool() {
    let (checker, _) = check_ok("a := 1\nb := a < 2\n");
    assert_eq!(type_of_var(&checker, "b"), "bool");
}

#[test]
fn test_string_concat() {
    let (checker, _) = check_ok("s := \"a\" + \"b\"\nt := s + \"c\"\n");
    assert_eq!(type_of_var(&checker, "t"), "string");
    assert!(!check_errors("u := \"a\" + 1\n").is_empty());
}

#[test]
fn test_conversion() {
    let (checker, _) = check_ok("a := 3\nf := float64(a)\ns := string('x')\n");
    assert_eq!(type_of_var(&checker, "f"), "float64");
    assert_eq!(type_of_var(&checker, "s"), "string");
    assert_error("b := []int{1}\nc := int(b)\n", "cannot convert");
}

#[test]
fn test_builtins() {
    let (checker, _) = check_ok(
        "s := make([]int, 3)\nn := len(s)\ns = append(s, 1, 2)\nm := map[string]int{}\ndelete(m, \"k\")\nc := cap(s)\n",
    );
    assert_eq!(type_of_var(&checker, "n"), "int");
    assert_eq!(type_of_var(&checker, "c"), "int");
    assert_error("x := 1\nx = append(x, 1)\n", "first argument to append must be slice");
}

#[test]
fn test_undeclared() {
    assert_error("y := x + 1\n", "undeclared identifier: x");
}

#[test]
fn test_overflow_message_is_brief() {
    let errors = check_errors("var f float64 = 1e400\n");
    assert!(errors.iter().any(|e| e.contains("1e+400")), "{:?}", errors);
    assert!(errors.iter().all(|e| e.len() < 200), "{:?}", errors);
}
