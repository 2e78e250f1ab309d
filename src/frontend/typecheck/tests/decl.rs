//! Declarations: types, methodiks, functions and variables

use super::{assert_error, check_ok, type_of_var};
use crate::frontend::typecheck::ObjKind;

#[test]
fn test_var_declarations() {
    let (checker, _) = check_ok("var a int\nvar b, c = 1, \"s\"\nvar (\n\td float32\n\te = 2.5\n)\n");
    assert_eq!(type_of_var(&checker, "a"), "int");
    assert_eq!(type_of_var(&checker, "b"), "int");
    assert_eq!(type_of_var(&checker, "c"), "string");
    assert_eq!(type_of_var(&checker, "d"), "float32");
    assert_eq!(type_of_var(&checker, "e"), "float64");
}

#[test]
fn test_var_declaration_errors() {
    assert_error("var a int = \"s\"\n", "cannot use");
    assert_error("var a, b = 1\n", "assignment count mismatch");
}

#[test]
fn test_const_declarations() {
    let (checker, _) = check_ok("const (\n\ta = 1\n\tb int8 = 2\n)\n");
    let b = checker.lookup("b").unwrap();
    assert_eq!(b.kind, ObjKind::Const);
    assert_eq!(b.ty.to_string(), "int8");
    assert_error("x := 1\nconst c = x\n", "is not a constant");
}

#[test]
fn test_redeclaration() {
    assert_error("x := 1\nvar x int\n", "x redeclared in this block");
    assert_error("x := 1\nx := 2\n", "no new variables");
    check_ok("x := 1\nx, y := 2, 3\n");
}

#[test]
fn test_type_declaration() {
    let (checker, _) = check_ok("type Celsius float64\nvar c Celsius = 36.6\nf := float64(c)\n");
    assert_eq!(type_of_var(&checker, "c"), "Celsius");
    assert_eq!(type_of_var(&checker, "f"), "float64");
    assert_eq!(checker.lookup("Celsius").unwrap().kind, ObjKind::Type);
}

#[test]
fn test_named_types_are_distinct() {
    assert_error(
        "type A int\ntype B int\nvar a A = 1\nvar b B = a\n",
        "cannot use a (type A) as type B",
    );
}

#[test]
fn test_recursive_types() {
    check_ok("type Node struct {\n\tNext *Node\n\tVal int\n}\nvar n Node\nv := n.Next.Val\n");
    assert_error("type T struct {\n\tt T\n}\n", "invalid recursive type T");
}

#[test]
fn test_struct_fields() {
    let (checker, _) = check_ok(
        "type P struct {\n\tX, Y int\n\tName string\n}\np := P{X: 1, Y: 2}\nx := p.X\nn := p.Name\n",
    );
    assert_eq!(type_of_var(&checker, "x"), "int");
    assert_eq!(type_of_var(&checker, "n"), "string");
    assert_error("type P struct {\n\tX int\n}\np := P{}\nz := p.Z\n", "has no field or method Z");
}

#[test]
fn test_func_declaration() {
    let (checker, _) = check_ok("func add(a, b int) int {\n\treturn a + b\n}\nx := add(1, 2)\n");
    assert_eq!(type_of_var(&checker, "add"), "func(int, int) int");
    assert_eq!(type_of_var(&checker, "x"), "int");
}

#[test]
fn test_recursive_func() {
    check_ok("func fib(n int) int {\n\tif n < 2 {\n\t\treturn n\n\t}\n\treturn fib(n-1) + fib(n-2)\n}\n");
}

#[test]
fn test_call_errors() {
    let decl = "func f(a int, b string) {\n}\n";
    assert_error(&format!("{}f(1)\n", decl), "not enough arguments in call to f");
    assert_error(&format!("{}f(1, \"a\", 2)\n", decl), "too many arguments in call to f");
    assert_error(&format!("{}f(\"a\", \"b\")\n", decl), "cannot use");
    assert_error("x := 1\nx()\n", "cannot call non-function");
}

#[test]
fn test_return_errors() {
    assert_error("func f() int {\n\treturn\n}\n", "not enough return values");
    assert_error("func f() {\n\treturn 1\n}\n", "too many return values");
    check_ok("func f() (n int) {\n\tn = 2\n\treturn\n}\n");
}

#[test]
fn test_methodik_methods() {
    let (checker, _) = check_ok(
        "methodik Counter struct {\n\tN int\n} {\n\
         \tfunc (c *) Inc() {\n\t\tc.N++\n\t}\n\
         \tfunc (c) Get() int {\n\t\treturn c.N\n\t}\n\
         }\n\
         c := &Counter{}\nc.Inc()\nn := c.Get()\n",
    );
    assert_eq!(type_of_var(&checker, "n"), "int");
    assert_eq!(type_of_var(&checker, "c"), "*Counter");
}

#[test]
fn test_methodik_duplicate_method() {
    assert_error(
        "methodik M int {\n\tfunc (m) F() {\n\t}\n\tfunc (m) F() {\n\t}\n}\n",
        "M.F redeclared",
    );
}

#[test]
fn test_type_methodik_form() {
    let (checker, _) = check_ok("type T methodik int {\n\tfunc (t) Double() int { return int(t) * 2 }\n}\nvar t T = 3\nd := t.Double()\n");
    assert_eq!(type_of_var(&checker, "d"), "int");
}

#[test]
fn test_interface_satisfaction() {
    let src = "type Stringer interface {\n\tString() string\n}\n\
               methodik Name string {\n\tfunc (n) String() string {\n\t\treturn string(n)\n\t}\n}\n";
    check_ok(&format!("{}var s Stringer = Name(\"x\")\nt := s.String()\n", src));
    assert_error(
        &format!("{}var s Stringer = 1.5\n", src),
        "float64 does not implement Stringer (missing method String)",
    );
    assert_error(
        "type Stringer interface {\n\tString() string\n}\nvar s Stringer = \"plain\"\n",
        "does not implement",
    );
}

#[test]
fn test_interface_pointer_receiver() {
    assert_error(
        "type Resetter interface {\n\tReset()\n}\n\
         methodik R int {\n\tfunc (r *) Reset() {\n\t}\n}\n\
         var x Resetter = R(1)\n",
        "method Reset has pointer receiver",
    );
    check_ok(
        "type Resetter interface {\n\tReset()\n}\n\
         methodik R int {\n\tfunc (r *) Reset() {\n\t}\n}\n\
         r := R(1)\nvar x Resetter = &r\n",
    );
}

#[test]
fn test_interface_missing_method() {
    assert_error(
        "type Closer interface {\n\tClose() error\n}\ntype F int\nvar c Closer = F(1)\n",
        "missing method Close",
    );
}

#[test]
fn test_interface_rejects_num() {
    assert_error("type I interface {\n\tAdd(x num) num\n}\n", "cannot use num");
}

#[test]
fn test_error_interface() {
    check_ok("methodik E struct{} {\n\tfunc (e) Error() string {\n\t\treturn \"e\"\n\t}\n}\nvar err error = E{}\nmsg := err.Error()\n");
}

#[test]
fn test_type_alias() {
    let (checker, _) = check_ok("type Bytes = []byte\nvar b Bytes\nvar c []byte = b\n");
    assert_eq!(type_of_var(&checker, "c"), "[]uint8");
}

#[test]
fn test_not_a_type() {
    assert_error("x := 1\nvar y x\n", "x is not a type");
}
