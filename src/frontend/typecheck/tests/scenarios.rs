//! End-to-end checking of whole programs

use std::sync::Arc;

use super::{assert_error, check_ok, type_of_var};
use crate::frontend::module::PackageCache;
use crate::frontend::parser::ast::{ExprKind, File, StmtKind};
use crate::frontend::parser::parse;
use crate::frontend::parser::walk::{walk, Node};
use crate::frontend::typecheck::Checker;
use crate::frontend::types::{equal, Basic, Type};

#[test]
fn test_num_specialization() {
    let (checker, file) = check_ok(
        "func max(x, y num) num {\n\tif x > y {\n\t\treturn x\n\t}\n\treturn y\n}\n\
         a := max(int32(3), int32(4))\n",
    );
    let Some(Type::Func(max)) = checker.lookup("max").map(|o| o.ty.clone()) else {
        panic!("max is not a function");
    };
    assert_eq!(max.spec.num, Some(Basic::Num));
    assert_eq!(type_of_var(&checker, "a"), "int32");

    let StmtKind::Assign { right, .. } = &file.stmts[1].kind else {
        panic!("expected assignment");
    };
    let ExprKind::Call { func, .. } = &right[0].kind else {
        panic!("expected call");
    };
    assert_eq!(checker.type_of(func).map(ToString::to_string).as_deref(), Some("func(int32, int32) int32"));
}

#[test]
fn test_num_specialization_untyped() {
    let decl = "func max(x, y num) num {\n\tif x > y {\n\t\treturn x\n\t}\n\treturn y\n}\n";
    let (checker, _) = check_ok(&format!("{}a := max(1, 2.5)\nb := max(1, 2)\n", decl));
    assert_eq!(type_of_var(&checker, "a"), "float64");
    assert_eq!(type_of_var(&checker, "b"), "int");
    assert_error(&format!("{}c := max(\"a\", \"b\")\n", decl), "cannot");
}

#[test]
fn test_comma_ok_map_index() {
    let (checker, file) = check_ok("m := map[string]int{\"a\": 1}\nv, ok := m[\"a\"]\n");
    assert_eq!(type_of_var(&checker, "v"), "int");
    assert_eq!(type_of_var(&checker, "ok"), "bool");
    let StmtKind::Assign { right, .. } = &file.stmts[1].kind else {
        panic!("expected assignment");
    };
    assert!(matches!(right[0].kind, ExprKind::Index { .. }));
    assert_eq!(checker.type_of(&right[0]).map(ToString::to_string).as_deref(), Some("(int, bool)"));
}

#[test]
fn test_comma_ok_forms() {
    let (checker, _) = check_ok(
        "c := make(chan string)\ns, open := <-c\nvar i interface{}\nn, isInt := i.(int)\n",
    );
    assert_eq!(type_of_var(&checker, "s"), "string");
    assert_eq!(type_of_var(&checker, "open"), "bool");
    assert_eq!(type_of_var(&checker, "n"), "int");
    assert_eq!(type_of_var(&checker, "isInt"), "bool");
}

#[test]
fn test_error_elision() {
    let (checker, file) = check_ok(
        "func parseInt(s string) (int, error) {\n\treturn 42, nil\n}\nx := parseInt(\"42\")\n",
    );
    assert_eq!(type_of_var(&checker, "x"), "int");
    let StmtKind::Assign { right, .. } = &file.stmts[1].kind else {
        panic!("expected assignment");
    };
    assert!(matches!(right[0].kind, ExprKind::Call { elide_error: true, .. }));
}

#[test]
fn test_no_elision_with_both_values() {
    let (checker, file) = check_ok(
        "func parseInt(s string) (int, error) {\n\treturn 42, nil\n}\nx, err := parseInt(\"42\")\n",
    );
    assert_eq!(type_of_var(&checker, "err"), "error");
    let StmtKind::Assign { right, .. } = &file.stmts[1].kind else {
        panic!("expected assignment");
    };
    assert!(matches!(right[0].kind, ExprKind::Call { elide_error: false, .. }));
}

#[test]
fn test_elision_into_named_result() {
    assert_error(
        "func parseInt(s string) (int, error) {\n\treturn 42, nil\n}\n\
         func f() (n int, err error) {\n\tn = parseInt(\"1\")\n\treturn\n}\n",
        "cannot elide error into named result n",
    );
}

#[test]
fn test_define_elision_into_named_result() {
    assert_error(
        "func two() (int, int, error) {\n\treturn 1, 2, nil\n}\n\
         func f() (n int) {\n\tn, m := two()\n\tprint(m)\n\treturn\n}\n",
        "cannot elide error into named result n",
    );
    // A new variable that shadows nothing is fine.
    check_ok(
        "func two() (int, int, error) {\n\treturn 1, 2, nil\n}\n\
         func f() (n int) {\n\ta, b := two()\n\treturn a + b\n}\n",
    );
}

#[test]
fn test_error_elision_in_expressions() {
    let (checker, file) = check_ok(
        "func parseInt(s string) (int, error) {\n\treturn 42, nil\n}\n\
         func g(n int) int {\n\treturn n\n}\n\
         y := parseInt(\"42\") + 1\nz := g(parseInt(\"42\"))\nw := g(1) * parseInt(\"7\")\n",
    );
    assert_eq!(type_of_var(&checker, "y"), "int");
    assert_eq!(type_of_var(&checker, "z"), "int");
    assert_eq!(type_of_var(&checker, "w"), "int");

    let StmtKind::Assign { right, .. } = &file.stmts[3].kind else {
        panic!("expected assignment");
    };
    let ExprKind::Call { args, .. } = &right[0].kind else {
        panic!("expected call");
    };
    assert!(matches!(args[0].kind, ExprKind::Call { elide_error: true, .. }));
    assert_eq!(checker.type_of(&args[0]).map(ToString::to_string).as_deref(), Some("int"));
    let untyped = untyped_exprs(&checker, &file);
    assert!(untyped.is_empty(), "untyped expressions: {:?}", untyped);
}

#[test]
fn test_no_elision_of_other_results() {
    let two = "func two() (int, string) {\n\treturn 1, \"a\"\n}\n";
    assert_error(&format!("{}y := two() + 1\n", two), "multiple-value two() in single-value context");
    assert_error(
        &format!("{}func g(n int) int {{\n\treturn n\n}}\nz := g(two())\n", two),
        "too many arguments in call to g",
    );
}

#[test]
fn test_generic_named_type() {
    let (checker, _) = check_ok(
        "type P struct {\n\tX num\n}\n\
         p := P{X: int32(3)}\nq := P{X: int32(4)}\nx := p.X\nr := P{X: 2.5}\nf := r.X\n",
    );
    assert_eq!(type_of_var(&checker, "x"), "int32");
    assert_eq!(type_of_var(&checker, "f"), "float64");

    let ty = |name: &str| checker.lookup(name).map(|o| o.ty.clone()).unwrap_or_else(Type::invalid);
    assert!(equal(&ty("p"), &ty("q")));
    assert!(!equal(&ty("p"), &ty("r")));
    let (Type::Named(generic), Type::Named(p)) = (ty("P"), ty("p")) else {
        panic!("expected named types");
    };
    assert!(generic.is_generic());
    assert_eq!(p.spec.read().num, Some(Basic::Int32));
    assert_eq!(p.origin(), generic.id());
}

#[test]
fn test_generic_named_parameter() {
    let (checker, _) = check_ok(
        "type P struct {\n\tX num\n}\n\
         func getX(p P) num {\n\treturn p.X\n}\n\
         p := P{X: int64(3)}\ny := getX(p)\n",
    );
    assert_eq!(type_of_var(&checker, "y"), "int64");
}

#[test]
fn test_interface_satisfaction() {
    let writer = "var w interface {\n\tWrite(b []byte) (int, error)\n} = W{}\n";
    check_ok(&format!(
        "type W methodik struct{{ S string }} {{\n\tfunc (w) Write(b []byte) (int, error) {{\n\t\treturn len(b), nil\n\t}}\n}}\n{}",
        writer
    ));
    assert_error(
        &format!("type W methodik struct{{ S string }} {{\n}}\n{}", writer),
        "missing method Write",
    );
}

#[test]
fn test_shell_single_value() {
    let (checker, file) = check_ok("s := $$ echo hi $$\n");
    assert_eq!(type_of_var(&checker, "s"), "string");
    let StmtKind::Assign { right, .. } = &file.stmts[0].kind else {
        panic!("expected assignment");
    };
    let ExprKind::Shell(sh) = &right[0].kind else {
        panic!("expected shell expression");
    };
    assert!(sh.elide_error);
}

#[test]
fn test_shell_two_values() {
    let (checker, file) = check_ok("s, err := $$ echo hi $$\n");
    assert_eq!(type_of_var(&checker, "s"), "string");
    assert_eq!(type_of_var(&checker, "err"), "error");
    let StmtKind::Assign { right, .. } = &file.stmts[0].kind else {
        panic!("expected assignment");
    };
    let ExprKind::Shell(sh) = &right[0].kind else {
        panic!("expected shell expression");
    };
    assert!(!sh.elide_error);
    assert_eq!(checker.type_of(&right[0]).map(ToString::to_string).as_deref(), Some("(string, error)"));
}

#[test]
fn test_cyclic_import() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.ng"), "import \"b.ng\"\n").unwrap();
    std::fs::write(dir.path().join("b.ng"), "import \"a.ng\"\n").unwrap();

    let cache = Arc::new(PackageCache::new());
    let mut checker = Checker::new().with_cache(cache.clone());
    let errors = checker.check(&dir.path().join("a.ng")).unwrap_err();
    let message = errors.to_string();
    assert!(message.contains("package import cycle: a.ng -> b.ng -> a.ng"), "{}", message);
    assert!(cache.is_empty());
}

/// Expressions the checker left without a type
fn untyped_exprs(
    checker: &Checker,
    file: &File,
) -> Vec<String> {
    let mut untyped = Vec::new();
    walk(
        file,
        |cursor| {
            if let Node::Expr(e) = cursor.node {
                if checker.type_of(e).is_none() {
                    untyped.push(e.to_string());
                }
            }
            true
        },
        |_| {},
    );
    untyped
}

#[test]
fn test_every_checked_expression_has_a_type() {
    let (checker, file) = check_ok(
        "x := 1 + 2\ny := []int{x, 3}\nz := len(y) * x\nf := func(a int) int {\n\treturn a + z\n}\nw := f(x)\nprint(w)\n",
    );
    let untyped = untyped_exprs(&checker, &file);
    assert!(untyped.is_empty(), "untyped expressions: {:?}", untyped);
}

#[test]
fn test_bindings_keys_and_blanks_have_types() {
    let (checker, file) = check_ok(
        "type W struct {\n\tS string\n}\nw := W{S: \"x\"}\n\
         var i interface{}\nswitch t := i.(type) {\ncase int:\n\tprint(t)\n}\n\
         func f(n int) int {\n\treturn n\n}\n_ = f(2)\n_ := f(3)\n\
         for _ = range []int{1} {\n}\n",
    );
    let untyped = untyped_exprs(&checker, &file);
    assert!(untyped.is_empty(), "untyped expressions: {:?}", untyped);
    assert_eq!(type_of_var(&checker, "w"), "W");
}

#[test]
fn test_check_is_idempotent() {
    let src = "x := 1 + 2.5\ns := []string{\"a\"}\nn := len(s)\nf := func() float64 {\n\treturn x\n}\n";
    let (first, mut file) = check_ok(src);
    let mut second = Checker::new();
    second.check_file(&mut file).unwrap();
    for name in ["x", "s", "n", "f"] {
        assert_eq!(type_of_var(&first, name), type_of_var(&second, name));
    }

    let (mut fresh, _) = parse("t.ng", src);
    let mut third = Checker::new();
    third.check_file(&mut fresh).unwrap();
    assert_eq!(type_of_var(&third, "f"), "func() float64");
}
