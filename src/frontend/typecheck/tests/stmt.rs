//! Control flow statements

use super::{assert_error, check_ok};

#[test]
fn test_labels() {
    check_ok(
        "Outer:\nfor i := 0; i < 3; i++ {\n\tfor j := 0; j < 3; j++ {\n\t\tif j == 1 {\n\t\t\tcontinue Outer\n\t\t}\n\t\tif i == 2 {\n\t\t\tbreak Outer\n\t\t}\n\t}\n}\n",
    );
    assert_error("for {\n\tbreak Missing\n}\n", "label Missing not defined");
    assert_error("L:\nx := 1\nfor {\n\tcontinue L\n}\n", "invalid continue label L");
    assert_error("L:\nfor {\n}\nL:\nfor {\n}\n", "label L already defined");
}

#[test]
fn test_goto_label_defined_later() {
    check_ok("func f() {\n\tgoto done\n\tdone:\n\treturn\n}\n");
    assert_error("func f() {\n\tgoto nowhere\n}\n", "label nowhere not defined");
}

#[test]
fn test_branch_outside_loop() {
    assert_error("break\n", "break not in a loop");
    assert_error("func f() {\n\tcontinue\n}\n", "continue not in a loop");
    check_ok("switch 1 {\ncase 1:\n\tbreak\n}\n");
}

#[test]
fn test_fallthrough() {
    check_ok("x := 1\nswitch x {\ncase 1:\n\tfallthrough\ncase 2:\n}\n");
    assert_error("x := 1\nswitch x {\ncase 1:\ncase 2:\n\tfallthrough\n}\n", "fallthrough statement out of place");
    assert_error("for {\n\tfallthrough\n}\n", "fallthrough statement out of place");
}

#[test]
fn test_switch_cases() {
    check_ok("s := \"a\"\nswitch s {\ncase \"a\", \"b\":\ncase \"c\":\ndefault:\n}\n");
    assert_error("x := 1\nswitch x {\ncase 1:\ncase 1:\n}\n", "duplicate case 1 in switch");
    assert_error("x := 1\nswitch x {\ndefault:\ndefault:\n}\n", "multiple defaults in switch");
    assert_error("x := 1\nswitch x {\ncase \"a\":\n}\n", "invalid case \"a\" in switch on x");
}

#[test]
fn test_tagless_switch() {
    check_ok("x := 1\nswitch {\ncase x > 0:\ncase x < 0:\n}\n");
    assert_error("x := 1\nswitch {\ncase x:\n}\n", "used as case condition");
}

#[test]
fn test_type_switch() {
    check_ok(
        "var v interface{}\nswitch t := v.(type) {\ncase int:\n\tn := t + 1\ncase string:\n\ts := t + \"!\"\ncase nil:\ndefault:\n}\n",
    );
    assert_error("x := 1\nswitch x.(type) {\ncase int:\n}\n", "cannot type switch on non-interface");
    assert_error("var v interface{}\nswitch v.(type) {\ncase int, int:\n}\n", "duplicate case int");
    assert_error(
        "type S interface {\n\tString() string\n}\nvar v S\nswitch v.(type) {\ncase int:\n}\n",
        "impossible type switch case",
    );
}

#[test]
fn test_type_assertion_outside_switch() {
    assert_error("var v interface{}\nt := v.(type)\n", "use of .(type) outside type switch");
}

#[test]
fn test_range_kinds() {
    check_ok(
        "s := []string{\"a\"}\nfor i, v := range s {\n\tn := i + len(v)\n}\n\
         for i, r := range \"héllo\" {\n\tvar x int32 = r\n\ty := i\n}\n\
         m := map[string]float64{}\nfor k, v := range m {\n\tz := k + \"\"\n\tw := v * 2\n}\n\
         a := [3]int{1, 2, 3}\nfor i := range a {\n}\n",
    );
}

#[test]
fn test_range_table_rows() {
    check_ok("t := [|]int{{|\"a\", \"b\"|}, {1, 2}}\nfor i, row := range t {\n\tn := row[0] + i\n}\n");
}

#[test]
fn test_range_channels() {
    check_ok("c := make(chan int)\nfor v := range c {\n\tn := v + 1\n}\n");
    assert_error("c := make(chan int)\nfor i, v := range c {\n}\n", "permits only one iteration variable");
    assert_error("var c chan<- int\nfor v := range c {\n}\n", "cannot range over");
    assert_error("x := 1\nfor i := range x {\n}\n", "cannot range over x");
}

#[test]
fn test_range_assign() {
    check_ok("var i int\nvar v string\nfor i, v = range []string{\"x\"} {\n}\n");
}

#[test]
fn test_select() {
    check_ok(
        "c := make(chan int)\nd := make(chan string, 1)\n\
         select {\ncase v := <-c:\n\tn := v + 1\ncase d <- \"x\":\ncase <-c:\ndefault:\n}\n",
    );
    assert_error(
        "c := make(chan int)\nselect {\ncase x := 1:\n}\n",
        "select case must be receive, send or assign recv",
    );
}

#[test]
fn test_send_statement() {
    check_ok("c := make(chan int, 1)\nc <- 2\n");
    assert_error("x := 1\nx <- 2\n", "send to non-chan type int");
    assert_error("var c <-chan int\nc <- 2\n", "send to receive-only channel");
    assert_error("c := make(chan int, 1)\nc <- \"s\"\n", "cannot use");
}

#[test]
fn test_go_and_defer() {
    check_ok("func f() {\n}\ngo f()\nfunc g() {\n\tdefer f()\n}\n");
    assert_error("x := 1\ngo x\n", "expression in go must be function call");
    assert_error("func g() {\n\tdefer 1\n}\n", "expression in defer must be function call");
}

#[test]
fn test_if_else_scopes() {
    check_ok("if x := 1; x > 0 {\n\ty := x\n} else if z := x * 2; z > 0 {\n\tw := z\n} else {\n\tv := x + z\n}\n");
    assert_error("if x := 1; x > 0 {\n}\ny := x\n", "undeclared identifier: x");
}

#[test]
fn test_assignment_targets() {
    assert_error("const c = 1\nc = 2\n", "cannot assign to c");
    assert_error("func f() int {\n\treturn 1\n}\nf() = 2\n", "cannot assign to");
    check_ok("m := map[string]int{}\nm[\"a\"] = 1\nm[\"a\"] += 2\nm[\"a\"]++\n");
}

#[test]
fn test_compound_assignment_count() {
    assert_error("a, b := 1, 2\na, b += 1\n", "assignment count mismatch: 2 = 1");
}

#[test]
fn test_blank_define() {
    check_ok("_ := 1\n");
    check_ok("func f() int {\n\treturn 1\n}\n_ := f()\n");
    assert_error("a := 1\na := 2\n", "no new variables");
}
