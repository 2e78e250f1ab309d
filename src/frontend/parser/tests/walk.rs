//! Tree traversal tests

use std::cell::Cell;

use super::*;
use crate::frontend::parser::walk::{walk, Node};

const SRC: &str = "x := 1\n\
                   func f(a int) int {\n\
                   \tif a > 0 {\n\t\treturn a * 2\n\t}\n\
                   \tfor _, v := range []int{1, 2} {\n\t\tx += v\n\t}\n\
                   \tswitch a {\n\tcase 1:\n\t\tgo g()\n\t}\n\
                   \treturn 0\n}\n\
                   out := $$ ls | wc $$\n\
                   m := map[string]int{\"a\": x}\n";

#[test]
fn test_every_node_has_a_position_in_the_file() {
    let file = parse_ok(SRC);
    let mut count = 0;
    walk(
        &file,
        |c| {
            count += 1;
            if let Some(pos) = c.node.pos() {
                assert_eq!(&*pos.filename, "t.ng", "node {:?}", c.node);
                assert!(pos.line >= 1);
            }
            true
        },
        |_| {},
    );
    assert!(count > 30, "visited only {} nodes", count);
}

#[test]
fn test_pre_and_post_are_balanced() {
    let file = parse_ok(SRC);
    let depth = Cell::new(0i32);
    let mut max_depth = 0;
    walk(
        &file,
        |_| {
            depth.set(depth.get() + 1);
            max_depth = max_depth.max(depth.get());
            true
        },
        |_| depth.set(depth.get() - 1),
    );
    assert_eq!(depth.get(), 0);
    assert!(max_depth > 5);
}

#[test]
fn test_pruning_skips_children_and_post() {
    let file = parse_ok(SRC);
    let mut idents = Vec::new();
    let mut posts = 0;
    walk(
        &file,
        |c| {
            if let Node::Expr(e) = c.node {
                if matches!(e.kind, ExprKind::FuncLiteral(_)) {
                    return false;
                }
                if let Some(name) = e.as_ident() {
                    idents.push(name.to_string());
                }
            }
            true
        },
        |c| {
            if let Node::Expr(e) = c.node {
                assert!(!matches!(e.kind, ExprKind::FuncLiteral(_)));
            }
            posts += 1;
        },
    );
    // only the top level identifiers were seen
    assert_eq!(idents, vec!["x", "out", "m", "x"]);
    assert!(posts > 0);
}

#[test]
fn test_cursor_fields() {
    let file = parse_ok("a, b = c, d");
    let mut fields = Vec::new();
    walk(
        &file,
        |c| {
            if let Node::Expr(_) = c.node {
                assert!(matches!(c.parent, Some(Node::Stmt(_))));
                fields.push((c.field, c.index));
            }
            true
        },
        |_| {},
    );
    assert_eq!(
        fields,
        vec![
            ("left", Some(0)),
            ("left", Some(1)),
            ("right", Some(0)),
            ("right", Some(1)),
        ]
    );
}

#[test]
fn test_shell_nodes_are_visited() {
    let file = parse_ok("$$ (a; b) | c && d $$");
    let mut cmds = 0;
    let mut lists = 0;
    walk(
        &file,
        |c| {
            match c.node {
                Node::ShellCmd(_) => cmds += 1,
                Node::ShellList(_) => lists += 1,
                _ => {}
            }
            true
        },
        |_| {},
    );
    assert_eq!(lists, 2);
    assert_eq!(cmds, 5);
}
