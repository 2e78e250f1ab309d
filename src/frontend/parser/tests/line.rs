//! Interactive line parser tests

use crate::frontend::parser::{LineParser, LineState};

#[test]
fn test_complete_statement() {
    let mut p = LineParser::new("repl");
    let r = p.parse_line("x := 1");
    assert_eq!(r.state, LineState::StmtComplete);
    assert_eq!(r.stmts.len(), 1);
    assert!(r.errors.is_empty());
}

#[test]
fn test_partial_block() {
    let mut p = LineParser::new("repl");
    let r = p.parse_line("func f() int {");
    assert_eq!(r.state, LineState::StmtPartial);
    assert!(r.stmts.is_empty());
    let r = p.parse_line("\treturn 1");
    assert_eq!(r.state, LineState::StmtPartial);
    let r = p.parse_line("}");
    assert_eq!(r.state, LineState::StmtComplete);
    assert_eq!(r.stmts.len(), 1);
    assert!(r.errors.is_empty(), "{:?}", r.errors);
}

#[test]
fn test_partial_expression() {
    let mut p = LineParser::new("repl");
    assert_eq!(p.parse_line("x := 1 +").state, LineState::StmtPartial);
    let r = p.parse_line("2");
    assert_eq!(r.state, LineState::StmtComplete);
    assert_eq!(r.stmts.len(), 1);
}

#[test]
fn test_raw_string_spans_lines() {
    let mut p = LineParser::new("repl");
    assert_eq!(p.parse_line("s := `a").state, LineState::StmtPartial);
    assert_eq!(p.parse_line("b`").state, LineState::StmtComplete);
}

#[test]
fn test_syntax_error_is_not_partial() {
    let mut p = LineParser::new("repl");
    let r = p.parse_line("x := )");
    assert_eq!(r.state, LineState::StmtComplete);
    assert!(!r.errors.is_empty());
    // the buffer was reset
    let r = p.parse_line("y := 2");
    assert!(r.errors.is_empty());
}

#[test]
fn test_shell_mode() {
    let mut p = LineParser::new("repl");
    assert_eq!(p.parse_line("$$").state, LineState::CmdShell);
    assert!(p.in_shell());

    let r = p.parse_line("ls -l | wc");
    assert_eq!(r.state, LineState::CmdShell);
    assert_eq!(r.cmds.len(), 1);

    assert_eq!(p.parse_line("echo 'open").state, LineState::CmdShellPartial);
    let r = p.parse_line("quote'");
    assert_eq!(r.state, LineState::CmdShell);
    assert_eq!(r.cmds.len(), 1);

    assert_eq!(p.parse_line("echo a \\").state, LineState::CmdShellPartial);
    assert_eq!(p.parse_line("b").state, LineState::CmdShell);

    assert_eq!(p.parse_line("$$").state, LineState::StmtComplete);
    assert!(!p.in_shell());
}

#[test]
fn test_shell_expression_spanning_lines() {
    let mut p = LineParser::new("repl");
    assert_eq!(p.parse_line("s := $$").state, LineState::StmtPartial);
    assert_eq!(p.parse_line("echo hi").state, LineState::StmtPartial);
    let r = p.parse_line("$$");
    assert_eq!(r.state, LineState::StmtComplete);
    assert_eq!(r.stmts.len(), 1);
}

#[test]
fn test_positions_follow_lines() {
    let mut p = LineParser::new("repl");
    p.parse_line("a := 1");
    let r = p.parse_line("b := 2");
    assert_eq!(r.stmts[0].pos.line, 2);
}
