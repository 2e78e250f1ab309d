//! Parser tests module

mod basic;
mod line;
mod walk;

use crate::frontend::parser::ast::*;
use crate::frontend::parser::parse;

/// Parse a source that must be free of errors
pub(super) fn parse_ok(src: &str) -> File {
    let (file, errors) = parse("t.ng", src);
    assert!(errors.is_empty(), "unexpected errors for {:?}: {:?}", src, errors);
    file
}

/// Parse a single statement that must be free of errors
pub(super) fn parse_stmt(src: &str) -> Stmt {
    let mut file = parse_ok(src);
    assert_eq!(file.stmts.len(), 1, "expected one statement in {:?}", src);
    file.stmts.remove(0)
}

/// Error messages produced for a source
pub(super) fn parse_errors(src: &str) -> Vec<String> {
    let (_, errors) = parse("t.ng", src);
    errors.into_iter().map(|d| d.message).collect()
}
