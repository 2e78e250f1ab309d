//! Parser module
//!
//! A hand-written recursive descent parser with precedence climbing for
//! binary operators. The parser never stops at the first error: it records
//! a [`Diagnostic`] and leaves a `Bad` node in the tree, so the result is
//! always walkable.
//!
//! - [`parse`] parses a whole file
//! - [`LineParser`] parses interactive input one line at a time
//! - [`walk`] visits every node of a parsed file

pub mod ast;
mod expr;
mod led;
pub mod line;
mod nud;
pub mod printer;
mod shell;
mod state;
mod stmt;
mod type_parser;
pub mod walk;

pub use expr::PREC_LOWEST;
pub use line::{LineParser, LineResult, LineState};
pub use state::ParserState;
pub use walk::{walk, Cursor, Node};

use tracing::debug;

use crate::frontend::lexer::{tokenize, tokens::TokenKind};
use crate::util::diagnostic::Diagnostic;
use ast::*;

/// Parse a complete source file
///
/// Lexer and parser diagnostics are returned together, in source order.
pub fn parse(
    filename: &str,
    src: &str,
) -> (File, Vec<Diagnostic>) {
    let (tokens, mut errors) = tokenize(filename, src);
    debug!(filename, tokens = tokens.len(), "tokenized");
    let mut state = ParserState::new(tokens);
    let file = state.parse_file(filename);
    debug!(filename, stmts = file.stmts.len(), "parsed");
    errors.extend(state.into_errors());
    errors.sort_by(|a, b| (a.pos.line, a.pos.column).cmp(&(b.pos.line, b.pos.column)));
    (file, errors)
}

/// Parse a single expression, for tests and tools
pub fn parse_expr(src: &str) -> (Expr, Vec<Diagnostic>) {
    let (tokens, mut errors) = tokenize("", src);
    let mut state = ParserState::new(tokens);
    let expr = state.parse_expr();
    state.skip(TokenKind::Semicolon);
    if !state.at_end() {
        state.error_expected("end of expression");
    }
    errors.extend(state.into_errors());
    (expr, errors)
}

impl ParserState {
    /// Parse a file: an optional package clause then statements
    pub fn parse_file(
        &mut self,
        filename: &str,
    ) -> File {
        let mut package = None;
        if self.skip(TokenKind::Package) {
            package = self.expect_ident();
            if !self.at_end() {
                self.expect(TokenKind::Semicolon);
            }
        }
        let mut stmts = Vec::new();
        loop {
            self.parse_stmt_list_into(&mut stmts);
            if self.at_end() {
                break;
            }
            // A stray `}` or case clause at top level
            let pos = self.pos();
            if self.at(TokenKind::Package) {
                self.error(pos.clone(), ParseError::LatePackage);
            } else {
                self.error_expected("statement");
            }
            self.bump();
            stmts.push(ast::Stmt::bad(pos, "unexpected token"));
        }
        File {
            filename: filename.to_string(),
            package,
            stmts,
        }
    }
}

/// Parse error types
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("syntax error: unexpected {found}, expecting {expected}")]
    Expected { expected: String, found: String },

    #[error("syntax error: unexpected {0}")]
    Unexpected(String),

    #[error("array length must be an integer literal or ...")]
    ArrayLength,

    #[error("mixed named and unnamed parameters")]
    MixedParams,

    #[error("can only use ... with final parameter in list")]
    MisplacedEllipsis,

    #[error("mixture of field:value and value elements in literal")]
    MixedKeys,

    #[error("method receiver must be a name, optionally preceded by *")]
    InvalidReceiver,

    #[error("package clause must be the first statement")]
    LatePackage,

    #[error("cannot use {0} as value")]
    NotValue(String),

    #[error("{0}")]
    Message(String),
}

#[cfg(test)]
mod tests;
