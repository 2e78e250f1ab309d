//! Parser state and token stream management

use crate::frontend::lexer::tokens::{Literal, Token, TokenKind};
use crate::util::diagnostic::Diagnostic;
use crate::util::span::Pos;

use super::ParseError;

/// Parser state for tracking position and errors
#[derive(Debug)]
pub struct ParserState {
    /// Token stream, comments removed, always ending in `Eof`
    tokens: Vec<Token>,
    /// Current position in token stream
    pos: usize,
    /// Parsing errors
    errors: Vec<Diagnostic>,
    /// Nesting depth of brackets; negative inside control clause headers,
    /// where `T {` opens a block rather than a composite literal
    pub(super) expr_lev: i32,
    /// The first error was reported at end of input
    hit_eof: bool,
}

impl ParserState {
    /// Create a new parser state
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut tokens: Vec<Token> = tokens
            .into_iter()
            .filter(|t| t.kind != TokenKind::Comment)
            .collect();
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let eof = tokens.last().map_or_else(
                || Token::from(TokenKind::Eof),
                |last| Token {
                    kind: TokenKind::Eof,
                    literal: None,
                    pos: last.pos.clone(),
                    start: last.end,
                    end: last.end,
                },
            );
            tokens.push(eof);
        }
        Self {
            tokens,
            pos: 0,
            errors: Vec::new(),
            expr_lev: 0,
            hit_eof: false,
        }
    }

    /// Current token
    #[inline]
    pub fn current(&self) -> &Token {
        // The stream always ends with Eof and `bump` never moves past it.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    /// Current token kind
    #[inline]
    pub fn kind(&self) -> TokenKind {
        self.current().kind
    }

    /// Kind of the token `n` ahead
    #[inline]
    pub fn peek_kind(
        &self,
        n: usize,
    ) -> TokenKind {
        self.tokens
            .get(self.pos + n)
            .map_or(TokenKind::Eof, |t| t.kind)
    }

    /// Token `n` ahead
    #[inline]
    pub fn peek(
        &self,
        n: usize,
    ) -> Option<&Token> {
        self.tokens.get(self.pos + n)
    }

    /// Position of the current token
    #[inline]
    pub fn pos(&self) -> Pos {
        self.current().pos.clone()
    }

    #[inline]
    pub fn at(
        &self,
        kind: TokenKind,
    ) -> bool {
        self.kind() == kind
    }

    #[inline]
    pub fn at_end(&self) -> bool {
        self.at(TokenKind::Eof)
    }

    /// Advance, returning the consumed token
    pub fn bump(&mut self) -> Token {
        let token = self.current().clone();
        if !self.at_end() {
            self.pos += 1;
        }
        token
    }

    /// Skip a specific token
    #[inline]
    pub fn skip(
        &mut self,
        kind: TokenKind,
    ) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Expect a specific token, report error if not found
    pub fn expect(
        &mut self,
        kind: TokenKind,
    ) -> bool {
        if self.skip(kind) {
            return true;
        }
        self.error_expected(kind.as_str());
        false
    }

    /// Consume an identifier, reporting an error if there is none
    pub fn expect_ident(&mut self) -> Option<String> {
        if self.at(TokenKind::Ident) {
            let token = self.bump();
            return match token.literal {
                Some(Literal::Ident(name)) => Some(name),
                _ => None,
            };
        }
        self.error_expected("name");
        None
    }

    /// Report that something else was expected at the current token
    pub fn error_expected(
        &mut self,
        expected: &str,
    ) {
        let found = describe(self.current());
        let pos = self.pos();
        self.error(
            pos,
            ParseError::Expected {
                expected: expected.to_string(),
                found,
            },
        );
    }

    /// Add a parse error
    pub fn error(
        &mut self,
        pos: Pos,
        error: ParseError,
    ) {
        if self.at_end() && self.errors.is_empty() {
            self.hit_eof = true;
        }
        // One error per position keeps cascades out of the report.
        if self.errors.last().is_some_and(|d| d.pos == pos) {
            return;
        }
        self.errors.push(Diagnostic::parser(pos, error.to_string()));
    }

    #[inline]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Check whether the first error was reported at end of input
    pub fn hit_eof(&self) -> bool {
        self.hit_eof
    }

    pub fn into_errors(self) -> Vec<Diagnostic> {
        self.errors
    }

    /// Current token index, for progress checks
    #[inline]
    pub fn index(&self) -> usize {
        self.pos
    }

    /// Skip to the end of the current statement
    ///
    /// Stops after a `;` or before a `}` that closes the enclosing block.
    pub fn sync_stmt(&mut self) {
        let mut depth = 0i32;
        loop {
            match self.kind() {
                TokenKind::Eof => return,
                TokenKind::Semicolon if depth <= 0 => {
                    self.bump();
                    return;
                }
                TokenKind::RightBrace if depth <= 0 => return,
                TokenKind::LeftBrace | TokenKind::LeftParen | TokenKind::LeftBracket => depth += 1,
                TokenKind::RightBrace | TokenKind::RightParen | TokenKind::RightBracket => depth -= 1,
                _ => {}
            }
            self.bump();
        }
    }

    /// Run `f` with an adjusted bracket level
    pub fn with_expr_lev<T>(
        &mut self,
        lev: i32,
        f: impl FnOnce(&mut Self) -> T,
    ) -> T {
        let prev = self.expr_lev;
        self.expr_lev = lev;
        let out = f(self);
        self.expr_lev = prev;
        out
    }

    /// Check if the current token can start a type
    pub fn can_start_type(&self) -> bool {
        matches!(
            self.kind(),
            TokenKind::Ident
                | TokenKind::LeftBracket
                | TokenKind::Mul
                | TokenKind::Func
                | TokenKind::Map
                | TokenKind::Chan
                | TokenKind::Struct
                | TokenKind::Interface
                | TokenKind::LeftParen
                | TokenKind::ChanOp
        )
    }
}

/// Describe a token for an error message
pub fn describe(token: &Token) -> String {
    match token.kind {
        TokenKind::Semicolon if token.is_inserted() => "newline".to_string(),
        TokenKind::Eof => "EOF".to_string(),
        TokenKind::Ident | TokenKind::ShellWord => match &token.literal {
            Some(lit) => format!("name {}", lit),
            None => token.kind.to_string(),
        },
        TokenKind::Int
        | TokenKind::Float
        | TokenKind::Imaginary
        | TokenKind::String
        | TokenKind::Rune => match &token.literal {
            Some(lit) => format!("literal {}", lit),
            None => token.kind.to_string(),
        },
        kind if kind.is_keyword() => format!("keyword {}", kind),
        kind => kind.to_string(),
    }
}
