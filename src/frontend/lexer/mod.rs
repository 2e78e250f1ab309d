//! Lexer module
//!
//! The lexer is incremental: callers [`Lexer::feed`] it bytes and pull
//! tokens with [`Lexer::next_token`]. When a token might continue past the
//! end of the buffered input, the lexer answers [`Scan::NeedMore`] and
//! leaves its state untouched, so interactive front ends can supply the
//! next line and retry. [`Lexer::close`] marks the end of input.
//!
//! Lexing never aborts. Malformed input is reported as a positioned
//! [`Diagnostic`] and an [`TokenKind::Unknown`] token takes its place.

pub mod tokens;

use std::sync::Arc;

use num_bigint::BigInt;
use num_rational::BigRational;
use tracing::trace;

use crate::util::diagnostic::Diagnostic;
use crate::util::span::Pos;
pub use tokens::{Literal, Token, TokenKind};

/// Largest decimal exponent accepted in a float literal
const MAX_EXPONENT: i64 = 10_000;

/// Lexer error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("illegal character NUL")]
    Nul,
    #[error("illegal byte order mark")]
    ByteOrderMark,
    #[error("invalid UTF-8 encoding")]
    InvalidUtf8,
    #[error("illegal character {0:?}")]
    UnexpectedChar(char),
    #[error("invalid number literal {0:?}")]
    InvalidNumber(String),
    #[error("exponent has no digits")]
    MissingExponent,
    #[error("string literal not terminated")]
    UnterminatedString,
    #[error("raw string literal not terminated")]
    UnterminatedRawString,
    #[error("rune literal not terminated")]
    UnterminatedRune,
    #[error("illegal rune literal")]
    InvalidRune,
    #[error("unknown escape sequence \\{0}")]
    InvalidEscape(char),
    #[error("escape sequence is invalid Unicode code point")]
    InvalidCodePoint,
    #[error("comment not terminated")]
    UnterminatedComment,
    #[error("unterminated shell expression")]
    UnterminatedShell,
    #[error("unterminated quote in shell word")]
    UnterminatedQuote,
}

/// Result of asking the lexer for a token
#[derive(Debug, Clone, PartialEq)]
pub enum Scan {
    /// A complete token
    Token(Token),
    /// The buffered input ends inside a token; feed more bytes or close
    NeedMore,
}

/// Snapshot used to rewind when a token runs off the buffer
#[derive(Clone, Copy)]
struct Mark {
    off: usize,
    line: u32,
    col: u32,
    last: TokenKind,
    shell: bool,
    errors: usize,
}

/// Outcome of decoding one UTF-8 scalar
enum Decoded {
    Char(char, usize),
    Invalid,
    Incomplete,
    End,
}

/// Incremental lexer over a growing byte buffer
#[derive(Debug)]
pub struct Lexer {
    filename: Arc<str>,
    src: Vec<u8>,
    off: usize,
    line: u32,
    col: u32,
    /// Last significant token, drives semicolon insertion
    last: TokenKind,
    /// Inside `$$ ... $$`
    shell: bool,
    closed: bool,
    errors: Vec<Diagnostic>,
    /// Set when the token being scanned ran into the end of an open buffer
    starved: bool,
}

impl Lexer {
    /// Create a lexer for the named source
    pub fn new(filename: &str) -> Self {
        Self {
            filename: Arc::from(filename),
            src: Vec::new(),
            off: 0,
            line: 1,
            col: 1,
            last: TokenKind::Semicolon,
            shell: false,
            closed: false,
            errors: Vec::new(),
            starved: false,
        }
    }

    /// Create a lexer whose first line is numbered `line`
    pub fn with_first_line(
        filename: &str,
        line: u32,
    ) -> Self {
        Self {
            line,
            ..Self::new(filename)
        }
    }

    /// Create a lexer over a complete source
    pub fn from_source(
        filename: &str,
        src: &str,
    ) -> Self {
        let mut lexer = Self::new(filename);
        lexer.feed(src.as_bytes());
        lexer.close();
        lexer
    }

    /// Append input bytes
    pub fn feed(
        &mut self,
        bytes: &[u8],
    ) {
        self.src.extend_from_slice(bytes);
    }

    /// Mark the end of input
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Check whether the lexer is between `$$` delimiters
    pub fn in_shell(&self) -> bool {
        self.shell
    }

    /// Start scanning as if just past an opening `$$`
    pub fn enter_shell(&mut self) {
        self.shell = true;
        self.last = TokenKind::Shell;
    }

    /// Byte offset of the next unscanned byte
    pub fn offset(&self) -> usize {
        self.off
    }

    /// Number of bytes fed so far
    pub fn buffered(&self) -> usize {
        self.src.len()
    }

    /// Diagnostics recorded so far
    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    /// Take the recorded diagnostics
    pub fn take_errors(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.errors)
    }

    /// Scan the next token
    ///
    /// After [`TokenKind::Eof`] has been returned once, every further call
    /// returns `Eof` again.
    pub fn next_token(&mut self) -> Scan {
        let mark = self.mark();
        self.starved = false;
        let token = if self.shell {
            self.scan_shell()
        } else {
            self.scan()
        };
        match token {
            Some(token) if !self.starved => {
                trace!(kind = %token.kind, pos = %token.pos, "token");
                if token.kind != TokenKind::Comment {
                    self.last = token.kind;
                }
                Scan::Token(token)
            }
            _ => {
                self.rewind(mark);
                Scan::NeedMore
            }
        }
    }

    fn mark(&self) -> Mark {
        Mark {
            off: self.off,
            line: self.line,
            col: self.col,
            last: self.last,
            shell: self.shell,
            errors: self.errors.len(),
        }
    }

    fn rewind(
        &mut self,
        mark: Mark,
    ) {
        self.off = mark.off;
        self.line = mark.line;
        self.col = mark.col;
        self.last = mark.last;
        self.shell = mark.shell;
        self.errors.truncate(mark.errors);
    }

    fn pos(&self) -> Pos {
        Pos::new(
            self.filename.clone(),
            self.line,
            u16::try_from(self.col).unwrap_or(u16::MAX),
        )
    }

    fn error(
        &mut self,
        pos: Pos,
        err: LexError,
    ) {
        self.errors.push(Diagnostic::parser(pos, err.to_string()));
    }

    fn decode(
        &self,
        at: usize,
    ) -> Decoded {
        let Some(&b) = self.src.get(at) else {
            return Decoded::End;
        };
        let width = match b {
            0x00..=0x7f => return Decoded::Char(b as char, 1),
            0xc0..=0xdf => 2,
            0xe0..=0xef => 3,
            0xf0..=0xf7 => 4,
            _ => return Decoded::Invalid,
        };
        if at + width > self.src.len() {
            return if self.closed {
                Decoded::Invalid
            } else {
                Decoded::Incomplete
            };
        }
        match std::str::from_utf8(&self.src[at..at + width]) {
            Ok(s) => s.chars().next().map_or(Decoded::Invalid, |c| Decoded::Char(c, width)),
            Err(_) => Decoded::Invalid,
        }
    }

    /// The character at the cursor. Running off an open buffer starves the
    /// current token.
    fn peek(&mut self) -> Option<char> {
        self.peek_at(0)
    }

    /// The character `n` characters past the cursor
    fn peek_at(
        &mut self,
        n: usize,
    ) -> Option<char> {
        let mut at = self.off;
        for i in 0..=n {
            match self.decode(at) {
                Decoded::Char(c, w) => {
                    if i == n {
                        return Some(c);
                    }
                    at += w;
                }
                Decoded::Invalid => return Some(char::REPLACEMENT_CHARACTER),
                Decoded::Incomplete => {
                    self.starved = true;
                    return None;
                }
                Decoded::End => {
                    if !self.closed {
                        self.starved = true;
                    }
                    return None;
                }
            }
        }
        None
    }

    fn bump(&mut self) -> Option<char> {
        match self.decode(self.off) {
            Decoded::Char(c, w) => {
                self.off += w;
                if c == '\n' {
                    self.line += 1;
                    self.col = 1;
                } else {
                    self.col += w as u32;
                }
                Some(c)
            }
            Decoded::Invalid => {
                self.off += 1;
                self.col += 1;
                Some(char::REPLACEMENT_CHARACTER)
            }
            Decoded::Incomplete => {
                self.starved = true;
                None
            }
            Decoded::End => {
                if !self.closed {
                    self.starved = true;
                }
                None
            }
        }
    }

    fn eat(
        &mut self,
        c: char,
    ) -> bool {
        if self.peek() == Some(c) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn token(
        &self,
        kind: TokenKind,
        literal: Option<Literal>,
        pos: Pos,
        start: usize,
    ) -> Token {
        Token {
            kind,
            literal,
            pos,
            start,
            end: self.off,
        }
    }

    fn inserted_semicolon(&self) -> Token {
        Token {
            kind: TokenKind::Semicolon,
            literal: None,
            pos: self.pos(),
            start: self.off,
            end: self.off,
        }
    }

    /// A closing `$$` ends an expression just like `)` does
    fn wants_semicolon(&self) -> bool {
        self.last.inserts_semicolon() || self.last == TokenKind::Shell
    }

    fn text(
        &self,
        start: usize,
    ) -> String {
        String::from_utf8_lossy(&self.src[start..self.off]).into_owned()
    }

    fn scan(&mut self) -> Option<Token> {
        loop {
            match self.peek() {
                Some(' ' | '\t' | '\r') => {
                    self.bump();
                }
                Some('\n') => {
                    if self.wants_semicolon() {
                        let semi = self.inserted_semicolon();
                        self.bump();
                        return Some(semi);
                    }
                    self.bump();
                }
                _ => break,
            }
        }

        let pos = self.pos();
        let start = self.off;
        let c = match self.peek() {
            Some(c) => c,
            None if self.starved => return None,
            None => {
                if self.wants_semicolon() {
                    return Some(self.inserted_semicolon());
                }
                return Some(self.token(TokenKind::Eof, None, pos, start));
            }
        };

        if c == '\0' {
            self.bump();
            self.error(pos.clone(), LexError::Nul);
            return Some(self.token(TokenKind::Unknown, None, pos, start));
        }
        if c == '\u{feff}' {
            self.bump();
            self.error(pos.clone(), LexError::ByteOrderMark);
            return Some(self.token(TokenKind::Unknown, None, pos, start));
        }
        if c == char::REPLACEMENT_CHARACTER && matches!(self.decode(self.off), Decoded::Invalid) {
            self.bump();
            self.error(pos.clone(), LexError::InvalidUtf8);
            return Some(self.token(TokenKind::Unknown, None, pos, start));
        }

        if is_ident_start(c) {
            return Some(self.scan_ident(pos, start));
        }
        if c.is_ascii_digit() {
            return Some(self.scan_number(pos, start));
        }
        if c == '.' && self.peek_at(1).is_some_and(|n| n.is_ascii_digit()) {
            return Some(self.scan_number(pos, start));
        }

        self.bump();
        let kind = match c {
            '"' => return Some(self.scan_string(pos, start)),
            '`' => return Some(self.scan_raw_string(pos, start)),
            '\'' => return Some(self.scan_rune(pos, start)),
            '$' => {
                if self.eat('$') {
                    self.shell = true;
                    TokenKind::Shell
                } else {
                    self.error(pos.clone(), LexError::UnexpectedChar('$'));
                    TokenKind::Unknown
                }
            }
            '+' => {
                if self.eat('+') {
                    TokenKind::Inc
                } else if self.eat('=') {
                    TokenKind::AddAssign
                } else {
                    TokenKind::Add
                }
            }
            '-' => {
                if self.eat('-') {
                    TokenKind::Dec
                } else if self.eat('=') {
                    TokenKind::SubAssign
                } else {
                    TokenKind::Sub
                }
            }
            '*' => self.pick('=', TokenKind::MulAssign, TokenKind::Mul),
            '/' => match self.peek() {
                Some('/') => return Some(self.scan_line_comment(pos, start)),
                Some('*') => return self.scan_block_comment(pos, start),
                _ => self.pick('=', TokenKind::DivAssign, TokenKind::Div),
            },
            '%' => self.pick('=', TokenKind::RemAssign, TokenKind::Rem),
            '^' => self.pick('=', TokenKind::PowAssign, TokenKind::Pow),
            '&' => self.pick('&', TokenKind::LogicalAnd, TokenKind::Ref),
            '|' => {
                if self.eat('|') {
                    TokenKind::LogicalOr
                } else if self.eat('}') {
                    TokenKind::RightBraceTable
                } else if self.eat('=') {
                    TokenKind::PipeAssign
                } else {
                    TokenKind::Pipe
                }
            }
            '<' => {
                if self.eat('-') {
                    TokenKind::ChanOp
                } else if self.eat('=') {
                    TokenKind::LessEqual
                } else {
                    TokenKind::Less
                }
            }
            '>' => self.pick('=', TokenKind::GreaterEqual, TokenKind::Greater),
            '=' => self.pick('=', TokenKind::Equal, TokenKind::Assign),
            '!' => self.pick('=', TokenKind::NotEqual, TokenKind::Not),
            ':' => self.pick('=', TokenKind::Define, TokenKind::Colon),
            '.' => {
                if self.peek() == Some('.') && self.peek_at(1) == Some('.') {
                    self.bump();
                    self.bump();
                    TokenKind::Ellipsis
                } else {
                    TokenKind::Period
                }
            }
            '{' => self.pick('|', TokenKind::LeftBraceTable, TokenKind::LeftBrace),
            '}' => TokenKind::RightBrace,
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '[' => TokenKind::LeftBracket,
            ']' => TokenKind::RightBracket,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            other => {
                self.error(pos.clone(), LexError::UnexpectedChar(other));
                TokenKind::Unknown
            }
        };
        Some(self.token(kind, None, pos, start))
    }

    fn pick(
        &mut self,
        next: char,
        yes: TokenKind,
        no: TokenKind,
    ) -> TokenKind {
        if self.eat(next) {
            yes
        } else {
            no
        }
    }

    fn scan_ident(
        &mut self,
        pos: Pos,
        start: usize,
    ) -> Token {
        while self.peek().is_some_and(is_ident_continue) {
            self.bump();
        }
        let name = self.text(start);
        match TokenKind::keyword(&name) {
            Some(kind) => self.token(kind, None, pos, start),
            None => self.token(TokenKind::Ident, Some(Literal::Ident(name)), pos, start),
        }
    }

    fn scan_digits(
        &mut self,
        radix: u32,
    ) {
        while self.peek().is_some_and(|c| c == '_' || c.is_digit(radix)) {
            self.bump();
        }
    }

    fn scan_number(
        &mut self,
        pos: Pos,
        start: usize,
    ) -> Token {
        let mut is_float = false;
        let mut radix = 10;

        if self.peek() == Some('0') {
            self.bump();
            match self.peek() {
                Some('x' | 'X') => radix = 16,
                Some('o' | 'O') => radix = 8,
                Some('b' | 'B') => radix = 2,
                _ => {}
            }
            if radix != 10 {
                self.bump();
                self.scan_digits(radix);
            }
        }

        if radix == 10 {
            // Scan decimal digits generously; octal validity is checked on the text.
            self.scan_digits(10);
            if self.peek() == Some('.') && self.peek_at(1) != Some('.') {
                is_float = true;
                self.bump();
                self.scan_digits(10);
            }
            if matches!(self.peek(), Some('e' | 'E')) {
                is_float = true;
                self.bump();
                if matches!(self.peek(), Some('+' | '-')) {
                    self.bump();
                }
                if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.error(pos.clone(), LexError::MissingExponent);
                    return self.token(TokenKind::Unknown, None, pos, start);
                }
                self.scan_digits(10);
            }
        }

        let imaginary = self.eat('i');
        let text = self.text(start);
        let digits = text.trim_end_matches('i');

        if imaginary || is_float {
            let value = if is_float || radix == 10 {
                parse_float(digits)
            } else {
                parse_int(digits).map(BigRational::from_integer)
            };
            return match value {
                Some(v) if imaginary => {
                    self.token(TokenKind::Imaginary, Some(Literal::Imaginary(v)), pos, start)
                }
                Some(v) => self.token(TokenKind::Float, Some(Literal::Float(v)), pos, start),
                None => {
                    self.error(pos.clone(), LexError::InvalidNumber(text));
                    self.token(TokenKind::Unknown, None, pos, start)
                }
            };
        }

        match parse_int(digits) {
            Some(v) => self.token(TokenKind::Int, Some(Literal::Int(v)), pos, start),
            None => {
                self.error(pos.clone(), LexError::InvalidNumber(text));
                self.token(TokenKind::Unknown, None, pos, start)
            }
        }
    }

    /// Scan an escape sequence after the backslash
    fn scan_escape(
        &mut self,
        quote: char,
    ) -> Result<char, LexError> {
        let c = self.bump().ok_or(LexError::UnterminatedString)?;
        let (digits, radix) = match c {
            'a' => return Ok('\u{7}'),
            'b' => return Ok('\u{8}'),
            'f' => return Ok('\u{c}'),
            'n' => return Ok('\n'),
            'r' => return Ok('\r'),
            't' => return Ok('\t'),
            'v' => return Ok('\u{b}'),
            '\\' => return Ok('\\'),
            c if c == quote => return Ok(c),
            '0'..='7' => (2, 8),
            'x' => (2, 16),
            'u' => (4, 16),
            'U' => (8, 16),
            other => return Err(LexError::InvalidEscape(other)),
        };
        let mut value = if radix == 8 { c.to_digit(8).unwrap_or(0) } else { 0 };
        for _ in 0..digits {
            let d = self
                .peek()
                .and_then(|d| d.to_digit(radix))
                .ok_or(LexError::InvalidEscape(c))?;
            self.bump();
            value = value.checked_mul(radix).and_then(|v| v.checked_add(d)).ok_or(LexError::InvalidCodePoint)?;
        }
        if radix == 8 && value > 255 {
            return Err(LexError::InvalidCodePoint);
        }
        char::from_u32(value).ok_or(LexError::InvalidCodePoint)
    }

    fn scan_string(
        &mut self,
        pos: Pos,
        start: usize,
    ) -> Token {
        let mut value = String::new();
        loop {
            match self.peek() {
                Some('"') => {
                    self.bump();
                    return self.token(TokenKind::String, Some(Literal::String(value)), pos, start);
                }
                Some('\\') => {
                    self.bump();
                    let esc_pos = self.pos();
                    match self.scan_escape('"') {
                        Ok(c) => value.push(c),
                        Err(e) => self.error(esc_pos, e),
                    }
                }
                Some('\n') | None => {
                    self.error(pos.clone(), LexError::UnterminatedString);
                    return self.token(TokenKind::Unknown, None, pos, start);
                }
                Some(c) => {
                    self.bump();
                    value.push(c);
                }
            }
        }
    }

    fn scan_raw_string(
        &mut self,
        pos: Pos,
        start: usize,
    ) -> Token {
        let mut value = String::new();
        loop {
            match self.bump() {
                Some('`') => {
                    return self.token(TokenKind::String, Some(Literal::String(value)), pos, start)
                }
                // Carriage returns are dropped from raw strings.
                Some('\r') => {}
                Some(c) => value.push(c),
                None => {
                    self.error(pos.clone(), LexError::UnterminatedRawString);
                    return self.token(TokenKind::Unknown, None, pos, start);
                }
            }
        }
    }

    fn scan_rune(
        &mut self,
        pos: Pos,
        start: usize,
    ) -> Token {
        let mut runes = Vec::new();
        loop {
            match self.peek() {
                Some('\'') => {
                    self.bump();
                    break;
                }
                Some('\\') => {
                    self.bump();
                    let esc_pos = self.pos();
                    match self.scan_escape('\'') {
                        Ok(c) => runes.push(c),
                        Err(e) => {
                            self.error(esc_pos, e);
                            runes.push(char::REPLACEMENT_CHARACTER);
                        }
                    }
                }
                Some('\n') | None => {
                    self.error(pos.clone(), LexError::UnterminatedRune);
                    return self.token(TokenKind::Unknown, None, pos, start);
                }
                Some(c) => {
                    self.bump();
                    runes.push(c);
                }
            }
        }
        match runes.as_slice() {
            [c] => self.token(TokenKind::Rune, Some(Literal::Rune(*c)), pos, start),
            _ => {
                self.error(pos.clone(), LexError::InvalidRune);
                self.token(TokenKind::Unknown, None, pos, start)
            }
        }
    }

    fn scan_line_comment(
        &mut self,
        pos: Pos,
        start: usize,
    ) -> Token {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.bump();
        }
        self.token(TokenKind::Comment, None, pos, start)
    }

    /// A block comment spanning lines acts like a newline
    fn scan_block_comment(
        &mut self,
        pos: Pos,
        start: usize,
    ) -> Option<Token> {
        self.bump();
        let mut newline = false;
        loop {
            match self.bump() {
                Some('*') => {
                    if self.eat('/') {
                        break;
                    }
                }
                Some('\n') => newline = true,
                Some(_) => {}
                None if self.starved => return None,
                None => {
                    self.error(pos.clone(), LexError::UnterminatedComment);
                    return Some(self.token(TokenKind::Comment, None, pos, start));
                }
            }
        }
        if newline && self.wants_semicolon() {
            return Some(Token {
                kind: TokenKind::Semicolon,
                literal: None,
                pos,
                start,
                end: start,
            });
        }
        Some(self.token(TokenKind::Comment, None, pos, start))
    }

    fn scan_shell(&mut self) -> Option<Token> {
        loop {
            match self.peek() {
                Some(' ' | '\t' | '\r') => {
                    self.bump();
                }
                Some('\\') if self.peek_at(1) == Some('\n') => {
                    self.bump();
                    self.bump();
                }
                Some('#') => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.bump();
                    }
                }
                _ => break,
            }
        }

        let pos = self.pos();
        let start = self.off;
        let c = match self.peek() {
            Some(c) => c,
            None if self.starved => return None,
            None => {
                self.error(pos.clone(), LexError::UnterminatedShell);
                self.shell = false;
                return Some(self.token(TokenKind::Eof, None, pos, start));
            }
        };

        let kind = match c {
            '\n' => {
                self.bump();
                TokenKind::ShellNewline
            }
            '$' if self.peek_at(1) == Some('$') => {
                self.bump();
                self.bump();
                self.shell = false;
                TokenKind::Shell
            }
            '|' => {
                self.bump();
                self.pick('|', TokenKind::LogicalOr, TokenKind::ShellPipe)
            }
            '&' => {
                self.bump();
                if self.eat('&') {
                    TokenKind::LogicalAnd
                } else if self.eat('>') {
                    TokenKind::AndGreater
                } else {
                    TokenKind::Ref
                }
            }
            '>' => {
                self.bump();
                if self.eat('>') {
                    TokenKind::TwoGreater
                } else if self.eat('&') {
                    TokenKind::GreaterAnd
                } else {
                    TokenKind::Greater
                }
            }
            '<' => {
                self.bump();
                TokenKind::Less
            }
            ';' => {
                self.bump();
                TokenKind::Semicolon
            }
            '(' => {
                self.bump();
                TokenKind::LeftParen
            }
            ')' => {
                self.bump();
                TokenKind::RightParen
            }
            '!' if self.peek_at(1).map_or(true, char::is_whitespace) => {
                self.bump();
                TokenKind::Not
            }
            _ => return self.scan_shell_word(pos, start),
        };
        Some(self.token(kind, None, pos, start))
    }

    /// Scan one shell word. The literal keeps the raw text, quotes included,
    /// for the shell evaluator to expand.
    fn scan_shell_word(
        &mut self,
        pos: Pos,
        start: usize,
    ) -> Option<Token> {
        loop {
            let Some(c) = self.peek() else {
                if self.starved {
                    return None;
                }
                break;
            };
            match c {
                ' ' | '\t' | '\r' | '\n' | '|' | '&' | ';' | '<' | '>' | '(' | ')' => break,
                '$' if self.peek_at(1) == Some('$') => break,
                '\\' => {
                    self.bump();
                    if self.bump().is_none() {
                        if self.starved {
                            return None;
                        }
                        break;
                    }
                }
                '\'' | '"' => {
                    self.bump();
                    loop {
                        match self.bump() {
                            Some(q) if q == c => break,
                            Some('\\') if c == '"' => {
                                self.bump();
                            }
                            Some(_) => {}
                            None if self.starved => return None,
                            None => {
                                self.error(pos.clone(), LexError::UnterminatedQuote);
                                let word = self.text(start);
                                return Some(self.token(
                                    TokenKind::ShellWord,
                                    Some(Literal::Ident(word)),
                                    pos,
                                    start,
                                ));
                            }
                        }
                    }
                }
                _ => {
                    self.bump();
                }
            }
        }
        let word = self.text(start);
        Some(self.token(TokenKind::ShellWord, Some(Literal::Ident(word)), pos, start))
    }
}

fn is_ident_start(c: char) -> bool {
    c == '_' || unicode_ident::is_xid_start(c)
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || unicode_ident::is_xid_continue(c)
}

/// Parse the text of an integer literal: decimal, `0x`, `0o`, `0b` or a
/// leading-zero octal, with `_` separators.
fn parse_int(text: &str) -> Option<BigInt> {
    let clean: String = text.chars().filter(|&c| c != '_').collect();
    let lower = clean.to_ascii_lowercase();
    let (digits, radix) = if let Some(rest) = lower.strip_prefix("0x") {
        (rest, 16)
    } else if let Some(rest) = lower.strip_prefix("0o") {
        (rest, 8)
    } else if let Some(rest) = lower.strip_prefix("0b") {
        (rest, 2)
    } else if lower.len() > 1 && lower.starts_with('0') {
        (&lower[1..], 8)
    } else {
        (lower.as_str(), 10)
    };
    if digits.is_empty() {
        return None;
    }
    BigInt::parse_bytes(digits.as_bytes(), radix)
}

/// Parse the text of a decimal float literal exactly
fn parse_float(text: &str) -> Option<BigRational> {
    let clean: String = text.chars().filter(|&c| c != '_').collect();
    let (mantissa, exponent) = match clean.find(['e', 'E']) {
        Some(i) => (&clean[..i], clean[i + 1..].parse::<i64>().ok()?),
        None => (clean.as_str(), 0),
    };
    if exponent.abs() > MAX_EXPONENT {
        return None;
    }
    let (int_part, frac_part) = match mantissa.find('.') {
        Some(i) => (&mantissa[..i], &mantissa[i + 1..]),
        None => (mantissa, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    let digits = format!("{}{}", int_part, frac_part);
    let numer = BigInt::parse_bytes(digits.as_bytes(), 10)?;
    let scale = exponent - frac_part.len() as i64;
    let ten = BigInt::from(10);
    let power = num_traits::pow(ten, scale.unsigned_abs() as usize);
    let value = if scale >= 0 {
        BigRational::from_integer(numer * power)
    } else {
        BigRational::new(numer, power)
    };
    Some(value)
}

/// Tokenize a complete source, comments included, ending with `Eof`
pub fn tokenize(
    filename: &str,
    src: &str,
) -> (Vec<Token>, Vec<Diagnostic>) {
    let mut lexer = Lexer::from_source(filename, src);
    let mut tokens = Vec::new();
    loop {
        match lexer.next_token() {
            Scan::Token(token) => {
                let eof = token.kind == TokenKind::Eof;
                tokens.push(token);
                if eof {
                    break;
                }
            }
            // A closed lexer always makes progress.
            Scan::NeedMore => break,
        }
    }
    (tokens, lexer.take_errors())
}

#[cfg(test)]
mod tests;
