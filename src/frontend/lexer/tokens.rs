//! Token types

use num_bigint::BigInt;
use num_rational::BigRational;
use std::fmt;

use crate::util::span::Pos;

/// Token kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Special
    Unknown,
    Eof,
    Comment,

    // Identifiers and literals
    Ident,
    Int,
    Float,
    Imaginary,
    String,
    Rune,

    // Operators
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
    Ref,
    Pipe,
    LogicalAnd,
    LogicalOr,
    ChanOp,
    Inc,
    Dec,
    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,
    Assign,
    Define,
    Not,
    Ellipsis,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    RemAssign,
    PowAssign,
    PipeAssign,

    // Delimiters
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
    LeftBraceTable,
    RightBraceTable,
    Comma,
    Period,
    Semicolon,
    Colon,

    // Shell
    Shell,
    ShellWord,
    ShellPipe,
    ShellNewline,
    GreaterAnd,
    AndGreater,
    TwoGreater,

    // Keywords (28 total)
    Package,
    Import,
    Func,
    Return,
    Defer,
    Select,
    Switch,
    Case,
    Default,
    Fallthrough,
    Const,
    Var,
    If,
    Else,
    For,
    Range,
    Continue,
    Break,
    Goto,
    Go,
    Chan,
    Map,
    Struct,
    Methodik,
    Interface,
    Type,
}

/// Keyword table, looked up after scanning an identifier
const KEYWORDS: &[(&str, TokenKind)] = &[
    ("package", TokenKind::Package),
    ("import", TokenKind::Import),
    ("func", TokenKind::Func),
    ("return", TokenKind::Return),
    ("defer", TokenKind::Defer),
    ("select", TokenKind::Select),
    ("switch", TokenKind::Switch),
    ("case", TokenKind::Case),
    ("default", TokenKind::Default),
    ("fallthrough", TokenKind::Fallthrough),
    ("const", TokenKind::Const),
    ("var", TokenKind::Var),
    ("if", TokenKind::If),
    ("else", TokenKind::Else),
    ("for", TokenKind::For),
    ("range", TokenKind::Range),
    ("continue", TokenKind::Continue),
    ("break", TokenKind::Break),
    ("goto", TokenKind::Goto),
    ("go", TokenKind::Go),
    ("chan", TokenKind::Chan),
    ("map", TokenKind::Map),
    ("struct", TokenKind::Struct),
    ("methodik", TokenKind::Methodik),
    ("interface", TokenKind::Interface),
    ("type", TokenKind::Type),
];

impl TokenKind {
    /// Look up a keyword by its spelling
    pub fn keyword(ident: &str) -> Option<TokenKind> {
        KEYWORDS.iter().find(|(kw, _)| *kw == ident).map(|(_, kind)| *kind)
    }

    /// Check if this is a keyword
    pub fn is_keyword(self) -> bool {
        KEYWORDS.iter().any(|(_, kind)| *kind == self)
    }

    /// Check if a newline after this token becomes a semicolon
    pub fn inserts_semicolon(self) -> bool {
        matches!(
            self,
            TokenKind::Ident
                | TokenKind::Int
                | TokenKind::Float
                | TokenKind::Imaginary
                | TokenKind::String
                | TokenKind::Rune
                | TokenKind::RightParen
                | TokenKind::RightBracket
                | TokenKind::RightBrace
                | TokenKind::Inc
                | TokenKind::Dec
                | TokenKind::Break
                | TokenKind::Continue
                | TokenKind::Fallthrough
                | TokenKind::Return
        )
    }

    /// Binary operator precedence, or 0 if not a binary operator
    pub fn precedence(self) -> u8 {
        match self {
            TokenKind::LogicalOr => 1,
            TokenKind::LogicalAnd => 2,
            TokenKind::Equal
            | TokenKind::NotEqual
            | TokenKind::Less
            | TokenKind::LessEqual
            | TokenKind::Greater
            | TokenKind::GreaterEqual => 3,
            TokenKind::Add | TokenKind::Sub | TokenKind::Pipe => 4,
            TokenKind::Mul | TokenKind::Div | TokenKind::Rem | TokenKind::Pow => 5,
            _ => 0,
        }
    }

    /// Check if this is a comparison operator
    pub fn is_comparison(self) -> bool {
        self.precedence() == 3
    }

    /// The binary operator of a compound assignment (`+=` -> `+`)
    pub fn assign_op(self) -> Option<TokenKind> {
        match self {
            TokenKind::AddAssign => Some(TokenKind::Add),
            TokenKind::SubAssign => Some(TokenKind::Sub),
            TokenKind::MulAssign => Some(TokenKind::Mul),
            TokenKind::DivAssign => Some(TokenKind::Div),
            TokenKind::RemAssign => Some(TokenKind::Rem),
            TokenKind::PowAssign => Some(TokenKind::Pow),
            TokenKind::PipeAssign => Some(TokenKind::Pipe),
            _ => None,
        }
    }

    /// Source spelling of operators, delimiters and keywords
    pub fn as_str(self) -> &'static str {
        if let Some((kw, _)) = KEYWORDS.iter().find(|(_, kind)| *kind == self) {
            return kw;
        }
        match self {
            TokenKind::Unknown => "unknown",
            TokenKind::Eof => "EOF",
            TokenKind::Comment => "comment",
            TokenKind::Ident => "identifier",
            TokenKind::Int => "integer literal",
            TokenKind::Float => "float literal",
            TokenKind::Imaginary => "imaginary literal",
            TokenKind::String => "string literal",
            TokenKind::Rune => "rune literal",
            TokenKind::Add => "+",
            TokenKind::Sub => "-",
            TokenKind::Mul => "*",
            TokenKind::Div => "/",
            TokenKind::Rem => "%",
            TokenKind::Pow => "^",
            TokenKind::Ref => "&",
            TokenKind::Pipe => "|",
            TokenKind::LogicalAnd => "&&",
            TokenKind::LogicalOr => "||",
            TokenKind::ChanOp => "<-",
            TokenKind::Inc => "++",
            TokenKind::Dec => "--",
            TokenKind::Equal => "==",
            TokenKind::NotEqual => "!=",
            TokenKind::Less => "<",
            TokenKind::Greater => ">",
            TokenKind::LessEqual => "<=",
            TokenKind::GreaterEqual => ">=",
            TokenKind::Assign => "=",
            TokenKind::Define => ":=",
            TokenKind::Not => "!",
            TokenKind::Ellipsis => "...",
            TokenKind::AddAssign => "+=",
            TokenKind::SubAssign => "-=",
            TokenKind::MulAssign => "*=",
            TokenKind::DivAssign => "/=",
            TokenKind::RemAssign => "%=",
            TokenKind::PowAssign => "^=",
            TokenKind::PipeAssign => "|=",
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::LeftBracket => "[",
            TokenKind::RightBracket => "]",
            TokenKind::LeftBrace => "{",
            TokenKind::RightBrace => "}",
            TokenKind::LeftBraceTable => "{|",
            TokenKind::RightBraceTable => "|}",
            TokenKind::Comma => ",",
            TokenKind::Period => ".",
            TokenKind::Semicolon => ";",
            TokenKind::Colon => ":",
            TokenKind::Shell => "$$",
            TokenKind::ShellWord => "shell word",
            TokenKind::ShellPipe => "|",
            TokenKind::ShellNewline => "newline",
            TokenKind::GreaterAnd => ">&",
            TokenKind::AndGreater => "&>",
            TokenKind::TwoGreater => ">>",
            _ => "keyword",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Literal payload of a token
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Integer literal value
    Int(BigInt),
    /// Float literal value, exact
    Float(BigRational),
    /// Imaginary literal, the coefficient of `i`
    Imaginary(BigRational),
    /// Interpreted or raw string, escapes resolved
    String(String),
    /// Rune literal
    Rune(char),
    /// Identifier name, or shell word text
    Ident(String),
}

impl fmt::Display for Literal {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Literal::Int(v) => write!(f, "{}", v),
            Literal::Float(v) => write!(f, "{}", crate::frontend::types::constant::format_rat(v)),
            Literal::Imaginary(v) => {
                write!(f, "{}i", crate::frontend::types::constant::format_rat(v))
            }
            Literal::String(s) => f.write_str(&quote(s, '"')),
            Literal::Rune(c) => f.write_str(&quote(&c.to_string(), '\'')),
            Literal::Ident(s) => f.write_str(s),
        }
    }
}

/// Quote a string or rune the way the lexer reads it back
pub fn quote(
    s: &str,
    delim: char,
) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push(delim);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c == delim => {
                out.push('\\');
                out.push(c);
            }
            c if (c as u32) < 0x20 || c == '\u{7f}' => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push(delim);
    out
}

/// Token
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: Option<Literal>,
    pub pos: Pos,
    /// Byte offset of the first byte of the token
    pub start: usize,
    /// Byte offset one past the token; equals `start` for inserted semicolons
    pub end: usize,
}

impl Token {
    /// Identifier name or shell word text, if any
    pub fn ident(&self) -> Option<&str> {
        match &self.literal {
            Some(Literal::Ident(s)) => Some(s),
            _ => None,
        }
    }

    /// Check if this semicolon was inserted for a newline or EOF
    pub fn is_inserted(&self) -> bool {
        self.start == self.end
    }
}

impl From<TokenKind> for Token {
    fn from(kind: TokenKind) -> Self {
        Token {
            kind,
            literal: None,
            pos: Pos::dummy(),
            start: 0,
            end: 0,
        }
    }
}
