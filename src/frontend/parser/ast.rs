//! Syntax tree
//!
//! Three sorts of node: [`Expr`], [`Stmt`] and [`Type`] (shared with the
//! checker, see [`crate::frontend::types`]). Every node carries the [`Pos`]
//! of its first token; synthetic nodes carry a zero line.
//!
//! Expressions have an [`ExprId`], unique in the process, which the checker
//! uses to key its type and constant tables.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::frontend::lexer::tokens::{Literal, TokenKind};
use crate::frontend::types::{FuncType, Type};
use crate::util::span::Pos;

static NEXT_EXPR_ID: AtomicU32 = AtomicU32::new(1);

/// Identity of an expression node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExprId(u32);

impl ExprId {
    /// Allocate a fresh id
    pub fn fresh() -> Self {
        ExprId(NEXT_EXPR_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A parsed source file
#[derive(Debug, Clone)]
pub struct File {
    pub filename: String,
    /// Name from a leading `package` clause
    pub package: Option<String>,
    pub stmts: Vec<Stmt>,
}

/// Expression
#[derive(Debug, Clone)]
pub struct Expr {
    pub id: ExprId,
    pub pos: Pos,
    pub kind: ExprKind,
}

impl Expr {
    pub fn new(
        pos: Pos,
        kind: ExprKind,
    ) -> Self {
        Self {
            id: ExprId::fresh(),
            pos,
            kind,
        }
    }

    pub fn bad(
        pos: Pos,
        message: impl Into<String>,
    ) -> Self {
        Self::new(pos, ExprKind::Bad(message.into()))
    }

    pub fn ident(
        pos: Pos,
        name: impl Into<String>,
    ) -> Self {
        Self::new(pos, ExprKind::Ident(name.into()))
    }

    /// The name of a plain identifier expression
    pub fn as_ident(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Ident(name) => Some(name),
            _ => None,
        }
    }

    pub fn is_bad(&self) -> bool {
        matches!(self.kind, ExprKind::Bad(_))
    }
}

/// Expression variants
#[derive(Debug, Clone)]
pub enum ExprKind {
    /// Placeholder for an expression that failed to parse
    Bad(String),
    Binary {
        op: TokenKind,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: TokenKind,
        expr: Box<Expr>,
    },
    Selector {
        left: Box<Expr>,
        right: String,
    },
    /// `low:high:max` component of an index expression
    Slice {
        low: Option<Box<Expr>>,
        high: Option<Box<Expr>>,
        max: Option<Box<Expr>>,
    },
    /// `left[i]`, `left[a:b]`, or a table index `left[i, j]`
    Index {
        left: Box<Expr>,
        indices: Vec<Expr>,
    },
    /// `left.(T)`; `ty` is `None` for the `.(type)` of a type switch
    TypeAssert {
        left: Box<Expr>,
        ty: Option<Type>,
    },
    BasicLiteral(Literal),
    FuncLiteral(Box<FuncLiteral>),
    /// `T{...}` for a named or struct type. An element literal with its
    /// type elided carries an invalid type until checked.
    CompLiteral {
        ty: Type,
        keys: Vec<Expr>,
        values: Vec<Expr>,
    },
    MapLiteral {
        ty: Type,
        keys: Vec<Expr>,
        values: Vec<Expr>,
    },
    /// `keys` holds optional constant indices, empty when none are given
    SliceLiteral {
        ty: Type,
        keys: Vec<Expr>,
        values: Vec<Expr>,
    },
    ArrayLiteral {
        ty: Type,
        keys: Vec<Expr>,
        values: Vec<Expr>,
    },
    /// `[|]T{{|"a", "b"|}, {1, 2}}`
    TableLiteral {
        ty: Type,
        col_names: Vec<Expr>,
        rows: Vec<Vec<Expr>>,
    },
    /// A type in expression position: a conversion or `make` argument
    TypeExpr(Type),
    Ident(String),
    Call {
        func: Box<Expr>,
        args: Vec<Expr>,
        /// Last argument spread with `...`
        ellipsis: bool,
        /// Set by the checker when the trailing error result is elided
        elide_error: bool,
    },
    /// `range e`
    Range(Box<Expr>),
    Shell(Box<ShellExpr>),
}

/// Function literal, named function, or method
#[derive(Debug, Clone)]
pub struct FuncLiteral {
    /// Empty for anonymous functions
    pub name: String,
    /// Empty for non-methods
    pub receiver_name: String,
    pub pointer_receiver: bool,
    pub ty: FuncType,
    pub param_names: Vec<String>,
    pub result_names: Vec<String>,
    /// A `Block` statement
    pub body: Box<Stmt>,
}

/// `$$ ... $$`
#[derive(Debug, Clone)]
pub struct ShellExpr {
    /// One list per line
    pub cmds: Vec<ShellList>,
    /// Output is captured as the expression's value
    pub trap_out: bool,
    /// Set by the checker when the error result is elided
    pub elide_error: bool,
}

/// `AndOr ((';' | '&') AndOr)*`
#[derive(Debug, Clone)]
pub struct ShellList {
    pub pos: Pos,
    pub and_or: Vec<ShellAndOr>,
}

/// `Pipeline (('&&' | '||') Pipeline)*`
#[derive(Debug, Clone)]
pub struct ShellAndOr {
    pub pos: Pos,
    pub pipelines: Vec<ShellPipeline>,
    /// `LogicalAnd` or `LogicalOr` between consecutive pipelines
    pub seps: Vec<TokenKind>,
    /// Terminated by `&`
    pub background: bool,
}

/// `['!'] Cmd ('|' Cmd)*`
#[derive(Debug, Clone)]
pub struct ShellPipeline {
    pub pos: Pos,
    pub bang: bool,
    pub cmds: Vec<ShellCmd>,
}

/// A command: a subshell or a simple command
#[derive(Debug, Clone)]
pub enum ShellCmd {
    Subshell(Pos, ShellList),
    Simple(ShellSimpleCmd),
}

/// Assignments, redirections and argument words
#[derive(Debug, Clone)]
pub struct ShellSimpleCmd {
    pub pos: Pos,
    pub assigns: Vec<ShellAssign>,
    pub redirects: Vec<ShellRedirect>,
    pub args: Vec<String>,
}

/// `[n]op word`, e.g. `2>&1` or `> out.txt`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellRedirect {
    pub number: Option<u32>,
    /// One of `<`, `>`, `>>`, `>&`, `&>`
    pub token: TokenKind,
    pub filename: String,
}

/// `KEY=value` before the command word
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellAssign {
    pub key: String,
    pub value: String,
}

/// Statement
#[derive(Debug, Clone)]
pub struct Stmt {
    pub pos: Pos,
    pub kind: StmtKind,
}

impl Stmt {
    pub fn new(
        pos: Pos,
        kind: StmtKind,
    ) -> Self {
        Self { pos, kind }
    }

    pub fn bad(
        pos: Pos,
        message: impl Into<String>,
    ) -> Self {
        Self::new(pos, StmtKind::Bad(message.into()))
    }

    pub fn block(
        pos: Pos,
        stmts: Vec<Stmt>,
    ) -> Self {
        Self::new(pos, StmtKind::Block(stmts))
    }
}

/// `import [name] "path"`
#[derive(Debug, Clone)]
pub struct Import {
    pub pos: Pos,
    pub name: Option<String>,
    pub path: String,
}

/// `names [type] [= values]` in a const or var declaration
#[derive(Debug, Clone)]
pub struct ValueSpec {
    pub pos: Pos,
    pub names: Vec<String>,
    pub ty: Option<Type>,
    pub values: Vec<Expr>,
}

/// `methodik T U { methods }`
#[derive(Debug, Clone)]
pub struct MethodikDecl {
    pub name: String,
    /// The declared underlying type; a named type once checked
    pub ty: Type,
    pub methods: Vec<FuncLiteral>,
}

/// One `case` of an expression switch
#[derive(Debug, Clone)]
pub struct SwitchCase {
    pub pos: Pos,
    pub default: bool,
    pub conds: Vec<Expr>,
    pub body: Vec<Stmt>,
}

/// One `case` of a type switch
#[derive(Debug, Clone)]
pub struct TypeSwitchCase {
    pub pos: Pos,
    pub default: bool,
    pub types: Vec<Type>,
    pub body: Vec<Stmt>,
}

/// One `case` of a select
#[derive(Debug, Clone)]
pub struct SelectCase {
    pub pos: Pos,
    pub default: bool,
    /// Send, receive or receive-assignment
    pub stmt: Option<Box<Stmt>>,
    pub body: Vec<Stmt>,
}

/// Statement variants
#[derive(Debug, Clone)]
pub enum StmtKind {
    /// Placeholder for a statement that failed to parse
    Bad(String),
    Import(Import),
    ImportSet(Vec<Import>),
    /// `type Name T`; the type becomes a named type once checked
    TypeDecl {
        name: String,
        ty: Type,
    },
    MethodikDecl(Box<MethodikDecl>),
    Const(ValueSpec),
    ConstSet(Vec<ValueSpec>),
    Var(ValueSpec),
    VarSet(Vec<ValueSpec>),
    /// `=`, `:=` or a compound assignment; `x++` is `x += 1`
    Assign {
        decl: bool,
        op: Option<TokenKind>,
        left: Vec<Expr>,
        right: Vec<Expr>,
    },
    Block(Vec<Stmt>),
    If {
        init: Option<Box<Stmt>>,
        cond: Expr,
        body: Box<Stmt>,
        else_: Option<Box<Stmt>>,
    },
    For {
        init: Option<Box<Stmt>>,
        cond: Option<Expr>,
        post: Option<Box<Stmt>>,
        body: Box<Stmt>,
    },
    Switch {
        init: Option<Box<Stmt>>,
        cond: Option<Expr>,
        cases: Vec<SwitchCase>,
    },
    /// `switch [init;] [v :=] x.(type) { ... }`
    TypeSwitch {
        init: Option<Box<Stmt>>,
        assign: Box<Stmt>,
        cases: Vec<TypeSwitchCase>,
    },
    Go(Expr),
    Defer(Expr),
    /// `for [key[, value] :=|=] range expr { ... }`
    Range {
        key: Option<Expr>,
        value: Option<Expr>,
        decl: bool,
        expr: Expr,
        body: Box<Stmt>,
    },
    Return(Vec<Expr>),
    /// An expression statement
    Simple(Expr),
    Send {
        chan: Expr,
        value: Expr,
    },
    /// `break`, `continue`, `goto` or `fallthrough`
    Branch {
        kind: TokenKind,
        label: Option<String>,
    },
    Labeled {
        label: String,
        stmt: Box<Stmt>,
    },
    Select(Vec<SelectCase>),
}
