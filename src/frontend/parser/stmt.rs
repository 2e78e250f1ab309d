//! Statement parsing

use std::sync::Arc;

use num_bigint::BigInt;

use super::ast::*;
use super::state::ParserState;
use super::ParseError;
use crate::frontend::lexer::tokens::{Literal, TokenKind};
use crate::frontend::types::{AliasType, Type};
use crate::util::span::Pos;

impl ParserState {
    /// Parse statements up to a closing `}`, a case clause or EOF
    pub fn parse_stmt_list(&mut self) -> Vec<Stmt> {
        let mut stmts = Vec::new();
        self.parse_stmt_list_into(&mut stmts);
        stmts
    }

    pub(super) fn parse_stmt_list_into(
        &mut self,
        out: &mut Vec<Stmt>,
    ) {
        loop {
            while self.skip(TokenKind::Semicolon) {}
            if self.at_list_end() {
                return;
            }
            let start = self.index();
            self.parse_stmt_into(out);
            if self.skip(TokenKind::Semicolon) || self.at_list_end() {
                continue;
            }
            self.error_expected("; or newline");
            self.sync_stmt();
            if self.index() == start {
                self.bump();
            }
        }
    }

    fn at_list_end(&self) -> bool {
        matches!(
            self.kind(),
            TokenKind::RightBrace | TokenKind::Case | TokenKind::Default | TokenKind::Eof
        )
    }

    /// Parse one statement, appending it to `out`
    ///
    /// A grouped `type (...)` declaration appends one statement per type.
    pub fn parse_stmt_into(
        &mut self,
        out: &mut Vec<Stmt>,
    ) {
        if self.at(TokenKind::Type) {
            out.extend(self.parse_type_decls());
        } else {
            out.push(self.parse_stmt());
        }
    }

    /// Parse a statement
    pub fn parse_stmt(&mut self) -> Stmt {
        let pos = self.pos();
        match self.kind() {
            TokenKind::Import => self.parse_import(),
            TokenKind::Const | TokenKind::Var => self.parse_value_decl(),
            TokenKind::Type => {
                let mut decls = self.parse_type_decls();
                if decls.len() == 1 {
                    decls.remove(0)
                } else {
                    self.error(
                        pos.clone(),
                        ParseError::Message("grouped type declaration not allowed here".into()),
                    );
                    Stmt::bad(pos, "grouped type declaration")
                }
            }
            TokenKind::Methodik => {
                self.bump();
                self.parse_methodik(pos)
            }
            TokenKind::Func if self.peek_kind(1) == TokenKind::Ident => self.parse_func_decl(),
            TokenKind::LeftBrace => self.parse_block(),
            TokenKind::If => self.parse_if(),
            TokenKind::For => self.parse_for(),
            TokenKind::Switch => self.parse_switch(),
            TokenKind::Select => self.parse_select(),
            TokenKind::Go | TokenKind::Defer => {
                let go = self.bump().kind == TokenKind::Go;
                let call = self.parse_expr();
                if go {
                    Stmt::new(pos, StmtKind::Go(call))
                } else {
                    Stmt::new(pos, StmtKind::Defer(call))
                }
            }
            TokenKind::Return => {
                self.bump();
                let results = if matches!(
                    self.kind(),
                    TokenKind::Semicolon | TokenKind::RightBrace | TokenKind::Eof
                ) {
                    Vec::new()
                } else {
                    self.parse_expr_list()
                };
                Stmt::new(pos, StmtKind::Return(results))
            }
            TokenKind::Break | TokenKind::Continue | TokenKind::Goto | TokenKind::Fallthrough => {
                let kind = self.bump().kind;
                let label = if kind != TokenKind::Fallthrough && self.at(TokenKind::Ident) {
                    self.expect_ident()
                } else {
                    None
                };
                if kind == TokenKind::Goto && label.is_none() {
                    self.error_expected("label");
                }
                Stmt::new(pos, StmtKind::Branch { kind, label })
            }
            TokenKind::Ident if self.peek_kind(1) == TokenKind::Colon => {
                let label = self.expect_ident().unwrap_or_default();
                self.bump();
                let stmt = if self.at_list_end() {
                    Stmt::block(self.pos(), Vec::new())
                } else {
                    self.parse_stmt()
                };
                Stmt::new(
                    pos,
                    StmtKind::Labeled {
                        label,
                        stmt: Box::new(stmt),
                    },
                )
            }
            _ => self.parse_simple_stmt(),
        }
    }

    /// `{ stmts }`
    pub fn parse_block(&mut self) -> Stmt {
        let pos = self.pos();
        if !self.expect(TokenKind::LeftBrace) {
            return Stmt::bad(pos, "expected block");
        }
        let stmts = self.with_expr_lev(0, |p| p.parse_stmt_list());
        self.expect(TokenKind::RightBrace);
        Stmt::block(pos, stmts)
    }

    /// Expression, assignment, inc/dec or send statement
    pub fn parse_simple_stmt(&mut self) -> Stmt {
        let pos = self.pos();
        let mut left = self.parse_expr_list();
        match self.kind() {
            TokenKind::Assign | TokenKind::Define => {
                let decl = self.bump().kind == TokenKind::Define;
                let right = self.parse_expr_list();
                Stmt::new(
                    pos,
                    StmtKind::Assign {
                        decl,
                        op: None,
                        left,
                        right,
                    },
                )
            }
            kind if kind.assign_op().is_some() => {
                self.bump();
                let right = vec![self.parse_expr()];
                Stmt::new(
                    pos,
                    StmtKind::Assign {
                        decl: false,
                        op: kind.assign_op(),
                        left,
                        right,
                    },
                )
            }
            TokenKind::Inc | TokenKind::Dec => {
                let token = self.bump();
                let op = if token.kind == TokenKind::Inc {
                    TokenKind::Add
                } else {
                    TokenKind::Sub
                };
                let one = Expr::new(token.pos, ExprKind::BasicLiteral(Literal::Int(BigInt::from(1))));
                Stmt::new(
                    pos,
                    StmtKind::Assign {
                        decl: false,
                        op: Some(op),
                        left,
                        right: vec![one],
                    },
                )
            }
            TokenKind::ChanOp => {
                self.bump();
                let value = self.parse_expr();
                let chan = left.swap_remove(0);
                Stmt::new(pos, StmtKind::Send { chan, value })
            }
            _ => {
                if left.len() > 1 {
                    self.error_expected(":= or = or comma");
                }
                Stmt::new(pos, StmtKind::Simple(left.swap_remove(0)))
            }
        }
    }

    /// The optional `init;` and condition of an if, for or switch header.
    /// `{` in a header opens the body, so the header runs at level -1.
    fn parse_header(&mut self) -> (Option<Stmt>, Option<Stmt>) {
        if self.at(TokenKind::LeftBrace) {
            return (None, None);
        }
        self.with_expr_lev(-1, |p| {
            let first = if p.at(TokenKind::Semicolon) {
                None
            } else {
                Some(p.parse_simple_stmt())
            };
            // A newline before `{` is not an init separator.
            let explicit = p.current().kind == TokenKind::Semicolon && !p.current().is_inserted();
            if !explicit {
                return (None, first);
            }
            p.bump();
            let second = if p.at(TokenKind::LeftBrace) {
                None
            } else {
                Some(p.parse_simple_stmt())
            };
            (first, second)
        })
    }

    fn parse_if(&mut self) -> Stmt {
        let pos = self.pos();
        self.bump();
        let (init, cond) = self.parse_header();
        let cond = match cond.map(|s| s.kind) {
            Some(StmtKind::Simple(expr)) => expr,
            Some(kind) => {
                self.error(pos.clone(), ParseError::NotValue(stmt_name(&kind)));
                Expr::bad(pos.clone(), "statement as condition")
            }
            None => {
                self.error_expected("condition");
                Expr::bad(pos.clone(), "missing condition")
            }
        };
        let body = self.parse_block();
        let else_ = if self.skip(TokenKind::Else) {
            match self.kind() {
                TokenKind::If => Some(Box::new(self.parse_if())),
                TokenKind::LeftBrace => Some(Box::new(self.parse_block())),
                _ => {
                    self.error_expected("if statement or block");
                    None
                }
            }
        } else {
            None
        };
        Stmt::new(
            pos,
            StmtKind::If {
                init: init.map(Box::new),
                cond,
                body: Box::new(body),
                else_,
            },
        )
    }

    fn parse_for(&mut self) -> Stmt {
        let pos = self.pos();
        self.bump();
        if self.at(TokenKind::LeftBrace) {
            let body = self.parse_block();
            return Stmt::new(
                pos,
                StmtKind::For {
                    init: None,
                    cond: None,
                    post: None,
                    body: Box::new(body),
                },
            );
        }
        let (init, cond, post, three) = self.with_expr_lev(-1, |p| {
            let first = if p.at(TokenKind::Semicolon) {
                None
            } else {
                Some(p.parse_simple_stmt())
            };
            if p.at(TokenKind::LeftBrace) {
                return (None, first, None, false);
            }
            p.expect(TokenKind::Semicolon);
            let cond = if p.at(TokenKind::Semicolon) {
                None
            } else {
                Some(p.parse_simple_stmt())
            };
            p.expect(TokenKind::Semicolon);
            let post = if p.at(TokenKind::LeftBrace) {
                None
            } else {
                Some(p.parse_simple_stmt())
            };
            (first, cond, post, true)
        });

        if !three {
            if let Some(range) = cond.as_ref().and_then(range_clause) {
                let body = self.parse_block();
                let (key, value, decl, expr) = range;
                return Stmt::new(
                    pos,
                    StmtKind::Range {
                        key,
                        value,
                        decl,
                        expr,
                        body: Box::new(body),
                    },
                );
            }
        }
        let cond = cond.and_then(|s| self.stmt_to_expr(s));
        let body = self.parse_block();
        Stmt::new(
            pos,
            StmtKind::For {
                init: init.map(Box::new),
                cond,
                post: post.map(Box::new),
                body: Box::new(body),
            },
        )
    }

    fn stmt_to_expr(
        &mut self,
        stmt: Stmt,
    ) -> Option<Expr> {
        match stmt.kind {
            StmtKind::Simple(expr) => Some(expr),
            _ => {
                self.error(stmt.pos.clone(), ParseError::NotValue(stmt_name(&stmt.kind)));
                Some(Expr::bad(stmt.pos, "expected expression"))
            }
        }
    }

    fn parse_switch(&mut self) -> Stmt {
        let pos = self.pos();
        self.bump();
        let (init, tag) = self.parse_header();
        let init = init.map(Box::new);

        let tag = match tag {
            Some(tag) if is_type_switch_guard(&tag) => tag,
            other => return self.parse_expr_switch(pos, init, other),
        };
        let cases = self.parse_clauses(|p, default| {
            let case_pos = p.pos();
            let mut types = Vec::new();
            if !default {
                types.push(p.parse_type());
                while p.skip(TokenKind::Comma) {
                    types.push(p.parse_type());
                }
            }
            p.expect(TokenKind::Colon);
            TypeSwitchCase {
                pos: case_pos,
                default,
                types,
                body: p.parse_stmt_list(),
            }
        });
        Stmt::new(
            pos,
            StmtKind::TypeSwitch {
                init,
                assign: Box::new(tag),
                cases,
            },
        )
    }

    fn parse_expr_switch(
        &mut self,
        pos: Pos,
        init: Option<Box<Stmt>>,
        tag: Option<Stmt>,
    ) -> Stmt {
        let tag = match tag {
            Some(stmt) => self.stmt_to_expr(stmt),
            None => None,
        };
        let cases = self.parse_clauses(|p, default| {
            let case_pos = p.pos();
            let conds = if default { Vec::new() } else { p.parse_expr_list() };
            p.expect(TokenKind::Colon);
            SwitchCase {
                pos: case_pos,
                default,
                conds,
                body: p.parse_stmt_list(),
            }
        });
        Stmt::new(
            pos,
            StmtKind::Switch {
                init,
                cond: tag,
                cases,
            },
        )
    }

    fn parse_select(&mut self) -> Stmt {
        let pos = self.pos();
        self.bump();
        let cases = self.parse_clauses(|p, default| {
            let case_pos = p.pos();
            let stmt = if default {
                None
            } else {
                Some(Box::new(p.parse_simple_stmt()))
            };
            p.expect(TokenKind::Colon);
            SelectCase {
                pos: case_pos,
                default,
                stmt,
                body: p.parse_stmt_list(),
            }
        });
        Stmt::new(pos, StmtKind::Select(cases))
    }

    /// `{ case ...: stmts  default: stmts }`; `clause` is called after the
    /// `case` or `default` keyword
    fn parse_clauses<T>(
        &mut self,
        mut clause: impl FnMut(&mut Self, bool) -> T,
    ) -> Vec<T> {
        let mut cases = Vec::new();
        if !self.expect(TokenKind::LeftBrace) {
            return cases;
        }
        self.with_expr_lev(0, |p| loop {
            while p.skip(TokenKind::Semicolon) {}
            match p.kind() {
                TokenKind::Case => {
                    p.bump();
                    cases.push(clause(p, false));
                }
                TokenKind::Default => {
                    p.bump();
                    cases.push(clause(p, true));
                }
                TokenKind::RightBrace | TokenKind::Eof => break,
                _ => {
                    p.error_expected("case or default or }");
                    p.sync_stmt();
                    if p.at(TokenKind::RightBrace) {
                        break;
                    }
                }
            }
        });
        self.expect(TokenKind::RightBrace);
        cases
    }

    /// `import "path"`, `import name "path"` or `import ( ... )`
    fn parse_import(&mut self) -> Stmt {
        let pos = self.pos();
        self.bump();
        if self.skip(TokenKind::LeftParen) {
            let mut imports = Vec::new();
            while !self.at(TokenKind::RightParen) && !self.at_end() {
                if self.skip(TokenKind::Semicolon) {
                    continue;
                }
                let start = self.index();
                if let Some(import) = self.parse_import_spec() {
                    imports.push(import);
                }
                if !self.at(TokenKind::RightParen) && !self.expect(TokenKind::Semicolon) {
                    self.sync_stmt();
                }
                if self.index() == start {
                    self.bump();
                }
            }
            self.expect(TokenKind::RightParen);
            return Stmt::new(pos, StmtKind::ImportSet(imports));
        }
        match self.parse_import_spec() {
            Some(import) => Stmt::new(pos, StmtKind::Import(import)),
            None => Stmt::bad(pos, "malformed import"),
        }
    }

    fn parse_import_spec(&mut self) -> Option<Import> {
        let pos = self.pos();
        let name = if self.at(TokenKind::Ident) {
            self.expect_ident()
        } else {
            None
        };
        if !self.at(TokenKind::String) {
            self.error_expected("import path");
            return None;
        }
        match self.bump().literal {
            Some(Literal::String(path)) => Some(Import { pos, name, path }),
            _ => None,
        }
    }

    /// `const`/`var` declarations, single or grouped
    fn parse_value_decl(&mut self) -> Stmt {
        let pos = self.pos();
        let is_const = self.bump().kind == TokenKind::Const;
        if self.skip(TokenKind::LeftParen) {
            let mut specs = Vec::new();
            while !self.at(TokenKind::RightParen) && !self.at_end() {
                if self.skip(TokenKind::Semicolon) {
                    continue;
                }
                let start = self.index();
                specs.push(self.parse_value_spec());
                if !self.at(TokenKind::RightParen) && !self.expect(TokenKind::Semicolon) {
                    self.sync_stmt();
                }
                if self.index() == start {
                    self.bump();
                }
            }
            self.expect(TokenKind::RightParen);
            let kind = if is_const {
                StmtKind::ConstSet(specs)
            } else {
                StmtKind::VarSet(specs)
            };
            return Stmt::new(pos, kind);
        }
        let spec = self.parse_value_spec();
        let kind = if is_const {
            StmtKind::Const(spec)
        } else {
            StmtKind::Var(spec)
        };
        Stmt::new(pos, kind)
    }

    /// `a, b [T] [= x, y]`
    fn parse_value_spec(&mut self) -> ValueSpec {
        let pos = self.pos();
        let mut names = vec![self.expect_ident().unwrap_or_default()];
        while self.skip(TokenKind::Comma) {
            names.push(self.expect_ident().unwrap_or_default());
        }
        let ty = if self.can_start_type() {
            Some(self.parse_type())
        } else {
            None
        };
        let values = if self.skip(TokenKind::Assign) {
            self.parse_expr_list()
        } else {
            Vec::new()
        };
        ValueSpec {
            pos,
            names,
            ty,
            values,
        }
    }

    /// `type Name T`, `type Name = T`, `type Name methodik T {...}` or a
    /// grouped `type ( ... )`
    fn parse_type_decls(&mut self) -> Vec<Stmt> {
        self.bump();
        if !self.skip(TokenKind::LeftParen) {
            return vec![self.parse_type_spec()];
        }
        let mut decls = Vec::new();
        while !self.at(TokenKind::RightParen) && !self.at_end() {
            if self.skip(TokenKind::Semicolon) {
                continue;
            }
            let start = self.index();
            decls.push(self.parse_type_spec());
            if !self.at(TokenKind::RightParen) && !self.expect(TokenKind::Semicolon) {
                self.sync_stmt();
            }
            if self.index() == start {
                self.bump();
            }
        }
        self.expect(TokenKind::RightParen);
        decls
    }

    fn parse_type_spec(&mut self) -> Stmt {
        let pos = self.pos();
        if self.at(TokenKind::Ident) && self.peek_kind(1) == TokenKind::Methodik {
            return self.parse_methodik(pos);
        }
        let Some(name) = self.expect_ident() else {
            self.sync_stmt();
            return Stmt::bad(pos, "expected type name");
        };
        if self.skip(TokenKind::Assign) {
            let ty = self.parse_type();
            let alias = Type::Alias(Arc::new(AliasType {
                name: name.clone(),
                ty,
            }));
            return Stmt::new(pos, StmtKind::TypeDecl { name, ty: alias });
        }
        let ty = self.parse_type();
        Stmt::new(pos, StmtKind::TypeDecl { name, ty })
    }

    /// `methodik Name T { func (r [*]) M(...) ... }`, entered after the
    /// `methodik` keyword. In the `type Name methodik T` spelling the name
    /// comes first.
    fn parse_methodik(
        &mut self,
        pos: Pos,
    ) -> Stmt {
        let name = self.expect_ident().unwrap_or_default();
        self.skip(TokenKind::Methodik);
        let ty = self.parse_type();
        let mut methods = Vec::new();
        self.expect(TokenKind::LeftBrace);
        while !self.at(TokenKind::RightBrace) && !self.at_end() {
            if self.skip(TokenKind::Semicolon) {
                continue;
            }
            let start = self.index();
            if self.at(TokenKind::Func) {
                if let Some(method) = self.parse_method(&name) {
                    methods.push(method);
                }
            } else {
                self.error_expected("method");
                self.sync_stmt();
            }
            if self.index() == start {
                self.bump();
            }
        }
        self.expect(TokenKind::RightBrace);
        Stmt::new(
            pos,
            StmtKind::MethodikDecl(Box::new(MethodikDecl { name, ty, methods })),
        )
    }

    /// `func (r) M(...) R { ... }` or `func (r *) M(...)`; the receiver may
    /// also spell out the type name
    fn parse_method(
        &mut self,
        type_name: &str,
    ) -> Option<FuncLiteral> {
        self.bump();
        let recv_pos = self.pos();
        self.expect(TokenKind::LeftParen);
        let receiver_name = self.expect_ident().unwrap_or_default();
        let pointer_receiver = self.skip(TokenKind::Mul);
        if self.at(TokenKind::Ident) {
            let named = self.expect_ident().unwrap_or_default();
            if named != type_name {
                self.error(recv_pos.clone(), ParseError::InvalidReceiver);
            }
        }
        if !self.expect(TokenKind::RightParen) {
            self.error(recv_pos, ParseError::InvalidReceiver);
            self.sync_stmt();
            return None;
        }
        let name = self.expect_ident()?;
        let (ty, param_names, result_names) = self.parse_signature();
        let body = self.parse_block();
        Some(FuncLiteral {
            name,
            receiver_name,
            pointer_receiver,
            ty,
            param_names,
            result_names,
            body: Box::new(body),
        })
    }

    /// `func name(params) results { body }`
    fn parse_func_decl(&mut self) -> Stmt {
        let pos = self.pos();
        self.bump();
        let name = self.expect_ident().unwrap_or_default();
        let (ty, param_names, result_names) = self.parse_signature();
        let body = self.parse_block();
        let func = FuncLiteral {
            name,
            receiver_name: String::new(),
            pointer_receiver: false,
            ty,
            param_names,
            result_names,
            body: Box::new(body),
        };
        Stmt::new(
            pos.clone(),
            StmtKind::Simple(Expr::new(pos, ExprKind::FuncLiteral(Box::new(func)))),
        )
    }
}

/// Split a `k, v := range e` or `range e` header into its parts
fn range_clause(stmt: &Stmt) -> Option<(Option<Expr>, Option<Expr>, bool, Expr)> {
    match &stmt.kind {
        StmtKind::Simple(Expr {
            kind: ExprKind::Range(expr),
            ..
        }) => Some((None, None, false, (**expr).clone())),
        StmtKind::Assign {
            decl,
            op: None,
            left,
            right,
        } if right.len() == 1 && left.len() <= 2 => match &right[0].kind {
            ExprKind::Range(expr) => Some((
                left.first().cloned(),
                left.get(1).cloned(),
                *decl,
                (**expr).clone(),
            )),
            _ => None,
        },
        _ => None,
    }
}

fn stmt_name(kind: &StmtKind) -> String {
    match kind {
        StmtKind::Assign { decl: true, .. } => "declaration".to_string(),
        StmtKind::Assign { .. } => "assignment".to_string(),
        StmtKind::Send { .. } => "send statement".to_string(),
        _ => "statement".to_string(),
    }
}

/// `x.(type)` or `v := x.(type)`
fn is_type_switch_guard(stmt: &Stmt) -> bool {
    let guard = |e: &Expr| matches!(e.kind, ExprKind::TypeAssert { ty: None, .. });
    match &stmt.kind {
        StmtKind::Simple(expr) => guard(expr),
        StmtKind::Assign {
            decl: true,
            left,
            right,
            ..
        } => left.len() == 1 && right.len() == 1 && guard(&right[0]),
        _ => false,
    }
}
