//! Postfix parsing: selectors, type assertions, indices and slices, calls
//! and composite literal bodies

use super::ast::*;
use super::state::ParserState;
use super::ParseError;
use crate::frontend::lexer::tokens::TokenKind;
use crate::frontend::types::Type;
use crate::util::span::Pos;

impl ParserState {
    /// Apply postfix operators to an operand
    pub fn parse_suffixes(
        &mut self,
        mut x: Expr,
    ) -> Expr {
        loop {
            let pos = x.pos.clone();
            match self.kind() {
                TokenKind::Period => {
                    self.bump();
                    if self.skip(TokenKind::LeftParen) {
                        let ty = if self.skip(TokenKind::Type) {
                            None
                        } else {
                            Some(self.parse_type())
                        };
                        self.expect(TokenKind::RightParen);
                        x = Expr::new(
                            pos,
                            ExprKind::TypeAssert {
                                left: Box::new(x),
                                ty,
                            },
                        );
                    } else {
                        let right = self.expect_ident().unwrap_or_default();
                        x = Expr::new(
                            pos,
                            ExprKind::Selector {
                                left: Box::new(x),
                                right,
                            },
                        );
                    }
                }
                TokenKind::LeftBracket => {
                    self.bump();
                    let lev = self.expr_lev + 1;
                    let indices = self.with_expr_lev(lev, |p| {
                        let mut indices = vec![p.parse_index()];
                        while p.skip(TokenKind::Comma) {
                            indices.push(p.parse_index());
                        }
                        indices
                    });
                    self.expect(TokenKind::RightBracket);
                    x = Expr::new(
                        pos,
                        ExprKind::Index {
                            left: Box::new(x),
                            indices,
                        },
                    );
                }
                TokenKind::LeftParen => {
                    self.bump();
                    let lev = self.expr_lev + 1;
                    let (args, ellipsis) = self.with_expr_lev(lev, |p| p.parse_call_args());
                    self.expect(TokenKind::RightParen);
                    x = Expr::new(
                        pos,
                        ExprKind::Call {
                            func: Box::new(x),
                            args,
                            ellipsis,
                            elide_error: false,
                        },
                    );
                }
                TokenKind::LeftBrace => {
                    let Some(ty) = literal_type(&x) else {
                        return x;
                    };
                    if self.expr_lev < 0 && is_bare_name(&x) {
                        return x;
                    }
                    x = self.parse_composite(pos, ty);
                }
                _ => return x,
            }
        }
    }

    /// One index component: an expression or a `low:high[:max]` slice
    fn parse_index(&mut self) -> Expr {
        let pos = self.pos();
        let low = if self.at(TokenKind::Colon) {
            None
        } else {
            let e = self.parse_expr();
            if !self.at(TokenKind::Colon) {
                return e;
            }
            Some(Box::new(e))
        };
        self.expect(TokenKind::Colon);
        let ends = |k: TokenKind| {
            matches!(
                k,
                TokenKind::Colon | TokenKind::RightBracket | TokenKind::Comma
            )
        };
        let high = if ends(self.kind()) {
            None
        } else {
            Some(Box::new(self.parse_expr()))
        };
        let max = if self.skip(TokenKind::Colon) {
            Some(Box::new(self.parse_expr()))
        } else {
            None
        };
        Expr::new(pos, ExprKind::Slice { low, high, max })
    }

    fn parse_call_args(&mut self) -> (Vec<Expr>, bool) {
        let mut args = Vec::new();
        let mut ellipsis = false;
        while !self.at(TokenKind::RightParen) && !self.at_end() {
            args.push(self.parse_expr());
            if self.skip(TokenKind::Ellipsis) {
                ellipsis = true;
            }
            if !self.skip(TokenKind::Comma) {
                break;
            }
        }
        (args, ellipsis)
    }

    /// Parse `{ ... }` after a literal type
    pub fn parse_composite(
        &mut self,
        pos: Pos,
        ty: Type,
    ) -> Expr {
        if matches!(ty, Type::Table(_)) {
            return self.parse_table_literal(pos, ty);
        }
        let (keys, values) = self.parse_literal_value();
        let kind = match ty {
            Type::Map(..) => ExprKind::MapLiteral { ty, keys, values },
            Type::Slice(_) => ExprKind::SliceLiteral { ty, keys, values },
            Type::Array { .. } => ExprKind::ArrayLiteral { ty, keys, values },
            ty => ExprKind::CompLiteral { ty, keys, values },
        };
        Expr::new(pos, kind)
    }

    /// `{ [key:] value, ... }`
    fn parse_literal_value(&mut self) -> (Vec<Expr>, Vec<Expr>) {
        let mut keys = Vec::new();
        let mut values = Vec::new();
        let open = self.pos();
        self.expect(TokenKind::LeftBrace);
        let lev = self.expr_lev + 1;
        self.with_expr_lev(lev, |p| {
            while !p.at(TokenKind::RightBrace) && !p.at_end() {
                let element = p.parse_element();
                if p.skip(TokenKind::Colon) {
                    keys.push(element);
                    values.push(p.parse_element());
                } else {
                    values.push(element);
                }
                if !p.skip(TokenKind::Comma) {
                    break;
                }
            }
        });
        self.expect(TokenKind::RightBrace);
        if !keys.is_empty() && keys.len() != values.len() {
            self.error(open, ParseError::MixedKeys);
        }
        (keys, values)
    }

    /// A literal element; a bare `{...}` is a literal whose type is elided
    fn parse_element(&mut self) -> Expr {
        if self.at(TokenKind::LeftBrace) {
            let pos = self.pos();
            let (keys, values) = self.parse_literal_value();
            return Expr::new(
                pos,
                ExprKind::CompLiteral {
                    ty: Type::invalid(),
                    keys,
                    values,
                },
            );
        }
        self.parse_expr()
    }

    /// `[|]T{{|"a", "b"|}, {1, 2}, ...}`
    fn parse_table_literal(
        &mut self,
        pos: Pos,
        ty: Type,
    ) -> Expr {
        let mut col_names = Vec::new();
        let mut rows = Vec::new();
        self.expect(TokenKind::LeftBrace);
        let lev = self.expr_lev + 1;
        self.with_expr_lev(lev, |p| {
            if p.skip(TokenKind::LeftBraceTable) {
                if !p.at(TokenKind::RightBraceTable) {
                    col_names = p.parse_expr_list();
                }
                p.expect(TokenKind::RightBraceTable);
                if !p.skip(TokenKind::Comma) {
                    return;
                }
            }
            while p.skip(TokenKind::LeftBrace) {
                let mut row = Vec::new();
                while !p.at(TokenKind::RightBrace) && !p.at_end() {
                    row.push(p.parse_expr());
                    if !p.skip(TokenKind::Comma) {
                        break;
                    }
                }
                p.expect(TokenKind::RightBrace);
                rows.push(row);
                if !p.skip(TokenKind::Comma) {
                    break;
                }
            }
        });
        self.expect(TokenKind::RightBrace);
        Expr::new(
            pos,
            ExprKind::TableLiteral {
                ty,
                col_names,
                rows,
            },
        )
    }
}

/// The type named by an expression that may precede a composite literal
pub(super) fn literal_type(x: &Expr) -> Option<Type> {
    match &x.kind {
        ExprKind::Ident(name) => Some(Type::unresolved(name.clone())),
        ExprKind::Selector { left, right } => left.as_ident().map(|pkg| Type::Unresolved {
            package: Some(pkg.to_string()),
            name: right.clone(),
        }),
        ExprKind::TypeExpr(
            ty @ (Type::Array { .. }
            | Type::Slice(_)
            | Type::Map(..)
            | Type::Struct(_)
            | Type::Table(_)),
        ) => Some(ty.clone()),
        _ => None,
    }
}

fn is_bare_name(x: &Expr) -> bool {
    matches!(x.kind, ExprKind::Ident(_) | ExprKind::Selector { .. })
}
