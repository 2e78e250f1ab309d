//! Operand parsing: literals, names, parenthesized expressions, function
//! literals, type operands and shell expressions

use super::ast::*;
use super::state::ParserState;
use crate::frontend::lexer::tokens::TokenKind;
use crate::frontend::types::Type;

impl ParserState {
    /// Parse an operand
    pub fn parse_operand(&mut self) -> Expr {
        let pos = self.pos();
        match self.kind() {
            TokenKind::Int
            | TokenKind::Float
            | TokenKind::Imaginary
            | TokenKind::String
            | TokenKind::Rune => {
                let token = self.bump();
                match token.literal {
                    Some(lit) => Expr::new(pos, ExprKind::BasicLiteral(lit)),
                    None => Expr::bad(pos, "malformed literal"),
                }
            }
            TokenKind::Ident => match self.expect_ident() {
                Some(name) => Expr::ident(pos, name),
                None => Expr::bad(pos, "malformed name"),
            },
            TokenKind::LeftParen => {
                self.bump();
                let lev = self.expr_lev + 1;
                let inner = self.with_expr_lev(lev, |p| p.parse_expr());
                self.expect(TokenKind::RightParen);
                inner
            }
            TokenKind::Func => self.parse_func_operand(),
            TokenKind::LeftBracket
            | TokenKind::Map
            | TokenKind::Chan
            | TokenKind::Struct
            | TokenKind::Interface => {
                let ty = self.parse_type();
                Expr::new(pos, ExprKind::TypeExpr(ty))
            }
            TokenKind::Shell => self.parse_shell_expr(),
            _ => {
                self.error_expected("expression");
                if !matches!(
                    self.kind(),
                    TokenKind::Semicolon
                        | TokenKind::RightBrace
                        | TokenKind::RightParen
                        | TokenKind::RightBracket
                        | TokenKind::Eof
                ) {
                    self.bump();
                }
                Expr::bad(pos, "expected expression")
            }
        }
    }

    /// `func(params) results { body }`, or a function type
    fn parse_func_operand(&mut self) -> Expr {
        let pos = self.pos();
        self.bump();
        let (ty, param_names, result_names) = self.parse_signature();
        if !self.at(TokenKind::LeftBrace) {
            return Expr::new(pos, ExprKind::TypeExpr(Type::func(ty)));
        }
        let body = self.parse_block();
        Expr::new(
            pos,
            ExprKind::FuncLiteral(Box::new(FuncLiteral {
                name: String::new(),
                receiver_name: String::new(),
                pointer_receiver: false,
                ty,
                param_names,
                result_names,
                body: Box::new(body),
            })),
        )
    }
}
