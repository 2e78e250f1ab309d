//! Expression parsing: binary operators by precedence climbing, then unary
//! operators over primary expressions

use super::ast::*;
use super::state::ParserState;
use crate::frontend::lexer::tokens::TokenKind;

/// Lowest binary precedence (`||`)
pub const PREC_LOWEST: u8 = 1;

impl ParserState {
    /// Parse an expression
    pub fn parse_expr(&mut self) -> Expr {
        self.parse_binary(PREC_LOWEST)
    }

    /// Parse a comma-separated expression list
    pub fn parse_expr_list(&mut self) -> Vec<Expr> {
        let mut list = vec![self.parse_expr()];
        while self.skip(TokenKind::Comma) {
            list.push(self.parse_expr());
        }
        list
    }

    /// Parse a binary expression whose operators bind at least as tightly
    /// as `min_prec`
    pub fn parse_binary(
        &mut self,
        min_prec: u8,
    ) -> Expr {
        let mut left = self.parse_unary();
        loop {
            let op = self.kind();
            let prec = op.precedence();
            if prec == 0 || prec < min_prec {
                return left;
            }
            self.bump();
            let right = self.parse_binary(prec + 1);
            let pos = left.pos.clone();
            left = Expr::new(
                pos,
                ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
            );
        }
    }

    /// Parse a unary expression: `+ - ! * & <-` or `range`
    pub fn parse_unary(&mut self) -> Expr {
        let pos = self.pos();
        match self.kind() {
            op @ (TokenKind::Add
            | TokenKind::Sub
            | TokenKind::Not
            | TokenKind::Mul
            | TokenKind::Ref
            | TokenKind::ChanOp) => {
                self.bump();
                let expr = self.parse_unary();
                Expr::new(
                    pos,
                    ExprKind::Unary {
                        op,
                        expr: Box::new(expr),
                    },
                )
            }
            TokenKind::Range => {
                self.bump();
                let expr = self.parse_unary();
                Expr::new(pos, ExprKind::Range(Box::new(expr)))
            }
            _ => self.parse_primary(),
        }
    }

    /// Parse an operand followed by selectors, indices, calls, type
    /// assertions and composite literal bodies
    pub fn parse_primary(&mut self) -> Expr {
        let operand = self.parse_operand();
        self.parse_suffixes(operand)
    }
}
