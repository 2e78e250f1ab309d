//! Type parsing
//!
//! Names parse to [`Type::Unresolved`]; the checker resolves them.

use std::collections::BTreeMap;

use num_traits::ToPrimitive;

use super::state::ParserState;
use super::ParseError;
use crate::frontend::lexer::tokens::{Literal, TokenKind};
use crate::frontend::types::{ChanDir, Field, FuncType, InterfaceType, StructType, Type};

/// A parameter list: types, names (empty when unnamed) and variadic flag
pub struct Params {
    pub types: Vec<Type>,
    pub names: Vec<String>,
    pub variadic: bool,
}

impl ParserState {
    /// Parse a type
    pub fn parse_type(&mut self) -> Type {
        match self.kind() {
            TokenKind::Ident => {
                let name = self.expect_ident().unwrap_or_default();
                if self.at(TokenKind::Period) && self.peek_kind(1) == TokenKind::Ident {
                    self.bump();
                    let sel = self.expect_ident().unwrap_or_default();
                    return Type::Unresolved {
                        package: Some(name),
                        name: sel,
                    };
                }
                Type::unresolved(name)
            }
            TokenKind::LeftBracket => self.parse_bracket_type(),
            TokenKind::Mul => {
                self.bump();
                Type::pointer(self.parse_type())
            }
            TokenKind::Func => {
                self.bump();
                let (ty, _, _) = self.parse_signature();
                Type::func(ty)
            }
            TokenKind::Map => {
                self.bump();
                self.expect(TokenKind::LeftBracket);
                let key = self.parse_type();
                self.expect(TokenKind::RightBracket);
                let value = self.parse_type();
                Type::map(key, value)
            }
            TokenKind::Chan => {
                self.bump();
                let dir = if self.skip(TokenKind::ChanOp) {
                    ChanDir::Send
                } else {
                    ChanDir::Both
                };
                Type::Chan(dir, Box::new(self.parse_type()))
            }
            TokenKind::ChanOp => {
                self.bump();
                self.expect(TokenKind::Chan);
                Type::Chan(ChanDir::Recv, Box::new(self.parse_type()))
            }
            TokenKind::Struct => self.parse_struct_type(),
            TokenKind::Interface => self.parse_interface_type(),
            TokenKind::LeftParen => {
                self.bump();
                let ty = self.parse_type();
                self.expect(TokenKind::RightParen);
                ty
            }
            _ => {
                self.error_expected("type");
                Type::invalid()
            }
        }
    }

    /// `[]T`, `[|]T`, `[N]T` or `[...]T`
    fn parse_bracket_type(&mut self) -> Type {
        self.bump();
        if self.skip(TokenKind::RightBracket) {
            return Type::slice(self.parse_type());
        }
        if self.at(TokenKind::Pipe) && self.peek_kind(1) == TokenKind::RightBracket {
            self.bump();
            self.bump();
            return Type::Table(Box::new(self.parse_type()));
        }
        if self.skip(TokenKind::Ellipsis) {
            self.expect(TokenKind::RightBracket);
            return Type::Array {
                len: -1,
                elem: Box::new(self.parse_type()),
                ellipsis: true,
            };
        }
        let pos = self.pos();
        let len = if self.at(TokenKind::Int) {
            match self.bump().literal {
                Some(Literal::Int(v)) => v.to_i64().filter(|n| *n >= 0),
                _ => None,
            }
        } else {
            self.parse_expr();
            None
        };
        let len = len.unwrap_or_else(|| {
            self.error(pos, ParseError::ArrayLength);
            0
        });
        self.expect(TokenKind::RightBracket);
        Type::Array {
            len,
            elem: Box::new(self.parse_type()),
            ellipsis: false,
        }
    }

    /// Parse `(params) results` after `func` or a method name
    pub fn parse_signature(&mut self) -> (FuncType, Vec<String>, Vec<String>) {
        let params = self.parse_params();
        let (results, result_names) = if self.at(TokenKind::LeftParen) {
            let results = self.parse_params();
            if results.variadic {
                let pos = self.pos();
                self.error(pos, ParseError::MisplacedEllipsis);
            }
            (results.types, results.names)
        } else if self.can_start_type() {
            (vec![self.parse_type()], Vec::new())
        } else {
            (Vec::new(), Vec::new())
        };
        let ty = FuncType {
            params: params.types,
            results,
            variadic: params.variadic,
            ..FuncType::default()
        };
        (ty, params.names, result_names)
    }

    /// Parse a parenthesized parameter list
    ///
    /// Entries are either all `name Type` groups (`a, b int, c string`) or
    /// all types. A list of bare names is a list of types.
    pub fn parse_params(&mut self) -> Params {
        let open = self.pos();
        self.expect(TokenKind::LeftParen);
        let mut entries: Vec<(Type, Option<Type>)> = Vec::new();
        let lev = self.expr_lev + 1;
        self.with_expr_lev(lev, |p| {
            while !p.at(TokenKind::RightParen) && !p.at_end() {
                let first = p.parse_param_type();
                let second = if p.at(TokenKind::Comma) || p.at(TokenKind::RightParen) {
                    None
                } else {
                    Some(p.parse_param_type())
                };
                entries.push((first, second));
                if !p.skip(TokenKind::Comma) {
                    break;
                }
            }
        });
        self.expect(TokenKind::RightParen);

        let mut types = Vec::new();
        let mut names = Vec::new();
        if entries.iter().any(|(_, second)| second.is_some()) {
            let mut pending = Vec::new();
            for (first, second) in entries {
                match first {
                    Type::Unresolved {
                        package: None,
                        name,
                    } => pending.push(name),
                    _ => self.error(open.clone(), ParseError::MixedParams),
                }
                if let Some(ty) = second {
                    for name in pending.drain(..) {
                        names.push(name);
                        types.push(ty.clone());
                    }
                }
            }
            if !pending.is_empty() {
                self.error(open.clone(), ParseError::MixedParams);
            }
        } else {
            types = entries.into_iter().map(|(first, _)| first).collect();
        }

        let mut variadic = false;
        let last = types.len().saturating_sub(1);
        for (i, ty) in types.iter_mut().enumerate() {
            if let Type::Ellipsis(elem) = ty {
                if i != last {
                    self.error(open.clone(), ParseError::MisplacedEllipsis);
                } else {
                    variadic = true;
                }
                *ty = Type::Slice(elem.clone());
            }
        }
        Params {
            types,
            names,
            variadic,
        }
    }

    fn parse_param_type(&mut self) -> Type {
        if self.skip(TokenKind::Ellipsis) {
            return Type::Ellipsis(Box::new(self.parse_type()));
        }
        self.parse_type()
    }

    /// `struct { a, b int; T; *pkg.U }`
    fn parse_struct_type(&mut self) -> Type {
        self.bump();
        self.expect(TokenKind::LeftBrace);
        let mut fields = Vec::new();
        while !self.at(TokenKind::RightBrace) && !self.at_end() {
            if self.skip(TokenKind::Semicolon) {
                continue;
            }
            let embedded = self.at(TokenKind::Mul)
                || (self.at(TokenKind::Ident)
                    && matches!(
                        self.peek_kind(1),
                        TokenKind::Period
                            | TokenKind::Semicolon
                            | TokenKind::RightBrace
                            | TokenKind::String
                    ));
            if embedded {
                let ty = self.parse_type();
                let name = embedded_name(&ty);
                fields.push(Field {
                    name,
                    ty,
                    embedded: true,
                });
            } else if self.at(TokenKind::Ident) {
                let mut names = vec![self.expect_ident().unwrap_or_default()];
                while self.skip(TokenKind::Comma) {
                    names.push(self.expect_ident().unwrap_or_default());
                }
                let ty = self.parse_type();
                for name in names {
                    fields.push(Field {
                        name,
                        ty: ty.clone(),
                        embedded: false,
                    });
                }
            } else {
                self.error_expected("field name or embedded type");
                self.sync_stmt();
                continue;
            }
            // Field tags are accepted and dropped.
            self.skip(TokenKind::String);
            if !self.at(TokenKind::RightBrace) && !self.expect(TokenKind::Semicolon) {
                self.sync_stmt();
            }
        }
        self.expect(TokenKind::RightBrace);
        Type::Struct(Box::new(StructType {
            fields,
            ..StructType::default()
        }))
    }

    /// `interface { M(int) error; Embedded }`
    fn parse_interface_type(&mut self) -> Type {
        self.bump();
        self.expect(TokenKind::LeftBrace);
        let mut methods = BTreeMap::new();
        let mut embeds = Vec::new();
        while !self.at(TokenKind::RightBrace) && !self.at_end() {
            if self.skip(TokenKind::Semicolon) {
                continue;
            }
            if self.at(TokenKind::Ident) && self.peek_kind(1) == TokenKind::LeftParen {
                let name = self.expect_ident().unwrap_or_default();
                let (sig, _, _) = self.parse_signature();
                methods.insert(name, sig);
            } else {
                embeds.push(self.parse_type());
            }
            if !self.at(TokenKind::RightBrace) && !self.expect(TokenKind::Semicolon) {
                self.sync_stmt();
            }
        }
        self.expect(TokenKind::RightBrace);
        Type::Interface(Box::new(InterfaceType { methods, embeds }))
    }
}

/// Field name of an embedded type: the type name without package or `*`
fn embedded_name(ty: &Type) -> String {
    match ty {
        Type::Pointer(elem) => embedded_name(elem),
        Type::Unresolved { name, .. } => name.clone(),
        other => other.to_string(),
    }
}
