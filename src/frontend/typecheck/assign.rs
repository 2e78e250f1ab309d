//! Assignability, conversion and assignment statements

use crate::frontend::lexer::tokens::TokenKind;
use crate::frontend::parser::ast::{Expr, ExprId, ExprKind};
use crate::frontend::types::{equal, underlying, Basic, ChanDir, Type};
use crate::util::span::Pos;

use super::errors::TypeError;
use super::scope::Obj;
use super::universe::{error_type, is_error};
use super::{Checker, Mode, Partial};

/// Right-hand side values of an assignment or declaration
pub(super) struct Values {
    pub parts: Vec<(Partial, String, Pos)>,
    /// A trailing error result was dropped
    pub elided: bool,
}

impl Checker {
    /// Give an untyped partial the type `target`
    ///
    /// Interfaces take the default type of the constant. Constants must be
    /// representable in a basic target; `num` accepts any numeric value.
    pub(super) fn convert_untyped(
        &mut self,
        p: &mut Partial,
        target: &Type,
        context: &'static str,
    ) -> Result<(), TypeError> {
        let Some(kind) = p.ty.basic().filter(|b| b.is_untyped()) else {
            return Ok(());
        };
        if p.is_invalid() || target.is_invalid() {
            return Ok(());
        }
        let mismatch = |p: &Partial| TypeError::Mismatch {
            value: match &p.val {
                Some(v) => v.to_string(),
                None if kind == Basic::UntypedNil => "nil".to_string(),
                None => format!("{} value", kind.name()),
            },
            found: p.ty.to_string(),
            expected: target.to_string(),
            context,
        };
        let converted = match underlying(target) {
            Type::Basic(tb) if tb.is_untyped() => {
                if kind == Basic::UntypedNil || tb == Basic::UntypedNil {
                    return if kind == tb { Ok(()) } else { Err(mismatch(&*p)) };
                }
                match (kind.untyped_rank(), tb.untyped_rank()) {
                    (Some(from), Some(to)) if from < to => Type::Basic(tb),
                    (Some(_), Some(_)) => return Ok(()),
                    _ if kind == tb => return Ok(()),
                    _ => return Err(mismatch(&*p)),
                }
            }
            Type::Interface(_) => {
                if kind == Basic::UntypedNil {
                    target.clone()
                } else {
                    Type::Basic(kind.default_type())
                }
            }
            Type::Basic(tb) => {
                if kind == Basic::UntypedNil {
                    if tb != Basic::UnsafePointer {
                        return Err(mismatch(&*p));
                    }
                } else if p.val.is_none() && !(kind.is_bool() && tb.is_bool()) {
                    return Err(mismatch(&*p));
                }
                target.clone()
            }
            _ if kind == Basic::UntypedNil && target.is_nillable() => target.clone(),
            _ => return Err(mismatch(&*p)),
        };
        if let (Some(val), Some(b)) = (&p.val, converted.basic()) {
            p.val = Some(val.represent(b)?);
        }
        p.ty = converted;
        self.record(p);
        Ok(())
    }

    /// Give an untyped value its default type
    pub(super) fn default_type(
        &mut self,
        p: &mut Partial,
        context: &'static str,
        pos: &Pos,
    ) -> bool {
        match p.ty.basic().filter(|b| b.is_untyped()) {
            None => true,
            Some(Basic::UntypedNil) => {
                self.error(pos, TypeError::UntypedNil(context));
                false
            }
            Some(kind) => {
                let target = Type::Basic(kind.default_type());
                match self.convert_untyped(p, &target, context) {
                    Ok(()) => true,
                    Err(err) => {
                        self.error(pos, err);
                        false
                    }
                }
            }
        }
    }

    /// Check that a value of type `from` may be assigned to `to`,
    /// explaining why not
    pub(super) fn assignable(
        &mut self,
        from: &Type,
        to: &Type,
    ) -> Result<(), String> {
        if from.is_invalid() || to.is_invalid() || equal(from, to) {
            return Ok(());
        }
        if from.is_untyped_nil() && to.is_nillable() {
            return Ok(());
        }
        let (uf, ut) = (underlying(from), underlying(to));
        if let Type::Interface(iface) = &ut {
            if !from.is_untyped() {
                return self.memory.implements(from, iface);
            }
        }
        if let (Type::Chan(ChanDir::Both, fe), Type::Chan(_, te)) = (&uf, &ut) {
            if equal(fe, te) && (from.as_named().is_none() || to.as_named().is_none()) {
                return Ok(());
            }
        }
        let unnamed = from.as_named().is_none() || to.as_named().is_none();
        if unnamed && !matches!(uf, Type::Basic(_)) && equal(&uf, &ut) {
            return Ok(());
        }
        Err(String::new())
    }

    /// Check that an explicit conversion from `from` to `to` is allowed
    pub(super) fn convertible(
        &mut self,
        from: &Type,
        to: &Type,
    ) -> bool {
        if self.assignable(from, to).is_ok() {
            return true;
        }
        let (uf, ut) = (underlying(from), underlying(to));
        if equal(&uf, &ut) {
            return true;
        }
        if from.is_numeric() && to.is_numeric() {
            return true;
        }
        let bytes_or_runes = |t: &Type| {
            matches!(t, Type::Slice(elem) if matches!(**elem, Type::Basic(Basic::Uint8 | Basic::Int32)))
        };
        if (from.is_string() && (bytes_or_runes(&ut) || to.is_string()))
            || (to.is_string() && (bytes_or_runes(&uf) || from.is_integer()))
        {
            return true;
        }
        match (&uf, &ut) {
            (Type::Pointer(a), Type::Pointer(b)) => equal(&underlying(a), &underlying(b)),
            _ => false,
        }
    }

    /// Assign a checked value to a slot of type `to`, reporting a mismatch
    pub(super) fn assign_to(
        &mut self,
        p: &mut Partial,
        text: &str,
        to: &Type,
        context: &'static str,
        pos: &Pos,
    ) -> bool {
        if p.is_invalid() || to.is_invalid() {
            return false;
        }
        if let Err(err) = self.convert_untyped(p, to, context) {
            self.error(pos, err);
            return false;
        }
        if let Err(reason) = self.assignable(&p.ty, to) {
            let err = if to.is_interface() && !reason.is_empty() {
                TypeError::NotImplemented {
                    ty: p.ty.to_string(),
                    iface: to.to_string(),
                    reason,
                }
            } else {
                TypeError::Mismatch {
                    value: text.to_string(),
                    found: p.ty.to_string(),
                    expected: to.to_string(),
                    context,
                }
            };
            self.error(pos, err);
            return false;
        }
        true
    }

    /// Check the right-hand side of an assignment to `want` values
    ///
    /// Handles calls returning several values, comma-ok forms, two-valued
    /// shell expressions, and elision of a trailing `error` result.
    pub(super) fn values(
        &mut self,
        want: usize,
        right: &mut [Expr],
        hints: &[Option<Type>],
        pos: &Pos,
    ) -> Option<Values> {
        let entry = |p: Partial, e: &Expr| (p, e.to_string(), e.pos.clone());
        if right.len() == want {
            let mut elided = false;
            let mut parts = Vec::with_capacity(want);
            for (i, r) in right.iter_mut().enumerate() {
                let hint = hints.get(i).and_then(Option::as_ref);
                let p = self.expr_hint(r, hint);
                let p = self.single(p, r);
                elided |= is_elided(r);
                parts.push(entry(p, r));
            }
            return Some(Values { parts, elided });
        }

        if let [r] = right {
            if want == 2 {
                if let ExprKind::Shell(sh) = &mut r.kind {
                    sh.elide_error = false;
                    let string = Type::Basic(Basic::String);
                    self.types.insert(r.id, Type::Tuple(vec![string.clone(), error_type()]));
                    let text = r.to_string();
                    let parts = vec![
                        (Partial::new(Mode::Var, string, r.id), text.clone(), r.pos.clone()),
                        (Partial::new(Mode::Var, error_type(), r.id), text, r.pos.clone()),
                    ];
                    return Some(Values { parts, elided: false });
                }
            }
            let p = self.expr(r);
            if p.is_invalid() {
                return None;
            }
            if want == 2 && p.mode != Mode::Unpacked && self.comma_ok(r) {
                let ok = Type::Basic(Basic::Bool);
                self.types.insert(r.id, Type::Tuple(vec![p.ty.clone(), ok.clone()]));
                let second = Partial::new(Mode::Var, ok, r.id);
                return Some(Values {
                    parts: vec![entry(p, r), entry(second, r)],
                    elided: false,
                });
            }
            if let (Mode::Unpacked, Type::Tuple(ts)) = (p.mode, &p.ty) {
                let elide = ts.len() == want + 1 && ts.last().is_some_and(is_error);
                if ts.len() == want || elide {
                    if elide {
                        set_elide(r);
                        self.types.insert(r.id, Type::Tuple(ts[..want].to_vec()));
                    }
                    let parts = ts[..want]
                        .iter()
                        .map(|t| entry(Partial::new(Mode::Var, t.clone(), p.expr), r))
                        .collect();
                    return Some(Values { parts, elided: elide });
                }
                self.error(
                    pos,
                    TypeError::AssignCount {
                        left: want,
                        right: ts.len(),
                    },
                );
                return None;
            }
        }
        self.error(
            pos,
            TypeError::AssignCount {
                left: want,
                right: right.len(),
            },
        );
        None
    }

    /// Map index, receive and type assertion have a comma-ok form
    fn comma_ok(
        &self,
        e: &Expr,
    ) -> bool {
        match &e.kind {
            ExprKind::Index { left, indices } => {
                indices.len() == 1
                    && matches!(self.types.get(&left.id).map(underlying), Some(Type::Map(..)))
            }
            ExprKind::Unary {
                op: TokenKind::ChanOp, ..
            } => true,
            ExprKind::TypeAssert { ty: Some(_), .. } => true,
            _ => false,
        }
    }

    /// `left = right`, `left := right` or `left op= right`
    pub(super) fn assign_stmt(
        &mut self,
        decl: bool,
        op: Option<TokenKind>,
        left: &mut [Expr],
        right: &mut [Expr],
        pos: &Pos,
    ) {
        if let Some(op) = op {
            self.compound_assign(op, left, right, pos);
            return;
        }
        if decl {
            self.define(left, right, pos);
            return;
        }

        let mut targets = Vec::with_capacity(left.len());
        for l in left.iter_mut() {
            if l.as_ident() == Some("_") {
                targets.push(None);
                continue;
            }
            let x = self.expr(l);
            if x.is_invalid() {
                targets.push(Some(Type::invalid()));
                continue;
            }
            if !self.is_assignable_target(l) {
                self.error(&l.pos, TypeError::NotAssignable(l.to_string()));
            }
            targets.push(Some(x.ty));
        }
        let Some(values) = self.values(left.len(), right, &targets, pos) else {
            return;
        };
        if values.elided {
            self.check_elision(left.iter(), pos);
        }
        for ((target, (mut p, text, vpos)), l) in targets.into_iter().zip(values.parts).zip(left.iter()) {
            match target {
                Some(ty) => {
                    self.assign_to(&mut p, &text, &ty, "assignment", &vpos);
                }
                None => {
                    if !p.is_invalid() {
                        self.default_type(&mut p, "assignment", &vpos);
                        self.types.insert(l.id, p.ty.clone());
                    }
                }
            }
        }
    }

    /// `a, b := ...` declares at least one new variable; the others are
    /// assigned
    fn define(
        &mut self,
        left: &mut [Expr],
        right: &mut [Expr],
        pos: &Pos,
    ) {
        let mut names = Vec::with_capacity(left.len());
        for l in left.iter() {
            match l.as_ident() {
                Some(name) => names.push(name.to_string()),
                None => {
                    self.error(&l.pos, TypeError::NonName(l.to_string()));
                    return;
                }
            }
        }
        let fresh: Vec<bool> = names
            .iter()
            .map(|n| n != "_" && !self.scopes.declared_here(n))
            .collect();
        // `_ := e` only evaluates e.
        if !fresh.iter().any(|f| *f) && !names.iter().all(|n| n == "_") {
            self.error(pos, TypeError::NoNewVariables);
        }
        let hints: Vec<Option<Type>> = names
            .iter()
            .zip(&fresh)
            .map(|(n, fresh)| {
                if *fresh || n == "_" {
                    None
                } else {
                    self.scopes.lookup(n).map(|o| o.ty.clone())
                }
            })
            .collect();

        let values = self.values(left.len(), right, &hints, pos);
        if values.as_ref().is_some_and(|v| v.elided) {
            let reused = left.iter().zip(&fresh).filter(|(_, fresh)| !**fresh).map(|(l, _)| l);
            self.check_elision(reused, pos);
        }
        let parts: Vec<Option<(Partial, String, Pos)>> = match values {
            Some(values) => values.parts.into_iter().map(Some).collect(),
            None => left.iter().map(|_| None).collect(),
        };
        for (((l, name), fresh), part) in left.iter_mut().zip(names).zip(fresh).zip(parts) {
            let Some((mut p, text, vpos)) = part else {
                if fresh {
                    self.declare(Obj::var(name, Type::invalid(), l.pos.clone()));
                }
                continue;
            };
            if fresh || name == "_" {
                if !p.is_invalid() {
                    self.default_type(&mut p, "assignment", &vpos);
                }
                let obj = Obj::var(name, p.ty.clone(), l.pos.clone());
                self.types.insert(l.id, obj.ty.clone());
                if fresh {
                    self.idents.insert(l.id, obj.clone());
                    self.declare(obj);
                }
                continue;
            }
            let Some(obj) = self.scopes.lookup_rec(&name) else {
                continue;
            };
            self.types.insert(l.id, obj.ty.clone());
            self.assign_to(&mut p, &text, &obj.ty, "assignment", &vpos);
            self.idents.insert(l.id, obj);
        }
    }

    fn compound_assign(
        &mut self,
        op: TokenKind,
        left: &mut [Expr],
        right: &mut [Expr],
        pos: &Pos,
    ) {
        let counts = (left.len(), right.len());
        let ([l], [r]) = (left, right) else {
            let (left, right) = counts;
            self.error(pos, TypeError::AssignCount { left, right });
            return;
        };
        let x = self.value(l);
        let y = self.value(r);
        if x.is_invalid() || y.is_invalid() {
            return;
        }
        if !self.is_assignable_target(l) {
            self.error(&l.pos, TypeError::NotAssignable(l.to_string()));
            return;
        }
        let text = format!("{} {} {}", l, op.as_str(), r);
        let left_text = l.to_string();
        let target = x.ty.clone();
        let mut result = self.binary(op, x, y, &text, &left_text, ExprId::fresh(), pos);
        self.assign_to(&mut result, &text, &target, "assignment", pos);
    }

    /// Elision may not drop the error into a named result
    pub(super) fn check_elision<'e>(
        &mut self,
        left: impl Iterator<Item = &'e Expr>,
        pos: &Pos,
    ) {
        let names = self.func_ctx().result_names.clone();
        for l in left {
            if let Some(name) = l.as_ident().filter(|n| names.iter().any(|r| r == n)) {
                self.error(pos, TypeError::ElideNamedResult(name.to_string()));
            }
        }
    }
}

pub(super) fn set_elide(e: &mut Expr) {
    if let ExprKind::Call { elide_error, .. } = &mut e.kind {
        *elide_error = true;
    }
}

fn is_elided(e: &Expr) -> bool {
    matches!(e.kind, ExprKind::Call { elide_error: true, .. })
}
