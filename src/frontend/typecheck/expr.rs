//! Expression checking
//!
//! Every checked expression gets its type recorded, constants their value
//! too. Operators follow Go's rules: operands are matched after untyped
//! constants are converted to the other side's type, and constant
//! operations fold exactly before the result is represented.

use crate::frontend::lexer::tokens::{Literal, TokenKind};
use crate::frontend::parser::ast::{Expr, ExprId, ExprKind, FuncLiteral, StmtKind};
use crate::frontend::types::constant::{ConstError, ConstValue};
use crate::frontend::types::{equal, unalias, underlying, Basic, ChanDir, FuncType, Type};
use crate::util::span::Pos;

use super::assign::set_elide;
use super::errors::TypeError;
use super::methods::Selection;
use super::scope::{Obj, ObjKind, ScopeKind};
use super::stmt::collect_labels;
use super::universe::is_error;
use super::{Checker, FuncContext, Mode, Partial};

impl Checker {
    /// Check an expression in any mode
    pub(super) fn expr(
        &mut self,
        e: &mut Expr,
    ) -> Partial {
        self.expr_hint(e, None)
    }

    /// Check an expression; `hint` types an elided composite literal
    pub(super) fn expr_hint(
        &mut self,
        e: &mut Expr,
        hint: Option<&Type>,
    ) -> Partial {
        let p = self.expr_kind(e, hint);
        self.record(&p);
        p
    }

    /// Check an expression that must produce exactly one value
    pub(super) fn value(
        &mut self,
        e: &mut Expr,
    ) -> Partial {
        self.value_hint(e, None)
    }

    pub(super) fn value_hint(
        &mut self,
        e: &mut Expr,
        hint: Option<&Type>,
    ) -> Partial {
        let p = self.expr_hint(e, hint);
        self.single(p, e)
    }

    /// Reject partials that are not a single value
    ///
    /// A call of type `(T, error)` is the exception: its error is elided
    /// and checked when the program runs.
    pub(super) fn single(
        &mut self,
        p: Partial,
        e: &mut Expr,
    ) -> Partial {
        if let Some(first) = self.elide(&p, e) {
            return first;
        }
        let err = match p.mode {
            Mode::Void => TypeError::NoValue(e.to_string()),
            Mode::Unpacked => TypeError::MultiValue(e.to_string()),
            Mode::TypeExpr => TypeError::NotValue(format!("type {}", p.ty)),
            Mode::Builtin => TypeError::NotValue(format!("builtin {}", e)),
            _ => return p,
        };
        self.error(&e.pos, err);
        Partial::invalid(p.expr)
    }

    fn elide(
        &mut self,
        p: &Partial,
        e: &mut Expr,
    ) -> Option<Partial> {
        let (Mode::Unpacked, Type::Tuple(ts)) = (p.mode, &p.ty) else {
            return None;
        };
        let [first, last] = ts.as_slice() else {
            return None;
        };
        if !is_error(last) || !matches!(e.kind, ExprKind::Call { .. }) {
            return None;
        }
        let first = first.clone();
        set_elide(e);
        self.types.insert(p.expr, first.clone());
        Some(Partial::new(Mode::Var, first, p.expr))
    }

    fn expr_kind(
        &mut self,
        e: &mut Expr,
        hint: Option<&Type>,
    ) -> Partial {
        let id = e.id;
        match &mut e.kind {
            ExprKind::Bad(_) => Partial::invalid(id),
            ExprKind::BasicLiteral(lit) => literal(lit, id),
            ExprKind::Ident(name) => {
                let name = name.clone();
                self.ident_expr(&name, id, &e.pos)
            }
            ExprKind::TypeExpr(ty) => {
                self.resolve_in_place(ty, &e.pos);
                if ty.is_invalid() {
                    return Partial::invalid(id);
                }
                Partial::new(Mode::TypeExpr, ty.clone(), id)
            }
            ExprKind::Shell(sh) => {
                sh.elide_error = true;
                Partial::new(Mode::Var, Type::Basic(Basic::String), id)
            }
            ExprKind::Range(inner) => {
                let err = TypeError::NotValue(format!("range {}", inner));
                self.error(&e.pos, err);
                Partial::invalid(id)
            }
            ExprKind::Slice { .. } => {
                let err = TypeError::NotValue(e.to_string());
                self.error(&e.pos, err);
                Partial::invalid(id)
            }
            ExprKind::Binary { .. } => self.binary_expr(e),
            ExprKind::Unary { .. } => self.unary_expr(e, hint),
            ExprKind::Selector { .. } => self.selector_expr(e),
            ExprKind::Index { .. } => self.index_expr(e),
            ExprKind::TypeAssert { .. } => self.type_assert_expr(e),
            ExprKind::FuncLiteral(_) => self.func_literal_expr(e),
            ExprKind::Call { .. } => self.call_expr(e),
            ExprKind::CompLiteral { .. }
            | ExprKind::MapLiteral { .. }
            | ExprKind::SliceLiteral { .. }
            | ExprKind::ArrayLiteral { .. }
            | ExprKind::TableLiteral { .. } => self.composite_expr(e, hint),
        }
    }

    fn ident_expr(
        &mut self,
        name: &str,
        id: ExprId,
        pos: &Pos,
    ) -> Partial {
        if name == "_" {
            self.error(pos, TypeError::NotValue("_".to_string()));
            return Partial::invalid(id);
        }
        let Some(obj) = self.scopes.lookup_rec(name) else {
            self.error(pos, TypeError::Undeclared(name.to_string()));
            return Partial::invalid(id);
        };
        self.idents.insert(id, obj.clone());
        if obj.kind == ObjKind::Pkg {
            self.error(pos, TypeError::NotValue(format!("package {}", name)));
            return Partial::invalid(id);
        }
        obj_partial(&obj, id)
    }

    fn binary_expr(
        &mut self,
        e: &mut Expr,
    ) -> Partial {
        let (id, pos) = (e.id, e.pos.clone());
        let ExprKind::Binary { op, left, right } = &mut e.kind else {
            return Partial::invalid(id);
        };
        let op = *op;
        let x = self.value(left);
        let y = self.value(right);
        if x.is_invalid() || y.is_invalid() {
            return Partial::invalid(id);
        }
        let text = format!("{} {} {}", left, op.as_str(), right);
        let left_text = left.to_string();
        self.binary(op, x, y, &text, &left_text, id, &pos)
    }

    /// Check `x op y` on already checked operands
    #[allow(clippy::too_many_arguments)]
    pub(super) fn binary(
        &mut self,
        op: TokenKind,
        x: Partial,
        y: Partial,
        text: &str,
        left_text: &str,
        id: ExprId,
        pos: &Pos,
    ) -> Partial {
        match op {
            TokenKind::LogicalAnd | TokenKind::LogicalOr => self.logical(op, x, y, text, left_text, id, pos),
            TokenKind::Equal
            | TokenKind::NotEqual
            | TokenKind::Less
            | TokenKind::LessEqual
            | TokenKind::Greater
            | TokenKind::GreaterEqual => self.comparison(op, x, y, text, left_text, id, pos),
            _ => self.arithmetic(op, x, y, text, left_text, id, pos),
        }
    }

    /// Give untyped operands the type of the other side, or promote two
    /// untyped numeric operands to the larger kind
    pub(super) fn match_operands(
        &mut self,
        x: &mut Partial,
        y: &mut Partial,
        text: &str,
    ) -> Result<(), TypeError> {
        let mismatch = |x: &Partial, y: &Partial| TypeError::MismatchedOperands {
            expr: text.to_string(),
            left: x.ty.to_string(),
            right: y.ty.to_string(),
        };
        let result = match (x.ty.is_untyped(), y.ty.is_untyped()) {
            (true, false) => {
                let target = y.ty.clone();
                self.convert_untyped(x, &target, "expression")
            }
            (false, true) => {
                let target = x.ty.clone();
                self.convert_untyped(y, &target, "expression")
            }
            (true, true) => {
                let (Some(a), Some(b)) = (x.ty.basic(), y.ty.basic()) else {
                    return Ok(());
                };
                match (a.untyped_rank(), b.untyped_rank()) {
                    (Some(ra), Some(rb)) if ra < rb => self.convert_untyped(x, &Type::Basic(b), "expression"),
                    (Some(ra), Some(rb)) if rb < ra => self.convert_untyped(y, &Type::Basic(a), "expression"),
                    _ => Ok(()),
                }
            }
            (false, false) => Ok(()),
        };
        match result {
            Err(TypeError::Mismatch { .. }) => Err(mismatch(&*x, &*y)),
            other => other,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn logical(
        &mut self,
        op: TokenKind,
        mut x: Partial,
        mut y: Partial,
        text: &str,
        left_text: &str,
        id: ExprId,
        pos: &Pos,
    ) -> Partial {
        for side in [&x, &y] {
            if !side.ty.is_bool() {
                let err = TypeError::OperatorNotDefined {
                    op: op.as_str(),
                    value: left_text.to_string(),
                    ty: side.ty.to_string(),
                };
                self.error(pos, err);
                return Partial::invalid(id);
            }
        }
        if let Err(err) = self.match_operands(&mut x, &mut y, text) {
            self.error(pos, err);
            return Partial::invalid(id);
        }
        if !equal(&x.ty, &y.ty) {
            self.mismatched(text, &x, &y, pos);
            return Partial::invalid(id);
        }
        match (&x.val, &y.val) {
            (Some(a), Some(b)) => match a.binary(op, b) {
                Ok(v) => Partial::constant(x.ty, v, id),
                Err(err) => {
                    self.error(pos, err.into());
                    Partial::invalid(id)
                }
            },
            _ => Partial::new(Mode::Var, x.ty, id),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn comparison(
        &mut self,
        op: TokenKind,
        mut x: Partial,
        mut y: Partial,
        text: &str,
        left_text: &str,
        id: ExprId,
        pos: &Pos,
    ) -> Partial {
        let with_nil = x.ty.is_untyped_nil() || y.ty.is_untyped_nil();
        if x.ty.is_untyped_nil() && y.ty.is_untyped_nil() {
            self.error(pos, TypeError::NilComparison(text.to_string()));
            return Partial::invalid(id);
        }
        if let Err(err) = self.match_operands(&mut x, &mut y, text) {
            self.error(pos, err);
            return Partial::invalid(id);
        }
        let related = equal(&x.ty, &y.ty)
            || self.assignable(&x.ty, &y.ty).is_ok()
            || self.assignable(&y.ty, &x.ty).is_ok();
        if !related {
            self.mismatched(text, &x, &y, pos);
            return Partial::invalid(id);
        }
        let ordering = !matches!(op, TokenKind::Equal | TokenKind::NotEqual);
        let defined = if ordering {
            x.ty.basic().is_some_and(Basic::is_ordered)
        } else {
            with_nil || (is_comparable(&x.ty) && is_comparable(&y.ty))
        };
        if !defined {
            let err = TypeError::OperatorNotDefined {
                op: op.as_str(),
                value: left_text.to_string(),
                ty: x.ty.to_string(),
            };
            self.error(pos, err);
            return Partial::invalid(id);
        }
        let untyped_bool = Type::Basic(Basic::UntypedBool);
        match (&x.val, &y.val) {
            (Some(a), Some(b)) => match a.compare(op, b) {
                Ok(v) => Partial::constant(untyped_bool, ConstValue::Bool(v), id),
                Err(err) => {
                    self.error(pos, err.into());
                    Partial::invalid(id)
                }
            },
            _ => Partial::new(Mode::Var, untyped_bool, id),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn arithmetic(
        &mut self,
        op: TokenKind,
        mut x: Partial,
        mut y: Partial,
        text: &str,
        left_text: &str,
        id: ExprId,
        pos: &Pos,
    ) -> Partial {
        if let Err(err) = self.match_operands(&mut x, &mut y, text) {
            self.error(pos, err);
            return Partial::invalid(id);
        }
        if !equal(&x.ty, &y.ty) {
            self.mismatched(text, &x, &y, pos);
            return Partial::invalid(id);
        }
        let ty = x.ty.clone();
        let defined = ty.basic().filter(|b| match op {
            TokenKind::Add => b.is_numeric() || b.is_string(),
            TokenKind::Sub | TokenKind::Mul | TokenKind::Div | TokenKind::Pow => b.is_numeric(),
            TokenKind::Rem | TokenKind::Pipe => b.is_integer(),
            _ => false,
        });
        let Some(basic) = defined else {
            let err = TypeError::OperatorNotDefined {
                op: op.as_str(),
                value: left_text.to_string(),
                ty: ty.to_string(),
            };
            self.error(pos, err);
            return Partial::invalid(id);
        };
        let zero_divisor = y.val.as_ref().is_some_and(ConstValue::is_zero);
        if matches!(op, TokenKind::Div | TokenKind::Rem) && zero_divisor && basic.is_integer() {
            self.error(pos, TypeError::Const(ConstError::DivByZero));
            return Partial::invalid(id);
        }
        match (&x.val, &y.val) {
            (Some(a), Some(b)) => {
                let folded = a.binary(op, b).and_then(|v| {
                    if ty.is_untyped() {
                        Ok(v)
                    } else {
                        v.represent(basic)
                    }
                });
                match folded {
                    Ok(v) => Partial::constant(ty, v, id),
                    Err(err) => {
                        self.error(pos, err.into());
                        Partial::invalid(id)
                    }
                }
            }
            _ => Partial::new(Mode::Var, ty, id),
        }
    }

    pub(super) fn mismatched(
        &mut self,
        text: &str,
        x: &Partial,
        y: &Partial,
        pos: &Pos,
    ) {
        let err = TypeError::MismatchedOperands {
            expr: text.to_string(),
            left: x.ty.to_string(),
            right: y.ty.to_string(),
        };
        self.error(pos, err);
    }

    fn unary_expr(
        &mut self,
        e: &mut Expr,
        hint: Option<&Type>,
    ) -> Partial {
        let (id, pos) = (e.id, e.pos.clone());
        let ExprKind::Unary { op, expr: inner } = &mut e.kind else {
            return Partial::invalid(id);
        };
        let op = *op;
        match op {
            TokenKind::Mul => {
                let x = self.expr(inner);
                match x.mode {
                    Mode::Invalid => return x,
                    Mode::TypeExpr => return Partial::new(Mode::TypeExpr, Type::pointer(x.ty), id),
                    _ => {}
                }
                let x = self.single(x, inner);
                if x.is_invalid() {
                    return Partial::invalid(id);
                }
                match underlying(&x.ty) {
                    Type::Pointer(elem) => Partial::new(Mode::Var, *elem, id),
                    _ => {
                        let err = TypeError::InvalidIndirect {
                            expr: inner.to_string(),
                            ty: x.ty.to_string(),
                        };
                        self.error(&pos, err);
                        Partial::invalid(id)
                    }
                }
            }
            TokenKind::Ref => {
                if is_composite(inner) {
                    let elem_hint = match hint.map(underlying) {
                        Some(Type::Pointer(elem)) => Some(*elem),
                        _ => None,
                    };
                    let x = self.value_hint(inner, elem_hint.as_ref());
                    if x.is_invalid() {
                        return Partial::invalid(id);
                    }
                    return Partial::new(Mode::Var, Type::pointer(x.ty), id);
                }
                let x = self.value(inner);
                if x.is_invalid() {
                    return Partial::invalid(id);
                }
                if !self.is_addressable(inner) {
                    self.error(&pos, TypeError::NotAddressable(inner.to_string()));
                    return Partial::invalid(id);
                }
                Partial::new(Mode::Var, Type::pointer(x.ty), id)
            }
            TokenKind::ChanOp => {
                let x = self.value(inner);
                if x.is_invalid() {
                    return Partial::invalid(id);
                }
                match underlying(&x.ty) {
                    Type::Chan(ChanDir::Send, _) => {
                        self.error(&pos, TypeError::RecvSendOnly(format!("<-{}", inner)));
                        Partial::invalid(id)
                    }
                    Type::Chan(_, elem) => Partial::new(Mode::Var, *elem, id),
                    _ => {
                        let err = TypeError::RecvNonChan {
                            expr: format!("<-{}", inner),
                            ty: x.ty.to_string(),
                        };
                        self.error(&pos, err);
                        Partial::invalid(id)
                    }
                }
            }
            TokenKind::Add | TokenKind::Sub | TokenKind::Not => {
                let x = self.value(inner);
                if x.is_invalid() {
                    return Partial::invalid(id);
                }
                let defined = if op == TokenKind::Not {
                    x.ty.is_bool()
                } else {
                    x.ty.is_numeric()
                };
                if !defined {
                    let err = TypeError::OperatorNotDefined {
                        op: op.as_str(),
                        value: inner.to_string(),
                        ty: x.ty.to_string(),
                    };
                    self.error(&pos, err);
                    return Partial::invalid(id);
                }
                let Some(val) = &x.val else {
                    return Partial::new(Mode::Var, x.ty, id);
                };
                let folded = val.unary(op).and_then(|v| match x.ty.basic() {
                    Some(b) if !b.is_untyped() => v.represent(b),
                    _ => Ok(v),
                });
                match folded {
                    Ok(v) => Partial::constant(x.ty, v, id),
                    Err(err) => {
                        self.error(&pos, err.into());
                        Partial::invalid(id)
                    }
                }
            }
            _ => {
                let err = TypeError::OperatorNotDefined {
                    op: op.as_str(),
                    value: inner.to_string(),
                    ty: "unary".to_string(),
                };
                self.error(&pos, err);
                Partial::invalid(id)
            }
        }
    }

    fn selector_expr(
        &mut self,
        e: &mut Expr,
    ) -> Partial {
        let (id, pos) = (e.id, e.pos.clone());
        let ExprKind::Selector { left, right } = &mut e.kind else {
            return Partial::invalid(id);
        };
        let name = right.clone();

        if let Some(pkg) = left.as_ident().map(str::to_string) {
            if self.scopes.lookup(&pkg).is_some_and(|o| o.kind == ObjKind::Pkg) {
                if let Some(obj) = self.scopes.lookup_rec(&pkg) {
                    self.types.insert(left.id, obj.ty.clone());
                    self.idents.insert(left.id, obj);
                }
                let Some(member) = self.package_member(&pkg, &name, &pos) else {
                    return Partial::invalid(id);
                };
                let p = obj_partial(&member, id);
                self.idents.insert(id, member);
                return p;
            }
        }

        let x = self.expr(left);
        match x.mode {
            Mode::Invalid => return Partial::invalid(id),
            Mode::TypeExpr => return self.method_expr(x.ty, left, &name, id, &pos),
            _ => {}
        }
        let x = self.single(x, left);
        if x.is_invalid() {
            return Partial::invalid(id);
        }
        match self.memory.select(&x.ty, &name) {
            Some(Selection::Field(ty)) => Partial::new(Mode::Var, ty, id),
            Some(Selection::Method { ty, pointer }) => {
                let through_pointer = matches!(unalias(&x.ty), Type::Pointer(_));
                if pointer && !through_pointer && !self.is_addressable(left) {
                    self.error(&pos, TypeError::NotAddressable(left.to_string()));
                    return Partial::invalid(id);
                }
                Partial::new(Mode::Func, Type::func(ty), id)
            }
            None => {
                let err = TypeError::NoFieldOrMethod {
                    expr: format!("{}.{}", left, name),
                    ty: x.ty.to_string(),
                    name,
                };
                self.error(&pos, err);
                Partial::invalid(id)
            }
        }
    }

    /// `T.Method` as a function taking the receiver first
    fn method_expr(
        &mut self,
        recv: Type,
        left: &Expr,
        name: &str,
        id: ExprId,
        pos: &Pos,
    ) -> Partial {
        let through_pointer = matches!(unalias(&recv), Type::Pointer(_));
        match self.memory.select(&recv, name) {
            Some(Selection::Method { ty, pointer }) if through_pointer || !pointer => {
                let mut params = vec![recv];
                params.extend(ty.params.iter().cloned());
                let f = FuncType {
                    params,
                    ..ty
                };
                Partial::new(Mode::Func, Type::func(f), id)
            }
            _ => {
                let err = TypeError::NoFieldOrMethod {
                    expr: format!("{}.{}", left, name),
                    ty: recv.to_string(),
                    name: name.to_string(),
                };
                self.error(pos, err);
                Partial::invalid(id)
            }
        }
    }

    fn index_expr(
        &mut self,
        e: &mut Expr,
    ) -> Partial {
        let (id, pos) = (e.id, e.pos.clone());
        let ExprKind::Index { left, indices } = &mut e.kind else {
            return Partial::invalid(id);
        };
        let x = self.value(left);
        if x.is_invalid() {
            return Partial::invalid(id);
        }
        let not_indexable = |left: &Expr, ty: &Type| TypeError::NotIndexable {
            expr: left.to_string(),
            ty: ty.to_string(),
        };

        let base = match underlying(&x.ty) {
            Type::Pointer(elem) => match underlying(&elem) {
                array @ Type::Array { .. } => array,
                _ => Type::Pointer(elem),
            },
            other => other,
        };
        match &base {
            Type::Table(elem) => return self.table_index(elem, indices, id, &pos),
            Type::Map(k, v) => {
                if indices.len() != 1 || is_slice_part(&indices[0]) {
                    self.error(&pos, not_indexable(&**left, &x.ty));
                    return Partial::invalid(id);
                }
                let key = &mut indices[0];
                let mut kp = self.value_hint(key, Some(&**k));
                let text = key.to_string();
                let key_pos = key.pos.clone();
                if !self.assign_to(&mut kp, &text, k, "map index", &key_pos) {
                    return Partial::invalid(id);
                }
                return Partial::new(Mode::Var, (**v).clone(), id);
            }
            _ => {}
        }

        let (len, elem, sliced) = match &base {
            Type::Basic(b) if b.is_string() => {
                let len = x.val.as_ref().and_then(|v| match v {
                    ConstValue::String(s) => i64::try_from(s.len()).ok(),
                    _ => None,
                });
                let sliced = if x.ty.is_untyped() {
                    Type::Basic(Basic::String)
                } else {
                    x.ty.clone()
                };
                (len, Type::Basic(Basic::Uint8), sliced)
            }
            Type::Slice(elem) => (None, (**elem).clone(), x.ty.clone()),
            Type::Array { len, elem, .. } => {
                let len = if *len >= 0 { Some(*len) } else { None };
                (len, (**elem).clone(), Type::slice((**elem).clone()))
            }
            _ => {
                self.error(&pos, not_indexable(&**left, &x.ty));
                return Partial::invalid(id);
            }
        };
        if indices.len() != 1 {
            self.error(&pos, not_indexable(&**left, &x.ty));
            return Partial::invalid(id);
        }
        let index = &mut indices[0];
        if is_slice_part(index) {
            self.slice_bounds(index, len);
            return Partial::new(Mode::Var, sliced, id);
        }
        if !self.index_value(index, len) {
            return Partial::invalid(id);
        }
        Partial::new(Mode::Var, elem, id)
    }

    /// `t[i]` is a row, `t[i, j]` an element; slicing either
    /// dimension yields a table
    fn table_index(
        &mut self,
        elem: &Type,
        indices: &mut [Expr],
        id: ExprId,
        pos: &Pos,
    ) -> Partial {
        if indices.is_empty() || indices.len() > 2 {
            let err = TypeError::NotIndexable {
                expr: "table".to_string(),
                ty: Type::Table(Box::new(elem.clone())).to_string(),
            };
            self.error(pos, err);
            return Partial::invalid(id);
        }
        let mut sliced = false;
        for index in indices.iter_mut() {
            if is_slice_part(index) {
                sliced = true;
                self.slice_bounds(index, None);
            } else if !self.index_value(index, None) {
                return Partial::invalid(id);
            }
        }
        let ty = match (sliced, indices.len()) {
            (true, _) => Type::Table(Box::new(elem.clone())),
            (false, 1) => Type::slice(elem.clone()),
            (false, _) => elem.clone(),
        };
        Partial::new(Mode::Var, ty, id)
    }

    fn slice_bounds(
        &mut self,
        index: &mut Expr,
        len: Option<i64>,
    ) {
        if let ExprKind::Slice { low, high, max } = &mut index.kind {
            for part in [low.as_deref_mut(), high.as_deref_mut(), max.as_deref_mut()]
                .into_iter()
                .flatten()
            {
                self.index_value(part, len.map(|l| l + 1));
            }
        }
    }

    /// Check an index is an integer, and a constant one in range
    pub(super) fn index_value(
        &mut self,
        index: &mut Expr,
        len: Option<i64>,
    ) -> bool {
        let mut p = self.value(index);
        if p.is_invalid() {
            return false;
        }
        if p.ty.is_untyped() {
            if let Err(err) = self.convert_untyped(&mut p, &Type::Basic(Basic::Int), "index") {
                self.error(&index.pos, err);
                return false;
            }
        }
        if !p.ty.is_integer() {
            let err = TypeError::NonIntegerIndex {
                index: index.to_string(),
                ty: p.ty.to_string(),
            };
            self.error(&index.pos, err);
            return false;
        }
        if let Some(v) = p.val.as_ref().and_then(ConstValue::as_i64) {
            let bound = len.unwrap_or(i64::MAX);
            if v < 0 || v >= bound {
                let err = TypeError::IndexOutOfRange {
                    index: v.to_string(),
                    len: len.unwrap_or(0),
                };
                self.error(&index.pos, err);
                return false;
            }
        }
        true
    }

    fn type_assert_expr(
        &mut self,
        e: &mut Expr,
    ) -> Partial {
        let (id, pos) = (e.id, e.pos.clone());
        let ExprKind::TypeAssert { left, ty } = &mut e.kind else {
            return Partial::invalid(id);
        };
        let Some(ty) = ty else {
            self.error(&pos, TypeError::TypeSwitchOutside);
            return Partial::invalid(id);
        };
        let x = self.value(left);
        if x.is_invalid() {
            return Partial::invalid(id);
        }
        let Type::Interface(iface) = underlying(&x.ty) else {
            let err = TypeError::AssertNonInterface {
                expr: left.to_string(),
                ty: x.ty.to_string(),
            };
            self.error(&pos, err);
            return Partial::invalid(id);
        };
        self.resolve_in_place(ty, &pos);
        if ty.is_invalid() {
            return Partial::invalid(id);
        }
        if let Err(reason) = self.memory.assertable(&iface, ty) {
            let err = TypeError::ImpossibleAssertion {
                ty: ty.to_string(),
                iface: x.ty.to_string(),
                reason,
            };
            self.error(&pos, err);
            return Partial::invalid(id);
        }
        Partial::new(Mode::Var, ty.clone(), id)
    }

    fn func_literal_expr(
        &mut self,
        e: &mut Expr,
    ) -> Partial {
        let (id, pos) = (e.id, e.pos.clone());
        let ExprKind::FuncLiteral(f) = &mut e.kind else {
            return Partial::invalid(id);
        };
        let ty = self.func_body(f, None, &pos);
        Partial::new(Mode::Func, Type::func(ty), id)
    }

    /// Check a function body in a new function scope and fill in the
    /// free variables and named types it reads from outside
    pub(super) fn func_body(
        &mut self,
        f: &mut FuncLiteral,
        receiver: Option<Type>,
        pos: &Pos,
    ) -> FuncType {
        f.ty = self.resolve_func(&f.ty, pos);
        self.scopes.push(ScopeKind::Func);
        if let Some(recv) = receiver.filter(|_| !f.receiver_name.is_empty()) {
            self.declare(Obj::var(f.receiver_name.clone(), recv, pos.clone()));
        }
        let params = f.param_names.iter().zip(&f.ty.params);
        let results = f.result_names.iter().zip(&f.ty.results);
        for (name, ty) in params.chain(results) {
            self.declare(Obj::var(name.clone(), ty.clone(), pos.clone()));
        }

        let mut ctx = FuncContext {
            results: f.ty.results.clone(),
            result_names: f.result_names.clone(),
            ..FuncContext::default()
        };
        match &mut f.body.kind {
            StmtKind::Block(stmts) => {
                collect_labels(stmts, &mut ctx.labels);
                self.funcs.push(ctx);
                for stmt in stmts.iter_mut() {
                    self.stmt(stmt);
                }
            }
            _ => {
                self.funcs.push(ctx);
                self.stmt(&mut f.body);
            }
        }
        self.funcs.pop();

        if let Some(scope) = self.scopes.pop() {
            f.ty.free_vars = scope.found_in_parent.into_iter().collect();
            f.ty.free_mdik = scope.found_mdik_in_parent;
        }
        f.ty.clone()
    }

    /// Check whether `&e` is allowed
    pub(super) fn is_addressable(
        &self,
        e: &Expr,
    ) -> bool {
        match &e.kind {
            ExprKind::Ident(_) => self.idents.get(&e.id).is_some_and(|o| o.kind == ObjKind::Var),
            ExprKind::Unary {
                op: TokenKind::Mul, ..
            } => true,
            ExprKind::Index { left, .. } => match self.types.get(&left.id).map(underlying) {
                Some(Type::Slice(_) | Type::Table(_) | Type::Pointer(_)) => true,
                Some(Type::Array { .. }) => self.is_addressable(left),
                _ => false,
            },
            ExprKind::Selector { left, .. } => match self.idents.get(&e.id) {
                Some(obj) => obj.kind == ObjKind::Var,
                None => {
                    matches!(self.types.get(&left.id).map(underlying), Some(Type::Pointer(_)))
                        || self.is_addressable(left)
                }
            },
            _ => false,
        }
    }

    /// Check whether `e` may appear on the left of `=`
    pub(super) fn is_assignable_target(
        &self,
        e: &Expr,
    ) -> bool {
        if self.is_addressable(e) {
            return true;
        }
        match &e.kind {
            ExprKind::Index { left, .. } => {
                matches!(self.types.get(&left.id).map(underlying), Some(Type::Map(..)))
            }
            _ => false,
        }
    }
}

fn literal(
    lit: &Literal,
    id: ExprId,
) -> Partial {
    let basic = match lit {
        Literal::Int(_) => Basic::UntypedInteger,
        Literal::Float(_) => Basic::UntypedFloat,
        Literal::Imaginary(_) => Basic::UntypedComplex,
        Literal::String(_) => Basic::UntypedString,
        Literal::Rune(_) => Basic::UntypedRune,
        Literal::Ident(_) => return Partial::invalid(id),
    };
    match ConstValue::from_literal(lit) {
        Some(v) => Partial::constant(Type::Basic(basic), v, id),
        None => Partial::invalid(id),
    }
}

/// The partial an identifier denoting `obj` evaluates to
pub(super) fn obj_partial(
    obj: &Obj,
    id: ExprId,
) -> Partial {
    match obj.kind {
        ObjKind::Const if obj.ty.is_untyped_nil() => Partial::new(Mode::Var, obj.ty.clone(), id),
        ObjKind::Const => Partial {
            mode: Mode::Const,
            ty: obj.ty.clone(),
            val: obj.value.clone(),
            expr: id,
        },
        ObjKind::Type => Partial::new(Mode::TypeExpr, obj.ty.clone(), id),
        ObjKind::Pkg => Partial::invalid(id),
        ObjKind::Var => {
            let mode = match &obj.ty {
                Type::Builtin(_) => Mode::Builtin,
                Type::Func(_) => Mode::Func,
                _ => Mode::Var,
            };
            Partial::new(mode, obj.ty.clone(), id)
        }
    }
}

fn is_composite(e: &Expr) -> bool {
    matches!(
        e.kind,
        ExprKind::CompLiteral { .. }
            | ExprKind::MapLiteral { .. }
            | ExprKind::SliceLiteral { .. }
            | ExprKind::ArrayLiteral { .. }
            | ExprKind::TableLiteral { .. }
    )
}

fn is_slice_part(e: &Expr) -> bool {
    matches!(e.kind, ExprKind::Slice { .. })
}

/// Check whether `==` is defined on values of a type
fn is_comparable(t: &Type) -> bool {
    match underlying(t) {
        Type::Slice(_) | Type::Table(_) | Type::Map(..) | Type::Func(_) => false,
        Type::Struct(s) => s.fields.iter().all(|f| is_comparable(&f.ty)),
        Type::Array { elem, .. } => is_comparable(&elem),
        _ => true,
    }
}
