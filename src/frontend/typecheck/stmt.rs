//! Statement checking
//!
//! Declarations, control flow, labels and branches. A named function is
//! declared before its body is checked, so it may call itself; a type is
//! declared before its definition is resolved, so it may refer to itself
//! through a pointer, slice, map, channel or function.

use crate::frontend::lexer::tokens::TokenKind;
use crate::frontend::parser::ast::{
    Expr, ExprKind, FuncLiteral, MethodikDecl, SelectCase, Stmt, StmtKind, SwitchCase, TypeSwitchCase,
    ValueSpec,
};
use crate::frontend::types::constant::ConstValue;
use crate::frontend::types::{
    equal, is_generic, underlying, AliasType, Basic, ChanDir, Method, NamedType, Spec, Type,
};
use crate::util::span::Pos;
use std::sync::Arc;

use super::errors::TypeError;
use super::scope::{Obj, ScopeKind};
use super::{BranchTarget, Checker, Mode, Partial};

/// Collect the labels declared in a function body, without descending into
/// nested function literals
pub(super) fn collect_labels(
    stmts: &[Stmt],
    labels: &mut Vec<String>,
) {
    for stmt in stmts {
        collect_stmt_labels(stmt, labels);
    }
}

fn collect_stmt_labels(
    stmt: &Stmt,
    labels: &mut Vec<String>,
) {
    match &stmt.kind {
        StmtKind::Labeled { label, stmt } => {
            labels.push(label.clone());
            collect_stmt_labels(stmt, labels);
        }
        StmtKind::Block(stmts) => collect_labels(stmts, labels),
        StmtKind::If { body, else_, .. } => {
            collect_stmt_labels(body, labels);
            if let Some(else_) = else_ {
                collect_stmt_labels(else_, labels);
            }
        }
        StmtKind::For { body, .. } | StmtKind::Range { body, .. } => collect_stmt_labels(body, labels),
        StmtKind::Switch { cases, .. } => {
            for case in cases {
                collect_labels(&case.body, labels);
            }
        }
        StmtKind::TypeSwitch { cases, .. } => {
            for case in cases {
                collect_labels(&case.body, labels);
            }
        }
        StmtKind::Select(cases) => {
            for case in cases {
                collect_labels(&case.body, labels);
            }
        }
        _ => {}
    }
}

impl Checker {
    pub(super) fn stmt(
        &mut self,
        s: &mut Stmt,
    ) {
        let fallthrough_ok = std::mem::take(&mut self.fallthrough_ok);
        let label = self.func_ctx().pending_label.take();
        let pos = s.pos.clone();
        match &mut s.kind {
            StmtKind::Bad(_) => {}
            StmtKind::Import(imp) => self.import_stmt(imp),
            StmtKind::ImportSet(imps) => {
                for imp in imps.iter() {
                    self.import_stmt(imp);
                }
            }
            StmtKind::TypeDecl { name, ty } => self.type_decl(name, ty, &pos),
            StmtKind::MethodikDecl(decl) => self.methodik_decl(decl, &pos),
            StmtKind::Const(spec) => self.const_spec(spec),
            StmtKind::ConstSet(specs) => {
                for spec in specs.iter_mut() {
                    self.const_spec(spec);
                }
            }
            StmtKind::Var(spec) => self.var_spec(spec),
            StmtKind::VarSet(specs) => {
                for spec in specs.iter_mut() {
                    self.var_spec(spec);
                }
            }
            StmtKind::Assign {
                decl,
                op,
                left,
                right,
            } => {
                let (decl, op) = (*decl, *op);
                self.assign_stmt(decl, op, left, right, &pos);
            }
            StmtKind::Block(stmts) => {
                self.scopes.push(ScopeKind::Block);
                for stmt in stmts.iter_mut() {
                    self.stmt(stmt);
                }
                self.scopes.pop();
            }
            StmtKind::If {
                init,
                cond,
                body,
                else_,
            } => {
                self.scopes.push(ScopeKind::Block);
                if let Some(init) = init {
                    self.stmt(init);
                }
                self.condition(cond, "if");
                self.stmt(body);
                if let Some(else_) = else_ {
                    self.stmt(else_);
                }
                self.scopes.pop();
            }
            StmtKind::For {
                init,
                cond,
                post,
                body,
            } => {
                self.scopes.push(ScopeKind::Block);
                if let Some(init) = init {
                    self.stmt(init);
                }
                if let Some(cond) = cond {
                    self.condition(cond, "for");
                }
                if let Some(post) = post {
                    self.stmt(post);
                }
                self.with_target(label, true, |c| c.stmt(body));
                self.scopes.pop();
            }
            StmtKind::Range {
                key,
                value,
                decl,
                expr,
                body,
            } => {
                let decl = *decl;
                self.scopes.push(ScopeKind::Block);
                self.range_clause(key.as_mut(), value.as_mut(), decl, expr, &pos);
                self.with_target(label, true, |c| c.stmt(body));
                self.scopes.pop();
            }
            StmtKind::Switch { init, cond, cases } => {
                self.scopes.push(ScopeKind::Block);
                if let Some(init) = init {
                    self.stmt(init);
                }
                self.with_target(label, false, |c| c.switch(cond.as_mut(), cases));
                self.scopes.pop();
            }
            StmtKind::TypeSwitch {
                init,
                assign,
                cases,
            } => {
                self.scopes.push(ScopeKind::Block);
                if let Some(init) = init {
                    self.stmt(init);
                }
                self.with_target(label, false, |c| c.type_switch(assign, cases, &pos));
                self.scopes.pop();
            }
            StmtKind::Select(cases) => {
                self.with_target(label, false, |c| c.select(cases));
            }
            StmtKind::Go(e) => self.go_defer(e, "go"),
            StmtKind::Defer(e) => self.go_defer(e, "defer"),
            StmtKind::Return(values) => self.return_stmt(values, &pos),
            StmtKind::Simple(e) => self.simple(e),
            StmtKind::Send { chan, value } => self.send(chan, value, &pos),
            StmtKind::Branch { kind, label } => {
                let kind = *kind;
                self.branch(kind, label.as_deref(), fallthrough_ok, &pos);
            }
            StmtKind::Labeled { label, stmt } => {
                let ctx = self.func_ctx();
                if ctx.declared_labels.contains(label) {
                    let err = TypeError::DuplicateLabel(label.clone());
                    self.error(&pos, err);
                } else {
                    ctx.declared_labels.push(label.clone());
                }
                self.func_ctx().pending_label = Some(label.clone());
                self.fallthrough_ok = fallthrough_ok;
                self.stmt(stmt);
            }
        }
    }

    /// Run `f` with a `break`/`continue` target pushed
    fn with_target(
        &mut self,
        label: Option<String>,
        is_loop: bool,
        f: impl FnOnce(&mut Self),
    ) {
        self.func_ctx().targets.push(BranchTarget { label, is_loop });
        f(self);
        self.func_ctx().targets.pop();
    }

    fn condition(
        &mut self,
        cond: &mut Expr,
        context: &'static str,
    ) {
        let p = self.value(cond);
        if p.is_invalid() {
            return;
        }
        if !p.ty.is_bool() {
            let err = TypeError::NonBoolCondition {
                expr: cond.to_string(),
                ty: p.ty.to_string(),
                context,
            };
            self.error(&cond.pos, err);
        }
    }

    fn simple(
        &mut self,
        e: &mut Expr,
    ) {
        match &mut e.kind {
            ExprKind::FuncLiteral(f) if !f.name.is_empty() => {
                let pos = e.pos.clone();
                let ty = self.func_decl(f, &pos);
                self.types.insert(e.id, ty);
            }
            ExprKind::Shell(sh) => {
                sh.trap_out = false;
                sh.elide_error = true;
                self.types.insert(e.id, Type::Basic(Basic::String));
            }
            _ => {
                self.expr(e);
            }
        }
    }

    /// `func name(...) { ... }`
    fn func_decl(
        &mut self,
        f: &mut FuncLiteral,
        pos: &Pos,
    ) -> Type {
        let sig = self.resolve_func(&f.ty, pos);
        self.declare(Obj::var(f.name.clone(), Type::func(sig), pos.clone()));
        let ty = Type::func(self.func_body(f, None, pos));
        self.scopes.set_type(&f.name, ty.clone());
        ty
    }

    fn type_decl(
        &mut self,
        name: &str,
        ty: &mut Type,
        pos: &Pos,
    ) {
        if let Type::Alias(alias) = ty {
            let target = self.resolve(&alias.ty, pos);
            let alias = Type::Alias(Arc::new(AliasType {
                name: name.to_string(),
                ty: target,
            }));
            self.declare(Obj::type_name(name, alias.clone(), pos.clone()));
            *ty = alias;
            return;
        }
        let named = NamedType::new(name, self.pkg_path.clone());
        self.declare(Obj::type_name(name, Type::Named(named.clone()), pos.clone()));
        self.define_named(&named, ty, pos);
        *ty = Type::Named(named);
    }

    /// Resolve the definition of a freshly declared named type
    fn define_named(
        &mut self,
        named: &NamedType,
        definition: &Type,
        pos: &Pos,
    ) {
        self.defining.push(named.id());
        let resolved = self.resolve(definition, pos);
        self.defining.pop();
        let u = underlying(&resolved);
        if is_generic(&u) {
            *named.spec.write() = Spec {
                num: Some(Basic::Num),
            };
        }
        named.set_underlying(u);
    }

    /// `methodik T U { methods }`
    fn methodik_decl(
        &mut self,
        decl: &mut MethodikDecl,
        pos: &Pos,
    ) {
        let named = NamedType::new(decl.name.clone(), self.pkg_path.clone());
        self.declare(Obj::type_name(decl.name.clone(), Type::Named(named.clone()), pos.clone()));
        self.define_named(&named, &decl.ty, pos);

        for m in &mut decl.methods {
            m.ty = self.resolve_func(&m.ty, pos);
            if named.method(&m.name).is_some() {
                let err = TypeError::Redeclared {
                    name: format!("{}.{}", decl.name, m.name),
                };
                self.error(pos, err);
                continue;
            }
            named.add_method(Method {
                name: m.name.clone(),
                ty: m.ty.clone(),
                pointer: m.pointer_receiver,
            });
        }
        self.memory.forget(&named);
        decl.ty = Type::Named(named.clone());

        for m in &mut decl.methods {
            let recv = if m.pointer_receiver {
                Type::pointer(Type::Named(named.clone()))
            } else {
                Type::Named(named.clone())
            };
            self.func_body(m, Some(recv), pos);
        }
    }

    fn var_spec(
        &mut self,
        spec: &mut ValueSpec,
    ) {
        let pos = spec.pos.clone();
        if let Some(ty) = &mut spec.ty {
            self.resolve_in_place(ty, &pos);
        }
        if spec.values.is_empty() {
            match &spec.ty {
                Some(ty) => {
                    for name in &spec.names {
                        self.declare(Obj::var(name.clone(), ty.clone(), pos.clone()));
                    }
                }
                None => self.error(&pos, TypeError::MissingTypeOrValue(spec.names.join(", "))),
            }
            return;
        }

        let hints: Vec<Option<Type>> = spec.names.iter().map(|_| spec.ty.clone()).collect();
        let values = self.values(spec.names.len(), &mut spec.values, &hints, &pos);
        let Some(values) = values else {
            for name in &spec.names {
                let ty = spec.ty.clone().unwrap_or_else(Type::invalid);
                self.declare(Obj::var(name.clone(), ty, pos.clone()));
            }
            return;
        };
        for (name, (mut p, text, vpos)) in spec.names.iter().zip(values.parts) {
            let ty = match &spec.ty {
                Some(ty) => {
                    self.assign_to(&mut p, &text, ty, "variable declaration", &vpos);
                    ty.clone()
                }
                None => {
                    if !p.is_invalid() {
                        self.default_type(&mut p, "variable declaration", &vpos);
                    }
                    p.ty
                }
            };
            self.declare(Obj::var(name.clone(), ty, pos.clone()));
        }
    }

    fn const_spec(
        &mut self,
        spec: &mut ValueSpec,
    ) {
        let pos = spec.pos.clone();
        if let Some(ty) = &mut spec.ty {
            self.resolve_in_place(ty, &pos);
        }
        if spec.values.is_empty() {
            self.error(&pos, TypeError::MissingConstValue);
            return;
        }
        if spec.values.len() != spec.names.len() {
            let err = TypeError::AssignCount {
                left: spec.names.len(),
                right: spec.values.len(),
            };
            self.error(&pos, err);
            return;
        }
        for (name, value) in spec.names.iter().zip(spec.values.iter_mut()) {
            let mut p = self.value(value);
            if p.is_invalid() {
                continue;
            }
            if p.mode != Mode::Const {
                self.error(&value.pos, TypeError::NotConstant(value.to_string()));
                continue;
            }
            if let Some(ty) = &spec.ty {
                let text = value.to_string();
                if !self.assign_to(&mut p, &text, ty, "constant declaration", &value.pos) {
                    continue;
                }
                p.ty = ty.clone();
            }
            self.declare(Obj::constant(name.clone(), p.ty, p.val, pos.clone()));
        }
    }

    fn range_clause(
        &mut self,
        key: Option<&mut Expr>,
        value: Option<&mut Expr>,
        decl: bool,
        expr: &mut Expr,
        pos: &Pos,
    ) {
        let mut x = self.value(expr);
        if x.is_invalid() {
            return;
        }
        if x.ty.is_untyped() {
            self.default_type(&mut x, "range", &expr.pos);
        }
        let int = Type::Basic(Basic::Int);
        let invalid_range = |x: &Type| TypeError::InvalidRange {
            expr: expr.to_string(),
            ty: x.to_string(),
        };
        let (kt, vt) = match underlying(&x.ty) {
            Type::Basic(b) if b.is_string() => (int, Some(Type::Basic(Basic::Int32))),
            Type::Slice(elem) => (int, Some(*elem)),
            Type::Table(elem) => (int, Some(Type::slice(*elem))),
            Type::Array { elem, .. } => (int, Some(*elem)),
            Type::Pointer(p) => match underlying(&p) {
                Type::Array { elem, .. } => (int, Some(*elem)),
                _ => {
                    self.error(pos, invalid_range(&x.ty));
                    return;
                }
            },
            Type::Map(k, v) => (*k, Some(*v)),
            Type::Chan(ChanDir::Send, _) => {
                self.error(pos, invalid_range(&x.ty));
                return;
            }
            Type::Chan(_, elem) => (*elem, None),
            _ => {
                self.error(pos, invalid_range(&x.ty));
                return;
            }
        };
        if vt.is_none() && value.is_some() {
            self.error(pos, TypeError::RangeVariables(expr.to_string()));
            return;
        }

        let slots = [(key, Some(kt)), (value, vt)];
        for (target, ty) in slots {
            let (Some(target), Some(ty)) = (target, ty) else {
                continue;
            };
            if decl {
                let Some(name) = target.as_ident().map(str::to_string) else {
                    self.error(&target.pos, TypeError::NonName(target.to_string()));
                    continue;
                };
                let obj = Obj::var(name, ty.clone(), target.pos.clone());
                self.types.insert(target.id, ty);
                self.idents.insert(target.id, obj.clone());
                self.declare(obj);
            } else if target.as_ident() != Some("_") {
                let t = self.value(target);
                if t.is_invalid() {
                    continue;
                }
                if !self.is_assignable_target(target) {
                    self.error(&target.pos, TypeError::NotAssignable(target.to_string()));
                    continue;
                }
                let mut p = Partial::new(Mode::Var, ty, target.id);
                let text = format!("range {}", expr);
                self.assign_to(&mut p, &text, &t.ty, "range", &target.pos);
                self.types.insert(target.id, t.ty);
            } else {
                self.types.insert(target.id, ty);
            }
        }
    }

    fn switch(
        &mut self,
        tag: Option<&mut Expr>,
        cases: &mut [SwitchCase],
    ) {
        let mut tag_info = None;
        if let Some(tag) = tag {
            let mut t = self.value(tag);
            if !t.is_invalid() && self.default_type(&mut t, "switch expression", &tag.pos) {
                tag_info = Some((t, tag.to_string()));
            }
        }
        let mut seen: Vec<ConstValue> = Vec::new();
        let mut defaults = 0;
        let last = cases.len().saturating_sub(1);
        for (i, case) in cases.iter_mut().enumerate() {
            if case.default {
                defaults += 1;
                if defaults > 1 {
                    self.error(&case.pos, TypeError::MultipleDefaults);
                }
            }
            for cond in case.conds.iter_mut() {
                match &tag_info {
                    Some((tag, tag_text)) => self.case_value(cond, tag, tag_text, &mut seen),
                    None => self.condition(cond, "case"),
                }
            }
            self.case_body(&mut case.body, i < last);
        }
    }

    fn case_value(
        &mut self,
        cond: &mut Expr,
        tag: &Partial,
        tag_text: &str,
        seen: &mut Vec<ConstValue>,
    ) {
        let mut p = self.value(cond);
        if p.is_invalid() {
            return;
        }
        let text = cond.to_string();
        let mismatch = |p: &Partial| TypeError::CaseMismatch {
            case: text.clone(),
            tag: tag_text.to_string(),
            case_ty: p.ty.to_string(),
            tag_ty: tag.ty.to_string(),
        };
        if self.convert_untyped(&mut p, &tag.ty, "switch case").is_err() {
            self.error(&cond.pos, mismatch(&p));
            return;
        }
        let related = equal(&p.ty, &tag.ty)
            || self.assignable(&p.ty, &tag.ty).is_ok()
            || self.assignable(&tag.ty, &p.ty).is_ok();
        if !related {
            self.error(&cond.pos, mismatch(&p));
            return;
        }
        if let Some(val) = p.val {
            if seen.contains(&val) {
                self.error(&cond.pos, TypeError::DuplicateCase(text));
            } else {
                seen.push(val);
            }
        }
    }

    /// A case body is its own block; `fallthrough` may end it unless it
    /// is the final case
    fn case_body(
        &mut self,
        body: &mut [Stmt],
        may_fall_through: bool,
    ) {
        self.scopes.push(ScopeKind::Block);
        let last = body.len().saturating_sub(1);
        for (j, stmt) in body.iter_mut().enumerate() {
            self.fallthrough_ok = may_fall_through && j == last;
            self.stmt(stmt);
        }
        self.fallthrough_ok = false;
        self.scopes.pop();
    }

    fn type_switch(
        &mut self,
        assign: &mut Stmt,
        cases: &mut [TypeSwitchCase],
        pos: &Pos,
    ) {
        let (binding, binding_id, guard) = match &mut assign.kind {
            StmtKind::Simple(e) => (None, None, e),
            StmtKind::Assign { left, right, .. } if left.len() == 1 && right.len() == 1 => {
                let name = left[0].as_ident().map(str::to_string);
                (name, Some(left[0].id), &mut right[0])
            }
            _ => {
                self.error(pos, TypeError::TypeSwitchOutside);
                return;
            }
        };
        let ExprKind::TypeAssert { left, ty: None } = &mut guard.kind else {
            self.error(pos, TypeError::TypeSwitchOutside);
            return;
        };
        let x = self.value(left);
        if x.is_invalid() {
            return;
        }
        self.types.insert(guard.id, x.ty.clone());
        if let Some(id) = binding_id {
            self.types.insert(id, x.ty.clone());
        }
        let Type::Interface(iface) = underlying(&x.ty) else {
            let err = TypeError::TypeSwitchNonInterface {
                expr: left.to_string(),
                ty: x.ty.to_string(),
            };
            self.error(pos, err);
            return;
        };
        let subject = left.to_string();

        let mut seen: Vec<Type> = Vec::new();
        let mut defaults = 0;
        for case in cases.iter_mut() {
            if case.default {
                defaults += 1;
                if defaults > 1 {
                    self.error(&case.pos, TypeError::MultipleDefaults);
                }
            }
            for slot in case.types.iter_mut() {
                self.resolve_in_place(slot, &case.pos);
                let t: &Type = slot;
                if t.is_invalid() {
                    continue;
                }
                if seen.iter().any(|s| equal(s, t)) {
                    self.error(&case.pos, TypeError::DuplicateCase(t.to_string()));
                    continue;
                }
                seen.push(t.clone());
                if t.is_untyped_nil() {
                    continue;
                }
                if let Err(reason) = self.memory.assertable(&iface, t) {
                    let err = TypeError::ImpossibleTypeSwitchCase {
                        expr: subject.clone(),
                        ty: x.ty.to_string(),
                        case: t.to_string(),
                        reason,
                    };
                    self.error(&case.pos, err);
                }
            }

            self.scopes.push(ScopeKind::Block);
            if let Some(name) = &binding {
                let ty = match case.types.as_slice() {
                    [one] if !one.is_untyped_nil() && !one.is_invalid() => one.clone(),
                    _ => x.ty.clone(),
                };
                let mut obj = Obj::var(name.clone(), ty, case.pos.clone());
                obj.used = true;
                self.declare(obj);
            }
            for stmt in case.body.iter_mut() {
                self.stmt(stmt);
            }
            self.scopes.pop();
        }
    }

    fn select(
        &mut self,
        cases: &mut [SelectCase],
    ) {
        let mut defaults = 0;
        for case in cases.iter_mut() {
            if case.default {
                defaults += 1;
                if defaults > 1 {
                    self.error(&case.pos, TypeError::MultipleDefaults);
                }
            }
            self.scopes.push(ScopeKind::Block);
            if let Some(comm) = &mut case.stmt {
                self.comm_clause(comm);
            }
            for stmt in case.body.iter_mut() {
                self.stmt(stmt);
            }
            self.scopes.pop();
        }
    }

    /// The communication of a select case
    fn comm_clause(
        &mut self,
        comm: &mut Stmt,
    ) {
        if matches!(comm.kind, StmtKind::Send { .. }) {
            self.stmt(comm);
            return;
        }
        let pos = comm.pos.clone();
        match &mut comm.kind {
            StmtKind::Simple(e) if is_receive(e) => {
                self.expr(e);
            }
            StmtKind::Assign {
                decl,
                op: None,
                left,
                right,
            } if right.len() == 1 && is_receive(&right[0]) => {
                let decl = *decl;
                self.assign_stmt(decl, None, left, right, &pos);
            }
            _ => self.error(&pos, TypeError::SelectCase),
        }
    }

    fn go_defer(
        &mut self,
        e: &mut Expr,
        what: &'static str,
    ) {
        if !matches!(e.kind, ExprKind::Call { .. }) {
            self.error(&e.pos, TypeError::NotCall(what));
            return;
        }
        self.expr(e);
    }

    fn return_stmt(
        &mut self,
        values: &mut [Expr],
        pos: &Pos,
    ) {
        let ctx = self.func_ctx();
        let results = ctx.results.clone();
        let named = !ctx.result_names.is_empty();
        if values.is_empty() {
            if !results.is_empty() && !named {
                let err = TypeError::NotEnoughReturns {
                    have: 0,
                    want: results.len(),
                };
                self.error(pos, err);
            }
            return;
        }

        let mut parts = Vec::new();
        if let [only] = &mut *values {
            let p = self.expr(only);
            match (p.mode, &p.ty) {
                (Mode::Unpacked, Type::Tuple(ts)) => {
                    for t in ts {
                        parts.push((Partial::new(Mode::Var, t.clone(), p.expr), only.to_string()));
                    }
                }
                _ => {
                    let p = self.single(p, only);
                    parts.push((p, only.to_string()));
                }
            }
        } else {
            for v in values.iter_mut() {
                let hint = results.get(parts.len()).cloned();
                let p = self.value_hint(v, hint.as_ref());
                parts.push((p, v.to_string()));
            }
        }
        if parts.iter().any(|(p, _)| p.is_invalid()) {
            return;
        }
        if parts.len() != results.len() {
            let (have, want) = (parts.len(), results.len());
            let err = if have > want {
                TypeError::TooManyReturns { have, want }
            } else {
                TypeError::NotEnoughReturns { have, want }
            };
            self.error(pos, err);
            return;
        }
        for ((mut p, text), want) in parts.into_iter().zip(&results) {
            self.assign_to(&mut p, &text, want, "return argument", pos);
        }
    }

    fn send(
        &mut self,
        chan: &mut Expr,
        value: &mut Expr,
        pos: &Pos,
    ) {
        let c = self.value(chan);
        if c.is_invalid() {
            return;
        }
        let text = format!("{} <- {}", chan, value);
        match underlying(&c.ty) {
            Type::Chan(ChanDir::Recv, _) => self.error(pos, TypeError::SendRecvOnly(text)),
            Type::Chan(_, elem) => {
                let mut p = self.value_hint(value, Some(&*elem));
                let value_text = value.to_string();
                self.assign_to(&mut p, &value_text, &elem, "send", pos);
            }
            _ => {
                let err = TypeError::SendNonChan {
                    expr: text,
                    ty: c.ty.to_string(),
                };
                self.error(pos, err);
            }
        }
    }

    fn branch(
        &mut self,
        kind: TokenKind,
        label: Option<&str>,
        fallthrough_ok: bool,
        pos: &Pos,
    ) {
        let ctx = self.func_ctx();
        let err = match (kind, label) {
            (TokenKind::Fallthrough, _) if !fallthrough_ok => Some(TypeError::MisplacedFallthrough),
            (TokenKind::Fallthrough, _) => None,
            (TokenKind::Goto, Some(label)) => {
                (!ctx.labels.iter().any(|l| l == label)).then(|| TypeError::UndefinedLabel(label.to_string()))
            }
            (TokenKind::Break, None) => ctx.targets.is_empty().then_some(TypeError::BranchOutsideLoop("break")),
            (TokenKind::Continue, None) => {
                (!ctx.targets.iter().any(|t| t.is_loop)).then_some(TypeError::BranchOutsideLoop("continue"))
            }
            (TokenKind::Break | TokenKind::Continue, Some(label)) => {
                let kind_name = if kind == TokenKind::Break { "break" } else { "continue" };
                let found = ctx
                    .targets
                    .iter()
                    .any(|t| t.label.as_deref() == Some(label) && (kind == TokenKind::Break || t.is_loop));
                if found {
                    None
                } else if !ctx.labels.iter().any(|l| l == label) {
                    Some(TypeError::UndefinedLabel(label.to_string()))
                } else {
                    Some(TypeError::InvalidBranchLabel {
                        kind: kind_name,
                        label: label.to_string(),
                    })
                }
            }
            _ => None,
        };
        if let Some(err) = err {
            self.error(pos, err);
        }
    }
}

fn is_receive(e: &Expr) -> bool {
    matches!(
        e.kind,
        ExprKind::Unary {
            op: TokenKind::ChanOp,
            ..
        }
    )
}
