//! Calls, conversions and builtins
//!
//! A call of a generic function infers `num` from its arguments and
//! records the specialized signature on the callee. `f(g())` spreads the
//! results of `g` over the parameters of `f`.

use num_traits::ToPrimitive;

use crate::frontend::parser::ast::{Expr, ExprId, ExprKind};
use crate::frontend::types::constant::ConstValue;
use crate::frontend::types::{equal, underlying, Basic, Builtin, ChanDir, FuncType, Type};
use crate::util::span::Pos;

use super::assign::set_elide;
use super::errors::TypeError;
use super::specialize::{infer_num, specialize_func};
use super::universe::is_error;
use super::{Checker, Mode, Partial};

/// A checked call argument
struct Arg {
    p: Partial,
    text: String,
    pos: Pos,
}

impl Checker {
    pub(super) fn call_expr(
        &mut self,
        e: &mut Expr,
    ) -> Partial {
        let (id, pos) = (e.id, e.pos.clone());
        let ExprKind::Call {
            func,
            args,
            ellipsis,
            ..
        } = &mut e.kind
        else {
            return Partial::invalid(id);
        };
        let ellipsis = *ellipsis;
        let f = self.expr(func);
        match f.mode {
            Mode::Invalid => Partial::invalid(id),
            Mode::TypeExpr => self.conversion(f.ty, args, id, &pos),
            Mode::Builtin => match f.ty {
                Type::Builtin(b) => self.builtin_call(b, args, ellipsis, id, &pos),
                _ => Partial::invalid(id),
            },
            _ => self.func_call(func, f, args, ellipsis, id, &pos),
        }
    }

    fn func_call(
        &mut self,
        func: &mut Expr,
        f: Partial,
        args: &mut [Expr],
        ellipsis: bool,
        id: ExprId,
        pos: &Pos,
    ) -> Partial {
        let f = self.single(f, func);
        if f.is_invalid() {
            return Partial::invalid(id);
        }
        let name = func.to_string();
        let Some(mut sig) = f.ty.as_func() else {
            let err = TypeError::NotCallable {
                expr: name,
                ty: f.ty.to_string(),
            };
            self.error(pos, err);
            return Partial::invalid(id);
        };
        let (mut checked, unpacked) = self.arguments(args);
        if checked.iter().any(|a| a.p.is_invalid()) {
            return Partial::invalid(id);
        }
        if ellipsis && unpacked {
            self.error(pos, TypeError::MultiValueSpread(name));
            return Partial::invalid(id);
        }
        if let ([only], true) = (args, unpacked) {
            self.elide_spread(&sig, &mut checked, only);
        }
        let mut args = checked;

        if sig.spec.num == Some(Basic::Num) {
            let pairs: Vec<(Type, Type)> = args
                .iter()
                .enumerate()
                .filter_map(|(i, a)| param_for(&sig, i, ellipsis).map(|t| (t, a.p.ty.clone())))
                .collect();
            let Some(num) = infer_num(&pairs) else {
                self.error(pos, TypeError::CannotInferNum(name));
                return Partial::invalid(id);
            };
            sig = specialize_func(&sig, num);
            self.types.insert(func.id, Type::func(sig.clone()));
        }

        if !self.check_arguments(&sig, &mut args, ellipsis, &name, pos) {
            return Partial::invalid(id);
        }
        match sig.results.as_slice() {
            [] => Partial::new(Mode::Void, Type::Tuple(Vec::new()), id),
            [one] => Partial::new(Mode::Var, one.clone(), id),
            many => Partial::new(Mode::Unpacked, Type::Tuple(many.to_vec()), id),
        }
    }

    /// Check call arguments, spreading a single multi-valued call
    fn arguments(
        &mut self,
        args: &mut [Expr],
    ) -> (Vec<Arg>, bool) {
        if let [only] = args {
            let p = self.expr(only);
            let text = only.to_string();
            if let (Mode::Unpacked, Type::Tuple(ts)) = (p.mode, &p.ty) {
                let spread = ts
                    .iter()
                    .map(|t| Arg {
                        p: Partial::new(Mode::Var, t.clone(), p.expr),
                        text: text.clone(),
                        pos: only.pos.clone(),
                    })
                    .collect();
                return (spread, true);
            }
            let p = self.single(p, only);
            let pos = only.pos.clone();
            return (vec![Arg { p, text, pos }], false);
        }
        let checked = args
            .iter_mut()
            .map(|arg| Arg {
                p: self.value(arg),
                text: arg.to_string(),
                pos: arg.pos.clone(),
            })
            .collect();
        (checked, false)
    }

    /// `f(g())` where `g` returns one value more than `f` takes and that
    /// value is an `error`: the error is elided
    fn elide_spread(
        &mut self,
        sig: &FuncType,
        args: &mut Vec<Arg>,
        call: &mut Expr,
    ) {
        if sig.variadic || args.len() != sig.params.len() + 1 {
            return;
        }
        if !args.last().is_some_and(|a| is_error(&a.p.ty)) {
            return;
        }
        args.pop();
        set_elide(call);
        let kept: Vec<Type> = args.iter().map(|a| a.p.ty.clone()).collect();
        let recorded = match kept.as_slice() {
            [one] => one.clone(),
            _ => Type::Tuple(kept),
        };
        self.types.insert(call.id, recorded);
    }

    fn check_arguments(
        &mut self,
        sig: &FuncType,
        args: &mut [Arg],
        ellipsis: bool,
        name: &str,
        pos: &Pos,
    ) -> bool {
        let have = args.len();
        let want = sig.params.len();
        if ellipsis && !sig.variadic {
            self.error(pos, TypeError::NonVariadicSpread(name.to_string()));
            return false;
        }
        let (fits, want) = if sig.variadic && !ellipsis {
            (have + 1 >= want, want.saturating_sub(1))
        } else {
            (have == want, want)
        };
        if !fits {
            let err = if have > want {
                TypeError::TooManyArguments {
                    func: name.to_string(),
                    have,
                    want,
                }
            } else {
                TypeError::NotEnoughArguments {
                    func: name.to_string(),
                    have,
                    want,
                }
            };
            self.error(pos, err);
            return false;
        }
        let mut ok = true;
        for (i, arg) in args.iter_mut().enumerate() {
            if let Some(param) = param_for(sig, i, ellipsis) {
                ok &= self.assign_to(&mut arg.p, &arg.text, &param, "argument", &arg.pos);
            }
        }
        ok
    }

    /// `T(x)`
    fn conversion(
        &mut self,
        to: Type,
        args: &mut [Expr],
        id: ExprId,
        pos: &Pos,
    ) -> Partial {
        let [arg] = args else {
            self.error(pos, TypeError::ConversionArity(to.to_string()));
            return Partial::invalid(id);
        };
        let mut x = self.value(arg);
        if x.is_invalid() {
            return Partial::invalid(id);
        }
        let text = arg.to_string();
        let conversion_error = |x: &Partial| TypeError::Conversion {
            value: text.clone(),
            from: x.ty.to_string(),
            to: to.to_string(),
        };

        if let (Some(val), Some(b)) = (&x.val, to.basic().filter(|_| !to.is_interface())) {
            let converted = match val {
                ConstValue::Int(i) if b.is_string() => {
                    let c = i.to_u32().and_then(char::from_u32);
                    Ok(ConstValue::String(c.unwrap_or('\u{FFFD}').to_string()))
                }
                _ if b.is_string() && !x.ty.is_string() => {
                    self.error(pos, conversion_error(&x));
                    return Partial::invalid(id);
                }
                _ => val.represent(b),
            };
            return match converted {
                Ok(v) => Partial::constant(to, v, id),
                Err(err) => {
                    self.error(pos, err.into());
                    Partial::invalid(id)
                }
            };
        }

        if x.ty.is_untyped_nil() {
            if to.is_nillable() {
                return Partial::new(Mode::Var, to, id);
            }
            self.error(pos, conversion_error(&x));
            return Partial::invalid(id);
        }
        if let Some(b) = x.ty.basic().filter(|b| b.is_untyped()) {
            x.ty = Type::Basic(b.default_type());
        }
        if !self.convertible(&x.ty, &to) {
            self.error(pos, conversion_error(&x));
            return Partial::invalid(id);
        }
        Partial::new(Mode::Var, to, id)
    }

    fn builtin_call(
        &mut self,
        b: Builtin,
        args: &mut [Expr],
        ellipsis: bool,
        id: ExprId,
        pos: &Pos,
    ) -> Partial {
        let name = b.name();
        if ellipsis && b != Builtin::Append {
            self.error(pos, TypeError::NonVariadicSpread(name.to_string()));
            return Partial::invalid(id);
        }
        let (min, max) = match b {
            Builtin::Append => (1, usize::MAX),
            Builtin::Recover => (0, 0),
            Builtin::Complex | Builtin::Copy | Builtin::Delete => (2, 2),
            Builtin::Make => (1, 3),
            _ => (1, 1),
        };
        let have = args.len();
        if have < min || have > max {
            let err = if have < min {
                TypeError::NotEnoughArguments {
                    func: name.to_string(),
                    have,
                    want: min,
                }
            } else {
                TypeError::TooManyArguments {
                    func: name.to_string(),
                    have,
                    want: max,
                }
            };
            self.error(pos, err);
            return Partial::invalid(id);
        }
        let void = Partial::new(Mode::Void, Type::Tuple(Vec::new()), id);

        match b {
            Builtin::Append => self.append(args, ellipsis, id, pos),
            Builtin::Len | Builtin::Cap => {
                let x = self.value(&mut args[0]);
                if x.is_invalid() {
                    return Partial::invalid(id);
                }
                let is_len = b == Builtin::Len;
                let ok = match underlying(&x.ty) {
                    Type::Basic(basic) => is_len && basic.is_string(),
                    Type::Array { .. } | Type::Slice(_) | Type::Chan(..) => true,
                    Type::Pointer(elem) => matches!(underlying(&elem), Type::Array { .. }),
                    Type::Map(..) | Type::Table(_) => is_len,
                    _ => false,
                };
                if !ok {
                    return self.builtin_argument(&args[0], &x, name, id);
                }
                let int = Type::Basic(Basic::Int);
                match &x.val {
                    Some(ConstValue::String(s)) => Partial::constant(int, ConstValue::int(s.len()), id),
                    _ => Partial::new(Mode::Var, int, id),
                }
            }
            Builtin::Close => {
                let x = self.value(&mut args[0]);
                if x.is_invalid() {
                    return Partial::invalid(id);
                }
                match underlying(&x.ty) {
                    Type::Chan(ChanDir::Recv, _) => {
                        self.error(pos, TypeError::CloseRecvOnly(format!("close({})", args[0])));
                        Partial::invalid(id)
                    }
                    Type::Chan(..) => void,
                    _ => self.builtin_argument(&args[0], &x, name, id),
                }
            }
            Builtin::Complex => self.complex(args, id, pos),
            Builtin::Real | Builtin::Imag => {
                let x = self.value(&mut args[0]);
                if x.is_invalid() {
                    return Partial::invalid(id);
                }
                let part = match x.ty.basic() {
                    Some(Basic::Complex64) => Basic::Float32,
                    Some(Basic::Complex128) => Basic::Float64,
                    Some(basic) if basic.is_untyped() && basic.untyped_rank().is_some() => Basic::UntypedFloat,
                    _ => return self.builtin_argument(&args[0], &x, name, id),
                };
                let Some(val) = &x.val else {
                    return Partial::new(Mode::Var, Type::Basic(part), id);
                };
                let folded = val.represent(Basic::UntypedComplex).and_then(|c| match c {
                    ConstValue::Complex(re, im) => {
                        let v = ConstValue::Float(if b == Builtin::Real { re } else { im });
                        if part.is_untyped() {
                            Ok(v)
                        } else {
                            v.represent(part)
                        }
                    }
                    other => Ok(other),
                });
                match folded {
                    Ok(v) => Partial::constant(Type::Basic(part), v, id),
                    Err(err) => {
                        self.error(pos, err.into());
                        Partial::invalid(id)
                    }
                }
            }
            Builtin::Copy => {
                let dst = self.value(&mut args[0]);
                let src = self.value(&mut args[1]);
                if dst.is_invalid() || src.is_invalid() {
                    return Partial::invalid(id);
                }
                let Type::Slice(elem) = underlying(&dst.ty) else {
                    return self.builtin_argument(&args[0], &dst, name, id);
                };
                let ok = match underlying(&src.ty) {
                    Type::Slice(src_elem) => equal(&elem, &src_elem),
                    Type::Basic(basic) => basic.is_string() && matches!(*elem, Type::Basic(Basic::Uint8)),
                    _ => false,
                };
                if !ok {
                    return self.builtin_argument(&args[1], &src, name, id);
                }
                Partial::new(Mode::Var, Type::Basic(Basic::Int), id)
            }
            Builtin::Delete => {
                let m = self.value(&mut args[0]);
                if m.is_invalid() {
                    return Partial::invalid(id);
                }
                let Type::Map(k, _) = underlying(&m.ty) else {
                    return self.builtin_argument(&args[0], &m, name, id);
                };
                let key = &mut args[1];
                let mut kp = self.value_hint(key, Some(&*k));
                let text = key.to_string();
                let key_pos = key.pos.clone();
                if !self.assign_to(&mut kp, &text, &k, "argument to delete", &key_pos) {
                    return Partial::invalid(id);
                }
                void
            }
            Builtin::Make => {
                let Some(t) = self.type_argument(&mut args[0]) else {
                    return Partial::invalid(id);
                };
                let (min, max) = match underlying(&t) {
                    Type::Slice(_) => (2, 3),
                    Type::Table(_) => (1, 3),
                    Type::Map(..) | Type::Chan(..) => (1, 2),
                    _ => {
                        let err = TypeError::BuiltinArgument {
                            arg: args[0].to_string(),
                            ty: t.to_string(),
                            builtin: name,
                        };
                        self.error(pos, err);
                        return Partial::invalid(id);
                    }
                };
                if have < min {
                    let err = TypeError::NotEnoughArguments {
                        func: name.to_string(),
                        have,
                        want: min,
                    };
                    self.error(pos, err);
                    return Partial::invalid(id);
                }
                if have > max {
                    let err = TypeError::TooManyArguments {
                        func: name.to_string(),
                        have,
                        want: max,
                    };
                    self.error(pos, err);
                    return Partial::invalid(id);
                }
                for size in &mut args[1..] {
                    if !self.index_value(size, None) {
                        return Partial::invalid(id);
                    }
                }
                Partial::new(Mode::Var, t, id)
            }
            Builtin::New => match self.type_argument(&mut args[0]) {
                Some(t) => Partial::new(Mode::Var, Type::pointer(t), id),
                None => Partial::invalid(id),
            },
            Builtin::Panic => {
                let mut x = self.value(&mut args[0]);
                let text = args[0].to_string();
                if !self.assign_to(&mut x, &text, &Type::empty_interface(), "argument to panic", pos) {
                    return Partial::invalid(id);
                }
                void
            }
            Builtin::Recover => Partial::new(Mode::Var, Type::empty_interface(), id),
        }
    }

    fn append(
        &mut self,
        args: &mut [Expr],
        ellipsis: bool,
        id: ExprId,
        pos: &Pos,
    ) -> Partial {
        let s = self.value(&mut args[0]);
        if s.is_invalid() {
            return Partial::invalid(id);
        }
        let elem = match underlying(&s.ty) {
            Type::Slice(elem) if !s.ty.is_untyped_nil() => *elem,
            _ => {
                self.error(pos, TypeError::AppendNonSlice(s.ty.to_string()));
                return Partial::invalid(id);
            }
        };
        if ellipsis {
            if args.len() != 2 {
                let have = args.len();
                let err = if have < 2 {
                    TypeError::NotEnoughArguments {
                        func: "append".to_string(),
                        have,
                        want: 2,
                    }
                } else {
                    TypeError::TooManyArguments {
                        func: "append".to_string(),
                        have,
                        want: 2,
                    }
                };
                self.error(pos, err);
                return Partial::invalid(id);
            }
            let mut x = self.value(&mut args[1]);
            let text = args[1].to_string();
            let bytes_from_string = matches!(elem, Type::Basic(Basic::Uint8)) && x.ty.is_string();
            if !bytes_from_string && !self.assign_to(&mut x, &text, &s.ty, "append", pos) {
                return Partial::invalid(id);
            }
        } else {
            for arg in &mut args[1..] {
                let mut x = self.value_hint(arg, Some(&elem));
                let text = arg.to_string();
                let arg_pos = arg.pos.clone();
                if !self.assign_to(&mut x, &text, &elem, "append", &arg_pos) {
                    return Partial::invalid(id);
                }
            }
        }
        Partial::new(Mode::Var, s.ty, id)
    }

    /// `complex(re, im)`; constant parts make a constant
    fn complex(
        &mut self,
        args: &mut [Expr],
        id: ExprId,
        pos: &Pos,
    ) -> Partial {
        let mut re = self.value(&mut args[0]);
        let mut im = self.value(&mut args[1]);
        if re.is_invalid() || im.is_invalid() {
            return Partial::invalid(id);
        }
        let text = format!("complex({}, {})", args[0], args[1]);
        if let Err(err) = self.match_operands(&mut re, &mut im, &text) {
            self.error(pos, err);
            return Partial::invalid(id);
        }
        if !equal(&re.ty, &im.ty) {
            self.mismatched(&text, &re, &im, pos);
            return Partial::invalid(id);
        }
        let result = match re.ty.basic() {
            Some(Basic::Float32) => Basic::Complex64,
            Some(Basic::Float64) => Basic::Complex128,
            Some(Basic::UntypedFloat | Basic::UntypedInteger | Basic::UntypedRune) => Basic::UntypedComplex,
            _ => return self.builtin_argument(&args[0], &re, "complex", id),
        };
        let (Some(a), Some(b)) = (&re.val, &im.val) else {
            return Partial::new(Mode::Var, Type::Basic(result), id);
        };
        let folded = a.represent(Basic::UntypedFloat).and_then(|a| {
            let b = b.represent(Basic::UntypedFloat)?;
            match (a, b) {
                (ConstValue::Float(re), ConstValue::Float(im)) => {
                    let v = ConstValue::Complex(re, im);
                    if result.is_untyped() {
                        Ok(v)
                    } else {
                        v.represent(result)
                    }
                }
                (a, _) => Ok(a),
            }
        });
        match folded {
            Ok(v) => Partial::constant(Type::Basic(result), v, id),
            Err(err) => {
                self.error(pos, err.into());
                Partial::invalid(id)
            }
        }
    }

    /// The type argument of `make` or `new`
    fn type_argument(
        &mut self,
        arg: &mut Expr,
    ) -> Option<Type> {
        let t = self.expr(arg);
        match t.mode {
            Mode::TypeExpr => Some(t.ty),
            Mode::Invalid => None,
            _ => {
                self.error(&arg.pos, TypeError::NotType(arg.to_string()));
                None
            }
        }
    }

    fn builtin_argument(
        &mut self,
        arg: &Expr,
        x: &Partial,
        builtin: &'static str,
        id: ExprId,
    ) -> Partial {
        let err = TypeError::BuiltinArgument {
            arg: arg.to_string(),
            ty: x.ty.to_string(),
            builtin,
        };
        self.error(&arg.pos, err);
        Partial::invalid(id)
    }
}

/// The parameter type argument `i` is assigned to
fn param_for(
    sig: &FuncType,
    i: usize,
    ellipsis: bool,
) -> Option<Type> {
    let last = sig.params.len().checked_sub(1)?;
    if sig.variadic && !ellipsis && i >= last {
        return match &sig.params[last] {
            Type::Slice(elem) => Some((**elem).clone()),
            other => Some(other.clone()),
        };
    }
    sig.params.get(i).cloned()
}
