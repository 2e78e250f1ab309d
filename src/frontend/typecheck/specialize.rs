//! `num` specialization
//!
//! A signature or struct that mentions `num` is generic. At a call site the
//! checker infers the numeric basic `num` stands for and substitutes it,
//! recording the specialized signature on the callee expression.
//!
//! A named type declared over `num` specializes to a named instance. The
//! generic type keeps one instance per basic, so `P` specialized to
//! `int32` twice is the same type both times.

use crate::frontend::types::{underlying, Basic, Field, FuncType, Method, NamedRef, NamedType, Spec, StructType, Type};

/// Substitute `num` in `t`, marking specialized signatures and structs
pub fn specialize(
    t: &Type,
    num: Basic,
) -> Type {
    match t {
        Type::Basic(Basic::Num) => Type::Basic(num),
        Type::Func(f) => Type::func(specialize_func(f, num)),
        Type::Struct(s) => Type::Struct(Box::new(StructType {
            fields: s
                .fields
                .iter()
                .map(|f| Field {
                    name: f.name.clone(),
                    ty: specialize(&f.ty, num),
                    embedded: f.embedded,
                })
                .collect(),
            spec: Spec { num: Some(num) },
        })),
        Type::Array {
            len,
            elem,
            ellipsis,
        } => Type::Array {
            len: *len,
            elem: Box::new(specialize(elem, num)),
            ellipsis: *ellipsis,
        },
        Type::Slice(elem) => Type::slice(specialize(elem, num)),
        Type::Ellipsis(elem) => Type::Ellipsis(Box::new(specialize(elem, num))),
        Type::Table(elem) => Type::Table(Box::new(specialize(elem, num))),
        Type::Pointer(elem) => Type::pointer(specialize(elem, num)),
        Type::Chan(dir, elem) => Type::Chan(*dir, Box::new(specialize(elem, num))),
        Type::Map(k, v) => Type::map(specialize(k, num), specialize(v, num)),
        Type::Tuple(ts) => Type::Tuple(ts.iter().map(|t| specialize(t, num)).collect()),
        Type::Named(n) if n.is_generic() => Type::Named(instantiate(n, num)),
        _ => t.clone(),
    }
}

/// The instance of a generic named type for `num`, created on first use
fn instantiate(
    generic: &NamedRef,
    num: Basic,
) -> NamedRef {
    if let Some((_, found)) = generic.instances.read().iter().find(|(b, _)| *b == num) {
        return found.clone();
    }
    // Registered before it is filled: the underlying type may refer back.
    let instance = NamedType::new_instance(generic, num);
    generic.instances.write().push((num, instance.clone()));
    instance.set_underlying(specialize(&generic.underlying(), num));
    let methods = generic.methods.read().clone();
    for m in methods {
        instance.add_method(Method {
            name: m.name,
            ty: specialize_func(&m.ty, num),
            pointer: m.pointer,
        });
    }
    instance
}

/// Substitute `num` in a signature
pub fn specialize_func(
    f: &FuncType,
    num: Basic,
) -> FuncType {
    FuncType {
        params: f.params.iter().map(|p| specialize(p, num)).collect(),
        results: f.results.iter().map(|r| specialize(r, num)).collect(),
        variadic: f.variadic,
        free_vars: f.free_vars.clone(),
        free_mdik: f.free_mdik.clone(),
        spec: Spec { num: Some(num) },
    }
}

/// Infer what `num` stands for from `(parameter, argument)` type pairs
///
/// A typed argument in a `num` position decides. Failing that, untyped
/// constants passed as `num` pick the default type of the highest kind
/// among them: `f(1, 2.5)` specializes to `float64`.
pub(super) fn infer_num(pairs: &[(Type, Type)]) -> Option<Basic> {
    let mut untyped: Option<Basic> = None;
    for (param, arg) in pairs {
        if let Some(found) = bind(param, arg) {
            return Some(found);
        }
        if matches!(param, Type::Basic(Basic::Num)) {
            if let Type::Basic(b) = arg {
                let rank = b.untyped_rank();
                if rank.is_some() && rank > untyped.and_then(Basic::untyped_rank) {
                    untyped = Some(*b);
                }
            }
        }
    }
    untyped.map(Basic::default_type)
}

/// Match a typed argument against a parameter type mentioning `num`
fn bind(
    param: &Type,
    arg: &Type,
) -> Option<Basic> {
    if arg.is_untyped() || arg.is_invalid() {
        return None;
    }
    match param {
        Type::Basic(Basic::Num) => arg.basic().filter(|b| b.is_numeric() && *b != Basic::Num),
        Type::Named(p) if p.is_generic() => match arg {
            Type::Named(a) if a.origin() == p.origin() => a.spec.read().num.filter(|b| *b != Basic::Num),
            _ => None,
        },
        Type::Slice(p) | Type::Ellipsis(p) => match underlying(arg) {
            Type::Slice(a) => bind(p, &a),
            _ => None,
        },
        Type::Table(p) => match underlying(arg) {
            Type::Table(a) => bind(p, &a),
            _ => None,
        },
        Type::Array { elem, .. } => match underlying(arg) {
            Type::Array { elem: a, .. } => bind(elem, &a),
            _ => None,
        },
        Type::Pointer(p) => match underlying(arg) {
            Type::Pointer(a) => bind(p, &a),
            _ => None,
        },
        Type::Chan(_, p) => match underlying(arg) {
            Type::Chan(_, a) => bind(p, &a),
            _ => None,
        },
        Type::Map(pk, pv) => match underlying(arg) {
            Type::Map(ak, av) => bind(pk, &ak).or_else(|| bind(pv, &av)),
            _ => None,
        },
        Type::Func(pf) => match underlying(arg) {
            Type::Func(af) => pf
                .params
                .iter()
                .zip(&af.params)
                .chain(pf.results.iter().zip(&af.results))
                .find_map(|(p, a)| bind(p, a)),
            _ => None,
        },
        _ => None,
    }
}
