//! Resolution of type expressions
//!
//! The parser leaves every type name as [`Type::Unresolved`]. Resolution
//! looks names up in scope, turns `...T` parameters into slices, flattens
//! embedded interfaces and marks `num` generic signatures and structs.

use std::collections::BTreeMap;

use crate::frontend::types::{
    is_generic, is_generic_func, underlying, Basic, Field, FuncType, InterfaceType, Spec,
    StructType, Type,
};
use crate::util::span::Pos;

use super::errors::TypeError;
use super::methods::interface_methods;
use super::{Checker, ObjKind};

impl Checker {
    /// Resolve a type expression in place
    pub(super) fn resolve_in_place(
        &mut self,
        ty: &mut Type,
        pos: &Pos,
    ) {
        *ty = self.resolve(ty, pos);
    }

    /// Resolve a type expression
    pub(super) fn resolve(
        &mut self,
        ty: &Type,
        pos: &Pos,
    ) -> Type {
        self.resolve_inner(ty, pos, true)
    }

    /// `direct` is false below a pointer, slice, map, channel or function,
    /// where a type may refer to itself
    fn resolve_inner(
        &mut self,
        ty: &Type,
        pos: &Pos,
        direct: bool,
    ) -> Type {
        match ty {
            Type::Unresolved { package: None, name } => self.resolve_name(name, pos, direct),
            Type::Unresolved {
                package: Some(pkg),
                name,
            } => self.resolve_qualified(pkg, name, pos),
            Type::Array {
                len,
                elem,
                ellipsis,
            } => Type::Array {
                len: *len,
                elem: Box::new(self.resolve_inner(elem, pos, direct)),
                ellipsis: *ellipsis,
            },
            Type::Slice(elem) | Type::Ellipsis(elem) => Type::slice(self.resolve_inner(elem, pos, false)),
            Type::Table(elem) => Type::Table(Box::new(self.resolve_inner(elem, pos, false))),
            Type::Pointer(elem) => Type::pointer(self.resolve_inner(elem, pos, false)),
            Type::Chan(dir, elem) => Type::Chan(*dir, Box::new(self.resolve_inner(elem, pos, false))),
            Type::Map(k, v) => Type::map(
                self.resolve_inner(k, pos, false),
                self.resolve_inner(v, pos, false),
            ),
            Type::Tuple(ts) => Type::Tuple(ts.iter().map(|t| self.resolve_inner(t, pos, direct)).collect()),
            Type::Func(f) => Type::func(self.resolve_func(f, pos)),
            Type::Struct(s) => self.resolve_struct(s, pos, direct),
            Type::Interface(i) => self.resolve_interface(i, pos),
            Type::Basic(_)
            | Type::Builtin(_)
            | Type::Named(_)
            | Type::Alias(_)
            | Type::Package(_) => ty.clone(),
        }
    }

    fn resolve_name(
        &mut self,
        name: &str,
        pos: &Pos,
        direct: bool,
    ) -> Type {
        if name == "nil" {
            return Type::Basic(Basic::UntypedNil);
        }
        let Some(obj) = self.scopes.lookup_rec(name) else {
            self.error(pos, TypeError::Undeclared(name.to_string()));
            return Type::invalid();
        };
        if obj.kind != ObjKind::Type {
            self.error(pos, TypeError::NotType(name.to_string()));
            return Type::invalid();
        }
        if let Type::Named(n) = &obj.ty {
            if direct && self.defining.contains(&n.id()) {
                self.error(pos, TypeError::RecursiveType(name.to_string()));
                return Type::invalid();
            }
        }
        obj.ty
    }

    fn resolve_qualified(
        &mut self,
        pkg: &str,
        name: &str,
        pos: &Pos,
    ) -> Type {
        match self.package_member(pkg, name, pos) {
            Some(obj) if obj.kind == ObjKind::Type => obj.ty,
            Some(_) => {
                self.error(pos, TypeError::NotType(format!("{}.{}", pkg, name)));
                Type::invalid()
            }
            None => Type::invalid(),
        }
    }

    pub(super) fn resolve_func(
        &mut self,
        f: &FuncType,
        pos: &Pos,
    ) -> FuncType {
        let mut resolved = FuncType {
            params: f.params.iter().map(|p| self.resolve_inner(p, pos, false)).collect(),
            results: f.results.iter().map(|r| self.resolve_inner(r, pos, false)).collect(),
            variadic: f.variadic,
            free_vars: f.free_vars.clone(),
            free_mdik: f.free_mdik.clone(),
            spec: f.spec,
        };
        if resolved.spec.num.is_none() && is_generic_func(&resolved) {
            resolved.spec = Spec {
                num: Some(Basic::Num),
            };
        }
        resolved
    }

    fn resolve_struct(
        &mut self,
        s: &StructType,
        pos: &Pos,
        direct: bool,
    ) -> Type {
        let fields: Vec<Field> = s
            .fields
            .iter()
            .map(|f| Field {
                name: f.name.clone(),
                ty: self.resolve_inner(&f.ty, pos, direct),
                embedded: f.embedded,
            })
            .collect();
        let mut resolved = StructType {
            fields,
            spec: s.spec,
        };
        if resolved.spec.num.is_none() && is_generic(&Type::Struct(Box::new(resolved.clone()))) {
            resolved.spec = Spec {
                num: Some(Basic::Num),
            };
        }
        Type::Struct(Box::new(resolved))
    }

    fn resolve_interface(
        &mut self,
        i: &InterfaceType,
        pos: &Pos,
    ) -> Type {
        let mut methods = BTreeMap::new();
        for (name, sig) in &i.methods {
            let sig = self.resolve_func(sig, pos);
            if is_generic_func(&sig) {
                self.error(pos, TypeError::InterfaceNum(name.clone()));
            }
            methods.insert(name.clone(), sig);
        }
        for embed in &i.embeds {
            let embed = self.resolve_inner(embed, pos, true);
            match underlying(&embed) {
                Type::Interface(inner) => {
                    for (name, sig) in interface_methods(&inner) {
                        methods.entry(name).or_insert(sig);
                    }
                }
                _ if embed.is_invalid() => {}
                _ => self.error(pos, TypeError::EmbedNonInterface(embed.to_string())),
            }
        }
        Type::Interface(Box::new(InterfaceType {
            methods,
            embeds: Vec::new(),
        }))
    }
}
