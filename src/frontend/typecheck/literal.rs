//! Composite literals
//!
//! Struct, array, slice, map and table literals. Element literals may elide
//! their type (`[]Point{{1, 2}}`); the enclosing literal passes the element
//! type down as a hint, and a pointer element type makes the elided literal
//! stand for `&T{...}`.

use std::collections::HashSet;

use crate::frontend::parser::ast::{Expr, ExprKind};
use crate::frontend::types::constant::ConstValue;
use crate::frontend::types::{unalias, underlying, Basic, StructType, Type};
use crate::util::span::Pos;

use super::errors::TypeError;
use super::specialize::{infer_num, specialize};
use super::{Checker, Mode, Partial};

/// A checked element waiting to be assigned to its slot
struct Pending {
    slot: Type,
    value: Partial,
    text: String,
    pos: Pos,
}

impl Checker {
    pub(super) fn composite_expr(
        &mut self,
        e: &mut Expr,
        hint: Option<&Type>,
    ) -> Partial {
        let (id, pos) = (e.id, e.pos.clone());
        match &mut e.kind {
            ExprKind::CompLiteral { ty, keys, values }
            | ExprKind::MapLiteral { ty, keys, values }
            | ExprKind::SliceLiteral { ty, keys, values }
            | ExprKind::ArrayLiteral { ty, keys, values } => {
                let mut pointer = false;
                if ty.is_invalid() {
                    let Some(hint) = hint else {
                        let err = TypeError::CompositeLiteral("missing type in composite literal".into());
                        self.error(&pos, err);
                        return Partial::invalid(id);
                    };
                    *ty = match unalias(hint) {
                        Type::Pointer(elem) => {
                            pointer = true;
                            *elem
                        }
                        other => other,
                    };
                } else {
                    self.resolve_in_place(ty, &pos);
                }
                if ty.is_invalid() {
                    return Partial::invalid(id);
                }
                let Some(lit) = self.composite_elements(ty, keys, values, &pos) else {
                    return Partial::invalid(id);
                };
                let result = if pointer { Type::pointer(lit) } else { lit };
                Partial::new(Mode::Var, result, id)
            }
            ExprKind::TableLiteral { ty, col_names, rows } => {
                self.resolve_in_place(ty, &pos);
                let Type::Table(elem) = underlying(ty) else {
                    if !ty.is_invalid() {
                        self.error(&pos, TypeError::InvalidCompositeLiteral(ty.to_string()));
                    }
                    return Partial::invalid(id);
                };
                self.table_rows(&elem, col_names, rows, &pos);
                Partial::new(Mode::Var, ty.clone(), id)
            }
            _ => Partial::invalid(id),
        }
    }

    /// Check the elements against the literal type, returning the final
    /// type: `[...]T` gets its length, a generic struct its `num`
    fn composite_elements(
        &mut self,
        ty: &mut Type,
        keys: &mut [Expr],
        values: &mut [Expr],
        pos: &Pos,
    ) -> Option<Type> {
        match underlying(ty) {
            Type::Struct(s) => self.struct_literal(ty, &s, keys, values, pos),
            Type::Slice(elem) => {
                self.array_elements(&elem, keys, values, None);
                Some(ty.clone())
            }
            Type::Array {
                len,
                elem,
                ellipsis,
            } => {
                let bound = if len >= 0 { Some(len) } else { None };
                let count = self.array_elements(&elem, keys, values, bound);
                if len < 0 {
                    *ty = Type::Array {
                        len: count,
                        elem,
                        ellipsis,
                    };
                }
                Some(ty.clone())
            }
            Type::Map(k, v) => {
                self.map_elements(&k, &v, keys, values);
                Some(ty.clone())
            }
            _ => {
                self.error(pos, TypeError::InvalidCompositeLiteral(ty.to_string()));
                None
            }
        }
    }

    fn struct_literal(
        &mut self,
        ty: &mut Type,
        s: &StructType,
        keys: &mut [Expr],
        values: &mut [Expr],
        pos: &Pos,
    ) -> Option<Type> {
        let mut pending = Vec::new();
        if !keys.is_empty() {
            let mut seen = HashSet::new();
            for (key, value) in keys.iter().zip(values.iter_mut()) {
                let Some(name) = key.as_ident() else {
                    let err = TypeError::CompositeLiteral(format!("invalid field name {} in struct literal", key));
                    self.error(&key.pos, err);
                    continue;
                };
                let Some(field) = s.field(name) else {
                    let err = TypeError::CompositeLiteral(format!("unknown field {} in struct literal", name));
                    self.error(&key.pos, err);
                    continue;
                };
                if !seen.insert(name.to_string()) {
                    let err = TypeError::CompositeLiteral(format!("duplicate field name {} in struct literal", name));
                    self.error(&key.pos, err);
                    continue;
                }
                self.types.insert(key.id, field.ty.clone());
                pending.push(self.pending(field.ty.clone(), value));
            }
        } else if !values.is_empty() {
            if values.len() != s.fields.len() {
                let msg = if values.len() < s.fields.len() {
                    "too few values in struct literal"
                } else {
                    "too many values in struct literal"
                };
                self.error(pos, TypeError::CompositeLiteral(msg.into()));
                return None;
            }
            for (field, value) in s.fields.iter().zip(values.iter_mut()) {
                pending.push(self.pending(field.ty.clone(), value));
            }
        }

        let generic = match unalias(ty) {
            Type::Struct(_) => s.spec.num == Some(Basic::Num),
            Type::Named(n) => n.is_generic(),
            _ => false,
        };
        if generic {
            let pairs: Vec<(Type, Type)> = pending.iter().map(|p| (p.slot.clone(), p.value.ty.clone())).collect();
            let Some(num) = infer_num(&pairs) else {
                self.error(pos, TypeError::CannotInferNum(ty.to_string()));
                return None;
            };
            *ty = specialize(ty, num);
            for p in &mut pending {
                p.slot = specialize(&p.slot, num);
            }
        }
        for mut p in pending {
            self.assign_to(&mut p.value, &p.text, &p.slot, "struct literal", &p.pos);
        }
        Some(ty.clone())
    }

    fn pending(
        &mut self,
        slot: Type,
        value: &mut Expr,
    ) -> Pending {
        let p = self.value_hint(value, Some(&slot));
        Pending {
            slot,
            value: p,
            text: value.to_string(),
            pos: value.pos.clone(),
        }
    }

    /// Check array or slice elements; returns the length they span
    fn array_elements(
        &mut self,
        elem: &Type,
        keys: &mut [Expr],
        values: &mut [Expr],
        bound: Option<i64>,
    ) -> i64 {
        let mut next = 0i64;
        let mut count = 0i64;
        let mut seen = HashSet::new();
        for (i, value) in values.iter_mut().enumerate() {
            let mut index = next;
            if let Some(key) = keys.get_mut(i) {
                let k = self.value(key);
                match k.val.as_ref().and_then(ConstValue::as_i64) {
                    Some(v) if v >= 0 && k.ty.is_integer() => index = v,
                    _ => {
                        if !k.is_invalid() {
                            let err = TypeError::CompositeLiteral(format!(
                                "index {} must be non-negative integer constant",
                                key
                            ));
                            self.error(&key.pos, err);
                        }
                    }
                }
            }
            if let Some(len) = bound.filter(|len| index >= *len) {
                let err = TypeError::IndexOutOfRange {
                    index: index.to_string(),
                    len,
                };
                self.error(&value.pos, err);
            } else if !seen.insert(index) {
                let err = TypeError::CompositeLiteral(format!(
                    "duplicate index {} in array or slice literal",
                    index
                ));
                self.error(&value.pos, err);
            }
            next = index + 1;
            count = count.max(next);

            let mut p = self.value_hint(value, Some(elem));
            let text = value.to_string();
            self.assign_to(&mut p, &text, elem, "array or slice literal", &value.pos);
        }
        count
    }

    fn map_elements(
        &mut self,
        k: &Type,
        v: &Type,
        keys: &mut [Expr],
        values: &mut [Expr],
    ) {
        let mut seen: Vec<ConstValue> = Vec::new();
        for (key, value) in keys.iter_mut().zip(values.iter_mut()) {
            let mut kp = self.value_hint(key, Some(k));
            let text = key.to_string();
            if self.assign_to(&mut kp, &text, k, "map literal", &key.pos) {
                if let Some(val) = kp.val {
                    if seen.contains(&val) {
                        let err = TypeError::CompositeLiteral(format!("duplicate key {} in map literal", text));
                        self.error(&key.pos, err);
                    } else {
                        seen.push(val);
                    }
                }
            }
            let mut vp = self.value_hint(value, Some(v));
            let text = value.to_string();
            self.assign_to(&mut vp, &text, v, "map literal", &value.pos);
        }
    }

    /// Column names are strings; rows all have the same width
    fn table_rows(
        &mut self,
        elem: &Type,
        col_names: &mut [Expr],
        rows: &mut [Vec<Expr>],
        pos: &Pos,
    ) {
        let string = Type::Basic(Basic::String);
        for name in col_names.iter_mut() {
            let mut p = self.value(name);
            let text = name.to_string();
            self.assign_to(&mut p, &text, &string, "table column name", &name.pos);
        }
        let width = if col_names.is_empty() {
            rows.first().map_or(0, Vec::len)
        } else {
            col_names.len()
        };
        for (i, row) in rows.iter_mut().enumerate() {
            if row.len() != width {
                let err = TypeError::CompositeLiteral(format!(
                    "table row {} has {} values, want {}",
                    i,
                    row.len(),
                    width
                ));
                self.error(pos, err);
            }
            for value in row.iter_mut() {
                let mut p = self.value_hint(value, Some(elem));
                let text = value.to_string();
                self.assign_to(&mut p, &text, elem, "table literal", &value.pos);
            }
        }
    }
}
