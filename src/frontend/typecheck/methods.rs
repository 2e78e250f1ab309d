//! Method sets, selectors and interface satisfaction
//!
//! Method sets of named types are memoized in a [`Memory`]:
//!
//! - `T` has its value-receiver methods plus the methods of its underlying
//!   type (interface methods, or methods promoted from embedded fields)
//! - `*T` adds the pointer-receiver methods
//! - a pointer to a pointer has no methods
//! - an interface has its declared methods
//!
//! Promotion through embedded fields stops at named types already visited,
//! so recursive embeddings terminate.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::frontend::types::{underlying, unalias, Field, FuncType, InterfaceType, NamedRef, Type};

/// A method set: name to signature, without receivers
pub type MethodSet = BTreeMap<String, FuncType>;

/// Memoized method sets
#[derive(Debug, Default)]
pub struct Memory {
    named: HashMap<(u64, bool), MethodSet>,
}

/// What a selector `x.name` denotes
#[derive(Debug, Clone)]
pub enum Selection {
    Field(Type),
    Method {
        ty: FuncType,
        /// Declared with a pointer receiver
        pointer: bool,
    },
}

impl Memory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget memoized sets, after methods were added to a type
    pub fn forget(
        &mut self,
        named: &NamedRef,
    ) {
        self.named.remove(&(named.id(), false));
        self.named.remove(&(named.id(), true));
    }

    /// The method set of a type
    pub fn method_set(
        &mut self,
        t: &Type,
    ) -> MethodSet {
        self.method_set_seen(t, &mut HashSet::new())
    }

    fn method_set_seen(
        &mut self,
        t: &Type,
        seen: &mut HashSet<u64>,
    ) -> MethodSet {
        match unalias(t) {
            Type::Named(n) => self.named_set(&n, false, seen),
            Type::Pointer(elem) => match unalias(&elem) {
                Type::Named(n) => self.named_set(&n, true, seen),
                Type::Struct(s) => self.promoted(&s.fields, true, seen),
                _ => MethodSet::new(),
            },
            Type::Interface(i) => interface_methods(&i),
            Type::Struct(s) => self.promoted(&s.fields, false, seen),
            _ => MethodSet::new(),
        }
    }

    fn named_set(
        &mut self,
        n: &NamedRef,
        pointer: bool,
        seen: &mut HashSet<u64>,
    ) -> MethodSet {
        if let Some(set) = self.named.get(&(n.id(), pointer)) {
            return set.clone();
        }
        if !seen.insert(n.id()) {
            return MethodSet::new();
        }
        let mut set = match n.underlying() {
            Type::Interface(i) => interface_methods(&i),
            Type::Struct(s) => self.promoted(&s.fields, pointer, seen),
            _ => MethodSet::new(),
        };
        for m in n.methods.read().iter() {
            if pointer || !m.pointer {
                set.insert(m.name.clone(), m.ty.clone());
            }
        }
        seen.remove(&n.id());
        self.named.insert((n.id(), pointer), set.clone());
        set
    }

    fn promoted(
        &mut self,
        fields: &[Field],
        pointer: bool,
        seen: &mut HashSet<u64>,
    ) -> MethodSet {
        let mut set = MethodSet::new();
        for field in fields.iter().filter(|f| f.embedded) {
            let embedded = match unalias(&field.ty) {
                Type::Pointer(elem) => Type::Pointer(elem),
                other if pointer => Type::pointer(other),
                other => other,
            };
            for (name, ty) in self.method_set_seen(&embedded, seen) {
                set.entry(name).or_insert(ty);
            }
        }
        set
    }

    /// Resolve `x.name` where `x` has type `t`
    ///
    /// Pointers to structs are looked through once. Fields are found before
    /// methods at the same depth; shallower names hide deeper ones.
    pub fn select(
        &mut self,
        t: &Type,
        name: &str,
    ) -> Option<Selection> {
        self.select_seen(t, name, &mut HashSet::new())
    }

    fn select_seen(
        &mut self,
        t: &Type,
        name: &str,
        seen: &mut HashSet<u64>,
    ) -> Option<Selection> {
        let base = match unalias(t) {
            Type::Pointer(elem) => unalias(&elem),
            other => other,
        };
        if let Type::Named(n) = &base {
            if !seen.insert(n.id()) {
                return None;
            }
            if let Some(m) = n.method(name) {
                return Some(Selection::Method {
                    ty: m.ty,
                    pointer: m.pointer,
                });
            }
        }
        match underlying(&base) {
            Type::Interface(i) => interface_methods(&i).remove(name).map(|ty| Selection::Method {
                ty,
                pointer: false,
            }),
            Type::Struct(s) => {
                if let Some(field) = s.field(name) {
                    return Some(Selection::Field(field.ty.clone()));
                }
                s.fields
                    .iter()
                    .filter(|f| f.embedded)
                    .find_map(|f| self.select_seen(&f.ty, name, seen))
            }
            _ => None,
        }
    }

    /// Check that `t` implements `iface`, explaining why not
    pub fn implements(
        &mut self,
        t: &Type,
        iface: &InterfaceType,
    ) -> Result<(), String> {
        let wanted = interface_methods(iface);
        if wanted.is_empty() {
            return Ok(());
        }
        let have = self.method_set(t);
        for (name, sig) in &wanted {
            match have.get(name) {
                Some(found) if found == sig => {}
                Some(_) => return Err(format!("wrong type for method {}", name)),
                None => {
                    let pointer_only = matches!(unalias(t), Type::Named(_))
                        && self.method_set(&Type::pointer(t.clone())).contains_key(name);
                    return Err(if pointer_only {
                        format!("method {} has pointer receiver", name)
                    } else {
                        format!("missing method {}", name)
                    });
                }
            }
        }
        Ok(())
    }

    /// Check whether a value of interface type `iface` could hold a `t`
    ///
    /// For an interface `t` this always holds: some dynamic type may
    /// implement both.
    pub fn assertable(
        &mut self,
        iface: &InterfaceType,
        t: &Type,
    ) -> Result<(), String> {
        if t.is_interface() {
            return Ok(());
        }
        self.implements(t, iface)
    }
}

/// Declared methods of an interface, with embedded interfaces flattened
pub fn interface_methods(iface: &InterfaceType) -> MethodSet {
    let mut set = iface.methods.clone();
    for embed in &iface.embeds {
        if let Type::Interface(inner) = underlying(embed) {
            for (name, ty) in interface_methods(&inner) {
                set.entry(name).or_insert(ty);
            }
        }
    }
    set
}
