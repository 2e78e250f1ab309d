//! Scopes and objects
//!
//! Scopes form a stack while a package is checked: the package scope at the
//! bottom, then one scope per function, block and clause. A lookup that
//! crosses a function boundary records the name in that function's scope,
//! which is how function literals learn their free variables.

use indexmap::{IndexMap, IndexSet};

use crate::frontend::types::constant::ConstValue;
use crate::frontend::types::{NamedRef, Type};
use crate::util::span::Pos;

use super::errors::TypeError;
use super::universe::UNIVERSE;

/// What a name denotes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjKind {
    Var,
    Const,
    Type,
    Pkg,
}

/// A declared name
#[derive(Debug, Clone)]
pub struct Obj {
    pub name: String,
    pub kind: ObjKind,
    pub ty: Type,
    /// Value of a constant
    pub value: Option<ConstValue>,
    /// Where the name was declared; dummy for the universe
    pub decl: Pos,
    pub used: bool,
}

impl Obj {
    pub fn new(
        name: impl Into<String>,
        kind: ObjKind,
        ty: Type,
        decl: Pos,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            ty,
            value: None,
            decl,
            used: false,
        }
    }

    pub fn var(
        name: impl Into<String>,
        ty: Type,
        decl: Pos,
    ) -> Self {
        Self::new(name, ObjKind::Var, ty, decl)
    }

    pub fn constant(
        name: impl Into<String>,
        ty: Type,
        value: Option<ConstValue>,
        decl: Pos,
    ) -> Self {
        Self {
            value,
            ..Self::new(name, ObjKind::Const, ty, decl)
        }
    }

    pub fn type_name(
        name: impl Into<String>,
        ty: Type,
        decl: Pos,
    ) -> Self {
        Self::new(name, ObjKind::Type, ty, decl)
    }

    /// Check whether other packages may refer to this name
    pub fn is_exported(&self) -> bool {
        self.name.chars().next().is_some_and(char::is_uppercase)
    }
}

/// Kind of a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Package,
    /// A function body; lookups through it are free variable reads
    Func,
    Block,
}

/// A single scope
#[derive(Debug, Clone)]
pub struct Scope {
    pub kind: ScopeKind,
    objs: IndexMap<String, Obj>,
    /// Outer variables read from inside this function
    pub found_in_parent: IndexSet<String>,
    /// Outer named types referenced from inside this function
    pub found_mdik_in_parent: Vec<NamedRef>,
}

impl Scope {
    pub fn new(kind: ScopeKind) -> Self {
        Self {
            kind,
            objs: IndexMap::new(),
            found_in_parent: IndexSet::new(),
            found_mdik_in_parent: Vec::new(),
        }
    }

    pub fn get(
        &self,
        name: &str,
    ) -> Option<&Obj> {
        self.objs.get(name)
    }

    /// Objects in declaration order
    pub fn objs(&self) -> impl Iterator<Item = &Obj> {
        self.objs.values()
    }

    pub fn len(&self) -> usize {
        self.objs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objs.is_empty()
    }

    fn record_mdik(
        &mut self,
        named: &NamedRef,
    ) {
        if !self.found_mdik_in_parent.iter().any(|n| n.id() == named.id()) {
            self.found_mdik_in_parent.push(named.clone());
        }
    }
}

/// The stack of open scopes
#[derive(Debug, Clone)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeStack {
    /// A stack holding an empty package scope
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::new(ScopeKind::Package)],
        }
    }

    pub fn push(
        &mut self,
        kind: ScopeKind,
    ) {
        self.scopes.push(Scope::new(kind));
    }

    /// Close the innermost scope. The package scope is never popped.
    pub fn pop(&mut self) -> Option<Scope> {
        if self.scopes.len() > 1 {
            self.scopes.pop()
        } else {
            None
        }
    }

    pub fn package(&self) -> &Scope {
        &self.scopes[0]
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Declare a name in the innermost scope
    ///
    /// `_` binds nothing. Redeclaring a name of the same scope is an error;
    /// names of outer scopes are shadowed.
    pub fn declare(
        &mut self,
        obj: Obj,
    ) -> Result<(), TypeError> {
        if obj.name == "_" {
            return Ok(());
        }
        let scope = self.innermost();
        if scope.objs.contains_key(&obj.name) {
            return Err(TypeError::Redeclared { name: obj.name });
        }
        scope.objs.insert(obj.name.clone(), obj);
        Ok(())
    }

    /// Check whether the innermost scope declares `name`
    pub fn declared_here(
        &self,
        name: &str,
    ) -> bool {
        self.scopes
            .last()
            .is_some_and(|s| s.objs.contains_key(name))
    }

    fn innermost(&mut self) -> &mut Scope {
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }

    /// Look a name up without recording anything
    pub fn lookup(
        &self,
        name: &str,
    ) -> Option<&Obj> {
        self.scopes
            .iter()
            .rev()
            .find_map(|s| s.objs.get(name))
            .or_else(|| UNIVERSE.lookup(name))
    }

    /// Look a name up, marking it used and recording reads that cross a
    /// function boundary in every function scope crossed
    pub fn lookup_rec(
        &mut self,
        name: &str,
    ) -> Option<Obj> {
        let Some(found) = self.scopes.iter().rposition(|s| s.objs.contains_key(name)) else {
            return UNIVERSE.lookup(name).cloned();
        };
        let obj = {
            let obj = self.scopes[found].objs.get_mut(name)?;
            obj.used = true;
            obj.clone()
        };
        for scope in &mut self.scopes[found + 1..] {
            if scope.kind != ScopeKind::Func {
                continue;
            }
            match (&obj.kind, &obj.ty) {
                (ObjKind::Var, _) => {
                    scope.found_in_parent.insert(name.to_string());
                }
                (ObjKind::Type, Type::Named(named)) => scope.record_mdik(named),
                _ => {}
            }
        }
        Some(obj)
    }

    /// Replace the type of a declared variable in the innermost scope that
    /// holds it
    pub fn set_type(
        &mut self,
        name: &str,
        ty: Type,
    ) {
        if let Some(obj) = self.scopes.iter_mut().rev().find_map(|s| s.objs.get_mut(name)) {
            obj.ty = ty;
        }
    }

    /// Every visible name, innermost first, without duplicates
    pub fn visible_names(&self) -> IndexSet<String> {
        let mut names = IndexSet::new();
        for scope in self.scopes.iter().rev() {
            names.extend(scope.objs.keys().cloned());
        }
        names.extend(UNIVERSE.names().map(str::to_string));
        names
    }

    /// Drop package objects declared after the first `len`
    pub fn truncate_package(
        &mut self,
        len: usize,
    ) {
        self.scopes.truncate(1);
        self.scopes[0].objs.truncate(len);
    }
}
