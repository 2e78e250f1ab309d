//! Type model
//!
//! Types are values: equality is structural except for named types and
//! packages, which compare by identity. A [`NamedType`] is shared behind an
//! [`Arc`] and filled after allocation, so recursive declarations such as
//! `methodik List struct { next *List }` close their cycle through the
//! shared handle rather than through ownership.
//!
//! The same [`Type`] enum is used by the parser (with [`Type::Unresolved`]
//! standing for names) and by the checker, which replaces every unresolved
//! name with the type it denotes.

pub mod constant;

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

/// Basic types, including the untyped constant kinds and `num`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Basic {
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    /// Float of unspecified width, equal to both float widths
    Float,
    Float32,
    Float64,
    /// Complex of unspecified width, equal to both complex widths
    Complex,
    Complex64,
    Complex128,
    String,
    UnsafePointer,
    UntypedNil,
    UntypedBool,
    UntypedInteger,
    UntypedRune,
    UntypedFloat,
    UntypedComplex,
    UntypedString,
    /// The numeric type parameter
    Num,
}

impl Basic {
    /// Every concrete numeric basic `num` may be specialized to
    pub const NUMERIC: &'static [Basic] = &[
        Basic::Int,
        Basic::Int8,
        Basic::Int16,
        Basic::Int32,
        Basic::Int64,
        Basic::Uint,
        Basic::Uint8,
        Basic::Uint16,
        Basic::Uint32,
        Basic::Uint64,
        Basic::Uintptr,
        Basic::Float32,
        Basic::Float64,
        Basic::Complex64,
        Basic::Complex128,
    ];

    /// Source spelling
    pub fn name(self) -> &'static str {
        match self {
            Basic::Bool => "bool",
            Basic::Int => "int",
            Basic::Int8 => "int8",
            Basic::Int16 => "int16",
            Basic::Int32 => "int32",
            Basic::Int64 => "int64",
            Basic::Uint => "uint",
            Basic::Uint8 => "uint8",
            Basic::Uint16 => "uint16",
            Basic::Uint32 => "uint32",
            Basic::Uint64 => "uint64",
            Basic::Uintptr => "uintptr",
            Basic::Float => "float",
            Basic::Float32 => "float32",
            Basic::Float64 => "float64",
            Basic::Complex => "complex",
            Basic::Complex64 => "complex64",
            Basic::Complex128 => "complex128",
            Basic::String => "string",
            Basic::UnsafePointer => "unsafe.Pointer",
            Basic::UntypedNil => "untyped nil",
            Basic::UntypedBool => "untyped bool",
            Basic::UntypedInteger => "untyped integer",
            Basic::UntypedRune => "untyped rune",
            Basic::UntypedFloat => "untyped float",
            Basic::UntypedComplex => "untyped complex",
            Basic::UntypedString => "untyped string",
            Basic::Num => "num",
        }
    }

    pub fn is_untyped(self) -> bool {
        matches!(
            self,
            Basic::UntypedNil
                | Basic::UntypedBool
                | Basic::UntypedInteger
                | Basic::UntypedRune
                | Basic::UntypedFloat
                | Basic::UntypedComplex
                | Basic::UntypedString
        )
    }

    pub fn is_integer(self) -> bool {
        matches!(
            self,
            Basic::Int
                | Basic::Int8
                | Basic::Int16
                | Basic::Int32
                | Basic::Int64
                | Basic::Uint
                | Basic::Uint8
                | Basic::Uint16
                | Basic::Uint32
                | Basic::Uint64
                | Basic::Uintptr
                | Basic::UntypedInteger
                | Basic::UntypedRune
        )
    }

    pub fn is_unsigned(self) -> bool {
        matches!(
            self,
            Basic::Uint | Basic::Uint8 | Basic::Uint16 | Basic::Uint32 | Basic::Uint64 | Basic::Uintptr
        )
    }

    pub fn is_float(self) -> bool {
        matches!(
            self,
            Basic::Float | Basic::Float32 | Basic::Float64 | Basic::UntypedFloat
        )
    }

    pub fn is_complex(self) -> bool {
        matches!(
            self,
            Basic::Complex | Basic::Complex64 | Basic::Complex128 | Basic::UntypedComplex
        )
    }

    /// Numeric, counting `num` and the untyped numeric kinds
    pub fn is_numeric(self) -> bool {
        self.is_integer() || self.is_float() || self.is_complex() || self == Basic::Num
    }

    pub fn is_string(self) -> bool {
        matches!(self, Basic::String | Basic::UntypedString)
    }

    pub fn is_bool(self) -> bool {
        matches!(self, Basic::Bool | Basic::UntypedBool)
    }

    /// Check if values of this type are ordered by `<`
    pub fn is_ordered(self) -> bool {
        self.is_integer() || self.is_float() || self.is_string() || self == Basic::Num
    }

    /// The type an untyped constant takes when nothing constrains it
    pub fn default_type(self) -> Basic {
        match self {
            Basic::UntypedBool => Basic::Bool,
            Basic::UntypedInteger => Basic::Int,
            Basic::UntypedRune => Basic::Int32,
            Basic::UntypedFloat => Basic::Float64,
            Basic::UntypedComplex => Basic::Complex128,
            Basic::UntypedString => Basic::String,
            other => other,
        }
    }

    /// Rank of an untyped numeric kind; constants promote upward
    pub fn untyped_rank(self) -> Option<u8> {
        match self {
            Basic::UntypedInteger => Some(0),
            Basic::UntypedRune => Some(1),
            Basic::UntypedFloat => Some(2),
            Basic::UntypedComplex => Some(3),
            _ => None,
        }
    }

    /// Look up a basic type by its universe name
    pub fn from_name(name: &str) -> Option<Basic> {
        let basic = match name {
            "bool" => Basic::Bool,
            "int" => Basic::Int,
            "int8" => Basic::Int8,
            "int16" => Basic::Int16,
            "int32" | "rune" => Basic::Int32,
            "int64" => Basic::Int64,
            "uint" => Basic::Uint,
            "uint8" | "byte" => Basic::Uint8,
            "uint16" => Basic::Uint16,
            "uint32" => Basic::Uint32,
            "uint64" => Basic::Uint64,
            "uintptr" => Basic::Uintptr,
            "float32" => Basic::Float32,
            "float64" => Basic::Float64,
            "complex64" => Basic::Complex64,
            "complex128" => Basic::Complex128,
            "string" => Basic::String,
            "num" => Basic::Num,
            _ => return None,
        };
        Some(basic)
    }
}

fn basic_equal(
    a: Basic,
    b: Basic,
) -> bool {
    a == b
        || matches!(
            (a, b),
            (Basic::Float, Basic::Float32 | Basic::Float64)
                | (Basic::Float32 | Basic::Float64, Basic::Float)
                | (Basic::Complex, Basic::Complex64 | Basic::Complex128)
                | (Basic::Complex64 | Basic::Complex128, Basic::Complex)
        )
}

/// Built-in functions with hand-coded typing rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    Append,
    Cap,
    Close,
    Complex,
    Copy,
    Delete,
    Imag,
    Len,
    Make,
    New,
    Panic,
    Real,
    Recover,
}

impl Builtin {
    pub const ALL: &'static [Builtin] = &[
        Builtin::Append,
        Builtin::Cap,
        Builtin::Close,
        Builtin::Complex,
        Builtin::Copy,
        Builtin::Delete,
        Builtin::Imag,
        Builtin::Len,
        Builtin::Make,
        Builtin::New,
        Builtin::Panic,
        Builtin::Real,
        Builtin::Recover,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Append => "append",
            Builtin::Cap => "cap",
            Builtin::Close => "close",
            Builtin::Complex => "complex",
            Builtin::Copy => "copy",
            Builtin::Delete => "delete",
            Builtin::Imag => "imag",
            Builtin::Len => "len",
            Builtin::Make => "make",
            Builtin::New => "new",
            Builtin::Panic => "panic",
            Builtin::Real => "real",
            Builtin::Recover => "recover",
        }
    }
}

/// Channel direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

/// `num` specialization of a generic declaration
///
/// `None` for ordinary declarations, `Some(Basic::Num)` for a generic
/// declaration, and a concrete numeric basic at a specialized use site.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Spec {
    pub num: Option<Basic>,
}

/// Function signature
#[derive(Debug, Clone, Default)]
pub struct FuncType {
    pub params: Vec<Type>,
    pub results: Vec<Type>,
    /// The last parameter is `...T`, stored as `[]T`
    pub variadic: bool,
    /// Outer variables read by a function literal
    pub free_vars: Vec<String>,
    /// Outer named types referenced by a function literal
    pub free_mdik: Vec<NamedRef>,
    pub spec: Spec,
}

impl FuncType {
    pub fn new(
        params: Vec<Type>,
        results: Vec<Type>,
    ) -> Self {
        Self {
            params,
            results,
            ..Self::default()
        }
    }

    pub fn variadic(
        params: Vec<Type>,
        results: Vec<Type>,
    ) -> Self {
        Self {
            params,
            results,
            variadic: true,
            ..Self::default()
        }
    }

    /// The result as a single type: nothing, the one result, or a tuple
    pub fn result_type(&self) -> Option<Type> {
        match self.results.as_slice() {
            [] => None,
            [one] => Some(one.clone()),
            many => Some(Type::Tuple(many.to_vec())),
        }
    }
}

impl PartialEq for FuncType {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        func_equal(self, other)
    }
}

/// Struct field
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub ty: Type,
    pub embedded: bool,
}

/// Struct type
#[derive(Debug, Clone, Default)]
pub struct StructType {
    pub fields: Vec<Field>,
    pub spec: Spec,
}

impl StructType {
    pub fn field(
        &self,
        name: &str,
    ) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Interface type
#[derive(Debug, Clone, Default)]
pub struct InterfaceType {
    pub methods: BTreeMap<String, FuncType>,
    /// Embedded interfaces, flattened into `methods` by the checker
    pub embeds: Vec<Type>,
}

/// A method of a named type
#[derive(Debug, Clone)]
pub struct Method {
    pub name: String,
    /// Signature without the receiver
    pub ty: FuncType,
    /// Declared with a pointer receiver
    pub pointer: bool,
}

static NEXT_NAMED_ID: AtomicU64 = AtomicU64::new(1);

/// A named type
///
/// Allocated first and filled later, so references to a type under
/// construction are possible. Compares by identity.
pub struct NamedType {
    id: u64,
    pub name: String,
    /// Path of the declaring package, empty for the package being checked
    pub pkg_path: String,
    pub underlying: RwLock<Type>,
    pub methods: RwLock<Vec<Method>>,
    pub spec: RwLock<Spec>,
    /// Specializations of a generic named type, one per basic `num` binds to
    pub instances: RwLock<Vec<(Basic, NamedRef)>>,
    /// The generic type this one specializes
    origin: Option<u64>,
}

/// Shared handle to a named type
pub type NamedRef = Arc<NamedType>;

impl NamedType {
    /// Allocate an empty named type
    pub fn new(
        name: impl Into<String>,
        pkg_path: impl Into<String>,
    ) -> NamedRef {
        Arc::new(Self {
            id: NEXT_NAMED_ID.fetch_add(1, Ordering::Relaxed),
            name: name.into(),
            pkg_path: pkg_path.into(),
            underlying: RwLock::new(Type::invalid()),
            methods: RwLock::new(Vec::new()),
            spec: RwLock::new(Spec::default()),
            instances: RwLock::new(Vec::new()),
            origin: None,
        })
    }

    /// Allocate an empty specialization of `generic` with `num` bound to `num`
    pub fn new_instance(
        generic: &NamedType,
        num: Basic,
    ) -> NamedRef {
        Arc::new(Self {
            id: NEXT_NAMED_ID.fetch_add(1, Ordering::Relaxed),
            name: generic.name.clone(),
            pkg_path: generic.pkg_path.clone(),
            underlying: RwLock::new(Type::invalid()),
            methods: RwLock::new(Vec::new()),
            spec: RwLock::new(Spec { num: Some(num) }),
            instances: RwLock::new(Vec::new()),
            origin: Some(generic.origin()),
        })
    }

    /// Allocate a named type over a known underlying type
    pub fn with_underlying(
        name: impl Into<String>,
        pkg_path: impl Into<String>,
        underlying: Type,
    ) -> NamedRef {
        let named = Self::new(name, pkg_path);
        named.set_underlying(underlying);
        named
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Identity of the generic declaration; a plain type is its own origin
    pub fn origin(&self) -> u64 {
        self.origin.unwrap_or(self.id)
    }

    /// Declared over `num` and not yet specialized
    pub fn is_generic(&self) -> bool {
        self.spec.read().num == Some(Basic::Num)
    }

    pub fn underlying(&self) -> Type {
        self.underlying.read().clone()
    }

    pub fn set_underlying(
        &self,
        ty: Type,
    ) {
        *self.underlying.write() = ty;
    }

    pub fn add_method(
        &self,
        method: Method,
    ) {
        self.methods.write().push(method);
    }

    pub fn method(
        &self,
        name: &str,
    ) -> Option<Method> {
        self.methods.read().iter().find(|m| m.name == name).cloned()
    }

    /// Qualified name used in messages
    pub fn qualified_name(&self) -> String {
        match self.pkg_path.rsplit('/').next() {
            Some(pkg) if !pkg.is_empty() => format!("{}.{}", pkg.trim_end_matches(".ng"), self.name),
            _ => self.name.clone(),
        }
    }
}

impl fmt::Debug for NamedType {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "Named({}#{})", self.qualified_name(), self.id)
    }
}

/// An alias for another type
#[derive(Debug, Clone)]
pub struct AliasType {
    pub name: String,
    pub ty: Type,
}

/// The type of an imported package name
#[derive(Debug, Clone)]
pub struct PackageType {
    pub path: String,
    pub name: String,
}

/// A type, or a type expression before resolution
#[derive(Debug, Clone)]
pub enum Type {
    Basic(Basic),
    Builtin(Builtin),
    Func(Box<FuncType>),
    Struct(Box<StructType>),
    Named(NamedRef),
    Array {
        /// Element count; `-1` until a `[...]T` literal fixes it
        len: i64,
        elem: Box<Type>,
        ellipsis: bool,
    },
    Slice(Box<Type>),
    /// `...T` in a parameter list before it becomes a slice
    Ellipsis(Box<Type>),
    Table(Box<Type>),
    Tuple(Vec<Type>),
    Pointer(Box<Type>),
    Chan(ChanDir, Box<Type>),
    Map(Box<Type>, Box<Type>),
    Package(Arc<PackageType>),
    Interface(Box<InterfaceType>),
    Alias(Arc<AliasType>),
    /// A type name not yet looked up
    Unresolved {
        package: Option<String>,
        name: String,
    },
}

impl Type {
    /// Placeholder for types that failed to check
    pub fn invalid() -> Type {
        Type::Tuple(Vec::new())
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Type::Tuple(v) if v.is_empty())
    }

    pub fn unresolved(name: impl Into<String>) -> Type {
        Type::Unresolved {
            package: None,
            name: name.into(),
        }
    }

    pub fn slice(elem: Type) -> Type {
        Type::Slice(Box::new(elem))
    }

    pub fn pointer(elem: Type) -> Type {
        Type::Pointer(Box::new(elem))
    }

    pub fn map(
        key: Type,
        value: Type,
    ) -> Type {
        Type::Map(Box::new(key), Box::new(value))
    }

    pub fn func(f: FuncType) -> Type {
        Type::Func(Box::new(f))
    }

    pub fn empty_interface() -> Type {
        Type::Interface(Box::default())
    }

    /// The basic kind of this type's underlying type
    pub fn basic(&self) -> Option<Basic> {
        match underlying(self) {
            Type::Basic(b) => Some(b),
            _ => None,
        }
    }

    pub fn is_untyped(&self) -> bool {
        matches!(self, Type::Basic(b) if b.is_untyped())
    }

    pub fn is_untyped_nil(&self) -> bool {
        matches!(self, Type::Basic(Basic::UntypedNil))
    }

    pub fn is_interface(&self) -> bool {
        matches!(underlying(self), Type::Interface(_))
    }

    pub fn is_bool(&self) -> bool {
        self.basic().is_some_and(Basic::is_bool)
    }

    pub fn is_numeric(&self) -> bool {
        self.basic().is_some_and(Basic::is_numeric)
    }

    pub fn is_integer(&self) -> bool {
        self.basic().is_some_and(Basic::is_integer)
    }

    pub fn is_string(&self) -> bool {
        self.basic().is_some_and(Basic::is_string)
    }

    /// Check if `nil` may be assigned to values of this type
    pub fn is_nillable(&self) -> bool {
        matches!(
            underlying(self),
            Type::Pointer(_)
                | Type::Slice(_)
                | Type::Table(_)
                | Type::Map(..)
                | Type::Chan(..)
                | Type::Func(_)
                | Type::Interface(_)
                | Type::Basic(Basic::UnsafePointer)
        )
    }

    pub fn as_named(&self) -> Option<&NamedRef> {
        match self {
            Type::Named(n) => Some(n),
            _ => None,
        }
    }

    /// The function signature of this type's underlying type
    pub fn as_func(&self) -> Option<FuncType> {
        match underlying(self) {
            Type::Func(f) => Some(*f),
            _ => None,
        }
    }

    /// Check for any unresolved name left in the type
    pub fn has_unresolved(&self) -> bool {
        let mut found = false;
        visit(self, &mut HashSet::new(), &mut |t| {
            if matches!(t, Type::Unresolved { .. }) {
                found = true;
            }
        });
        found
    }
}

impl PartialEq for Type {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        equal(self, other)
    }
}

/// Type equality
///
/// Structural, except named types and packages which compare by identity.
/// Aliases are transparent.
pub fn equal(
    a: &Type,
    b: &Type,
) -> bool {
    if matches!(a, Type::Alias(_)) || matches!(b, Type::Alias(_)) {
        return equal(&unalias(a), &unalias(b));
    }
    match (a, b) {
        (Type::Basic(x), Type::Basic(y)) => basic_equal(*x, *y),
        (Type::Builtin(x), Type::Builtin(y)) => x == y,
        (Type::Func(x), Type::Func(y)) => func_equal(x, y),
        (Type::Struct(x), Type::Struct(y)) => {
            x.fields.len() == y.fields.len()
                && x.fields.iter().zip(&y.fields).all(|(f, g)| {
                    f.name == g.name && f.embedded == g.embedded && equal(&f.ty, &g.ty)
                })
        }
        (Type::Named(x), Type::Named(y)) => x.id == y.id,
        (
            Type::Array {
                len: l1, elem: e1, ..
            },
            Type::Array {
                len: l2, elem: e2, ..
            },
        ) => l1 == l2 && equal(e1, e2),
        (Type::Slice(x), Type::Slice(y))
        | (Type::Ellipsis(x), Type::Ellipsis(y))
        | (Type::Table(x), Type::Table(y))
        | (Type::Pointer(x), Type::Pointer(y)) => equal(x, y),
        (Type::Tuple(x), Type::Tuple(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(s, t)| equal(s, t))
        }
        (Type::Chan(d1, e1), Type::Chan(d2, e2)) => d1 == d2 && equal(e1, e2),
        (Type::Map(k1, v1), Type::Map(k2, v2)) => equal(k1, k2) && equal(v1, v2),
        (Type::Package(x), Type::Package(y)) => x.path == y.path,
        (Type::Interface(x), Type::Interface(y)) => {
            x.methods.len() == y.methods.len()
                && x.methods
                    .iter()
                    .zip(&y.methods)
                    .all(|((n1, f1), (n2, f2))| n1 == n2 && func_equal(f1, f2))
        }
        (
            Type::Unresolved {
                package: p1,
                name: n1,
            },
            Type::Unresolved {
                package: p2,
                name: n2,
            },
        ) => p1 == p2 && n1 == n2,
        _ => false,
    }
}

fn func_equal(
    a: &FuncType,
    b: &FuncType,
) -> bool {
    a.variadic == b.variadic
        && a.params.len() == b.params.len()
        && a.results.len() == b.results.len()
        && a.params.iter().zip(&b.params).all(|(x, y)| equal(x, y))
        && a.results.iter().zip(&b.results).all(|(x, y)| equal(x, y))
}

/// Strip aliases
pub fn unalias(t: &Type) -> Type {
    match t {
        Type::Alias(a) => unalias(&a.ty),
        other => other.clone(),
    }
}

/// The underlying type: named types and aliases are looked through
pub fn underlying(t: &Type) -> Type {
    match t {
        // The checker never stores a named type as another's underlying.
        Type::Named(n) => unalias(&n.underlying()),
        Type::Alias(a) => underlying(&a.ty),
        other => other.clone(),
    }
}

/// Walk a type and every type it mentions, entering each named type once
pub fn visit(
    t: &Type,
    seen: &mut HashSet<u64>,
    f: &mut dyn FnMut(&Type),
) {
    f(t);
    match t {
        Type::Func(func) => visit_func(func, seen, f),
        Type::Struct(s) => {
            for field in &s.fields {
                visit(&field.ty, seen, f);
            }
        }
        Type::Named(n) => {
            if seen.insert(n.id) {
                visit(&n.underlying(), seen, f);
                let methods = n.methods.read().clone();
                for m in &methods {
                    visit_func(&m.ty, seen, f);
                }
            }
        }
        Type::Array { elem, .. }
        | Type::Slice(elem)
        | Type::Ellipsis(elem)
        | Type::Table(elem)
        | Type::Pointer(elem)
        | Type::Chan(_, elem) => visit(elem, seen, f),
        Type::Tuple(ts) => {
            for t in ts {
                visit(t, seen, f);
            }
        }
        Type::Map(k, v) => {
            visit(k, seen, f);
            visit(v, seen, f);
        }
        Type::Interface(i) => {
            for m in i.methods.values() {
                visit_func(m, seen, f);
            }
            for e in &i.embeds {
                visit(e, seen, f);
            }
        }
        Type::Alias(a) => visit(&a.ty, seen, f),
        Type::Basic(_) | Type::Builtin(_) | Type::Package(_) | Type::Unresolved { .. } => {}
    }
}

fn visit_func(
    func: &FuncType,
    seen: &mut HashSet<u64>,
    f: &mut dyn FnMut(&Type),
) {
    for p in func.params.iter().chain(&func.results) {
        visit(p, seen, f);
    }
}

/// Check whether a type transitively mentions `num`
pub fn is_generic(t: &Type) -> bool {
    let mut found = false;
    visit(t, &mut HashSet::new(), &mut |t| {
        if matches!(t, Type::Basic(Basic::Num)) {
            found = true;
        }
    });
    found
}

/// Check whether a signature mentions `num`
pub fn is_generic_func(f: &FuncType) -> bool {
    let mut found = false;
    visit_func(f, &mut HashSet::new(), &mut |t| {
        if matches!(t, Type::Basic(Basic::Num)) {
            found = true;
        }
    });
    found
}

impl fmt::Display for Type {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Type::Basic(b) => f.write_str(b.name()),
            Type::Builtin(b) => write!(f, "builtin {}", b.name()),
            Type::Func(func) => write!(f, "func{}", func),
            Type::Struct(s) => {
                f.write_str("struct{")?;
                for (i, field) in s.fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    if field.embedded {
                        write!(f, "{}", field.ty)?;
                    } else {
                        write!(f, "{} {}", field.name, field.ty)?;
                    }
                }
                f.write_str("}")
            }
            Type::Named(n) => f.write_str(&n.qualified_name()),
            Type::Array {
                len, elem, ellipsis, ..
            } => {
                if *ellipsis && *len < 0 {
                    write!(f, "[...]{}", elem)
                } else {
                    write!(f, "[{}]{}", len, elem)
                }
            }
            Type::Slice(elem) => write!(f, "[]{}", elem),
            Type::Ellipsis(elem) => write!(f, "...{}", elem),
            Type::Table(elem) => write!(f, "[|]{}", elem),
            Type::Tuple(ts) => {
                f.write_str("(")?;
                write_list(f, ts)?;
                f.write_str(")")
            }
            Type::Pointer(elem) => write!(f, "*{}", elem),
            Type::Chan(dir, elem) => match dir {
                ChanDir::Both => write!(f, "chan {}", elem),
                ChanDir::Send => write!(f, "chan<- {}", elem),
                ChanDir::Recv => write!(f, "<-chan {}", elem),
            },
            Type::Map(k, v) => write!(f, "map[{}]{}", k, v),
            Type::Package(p) => write!(f, "package {}", p.path),
            Type::Interface(i) => {
                if i.methods.is_empty() && i.embeds.is_empty() {
                    return f.write_str("interface{}");
                }
                f.write_str("interface{")?;
                let mut first = true;
                for e in &i.embeds {
                    if !first {
                        f.write_str("; ")?;
                    }
                    first = false;
                    write!(f, "{}", e)?;
                }
                for (name, m) in &i.methods {
                    if !first {
                        f.write_str("; ")?;
                    }
                    first = false;
                    write!(f, "{}{}", name, m)?;
                }
                f.write_str("}")
            }
            Type::Alias(a) => f.write_str(&a.name),
            Type::Unresolved { package, name } => match package {
                Some(p) => write!(f, "{}.{}", p, name),
                None => f.write_str(name),
            },
        }
    }
}

fn write_list(
    f: &mut fmt::Formatter<'_>,
    ts: &[Type],
) -> fmt::Result {
    for (i, t) in ts.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", t)?;
    }
    Ok(())
}

/// Signature without the `func` keyword: `(int, ...string) (bool, error)`
impl fmt::Display for FuncType {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str("(")?;
        for (i, p) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match p {
                Type::Slice(elem) if self.variadic && i == self.params.len() - 1 => {
                    write!(f, "...{}", elem)?
                }
                p => write!(f, "{}", p)?,
            }
        }
        f.write_str(")")?;
        match self.results.as_slice() {
            [] => Ok(()),
            [one] => write!(f, " {}", one),
            many => {
                f.write_str(" (")?;
                write_list(f, many)?;
                f.write_str(")")
            }
        }
    }
}

#[cfg(test)]
mod tests;
