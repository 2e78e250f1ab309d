//! Foreign packages
//!
//! A host that can run Go code describes its packages to the checker as a
//! [`GoPackage`], through the [`GoImporter`] it injects. The description is
//! plain serde data, so it can come from JSON generated by a Go tool or be
//! built in memory with [`MapImporter`].
//!
//! Translation into checker types is two-phase: every named type of the
//! package is allocated first, then filled. Named types may therefore
//! refer to each other, and to named types of packages not yet imported,
//! in any order.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::Arc;

use num_rational::BigRational;
use num_traits::FromPrimitive;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::cache::PackageCache;
use super::{ImportError, Package};
use crate::frontend::typecheck::universe::error_type;
use crate::frontend::typecheck::Obj;
use crate::frontend::types::constant::ConstValue;
use crate::frontend::types::{
    Basic, ChanDir, Field, FuncType, InterfaceType, Method, StructType, Type,
};
use crate::util::span::Pos;

/// Source of foreign package descriptions
pub trait GoImporter: Send + Sync {
    fn import(
        &self,
        path: &str,
    ) -> Result<GoPackage, ImportError>;
}

/// A foreign type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GoType {
    /// A basic type by name: `int`, `string`, `error`, `untyped int`...
    Basic { name: String },
    /// A named type, possibly of another package
    Named { pkg: String, name: String },
    Pointer { elem: Box<GoType> },
    Slice { elem: Box<GoType> },
    Array { len: i64, elem: Box<GoType> },
    Map { key: Box<GoType>, value: Box<GoType> },
    Chan {
        #[serde(default)]
        dir: GoChanDir,
        elem: Box<GoType>,
    },
    Func(GoSignature),
    Struct { fields: Vec<GoField> },
    Interface {
        #[serde(default)]
        methods: BTreeMap<String, GoSignature>,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoChanDir {
    #[default]
    Both,
    Send,
    Recv,
}

/// A function signature; a variadic function's last parameter is a slice
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoSignature {
    #[serde(default)]
    pub params: Vec<GoType>,
    #[serde(default)]
    pub results: Vec<GoType>,
    #[serde(default)]
    pub variadic: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoField {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: GoType,
    #[serde(default)]
    pub embedded: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoMethod {
    pub name: String,
    pub sig: GoSignature,
    #[serde(default)]
    pub pointer: bool,
}

/// A named type declared by the package
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoTypeDecl {
    pub name: String,
    pub underlying: GoType,
    #[serde(default)]
    pub methods: Vec<GoMethod>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoObjectKind {
    Var,
    Const,
    Func,
}

/// Value of a foreign constant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GoConst {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

/// A package-level variable, constant or function
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoObject {
    pub name: String,
    pub kind: GoObjectKind,
    #[serde(rename = "type")]
    pub ty: GoType,
    #[serde(default)]
    pub value: Option<GoConst>,
}

/// Description of a foreign package
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoPackage {
    pub path: String,
    pub name: String,
    #[serde(default)]
    pub types: Vec<GoTypeDecl>,
    #[serde(default)]
    pub objects: Vec<GoObject>,
}

/// In-memory importer a host populates up front
#[derive(Debug, Default)]
pub struct MapImporter {
    packages: RwLock<HashMap<String, GoPackage>>,
}

impl MapImporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &self,
        pkg: GoPackage,
    ) {
        self.packages.write().insert(pkg.path.clone(), pkg);
    }

    /// Load package descriptions from a JSON array
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let packages: Vec<GoPackage> = serde_json::from_str(json)?;
        let importer = Self::new();
        for pkg in packages {
            importer.insert(pkg);
        }
        Ok(importer)
    }

    /// Load package descriptions from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, ImportError> {
        let json = std::fs::read_to_string(path).map_err(|e| ImportError::Io(path.to_path_buf(), e))?;
        Self::from_json(&json).map_err(|e| ImportError::Foreign {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.packages.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.read().is_empty()
    }
}

impl GoImporter for MapImporter {
    fn import(
        &self,
        path: &str,
    ) -> Result<GoPackage, ImportError> {
        self.packages
            .read()
            .get(path)
            .cloned()
            .ok_or_else(|| ImportError::NotFound {
                path: path.to_string(),
                searched: vec!["foreign packages".to_string()],
            })
    }
}

/// Translate a foreign package description into a [`Package`]
pub(super) fn translate(
    desc: GoPackage,
    cache: &PackageCache,
) -> Result<Package, ImportError> {
    debug!("translating foreign package {} ({} types, {} objects)", desc.path, desc.types.len(), desc.objects.len());
    let tr = Translator {
        pkg: &desc.path,
        cache,
    };
    let mut pkg = Package::new(desc.path.clone(), desc.name.clone());

    // Allocate, then fill.
    let named: Vec<_> = desc.types.iter().map(|t| cache.foreign_named(&desc.path, &t.name)).collect();
    for (decl, named) in desc.types.iter().zip(&named) {
        named.set_underlying(tr.ty(&decl.underlying)?);
        named.methods.write().clear();
        for m in &decl.methods {
            named.add_method(Method {
                name: m.name.clone(),
                ty: tr.sig(&m.sig)?,
                pointer: m.pointer,
            });
        }
        let obj = Obj::type_name(decl.name.clone(), Type::Named(named.clone()), Pos::dummy());
        pkg.globals.insert(decl.name.clone(), obj);
    }

    for object in &desc.objects {
        let ty = tr.ty(&object.ty)?;
        let obj = match object.kind {
            GoObjectKind::Var | GoObjectKind::Func => Obj::var(object.name.clone(), ty, Pos::dummy()),
            GoObjectKind::Const => {
                let value = object.value.as_ref().map(|v| tr.constant(&object.name, v)).transpose()?;
                Obj::constant(object.name.clone(), ty, value, Pos::dummy())
            }
        };
        pkg.globals.insert(object.name.clone(), obj);
    }
    pkg.foreign = Some(Arc::new(desc));
    Ok(pkg)
}

struct Translator<'a> {
    pkg: &'a str,
    cache: &'a PackageCache,
}

impl Translator<'_> {
    fn error(
        &self,
        message: String,
    ) -> ImportError {
        ImportError::Foreign {
            path: self.pkg.to_string(),
            message,
        }
    }

    fn ty(
        &self,
        t: &GoType,
    ) -> Result<Type, ImportError> {
        let boxed = |t: &GoType| self.ty(t).map(Box::new);
        Ok(match t {
            GoType::Basic { name } => self.basic(name)?,
            GoType::Named { pkg, name } => {
                let pkg = if pkg.is_empty() { self.pkg } else { pkg.as_str() };
                Type::Named(self.cache.foreign_named(pkg, name))
            }
            GoType::Pointer { elem } => Type::Pointer(boxed(elem)?),
            GoType::Slice { elem } => Type::Slice(boxed(elem)?),
            GoType::Array { len, elem } => Type::Array {
                len: *len,
                elem: boxed(elem)?,
                ellipsis: false,
            },
            GoType::Map { key, value } => Type::Map(boxed(key)?, boxed(value)?),
            GoType::Chan { dir, elem } => {
                let dir = match dir {
                    GoChanDir::Both => ChanDir::Both,
                    GoChanDir::Send => ChanDir::Send,
                    GoChanDir::Recv => ChanDir::Recv,
                };
                Type::Chan(dir, boxed(elem)?)
            }
            GoType::Func(sig) => Type::func(self.sig(sig)?),
            GoType::Struct { fields } => {
                let fields = fields
                    .iter()
                    .map(|f| {
                        Ok(Field {
                            name: f.name.clone(),
                            ty: self.ty(&f.ty)?,
                            embedded: f.embedded,
                        })
                    })
                    .collect::<Result<_, ImportError>>()?;
                Type::Struct(Box::new(StructType {
                    fields,
                    ..StructType::default()
                }))
            }
            GoType::Interface { methods } => {
                let methods = methods
                    .iter()
                    .map(|(name, sig)| Ok((name.clone(), self.sig(sig)?)))
                    .collect::<Result<_, ImportError>>()?;
                Type::Interface(Box::new(InterfaceType {
                    methods,
                    embeds: Vec::new(),
                }))
            }
        })
    }

    fn sig(
        &self,
        sig: &GoSignature,
    ) -> Result<FuncType, ImportError> {
        let params = sig.params.iter().map(|p| self.ty(p)).collect::<Result<Vec<_>, _>>()?;
        let results = sig.results.iter().map(|r| self.ty(r)).collect::<Result<Vec<_>, _>>()?;
        if sig.variadic && !matches!(params.last(), Some(Type::Slice(_))) {
            return Err(self.error("variadic function must end in a slice parameter".to_string()));
        }
        Ok(if sig.variadic {
            FuncType::variadic(params, results)
        } else {
            FuncType::new(params, results)
        })
    }

    fn basic(
        &self,
        name: &str,
    ) -> Result<Type, ImportError> {
        let basic = match name {
            "error" => return Ok(error_type()),
            "untyped bool" => Basic::UntypedBool,
            "untyped int" => Basic::UntypedInteger,
            "untyped rune" => Basic::UntypedRune,
            "untyped float" => Basic::UntypedFloat,
            "untyped complex" => Basic::UntypedComplex,
            "untyped string" => Basic::UntypedString,
            "unsafe.Pointer" => Basic::UnsafePointer,
            // `num` is not a Go type
            "num" => return Err(self.error("unknown basic type num".to_string())),
            _ => Basic::from_name(name).ok_or_else(|| self.error(format!("unknown basic type {}", name)))?,
        };
        Ok(Type::Basic(basic))
    }

    fn constant(
        &self,
        name: &str,
        value: &GoConst,
    ) -> Result<ConstValue, ImportError> {
        Ok(match value {
            GoConst::Bool(b) => ConstValue::Bool(*b),
            GoConst::Int(i) => ConstValue::int(*i),
            GoConst::String(s) => ConstValue::String(s.clone()),
            GoConst::Float(f) => ConstValue::Float(
                BigRational::from_f64(*f).ok_or_else(|| self.error(format!("constant {} is not finite", name)))?,
            ),
        })
    }
}
