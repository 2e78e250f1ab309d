//! Packages and the import cache
//!
//! An import names either a native source file (`"lib/math.ng"`) or a
//! foreign package described by the host through a [`GoImporter`]. Both
//! end up as a [`Package`]: a path, a package type and its exported
//! objects in declaration order.
//!
//! # Module layout
//!
//! - [`cache`] - the shared [`PackageCache`]
//! - [`resolver`] - native import paths to files
//! - [`gotypes`] - the foreign package model, [`GoImporter`] and its
//!   translation into checker types

pub mod cache;
pub mod gotypes;
pub mod resolver;

use std::path::PathBuf;
use std::sync::Arc;

use indexmap::IndexMap;
use thiserror::Error;

use crate::frontend::typecheck::Obj;
use crate::frontend::types::{PackageType, Type};
use crate::util::diagnostic::ErrorList;

pub use cache::{CacheStats, PackageCache};
pub use gotypes::{GoImporter, GoPackage, MapImporter};
pub use resolver::NativeResolver;

/// A checked native package or a translated foreign one
#[derive(Debug, Clone)]
pub struct Package {
    /// Resolved path; the cache key
    pub path: String,
    /// Name the package is referred to by
    pub name: String,
    /// The `Type::Package` of the package name
    pub ty: Type,
    /// Exported objects in declaration order
    pub globals: IndexMap<String, Obj>,
    /// Host description of a foreign package
    pub foreign: Option<Arc<GoPackage>>,
}

impl Package {
    pub fn new(
        path: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        let (path, name) = (path.into(), name.into());
        Self {
            ty: Type::Package(Arc::new(PackageType {
                path: path.clone(),
                name: name.clone(),
            })),
            path,
            name,
            globals: IndexMap::new(),
            foreign: None,
        }
    }

    pub fn member(
        &self,
        name: &str,
    ) -> Option<&Obj> {
        self.globals.get(name)
    }

    pub fn is_foreign(&self) -> bool {
        self.foreign.is_some()
    }
}

/// Import failures
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("cannot find package {path} (searched {})", .searched.join(", "))]
    NotFound { path: String, searched: Vec<String> },

    #[error("cannot read {}: {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("package import cycle: {0}")]
    Cycle(String),

    #[error("errors in imported package {path}: {errors}")]
    Check { path: String, errors: ErrorList },

    #[error("foreign package {path}: {message}")]
    Foreign { path: String, message: String },
}

#[cfg(test)]
mod tests;
