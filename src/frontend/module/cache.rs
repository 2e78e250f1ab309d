//! Package cache
//!
//! Shared by every checker that imports through it, so an interactive
//! session and a batch check see the same packages. Keys are resolved
//! paths: the canonical file path for native packages, the import path for
//! foreign ones.
//!
//! A native package is only inserted once it checked cleanly; a failed or
//! cyclic import leaves nothing behind. Foreign named types are kept in
//! their own table, keyed `path.Name`, so two packages that mention the
//! same foreign type share one [`NamedRef`].
//!
//! Thread-safe: `parking_lot::RwLock` allows concurrent reads.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, trace};

use super::gotypes::{self, GoImporter};
use super::{ImportError, Package};
use crate::frontend::types::{NamedRef, NamedType, Type};

/// Cache statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    /// Packages currently cached
    pub entries: usize,
}

impl CacheStats {
    /// Hit rate (percentage)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            (self.hits as f64 / total as f64) * 100.0
        }
    }
}

/// Packages by resolved path
#[derive(Debug, Default)]
pub struct PackageCache {
    native: RwLock<HashMap<String, Arc<Package>>>,
    foreign: RwLock<HashMap<String, Arc<Package>>>,
    /// Foreign named types by `path.Name`
    named: RwLock<HashMap<String, NamedRef>>,
    stats: RwLock<CacheStats>,
}

impl PackageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Any cached package, native or foreign
    pub fn get(
        &self,
        path: &str,
    ) -> Option<Arc<Package>> {
        if let Some(pkg) = self.native.read().get(path) {
            return Some(pkg.clone());
        }
        self.foreign.read().get(path).cloned()
    }

    /// A checked native package, counting the lookup
    pub fn get_native(
        &self,
        path: &str,
    ) -> Option<Arc<Package>> {
        let found = self.native.read().get(path).cloned();
        let mut stats = self.stats.write();
        if found.is_some() {
            stats.hits += 1;
            trace!("package cache hit: {}", path);
        } else {
            stats.misses += 1;
            trace!("package cache miss: {}", path);
        }
        found
    }

    pub fn insert_native(
        &self,
        pkg: Package,
    ) -> Arc<Package> {
        let pkg = Arc::new(pkg);
        self.native.write().insert(pkg.path.clone(), pkg.clone());
        self.stats.write().entries += 1;
        debug!("cached native package {}", pkg.path);
        pkg
    }

    /// A foreign package, fetched from `importer` and translated on first
    /// use
    pub fn foreign(
        &self,
        path: &str,
        importer: &dyn GoImporter,
    ) -> Result<Arc<Package>, ImportError> {
        if let Some(pkg) = self.foreign.read().get(path).cloned() {
            self.stats.write().hits += 1;
            trace!("package cache hit: {}", path);
            return Ok(pkg);
        }
        self.stats.write().misses += 1;
        trace!("package cache miss: {}", path);

        let desc = importer.import(path)?;
        let known: HashSet<String> = self.named.read().keys().cloned().collect();
        let pkg = match gotypes::translate(desc, self) {
            Ok(pkg) => Arc::new(pkg),
            Err(err) => {
                self.discard_named(path, &known);
                return Err(err);
            }
        };
        let mut foreign = self.foreign.write();
        // Another driver may have translated it meanwhile; keep the first.
        let pkg = foreign.entry(path.to_string()).or_insert(pkg).clone();
        drop(foreign);
        self.stats.write().entries = self.len();
        Ok(pkg)
    }

    /// The shared handle for a foreign named type, allocated empty if the
    /// type has not been seen yet
    pub fn foreign_named(
        &self,
        pkg_path: &str,
        name: &str,
    ) -> NamedRef {
        let key = format!("{}.{}", pkg_path, name);
        if let Some(named) = self.named.read().get(&key) {
            return named.clone();
        }
        self.named
            .write()
            .entry(key)
            .or_insert_with(|| NamedType::new(name, pkg_path))
            .clone()
    }

    /// Undo a failed translation of `path`: types first seen during it are
    /// dropped, and types of `path` allocated earlier are emptied again
    fn discard_named(
        &self,
        path: &str,
        known: &HashSet<String>,
    ) {
        let prefix = format!("{}.", path);
        let mut named = self.named.write();
        named.retain(|key, _| known.contains(key));
        for (key, ty) in named.iter() {
            if key.starts_with(&prefix) {
                ty.set_underlying(Type::invalid());
                ty.methods.write().clear();
            }
        }
        debug!("discarded foreign types of {}", path);
    }

    /// Number of foreign named types allocated so far
    pub fn named_len(&self) -> usize {
        self.named.read().len()
    }

    /// Number of cached packages
    pub fn len(&self) -> usize {
        self.native.read().len() + self.foreign.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        self.stats.read().clone()
    }

    /// Drop every cached package and foreign type
    pub fn clear(&self) {
        self.native.write().clear();
        self.foreign.write().clear();
        self.named.write().clear();
        *self.stats.write() = CacheStats::default();
    }
}
