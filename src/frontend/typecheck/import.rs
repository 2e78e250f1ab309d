//! Imports
//!
//! A path with a native extension is parsed and checked by a nested
//! checker that shares this checker's package cache and extends its import
//! walk; the walk is what detects cycles. Any other path goes to the host's
//! foreign importer.

use std::sync::Arc;

use tracing::debug;

use crate::frontend::module::resolver::{display_name, package_name};
use crate::frontend::module::{ImportError, NativeResolver, Package};
use crate::frontend::parser::ast::Import;
use crate::frontend::types::Type;
use crate::util::diagnostic::{Diagnostic, ErrorList};
use crate::util::span::Pos;

use super::errors::TypeError;
use super::scope::{Obj, ObjKind};
use super::{Checker, ImportStep};

impl Checker {
    pub(super) fn import_stmt(
        &mut self,
        imp: &Import,
    ) {
        let result = if self.config.is_native_import(&imp.path) {
            self.import_native(&imp.path)
        } else {
            debug!("importing foreign package {}", imp.path);
            self.cache.foreign(&imp.path, &*self.importer)
        };
        let pkg = match result {
            Ok(pkg) => pkg,
            Err(err) => {
                self.errors.push(Diagnostic::importer(imp.pos.clone(), err.to_string()));
                return;
            }
        };
        let name = imp.name.clone().unwrap_or_else(|| pkg.name.clone());
        if name == "_" {
            return;
        }
        self.declare(Obj::new(name, ObjKind::Pkg, pkg.ty.clone(), imp.pos.clone()));
    }

    fn import_native(
        &mut self,
        import_path: &str,
    ) -> Result<Arc<Package>, ImportError> {
        let resolver = NativeResolver::new(&self.filename, self.config.search_paths.clone());
        let path = resolver.resolve(import_path)?;
        let display = display_name(&path);

        if let Some(start) = self.walk.iter().position(|step| step.path == path) {
            let mut chain: Vec<&str> = self.walk[start..].iter().map(|s| s.display.as_str()).collect();
            chain.push(&display);
            return Err(ImportError::Cycle(chain.join(" -> ")));
        }

        let key = path.display().to_string();
        if let Some(pkg) = self.cache.get_native(&key) {
            return Ok(pkg);
        }

        debug!("importing native package {}", key);
        let source = std::fs::read_to_string(&path).map_err(|e| ImportError::Io(path.clone(), e))?;
        let (mut file, parse_errors) = crate::frontend::parser::parse(&key, &source);
        if !parse_errors.is_empty() {
            return Err(ImportError::Check {
                path: display,
                errors: ErrorList::new(parse_errors),
            });
        }

        let mut walk = self.walk.clone();
        walk.push(ImportStep {
            path: path.clone(),
            display: display.clone(),
        });
        let mut checker = self.for_import(key.clone(), key.clone(), walk);
        checker.check_file(&mut file).map_err(|errors| ImportError::Check {
            path: display,
            errors,
        })?;

        let mut pkg = Package::new(key, package_name(&path));
        pkg.globals = checker
            .globals()
            .filter(|obj| obj.is_exported())
            .map(|obj| (obj.name.clone(), obj.clone()))
            .collect();
        Ok(self.cache.insert_native(pkg))
    }

    /// Exported member `name` of the package imported as `pkg`
    pub(super) fn package_member(
        &mut self,
        pkg: &str,
        name: &str,
        pos: &Pos,
    ) -> Option<Obj> {
        let path = match self.scopes.lookup_rec(pkg) {
            Some(Obj {
                kind: ObjKind::Pkg,
                ty: Type::Package(p),
                ..
            }) => p.path.clone(),
            _ => {
                self.error(pos, TypeError::NotPackage(pkg.to_string()));
                return None;
            }
        };
        let undefined = || TypeError::UndefinedMember {
            pkg: pkg.to_string(),
            name: name.to_string(),
        };
        let Some(package) = self.cache.get(&path) else {
            self.error(pos, undefined());
            return None;
        };
        if !name.chars().next().is_some_and(char::is_uppercase) {
            self.error(pos, TypeError::Unexported(format!("{}.{}", pkg, name)));
            return None;
        }
        match package.member(name) {
            Some(obj) => Some(obj.clone()),
            None => {
                self.error(pos, undefined());
                None
            }
        }
    }
}
