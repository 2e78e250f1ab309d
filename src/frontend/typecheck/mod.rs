//! Type checker
//!
//! The [`Checker`] walks statements in order, resolving every type name in
//! the tree, recording the type of every expression and the value of every
//! constant, and collecting [`Diagnostic`]s. It keeps its package scope
//! between calls, so an interactive driver can [`Checker::add`] one
//! statement at a time while a batch driver calls [`Checker::check`] on a
//! file.
//!
//! Expressions evaluate to a [`Partial`]: a mode, a type and, for
//! constants, a value. Untyped constants stay untyped until something
//! constrains them. An invalid partial short-circuits its parent without
//! further errors.
//!
//! # Module layout
//!
//! - [`scope`] - objects, scopes and free variable tracking
//! - [`universe`] - predeclared names
//! - [`methods`] - method sets, selectors and interface satisfaction
//! - `resolve` - type names to types
//! - `expr`, `literal`, `call`, `assign`, `stmt` - checking rules
//! - `specialize` - `num` specialization
//! - `import` - native and foreign imports

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, trace};

use crate::frontend::module::{GoImporter, MapImporter, Package, PackageCache};
use crate::frontend::parser::ast::{Expr, ExprId, File, Stmt};
use crate::frontend::types::constant::ConstValue;
use crate::frontend::types::Type;
use crate::util::config::CheckerConfig;
use crate::util::diagnostic::{Diagnostic, ErrorList};
use crate::util::span::Pos;

mod assign;
mod call;
pub mod errors;
mod expr;
mod import;
mod literal;
pub mod methods;
mod resolve;
pub mod scope;
mod specialize;
mod stmt;
pub mod universe;

#[cfg(test)]
mod tests;

pub use errors::TypeError;
pub use methods::{Memory, MethodSet, Selection};
pub use scope::{Obj, ObjKind, Scope, ScopeKind, ScopeStack};
pub use specialize::{specialize, specialize_func};

/// How an expression may be used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Failed to check; parents stay quiet
    Invalid,
    /// A call with no results
    Void,
    Const,
    Var,
    Builtin,
    TypeExpr,
    Func,
    /// Several values from one call, typed as a tuple
    Unpacked,
}

/// The result of checking an expression
#[derive(Debug, Clone)]
pub struct Partial {
    pub mode: Mode,
    pub ty: Type,
    pub val: Option<ConstValue>,
    pub expr: ExprId,
}

impl Partial {
    pub fn new(
        mode: Mode,
        ty: Type,
        expr: ExprId,
    ) -> Self {
        Self {
            mode,
            ty,
            val: None,
            expr,
        }
    }

    pub fn invalid(expr: ExprId) -> Self {
        Self::new(Mode::Invalid, Type::invalid(), expr)
    }

    pub fn constant(
        ty: Type,
        val: ConstValue,
        expr: ExprId,
    ) -> Self {
        Self {
            mode: Mode::Const,
            ty,
            val: Some(val),
            expr,
        }
    }

    pub fn is_invalid(&self) -> bool {
        self.mode == Mode::Invalid
    }

    /// Check whether the partial is a single value
    pub fn is_value(&self) -> bool {
        matches!(self.mode, Mode::Const | Mode::Var | Mode::Func)
    }
}

/// A `break`/`continue` target
#[derive(Debug, Clone)]
struct BranchTarget {
    label: Option<String>,
    is_loop: bool,
}

/// Per-function checking state
#[derive(Debug, Default)]
struct FuncContext {
    results: Vec<Type>,
    result_names: Vec<String>,
    /// Every label declared in the function body
    labels: Vec<String>,
    /// Labels already seen while checking
    declared_labels: Vec<String>,
    targets: Vec<BranchTarget>,
    /// Label of the statement about to be checked
    pending_label: Option<String>,
}

/// One step of the native import walk
#[derive(Debug, Clone)]
pub(crate) struct ImportStep {
    pub path: PathBuf,
    pub display: String,
}

/// Type checker for one package
pub struct Checker {
    /// Path of the package being checked, empty for the main package
    pkg_path: String,
    /// File being checked; relative imports resolve against its directory
    filename: String,
    scopes: ScopeStack,
    types: HashMap<ExprId, Type>,
    consts: HashMap<ExprId, ConstValue>,
    idents: HashMap<ExprId, Obj>,
    memory: Memory,
    errors: Vec<Diagnostic>,
    funcs: Vec<FuncContext>,
    /// Named types whose definition is being resolved
    defining: Vec<u64>,
    /// Set while checking the last statement of a non-final switch case
    fallthrough_ok: bool,
    cache: Arc<PackageCache>,
    importer: Arc<dyn GoImporter>,
    config: CheckerConfig,
    walk: Vec<ImportStep>,
}

impl Default for Checker {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Checker {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("Checker")
            .field("pkg_path", &self.pkg_path)
            .field("filename", &self.filename)
            .field("errors", &self.errors.len())
            .finish()
    }
}

impl Checker {
    /// Create a checker for a main package, with its own package cache and
    /// no foreign packages
    pub fn new() -> Self {
        Self {
            pkg_path: String::new(),
            filename: String::new(),
            scopes: ScopeStack::new(),
            types: HashMap::new(),
            consts: HashMap::new(),
            idents: HashMap::new(),
            memory: Memory::new(),
            errors: Vec::new(),
            funcs: vec![FuncContext::default()],
            defining: Vec::new(),
            fallthrough_ok: false,
            cache: Arc::new(PackageCache::new()),
            importer: Arc::new(MapImporter::new()),
            config: CheckerConfig::default(),
            walk: Vec::new(),
        }
    }

    /// Share a package cache with other checkers
    pub fn with_cache(
        mut self,
        cache: Arc<PackageCache>,
    ) -> Self {
        self.cache = cache;
        self
    }

    /// Use a host importer for non-native imports
    pub fn with_importer(
        mut self,
        importer: Arc<dyn GoImporter>,
    ) -> Self {
        self.importer = importer;
        self
    }

    pub fn with_config(
        mut self,
        config: CheckerConfig,
    ) -> Self {
        self.config = config;
        self
    }

    /// Checker for an imported native package
    fn for_import(
        &self,
        pkg_path: String,
        filename: String,
        walk: Vec<ImportStep>,
    ) -> Self {
        let mut checker = Checker::new()
            .with_cache(self.cache.clone())
            .with_importer(self.importer.clone())
            .with_config(self.config.clone());
        checker.pkg_path = pkg_path;
        checker.filename = filename;
        checker.walk = walk;
        checker
    }

    /// Check one top-level statement
    ///
    /// On error the package scope is left as it was before the call.
    pub fn add(
        &mut self,
        stmt: &mut Stmt,
    ) -> Result<(), ErrorList> {
        let before = self.errors.len();
        let declared = self.scopes.package().len();
        if let Some(ctx) = self.funcs.first_mut() {
            stmt::collect_labels(std::slice::from_ref(stmt), &mut ctx.labels);
        }
        trace!("checking statement at {}", stmt.pos);
        self.stmt(stmt);
        if self.errors.len() == before {
            return Ok(());
        }
        self.scopes.truncate_package(declared);
        self.funcs.truncate(1);
        Err(ErrorList::new(self.errors[before..].to_vec()))
    }

    /// Check every statement of a parsed file
    pub fn check_file(
        &mut self,
        file: &mut File,
    ) -> Result<(), ErrorList> {
        debug!("checking {} ({} statements)", file.filename, file.stmts.len());
        if self.filename.is_empty() {
            self.filename = file.filename.clone();
        }
        let before = self.errors.len();
        if let Some(ctx) = self.funcs.first_mut() {
            stmt::collect_labels(&file.stmts, &mut ctx.labels);
        }
        for stmt in &mut file.stmts {
            trace!("checking statement at {}", stmt.pos);
            self.stmt(stmt);
        }
        if self.errors.len() == before {
            debug!("checked {}", file.filename);
            Ok(())
        } else {
            debug!("{} errors in {}", self.errors.len() - before, file.filename);
            Err(ErrorList::new(self.errors[before..].to_vec()))
        }
    }

    /// Read, parse and check a source file
    pub fn check(
        &mut self,
        path: &Path,
    ) -> Result<File, ErrorList> {
        let filename = path.display().to_string();
        let source = std::fs::read_to_string(path).map_err(|e| {
            ErrorList::new(vec![Diagnostic::importer(
                Pos::new(Arc::from(filename.as_str()), 0, 0),
                format!("cannot read {}: {}", filename, e),
            )])
        })?;
        if self.walk.is_empty() {
            let canonical = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
            self.walk.push(ImportStep {
                display: crate::frontend::module::resolver::display_name(&canonical),
                path: canonical,
            });
        }
        self.filename = filename.clone();
        let (mut file, parse_errors) = crate::frontend::parser::parse(&filename, &source);
        if !parse_errors.is_empty() {
            return Err(ErrorList::new(parse_errors));
        }
        self.check_file(&mut file)?;
        Ok(file)
    }

    /// Recorded type of a checked expression
    pub fn type_of(
        &self,
        e: &Expr,
    ) -> Option<&Type> {
        self.types.get(&e.id)
    }

    /// Value of a checked constant expression
    pub fn const_value(
        &self,
        e: &Expr,
    ) -> Option<&ConstValue> {
        self.consts.get(&e.id)
    }

    /// The object an identifier expression refers to
    pub fn ident(
        &self,
        e: &Expr,
    ) -> Option<&Obj> {
        self.idents.get(&e.id)
    }

    /// The package imported under a local name
    pub fn pkg(
        &self,
        name: &str,
    ) -> Option<Arc<Package>> {
        match self.scopes.lookup(name) {
            Some(obj) if obj.kind == ObjKind::Pkg => match &obj.ty {
                Type::Package(p) => self.cache.get(&p.path),
                _ => None,
            },
            _ => None,
        }
    }

    /// Look a name up in the open scopes and the universe
    pub fn lookup(
        &self,
        name: &str,
    ) -> Option<&Obj> {
        self.scopes.lookup(name)
    }

    /// Names starting with `prefix`, sorted, for completion
    ///
    /// A prefix `pkg.X` completes exported members of an imported package.
    pub fn types_with_prefix(
        &self,
        prefix: &str,
    ) -> Vec<String> {
        let mut names: Vec<String> = match prefix.split_once('.') {
            Some((pkg_name, member)) => match self.pkg(pkg_name) {
                Some(pkg) => pkg
                    .globals
                    .keys()
                    .filter(|name| name.starts_with(member))
                    .map(|name| format!("{}.{}", pkg_name, name))
                    .collect(),
                None => Vec::new(),
            },
            None => self
                .scopes
                .visible_names()
                .into_iter()
                .filter(|name| name.starts_with(prefix))
                .collect(),
        };
        names.sort();
        names
    }

    /// Every diagnostic recorded so far
    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    /// Objects of the package scope, in declaration order
    pub fn globals(&self) -> impl Iterator<Item = &Obj> {
        self.scopes.package().objs()
    }

    pub fn pkg_path(&self) -> &str {
        &self.pkg_path
    }

    fn error(
        &mut self,
        pos: &Pos,
        err: TypeError,
    ) {
        trace!("type error at {}: {}", pos, err);
        self.errors.push(err.at(pos.clone()));
    }

    fn declare(
        &mut self,
        obj: Obj,
    ) {
        let pos = obj.decl.clone();
        if let Err(err) = self.scopes.declare(obj) {
            self.error(&pos, err);
        }
    }

    /// Record the checked type and value of an expression
    fn record(
        &mut self,
        p: &Partial,
    ) {
        if p.is_invalid() {
            return;
        }
        self.types.insert(p.expr, p.ty.clone());
        match &p.val {
            Some(val) => {
                self.consts.insert(p.expr, val.clone());
            }
            None => {
                self.consts.remove(&p.expr);
            }
        }
    }

    fn func_ctx(&mut self) -> &mut FuncContext {
        if self.funcs.is_empty() {
            self.funcs.push(FuncContext::default());
        }
        let last = self.funcs.len() - 1;
        &mut self.funcs[last]
    }
}
