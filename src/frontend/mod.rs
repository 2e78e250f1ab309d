//! Frontend pipeline
//!
//! Source text goes through the lexer and parser into a syntax tree, which
//! the type checker annotates in place. [`Compiler`] strings the phases
//! together for batch use; interactive drivers use [`parser::LineParser`]
//! and [`typecheck::Checker::add`] directly.

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::util::config::CheckerConfig;
use crate::util::diagnostic::{ErrorList, Phase};

pub mod lexer;
pub mod module;
pub mod parser;
pub mod typecheck;
pub mod types;

use module::{GoImporter, PackageCache};
use parser::ast::File;
use typecheck::Checker;

/// Batch front end: parse and check whole files
#[derive(Debug, Default)]
pub struct Compiler {
    checker: Checker,
}

impl Compiler {
    /// Create a new compiler
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(
        mut self,
        config: CheckerConfig,
    ) -> Self {
        self.checker = std::mem::take(&mut self.checker).with_config(config);
        self
    }

    /// Resolve non-native imports through a host importer
    pub fn with_importer(
        mut self,
        importer: Arc<dyn GoImporter>,
    ) -> Self {
        self.checker = std::mem::take(&mut self.checker).with_importer(importer);
        self
    }

    /// Share imported packages with other compilers or checkers
    pub fn with_cache(
        mut self,
        cache: Arc<PackageCache>,
    ) -> Self {
        self.checker = std::mem::take(&mut self.checker).with_cache(cache);
        self
    }

    /// Parse and check source text
    pub fn check_source(
        &mut self,
        filename: &str,
        source: &str,
    ) -> Result<File, CompileError> {
        debug!("compiling {} ({} bytes)", filename, source.len());
        let (mut file, errors) = parser::parse(filename, source);
        if !errors.is_empty() {
            return Err(CompileError::Parse(ErrorList::new(errors)));
        }
        self.checker.check_file(&mut file).map_err(CompileError::Check)?;
        Ok(file)
    }

    /// Read, parse and check a source file
    pub fn check_file(
        &mut self,
        path: &Path,
    ) -> Result<File, CompileError> {
        debug!("compiling {}", path.display());
        self.checker.check(path).map_err(CompileError::from_errors)
    }

    /// The checker, with the types and constants recorded so far
    pub fn checker(&self) -> &Checker {
        &self.checker
    }
}

/// Compilation errors, one batch per failing phase
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("{0}")]
    Parse(ErrorList),

    #[error("{0}")]
    Check(ErrorList),
}

impl CompileError {
    /// Classify a batch by the phase of its canonical diagnostic
    fn from_errors(errors: ErrorList) -> Self {
        match errors.first().map(|d| d.phase) {
            Some(Phase::Parser) => CompileError::Parse(errors),
            _ => CompileError::Check(errors),
        }
    }

    pub fn errors(&self) -> &ErrorList {
        match self {
            CompileError::Parse(errors) | CompileError::Check(errors) => errors,
        }
    }
}
