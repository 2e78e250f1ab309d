//! Unified diagnostics
//!
//! Every phase of the front end reports problems as a [`Diagnostic`]:
//! a phase tag, a source position and a rendered message. A batch of
//! diagnostics travels back to callers as one [`ErrorList`], whose first
//! entry is the canonical error for the batch.
//!
//! # Module layout
//!
//! - [`emitter`] - text and JSON renderers used by the CLI

pub mod emitter;

use crate::util::span::Pos;
use serde::Serialize;
use std::fmt;

pub use emitter::{DiagnosticEmitter, EmitterConfig, JsonEmitter, TextEmitter};

/// Front end phase that produced a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Parser,
    Typecheck,
    Importer,
}

impl fmt::Display for Phase {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Phase::Parser => write!(f, "parser"),
            Phase::Typecheck => write!(f, "typecheck"),
            Phase::Importer => write!(f, "importer"),
        }
    }
}

/// A single positioned message
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{pos}: {message}")]
pub struct Diagnostic {
    pub phase: Phase,
    pub pos: Pos,
    pub message: String,
}

impl Diagnostic {
    /// Create a new diagnostic
    pub fn new(
        phase: Phase,
        pos: Pos,
        message: impl Into<String>,
    ) -> Self {
        Self {
            phase,
            pos,
            message: message.into(),
        }
    }

    /// Create a parser diagnostic
    pub fn parser(
        pos: Pos,
        message: impl Into<String>,
    ) -> Self {
        Self::new(Phase::Parser, pos, message)
    }

    /// Create a type checker diagnostic
    pub fn typecheck(
        pos: Pos,
        message: impl Into<String>,
    ) -> Self {
        Self::new(Phase::Typecheck, pos, message)
    }

    /// Create an importer diagnostic
    pub fn importer(
        pos: Pos,
        message: impl Into<String>,
    ) -> Self {
        Self::new(Phase::Importer, pos, message)
    }
}

/// Aggregate error for a batch of diagnostics
///
/// Displays the first diagnostic, followed by a count of the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorList {
    pub diagnostics: Vec<Diagnostic>,
}

impl ErrorList {
    /// Create an aggregate from a list of diagnostics
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }

    /// The canonical (first) diagnostic
    pub fn first(&self) -> Option<&Diagnostic> {
        self.diagnostics.first()
    }

    /// Number of diagnostics in the batch
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Check if the batch is empty
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Diagnostics of one phase, in source order
    pub fn phase(
        &self,
        phase: Phase,
    ) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.phase == phase)
    }

    /// `Ok(())` for an empty batch, otherwise the batch as an error
    pub fn into_result(self) -> Result<(), ErrorList> {
        if self.diagnostics.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ErrorList {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self.diagnostics.split_first() {
            None => write!(f, "no errors"),
            Some((first, [])) => write!(f, "{}", first),
            Some((first, rest)) => write!(f, "{} (and {} more errors)", first, rest.len()),
        }
    }
}

impl std::error::Error for ErrorList {}

impl From<Vec<Diagnostic>> for ErrorList {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        Self::new(diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn pos(line: u32) -> Pos {
        Pos::new(Arc::from("t.ng"), line, 1)
    }

    #[test]
    fn test_error_list_display_first() {
        let list = ErrorList::new(vec![
            Diagnostic::typecheck(pos(1), "undeclared identifier: x"),
            Diagnostic::typecheck(pos(2), "undeclared identifier: y"),
        ]);
        assert_eq!(
            list.to_string(),
            "t.ng:1:1: undeclared identifier: x (and 1 more errors)"
        );
        assert_eq!(list.first().map(|d| d.pos.line), Some(1));
    }

    #[test]
    fn test_error_list_phase_filter() {
        let list = ErrorList::new(vec![
            Diagnostic::parser(pos(1), "syntax error"),
            Diagnostic::typecheck(pos(2), "mismatch"),
        ]);
        assert_eq!(list.phase(Phase::Parser).count(), 1);
        assert_eq!(list.phase(Phase::Importer).count(), 0);
        assert!(ErrorList::default().into_result().is_ok());
    }
}
