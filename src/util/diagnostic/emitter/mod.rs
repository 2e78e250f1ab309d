//! Diagnostic output

pub mod json;
pub mod text;

pub use json::JsonEmitter;
pub use text::{EmitterConfig, TextEmitter};

use super::Diagnostic;

/// Renders a batch of diagnostics
pub trait DiagnosticEmitter {
    fn emit(
        &self,
        diagnostics: &[Diagnostic],
    ) -> String;
}
