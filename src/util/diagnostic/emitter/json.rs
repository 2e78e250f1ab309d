//! JSON renderer
//!
//! One object per diagnostic, suitable for editors and scripts.

use serde::Serialize;

use super::DiagnosticEmitter;
use crate::util::diagnostic::{Diagnostic, Phase};

/// Serialized form of a diagnostic
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonDiagnostic<'a> {
    pub phase: Phase,
    pub file: &'a str,
    pub line: u32,
    pub column: u16,
    pub message: &'a str,
}

impl<'a> From<&'a Diagnostic> for JsonDiagnostic<'a> {
    fn from(d: &'a Diagnostic) -> Self {
        Self {
            phase: d.phase,
            file: &d.pos.filename,
            line: d.pos.line,
            column: d.pos.column,
            message: &d.message,
        }
    }
}

/// JSON renderer
#[derive(Debug, Clone, Default)]
pub struct JsonEmitter {
    pretty: bool,
}

impl JsonEmitter {
    /// Create a new compact renderer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a pretty-printing renderer
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl DiagnosticEmitter for JsonEmitter {
    fn emit(
        &self,
        diagnostics: &[Diagnostic],
    ) -> String {
        let items: Vec<JsonDiagnostic<'_>> = diagnostics.iter().map(JsonDiagnostic::from).collect();
        let rendered = if self.pretty {
            serde_json::to_string_pretty(&items)
        } else {
            serde_json::to_string(&items)
        };
        rendered.unwrap_or_else(|e| format!("{{\"error\":\"{}\"}}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::span::Pos;
    use std::sync::Arc;

    #[test]
    fn test_json_fields() {
        let diag = Diagnostic::parser(Pos::new(Arc::from("a.ng"), 1, 5), "expected ')'");
        let out = JsonEmitter::new().emit(&[diag]);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["phase"], "parser");
        assert_eq!(value[0]["line"], 1);
        assert_eq!(value[0]["column"], 5);
        assert_eq!(value[0]["message"], "expected ')'");
    }
}
