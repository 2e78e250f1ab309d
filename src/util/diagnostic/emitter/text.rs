//! Plain text renderer

use owo_colors::OwoColorize;

use super::DiagnosticEmitter;
use crate::util::diagnostic::Diagnostic;

/// Renderer configuration
#[derive(Debug, Clone)]
pub struct EmitterConfig {
    /// Enable colored output
    pub use_colors: bool,
    /// Show the offending source line under the message
    pub show_source: bool,
    /// Indicator character under the column
    pub indicator: char,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            use_colors: false,
            show_source: true,
            indicator: '^',
        }
    }
}

/// Text renderer: `file:line:col: phase error: message`
#[derive(Debug, Clone, Default)]
pub struct TextEmitter {
    config: EmitterConfig,
    source: Option<String>,
}

impl TextEmitter {
    /// Create a new text renderer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a renderer with a custom configuration
    pub fn with_config(config: EmitterConfig) -> Self {
        Self {
            config,
            source: None,
        }
    }

    /// Attach the source text used for snippets
    pub fn with_source(
        mut self,
        source: impl Into<String>,
    ) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Render a single diagnostic
    pub fn render(
        &self,
        diagnostic: &Diagnostic,
    ) -> String {
        let mut output = String::new();
        let header = format!("{} error", diagnostic.phase);
        if self.config.use_colors {
            output.push_str(&format!(
                "{}: {}: {}\n",
                diagnostic.pos.bold(),
                header.red().bold(),
                diagnostic.message
            ));
        } else {
            output.push_str(&format!(
                "{}: {}: {}\n",
                diagnostic.pos, header, diagnostic.message
            ));
        }

        if self.config.show_source {
            if let Some(snippet) = self.render_source_snippet(diagnostic) {
                output.push_str(&snippet);
            }
        }
        output
    }

    fn render_source_snippet(
        &self,
        diagnostic: &Diagnostic,
    ) -> Option<String> {
        if diagnostic.pos.is_dummy() {
            return None;
        }
        let source = self.source.as_ref()?;
        let line = source.lines().nth(diagnostic.pos.line as usize - 1)?;
        let pad = " ".repeat((diagnostic.pos.column as usize).saturating_sub(1));
        Some(format!(
            "    {}\n    {}{}\n",
            line, pad, self.config.indicator
        ))
    }
}

impl DiagnosticEmitter for TextEmitter {
    fn emit(
        &self,
        diagnostics: &[Diagnostic],
    ) -> String {
        diagnostics.iter().map(|d| self.render(d)).collect()
    }
}
