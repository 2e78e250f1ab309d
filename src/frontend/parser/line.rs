//! Line-at-a-time parsing for interactive use
//!
//! A [`LineParser`] buffers lines until they form complete statements. A
//! line holding only `$$` switches between statement mode and shell mode,
//! where each line is a shell command list.

use tracing::trace;

use super::ast::{ShellList, Stmt};
use super::state::ParserState;
use crate::frontend::lexer::{tokens::Token, Lexer, Scan};
use crate::util::diagnostic::Diagnostic;

/// What the parser is waiting for after a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineState {
    /// Statements were completed; ready for a new statement
    StmtComplete,
    /// Inside an unfinished statement
    StmtPartial,
    /// In shell mode, ready for a new command
    CmdShell,
    /// In shell mode, inside an unfinished command
    CmdShellPartial,
}

/// Result of feeding one line
#[derive(Debug, Clone)]
pub struct LineResult {
    pub stmts: Vec<Stmt>,
    pub cmds: Vec<ShellList>,
    pub errors: Vec<Diagnostic>,
    pub state: LineState,
}

/// Incremental parser over interactive input
#[derive(Debug)]
pub struct LineParser {
    filename: String,
    /// Lines of the unfinished statement or command
    pending: String,
    /// Line number of the first pending line
    first_line: u32,
    line: u32,
    shell: bool,
}

impl Default for LineParser {
    fn default() -> Self {
        Self::new("")
    }
}

impl LineParser {
    pub fn new(filename: &str) -> Self {
        Self {
            filename: filename.to_string(),
            pending: String::new(),
            first_line: 1,
            line: 0,
            shell: false,
        }
    }

    /// Check whether the parser is in shell mode
    pub fn in_shell(&self) -> bool {
        self.shell
    }

    /// Drop any buffered partial input
    pub fn reset(&mut self) {
        self.pending.clear();
    }

    /// Feed one line of input
    pub fn parse_line(
        &mut self,
        line: &str,
    ) -> LineResult {
        self.line += 1;
        let line = line.trim_end_matches(['\n', '\r']);
        if self.pending.is_empty() {
            self.first_line = self.line;
            if line.trim() == "$$" {
                self.shell = !self.shell;
                trace!(shell = self.shell, "toggled shell mode");
                return self.result(Vec::new(), Vec::new(), Vec::new(), false);
            }
        }
        self.pending.push_str(line);
        self.pending.push('\n');

        let Some((tokens, lex_errors)) = self.scan() else {
            return self.result(Vec::new(), Vec::new(), Vec::new(), true);
        };

        let mut state = ParserState::new(tokens);
        let (stmts, cmds) = if self.shell {
            (Vec::new(), state.parse_shell_lists())
        } else {
            (state.parse_stmt_list(), Vec::new())
        };
        if state.hit_eof() {
            return self.result(Vec::new(), Vec::new(), Vec::new(), true);
        }
        if !self.shell && !state.at_end() {
            state.error_expected("statement");
        }
        let mut errors = lex_errors;
        errors.extend(state.into_errors());
        self.pending.clear();
        self.result(stmts, cmds, errors, false)
    }

    /// Tokenize the pending input. `None` means a token, a shell block or a
    /// comment is still open at the end of the input.
    fn scan(&self) -> Option<(Vec<Token>, Vec<Diagnostic>)> {
        let mut lexer = Lexer::with_first_line(&self.filename, self.first_line);
        if self.shell {
            lexer.enter_shell();
        }
        lexer.feed(self.pending.as_bytes());
        let mut tokens = Vec::new();
        loop {
            match lexer.next_token() {
                Scan::Token(token) => tokens.push(token),
                Scan::NeedMore => break,
            }
        }
        if lexer.offset() < lexer.buffered() || (!self.shell && lexer.in_shell()) {
            return None;
        }
        Some((tokens, lexer.take_errors()))
    }

    fn result(
        &self,
        stmts: Vec<Stmt>,
        cmds: Vec<ShellList>,
        errors: Vec<Diagnostic>,
        partial: bool,
    ) -> LineResult {
        let state = match (self.shell, partial) {
            (false, false) => LineState::StmtComplete,
            (false, true) => LineState::StmtPartial,
            (true, false) => LineState::CmdShell,
            (true, true) => LineState::CmdShellPartial,
        };
        LineResult {
            stmts,
            cmds,
            errors,
            state,
        }
    }
}
