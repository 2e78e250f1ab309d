//! Shell expression parsing
//!
//! ```text
//! List      := AndOr ((';' | '&') AndOr)*
//! AndOr     := Pipeline (('&&' | '||') Pipeline)*
//! Pipeline  := ['!'] Cmd ('|' Cmd)*
//! Cmd       := '(' List ')' | SimpleCmd
//! SimpleCmd := (Assign | Redirect | Word)*
//! ```

use super::ast::*;
use super::state::ParserState;
use crate::frontend::lexer::tokens::TokenKind;

impl ParserState {
    /// `$$ lists $$`
    pub fn parse_shell_expr(&mut self) -> Expr {
        let pos = self.pos();
        self.bump();
        let cmds = self.parse_shell_lists();
        self.expect(TokenKind::Shell);
        Expr::new(
            pos,
            ExprKind::Shell(Box::new(ShellExpr {
                cmds,
                trap_out: true,
                elide_error: false,
            })),
        )
    }

    /// Lists separated by newlines, up to a closing `$$` or EOF
    pub fn parse_shell_lists(&mut self) -> Vec<ShellList> {
        let mut lists = Vec::new();
        loop {
            while self.skip(TokenKind::ShellNewline) {}
            if matches!(self.kind(), TokenKind::Shell | TokenKind::Eof) {
                return lists;
            }
            lists.push(self.parse_shell_list());
            if !matches!(
                self.kind(),
                TokenKind::ShellNewline | TokenKind::Shell | TokenKind::Eof
            ) {
                self.error_expected("newline or $$");
                self.bump();
            }
        }
    }

    fn parse_shell_list(&mut self) -> ShellList {
        let pos = self.pos();
        let mut and_or = Vec::new();
        loop {
            let mut item = self.parse_and_or();
            let more = match self.kind() {
                TokenKind::Semicolon => {
                    self.bump();
                    true
                }
                TokenKind::Ref => {
                    self.bump();
                    item.background = true;
                    true
                }
                _ => false,
            };
            and_or.push(item);
            if !more || self.at_list_close() {
                return ShellList { pos, and_or };
            }
        }
    }

    fn at_list_close(&self) -> bool {
        matches!(
            self.kind(),
            TokenKind::ShellNewline | TokenKind::Shell | TokenKind::Eof | TokenKind::RightParen
        )
    }

    fn parse_and_or(&mut self) -> ShellAndOr {
        let pos = self.pos();
        let mut pipelines = vec![self.parse_pipeline()];
        let mut seps = Vec::new();
        while matches!(self.kind(), TokenKind::LogicalAnd | TokenKind::LogicalOr) {
            seps.push(self.bump().kind);
            while self.skip(TokenKind::ShellNewline) {}
            pipelines.push(self.parse_pipeline());
        }
        ShellAndOr {
            pos,
            pipelines,
            seps,
            background: false,
        }
    }

    fn parse_pipeline(&mut self) -> ShellPipeline {
        let pos = self.pos();
        let bang = self.skip(TokenKind::Not);
        let mut cmds = vec![self.parse_shell_cmd()];
        while self.skip(TokenKind::ShellPipe) {
            while self.skip(TokenKind::ShellNewline) {}
            cmds.push(self.parse_shell_cmd());
        }
        ShellPipeline { pos, bang, cmds }
    }

    fn parse_shell_cmd(&mut self) -> ShellCmd {
        let pos = self.pos();
        if self.skip(TokenKind::LeftParen) {
            while self.skip(TokenKind::ShellNewline) {}
            let list = self.parse_shell_list();
            while self.skip(TokenKind::ShellNewline) {}
            self.expect(TokenKind::RightParen);
            return ShellCmd::Subshell(pos, list);
        }
        ShellCmd::Simple(self.parse_simple_cmd())
    }

    fn parse_simple_cmd(&mut self) -> ShellSimpleCmd {
        let mut cmd = ShellSimpleCmd {
            pos: self.pos(),
            assigns: Vec::new(),
            redirects: Vec::new(),
            args: Vec::new(),
        };
        loop {
            match self.kind() {
                TokenKind::ShellWord => {
                    let token = self.bump();
                    let word = token.ident().unwrap_or_default().to_string();
                    // `2>&1`: digits written flush against a redirect
                    let adjacent = self
                        .peek(0)
                        .is_some_and(|next| is_redirect(next.kind) && next.start == token.end);
                    if adjacent && !word.is_empty() && word.bytes().all(|b| b.is_ascii_digit()) {
                        let number = word.parse().ok();
                        self.parse_redirect(&mut cmd, number);
                        continue;
                    }
                    match split_assign(&word) {
                        Some(assign) if cmd.args.is_empty() => cmd.assigns.push(assign),
                        _ => cmd.args.push(word),
                    }
                }
                kind if is_redirect(kind) => self.parse_redirect(&mut cmd, None),
                _ => break,
            }
        }
        if cmd.args.is_empty() && cmd.assigns.is_empty() && cmd.redirects.is_empty() {
            self.error_expected("shell command");
        }
        cmd
    }

    fn parse_redirect(
        &mut self,
        cmd: &mut ShellSimpleCmd,
        number: Option<u32>,
    ) {
        let token = self.bump().kind;
        let filename = if self.at(TokenKind::ShellWord) {
            self.bump().ident().unwrap_or_default().to_string()
        } else {
            self.error_expected("redirect target");
            String::new()
        };
        cmd.redirects.push(ShellRedirect {
            number,
            token,
            filename,
        });
    }
}

fn is_redirect(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Less
            | TokenKind::Greater
            | TokenKind::TwoGreater
            | TokenKind::GreaterAnd
            | TokenKind::AndGreater
    )
}

/// `KEY=value`, where KEY is a shell variable name
fn split_assign(word: &str) -> Option<ShellAssign> {
    let (key, value) = word.split_once('=')?;
    let mut chars = key.chars();
    let first = chars.next()?;
    if !(first == '_' || first.is_ascii_alphabetic()) {
        return None;
    }
    if !chars.all(|c| c == '_' || c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ShellAssign {
        key: key.to_string(),
        value: value.to_string(),
    })
}
