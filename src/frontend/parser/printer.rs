//! Debug printer
//!
//! Renders syntax trees back to source. The output parses to the same
//! tree, modulo positions; it does not preserve the original layout or
//! comments.

use std::fmt;

use super::ast::*;
use crate::frontend::lexer::tokens::{Literal, TokenKind};
use crate::frontend::types::{FuncType, Type};

/// Render a whole file
pub fn print_file(file: &File) -> String {
    let mut p = Printer::default();
    if let Some(package) = &file.package {
        p.out.push_str("package ");
        p.out.push_str(package);
        p.out.push_str("\n\n");
    }
    for stmt in &file.stmts {
        p.stmt(stmt);
        p.out.push('\n');
    }
    p.out
}

impl fmt::Display for Expr {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let mut p = Printer::default();
        p.expr(self);
        f.write_str(&p.out)
    }
}

impl fmt::Display for Stmt {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let mut p = Printer::default();
        p.stmt(self);
        f.write_str(&p.out)
    }
}

#[derive(Default)]
struct Printer {
    out: String,
    indent: usize,
}

impl Printer {
    fn push(
        &mut self,
        s: &str,
    ) {
        self.out.push_str(s);
    }

    fn newline(&mut self) {
        self.out.push('\n');
        for _ in 0..self.indent {
            self.out.push('\t');
        }
    }

    fn list(
        &mut self,
        exprs: &[Expr],
    ) {
        for (i, e) in exprs.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            self.expr(e);
        }
    }

    fn expr(
        &mut self,
        e: &Expr,
    ) {
        match &e.kind {
            ExprKind::Bad(_) => self.push("BAD"),
            ExprKind::Binary { op, left, right } => {
                let prec = op.precedence();
                self.operand(left, prec);
                self.push(" ");
                self.push(op.as_str());
                self.push(" ");
                // Left associative: equal precedence on the right needs parens.
                self.operand(right, prec + 1);
            }
            ExprKind::Unary { op, expr } => {
                self.push(op.as_str());
                self.operand(expr, u8::MAX);
            }
            ExprKind::Selector { left, right } => {
                self.operand(left, u8::MAX);
                self.push(".");
                self.push(right);
            }
            ExprKind::Slice { low, high, max } => {
                if let Some(low) = low {
                    self.expr(low);
                }
                self.push(":");
                if let Some(high) = high {
                    self.expr(high);
                }
                if let Some(max) = max {
                    self.push(":");
                    self.expr(max);
                }
            }
            ExprKind::Index { left, indices } => {
                self.operand(left, u8::MAX);
                self.push("[");
                self.list(indices);
                self.push("]");
            }
            ExprKind::TypeAssert { left, ty } => {
                self.operand(left, u8::MAX);
                match ty {
                    Some(ty) => self.push(&format!(".({})", ty)),
                    None => self.push(".(type)"),
                }
            }
            ExprKind::BasicLiteral(lit) => self.literal(lit),
            ExprKind::FuncLiteral(func) => self.func(func),
            ExprKind::CompLiteral { ty, keys, values }
            | ExprKind::MapLiteral { ty, keys, values }
            | ExprKind::SliceLiteral { ty, keys, values }
            | ExprKind::ArrayLiteral { ty, keys, values } => {
                if !ty.is_invalid() {
                    self.push(&ty.to_string());
                }
                self.push("{");
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    if let Some(key) = keys.get(i) {
                        self.expr(key);
                        self.push(": ");
                    }
                    self.expr(value);
                }
                self.push("}");
            }
            ExprKind::TableLiteral {
                ty,
                col_names,
                rows,
            } => {
                self.push(&ty.to_string());
                self.push("{");
                let mut first = true;
                if !col_names.is_empty() {
                    self.push("{|");
                    self.list(col_names);
                    self.push("|}");
                    first = false;
                }
                for row in rows {
                    if !first {
                        self.push(", ");
                    }
                    first = false;
                    self.push("{");
                    self.list(row);
                    self.push("}");
                }
                self.push("}");
            }
            ExprKind::TypeExpr(ty) => self.push(&ty.to_string()),
            ExprKind::Ident(name) => self.push(name),
            ExprKind::Call {
                func,
                args,
                ellipsis,
                ..
            } => {
                self.operand(func, u8::MAX);
                self.push("(");
                self.list(args);
                if *ellipsis {
                    self.push("...");
                }
                self.push(")");
            }
            ExprKind::Range(expr) => {
                self.push("range ");
                self.expr(expr);
            }
            ExprKind::Shell(shell) => {
                self.push("$$ ");
                for (i, list) in shell.cmds.iter().enumerate() {
                    if i > 0 {
                        self.push("\n");
                    }
                    self.shell_list(list);
                }
                self.push(" $$");
            }
        }
    }

    /// An operand of an operator binding at `prec`
    fn operand(
        &mut self,
        e: &Expr,
        prec: u8,
    ) {
        let needs_parens = match &e.kind {
            ExprKind::Binary { op, .. } => op.precedence() < prec,
            ExprKind::Unary { .. } | ExprKind::Range(_) => prec == u8::MAX,
            ExprKind::FuncLiteral(_) | ExprKind::TypeExpr(_) => prec == u8::MAX,
            _ => false,
        };
        if needs_parens {
            self.push("(");
            self.expr(e);
            self.push(")");
        } else {
            self.expr(e);
        }
    }

    fn literal(
        &mut self,
        lit: &Literal,
    ) {
        match lit {
            // Keep integral floats floats.
            Literal::Float(v) if v.is_integer() => self.push(&format!("{}.0", v.to_integer())),
            lit => self.push(&lit.to_string()),
        }
    }

    fn signature(
        &mut self,
        ty: &FuncType,
        param_names: &[String],
        result_names: &[String],
    ) {
        self.push("(");
        for (i, param) in ty.params.iter().enumerate() {
            if i > 0 {
                self.push(", ");
            }
            if let Some(name) = param_names.get(i) {
                self.push(name);
                self.push(" ");
            }
            match param {
                Type::Slice(elem) if ty.variadic && i + 1 == ty.params.len() => {
                    self.push(&format!("...{}", elem));
                }
                param => self.push(&param.to_string()),
            }
        }
        self.push(")");
        match ty.results.len() {
            0 => {}
            1 if result_names.is_empty() => self.push(&format!(" {}", ty.results[0])),
            _ => {
                self.push(" (");
                for (i, result) in ty.results.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    if let Some(name) = result_names.get(i) {
                        self.push(name);
                        self.push(" ");
                    }
                    self.push(&result.to_string());
                }
                self.push(")");
            }
        }
    }

    fn func(
        &mut self,
        func: &FuncLiteral,
    ) {
        self.push("func ");
        if !func.receiver_name.is_empty() {
            self.push("(");
            self.push(&func.receiver_name);
            if func.pointer_receiver {
                self.push(" *");
            }
            self.push(") ");
        }
        self.push(&func.name);
        self.signature(&func.ty, &func.param_names, &func.result_names);
        self.push(" ");
        self.stmt(&func.body);
    }

    fn block(
        &mut self,
        stmts: &[Stmt],
    ) {
        self.push("{");
        self.indent += 1;
        for stmt in stmts {
            self.newline();
            self.stmt(stmt);
        }
        self.indent -= 1;
        self.newline();
        self.push("}");
    }

    fn value_spec(
        &mut self,
        spec: &ValueSpec,
    ) {
        self.push(&spec.names.join(", "));
        if let Some(ty) = &spec.ty {
            self.push(" ");
            self.push(&ty.to_string());
        }
        if !spec.values.is_empty() {
            self.push(" = ");
            self.list(&spec.values);
        }
    }

    fn value_set(
        &mut self,
        keyword: &str,
        specs: &[ValueSpec],
    ) {
        self.push(keyword);
        self.push(" (");
        self.indent += 1;
        for spec in specs {
            self.newline();
            self.value_spec(spec);
        }
        self.indent -= 1;
        self.newline();
        self.push(")");
    }

    fn import(
        &mut self,
        import: &Import,
    ) {
        if let Some(name) = &import.name {
            self.push(name);
            self.push(" ");
        }
        self.push(&Literal::String(import.path.clone()).to_string());
    }

    fn opt_init(
        &mut self,
        init: &Option<Box<Stmt>>,
    ) {
        if let Some(init) = init {
            self.stmt(init);
            self.push("; ");
        }
    }

    fn stmt(
        &mut self,
        s: &Stmt,
    ) {
        match &s.kind {
            StmtKind::Bad(_) => self.push("BAD"),
            StmtKind::Import(import) => {
                self.push("import ");
                self.import(import);
            }
            StmtKind::ImportSet(imports) => {
                self.push("import (");
                self.indent += 1;
                for import in imports {
                    self.newline();
                    self.import(import);
                }
                self.indent -= 1;
                self.newline();
                self.push(")");
            }
            StmtKind::TypeDecl { name, ty } => match ty {
                Type::Alias(alias) => self.push(&format!("type {} = {}", name, alias.ty)),
                ty => self.push(&format!("type {} {}", name, ty)),
            },
            StmtKind::MethodikDecl(decl) => {
                self.push(&format!("methodik {} {} {{", decl.name, decl.ty));
                self.indent += 1;
                for method in &decl.methods {
                    self.newline();
                    self.func(method);
                }
                self.indent -= 1;
                self.newline();
                self.push("}");
            }
            StmtKind::Const(spec) => {
                self.push("const ");
                self.value_spec(spec);
            }
            StmtKind::Var(spec) => {
                self.push("var ");
                self.value_spec(spec);
            }
            StmtKind::ConstSet(specs) => self.value_set("const", specs),
            StmtKind::VarSet(specs) => self.value_set("var", specs),
            StmtKind::Assign {
                decl,
                op,
                left,
                right,
            } => {
                self.list(left);
                let op = match (decl, op) {
                    (true, _) => ":=".to_string(),
                    (false, Some(op)) => format!("{}=", op.as_str()),
                    (false, None) => "=".to_string(),
                };
                self.push(&format!(" {} ", op));
                self.list(right);
            }
            StmtKind::Block(stmts) => self.block(stmts),
            StmtKind::If {
                init,
                cond,
                body,
                else_,
            } => {
                self.push("if ");
                self.opt_init(init);
                self.expr(cond);
                self.push(" ");
                self.stmt(body);
                if let Some(else_) = else_ {
                    self.push(" else ");
                    self.stmt(else_);
                }
            }
            StmtKind::For {
                init,
                cond,
                post,
                body,
            } => {
                self.push("for ");
                if init.is_some() || post.is_some() {
                    if let Some(init) = init {
                        self.stmt(init);
                    }
                    self.push("; ");
                    if let Some(cond) = cond {
                        self.expr(cond);
                    }
                    self.push("; ");
                    if let Some(post) = post {
                        self.stmt(post);
                        self.push(" ");
                    }
                } else if let Some(cond) = cond {
                    self.expr(cond);
                    self.push(" ");
                }
                self.stmt(body);
            }
            StmtKind::Switch { init, cond, cases } => {
                self.push("switch ");
                self.opt_init(init);
                if let Some(cond) = cond {
                    self.expr(cond);
                    self.push(" ");
                }
                self.push("{");
                for case in cases {
                    self.newline();
                    if case.default {
                        self.push("default:");
                    } else {
                        self.push("case ");
                        self.list(&case.conds);
                        self.push(":");
                    }
                    self.case_body(&case.body);
                }
                self.newline();
                self.push("}");
            }
            StmtKind::TypeSwitch {
                init,
                assign,
                cases,
            } => {
                self.push("switch ");
                self.opt_init(init);
                self.stmt(assign);
                self.push(" {");
                for case in cases {
                    self.newline();
                    if case.default {
                        self.push("default:");
                    } else {
                        let types: Vec<String> = case.types.iter().map(Type::to_string).collect();
                        self.push(&format!("case {}:", types.join(", ")));
                    }
                    self.case_body(&case.body);
                }
                self.newline();
                self.push("}");
            }
            StmtKind::Go(call) => {
                self.push("go ");
                self.expr(call);
            }
            StmtKind::Defer(call) => {
                self.push("defer ");
                self.expr(call);
            }
            StmtKind::Range {
                key,
                value,
                decl,
                expr,
                body,
            } => {
                self.push("for ");
                if let Some(key) = key {
                    self.expr(key);
                    if let Some(value) = value {
                        self.push(", ");
                        self.expr(value);
                    }
                    self.push(if *decl { " := " } else { " = " });
                }
                self.push("range ");
                self.expr(expr);
                self.push(" ");
                self.stmt(body);
            }
            StmtKind::Return(results) => {
                self.push("return");
                if !results.is_empty() {
                    self.push(" ");
                    self.list(results);
                }
            }
            StmtKind::Simple(expr) => self.expr(expr),
            StmtKind::Send { chan, value } => {
                self.expr(chan);
                self.push(" <- ");
                self.expr(value);
            }
            StmtKind::Branch { kind, label } => {
                self.push(kind.as_str());
                if let Some(label) = label {
                    self.push(" ");
                    self.push(label);
                }
            }
            StmtKind::Labeled { label, stmt } => {
                self.push(label);
                self.push(":");
                self.newline();
                self.stmt(stmt);
            }
            StmtKind::Select(cases) => {
                self.push("select {");
                for case in cases {
                    self.newline();
                    match &case.stmt {
                        Some(stmt) if !case.default => {
                            self.push("case ");
                            self.stmt(stmt);
                            self.push(":");
                        }
                        _ => self.push("default:"),
                    }
                    self.case_body(&case.body);
                }
                self.newline();
                self.push("}");
            }
        }
    }

    fn case_body(
        &mut self,
        body: &[Stmt],
    ) {
        self.indent += 1;
        for stmt in body {
            self.newline();
            self.stmt(stmt);
        }
        self.indent -= 1;
    }

    fn shell_list(
        &mut self,
        list: &ShellList,
    ) {
        for (i, and_or) in list.and_or.iter().enumerate() {
            if i > 0 {
                self.push(" ");
            }
            for (j, pipeline) in and_or.pipelines.iter().enumerate() {
                if j > 0 {
                    let sep = and_or.seps.get(j - 1).copied().unwrap_or(TokenKind::LogicalAnd);
                    self.push(&format!(" {} ", sep.as_str()));
                }
                if pipeline.bang {
                    self.push("! ");
                }
                for (k, cmd) in pipeline.cmds.iter().enumerate() {
                    if k > 0 {
                        self.push(" | ");
                    }
                    self.shell_cmd(cmd);
                }
            }
            if and_or.background {
                self.push(" &");
            } else if i + 1 < list.and_or.len() {
                self.push(";");
            }
        }
    }

    fn shell_cmd(
        &mut self,
        cmd: &ShellCmd,
    ) {
        match cmd {
            ShellCmd::Subshell(_, list) => {
                self.push("(");
                self.shell_list(list);
                self.push(")");
            }
            ShellCmd::Simple(cmd) => {
                let mut words: Vec<String> = Vec::new();
                words.extend(cmd.assigns.iter().map(|a| format!("{}={}", a.key, a.value)));
                words.extend(cmd.args.iter().cloned());
                words.extend(cmd.redirects.iter().map(|r| {
                    let number = r.number.map(|n| n.to_string()).unwrap_or_default();
                    format!("{}{}{}", number, r.token.as_str(), r.filename)
                }));
                self.push(&words.join(" "));
            }
        }
    }
}
