//! Syntax tree traversal
//!
//! [`walk`] visits every node of a file once, in source order. Each visit
//! gets a [`Cursor`] naming the node, its parent and the parent field that
//! holds it. Types are not visited: they carry no positions.

use super::ast::*;
use crate::util::span::Pos;

/// A visited node
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    File(&'a File),
    Stmt(&'a Stmt),
    Expr(&'a Expr),
    SwitchCase(&'a SwitchCase),
    TypeSwitchCase(&'a TypeSwitchCase),
    SelectCase(&'a SelectCase),
    ShellList(&'a ShellList),
    ShellAndOr(&'a ShellAndOr),
    ShellPipeline(&'a ShellPipeline),
    ShellCmd(&'a ShellCmd),
}

impl<'a> Node<'a> {
    /// Position of the node; files have none
    pub fn pos(&self) -> Option<&'a Pos> {
        match *self {
            Node::File(_) => None,
            Node::Stmt(s) => Some(&s.pos),
            Node::Expr(e) => Some(&e.pos),
            Node::SwitchCase(c) => Some(&c.pos),
            Node::TypeSwitchCase(c) => Some(&c.pos),
            Node::SelectCase(c) => Some(&c.pos),
            Node::ShellList(l) => Some(&l.pos),
            Node::ShellAndOr(a) => Some(&a.pos),
            Node::ShellPipeline(p) => Some(&p.pos),
            Node::ShellCmd(ShellCmd::Subshell(pos, _)) => Some(pos),
            Node::ShellCmd(ShellCmd::Simple(cmd)) => Some(&cmd.pos),
        }
    }
}

/// Where a visited node sits in the tree
#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    pub node: Node<'a>,
    pub parent: Option<Node<'a>>,
    /// Name of the parent field holding the node
    pub field: &'static str,
    /// Index within the field, for list fields
    pub index: Option<usize>,
}

/// Visit every node of `file`
///
/// `pre` runs before a node's children; returning false skips the children
/// and the `post` call for that node.
pub fn walk<'a>(
    file: &'a File,
    mut pre: impl FnMut(&Cursor<'a>) -> bool,
    mut post: impl FnMut(&Cursor<'a>),
) {
    let mut walker = Walker {
        pre: &mut pre,
        post: &mut post,
    };
    walker.visit(Cursor {
        node: Node::File(file),
        parent: None,
        field: "",
        index: None,
    });
}

struct Walker<'w, 'a> {
    pre: &'w mut dyn FnMut(&Cursor<'a>) -> bool,
    post: &'w mut dyn FnMut(&Cursor<'a>),
}

impl<'w, 'a> Walker<'w, 'a> {
    fn visit(
        &mut self,
        cursor: Cursor<'a>,
    ) {
        if !(self.pre)(&cursor) {
            return;
        }
        let parent = cursor.node;
        match parent {
            Node::File(file) => self.stmts(parent, "stmts", &file.stmts),
            Node::Stmt(stmt) => self.stmt_children(parent, stmt),
            Node::Expr(expr) => self.expr_children(parent, expr),
            Node::SwitchCase(case) => {
                self.exprs(parent, "conds", &case.conds);
                self.stmts(parent, "body", &case.body);
            }
            Node::TypeSwitchCase(case) => self.stmts(parent, "body", &case.body),
            Node::SelectCase(case) => {
                if let Some(stmt) = &case.stmt {
                    self.child(parent, "stmt", None, Node::Stmt(stmt));
                }
                self.stmts(parent, "body", &case.body);
            }
            Node::ShellList(list) => {
                for (i, and_or) in list.and_or.iter().enumerate() {
                    self.child(parent, "and_or", Some(i), Node::ShellAndOr(and_or));
                }
            }
            Node::ShellAndOr(and_or) => {
                for (i, pipeline) in and_or.pipelines.iter().enumerate() {
                    self.child(parent, "pipelines", Some(i), Node::ShellPipeline(pipeline));
                }
            }
            Node::ShellPipeline(pipeline) => {
                for (i, cmd) in pipeline.cmds.iter().enumerate() {
                    self.child(parent, "cmds", Some(i), Node::ShellCmd(cmd));
                }
            }
            Node::ShellCmd(ShellCmd::Subshell(_, list)) => {
                self.child(parent, "subshell", None, Node::ShellList(list));
            }
            Node::ShellCmd(ShellCmd::Simple(_)) => {}
        }
        (self.post)(&cursor);
    }

    fn child(
        &mut self,
        parent: Node<'a>,
        field: &'static str,
        index: Option<usize>,
        node: Node<'a>,
    ) {
        self.visit(Cursor {
            node,
            parent: Some(parent),
            field,
            index,
        });
    }

    fn stmts(
        &mut self,
        parent: Node<'a>,
        field: &'static str,
        stmts: &'a [Stmt],
    ) {
        for (i, stmt) in stmts.iter().enumerate() {
            self.child(parent, field, Some(i), Node::Stmt(stmt));
        }
    }

    fn exprs(
        &mut self,
        parent: Node<'a>,
        field: &'static str,
        exprs: &'a [Expr],
    ) {
        for (i, expr) in exprs.iter().enumerate() {
            self.child(parent, field, Some(i), Node::Expr(expr));
        }
    }

    fn opt_stmt(
        &mut self,
        parent: Node<'a>,
        field: &'static str,
        stmt: &'a Option<Box<Stmt>>,
    ) {
        if let Some(stmt) = stmt {
            self.child(parent, field, None, Node::Stmt(stmt));
        }
    }

    fn opt_expr(
        &mut self,
        parent: Node<'a>,
        field: &'static str,
        expr: Option<&'a Expr>,
    ) {
        if let Some(expr) = expr {
            self.child(parent, field, None, Node::Expr(expr));
        }
    }

    fn stmt_children(
        &mut self,
        parent: Node<'a>,
        stmt: &'a Stmt,
    ) {
        match &stmt.kind {
            StmtKind::Bad(_)
            | StmtKind::Import(_)
            | StmtKind::ImportSet(_)
            | StmtKind::TypeDecl { .. }
            | StmtKind::Branch { .. } => {}
            StmtKind::MethodikDecl(decl) => {
                for (i, method) in decl.methods.iter().enumerate() {
                    self.child(parent, "methods", Some(i), Node::Stmt(&method.body));
                }
            }
            StmtKind::Const(spec) | StmtKind::Var(spec) => self.exprs(parent, "values", &spec.values),
            StmtKind::ConstSet(specs) | StmtKind::VarSet(specs) => {
                for spec in specs {
                    self.exprs(parent, "values", &spec.values);
                }
            }
            StmtKind::Assign { left, right, .. } => {
                self.exprs(parent, "left", left);
                self.exprs(parent, "right", right);
            }
            StmtKind::Block(stmts) => self.stmts(parent, "stmts", stmts),
            StmtKind::If {
                init,
                cond,
                body,
                else_,
            } => {
                self.opt_stmt(parent, "init", init);
                self.child(parent, "cond", None, Node::Expr(cond));
                self.child(parent, "body", None, Node::Stmt(body));
                self.opt_stmt(parent, "else", else_);
            }
            StmtKind::For {
                init,
                cond,
                post,
                body,
            } => {
                self.opt_stmt(parent, "init", init);
                self.opt_expr(parent, "cond", cond.as_ref());
                self.opt_stmt(parent, "post", post);
                self.child(parent, "body", None, Node::Stmt(body));
            }
            StmtKind::Switch { init, cond, cases } => {
                self.opt_stmt(parent, "init", init);
                self.opt_expr(parent, "cond", cond.as_ref());
                for (i, case) in cases.iter().enumerate() {
                    self.child(parent, "cases", Some(i), Node::SwitchCase(case));
                }
            }
            StmtKind::TypeSwitch {
                init,
                assign,
                cases,
            } => {
                self.opt_stmt(parent, "init", init);
                self.child(parent, "assign", None, Node::Stmt(assign));
                for (i, case) in cases.iter().enumerate() {
                    self.child(parent, "cases", Some(i), Node::TypeSwitchCase(case));
                }
            }
            StmtKind::Go(call) | StmtKind::Defer(call) => {
                self.child(parent, "call", None, Node::Expr(call))
            }
            StmtKind::Range {
                key,
                value,
                expr,
                body,
                ..
            } => {
                self.opt_expr(parent, "key", key.as_ref());
                self.opt_expr(parent, "value", value.as_ref());
                self.child(parent, "expr", None, Node::Expr(expr));
                self.child(parent, "body", None, Node::Stmt(body));
            }
            StmtKind::Return(results) => self.exprs(parent, "results", results),
            StmtKind::Simple(expr) => self.child(parent, "expr", None, Node::Expr(expr)),
            StmtKind::Send { chan, value } => {
                self.child(parent, "chan", None, Node::Expr(chan));
                self.child(parent, "value", None, Node::Expr(value));
            }
            StmtKind::Labeled { stmt, .. } => self.child(parent, "stmt", None, Node::Stmt(stmt)),
            StmtKind::Select(cases) => {
                for (i, case) in cases.iter().enumerate() {
                    self.child(parent, "cases", Some(i), Node::SelectCase(case));
                }
            }
        }
    }

    fn expr_children(
        &mut self,
        parent: Node<'a>,
        expr: &'a Expr,
    ) {
        match &expr.kind {
            ExprKind::Bad(_) | ExprKind::BasicLiteral(_) | ExprKind::TypeExpr(_) | ExprKind::Ident(_) => {}
            ExprKind::Binary { left, right, .. } => {
                self.child(parent, "left", None, Node::Expr(left));
                self.child(parent, "right", None, Node::Expr(right));
            }
            ExprKind::Unary { expr, .. } | ExprKind::Range(expr) => {
                self.child(parent, "expr", None, Node::Expr(expr))
            }
            ExprKind::Selector { left, .. } | ExprKind::TypeAssert { left, .. } => {
                self.child(parent, "left", None, Node::Expr(left))
            }
            ExprKind::Slice { low, high, max } => {
                self.opt_expr(parent, "low", low.as_deref());
                self.opt_expr(parent, "high", high.as_deref());
                self.opt_expr(parent, "max", max.as_deref());
            }
            ExprKind::Index { left, indices } => {
                self.child(parent, "left", None, Node::Expr(left));
                self.exprs(parent, "indices", indices);
            }
            ExprKind::FuncLiteral(func) => self.child(parent, "body", None, Node::Stmt(&func.body)),
            ExprKind::CompLiteral { keys, values, .. }
            | ExprKind::MapLiteral { keys, values, .. }
            | ExprKind::SliceLiteral { keys, values, .. }
            | ExprKind::ArrayLiteral { keys, values, .. } => {
                // Keys and values interleave in source order.
                if keys.len() == values.len() {
                    for (i, (key, value)) in keys.iter().zip(values).enumerate() {
                        self.child(parent, "keys", Some(i), Node::Expr(key));
                        self.child(parent, "values", Some(i), Node::Expr(value));
                    }
                } else {
                    self.exprs(parent, "keys", keys);
                    self.exprs(parent, "values", values);
                }
            }
            ExprKind::TableLiteral {
                col_names, rows, ..
            } => {
                self.exprs(parent, "col_names", col_names);
                for row in rows {
                    self.exprs(parent, "rows", row);
                }
            }
            ExprKind::Call { func, args, .. } => {
                self.child(parent, "func", None, Node::Expr(func));
                self.exprs(parent, "args", args);
            }
            ExprKind::Shell(shell) => {
                for (i, list) in shell.cmds.iter().enumerate() {
                    self.child(parent, "cmds", Some(i), Node::ShellList(list));
                }
            }
        }
    }
}
