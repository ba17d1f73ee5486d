//! Syntax tree traversal in the style of `syn::visit`.
//!
//! Each `visit_*` method has a default implementation that calls the matching
//! `walk_*` function, which recurses into children. Override a method to
//! observe a node kind, and call the `walk_*` function to keep descending.

use super::{
    Block, CaseClause, CommClause, Decl, Expr, Field, FuncDecl, GenDecl, SourceFile, Spec, Stmt,
    TypeExpr,
};

pub trait Visit<'ast> {
    fn visit_file(&mut self, file: &'ast SourceFile) {
        walk_file(self, file);
    }

    fn visit_decl(&mut self, decl: &'ast Decl) {
        walk_decl(self, decl);
    }

    fn visit_func_decl(&mut self, func: &'ast FuncDecl) {
        walk_func_decl(self, func);
    }

    fn visit_gen_decl(&mut self, decl: &'ast GenDecl) {
        walk_gen_decl(self, decl);
    }

    fn visit_block(&mut self, block: &'ast Block) {
        walk_block(self, block);
    }

    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_case_clause(&mut self, clause: &'ast CaseClause) {
        walk_case_clause(self, clause);
    }

    fn visit_comm_clause(&mut self, clause: &'ast CommClause) {
        walk_comm_clause(self, clause);
    }

    fn visit_expr(&mut self, expr: &'ast Expr) {
        walk_expr(self, expr);
    }

    fn visit_type(&mut self, ty: &'ast TypeExpr) {
        walk_type(self, ty);
    }

    fn visit_field(&mut self, field: &'ast Field) {
        self.visit_type(&field.ty);
    }
}

pub fn walk_file<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, file: &'ast SourceFile) {
    for decl in &file.decls {
        v.visit_decl(decl);
    }
}

pub fn walk_decl<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, decl: &'ast Decl) {
    match decl {
        Decl::Func(func) => v.visit_func_decl(func),
        Decl::Gen(group) => v.visit_gen_decl(group),
        Decl::Bad { .. } => {}
    }
}

pub fn walk_func_decl<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, func: &'ast FuncDecl) {
    if let Some(receiver) = &func.receiver {
        v.visit_field(receiver);
    }
    for field in func
        .type_params
        .iter()
        .chain(&func.params)
        .chain(&func.results)
    {
        v.visit_field(field);
    }
    if let Some(body) = &func.body {
        v.visit_block(body);
    }
}

pub fn walk_gen_decl<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, decl: &'ast GenDecl) {
    for spec in &decl.specs {
        match spec {
            Spec::Value(value) => {
                if let Some(ty) = &value.ty {
                    v.visit_type(ty);
                }
                for expr in &value.values {
                    v.visit_expr(expr);
                }
            }
            Spec::Type(type_spec) => {
                for field in &type_spec.type_params {
                    v.visit_field(field);
                }
                v.visit_type(&type_spec.ty);
            }
        }
    }
}

pub fn walk_block<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, block: &'ast Block) {
    for stmt in &block.stmts {
        v.visit_stmt(stmt);
    }
}

pub fn walk_stmt<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, stmt: &'ast Stmt) {
    match stmt {
        Stmt::Expr { expr, .. } => v.visit_expr(expr),
        Stmt::Assign { lhs, rhs, .. } => {
            for expr in lhs.iter().chain(rhs) {
                v.visit_expr(expr);
            }
        }
        Stmt::Decl(group) => v.visit_gen_decl(group),
        Stmt::Go { call, .. } | Stmt::Defer { call, .. } => v.visit_expr(call),
        Stmt::Return { results, .. } => {
            for expr in results {
                v.visit_expr(expr);
            }
        }
        Stmt::Branch { .. } | Stmt::Empty => {}
        Stmt::Block(block) => v.visit_block(block),
        Stmt::If {
            init,
            cond,
            then,
            otherwise,
            ..
        } => {
            if let Some(init) = init {
                v.visit_stmt(init);
            }
            v.visit_expr(cond);
            v.visit_block(then);
            if let Some(otherwise) = otherwise {
                v.visit_stmt(otherwise);
            }
        }
        Stmt::For {
            init,
            cond,
            post,
            body,
            ..
        } => {
            if let Some(init) = init {
                v.visit_stmt(init);
            }
            if let Some(cond) = cond {
                v.visit_expr(cond);
            }
            if let Some(post) = post {
                v.visit_stmt(post);
            }
            v.visit_block(body);
        }
        Stmt::Range {
            key,
            value,
            expr,
            body,
            ..
        } => {
            for bound in key.iter().chain(value) {
                v.visit_expr(bound);
            }
            v.visit_expr(expr);
            v.visit_block(body);
        }
        Stmt::Switch {
            init, tag, clauses, ..
        } => {
            if let Some(init) = init {
                v.visit_stmt(init);
            }
            if let Some(tag) = tag {
                v.visit_expr(tag);
            }
            for clause in clauses {
                v.visit_case_clause(clause);
            }
        }
        Stmt::TypeSwitch {
            init,
            assign,
            clauses,
            ..
        } => {
            if let Some(init) = init {
                v.visit_stmt(init);
            }
            v.visit_stmt(assign);
            for clause in clauses {
                v.visit_case_clause(clause);
            }
        }
        Stmt::Select { clauses, .. } => {
            for clause in clauses {
                v.visit_comm_clause(clause);
            }
        }
        Stmt::Labeled { stmt, .. } => v.visit_stmt(stmt),
        Stmt::Send { channel, value, .. } => {
            v.visit_expr(channel);
            v.visit_expr(value);
        }
        Stmt::IncDec { expr, .. } => v.visit_expr(expr),
    }
}

pub fn walk_case_clause<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, clause: &'ast CaseClause) {
    for expr in &clause.exprs {
        v.visit_expr(expr);
    }
    for stmt in &clause.body {
        v.visit_stmt(stmt);
    }
}

pub fn walk_comm_clause<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, clause: &'ast CommClause) {
    if let Some(comm) = &clause.comm {
        v.visit_stmt(comm);
    }
    for stmt in &clause.body {
        v.visit_stmt(stmt);
    }
}

pub fn walk_expr<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, expr: &'ast Expr) {
    match expr {
        Expr::Ident(_) | Expr::BasicLit { .. } | Expr::Bad => {}
        Expr::Call { fun, args, .. } => {
            v.visit_expr(fun);
            for arg in args {
                v.visit_expr(arg);
            }
        }
        Expr::Selector { x, .. } => v.visit_expr(x),
        Expr::FuncLit {
            params,
            results,
            body,
            ..
        } => {
            for field in params.iter().chain(results) {
                v.visit_field(field);
            }
            v.visit_block(body);
        }
        Expr::CompositeLit { ty, elts, .. } => {
            if let Some(ty) = ty {
                v.visit_type(ty);
            }
            for elt in elts {
                v.visit_expr(elt);
            }
        }
        Expr::Unary { x, .. } | Expr::Star(x) | Expr::Paren(x) => v.visit_expr(x),
        Expr::Binary { lhs, rhs, .. } => {
            v.visit_expr(lhs);
            v.visit_expr(rhs);
        }
        Expr::Index { x, index } => {
            v.visit_expr(x);
            v.visit_expr(index);
        }
        Expr::Slice { x, low, high } => {
            v.visit_expr(x);
            for bound in low.iter().chain(high) {
                v.visit_expr(bound);
            }
        }
        Expr::TypeAssert { x, ty } => {
            v.visit_expr(x);
            if let Some(ty) = ty {
                v.visit_type(ty);
            }
        }
        Expr::KeyValue { key, value } => {
            v.visit_expr(key);
            v.visit_expr(value);
        }
        Expr::Type(ty) => v.visit_type(ty),
    }
}

pub fn walk_type<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, ty: &'ast TypeExpr) {
    match ty {
        TypeExpr::Named(_) | TypeExpr::Qualified { .. } => {}
        TypeExpr::Pointer(inner)
        | TypeExpr::Slice(inner)
        | TypeExpr::Ellipsis(inner)
        | TypeExpr::Array { elem: inner, .. }
        | TypeExpr::Chan { elem: inner, .. } => v.visit_type(inner),
        TypeExpr::Map { key, value } => {
            v.visit_type(key);
            v.visit_type(value);
        }
        TypeExpr::Func { params, results } => {
            for field in params.iter().chain(results) {
                v.visit_field(field);
            }
        }
        TypeExpr::Interface { embeds, .. } => {
            for embed in embeds {
                v.visit_type(embed);
            }
        }
        TypeExpr::Struct { fields } => {
            for field in fields {
                v.visit_field(field);
            }
        }
        TypeExpr::Generic { base, args } => {
            v.visit_type(base);
            for arg in args {
                v.visit_type(arg);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinaryOp, Span};

    struct IdentCounter(usize);

    impl<'ast> Visit<'ast> for IdentCounter {
        fn visit_expr(&mut self, expr: &'ast Expr) {
            if matches!(expr, Expr::Ident(_)) {
                self.0 += 1;
            }
            walk_expr(self, expr);
        }
    }

    #[test]
    fn test_walk_reaches_func_literal_bodies() {
        let inner = Expr::Binary {
            op: BinaryOp::Add,
            lhs: Box::new(Expr::ident("a")),
            rhs: Box::new(Expr::ident("b")),
        };
        let lit = Expr::FuncLit {
            params: vec![],
            results: vec![],
            body: Block::new(vec![Stmt::Return {
                results: vec![inner],
                line: 2,
            }]),
            span: Span::new(1, 3),
        };
        let block = Block::new(vec![Stmt::Go {
            call: Expr::Call {
                fun: Box::new(lit),
                args: vec![],
                ellipsis: false,
                line: 1,
            },
            line: 1,
        }]);

        let mut counter = IdentCounter(0);
        counter.visit_block(&block);
        assert_eq!(counter.0, 2);
    }
}
