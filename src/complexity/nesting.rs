//! Maximum nesting depth of control constructs.
//!
//! The walk is a true depth-first traversal: the depth is raised on entering
//! a block-scoped control construct and restored when leaving it, so sibling
//! constructs never accumulate. Two sibling `if` blocks that each hold one
//! nested `if` have a depth of 2, not 4.

use crate::ast::visit::{self, Visit};
use crate::ast::{Block, Expr, Stmt};

/// Maximum nesting depth of `if`, `for`, range loops, `switch`, type switch
/// and `select` in a function body.
pub fn calculate_nesting_depth(block: &Block) -> u32 {
    let mut visitor = NestingVisitor::default();
    visitor.visit_block(block);
    visitor.max_depth
}

#[derive(Default)]
struct NestingVisitor {
    depth: u32,
    max_depth: u32,
}

impl NestingVisitor {
    fn enter(&mut self) {
        self.depth += 1;
        self.max_depth = self.max_depth.max(self.depth);
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn nested<F: FnOnce(&mut Self)>(&mut self, f: F) {
        self.enter();
        f(self);
        self.leave();
    }

    /// An `if` and its `else` share one level; an `else if` continues at
    /// the level of the first `if` rather than nesting under it.
    fn visit_if_chain<'ast>(&mut self, stmt: &'ast Stmt) {
        let Stmt::If {
            init,
            cond,
            then,
            otherwise,
            ..
        } = stmt
        else {
            return;
        };

        self.nested(|v| {
            if let Some(init) = init {
                v.visit_stmt(init);
            }
            v.visit_expr(cond);
            v.visit_block(then);
            if let Some(Stmt::Block(else_block)) = otherwise.as_deref() {
                v.visit_block(else_block);
            }
        });

        match otherwise.as_deref() {
            Some(chained @ Stmt::If { .. }) => self.visit_if_chain(chained),
            Some(Stmt::Block(_)) | None => {}
            Some(other) => self.nested(|v| v.visit_stmt(other)),
        }
    }
}

impl<'ast> Visit<'ast> for NestingVisitor {
    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        match stmt {
            Stmt::If { .. } => self.visit_if_chain(stmt),
            Stmt::For { .. }
            | Stmt::Range { .. }
            | Stmt::Switch { .. }
            | Stmt::TypeSwitch { .. }
            | Stmt::Select { .. } => self.nested(|v| visit::walk_stmt(v, stmt)),
            _ => visit::walk_stmt(self, stmt),
        }
    }

    // Function literals are measured at the depth where they appear.
    fn visit_expr(&mut self, expr: &'ast Expr) {
        visit::walk_expr(self, expr);
    }
}
