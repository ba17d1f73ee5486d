//! Task leak heuristic.
//!
//! A launched task whose body contains an unconditional `for { }` loop with
//! no reachable way out never terminates on its own. This is a best-effort,
//! purely syntactic check: an exit that the analysis cannot see (a callee
//! that calls `runtime.Goexit`, say) is missed, and a flagged loop may still
//! be intentional for process-lifetime tasks.

use crate::ast::visit::{self, Visit};
use crate::ast::{Block, BranchKind, Expr, Stmt, UnaryOp};
use crate::core::RiskLevel;

/// How control can leave a loop body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LoopExit {
    None,
    /// Only by crashing: `panic`, `os.Exit`, `log.Fatal`.
    Abnormal,
    /// `return`, a `break` that targets the loop, a labeled branch to an
    /// enclosing statement, or `goto`.
    Normal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeakAssessment {
    pub level: RiskLevel,
    pub reason: String,
    pub recommendation: String,
}

/// Assess a task body. Returns the most severe finding among its
/// unconditional loops, or `None` when every such loop can exit.
pub fn assess_task_body(body: &Block) -> Option<LeakAssessment> {
    let mut loops = Vec::new();
    find_unconditional_loops(&body.stmts, None, &mut loops);

    loops
        .into_iter()
        .filter_map(|(loop_body, label)| assess_loop(loop_body, label))
        .max_by_key(|assessment| assessment.level)
}

fn assess_loop(body: &Block, label: Option<&str>) -> Option<LeakAssessment> {
    match loop_exit(&body.stmts, &ExitScope::new(label)) {
        LoopExit::Normal => None,
        LoopExit::Abnormal => Some(LeakAssessment {
            level: RiskLevel::Low,
            reason: "infinite loop ends only by terminating the process".to_string(),
            recommendation: "return from the task or close a done channel instead of exiting \
                             the process from inside it"
                .to_string(),
        }),
        LoopExit::None if waits_on_channels(body) => Some(LeakAssessment {
            level: RiskLevel::Medium,
            reason: "infinite loop blocks on channel operations but has no stop signal"
                .to_string(),
            recommendation: "add a `case <-ctx.Done(): return` (or a done channel) so the \
                             task can be told to stop"
                .to_string(),
        }),
        LoopExit::None => Some(LeakAssessment {
            level: RiskLevel::High,
            reason: "infinite loop with no return, break or channel wait".to_string(),
            recommendation: "give the loop an exit condition driven by a done channel or \
                             context cancellation"
                .to_string(),
        }),
    }
}

/// Collect `for { }` loops reachable without entering function literals.
fn find_unconditional_loops<'a>(
    stmts: &'a [Stmt],
    label: Option<&'a str>,
    out: &mut Vec<(&'a Block, Option<&'a str>)>,
) {
    for stmt in stmts {
        find_in_stmt(stmt, label, out);
    }
}

fn find_in_stmt<'a>(
    stmt: &'a Stmt,
    label: Option<&'a str>,
    out: &mut Vec<(&'a Block, Option<&'a str>)>,
) {
    match stmt {
        Stmt::For {
            cond: None, body, ..
        } => {
            out.push((body, label));
            find_unconditional_loops(&body.stmts, None, out);
        }
        Stmt::For { body, .. } | Stmt::Range { body, .. } => {
            find_unconditional_loops(&body.stmts, None, out)
        }
        Stmt::Labeled { label, stmt, .. } => find_in_stmt(stmt, Some(label), out),
        Stmt::Block(block) => find_unconditional_loops(&block.stmts, None, out),
        Stmt::If {
            then, otherwise, ..
        } => {
            find_unconditional_loops(&then.stmts, None, out);
            if let Some(otherwise) = otherwise {
                find_in_stmt(otherwise, None, out);
            }
        }
        Stmt::Switch { clauses, .. } | Stmt::TypeSwitch { clauses, .. } => {
            for clause in clauses {
                find_unconditional_loops(&clause.body, None, out);
            }
        }
        Stmt::Select { clauses, .. } => {
            for clause in clauses {
                find_unconditional_loops(&clause.body, None, out);
            }
        }
        Stmt::Expr { .. }
        | Stmt::Assign { .. }
        | Stmt::Decl(_)
        | Stmt::Go { .. }
        | Stmt::Defer { .. }
        | Stmt::Return { .. }
        | Stmt::Branch { .. }
        | Stmt::Send { .. }
        | Stmt::IncDec { .. }
        | Stmt::Empty => {}
    }
}

/// What a branch statement inside the assessed loop refers to.
///
/// `breakable` counts `for`/`switch`/`select` statements entered inside the
/// loop, which capture an unlabeled `break`. `inner_labels` are the labels
/// declared inside the loop; a labeled branch to any other label leaves it.
#[derive(Debug, Clone)]
struct ExitScope<'a> {
    own_label: Option<&'a str>,
    inner_labels: Vec<&'a str>,
    breakable: u32,
}

impl<'a> ExitScope<'a> {
    fn new(own_label: Option<&'a str>) -> Self {
        Self {
            own_label,
            inner_labels: Vec::new(),
            breakable: 0,
        }
    }

    fn nested(&self) -> Self {
        Self {
            breakable: self.breakable + 1,
            ..self.clone()
        }
    }

    fn with_label(&self, label: &'a str) -> Self {
        let mut scope = self.clone();
        scope.inner_labels.push(label);
        scope
    }

    fn leaves_loop(&self, kind: BranchKind, target: Option<&str>) -> bool {
        let declared_inside = |t: &str| self.inner_labels.iter().any(|l| *l == t);
        match (kind, target) {
            (BranchKind::Goto, _) => true,
            (BranchKind::Break, None) => self.breakable == 0,
            (BranchKind::Break, Some(t)) => !declared_inside(t),
            // `continue` on the loop's own label starts its next iteration.
            (BranchKind::Continue, Some(t)) => !declared_inside(t) && Some(t) != self.own_label,
            (BranchKind::Continue, None) | (BranchKind::Fallthrough, _) => false,
        }
    }
}

/// Best exit found in `stmts`.
fn loop_exit<'a>(stmts: &'a [Stmt], scope: &ExitScope<'a>) -> LoopExit {
    stmts
        .iter()
        .map(|stmt| stmt_exit(stmt, scope))
        .max()
        .unwrap_or(LoopExit::None)
}

fn clauses_exit<'a>(bodies: impl Iterator<Item = &'a [Stmt]>, scope: &ExitScope<'a>) -> LoopExit {
    let nested = scope.nested();
    bodies
        .map(|body| loop_exit(body, &nested))
        .max()
        .unwrap_or(LoopExit::None)
}

fn stmt_exit<'a>(stmt: &'a Stmt, scope: &ExitScope<'a>) -> LoopExit {
    match stmt {
        Stmt::Return { .. } => LoopExit::Normal,
        Stmt::Branch { kind, label, .. } => {
            if scope.leaves_loop(*kind, label.as_deref()) {
                LoopExit::Normal
            } else {
                LoopExit::None
            }
        }
        Stmt::Expr { expr, .. } if is_terminating_call(expr) => LoopExit::Abnormal,
        Stmt::Expr { .. } => LoopExit::None,
        Stmt::Block(block) => loop_exit(&block.stmts, scope),
        Stmt::Labeled { label, stmt, .. } => stmt_exit(stmt, &scope.with_label(label)),
        Stmt::If {
            then, otherwise, ..
        } => {
            let then_exit = loop_exit(&then.stmts, scope);
            let else_exit = otherwise
                .as_deref()
                .map(|s| stmt_exit(s, scope))
                .unwrap_or(LoopExit::None);
            then_exit.max(else_exit)
        }
        Stmt::For { body, .. } | Stmt::Range { body, .. } => {
            loop_exit(&body.stmts, &scope.nested())
        }
        Stmt::Switch { clauses, .. } | Stmt::TypeSwitch { clauses, .. } => {
            clauses_exit(clauses.iter().map(|c| c.body.as_slice()), scope)
        }
        Stmt::Select { clauses, .. } => {
            clauses_exit(clauses.iter().map(|c| c.body.as_slice()), scope)
        }
        Stmt::Assign { .. }
        | Stmt::Decl(_)
        | Stmt::Go { .. }
        | Stmt::Defer { .. }
        | Stmt::Send { .. }
        | Stmt::IncDec { .. }
        | Stmt::Empty => LoopExit::None,
    }
}

fn is_terminating_call(expr: &Expr) -> bool {
    let Expr::Call { fun, .. } = expr.unparen() else {
        return false;
    };
    match fun.unparen() {
        Expr::Ident(name) => name == "panic",
        other => match other.as_qualified() {
            Some(("os", "Exit")) | Some(("runtime", "Goexit")) => true,
            Some(("log", name)) => name.starts_with("Fatal") || name.starts_with("Panic"),
            _ => false,
        },
    }
}

fn waits_on_channels(body: &Block) -> bool {
    let mut finder = ChannelWaitFinder { found: false };
    finder.visit_block(body);
    finder.found
}

struct ChannelWaitFinder {
    found: bool,
}

impl<'ast> Visit<'ast> for ChannelWaitFinder {
    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        if matches!(stmt, Stmt::Select { .. } | Stmt::Send { .. }) {
            self.found = true;
            return;
        }
        visit::walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &'ast Expr) {
        match expr {
            Expr::Unary {
                op: UnaryOp::Recv, ..
            } => self.found = true,
            // A closure's channel operations belong to whoever calls it.
            Expr::FuncLit { .. } => {}
            _ => visit::walk_expr(self, expr),
        }
    }
}
