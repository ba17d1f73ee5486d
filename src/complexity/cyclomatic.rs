use crate::ast::visit::{self, Visit};
use crate::ast::{Block, CaseClause, CommClause, Expr, Stmt};

/// Cyclomatic complexity of a function body.
///
/// Starts at 1 and adds one for every `if`, loop, switch/type-switch case
/// arm, select arm, and short-circuit `&&`/`||`. The switch or select head
/// itself adds nothing; only its arms do.
pub fn calculate_cyclomatic(block: &Block) -> u32 {
    let mut visitor = CyclomaticVisitor { complexity: 1 };
    visitor.visit_block(block);
    visitor.complexity
}

struct CyclomaticVisitor {
    complexity: u32,
}

fn calculate_stmt_complexity(stmt: &Stmt) -> u32 {
    match stmt {
        Stmt::If { .. } | Stmt::For { .. } | Stmt::Range { .. } => 1,
        _ => 0,
    }
}

fn calculate_expr_complexity(expr: &Expr) -> u32 {
    match expr {
        Expr::Binary { op, .. } if op.is_short_circuit() => 1,
        _ => 0,
    }
}

impl<'ast> Visit<'ast> for CyclomaticVisitor {
    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        self.complexity += calculate_stmt_complexity(stmt);
        visit::walk_stmt(self, stmt);
    }

    fn visit_case_clause(&mut self, clause: &'ast CaseClause) {
        self.complexity += 1;
        visit::walk_case_clause(self, clause);
    }

    fn visit_comm_clause(&mut self, clause: &'ast CommClause) {
        self.complexity += 1;
        visit::walk_comm_clause(self, clause);
    }

    fn visit_expr(&mut self, expr: &'ast Expr) {
        self.complexity += calculate_expr_complexity(expr);
        visit::walk_expr(self, expr);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::*;

    #[test]
    fn test_no_branches_is_one() {
        let body = block(vec![assign("x", int(1)), expr_stmt(call("fmt.Println", vec![ident("x")]))]);
        assert_eq!(calculate_cyclomatic(&body), 1);
    }

    #[test]
    fn test_empty_body_is_one() {
        assert_eq!(calculate_cyclomatic(&Block::default()), 1);
    }

    #[test]
    fn test_if_with_else_counts_once() {
        let body = block(vec![if_else(ident("ok"), vec![ret()], vec![ret()])]);
        assert_eq!(calculate_cyclomatic(&body), 2);
    }

    #[test]
    fn test_else_if_chain_counts_each_condition() {
        let chain = if_else_if(
            ident("a"),
            vec![ret()],
            if_stmt(ident("b"), vec![ret()]),
        );
        assert_eq!(calculate_cyclomatic(&block(vec![chain])), 3);
    }

    #[test]
    fn test_switch_counts_arms_not_head() {
        let sw = switch(
            Some(ident("v")),
            vec![
                case(vec![int(1)], vec![ret()]),
                case(vec![int(2)], vec![ret()]),
                default_case(vec![ret()]),
            ],
        );
        assert_eq!(calculate_cyclomatic(&block(vec![sw])), 4);
    }

    #[test]
    fn test_select_arms_count() {
        let sel = select(vec![
            comm_recv("msg", ident("in"), vec![ret()]),
            comm_recv_discard(ident("done"), vec![ret()]),
        ]);
        assert_eq!(calculate_cyclomatic(&block(vec![sel])), 3);
    }

    #[test]
    fn test_logical_operators_are_decision_points() {
        let cond = and(ident("a"), or(ident("b"), ident("c")));
        let body = block(vec![if_stmt(cond, vec![ret()])]);
        assert_eq!(calculate_cyclomatic(&body), 4);
    }

    #[test]
    fn test_loops_count() {
        let body = block(vec![
            for_ever(vec![brk()]),
            range_over("item", ident("items"), vec![]),
        ]);
        assert_eq!(calculate_cyclomatic(&body), 3);
    }

    #[test]
    fn test_branches_inside_func_literal_count() {
        let body = block(vec![go_anon(vec![if_stmt(ident("x"), vec![ret()])])]);
        assert_eq!(calculate_cyclomatic(&body), 2);
    }
}
