pub mod cyclomatic;
pub mod nesting;
pub mod signature;

use crate::ast::FuncDecl;
use crate::config::ComplexityThresholds;
use crate::core::{ComplexityScore, FunctionReport};

pub use cyclomatic::calculate_cyclomatic;
pub use nesting::calculate_nesting_depth;
pub use signature::extract_signature;

/// Complexity score for a function body.
///
/// Cognitive complexity is currently the cyclomatic value; it is reported
/// separately so a richer model can replace it without changing the output
/// shape.
pub fn score_function(func: &FuncDecl) -> ComplexityScore {
    match &func.body {
        Some(body) => {
            let cyclomatic = calculate_cyclomatic(body);
            let cognitive = calculate_cognitive(body);
            ComplexityScore::new(cyclomatic, cognitive, calculate_nesting_depth(body))
        }
        None => ComplexityScore::default(),
    }
}

pub fn calculate_cognitive(body: &crate::ast::Block) -> u32 {
    calculate_cyclomatic(body)
}

#[derive(Clone, Debug)]
pub struct ComplexityCalculator {
    cyclomatic_threshold: u32,
    nesting_threshold: u32,
}

impl ComplexityCalculator {
    pub fn new(cyclomatic_threshold: u32, nesting_threshold: u32) -> Self {
        Self {
            cyclomatic_threshold,
            nesting_threshold,
        }
    }

    pub fn from_thresholds(thresholds: &ComplexityThresholds) -> Self {
        Self::new(thresholds.cyclomatic, thresholds.nesting)
    }

    pub fn is_complex(&self, report: &FunctionReport) -> bool {
        report.complexity.cyclomatic > self.cyclomatic_threshold
            || report.complexity.nesting_depth > self.nesting_threshold
    }
}

pub fn max_complexity(complexities: &[u32]) -> u32 {
    complexities.iter().copied().max().unwrap_or(0)
}

pub fn average_complexity(complexities: &[u32]) -> f64 {
    if complexities.is_empty() {
        return 0.0;
    }
    let sum: u32 = complexities.iter().sum();
    sum as f64 / complexities.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::*;

    #[test]
    fn test_score_function_aliases_cognitive() {
        let func = func_decl(
            "run",
            vec![if_stmt(ident("a"), vec![if_stmt(ident("b"), vec![ret()])])],
        );
        let score = score_function(&func);
        assert_eq!(score.cyclomatic, 3);
        assert_eq!(score.cognitive, score.cyclomatic);
        assert_eq!(score.nesting_depth, 2);
        assert_eq!(score.overall, 3.0 + 2.0 * 0.5 + 3.0 * 0.3);
    }

    #[test]
    fn test_bodyless_function_scores_minimum() {
        let mut func = func_decl("asmStub", vec![]);
        func.body = None;
        assert_eq!(score_function(&func), ComplexityScore::default());
    }

    #[test]
    fn test_average_and_max() {
        assert_eq!(max_complexity(&[3, 9, 2]), 9);
        assert_eq!(max_complexity(&[]), 0);
        assert_eq!(average_complexity(&[2, 4]), 3.0);
        assert_eq!(average_complexity(&[]), 0.0);
    }
}
