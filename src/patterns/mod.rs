//! Concurrency pattern detection.
//!
//! Rules score a file's [`ConcurrencyFacts`] independently; the
//! [`PatternDetector`] runs the enabled ones, drops low-confidence results
//! and orders the rest by line.

pub mod rules;
pub mod signals;

pub use rules::{builtin_rules, rule_for, PatternRule};

use crate::config::PatternConfig;
use crate::core::{ConcurrencyFacts, PatternInstance};
use std::path::Path;

pub struct PatternDetector {
    rules: Vec<Box<dyn PatternRule>>,
    min_confidence: f64,
}

impl PatternDetector {
    pub fn new(config: &PatternConfig) -> Self {
        let rules = builtin_rules()
            .into_iter()
            .filter(|rule| config.enabled.contains(&rule.kind()))
            .collect();
        Self::with_rules(rules, config.min_confidence)
    }

    pub fn with_rules(rules: Vec<Box<dyn PatternRule>>, min_confidence: f64) -> Self {
        Self {
            rules,
            min_confidence,
        }
    }

    pub fn detect(&self, file: &Path, facts: &ConcurrencyFacts) -> Vec<PatternInstance> {
        if facts.is_empty() {
            return Vec::new();
        }

        let mut instances: Vec<PatternInstance> = self
            .rules
            .iter()
            .flat_map(|rule| rule.evaluate(file, facts))
            .filter(|instance| instance.confidence() >= self.min_confidence)
            .collect();
        instances.sort_by_key(|instance| (instance.line(), instance.kind()));

        log::debug!(
            "{}: {} pattern(s) detected",
            file.display(),
            instances.len()
        );
        instances
    }
}

impl Default for PatternDetector {
    fn default() -> Self {
        Self::new(&PatternConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FactConfig;
    use crate::concurrency::collect_facts;
    use crate::core::PatternKind;
    use crate::testkit::*;

    fn pool_file() -> crate::ast::SourceFile {
        source_file(
            "pool.go",
            "pool",
            vec![func_decl(
                "run",
                vec![
                    at(2, var_stmt("wg", Some(qty("sync", "WaitGroup")), None)),
                    at(3, assign("jobs", make_chan(ty("int"), None))),
                    at(4, go_call("worker", vec![ident("jobs")])),
                    at(5, go_call("worker", vec![ident("jobs")])),
                    at(6, go_call("worker", vec![ident("jobs")])),
                    at(7, go_call("worker", vec![ident("jobs")])),
                ],
            )
            .into()],
        )
    }

    #[test]
    fn test_detects_and_orders_by_line() {
        let file = pool_file();
        let facts = collect_facts(&file, &FactConfig::default());
        let instances = PatternDetector::default().detect(&file.path, &facts);

        let found: Vec<_> = instances.iter().map(|i| (i.line(), i.kind())).collect();
        assert_eq!(
            found,
            vec![
                (3, PatternKind::FanIn),
                (4, PatternKind::WorkerPool),
                (4, PatternKind::FanOut),
            ]
        );
    }

    #[test]
    fn test_enabled_filter() {
        let file = pool_file();
        let facts = collect_facts(&file, &FactConfig::default());
        let config = PatternConfig {
            enabled: vec![PatternKind::WorkerPool],
            ..PatternConfig::default()
        };
        let instances = PatternDetector::new(&config).detect(&file.path, &facts);
        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0].kind(), PatternKind::WorkerPool);
    }

    #[test]
    fn test_min_confidence_filter() {
        let file = pool_file();
        let facts = collect_facts(&file, &FactConfig::default());
        let config = PatternConfig {
            min_confidence: 0.95,
            ..PatternConfig::default()
        };
        let instances = PatternDetector::new(&config).detect(&file.path, &facts);
        assert!(instances.iter().all(|i| i.confidence() >= 0.95));
        assert!(instances.iter().any(|i| i.kind() == PatternKind::WorkerPool));
    }

    #[test]
    fn test_empty_facts_yield_nothing() {
        let detector = PatternDetector::default();
        let instances = detector.detect(Path::new("a.go"), &ConcurrencyFacts::default());
        assert!(instances.is_empty());
    }
}
