//! Engine configuration.
//!
//! Every section has serde defaults, so an empty TOML document is a valid
//! configuration. Locating and reading the configuration file is left to the
//! caller.

mod parallel;
mod thresholds;

pub use parallel::{BatchStrategy, ParallelConfig};
pub use thresholds::{ComplexityThresholds, FactConfig, GraphConfig};

use crate::core::PatternKind;
use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};

/// Pattern detector settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatternConfig {
    /// Instances below this confidence are dropped after scoring.
    #[serde(default)]
    pub min_confidence: f64,

    /// Pattern rules to run.
    #[serde(default = "default_enabled_patterns")]
    pub enabled: Vec<PatternKind>,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.0,
            enabled: default_enabled_patterns(),
        }
    }
}

fn default_enabled_patterns() -> Vec<PatternKind> {
    PatternKind::ALL.to_vec()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub parallel: ParallelConfig,

    #[serde(default)]
    pub thresholds: ComplexityThresholds,

    #[serde(default)]
    pub patterns: PatternConfig,

    #[serde(default)]
    pub facts: FactConfig,

    #[serde(default)]
    pub graph: GraphConfig,
}

impl AnalysisConfig {
    /// Parse and validate a TOML document.
    ///
    /// ```rust
    /// use gomap::config::AnalysisConfig;
    ///
    /// let config = AnalysisConfig::from_toml_str(
    ///     "[graph]\nmodule_path = \"example.com/shop\"\n",
    /// )
    /// .unwrap();
    /// assert_eq!(config.graph.module_path.as_deref(), Some("example.com/shop"));
    /// assert_eq!(config.thresholds.cyclomatic, 10);
    /// ```
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: AnalysisConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.patterns.min_confidence) {
            return Err(Error::Configuration(format!(
                "patterns.min_confidence must be within [0, 1], got {}",
                self.patterns.min_confidence
            )));
        }
        if self.graph.baseline_elements_per_file <= 0.0 {
            return Err(Error::Configuration(
                "graph.baseline_elements_per_file must be positive".to_string(),
            ));
        }
        if self.graph.baseline_dependencies <= 0.0 {
            return Err(Error::Configuration(
                "graph.baseline_dependencies must be positive".to_string(),
            ));
        }
        if self.facts.snippet_max_len < 4 {
            return Err(Error::Configuration(
                "facts.snippet_max_len must leave room for an ellipsis".to_string(),
            ));
        }
        if self.parallel.max_concurrency == Some(0) {
            return Err(Error::Configuration(
                "parallel.max_concurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = AnalysisConfig::from_toml_str("").unwrap();
        assert_eq!(config, AnalysisConfig::default());
        assert_eq!(config.patterns.enabled.len(), 5);
    }

    #[test]
    fn test_partial_sections() {
        let config = AnalysisConfig::from_toml_str(indoc! {r#"
            [patterns]
            min_confidence = 0.7
            enabled = ["WorkerPool", "Semaphore"]

            [parallel]
            enabled = false
        "#})
        .unwrap();

        assert_eq!(config.patterns.min_confidence, 0.7);
        assert_eq!(
            config.patterns.enabled,
            vec![PatternKind::WorkerPool, PatternKind::Semaphore]
        );
        assert!(!config.parallel.enabled);
        assert_eq!(config.parallel.batch_size, Some(100));
        assert_eq!(config.facts.snippet_max_len, 80);
    }

    #[test]
    fn test_out_of_range_confidence_rejected() {
        let err = AnalysisConfig::from_toml_str("[patterns]\nmin_confidence = 1.5\n").unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_zero_baseline_rejected() {
        let err =
            AnalysisConfig::from_toml_str("[graph]\nbaseline_dependencies = 0.0\n").unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_malformed_toml_is_toml_error() {
        let err = AnalysisConfig::from_toml_str("[graph\n").unwrap_err();
        assert!(matches!(err, Error::Toml(_)));
    }
}
