use serde::{Deserialize, Serialize};

/// Limits above which a function counts as highly complex in the summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComplexityThresholds {
    #[serde(default = "default_max_cyclomatic")]
    pub cyclomatic: u32,

    #[serde(default = "default_max_nesting")]
    pub nesting: u32,
}

impl Default for ComplexityThresholds {
    fn default() -> Self {
        Self {
            cyclomatic: default_max_cyclomatic(),
            nesting: default_max_nesting(),
        }
    }
}

fn default_max_cyclomatic() -> u32 {
    10
}
fn default_max_nesting() -> u32 {
    4
}

/// Fact collection settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FactConfig {
    /// Longest context snippet captured for an anonymous task launch.
    #[serde(default = "default_snippet_max_len")]
    pub snippet_max_len: usize,

    /// Run the task-leak heuristic.
    #[serde(default = "default_detect_leaks")]
    pub detect_leaks: bool,
}

impl Default for FactConfig {
    fn default() -> Self {
        Self {
            snippet_max_len: default_snippet_max_len(),
            detect_leaks: default_detect_leaks(),
        }
    }
}

fn default_snippet_max_len() -> usize {
    80
}
fn default_detect_leaks() -> bool {
    true
}

/// Dependency graph scoring settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphConfig {
    /// Module root; imports under it are internal.
    #[serde(default)]
    pub module_path: Option<String>,

    /// Functions plus types per file that earns a full cohesion score.
    #[serde(default = "default_baseline_elements_per_file")]
    pub baseline_elements_per_file: f64,

    /// Internal dependency count that earns a full coupling score.
    #[serde(default = "default_baseline_dependencies")]
    pub baseline_dependencies: f64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            module_path: None,
            baseline_elements_per_file: default_baseline_elements_per_file(),
            baseline_dependencies: default_baseline_dependencies(),
        }
    }
}

fn default_baseline_elements_per_file() -> f64 {
    5.0
}
fn default_baseline_dependencies() -> f64 {
    10.0
}
