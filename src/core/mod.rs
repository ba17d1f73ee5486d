//! Data model produced by the analysis engine.
//!
//! Every value here is created once from immutable parsed input and never
//! mutated afterwards; the dependency graph builder is the only component
//! that accumulates state, and it freezes into [`PackageNode`] and
//! [`CircularDependency`] values at report time.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::ops::{Add, AddAssign};
use std::path::PathBuf;

/// Line counts for a range of source text.
///
/// The invariant `total == code + comment + blank` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LineMetrics {
    pub total: usize,
    pub code: usize,
    pub comment: usize,
    pub blank: usize,
}

impl LineMetrics {
    pub fn is_consistent(&self) -> bool {
        self.total == self.code + self.comment + self.blank
    }
}

impl Add for LineMetrics {
    type Output = LineMetrics;

    fn add(self, other: LineMetrics) -> LineMetrics {
        LineMetrics {
            total: self.total + other.total,
            code: self.code + other.code,
            comment: self.comment + other.comment,
            blank: self.blank + other.blank,
        }
    }
}

impl AddAssign for LineMetrics {
    fn add_assign(&mut self, other: LineMetrics) {
        *self = *self + other;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComplexityScore {
    pub cyclomatic: u32,
    pub cognitive: u32,
    pub nesting_depth: u32,
    pub overall: f64,
}

impl ComplexityScore {
    pub fn new(cyclomatic: u32, cognitive: u32, nesting_depth: u32) -> Self {
        let cyclomatic = cyclomatic.max(1);
        let overall =
            cyclomatic as f64 + nesting_depth as f64 * 0.5 + cognitive as f64 * 0.3;
        Self {
            cyclomatic,
            cognitive,
            nesting_depth,
            overall,
        }
    }
}

impl Default for ComplexityScore {
    fn default() -> Self {
        Self::new(1, 0, 0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FunctionSignatureFacts {
    pub parameter_count: usize,
    pub return_count: usize,
    pub interface_param_count: usize,
    pub is_variadic: bool,
    pub generic_param_count: usize,
}

impl FunctionSignatureFacts {
    pub fn signature_complexity(&self) -> f64 {
        let variadic = if self.is_variadic { 1.0 } else { 0.0 };
        self.parameter_count as f64 * 0.5
            + self.return_count as f64 * 0.3
            + self.interface_param_count as f64 * 0.8
            + variadic
            + self.generic_param_count as f64 * 1.5
    }
}

/// Metrics for one analyzed function or method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionReport {
    pub name: String,
    pub receiver: Option<String>,
    pub file: PathBuf,
    pub line: usize,
    pub lines: LineMetrics,
    pub complexity: ComplexityScore,
    pub signature: FunctionSignatureFacts,
    pub signature_complexity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CalleeKind {
    Anonymous,
    Named,
    Method,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskLaunch {
    pub file: PathBuf,
    pub line: usize,
    pub callee_kind: CalleeKind,
    pub callee_name: String,
    /// Bounded-length description of an anonymous body; empty otherwise.
    pub context_snippet: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelDirection {
    Bidirectional,
    SendOnly,
    ReceiveOnly,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelFact {
    pub file: PathBuf,
    pub line: usize,
    pub enclosing_function: Option<String>,
    pub element_type: String,
    /// Whether the element type is the zero-size `struct{}`.
    pub unit_element: bool,
    pub buffered: bool,
    pub buffer_size: usize,
    pub direction: ChannelDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SyncKind {
    Mutex,
    RwMutex,
    WaitGroup,
    Once,
    Condvar,
    Atomic,
}

impl fmt::Display for SyncKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncKind::Mutex => "mutex",
            SyncKind::RwMutex => "rwmutex",
            SyncKind::WaitGroup => "waitgroup",
            SyncKind::Once => "once",
            SyncKind::Condvar => "condvar",
            SyncKind::Atomic => "atomic",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncPrimitiveFact {
    pub file: PathBuf,
    pub line: usize,
    pub enclosing_function: Option<String>,
    pub kind: SyncKind,
    pub variable_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Advisory finding: a launched task that may never terminate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeakRisk {
    pub file: PathBuf,
    pub line: usize,
    pub callee_name: String,
    pub level: RiskLevel,
    pub reason: String,
    pub recommendation: String,
}

/// Everything the fact collector found in one file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConcurrencyFacts {
    pub launches: Vec<TaskLaunch>,
    pub channels: Vec<ChannelFact>,
    pub sync_primitives: Vec<SyncPrimitiveFact>,
    pub leak_risks: Vec<LeakRisk>,
}

impl ConcurrencyFacts {
    pub fn is_empty(&self) -> bool {
        self.launches.is_empty() && self.channels.is_empty() && self.sync_primitives.is_empty()
    }

    pub fn has_sync(&self, kind: SyncKind) -> bool {
        self.sync_primitives.iter().any(|fact| fact.kind == kind)
    }

    pub fn unbuffered_channel_count(&self) -> usize {
        self.channels.iter().filter(|ch| !ch.buffered).count()
    }

    /// Fraction of channels that are unbuffered; zero when there are none.
    pub fn unbuffered_ratio(&self) -> f64 {
        if self.channels.is_empty() {
            return 0.0;
        }
        self.unbuffered_channel_count() as f64 / self.channels.len() as f64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PatternKind {
    WorkerPool,
    Pipeline,
    FanOut,
    FanIn,
    Semaphore,
}

impl PatternKind {
    pub const ALL: [PatternKind; 5] = [
        PatternKind::WorkerPool,
        PatternKind::Pipeline,
        PatternKind::FanOut,
        PatternKind::FanIn,
        PatternKind::Semaphore,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PatternKind::WorkerPool => "Worker Pool",
            PatternKind::Pipeline => "Pipeline",
            PatternKind::FanOut => "Fan-Out",
            PatternKind::FanIn => "Fan-In",
            PatternKind::Semaphore => "Semaphore",
        }
    }
}

impl fmt::Display for PatternKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A detected concurrency pattern. Confidence is clamped to `[0, 1]` on
/// construction and the value cannot be modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternInstance {
    kind: PatternKind,
    name: String,
    file: PathBuf,
    line: usize,
    confidence: f64,
    description: String,
    example: String,
}

impl PatternInstance {
    pub fn new(
        kind: PatternKind,
        file: impl Into<PathBuf>,
        line: usize,
        confidence: f64,
        description: impl Into<String>,
        example: impl Into<String>,
    ) -> Self {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        Self {
            kind,
            name: kind.name().to_string(),
            file: file.into(),
            line,
            confidence,
            description: description.into(),
            example: example.into(),
        }
    }

    pub fn kind(&self) -> PatternKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn file(&self) -> &PathBuf {
        &self.file
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn example(&self) -> &str {
        &self.example
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageNode {
    pub name: String,
    pub files: Vec<PathBuf>,
    /// Internal packages this one imports; never contains `name` itself.
    pub internal_dependencies: BTreeSet<String>,
    /// Internal packages importing this one.
    pub dependents: BTreeSet<String>,
    pub function_count: usize,
    pub type_count: usize,
    pub line_count: usize,
    pub cohesion_score: f64,
    pub coupling_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    /// Longer cycles are harder to untangle.
    pub fn for_cycle_length(len: usize) -> Self {
        match len {
            0..=2 => Severity::Low,
            3..=4 => Severity::Medium,
            _ => Severity::High,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircularDependency {
    pub cycle_path: Vec<String>,
    pub severity: Severity,
}

impl CircularDependency {
    pub fn new(cycle_path: Vec<String>) -> Self {
        let severity = Severity::for_cycle_length(cycle_path.len());
        Self {
            cycle_path,
            severity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyReport {
    pub packages: Vec<PackageNode>,
    pub cycles: Vec<CircularDependency>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ComplexitySummary {
    pub total_functions: usize,
    pub average_cyclomatic: f64,
    pub max_cyclomatic: u32,
    pub max_nesting_depth: u32,
    pub high_complexity_count: usize,
    pub lines: LineMetrics,
}

/// Per-file results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileAnalysis {
    pub path: PathBuf,
    pub package: String,
    pub lines: LineMetrics,
    pub functions: Vec<FunctionReport>,
    pub facts: ConcurrencyFacts,
    pub patterns: Vec<PatternInstance>,
    /// Declarations or functions that were skipped as unanalyzable.
    pub skipped: Vec<String>,
}

/// A file that could not be analyzed at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub files: Vec<FileAnalysis>,
    pub dependencies: DependencyReport,
    pub summary: ComplexitySummary,
    pub failures: Vec<FileFailure>,
}

impl AnalysisReport {
    pub fn functions(&self) -> impl Iterator<Item = &FunctionReport> {
        self.files.iter().flat_map(|file| file.functions.iter())
    }

    pub fn patterns(&self) -> impl Iterator<Item = &PatternInstance> {
        self.files.iter().flat_map(|file| file.patterns.iter())
    }
}

/// Terminal state of an analysis session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AnalysisOutcome {
    Completed(AnalysisReport),
    Cancelled { files_processed: usize },
}

impl AnalysisOutcome {
    pub fn report(&self) -> Option<&AnalysisReport> {
        match self {
            AnalysisOutcome::Completed(report) => Some(report),
            AnalysisOutcome::Cancelled { .. } => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, AnalysisOutcome::Cancelled { .. })
    }

    /// The report, or [`Error::Cancelled`] when the session was stopped.
    pub fn into_report(self) -> Result<AnalysisReport> {
        match self {
            AnalysisOutcome::Completed(report) => Ok(report),
            AnalysisOutcome::Cancelled { files_processed } => {
                Err(Error::Cancelled { files_processed })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overall_score_formula() {
        let score = ComplexityScore::new(4, 4, 2);
        assert_eq!(score.overall, 4.0 + 2.0 * 0.5 + 4.0 * 0.3);
    }

    #[test]
    fn test_cyclomatic_floor_is_one() {
        assert_eq!(ComplexityScore::new(0, 0, 0).cyclomatic, 1);
    }

    #[test]
    fn test_signature_complexity_formula() {
        let facts = FunctionSignatureFacts {
            parameter_count: 2,
            return_count: 1,
            interface_param_count: 0,
            is_variadic: false,
            generic_param_count: 1,
        };
        assert!((facts.signature_complexity() - 2.8).abs() < 1e-9);
    }

    #[test]
    fn test_pattern_confidence_clamped() {
        let high = PatternInstance::new(PatternKind::Semaphore, "a.go", 1, 1.7, "", "");
        let low = PatternInstance::new(PatternKind::Semaphore, "a.go", 1, -0.2, "", "");
        let nan = PatternInstance::new(PatternKind::Semaphore, "a.go", 1, f64::NAN, "", "");
        assert_eq!(high.confidence(), 1.0);
        assert_eq!(low.confidence(), 0.0);
        assert_eq!(nan.confidence(), 0.0);
        assert_eq!(high.name(), "Semaphore");
    }

    #[test]
    fn test_severity_boundaries() {
        assert_eq!(Severity::for_cycle_length(1), Severity::Low);
        assert_eq!(Severity::for_cycle_length(2), Severity::Low);
        assert_eq!(Severity::for_cycle_length(3), Severity::Medium);
        assert_eq!(Severity::for_cycle_length(4), Severity::Medium);
        assert_eq!(Severity::for_cycle_length(5), Severity::High);
    }

    #[test]
    fn test_line_metrics_addition_keeps_invariant() {
        let a = LineMetrics {
            total: 3,
            code: 1,
            comment: 1,
            blank: 1,
        };
        let mut b = LineMetrics {
            total: 2,
            code: 2,
            comment: 0,
            blank: 0,
        };
        b += a;
        assert_eq!(b.total, 5);
        assert!(b.is_consistent());
    }

    #[test]
    fn test_unbuffered_ratio_empty() {
        assert_eq!(ConcurrencyFacts::default().unbuffered_ratio(), 0.0);
    }
}
