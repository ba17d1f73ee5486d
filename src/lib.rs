//! Structural metrics and concurrency pattern detection for Go codebases.
//!
//! The parser is an external collaborator: callers hand parsed
//! [`SourceFile`]s (or the [`ParseFailure`] for files that did not parse) to
//! an [`AnalysisSession`], which returns an [`AnalysisReport`] with line and
//! complexity metrics per function, concurrency facts and detected patterns
//! per file, and a package dependency graph with its cycles.
//!
//! ```rust
//! use gomap::testkit::*;
//! use gomap::{AnalysisConfig, AnalysisSession};
//!
//! let file = source_file(
//!     "pool.go",
//!     "pool",
//!     vec![func_decl("run", vec![go_call("worker", vec![])]).into()],
//! );
//!
//! let session = AnalysisSession::new(AnalysisConfig::default()).unwrap();
//! let report = session.analyze(vec![Ok(file)]).into_report().unwrap();
//! assert_eq!(report.summary.total_functions, 1);
//! assert_eq!(report.files[0].facts.launches.len(), 1);
//! ```

// Export modules for library usage
pub mod analysis;
pub mod ast;
pub mod complexity;
pub mod concurrency;
pub mod config;
pub mod core;
pub mod dependency;
pub mod errors;
pub mod metrics;
pub mod patterns;
pub mod testkit;

// Re-export commonly used types
pub use crate::core::{
    AnalysisOutcome, AnalysisReport, CalleeKind, ChannelDirection, ChannelFact,
    CircularDependency, ComplexityScore, ComplexitySummary, ConcurrencyFacts, DependencyReport,
    FileAnalysis, FileFailure, FunctionReport, FunctionSignatureFacts, LeakRisk, LineMetrics,
    PackageNode, PatternInstance, PatternKind, RiskLevel, Severity, SyncKind, SyncPrimitiveFact,
    TaskLaunch,
};

pub use crate::analysis::{analyze_file, AnalysisSession, CancellationToken};
pub use crate::ast::{ParseFailure, SourceFile};
pub use crate::complexity::{
    calculate_cyclomatic, calculate_nesting_depth, extract_signature, score_function,
    ComplexityCalculator,
};
pub use crate::concurrency::collect_facts;
pub use crate::config::AnalysisConfig;
pub use crate::dependency::{DependencyGraph, DependencyGraphBuilder, ImportClassifier};
pub use crate::errors::{Error, Result, ResultExt};
pub use crate::metrics::{classify_line, count_lines, count_range, LineKind, LocCounter};
pub use crate::patterns::{PatternDetector, PatternRule};
