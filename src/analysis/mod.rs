//! Analysis session: drives per-file analysis across a parsed codebase.
//!
//! Files are analyzed independently on rayon's thread pool. Each finished
//! file is merged into the shared dependency graph under a lock, and the
//! graph is only scored and checked for cycles once every file is in.

mod file;

pub use file::{analyze_file, summarize};

use crate::ast::{ParseFailure, SourceFile};
use crate::complexity::ComplexityCalculator;
use crate::config::{AnalysisConfig, BatchStrategy};
use crate::core::{AnalysisOutcome, AnalysisReport, FileAnalysis, FileFailure};
use crate::dependency::DependencyGraphBuilder;
use crate::errors::{Error, Result};
use crate::patterns::PatternDetector;
use parking_lot::Mutex;
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Shared flag for stopping a running session between files.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct AnalysisSession {
    config: AnalysisConfig,
    detector: PatternDetector,
    graph: Mutex<DependencyGraphBuilder>,
    cancellation: CancellationToken,
    files_processed: AtomicUsize,
}

impl AnalysisSession {
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            detector: PatternDetector::new(&config.patterns),
            graph: Mutex::new(DependencyGraphBuilder::new(&config.graph)),
            cancellation: CancellationToken::new(),
            files_processed: AtomicUsize::new(0),
            config,
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Token that cancels this session when triggered from any thread.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Analyze every input and produce the report.
    ///
    /// Parse failures are reported in [`AnalysisReport::failures`] and do not
    /// stop the session. Cancellation discards all partial results.
    pub fn analyze(
        self,
        inputs: Vec<std::result::Result<SourceFile, ParseFailure>>,
    ) -> AnalysisOutcome {
        let mut files = Vec::with_capacity(inputs.len());
        let mut failures = Vec::new();
        for input in inputs {
            match input {
                Ok(file) => files.push(file),
                Err(failure) => {
                    let error = Error::parse(&failure.path, failure.line, failure.message);
                    log::warn!("Skipping file: {}", error);
                    failures.push(FileFailure {
                        path: failure.path,
                        message: error.to_string(),
                    });
                }
            }
        }

        log::info!(
            "Analyzing {} files ({} failed to parse)",
            files.len(),
            failures.len()
        );

        let mut analyses = self.run_files(&files);

        if self.cancellation.is_cancelled() {
            let files_processed = self.files_processed.load(Ordering::SeqCst);
            log::info!("Analysis cancelled after {} files", files_processed);
            return AnalysisOutcome::Cancelled { files_processed };
        }

        analyses.sort_by(|a, b| a.path.cmp(&b.path));
        failures.sort_by(|a, b| a.path.cmp(&b.path));

        let summary = summarize(
            &analyses,
            &ComplexityCalculator::from_thresholds(&self.config.thresholds),
        );
        let dependencies = self.graph.into_inner().generate_report();

        log::info!(
            "Analyzed {} functions across {} packages",
            summary.total_functions,
            dependencies.packages.len()
        );

        AnalysisOutcome::Completed(AnalysisReport {
            files: analyses,
            dependencies,
            summary,
            failures,
        })
    }

    fn run_files(&self, files: &[SourceFile]) -> Vec<FileAnalysis> {
        let parallel = &self.config.parallel;
        let strategy = parallel.strategy(files.len());
        if strategy == BatchStrategy::Sequential {
            return files.iter().filter_map(|f| self.process(f)).collect();
        }

        log::debug!(
            "Using up to {} threads ({:?})",
            parallel.effective_concurrency(),
            strategy
        );
        match parallel.max_concurrency {
            Some(threads) => match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
                Ok(pool) => pool.install(|| self.run_parallel(files, strategy)),
                Err(e) => {
                    log::warn!("Falling back to the global thread pool: {}", e);
                    self.run_parallel(files, strategy)
                }
            },
            None => self.run_parallel(files, strategy),
        }
    }

    fn run_parallel(&self, files: &[SourceFile], strategy: BatchStrategy) -> Vec<FileAnalysis> {
        match strategy {
            BatchStrategy::Chunked(batch_size) => files
                .chunks(batch_size)
                .flat_map(|chunk| {
                    chunk
                        .par_iter()
                        .filter_map(|f| self.process(f))
                        .collect::<Vec<_>>()
                })
                .collect(),
            BatchStrategy::Sequential | BatchStrategy::SingleBatch => {
                files.par_iter().filter_map(|f| self.process(f)).collect()
            }
        }
    }

    /// Analyze one file unless the session has been cancelled.
    fn process(&self, file: &SourceFile) -> Option<FileAnalysis> {
        if self.cancellation.is_cancelled() {
            return None;
        }

        log::debug!("Analyzing {}", file.path.display());
        let analysis = analyze_file(file, &self.config, &self.detector);
        self.graph.lock().analyze_file(file);
        self.files_processed.fetch_add(1, Ordering::SeqCst);
        Some(analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParallelConfig;
    use crate::testkit::*;

    fn inputs(count: usize) -> Vec<std::result::Result<SourceFile, ParseFailure>> {
        (0..count)
            .map(|i| {
                Ok(source_file(
                    &format!("pkg/file{i:02}.go"),
                    "pkg",
                    vec![func_decl(&format!("f{i}"), vec![]).into()],
                ))
            })
            .collect()
    }

    #[test]
    fn test_parallel_and_sequential_agree() {
        let parallel = AnalysisSession::new(AnalysisConfig {
            parallel: ParallelConfig {
                enabled: true,
                max_concurrency: Some(2),
                batch_size: Some(3),
            },
            ..AnalysisConfig::default()
        })
        .unwrap()
        .analyze(inputs(10));

        let sequential = AnalysisSession::new(AnalysisConfig {
            parallel: ParallelConfig::sequential(),
            ..AnalysisConfig::default()
        })
        .unwrap()
        .analyze(inputs(10));

        assert_eq!(parallel, sequential);
        let report = parallel.report().unwrap();
        assert_eq!(report.files.len(), 10);
        assert_eq!(report.files[0].path.to_str(), Some("pkg/file00.go"));
        assert_eq!(report.dependencies.packages[0].files.len(), 10);
    }

    #[test]
    fn test_parse_failures_are_collected() {
        let mut batch = inputs(2);
        batch.push(Err(ParseFailure {
            path: "pkg/broken.go".into(),
            line: Some(4),
            message: "expected '}'".into(),
        }));

        let outcome = AnalysisSession::new(AnalysisConfig::default())
            .unwrap()
            .analyze(batch);
        let report = outcome.report().unwrap();
        assert_eq!(report.files.len(), 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(
            report.failures[0].message,
            "Parse error in pkg/broken.go:4: expected '}'"
        );
    }

    #[test]
    fn test_cancelled_before_start() {
        let session = AnalysisSession::new(AnalysisConfig::default()).unwrap();
        session.cancellation_token().cancel();
        let outcome = session.analyze(inputs(5));
        assert_eq!(outcome, AnalysisOutcome::Cancelled { files_processed: 0 });
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = AnalysisConfig::default();
        config.patterns.min_confidence = -0.1;
        assert!(matches!(
            AnalysisSession::new(config),
            Err(Error::Configuration(_))
        ));
    }
}
