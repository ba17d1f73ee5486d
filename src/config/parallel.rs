//! How a session spreads files over rayon workers.

use serde::{Deserialize, Serialize};

const FILES_PER_BATCH: usize = 100;

fn parallel_by_default() -> bool {
    true
}

fn default_batch_size() -> Option<usize> {
    Some(FILES_PER_BATCH)
}

/// Worker settings for an [`AnalysisSession`](crate::AnalysisSession).
///
/// Files within a batch run concurrently; batches run one after another.
/// Cancellation is checked per file, so a cancelled session finishes at most
/// the files already handed to workers.
///
/// ```rust
/// use gomap::config::{BatchStrategy, ParallelConfig};
///
/// let config = ParallelConfig {
///     enabled: true,
///     max_concurrency: Some(4),
///     batch_size: Some(50),
/// };
/// assert_eq!(config.strategy(120), BatchStrategy::Chunked(50));
/// assert_eq!(config.strategy(30), BatchStrategy::SingleBatch);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParallelConfig {
    /// Analyze files on worker threads. `false` runs everything on the caller.
    #[serde(default = "parallel_by_default")]
    pub enabled: bool,

    /// Size of a dedicated thread pool; `None` uses rayon's global pool.
    #[serde(default)]
    pub max_concurrency: Option<usize>,

    #[serde(default = "default_batch_size")]
    pub batch_size: Option<usize>,
}

/// Scheduling chosen for a given number of parsed files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStrategy {
    Sequential,
    SingleBatch,
    Chunked(usize),
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            enabled: parallel_by_default(),
            max_concurrency: None,
            batch_size: default_batch_size(),
        }
    }
}

impl ParallelConfig {
    pub fn sequential() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }

    /// Threads the session will use: the configured pool size, or every
    /// available core.
    pub fn effective_concurrency(&self) -> usize {
        self.max_concurrency.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|cores| cores.get())
                .unwrap_or(1)
        })
    }

    /// Files per batch, never below one.
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.unwrap_or(FILES_PER_BATCH).max(1)
    }

    /// Pick a schedule for `file_count` files.
    ///
    /// A single file never pays for a parallel dispatch.
    pub fn strategy(&self, file_count: usize) -> BatchStrategy {
        if !self.enabled || file_count <= 1 {
            return BatchStrategy::Sequential;
        }
        let batch_size = self.effective_batch_size();
        if file_count <= batch_size {
            BatchStrategy::SingleBatch
        } else {
            BatchStrategy::Chunked(batch_size)
        }
    }
}
