//! Shared error types for the analysis engine

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for gomap operations
#[derive(Debug, Error)]
pub enum Error {
    /// The parser collaborator rejected a file
    #[error("Parse error in {file}{}: {message}", .line.map(|l| format!(":{l}")).unwrap_or_default())]
    Parse {
        file: PathBuf,
        line: Option<usize>,
        message: String,
    },

    /// Analysis errors
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The session was cancelled between files
    #[error("Analysis cancelled after {files_processed} files")]
    Cancelled { files_processed: usize },

    /// Generic errors with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },

    /// TOML configuration errors
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl Error {
    /// Create a parse error with location
    pub fn parse(file: impl Into<PathBuf>, line: Option<usize>, message: impl Into<String>) -> Self {
        Self::Parse {
            file: file.into(),
            line,
            message: message.into(),
        }
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            message: self.to_string(),
        }
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display_with_line() {
        let err = Error::parse("pkg/worker.go", Some(12), "unexpected token");
        assert_eq!(
            err.to_string(),
            "Parse error in pkg/worker.go:12: unexpected token"
        );
    }

    #[test]
    fn test_parse_error_display_without_line() {
        let err = Error::parse("pkg/worker.go", None, "empty file");
        assert_eq!(err.to_string(), "Parse error in pkg/worker.go: empty file");
    }

    #[test]
    fn test_context_wraps_message() {
        let result: Result<()> = Err(Error::Configuration("bad value".into()));
        let err = result.context("loading thresholds").unwrap_err();
        assert_eq!(
            err.to_string(),
            "loading thresholds: Configuration error: bad value"
        );
    }
}
