//! Result and error types for Cubrir.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for Cubrir operations
pub type CoverageResult<T> = Result<T, CoverageError>;

/// Errors that can occur while combining or rendering coverage data
#[derive(Debug, Error)]
pub enum CoverageError {
    /// No partial coverage records matched the artifact pattern.
    ///
    /// An empty report is never silently produced.
    #[error("No coverage records matching `{pattern}` found in {}", directory.display())]
    NoDataFound {
        /// Artifact filename pattern that matched nothing
        pattern: String,
        /// Directory that was searched
        directory: PathBuf,
    },

    /// A partial coverage record is unreadable, corrupt, or inconsistent
    #[error("Malformed coverage record {}: {reason}", path.display())]
    MalformedRecord {
        /// Record that failed to load
        path: PathBuf,
        /// What was wrong with it
        reason: String,
    },

    /// Report rendering failed (internal, not expected on valid datasets)
    #[error("Render failed: {message}")]
    RenderFailure {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoverageError {
    /// Create a malformed-record error
    #[must_use]
    pub fn malformed(path: &Path, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Create a render failure error
    #[must_use]
    pub fn render(message: impl Into<String>) -> Self {
        Self::RenderFailure {
            message: message.into(),
        }
    }
}
