//! Error types for dataset curation.

use thiserror::Error;

use crate::domain::Split;

/// Errors raised while curating a dataset.
///
/// Per-file variants (`UnreadableImage`, `MissingPairFile`, `CopyFailed`) are
/// recovered by the component that raises them and recorded as a
/// [`SkippedFile`](crate::domain::SkippedFile). The remaining variants abort the run.
#[derive(Debug, Error)]
pub enum CurationError {
    /// An image could not be opened or decoded.
    #[error("cannot decode image {path}: {reason}")]
    UnreadableImage {
        /// Path of the offending file.
        path: String,
        /// Decoder message.
        reason: String,
    },

    /// A filename assigned to a split has no source file.
    #[error("source file {path} assigned to {split} does not exist")]
    MissingPairFile {
        /// Expected source path.
        path: String,
        /// Split the file was assigned to.
        split: Split,
    },

    /// Copying a file failed.
    #[error("failed to copy {from} to {to}: {reason}")]
    CopyFailed {
        /// Source path.
        from: String,
        /// Destination path.
        to: String,
        /// Underlying error message.
        reason: String,
    },

    /// Invalid thresholds, ratios or paths.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The quality report could not be parsed.
    #[error("malformed quality report: {0}")]
    Report(String),

    /// Filesystem failure outside a single file's processing.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CurationError {
    /// Shorthand for a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Returns true for errors that only affect a single file.
    #[must_use]
    pub const fn is_per_file(&self) -> bool {
        matches!(
            self,
            Self::UnreadableImage { .. } | Self::MissingPairFile { .. } | Self::CopyFailed { .. }
        )
    }
}

/// Result alias for curation operations.
pub type Result<T> = std::result::Result<T, CurationError>;
