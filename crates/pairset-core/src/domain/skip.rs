//! Files skipped during a run.

use serde::Serialize;

use crate::error::CurationError;

/// Why a file was skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipKind {
    UnreadableImage,
    MissingPairFile,
    CopyFailed,
}

/// A file left out of a run, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    /// Path of the file that was skipped.
    pub path: String,
    /// Error category.
    pub kind: SkipKind,
    /// Human-readable reason.
    pub reason: String,
}

impl SkippedFile {
    /// Converts a per-file error into a skip entry.
    ///
    /// Returns `None` for errors that are not scoped to a single file.
    #[must_use]
    pub fn from_error(error: &CurationError) -> Option<Self> {
        let (path, kind) = match error {
            CurationError::UnreadableImage { path, .. } => (path, SkipKind::UnreadableImage),
            CurationError::MissingPairFile { path, .. } => (path, SkipKind::MissingPairFile),
            CurationError::CopyFailed { from, .. } => (from, SkipKind::CopyFailed),
            _ => return None,
        };
        Some(Self {
            path: path.clone(),
            kind,
            reason: error.to_string(),
        })
    }
}
