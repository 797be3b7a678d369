//! Routing of unpaired scans to a review directory.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::domain::{PairSet, Side, SkippedFile};
use crate::error::{CurationError, Result};
use crate::ports::FileStore;

/// Source directories for the two sides of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSources {
    pub front: PathBuf,
    pub back: PathBuf,
}

impl DatasetSources {
    /// Front and back scan directories.
    pub fn new(front: impl Into<PathBuf>, back: impl Into<PathBuf>) -> Self {
        Self {
            front: front.into(),
            back: back.into(),
        }
    }

    /// Directory holding the scans of `side`.
    #[must_use]
    pub fn dir(&self, side: Side) -> &Path {
        match side {
            Side::Front => &self.front,
            Side::Back => &self.back,
        }
    }
}

/// What the orphan handler copied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrphanOutcome {
    pub front_copied: usize,
    pub back_copied: usize,
    pub skipped: Vec<SkippedFile>,
}

impl OrphanOutcome {
    /// Orphans copied for `side`.
    #[must_use]
    pub const fn copied(&self, side: Side) -> usize {
        match side {
            Side::Front => self.front_copied,
            Side::Back => self.back_copied,
        }
    }

    /// Orphans copied on both sides.
    #[must_use]
    pub const fn total_copied(&self) -> usize {
        self.front_copied + self.back_copied
    }
}

/// Copies orphans to `review_root/{front,back}/`, leaving the sources in place.
pub struct OrphanHandler<'a> {
    store: &'a dyn FileStore,
    review_root: PathBuf,
}

impl<'a> OrphanHandler<'a> {
    /// Handler copying into `review_root/{front,back}` through `store`.
    pub fn new(store: &'a dyn FileStore, review_root: impl Into<PathBuf>) -> Self {
        Self {
            store,
            review_root: review_root.into(),
        }
    }

    /// Root of the review tree.
    #[must_use]
    pub fn review_root(&self) -> &Path {
        &self.review_root
    }

    /// Copies every orphan of `pairs` into the review directory.
    ///
    /// A failed copy is logged and collected; the remaining orphans are still
    /// copied.
    ///
    /// # Errors
    ///
    /// Returns an error if a review side directory cannot be created.
    pub fn route(&self, pairs: &PairSet, sources: &DatasetSources) -> Result<OrphanOutcome> {
        let mut outcome = OrphanOutcome::default();

        for side in Side::ALL {
            let orphans = pairs.orphans(side);
            if orphans.is_empty() {
                continue;
            }

            let target_dir = self.review_root.join(side.dir_name());
            self.store
                .create_dir_all(&target_dir)
                .map_err(|e| std::io::Error::other(format!("{}: {e:#}", target_dir.display())))?;

            let mut copied = 0;
            for name in orphans {
                let from = sources.dir(side).join(name);
                let to = target_dir.join(name);
                match self.store.copy(&from, &to) {
                    Ok(()) => copied += 1,
                    Err(e) => {
                        let error = CurationError::CopyFailed {
                            from: from.display().to_string(),
                            to: to.display().to_string(),
                            reason: format!("{e:#}"),
                        };
                        warn!("{error}");
                        outcome.skipped.extend(SkippedFile::from_error(&error));
                    }
                }
            }

            match side {
                Side::Front => outcome.front_copied = copied,
                Side::Back => outcome.back_copied = copied,
            }
        }

        info!(
            "Routed orphans to {}: {} front, {} back, {} failed",
            self.review_root.display(),
            outcome.front_copied,
            outcome.back_copied,
            outcome.skipped.len()
        );

        Ok(outcome)
    }
}
