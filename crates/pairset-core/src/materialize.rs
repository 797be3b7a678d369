//! Writes a split assignment to the `{split}/{front,back}` dataset layout.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::{Side, SkippedFile, Split, SplitAssignment, SplitCounts};
use crate::error::{CurationError, Result};
use crate::orphans::DatasetSources;
use crate::ports::FileStore;

/// What the materializer copied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MaterializeOutcome {
    /// Pairs whose front and back were both copied, per split.
    pub pairs: SplitCounts,
    pub skipped: Vec<SkippedFile>,
}

impl MaterializeOutcome {
    /// Pairs copied across all splits.
    #[must_use]
    pub const fn total_pairs(&self) -> usize {
        self.pairs.train + self.pairs.val + self.pairs.test
    }
}

/// Copies assigned pairs into `output_root`.
pub struct DatasetMaterializer<'a> {
    store: &'a dyn FileStore,
    output_root: PathBuf,
}

impl<'a> DatasetMaterializer<'a> {
    pub fn new(store: &'a dyn FileStore, output_root: impl Into<PathBuf>) -> Self {
        Self {
            store,
            output_root: output_root.into(),
        }
    }

    /// Root of the dataset tree.
    #[must_use]
    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Destination directory of one split and side.
    #[must_use]
    pub fn target_dir(&self, split: Split, side: Side) -> PathBuf {
        self.output_root.join(split.as_str()).join(side.dir_name())
    }

    /// Creates every split directory, then copies both files of each
    /// assigned pair.
    ///
    /// Missing or uncopyable files are logged and collected; the assignment
    /// itself is never altered.
    ///
    /// # Errors
    ///
    /// Returns an error if an output directory cannot be created.
    pub fn materialize(
        &self,
        assignment: &SplitAssignment,
        sources: &DatasetSources,
    ) -> Result<MaterializeOutcome> {
        for split in Split::ALL {
            for side in Side::ALL {
                let dir = self.target_dir(split, side);
                self.store
                    .create_dir_all(&dir)
                    .map_err(|e| std::io::Error::other(format!("{}: {e:#}", dir.display())))?;
            }
        }

        let mut outcome = MaterializeOutcome::default();

        for (name, split) in assignment.iter() {
            let mut complete = true;
            for side in Side::ALL {
                if let Err(error) = self.copy_one(name, split, side, sources) {
                    warn!("{error}");
                    outcome.skipped.extend(SkippedFile::from_error(&error));
                    complete = false;
                }
            }
            if complete {
                debug!("{name} -> {split}");
                *outcome.pairs.get_mut(split) += 1;
            }
        }

        info!(
            "Materialized {} pairs into {}: train={} val={} test={}, {} files skipped",
            outcome.total_pairs(),
            self.output_root.display(),
            outcome.pairs.train,
            outcome.pairs.val,
            outcome.pairs.test,
            outcome.skipped.len()
        );

        Ok(outcome)
    }

    fn copy_one(
        &self,
        name: &str,
        split: Split,
        side: Side,
        sources: &DatasetSources,
    ) -> Result<()> {
        let from = sources.dir(side).join(name);
        if !self.store.exists(&from) {
            return Err(CurationError::MissingPairFile {
                path: from.display().to_string(),
                split,
            });
        }

        let to = self.target_dir(split, side).join(name);
        self.store
            .copy(&from, &to)
            .map_err(|e| CurationError::CopyFailed {
                from: from.display().to_string(),
                to: to.display().to_string(),
                reason: format!("{e:#}"),
            })
    }
}
