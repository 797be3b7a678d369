//! File store port used to populate the dataset and review directories.

use std::collections::BTreeSet;
use std::path::Path;

/// Port for the file operations the curation stages need.
///
/// Copies never remove their source.
pub trait FileStore: Send + Sync {
    /// Image filenames directly inside `dir`, sorted.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be read.
    fn list_images(&self, dir: &Path) -> anyhow::Result<BTreeSet<String>>;

    /// Returns true if `path` is an existing file.
    fn exists(&self, path: &Path) -> bool;

    /// Creates `dir` and any missing parents.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    fn create_dir_all(&self, dir: &Path) -> anyhow::Result<()>;

    /// Copies `from` to `to`, overwriting `to`.
    ///
    /// # Errors
    ///
    /// Returns an error if the copy fails.
    fn copy(&self, from: &Path, to: &Path) -> anyhow::Result<()>;
}
