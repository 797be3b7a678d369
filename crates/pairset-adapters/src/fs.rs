//! Filesystem adapters for scan directories.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pairset_core::error::CurationError;
use pairset_core::ports::FileStore;
use pairset_core::{ImageInfo, ImageSource, SkippedFile};
use tracing::{debug, warn};

/// Supported image extensions.
pub const RASTER_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tiff", "tif", "webp", "bmp", "gif"];

/// Reason recorded for images whose filename cannot be used as a pairing key.
pub const NON_UTF8_REASON: &str = "file name is not valid UTF-8";

/// Image files directly inside a directory.
struct Listing {
    /// UTF-8 filenames, sorted.
    names: BTreeSet<String>,
    /// Image files whose name is not valid UTF-8.
    unkeyed: Vec<PathBuf>,
}

fn scan_dir(dir: &Path) -> Result<Listing> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?;

    let mut listing = Listing {
        names: BTreeSet::new(),
        unkeyed: Vec::new(),
    };
    for entry in entries {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!("Failed to read entry in {}: {e}", dir.display());
                continue;
            }
        };
        let path = entry.path();
        if !path.is_file() || !is_supported_image(&path) {
            continue;
        }
        match path.file_name().and_then(|n| n.to_str()) {
            Some(name) => {
                listing.names.insert(name.to_owned());
            }
            None => {
                warn!("Skipping {}: {NON_UTF8_REASON}", path.display());
                listing.unkeyed.push(path);
            }
        }
    }
    listing.unkeyed.sort();

    debug!(
        "Found {} images in {} ({} with non UTF-8 names)",
        listing.names.len(),
        dir.display(),
        listing.unkeyed.len()
    );
    Ok(listing)
}

/// Lists image filenames directly inside `dir`, sorted.
///
/// Subdirectories and files with other extensions are ignored. Images whose
/// name is not valid UTF-8 are left out; see [`unkeyed_images`].
///
/// # Errors
///
/// Returns an error if `dir` cannot be read.
pub fn list_images(dir: &Path) -> Result<BTreeSet<String>> {
    Ok(scan_dir(dir)?.names)
}

/// Images in `dir` that [`list_images`] leaves out because their name is not
/// valid UTF-8, as skip entries for the run summary.
///
/// # Errors
///
/// Returns an error if `dir` cannot be read.
pub fn unkeyed_images(dir: &Path) -> Result<Vec<SkippedFile>> {
    Ok(scan_dir(dir)?
        .unkeyed
        .iter()
        .filter_map(|path| SkippedFile::from_error(&non_utf8_error(path)))
        .collect())
}

fn non_utf8_error(path: &Path) -> CurationError {
    CurationError::UnreadableImage {
        path: path.display().to_string(),
        reason: NON_UTF8_REASON.to_owned(),
    }
}

/// Image source over one scan directory, decoded in filename order.
///
/// Images with non UTF-8 names come last, each as an
/// [`CurationError::UnreadableImage`].
pub struct FsImageSource {
    dir: PathBuf,
    names: Vec<String>,
    unkeyed: Vec<PathBuf>,
}

impl FsImageSource {
    /// Lists `dir` up front; decoding happens lazily during iteration.
    ///
    /// # Errors
    ///
    /// Returns an error if `dir` cannot be read.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        let listing = scan_dir(&dir)?;
        Ok(Self {
            dir,
            names: listing.names.into_iter().collect(),
            unkeyed: listing.unkeyed,
        })
    }

    /// Directory this source lists.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ImageSource for FsImageSource {
    fn images(&self) -> Box<dyn Iterator<Item = Result<ImageInfo, CurationError>> + Send + '_> {
        let decoded = self
            .names
            .iter()
            .map(|name| load_image(&self.dir.join(name)));
        let unkeyed = self.unkeyed.iter().map(|path| Err(non_utf8_error(path)));
        Box::new(decoded.chain(unkeyed))
    }

    fn count_hint(&self) -> Option<usize> {
        Some(self.names.len() + self.unkeyed.len())
    }
}

/// Checks if a path has a supported image extension.
fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .is_some_and(|e| RASTER_EXTENSIONS.contains(&e.as_str()))
}

/// Loads an image from the filesystem.
fn load_image(path: &Path) -> Result<ImageInfo, CurationError> {
    let image = image::open(path).map_err(|e| CurationError::UnreadableImage {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    Ok(ImageInfo::new(path.to_string_lossy(), image))
}

/// `FileStore` backed by the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsFileStore;

impl FileStore for FsFileStore {
    fn list_images(&self, dir: &Path) -> Result<BTreeSet<String>> {
        list_images(dir)
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn create_dir_all(&self, dir: &Path) -> Result<()> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))
    }

    fn copy(&self, from: &Path, to: &Path) -> Result<()> {
        std::fs::copy(from, to).with_context(|| {
            format!("Failed to copy {} to {}", from.display(), to.display())
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_supported_image() {
        assert!(is_supported_image(Path::new("scan.jpg")));
        assert!(is_supported_image(Path::new("scan.JPEG")));
        assert!(is_supported_image(Path::new("scan.png")));
        assert!(is_supported_image(Path::new("scan.TIF")));
        assert!(!is_supported_image(Path::new("scan.cr2")));
        assert!(!is_supported_image(Path::new("notes.txt")));
        assert!(!is_supported_image(Path::new("scan")));
    }
}
