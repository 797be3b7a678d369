//! Mock implementations of core port traits.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::bail;
use pairset_core::domain::{ImageInfo, QualityReport};
use pairset_core::error::CurationError;
use pairset_core::ports::{FileStore, ImageSource, ProgressEvent, ProgressSink, ReportStore};

enum MockEntry {
    Image(ImageInfo),
    Unreadable { path: String, reason: String },
}

/// Mock implementation of `ImageSource` for testing.
///
/// Yields pre-built images, optionally interleaved with decode failures,
/// and tracks iteration for assertions.
pub struct MockImageSource {
    entries: Vec<MockEntry>,
    iteration_count: Arc<Mutex<usize>>,
}

impl MockImageSource {
    /// Creates a new mock source with the given images.
    #[must_use]
    pub fn new(images: Vec<ImageInfo>) -> Self {
        Self {
            entries: images.into_iter().map(MockEntry::Image).collect(),
            iteration_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Creates an empty mock source.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Appends an entry that fails to decode.
    #[must_use]
    pub fn with_unreadable(mut self, path: &str) -> Self {
        self.entries.push(MockEntry::Unreadable {
            path: path.to_owned(),
            reason: "unexpected end of file".to_owned(),
        });
        self
    }

    /// Returns the number of times the source has been iterated.
    #[must_use]
    pub fn iteration_count(&self) -> usize {
        *self
            .iteration_count
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl ImageSource for MockImageSource {
    fn images(&self) -> Box<dyn Iterator<Item = Result<ImageInfo, CurationError>> + Send + '_> {
        if let Ok(mut c) = self.iteration_count.lock() {
            *c += 1;
        }
        Box::new(self.entries.iter().map(|entry| match entry {
            MockEntry::Image(info) => Ok(info.clone()),
            MockEntry::Unreadable { path, reason } => Err(CurationError::UnreadableImage {
                path: path.clone(),
                reason: reason.clone(),
            }),
        }))
    }

    fn count_hint(&self) -> Option<usize> {
        Some(self.entries.len())
    }
}

/// Mock implementation of `ProgressSink` for testing.
///
/// Captures events for later assertions.
pub struct MockProgressSink {
    events: Arc<Mutex<Vec<ProgressEvent>>>,
}

impl MockProgressSink {
    /// Creates a new mock progress sink.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns all captured events.
    #[must_use]
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the number of `Started` events.
    #[must_use]
    pub fn started_count(&self) -> usize {
        self.count(|e| matches!(e, ProgressEvent::Started { .. }))
    }

    /// Returns the number of `Scored` events.
    #[must_use]
    pub fn scored_count(&self) -> usize {
        self.count(|e| matches!(e, ProgressEvent::Scored { .. }))
    }

    /// Returns the number of `Skipped` events.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.count(|e| matches!(e, ProgressEvent::Skipped { .. }))
    }

    /// Returns the final counts from the `Finished` event, if any.
    #[must_use]
    pub fn finished_counts(&self) -> Option<(usize, usize)> {
        self.events().iter().find_map(|e| match e {
            ProgressEvent::Finished { processed, skipped } => Some((*processed, *skipped)),
            _ => None,
        })
    }

    fn count(&self, pred: impl Fn(&ProgressEvent) -> bool) -> usize {
        self.events().iter().filter(|e| pred(e)).count()
    }
}

impl Default for MockProgressSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for MockProgressSink {
    fn on_event(&self, event: ProgressEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

#[derive(Default)]
struct FileStoreState {
    files: BTreeSet<PathBuf>,
    dirs: BTreeSet<PathBuf>,
    copies: Vec<(PathBuf, PathBuf)>,
}

/// In-memory `FileStore`.
///
/// Files are paths only; a copy records the pair and makes the destination
/// exist. Sources registered with [`MockFileStore::fail_copy`] always fail.
#[derive(Default)]
pub struct MockFileStore {
    state: Mutex<FileStoreState>,
    failing: Mutex<BTreeSet<PathBuf>>,
}

impl MockFileStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `dir/<name>` for every name.
    #[must_use]
    pub fn with_files(self, dir: impl AsRef<Path>, names: &[&str]) -> Self {
        {
            let mut state = self.lock_state();
            for name in names {
                state.files.insert(dir.as_ref().join(name));
            }
        }
        self
    }

    /// Makes every copy from `path` fail.
    pub fn fail_copy(&self, path: impl Into<PathBuf>) {
        self.failing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.into());
    }

    /// Every successful copy, in call order.
    #[must_use]
    pub fn copies(&self) -> Vec<(PathBuf, PathBuf)> {
        self.lock_state().copies.clone()
    }

    /// Filenames directly inside `dir`.
    #[must_use]
    pub fn files_in(&self, dir: impl AsRef<Path>) -> BTreeSet<String> {
        let dir = dir.as_ref();
        self.lock_state()
            .files
            .iter()
            .filter(|path| path.parent() == Some(dir))
            .filter_map(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect()
    }

    /// Returns true if `dir` was created.
    #[must_use]
    pub fn has_dir(&self, dir: impl AsRef<Path>) -> bool {
        self.lock_state().dirs.contains(dir.as_ref())
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, FileStoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FileStore for MockFileStore {
    fn list_images(&self, dir: &Path) -> anyhow::Result<BTreeSet<String>> {
        Ok(self.files_in(dir))
    }

    fn exists(&self, path: &Path) -> bool {
        self.lock_state().files.contains(path)
    }

    fn create_dir_all(&self, dir: &Path) -> anyhow::Result<()> {
        self.lock_state().dirs.insert(dir.to_path_buf());
        Ok(())
    }

    fn copy(&self, from: &Path, to: &Path) -> anyhow::Result<()> {
        if self
            .failing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(from)
        {
            bail!("permission denied");
        }
        let mut state = self.lock_state();
        if !state.files.contains(from) {
            bail!("no such file: {}", from.display());
        }
        state.files.insert(to.to_path_buf());
        state.copies.push((from.to_path_buf(), to.to_path_buf()));
        Ok(())
    }
}

/// In-memory `ReportStore`.
#[derive(Default)]
pub struct MockReportStore {
    report: Mutex<Option<QualityReport>>,
    save_count: Mutex<usize>,
}

impl MockReportStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that already holds `report`.
    #[must_use]
    pub fn with_report(report: QualityReport) -> Self {
        Self {
            report: Mutex::new(Some(report)),
            save_count: Mutex::new(0),
        }
    }

    /// The last saved report.
    #[must_use]
    pub fn saved(&self) -> Option<QualityReport> {
        self.report
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn save_count(&self) -> usize {
        *self.save_count.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ReportStore for MockReportStore {
    fn load(&self) -> anyhow::Result<QualityReport> {
        match self.saved() {
            Some(report) => Ok(report),
            None => bail!("no report saved"),
        }
    }

    fn save(&self, report: &QualityReport) -> anyhow::Result<()> {
        *self.report.lock().unwrap_or_else(PoisonError::into_inner) = Some(report.clone());
        *self.save_count.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_image_source_empty() {
        let source = MockImageSource::empty();
        assert_eq!(source.count_hint(), Some(0));
        assert_eq!(source.images().count(), 0);
        assert_eq!(source.iteration_count(), 1);
    }

    #[test]
    fn test_mock_image_source_yields_failures() {
        let img = image::DynamicImage::new_luma8(8, 8);
        let source = MockImageSource::new(vec![ImageInfo::new("a.png", img)])
            .with_unreadable("front/broken.jpg");

        let items: Vec<_> = source.images().collect();
        assert_eq!(items.len(), 2);
        assert!(items[0].is_ok());
        assert!(matches!(
            &items[1],
            Err(CurationError::UnreadableImage { path, .. }) if path == "front/broken.jpg"
        ));
    }

    #[test]
    fn test_mock_file_store_copy() {
        let store = MockFileStore::new().with_files("in", &["a.jpg"]);
        store.copy(Path::new("in/a.jpg"), Path::new("out/a.jpg")).unwrap();

        assert!(store.exists(Path::new("out/a.jpg")));
        assert!(store.exists(Path::new("in/a.jpg")));
        assert!(store.copy(Path::new("in/b.jpg"), Path::new("out/b.jpg")).is_err());
        assert_eq!(store.copies().len(), 1);
    }

    #[test]
    fn test_mock_file_store_failing_copy() {
        let store = MockFileStore::new().with_files("in", &["a.jpg"]);
        store.fail_copy("in/a.jpg");
        assert!(store.copy(Path::new("in/a.jpg"), Path::new("out/a.jpg")).is_err());
        assert!(!store.exists(Path::new("out/a.jpg")));
    }

    #[test]
    fn test_mock_report_store() {
        let store = MockReportStore::new();
        assert!(store.load().is_err());

        store.save(&QualityReport::default()).unwrap();
        assert_eq!(store.save_count(), 1);
        assert!(store.load().unwrap().is_empty());
    }
}
