//! Image source port for loading front scans.

use crate::domain::ImageInfo;
use crate::error::CurationError;

/// Port for loading images from a source.
pub trait ImageSource: Send + Sync {
    /// Returns an iterator over images from this source, in filename order.
    ///
    /// Images are decoded lazily, one per `next()`.
    ///
    /// # Errors
    ///
    /// Individual items are [`CurationError::UnreadableImage`] when a file
    /// fails to decode.
    fn images(&self) -> Box<dyn Iterator<Item = Result<ImageInfo, CurationError>> + Send + '_>;

    /// Returns the total number of images, if known.
    fn count_hint(&self) -> Option<usize>;
}
