//! Port definitions for hexagonal architecture.
//!
//! These traits define the boundaries between the domain core and external adapters.

mod file_store;
mod image_source;
mod progress;
mod report_store;

pub use file_store::FileStore;
pub use image_source::ImageSource;
pub use progress::{NoProgress, ProgressEvent, ProgressSink};
pub use report_store::ReportStore;
