//! Core domain types for dataset curation.

mod image_info;
mod pair_set;
mod record;
mod report;
mod skip;
mod split;

pub use image_info::ImageInfo;
pub use pair_set::{PairSet, Side};
pub use record::{ImageRecord, Quality, QualityMetrics};
pub use report::{QualityReport, ReportStats};
pub use skip::{SkipKind, SkippedFile};
pub use split::{Split, SplitAssignment, SplitCounts};
