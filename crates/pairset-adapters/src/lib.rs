//! pairset adapters - filesystem and report storage.
//!
//! This crate provides adapters for:
//! - Scan directories as an image source and file store
//! - The CSV quality report

pub mod fs;
pub mod report;

pub use fs::{
    list_images, unkeyed_images, FsFileStore, FsImageSource, NON_UTF8_REASON, RASTER_EXTENSIONS,
};
pub use report::{build_report, parse_report, CsvReportStore};
