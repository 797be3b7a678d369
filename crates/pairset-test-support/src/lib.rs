//! Test support utilities for pairset.
//!
//! Provides synthetic document scans and in-memory implementations of the
//! core ports.
//!
//! # Example
//!
//! ```
//! use pairset_test_support::{MockFileStore, MockImageSource, ScanBuilder};
//!
//! let source = MockImageSource::new(vec![
//!     ScanBuilder::document_page("A.png"),
//!     ScanBuilder::blank_page("B.png", 255),
//! ]);
//! let store = MockFileStore::new().with_files("raw/back", &["A.png", "B.png"]);
//! ```

mod builders;
mod mocks;

pub use builders::ScanBuilder;
pub use mocks::{MockFileStore, MockImageSource, MockProgressSink, MockReportStore};
