//! pairset core - domain types, ports and curation stages
//!
//! Scores front scans, reconciles fronts with backs, splits the valid pairs
//! into train/val/test and materializes the result. Filesystem access goes
//! through the [`ports`] traits so every stage runs against in-memory mocks.

pub mod domain;
pub mod error;
pub mod materialize;
pub mod orphans;
pub mod pairing;
pub mod ports;
pub mod scoring;
pub mod splitting;

pub use domain::{
    ImageInfo, ImageRecord, PairSet, Quality, QualityMetrics, QualityReport, ReportStats, Side,
    SkipKind, SkippedFile, Split, SplitAssignment, SplitCounts,
};
pub use error::{CurationError, Result};
pub use materialize::{DatasetMaterializer, MaterializeOutcome};
pub use orphans::{DatasetSources, OrphanHandler, OrphanOutcome};
pub use pairing::PairValidator;
pub use ports::{FileStore, ImageSource, NoProgress, ProgressEvent, ProgressSink, ReportStore};
pub use scoring::{QualityScorer, QualityThresholds, ScoreOutcome, ThresholdPreset};
pub use splitting::{SplitConfig, SplitPolicy, SplitRatios, Splitter, StratifiedRatios};
