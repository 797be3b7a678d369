//! Per-image quality scoring.

mod metrics;
mod scorer;
mod thresholds;

pub use metrics::{laplacian_variance, measure, Histogram};
pub use scorer::{QualityScorer, ScoreOutcome};
pub use thresholds::{QualityThresholds, ThresholdPreset};
