//! Per-image quality records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CurationError;
use crate::scoring::QualityThresholds;

/// Binary quality label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    /// Passes every configured threshold.
    Good,
    /// Fails at least one threshold.
    Poor,
}

impl Quality {
    /// Both strata, in the order they are split.
    pub const ALL: [Self; 2] = [Self::Good, Self::Poor];

    /// Report spelling of the label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Poor => "poor",
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Quality {
    type Err = CurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "good" => Ok(Self::Good),
            "poor" => Ok(Self::Poor),
            other => Err(CurationError::Report(format!(
                "unknown quality label '{other}', expected 'good' or 'poor'"
            ))),
        }
    }
}

/// Grayscale statistics used to gate image quality.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
    /// Variance of the Laplacian response. Lower is blurrier.
    pub blur_score: f64,
    /// Mean grayscale intensity (0-255).
    pub brightness: f64,
    /// Standard deviation of grayscale intensity. Absent in reports written
    /// without a contrast column.
    pub contrast: Option<f64>,
}

/// Quality record for one scanned image.
///
/// The label is derived from the metrics and a threshold set; it can only be
/// produced by [`ImageRecord::score`], [`ImageRecord::reclassify`] or restored
/// from a persisted report with [`ImageRecord::restore`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageRecord {
    filename: String,
    width: u32,
    height: u32,
    #[serde(flatten)]
    metrics: QualityMetrics,
    quality: Quality,
}

impl ImageRecord {
    /// Builds a record, labelling it with `thresholds`.
    #[must_use]
    pub fn score(
        filename: impl Into<String>,
        width: u32,
        height: u32,
        metrics: QualityMetrics,
        thresholds: &QualityThresholds,
    ) -> Self {
        Self {
            filename: filename.into(),
            width,
            height,
            quality: thresholds.classify(&metrics),
            metrics,
        }
    }

    /// Rebuilds a record exactly as it was persisted, label included.
    #[must_use]
    pub fn restore(
        filename: impl Into<String>,
        width: u32,
        height: u32,
        metrics: QualityMetrics,
        quality: Quality,
    ) -> Self {
        Self {
            filename: filename.into(),
            width,
            height,
            metrics,
            quality,
        }
    }

    /// Returns a copy labelled with a different threshold set.
    #[must_use]
    pub fn reclassify(&self, thresholds: &QualityThresholds) -> Self {
        Self {
            quality: thresholds.classify(&self.metrics),
            ..self.clone()
        }
    }

    /// Pairing key: the file name without directory.
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Width in pixels, 0 when loaded from a report without it.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels, 0 when loaded from a report without it.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Raw measurements behind the label.
    #[must_use]
    pub const fn metrics(&self) -> &QualityMetrics {
        &self.metrics
    }

    /// Laplacian variance.
    #[must_use]
    pub const fn blur_score(&self) -> f64 {
        self.metrics.blur_score
    }

    /// Mean gray level.
    #[must_use]
    pub const fn brightness(&self) -> f64 {
        self.metrics.brightness
    }

    /// Gray level standard deviation, if measured.
    #[must_use]
    pub const fn contrast(&self) -> Option<f64> {
        self.metrics.contrast
    }

    /// Label assigned at scoring or reclassification.
    #[must_use]
    pub const fn quality(&self) -> Quality {
        self.quality
    }

    /// Shorthand for `quality() == Quality::Good`.
    #[must_use]
    pub fn is_good(&self) -> bool {
        self.quality == Quality::Good
    }
}
