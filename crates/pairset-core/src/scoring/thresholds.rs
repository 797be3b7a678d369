//! Threshold sets that turn metrics into a quality label.

use std::fmt;
use std::str::FromStr;

use crate::domain::{Quality, QualityMetrics};
use crate::error::{CurationError, Result};

/// Quality gates. Every comparison is strict: a metric equal to a bound fails.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityThresholds {
    /// Blur score must exceed this.
    pub blur_floor: f64,
    /// Brightness must exceed this.
    pub brightness_low: f64,
    /// Brightness must stay below this.
    pub brightness_high: f64,
    /// Contrast must exceed this. `None` disables the contrast gate.
    pub contrast_floor: Option<f64>,
}

impl QualityThresholds {
    /// Document scans: sparse sharp text on a light background.
    #[must_use]
    pub const fn document() -> Self {
        Self {
            blur_floor: 30.0,
            brightness_low: 40.0,
            brightness_high: 250.0,
            contrast_floor: Some(20.0),
        }
    }

    /// Photographic gates without a contrast check.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            blur_floor: 100.0,
            brightness_low: 50.0,
            brightness_high: 200.0,
            contrast_floor: None,
        }
    }

    /// Checks that the thresholds describe a non-empty acceptance region.
    ///
    /// # Errors
    ///
    /// Returns [`CurationError::Configuration`] for non-finite or negative
    /// floors, or a brightness window that is empty.
    pub fn validate(&self) -> Result<()> {
        let values = [
            ("blur_floor", Some(self.blur_floor)),
            ("brightness_low", Some(self.brightness_low)),
            ("brightness_high", Some(self.brightness_high)),
            ("contrast_floor", self.contrast_floor),
        ];
        for (name, value) in values {
            if let Some(v) = value {
                if !v.is_finite() {
                    return Err(CurationError::config(format!("{name} must be finite, got {v}")));
                }
            }
        }
        if self.blur_floor < 0.0 {
            return Err(CurationError::config(format!(
                "blur_floor must be >= 0, got {}",
                self.blur_floor
            )));
        }
        if let Some(floor) = self.contrast_floor {
            if floor < 0.0 {
                return Err(CurationError::config(format!(
                    "contrast_floor must be >= 0, got {floor}"
                )));
            }
        }
        if self.brightness_low >= self.brightness_high {
            return Err(CurationError::config(format!(
                "brightness_low ({}) must be below brightness_high ({})",
                self.brightness_low, self.brightness_high
            )));
        }
        Ok(())
    }

    /// Labels a set of metrics.
    ///
    /// The contrast gate only applies when both the floor and the metric are present.
    #[must_use]
    pub fn classify(&self, metrics: &QualityMetrics) -> Quality {
        let sharp = metrics.blur_score > self.blur_floor;
        let exposed =
            self.brightness_low < metrics.brightness && metrics.brightness < self.brightness_high;
        let contrasted = match (self.contrast_floor, metrics.contrast) {
            (Some(floor), Some(contrast)) => contrast > floor,
            _ => true,
        };

        if sharp && exposed && contrasted {
            Quality::Good
        } else {
            Quality::Poor
        }
    }
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self::document()
    }
}

/// Named threshold sets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThresholdPreset {
    #[default]
    Document,
    Strict,
}

impl ThresholdPreset {
    /// Thresholds for this preset.
    #[must_use]
    pub const fn thresholds(self) -> QualityThresholds {
        match self {
            Self::Document => QualityThresholds::document(),
            Self::Strict => QualityThresholds::strict(),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Strict => "strict",
        }
    }
}

impl fmt::Display for ThresholdPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThresholdPreset {
    type Err = CurationError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "document" => Ok(Self::Document),
            "strict" => Ok(Self::Strict),
            other => Err(CurationError::config(format!(
                "unknown quality preset '{other}', expected 'document' or 'strict'"
            ))),
        }
    }
}
