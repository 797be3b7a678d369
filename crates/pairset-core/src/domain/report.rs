//! The quality report: every scored front image, ordered by filename.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::{ImageRecord, Quality};
use crate::error::{CurationError, Result};
use crate::scoring::QualityThresholds;

/// Ordered collection of quality records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QualityReport {
    records: Vec<ImageRecord>,
}

impl QualityReport {
    /// Builds a report, sorting records by filename.
    ///
    /// # Errors
    ///
    /// Returns [`CurationError::Report`] if two records share a filename.
    pub fn new(mut records: Vec<ImageRecord>) -> Result<Self> {
        records.sort_by(|a, b| a.filename().cmp(b.filename()));
        if let Some(pair) = records
            .windows(2)
            .find(|pair| pair[0].filename() == pair[1].filename())
        {
            return Err(CurationError::Report(format!(
                "duplicate filename '{}'",
                pair[0].filename()
            )));
        }
        Ok(Self { records })
    }

    #[must_use]
    pub fn records(&self) -> &[ImageRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Looks up a record by filename.
    #[must_use]
    pub fn get(&self, filename: &str) -> Option<&ImageRecord> {
        self.records
            .binary_search_by(|r| r.filename().cmp(filename))
            .ok()
            .map(|i| &self.records[i])
    }

    /// Filename → label mapping.
    #[must_use]
    pub fn labels(&self) -> BTreeMap<String, Quality> {
        self.records
            .iter()
            .map(|r| (r.filename().to_owned(), r.quality()))
            .collect()
    }

    /// Filenames labelled Poor.
    #[must_use]
    pub fn poor_filenames(&self) -> BTreeSet<String> {
        self.records
            .iter()
            .filter(|r| r.quality() == Quality::Poor)
            .map(|r| r.filename().to_owned())
            .collect()
    }

    /// Re-labels every record with `thresholds`.
    #[must_use]
    pub fn reclassify(&self, thresholds: &QualityThresholds) -> Self {
        Self {
            records: self
                .records
                .iter()
                .map(|r| r.reclassify(thresholds))
                .collect(),
        }
    }

    /// Aggregate statistics over the report.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn stats(&self) -> ReportStats {
        let acc = self.records.iter().fold(Accumulator::default(), |mut acc, r| {
            acc.total += 1;
            acc.width_sum += u64::from(r.width());
            acc.height_sum += u64::from(r.height());
            if r.is_good() {
                acc.good += 1;
                acc.good_blur_sum += r.blur_score();
                acc.good_brightness_sum += r.brightness();
            }
            acc
        });

        ReportStats {
            total: acc.total,
            good: acc.good,
            poor: acc.total - acc.good,
            mean_width: mean(acc.width_sum as f64, acc.total),
            mean_height: mean(acc.height_sum as f64, acc.total),
            mean_good_blur: mean(acc.good_blur_sum, acc.good),
            mean_good_brightness: mean(acc.good_brightness_sum, acc.good),
        }
    }
}

/// Summary statistics of a quality report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReportStats {
    /// Number of records.
    pub total: usize,
    /// Records labelled Good.
    pub good: usize,
    /// Records labelled Poor.
    pub poor: usize,
    /// Mean width in pixels, if any record exists.
    pub mean_width: Option<f64>,
    /// Mean height in pixels, if any record exists.
    pub mean_height: Option<f64>,
    /// Mean blur score of Good records.
    pub mean_good_blur: Option<f64>,
    /// Mean brightness of Good records.
    pub mean_good_brightness: Option<f64>,
}

#[derive(Default)]
struct Accumulator {
    total: usize,
    good: usize,
    width_sum: u64,
    height_sum: u64,
    good_blur_sum: f64,
    good_brightness_sum: f64,
}

#[allow(clippy::cast_precision_loss)]
fn mean(sum: f64, count: usize) -> Option<f64> {
    (count > 0).then(|| sum / count as f64)
}
