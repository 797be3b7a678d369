//! Quality scorer: decoded image in, labelled record out.

use tracing::{debug, info, warn};

use super::metrics::measure;
use super::QualityThresholds;
use crate::domain::{ImageInfo, ImageRecord, QualityReport, SkippedFile};
use crate::error::Result;
use crate::ports::{ImageSource, ProgressEvent, ProgressSink};

/// Scores images against a threshold set.
#[derive(Debug, Clone)]
pub struct QualityScorer {
    thresholds: QualityThresholds,
}

/// Outcome of scoring a whole source.
#[derive(Debug, Clone, Default)]
pub struct ScoreOutcome {
    /// One record per decodable image.
    pub report: QualityReport,
    /// Images that could not be decoded.
    pub skipped: Vec<SkippedFile>,
}

impl QualityScorer {
    /// Creates a scorer after validating `thresholds`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the thresholds are invalid.
    pub fn new(thresholds: QualityThresholds) -> Result<Self> {
        thresholds.validate()?;
        Ok(Self { thresholds })
    }

    /// Thresholds this scorer labels with.
    ///
    /// ```
    /// use pairset_core::{QualityScorer, QualityThresholds};
    ///
    /// let scorer = QualityScorer::new(QualityThresholds::strict())?;
    /// assert_eq!(scorer.thresholds().contrast_floor, None);
    /// # Ok::<(), pairset_core::CurationError>(())
    /// ```
    #[must_use]
    pub const fn thresholds(&self) -> &QualityThresholds {
        &self.thresholds
    }

    /// Scores a single decoded image.
    #[must_use]
    pub fn score(&self, image: &ImageInfo) -> ImageRecord {
        let metrics = measure(&image.to_luma8());
        let record = ImageRecord::score(
            image.filename.clone(),
            image.width,
            image.height,
            metrics,
            &self.thresholds,
        );
        debug!(
            "{}: blur={:.1} brightness={:.1} contrast={:?} -> {}",
            record.filename(),
            record.blur_score(),
            record.brightness(),
            record.contrast(),
            record.quality()
        );
        record
    }

    /// Scores every image of `source`, one decoded image at a time.
    ///
    /// Undecodable images are logged, reported through `progress` and
    /// collected in [`ScoreOutcome::skipped`]; they never abort the batch.
    ///
    /// # Errors
    ///
    /// Returns a report error if the source yields the same filename twice.
    pub fn score_source(
        &self,
        source: &dyn ImageSource,
        progress: &dyn ProgressSink,
    ) -> Result<ScoreOutcome> {
        let total = source.count_hint();
        let mut records = Vec::new();
        let mut skipped = Vec::new();

        for (index, item) in source.images().enumerate() {
            let image = match item {
                Ok(image) => image,
                Err(e) => {
                    warn!("Skipping image: {e}");
                    let entry = SkippedFile::from_error(&e);
                    progress.on_event(ProgressEvent::Skipped {
                        path: entry
                            .as_ref()
                            .map_or_else(|| format!("image {index}"), |s| s.path.clone()),
                        reason: e.to_string(),
                    });
                    skipped.extend(entry);
                    continue;
                }
            };

            progress.on_event(ProgressEvent::Started {
                path: image.path.clone(),
                index,
                total,
            });

            let record = self.score(&image);
            progress.on_event(ProgressEvent::Scored {
                record: record.clone(),
            });
            records.push(record);
        }

        progress.on_event(ProgressEvent::Finished {
            processed: records.len(),
            skipped: skipped.len(),
        });

        let report = QualityReport::new(records)?;
        let stats = report.stats();
        info!(
            "Scored {} images: {} good, {} poor, {} skipped",
            stats.total,
            stats.good,
            stats.poor,
            skipped.len()
        );

        Ok(ScoreOutcome { report, skipped })
    }
}

impl Default for QualityScorer {
    fn default() -> Self {
        Self {
            thresholds: QualityThresholds::default(),
        }
    }
}
