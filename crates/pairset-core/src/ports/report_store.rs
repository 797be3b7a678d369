//! Report store port for persisting the quality report.

use crate::domain::QualityReport;

/// Port for saving and re-loading the quality report.
///
/// Saving a loaded report must reproduce it exactly.
pub trait ReportStore: Send + Sync {
    /// Loads the report.
    ///
    /// # Errors
    ///
    /// Returns an error if the report is missing or malformed.
    fn load(&self) -> anyhow::Result<QualityReport>;

    /// Writes the report, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn save(&self, report: &QualityReport) -> anyhow::Result<()>;
}
