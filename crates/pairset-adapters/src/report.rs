//! CSV persistence for the quality report.
//!
//! Columns: `filename,width,height,blur_score,brightness,contrast,quality`.
//! Floats use Rust's shortest round-trip formatting, so a report that was
//! written here and loaded back is written again byte for byte.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use pairset_core::error::CurationError;
use pairset_core::ports::ReportStore;
use pairset_core::{ImageRecord, Quality, QualityMetrics, QualityReport};
use tracing::{debug, info};

/// Column order used when writing.
pub const REPORT_COLUMNS: [&str; 7] = [
    "filename",
    "width",
    "height",
    "blur_score",
    "brightness",
    "contrast",
    "quality",
];

/// Quality report stored as a CSV file.
#[derive(Debug, Clone)]
pub struct CsvReportStore {
    path: PathBuf,
}

impl CsvReportStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the CSV file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportStore for CsvReportStore {
    fn load(&self) -> Result<QualityReport> {
        let text = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read quality report: {}", self.path.display()))?;
        let report = parse_report(&text)
            .with_context(|| format!("Failed to parse quality report: {}", self.path.display()))?;
        info!(
            "Loaded {} records from {}",
            report.len(),
            self.path.display()
        );
        Ok(report)
    }

    fn save(&self, report: &QualityReport) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        std::fs::write(&self.path, build_report(report))
            .with_context(|| format!("Failed to write quality report: {}", self.path.display()))?;
        info!("Wrote {} records to {}", report.len(), self.path.display());
        Ok(())
    }
}

/// Renders `report` as CSV text, one `\n`-terminated line per row.
#[must_use]
pub fn build_report(report: &QualityReport) -> String {
    let mut out = REPORT_COLUMNS.join(",");
    out.push('\n');

    for record in report.records() {
        let row = [
            csv_escape(record.filename()),
            record.width().to_string(),
            record.height().to_string(),
            record.blur_score().to_string(),
            record.brightness().to_string(),
            record.contrast().map(|c| c.to_string()).unwrap_or_default(),
            record.quality().as_str().to_owned(),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }

    out
}

/// Parses CSV text into a report.
///
/// Columns may appear in any order. `width`, `height` and `contrast` are
/// optional; missing dimensions read as 0.
///
/// # Errors
///
/// Returns [`CurationError::Report`] for a missing required column, an
/// unparsable number, an unknown quality label or a duplicate filename.
pub fn parse_report(text: &str) -> Result<QualityReport, CurationError> {
    let mut rows = parse_rows(text).into_iter();
    let header = rows
        .next()
        .ok_or_else(|| CurationError::Report("report is empty".into()))?;
    let columns = Columns::locate(&header)?;

    let mut records = Vec::new();
    for (index, row) in rows.enumerate() {
        if row.iter().all(String::is_empty) {
            continue;
        }
        // Header is line 1.
        let line = index + 2;
        records.push(columns.record(&row, line)?);
    }

    debug!("Parsed {} report rows", records.len());
    QualityReport::new(records)
}

struct Columns {
    filename: usize,
    width: Option<usize>,
    height: Option<usize>,
    blur_score: usize,
    brightness: usize,
    contrast: Option<usize>,
    quality: usize,
}

impl Columns {
    fn locate(header: &[String]) -> Result<Self, CurationError> {
        let find = |name: &str| header.iter().position(|h| h.trim() == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| CurationError::Report(format!("missing column '{name}'")))
        };
        Ok(Self {
            filename: require("filename")?,
            width: find("width"),
            height: find("height"),
            blur_score: require("blur_score")?,
            brightness: require("brightness")?,
            contrast: find("contrast"),
            quality: require("quality")?,
        })
    }

    fn record(&self, row: &[String], line: usize) -> Result<ImageRecord, CurationError> {
        let field = |index: usize| row.get(index).map_or("", String::as_str);
        let optional = |index: Option<usize>| index.map(field).filter(|v| !v.is_empty());

        let filename = field(self.filename);
        if filename.is_empty() {
            return Err(CurationError::Report(format!("line {line}: empty filename")));
        }

        let width = optional(self.width)
            .map(|v| parse_number::<u32>(v, "width", line))
            .transpose()?
            .unwrap_or(0);
        let height = optional(self.height)
            .map(|v| parse_number::<u32>(v, "height", line))
            .transpose()?
            .unwrap_or(0);
        let metrics = QualityMetrics {
            blur_score: parse_number(field(self.blur_score), "blur_score", line)?,
            brightness: parse_number(field(self.brightness), "brightness", line)?,
            contrast: optional(self.contrast)
                .map(|v| parse_number(v, "contrast", line))
                .transpose()?,
        };
        let quality: Quality = field(self.quality)
            .parse()
            .map_err(|e| CurationError::Report(format!("line {line}: {e}")))?;

        Ok(ImageRecord::restore(filename, width, height, metrics, quality))
    }
}

fn parse_number<T: std::str::FromStr>(
    value: &str,
    column: &str,
    line: usize,
) -> Result<T, CurationError> {
    value.trim().parse().map_err(|_| {
        CurationError::Report(format!("line {line}: invalid {column} '{value}'"))
    })
}

/// Quote a CSV field value if it contains commas, quotes, or newlines.
fn csv_escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r')
    {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Splits CSV text into rows of fields.
///
/// Handles quoted fields with doubled quotes and embedded newlines, and both
/// `\n` and `\r\n` line endings.
fn parse_rows(text: &str) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(ch);
            }
            continue;
        }

        match ch {
            '"' => in_quotes = true,
            ',' => row.push(std::mem::take(&mut current)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                row.push(std::mem::take(&mut current));
                rows.push(std::mem::take(&mut row));
            }
            _ => current.push(ch),
        }
    }

    if !current.is_empty() || !row.is_empty() {
        row.push(current);
        rows.push(row);
    }

    rows
}
