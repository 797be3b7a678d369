//! End-of-command summaries.

use std::fmt;

use pairset_core::{
    MaterializeOutcome, OrphanOutcome, PairSet, ReportStats, SkippedFile, SplitAssignment,
    SplitConfig, SplitCounts,
};
use serde::Serialize;
use tracing::debug;

/// Result of the `score` stage.
#[derive(Debug, Clone, Serialize)]
pub struct ScoreSummary {
    pub timestamp: String,
    pub front_dir: String,
    pub report: String,
    pub stats: ReportStats,
    pub skipped: Vec<SkippedFile>,
}

impl ScoreSummary {
    pub fn new(
        front_dir: String,
        report: String,
        stats: ReportStats,
        skipped: Vec<SkippedFile>,
    ) -> Self {
        Self {
            timestamp: iso_timestamp(),
            front_dir,
            report,
            stats,
            skipped,
        }
    }
}

impl fmt::Display for ScoreSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = &self.stats;
        writeln!(f, "Scored {} ({})", self.front_dir, self.timestamp)?;
        writeln!(f, "  report:        {}", self.report)?;
        writeln!(f, "  images:        {}", stats.total)?;
        writeln!(f, "  good:          {}", stats.good)?;
        writeln!(f, "  poor:          {}", stats.poor)?;
        if let (Some(w), Some(h)) = (stats.mean_width, stats.mean_height) {
            writeln!(f, "  mean size:     {w:.0}x{h:.0}")?;
        }
        if let Some(blur) = stats.mean_good_blur {
            writeln!(f, "  good blur:     {blur:.1}")?;
        }
        if let Some(brightness) = stats.mean_good_brightness {
            writeln!(f, "  good bright.:  {brightness:.1}")?;
        }
        write_skipped(f, &self.skipped)
    }
}

/// Orphans copied per side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OrphanCounts {
    pub front: usize,
    pub back: usize,
}

/// Result of the `split` stage.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub timestamp: String,
    pub dry_run: bool,
    pub policy: &'static str,
    pub seed: u64,
    pub front_records: usize,
    pub back_files: usize,
    pub valid_pairs: usize,
    pub poor_pairs: usize,
    pub orphans_front: usize,
    pub orphans_back: usize,
    pub discarded_front: usize,
    pub split: SplitCounts,
    pub orphans_copied: OrphanCounts,
    pub pairs_materialized: SplitCounts,
    pub skipped: Vec<SkippedFile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignment: Option<SplitAssignment>,
}

impl RunSummary {
    /// Counts from pairing and splitting; copy results are filled in later.
    pub fn new(
        config: &SplitConfig,
        front_records: usize,
        back_files: usize,
        pairs: &PairSet,
        assignment: &SplitAssignment,
    ) -> Self {
        Self {
            timestamp: iso_timestamp(),
            dry_run: false,
            policy: config.policy.name(),
            seed: config.seed,
            front_records,
            back_files,
            valid_pairs: pairs.valid_pairs.len(),
            poor_pairs: pairs.poor_pairs.len(),
            orphans_front: pairs.orphans_front.len(),
            orphans_back: pairs.orphans_back.len(),
            discarded_front: pairs.discarded_front.len(),
            split: assignment.counts(),
            orphans_copied: OrphanCounts::default(),
            pairs_materialized: SplitCounts::default(),
            skipped: Vec::new(),
            assignment: None,
        }
    }

    /// Marks the run as a dry run and attaches the assignment.
    pub fn mark_dry_run(&mut self, assignment: SplitAssignment) {
        self.dry_run = true;
        self.assignment = Some(assignment);
    }

    pub fn record_orphans(&mut self, outcome: OrphanOutcome) {
        self.orphans_copied = OrphanCounts {
            front: outcome.front_copied,
            back: outcome.back_copied,
        };
        self.skipped.extend(outcome.skipped);
    }

    pub fn record_materialized(&mut self, outcome: MaterializeOutcome) {
        self.pairs_materialized = outcome.pairs;
        self.skipped.extend(outcome.skipped);
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = if self.dry_run { " (dry run)" } else { "" };
        writeln!(
            f,
            "Split {} pairs{mode}, {} policy, seed {} ({})",
            self.split.train + self.split.val + self.split.test,
            self.policy,
            self.seed,
            self.timestamp
        )?;
        writeln!(f, "  front records:   {}", self.front_records)?;
        writeln!(f, "  back files:      {}", self.back_files)?;
        writeln!(f, "  valid pairs:     {}", self.valid_pairs)?;
        writeln!(f, "  poor pairs:      {}", self.poor_pairs)?;
        writeln!(f, "  discarded poor:  {}", self.discarded_front)?;
        writeln!(
            f,
            "  orphans:         {} front, {} back",
            self.orphans_front, self.orphans_back
        )?;
        writeln!(
            f,
            "  split:           train={} val={} test={}",
            self.split.train, self.split.val, self.split.test
        )?;
        if !self.dry_run {
            writeln!(
                f,
                "  materialized:    train={} val={} test={}",
                self.pairs_materialized.train,
                self.pairs_materialized.val,
                self.pairs_materialized.test
            )?;
            writeln!(
                f,
                "  orphans copied:  {} front, {} back",
                self.orphans_copied.front, self.orphans_copied.back
            )?;
        }
        if let Some(ref assignment) = self.assignment {
            writeln!(f, "Assignment:")?;
            for (name, split) in assignment.iter() {
                writeln!(f, "  {:<5} {name}", split.as_str())?;
            }
        }
        write_skipped(f, &self.skipped)
    }
}

/// `score` followed by `split`.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineSummary {
    pub score: ScoreSummary,
    pub split: RunSummary,
}

impl fmt::Display for PipelineSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.score, self.split)
    }
}

fn write_skipped(f: &mut fmt::Formatter<'_>, skipped: &[SkippedFile]) -> fmt::Result {
    if skipped.is_empty() {
        return Ok(());
    }
    writeln!(f, "Skipped {} file(s):", skipped.len())?;
    for entry in skipped {
        writeln!(f, "  {}: {}", entry.path, entry.reason)?;
    }
    Ok(())
}

/// Generate ISO 8601 UTC timestamp (RFC 3339 format).
fn iso_timestamp() -> String {
    match time::OffsetDateTime::now_utc().format(&time::format_description::well_known::Rfc3339) {
        Ok(ts) => ts,
        Err(e) => {
            debug!("Timestamp format failed: {e}");
            String::from("1970-01-01T00:00:00Z")
        }
    }
}
