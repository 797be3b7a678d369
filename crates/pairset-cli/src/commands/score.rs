//! Score command - measure front scans and write the quality report.

use std::io::IsTerminal;

use anyhow::{Context, Result};
use clap::Args;
use pairset_adapters::{CsvReportStore, FsImageSource};
use pairset_core::{ImageSource, QualityScorer, ReportStore, ScoreOutcome};
use tracing::info;

use super::args::CurateArgs;
use crate::output::{ProgressBar, ScoreSummary, SummaryWriter};

/// Arguments for `pairset score`.
#[derive(Args, Clone, Debug)]
pub struct ScoreArgs {
    #[command(flatten)]
    pub curate: CurateArgs,
}

/// Run the score command.
///
/// Expects `args` to have been processed through `with_config()` first
/// to apply configuration file settings.
pub fn run(args: &ScoreArgs) -> Result<()> {
    let (_, summary) = score_fronts(&args.curate)?;
    SummaryWriter::stdout(args.curate.format(), args.curate.pretty).write(&summary)
}

/// Scores the front directory and saves the report.
///
/// Shared by `score` and `run`.
pub fn score_fronts(args: &CurateArgs) -> Result<(ScoreOutcome, ScoreSummary)> {
    let front_dir = args.front_dir()?;
    let scorer = QualityScorer::new(args.thresholds()?)?;
    let report_path = args.report_path();
    info!("Scoring front scans in {}", front_dir.display());

    let source = FsImageSource::new(front_dir)
        .with_context(|| format!("Failed to list front scans: {}", front_dir.display()))?;
    let total = source.count_hint();

    let show_progress = !args.quiet && (args.progress || std::io::stderr().is_terminal());
    let progress_bar = ProgressBar::new(total.map(|t| t as u64), args.quiet, show_progress);

    let outcome = scorer.score_source(&source, &progress_bar)?;
    CsvReportStore::new(&report_path).save(&outcome.report)?;

    let summary = ScoreSummary::new(
        front_dir.display().to_string(),
        report_path.display().to_string(),
        outcome.report.stats(),
        outcome.skipped.clone(),
    );
    Ok((outcome, summary))
}
