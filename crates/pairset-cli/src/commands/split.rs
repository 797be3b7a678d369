//! Split command - pair, split and materialize from a quality report.

use anyhow::{Context, Result};
use clap::Args;
use pairset_adapters::{unkeyed_images, CsvReportStore, FsFileStore};
use pairset_core::{
    DatasetMaterializer, DatasetSources, FileStore, OrphanHandler, PairValidator, QualityReport,
    ReportStore, Splitter,
};
use tracing::info;

use super::args::CurateArgs;
use crate::output::{RunSummary, SummaryWriter};

/// Arguments for `pairset split`.
#[derive(Args, Clone, Debug)]
pub struct SplitArgs {
    #[command(flatten)]
    pub curate: CurateArgs,

    /// Re-apply the active thresholds instead of the stored labels
    #[arg(long)]
    pub reclassify: bool,

    /// Print the assignment without copying anything
    #[arg(long)]
    pub dry_run: bool,
}

/// Run the split command.
///
/// Expects `args` to have been processed through `with_config()` first
/// to apply configuration file settings.
pub fn run(args: &SplitArgs) -> Result<()> {
    let curate = &args.curate;
    // Resolve every setting before touching the filesystem.
    let thresholds = curate.thresholds()?;
    curate.split_config()?;
    curate.back_dir()?;

    let report_path = curate.report_path();
    let mut report = CsvReportStore::new(&report_path).load()?;
    if args.reclassify {
        info!("Reclassifying {} records", report.len());
        report = report.reclassify(&thresholds);
    }

    let summary = curate_pairs(curate, &report, args.dry_run)?;
    SummaryWriter::stdout(curate.format(), curate.pretty).write(&summary)
}

/// Pairs the report with the back directory, then routes orphans and writes
/// the dataset unless `dry_run` is set.
///
/// Shared by `split` and `run`.
pub fn curate_pairs(
    args: &CurateArgs,
    report: &QualityReport,
    dry_run: bool,
) -> Result<RunSummary> {
    let config = args.split_config()?;
    let sources = DatasetSources::new(args.front_dir()?, args.back_dir()?);
    let store = FsFileStore;

    let back = store
        .list_images(&sources.back)
        .with_context(|| format!("Failed to list back scans: {}", sources.back.display()))?;
    let pairs = PairValidator::validate(report.records(), &back);

    let splitter = Splitter::new(config);
    let assignment = splitter.split(&pairs.split_pool(args.include_poor_pairs));
    let mut summary = RunSummary::new(
        splitter.config(),
        report.len(),
        back.len(),
        &pairs,
        &assignment,
    );
    // Backs without a usable name can never pair; list them as skipped.
    summary.skipped.extend(unkeyed_images(&sources.back)?);

    if dry_run {
        info!("Dry run: {} pairs assigned, nothing copied", assignment.len());
        summary.mark_dry_run(assignment);
        return Ok(summary);
    }

    let orphans = OrphanHandler::new(&store, args.review_root()).route(&pairs, &sources)?;
    summary.record_orphans(orphans);

    let materialized =
        DatasetMaterializer::new(&store, args.output_root()).materialize(&assignment, &sources)?;
    summary.record_materialized(materialized);

    Ok(summary)
}
