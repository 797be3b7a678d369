//! Run command - score, then split with the fresh records.

use anyhow::Result;
use clap::Args;

use super::args::CurateArgs;
use super::{score, split};
use crate::output::{PipelineSummary, SummaryWriter};

/// Arguments for `pairset run`.
#[derive(Args, Clone, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub curate: CurateArgs,

    /// Score and print the assignment without copying anything
    #[arg(long)]
    pub dry_run: bool,
}

/// Run the full pipeline.
pub fn run(args: &RunArgs) -> Result<()> {
    let curate = &args.curate;
    curate.split_config()?;
    curate.back_dir()?;

    // Undecodable fronts are listed in the score section only.
    let (outcome, score_summary) = score::score_fronts(curate)?;
    let split_summary = split::curate_pairs(curate, &outcome.report, args.dry_run)?;

    let summary = PipelineSummary {
        score: score_summary,
        split: split_summary,
    };
    SummaryWriter::stdout(curate.format(), curate.pretty).write(&summary)
}
