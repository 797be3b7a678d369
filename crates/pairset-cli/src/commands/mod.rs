//! CLI command definitions and handlers.

pub mod args;
pub mod run;
pub mod score;
pub mod split;

use clap::{Parser, Subcommand};

/// pairset - curate paired front/back document scans into OCR datasets
#[derive(Parser)]
#[command(name = "pairset")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Score front scans and write the quality report
    Score(score::ScoreArgs),
    /// Pair, split and materialize scans from an existing quality report
    Split(split::SplitArgs),
    /// Score, then split with the fresh records
    Run(run::RunArgs),
}

/// Process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Command completed, possibly with skipped files.
    Success = 0,
    /// Fatal error.
    Error = 1,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        Self::from(code as u8)
    }
}
