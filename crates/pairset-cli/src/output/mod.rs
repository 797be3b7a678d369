//! Output formatting for CLI.

mod progress;
mod summary;
mod writer;

pub use progress::ProgressBar;
pub use summary::{PipelineSummary, RunSummary, ScoreSummary};
pub use writer::SummaryWriter;
