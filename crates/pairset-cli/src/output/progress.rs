//! Scoring progress on stderr.

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle};
use pairset_core::{ProgressEvent, ProgressSink, Quality};

const BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}";

enum Mode {
    Silent,
    /// One line per Poor scan.
    PoorList,
    Bar(IndicatifBar),
}

/// Progress sink for the `score` stage.
///
/// Skipped files are not printed here; the scorer already logs them with
/// `warn!` and the summary lists them.
pub struct ProgressBar {
    mode: Mode,
}

impl ProgressBar {
    /// Creates a progress display.
    ///
    /// `quiet` wins over `show_bar`; without a bar, Poor scans are listed.
    #[must_use]
    pub fn new(total: Option<u64>, quiet: bool, show_bar: bool) -> Self {
        let mode = match (quiet, show_bar) {
            (true, _) => Mode::Silent,
            (false, false) => Mode::PoorList,
            (false, true) => {
                let bar = total.map_or_else(IndicatifBar::new_spinner, IndicatifBar::new);
                if let Ok(style) = ProgressStyle::default_bar().template(BAR_TEMPLATE) {
                    bar.set_style(style.progress_chars("#>-"));
                }
                Mode::Bar(bar)
            }
        };
        Self { mode }
    }
}

impl ProgressSink for ProgressBar {
    fn on_event(&self, event: ProgressEvent) {
        match (&self.mode, event) {
            (Mode::Silent, _) => {}
            (Mode::Bar(bar), ProgressEvent::Started { path, index, total }) => {
                if let Some(t) = total {
                    bar.set_length(t as u64);
                }
                bar.set_position(index as u64);
                bar.set_message(path);
            }
            (Mode::Bar(bar), ProgressEvent::Scored { .. } | ProgressEvent::Skipped { .. }) => {
                bar.inc(1);
            }
            (Mode::Bar(bar), ProgressEvent::Finished { processed, skipped }) => {
                bar.finish_with_message(format!("{processed} scored, {skipped} skipped"));
            }
            (Mode::PoorList, ProgressEvent::Scored { record }) => {
                if record.quality() == Quality::Poor {
                    eprintln!("{}: poor", record.filename());
                }
            }
            (Mode::PoorList, _) => {}
        }
    }
}
