//! Summary writer for stdout.

use std::fmt::Display;
use std::io::{self, Write};
use std::sync::Mutex;

use anyhow::Result;
use serde::Serialize;

use crate::commands::args::OutputFormat;

/// Writes summaries as text or JSON.
pub struct SummaryWriter {
    writer: Mutex<Box<dyn Write + Send>>,
    format: OutputFormat,
    pretty: bool,
}

impl SummaryWriter {
    /// Creates a writer on stdout.
    #[must_use]
    pub fn stdout(format: OutputFormat, pretty: bool) -> Self {
        Self::new(Box::new(io::stdout()), format, pretty)
    }

    /// Creates a writer on the given sink.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer: Mutex::new(writer),
            format,
            pretty,
        }
    }

    /// Writes one summary and flushes.
    #[allow(clippy::significant_drop_tightening)]
    pub fn write<T: Serialize + Display>(&self, summary: &T) -> Result<()> {
        let rendered = match self.format {
            OutputFormat::Text => summary.to_string(),
            OutputFormat::Json if self.pretty => serde_json::to_string_pretty(summary)? + "\n",
            OutputFormat::Json => serde_json::to_string(summary)? + "\n",
        };
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writer.write_all(rendered.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}
