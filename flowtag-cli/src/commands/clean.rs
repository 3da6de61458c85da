//! `flowtag clean` command handler

use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;

use flowtag_tagger::CleanStats;
use flowtag_tagger::clean::{clean_flow_log_file, clean_lookup_csv_file};

use crate::cli::{CleanAction, CleanArgs};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Execute the `clean` command.
pub async fn execute(args: CleanArgs, writer: &OutputWriter) -> Result<(), CliError> {
    let (kind, input, output) = match args.action {
        CleanAction::Lookup { input, output } => (CleanKind::Lookup, input, output),
        CleanAction::Flows { input, output } => (CleanKind::Flows, input, output),
    };

    let report = tokio::task::spawn_blocking(move || -> Result<CleanReport, CliError> {
        let stats = match kind {
            CleanKind::Lookup => clean_lookup_csv_file(&input, &output)?,
            CleanKind::Flows => clean_flow_log_file(&input, &output)?,
        };
        Ok(CleanReport::new(kind, input, output, stats))
    })
    .await
    .map_err(|e| CliError::Command(format!("clean task failed: {e}")))??;

    writer.render(&report)?;
    Ok(())
}

/// Which input was cleaned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CleanKind {
    Lookup,
    Flows,
}

/// Result of a clean run.
#[derive(Serialize)]
pub struct CleanReport {
    pub kind: CleanKind,
    pub input: String,
    pub output: String,
    pub written: u64,
    pub dropped: u64,
}

impl CleanReport {
    fn new(kind: CleanKind, input: PathBuf, output: PathBuf, stats: CleanStats) -> Self {
        Self {
            kind,
            input: input.display().to_string(),
            output: output.display().to_string(),
            written: stats.written,
            dropped: stats.dropped,
        }
    }
}

impl Render for CleanReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        let unit = match self.kind {
            CleanKind::Lookup => "rows",
            CleanKind::Flows => "lines",
        };
        writeln!(w, "Cleaned: {} -> {}", self.input, self.output.bold())?;
        writeln!(w, "  Written: {} {unit}", self.written.to_string().green())?;
        writeln!(w, "  Dropped: {} {unit}", self.dropped)?;
        Ok(())
    }
}
