//! `flowtag tag` command handler

use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;
use tracing::info;

use flowtag_core::config::FlowtagConfig;
use flowtag_tagger::report::write_reports;
use flowtag_tagger::{CountSnapshot, LookupTable, PipelineReport, TaggerConfig, TaggingPipeline};

use crate::cli::TagArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Tags shown in the text summary.
const TOP_TAGS: usize = 10;

/// Execute the `tag` command.
///
/// Loads the lookup table before touching the flow log, so a broken table
/// fails fast with a configuration error.
pub async fn execute(
    args: TagArgs,
    mut config: FlowtagConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    apply_overrides(&args, &mut config);
    config.validate()?;

    let tagger_config = TaggerConfig::from_core(&config.tagger);
    tagger_config.validate()?;

    info!(
        flow_log = %args.flow_log.display(),
        lookup_table = %args.lookup_table.display(),
        workers = tagger_config.workers,
        "starting tagging run"
    );

    let output = config.output.clone();
    let TagArgs {
        flow_log,
        lookup_table,
        ..
    } = args;

    let summary = tokio::task::spawn_blocking(move || -> Result<TagSummary, CliError> {
        let table = LookupTable::load(&lookup_table)?;
        let pipeline = TaggingPipeline::new(&table, tagger_config);
        let report = pipeline.run_file(&flow_log)?;
        let paths = write_reports(&output, &report.counts)?;

        Ok(TagSummary::new(
            flow_log,
            lookup_table,
            table.len(),
            report,
            paths.tag_counts,
            paths.port_protocol_counts,
        ))
    })
    .await
    .map_err(|e| CliError::Command(format!("tagging task failed: {e}")))??;

    writer.render(&summary)?;
    Ok(())
}

/// Apply command-line overrides on top of file and env configuration.
fn apply_overrides(args: &TagArgs, config: &mut FlowtagConfig) {
    if let Some(dir) = &args.output_dir {
        config.output.dir = dir.display().to_string();
    }
    if let Some(workers) = args.workers {
        config.tagger.workers = workers;
    }
    if args.ignore_blank_lines {
        config.tagger.ignore_blank_lines = true;
    }
}

/// Result of a tagging run.
#[derive(Serialize)]
pub struct TagSummary {
    pub flow_log: String,
    pub lookup_table: String,
    pub lookup_entries: usize,
    pub total_lines: u64,
    pub classified: u64,
    pub skipped: u64,
    pub untagged: u64,
    pub ignored_blank_lines: u64,
    pub tag_counts_file: String,
    pub port_protocol_counts_file: String,
    pub counts: CountSnapshot,
}

impl TagSummary {
    fn new(
        flow_log: PathBuf,
        lookup_table: PathBuf,
        lookup_entries: usize,
        report: PipelineReport,
        tag_counts_file: PathBuf,
        port_protocol_counts_file: PathBuf,
    ) -> Self {
        Self {
            flow_log: flow_log.display().to_string(),
            lookup_table: lookup_table.display().to_string(),
            lookup_entries,
            total_lines: report.total_lines,
            classified: report.classified_count,
            skipped: report.skipped_count,
            untagged: report.untagged_count,
            ignored_blank_lines: report.ignored_blank_lines,
            tag_counts_file: tag_counts_file.display().to_string(),
            port_protocol_counts_file: port_protocol_counts_file.display().to_string(),
            counts: report.counts,
        }
    }
}

impl Render for TagSummary {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Tagging: {}", self.flow_log.bold())?;
        writeln!(
            w,
            "  Lookup table: {} ({} entries)",
            self.lookup_table, self.lookup_entries
        )?;
        writeln!(w, "  Lines:      {}", self.total_lines)?;
        writeln!(w, "  Classified: {}", self.classified.to_string().green())?;
        writeln!(w, "  Untagged:   {}", self.untagged)?;
        if self.skipped > 0 {
            writeln!(w, "  Skipped:    {}", self.skipped.to_string().yellow())?;
        } else {
            writeln!(w, "  Skipped:    {}", self.skipped)?;
        }
        if self.ignored_blank_lines > 0 {
            writeln!(w, "  Ignored blank lines: {}", self.ignored_blank_lines)?;
        }

        if !self.counts.tag_counts.is_empty() {
            writeln!(w)?;
            writeln!(w, "{:<30} {:>10}", "Tag", "Count")?;
            writeln!(w, "{}", "-".repeat(41))?;

            let mut top: Vec<_> = self.counts.tag_counts.iter().collect();
            top.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
            for row in top.iter().take(TOP_TAGS) {
                writeln!(w, "{:<30} {:>10}", row.tag, row.count)?;
            }
            if top.len() > TOP_TAGS {
                writeln!(w, "... {} more", top.len() - TOP_TAGS)?;
            }
        }

        writeln!(w)?;
        writeln!(w, "Reports:")?;
        writeln!(w, "  {}", self.tag_counts_file)?;
        writeln!(w, "  {}", self.port_protocol_counts_file)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowtag_tagger::Aggregator;
    use flowtag_core::types::Protocol;

    fn summary(skipped: u64) -> TagSummary {
        let mut agg = Aggregator::new();
        agg.record("sv_p2", "443", Protocol::Tcp);
        agg.record("sv_p2", "68", Protocol::Udp);
        agg.record("untagged", "9999", Protocol::Tcp);

        let report = PipelineReport {
            counts: agg.snapshot(),
            total_lines: 3 + skipped,
            classified_count: 3,
            skipped_count: skipped,
            untagged_count: 1,
            ignored_blank_lines: 0,
        };
        TagSummary::new(
            PathBuf::from("flows.log"),
            PathBuf::from("lookup.csv"),
            2,
            report,
            PathBuf::from("out/tag_counts.csv"),
            PathBuf::from("out/port_protocol_counts.csv"),
        )
    }

    #[test]
    fn test_apply_overrides() {
        let args = TagArgs {
            flow_log: PathBuf::from("flows.log"),
            lookup_table: PathBuf::from("lookup.csv"),
            output_dir: Some(PathBuf::from("/tmp/out")),
            workers: Some(3),
            ignore_blank_lines: true,
        };
        let mut config = FlowtagConfig::default();
        apply_overrides(&args, &mut config);

        assert_eq!(config.output.dir, "/tmp/out");
        assert_eq!(config.tagger.workers, 3);
        assert!(config.tagger.ignore_blank_lines);
    }

    #[test]
    fn test_apply_overrides_keeps_config_when_absent() {
        let args = TagArgs {
            flow_log: PathBuf::from("flows.log"),
            lookup_table: PathBuf::from("lookup.csv"),
            output_dir: None,
            workers: None,
            ignore_blank_lines: false,
        };
        let mut config = FlowtagConfig::default();
        config.tagger.workers = 8;
        apply_overrides(&args, &mut config);

        assert_eq!(config.output.dir, ".");
        assert_eq!(config.tagger.workers, 8);
    }

    #[test]
    fn test_summary_render_text() {
        let mut buffer = Vec::new();
        summary(2)
            .render_text(&mut buffer)
            .expect("text rendering should succeed");

        let output = String::from_utf8(buffer).expect("valid UTF-8");
        assert!(output.contains("flows.log"));
        assert!(output.contains("2 entries"));
        assert!(output.contains("sv_p2"));
        assert!(output.contains("Skipped"));
        assert!(output.contains("out/tag_counts.csv"));
    }

    #[test]
    fn test_summary_json_fields() {
        let json = serde_json::to_value(summary(0)).expect("json serialization should succeed");
        assert_eq!(json["classified"].as_u64(), Some(3));
        assert_eq!(json["skipped"].as_u64(), Some(0));
        assert_eq!(json["counts"]["tag_counts"][0]["tag"].as_str(), Some("sv_p2"));
        assert_eq!(
            json["counts"]["port_protocol_counts"][0]["protocol"].as_str(),
            Some("tcp")
        );
    }
}
