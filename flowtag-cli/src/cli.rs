//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// flowtag -- tag flow log records by destination port and protocol.
///
/// Use `flowtag <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "flowtag", version, about, long_about = None)]
pub struct Cli {
    /// Path to a flowtag.toml configuration file.
    ///
    /// When omitted, `flowtag.toml` in the working directory is used if present.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Tag a flow log against a lookup table and write count reports.
    Tag(TagArgs),

    /// Normalize whitespace in input files.
    Clean(CleanArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- tag ----

/// Tag every record of a flow log and count tags and port/protocol pairs.
#[derive(Args, Debug)]
pub struct TagArgs {
    /// Flow log file (one record per line).
    pub flow_log: PathBuf,

    /// Lookup table CSV with `dstport`, `protocol` and `tag` columns.
    pub lookup_table: PathBuf,

    /// Directory for the count reports (overrides `[output] dir`).
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Number of classification workers (overrides `[tagger] workers`).
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Ignore blank lines instead of counting them as skipped.
    #[arg(long)]
    pub ignore_blank_lines: bool,
}

// ---- clean ----

/// Trim whitespace and drop empty rows or lines.
#[derive(Args, Debug)]
pub struct CleanArgs {
    #[command(subcommand)]
    pub action: CleanAction,
}

#[derive(Subcommand, Debug)]
pub enum CleanAction {
    /// Clean a lookup table CSV (header and fields trimmed, blank rows dropped).
    Lookup {
        /// Input CSV file.
        input: PathBuf,
        /// Output CSV file.
        #[arg(id = "output_path", value_name = "OUTPUT")]
        output: PathBuf,
    },
    /// Clean a flow log (lines trimmed, empty lines dropped).
    Flows {
        /// Input flow log.
        input: PathBuf,
        /// Output flow log.
        #[arg(id = "output_path", value_name = "OUTPUT")]
        output: PathBuf,
    },
}

// ---- config ----

/// Manage flowtag configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, tagger, output).
        #[arg(long)]
        section: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parse_tag_positional_args() {
        let args = Cli::try_parse_from(["flowtag", "tag", "flows.log", "lookup.csv"]);
        assert!(args.is_ok(), "should parse 'tag' subcommand");
        let cli = args.expect("parse succeeded");
        match cli.command {
            Commands::Tag(tag_args) => {
                assert_eq!(tag_args.flow_log, PathBuf::from("flows.log"));
                assert_eq!(tag_args.lookup_table, PathBuf::from("lookup.csv"));
                assert!(tag_args.output_dir.is_none());
                assert!(tag_args.workers.is_none());
                assert!(!tag_args.ignore_blank_lines);
            }
            _ => panic!("expected Tag command"),
        }
    }

    #[test]
    fn test_cli_parse_tag_overrides() {
        let args = Cli::try_parse_from([
            "flowtag",
            "tag",
            "flows.log",
            "lookup.csv",
            "--output-dir",
            "/tmp/reports",
            "-w",
            "4",
            "--ignore-blank-lines",
        ]);
        let cli = args.expect("parse succeeded");
        match cli.command {
            Commands::Tag(tag_args) => {
                assert_eq!(tag_args.output_dir, Some(PathBuf::from("/tmp/reports")));
                assert_eq!(tag_args.workers, Some(4));
                assert!(tag_args.ignore_blank_lines);
            }
            _ => panic!("expected Tag command"),
        }
    }

    #[test]
    fn test_cli_parse_tag_requires_lookup_table() {
        let args = Cli::try_parse_from(["flowtag", "tag", "flows.log"]);
        assert!(args.is_err(), "lookup table argument is required");
    }

    #[test]
    fn test_cli_parse_clean_lookup() {
        let args = Cli::try_parse_from(["flowtag", "clean", "lookup", "in.csv", "out.csv"]);
        let cli = args.expect("parse succeeded");
        match cli.command {
            Commands::Clean(clean_args) => match clean_args.action {
                CleanAction::Lookup { input, output } => {
                    assert_eq!(input, PathBuf::from("in.csv"));
                    assert_eq!(output, PathBuf::from("out.csv"));
                }
                _ => panic!("expected Lookup action"),
            },
            _ => panic!("expected Clean command"),
        }
    }

    #[test]
    fn test_cli_parse_clean_flows() {
        let args = Cli::try_parse_from(["flowtag", "clean", "flows", "in.log", "out.log"]);
        let cli = args.expect("parse succeeded");
        assert!(matches!(
            cli.command,
            Commands::Clean(CleanArgs {
                action: CleanAction::Flows { .. }
            })
        ));
    }

    #[test]
    fn test_cli_parse_config_show_section() {
        let args = Cli::try_parse_from(["flowtag", "config", "show", "--section", "tagger"]);
        let cli = args.expect("parse succeeded");
        match cli.command {
            Commands::Config(config_args) => match config_args.action {
                ConfigAction::Show { section } => {
                    assert_eq!(section, Some("tagger".to_owned()));
                }
                _ => panic!("expected Show action"),
            },
            _ => panic!("expected Config command"),
        }
    }

    #[test]
    fn test_cli_parse_config_defaults_to_none() {
        let cli = Cli::try_parse_from(["flowtag", "config", "validate"]).expect("parse succeeded");
        assert!(cli.config.is_none(), "config path should default to None");
    }

    #[test]
    fn test_cli_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "flowtag",
            "tag",
            "flows.log",
            "lookup.csv",
            "--config",
            "/etc/flowtag.toml",
            "--log-level",
            "debug",
            "--output",
            "json",
        ])
        .expect("parse succeeded");
        assert_eq!(cli.config, Some(PathBuf::from("/etc/flowtag.toml")));
        assert_eq!(cli.log_level, Some("debug".to_owned()));
        assert!(matches!(cli.output, OutputFormat::Json));
    }

    #[test]
    fn test_cli_parse_invalid_output_format() {
        let args = Cli::try_parse_from(["flowtag", "--output", "yaml", "config", "validate"]);
        assert!(args.is_err(), "unknown output format should be rejected");
    }

    #[test]
    fn test_cli_debug_assert() {
        Cli::command().debug_assert();
    }
}
