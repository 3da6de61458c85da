//! `flowtag config` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::cli::{ConfigAction, ConfigArgs};
use crate::commands::{config_source, load_config};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Sections accepted by `config show --section`.
const SECTIONS: [&str; 3] = ["general", "tagger", "output"];

/// Execute the `config` command.
pub async fn execute(
    args: ConfigArgs,
    config_path: Option<&Path>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match args.action {
        ConfigAction::Validate => execute_validate(config_path, writer).await,
        ConfigAction::Show { section } => execute_show(config_path, section, writer).await,
    }
}

/// Load and validate the configuration, reporting any errors.
///
/// # Errors
///
/// Returns `CliError::Config` if validation fails.
async fn execute_validate(config_path: Option<&Path>, writer: &OutputWriter) -> Result<(), CliError> {
    let source = config_source(config_path);
    info!(source = %source, "validating configuration");

    let report = match load_config(config_path).await {
        Ok(_) => ConfigValidationReport {
            source,
            valid: true,
            errors: Vec::new(),
        },
        Err(e) => ConfigValidationReport {
            source,
            valid: false,
            errors: vec![e.to_string()],
        },
    };

    writer.render(&report)?;

    if !report.valid {
        return Err(CliError::Config("configuration is invalid".to_owned()));
    }

    Ok(())
}

/// Display the effective configuration (file + env overrides + defaults).
///
/// # Errors
///
/// Returns the load error, or `CliError::Command` if the section name is unknown.
async fn execute_show(
    config_path: Option<&Path>,
    section: Option<String>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let source = config_source(config_path);
    info!(source = %source, "loading configuration");

    let config = load_config(config_path).await?;

    let config_toml = match section.as_deref() {
        None => toml::to_string_pretty(&config),
        Some("general") => toml::to_string_pretty(&config.general),
        Some("tagger") => toml::to_string_pretty(&config.tagger),
        Some("output") => toml::to_string_pretty(&config.output),
        Some(other) => {
            return Err(CliError::Command(format!(
                "unknown section: {} (expected: {})",
                other,
                SECTIONS.join(", ")
            )));
        }
    }
    .map_err(|e| CliError::Command(format!("failed to serialize configuration: {e}")))?;

    let report = ConfigReport {
        source,
        section,
        config_toml,
    };
    writer.render(&report)?;

    Ok(())
}

/// Configuration display report.
///
/// The `config_toml` field is only used for text rendering.
#[derive(Serialize)]
pub struct ConfigReport {
    /// Configuration source
    pub source: String,
    /// Optional section name (None = full config)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    #[serde(skip)]
    pub config_toml: String,
}

impl Render for ConfigReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        if let Some(ref section) = self.section {
            let section_label = format!("[{}]", section);
            writeln!(
                w,
                "Configuration {} (source: {})",
                section_label.bold(),
                self.source
            )?;
        } else {
            writeln!(w, "Configuration (source: {})", self.source.bold())?;
        }

        writeln!(w)?;
        write!(w, "{}", self.config_toml)?;

        Ok(())
    }
}

/// Configuration validation report.
#[derive(Serialize)]
pub struct ConfigValidationReport {
    /// Configuration source
    pub source: String,
    /// Whether the configuration is valid
    pub valid: bool,
    /// Validation error messages (empty if valid)
    pub errors: Vec<String>,
}

impl Render for ConfigValidationReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Config Validation: {}", self.source.bold())?;

        if self.valid {
            writeln!(w, "  Result: {}", "VALID".green().bold())?;
        } else {
            writeln!(w, "  Result: {}", "INVALID".red().bold())?;
            for err in &self.errors {
                writeln!(w, "  Error: {}", err.red())?;
            }
        }

        Ok(())
    }
}
