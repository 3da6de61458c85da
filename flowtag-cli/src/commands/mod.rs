//! Command handlers -- one module per subcommand

use std::path::Path;

use flowtag_core::config::FlowtagConfig;

use crate::error::CliError;

pub mod clean;
pub mod config;
pub mod tag;

/// Configuration file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "flowtag.toml";

/// Load the effective configuration.
///
/// An explicit path must exist. Without one, `flowtag.toml` is used when present,
/// otherwise defaults plus environment overrides.
pub async fn load_config(explicit: Option<&Path>) -> Result<FlowtagConfig, CliError> {
    let config = match explicit {
        Some(path) => FlowtagConfig::load(path).await?,
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if tokio::fs::try_exists(default_path).await.unwrap_or(false) {
                FlowtagConfig::load(default_path).await?
            } else {
                FlowtagConfig::from_env()?
            }
        }
    };
    Ok(config)
}

/// Human-readable name of the configuration source.
pub fn config_source(explicit: Option<&Path>) -> String {
    match explicit {
        Some(path) => path.display().to_string(),
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => DEFAULT_CONFIG_FILE.to_owned(),
        None => "(defaults)".to_owned(),
    }
}
