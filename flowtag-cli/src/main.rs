//! flowtag -- command-line entry point
//!
//! Parses arguments, loads configuration, installs logging and dispatches
//! to the command handlers. Errors are printed to stderr and mapped to
//! process exit codes by [`CliError::exit_code`].

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use std::process::ExitCode;

use clap::Parser;

use flowtag_core::config::GeneralConfig;

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::output::OutputWriter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            let code = u8::try_from(err.exit_code()).unwrap_or(1);
            ExitCode::from(code)
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config_path = cli.config.as_deref();
    let loaded = commands::load_config(config_path).await;

    let mut general = loaded
        .as_ref()
        .map(|config| config.general.clone())
        .unwrap_or_else(|_| GeneralConfig::default());
    if let Some(level) = &cli.log_level {
        general.log_level = level.clone();
    }
    logging::init_tracing(&general).map_err(|e| CliError::Config(e.to_string()))?;

    flowtag_core::metrics::describe_all();
    tracing::debug!(command = ?cli.command, "flowtag starting");

    let writer = OutputWriter::new(cli.output);

    match cli.command {
        Commands::Tag(args) => {
            let mut config = loaded?;
            config.general = general;
            commands::tag::execute(args, config, &writer).await
        }
        Commands::Clean(args) => commands::clean::execute(args, &writer).await,
        Commands::Config(args) => commands::config::execute(args, config_path, &writer).await,
    }
}
