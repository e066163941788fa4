//! iam-lifecycle CLI entry point
//!
//! Parses arguments, loads the effective configuration, initialises logging
//! and dispatches to the command handlers. Failures are printed to stderr and
//! mapped to exit codes via [`CliError::exit_code`].

mod cli;
mod commands;
mod error;
mod logging;
mod metrics_export;
mod output;

use clap::Parser;

use iam_lifecycle_core::config::GeneralConfig;

use crate::cli::{Cli, Commands};
use crate::error::CliError;
use crate::output::OutputWriter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let writer = OutputWriter::new(cli.output);

    if let Err(e) = dispatch(cli, &writer).await {
        eprintln!("error: {e}");
        std::process::exit(e.exit_code());
    }
}

async fn dispatch(cli: Cli, writer: &OutputWriter) -> Result<(), CliError> {
    let config_path = cli.config.as_deref();
    let log_level = cli.log_level.as_deref();

    match cli.command {
        Commands::Run(args) => {
            let loaded = commands::load_config(config_path).await?;
            init_logging(&loaded.config.general, log_level)?;
            tracing::info!(source = %loaded.source, "configuration loaded");
            commands::run::execute(args, &loaded.config, writer).await
        }
        Commands::Steps => {
            init_logging(&GeneralConfig::default(), log_level)?;
            commands::steps::execute(writer)
        }
        Commands::Config(args) => {
            // the config under inspection may itself be broken
            init_logging(&GeneralConfig::default(), log_level)?;
            commands::config::execute(args, config_path, writer).await
        }
    }
}

fn init_logging(general: &GeneralConfig, log_level: Option<&str>) -> Result<(), CliError> {
    logging::init_tracing(general, log_level).map_err(|e| CliError::Command(format!("{e:#}")))
}
