//! `bioking`: command-line client for the `BioKing` workflows.
//!
//! Entry point for the bioking application.

use bioking_webhook::config::{Cli, Command, ValidatedConfig, write_default_config};
use bioking_webhook::time::SystemClock;
use std::process::ExitCode;

mod app;
mod run;

use app::{exit_code, print_config_hint, setup_tracing};

/// Main entry point.
///
/// Excluded from coverage as it's the thin wrapper around testable components.
#[cfg(not(tarpaulin_include))]
fn main() -> ExitCode {
    let cli = Cli::parse_args();

    // Handle init subcommand
    if let Command::Init { output } = &cli.command {
        return handle_init(output);
    }

    // Load and validate configuration
    let config = match ValidatedConfig::load(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            print_config_hint(&e);
            return exit_code::CONFIG_ERROR;
        }
    };

    setup_tracing(config.verbose);
    tracing::info!("{config}");

    run_command(cli.command, &config)
}

/// Handles the `init` subcommand.
fn handle_init(output: &std::path::Path) -> ExitCode {
    match write_default_config(output) {
        Ok(()) => {
            println!("Configuration template written to: {}", output.display());
            exit_code::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            exit_code::CONFIG_ERROR
        }
    }
}

/// Sends the command's request and prints the outcome.
///
/// Excluded from coverage - requires async runtime and network access.
#[cfg(not(tarpaulin_include))]
fn run_command(command: Command, config: &ValidatedConfig) -> ExitCode {
    let client = match config.build_client() {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return exit_code::CONFIG_ERROR;
        }
    };

    let runtime = tokio::runtime::Runtime::new().expect("Failed to create Tokio runtime");

    match runtime.block_on(run::execute(command, config, &client, SystemClock)) {
        Ok(output) => {
            match serde_json::to_string_pretty(&output.body) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    tracing::error!("Failed to print output: {e}");
                    return exit_code::CONFIG_ERROR;
                }
            }
            if output.success {
                exit_code::SUCCESS
            } else {
                exit_code::request_failed()
            }
        }
        Err(e) => {
            tracing::error!("{e}");
            exit_code::CONFIG_ERROR
        }
    }
}
