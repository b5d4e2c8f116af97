use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::process::ExitCode;

use hours_migrate::api::SheetClient;
use hours_migrate::cli::Cli;
use hours_migrate::config::{self, MigrationConfig};
use hours_migrate::migrate::{self, MigrationOutcome};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => {
            println!("{}", "Done!".green().bold());
            ExitCode::SUCCESS
        }
        Err(err) => {
            println!("{} {:#}", "ERROR:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    config::load_env_file(cli.env_file.as_deref())?;
    let config = MigrationConfig::from_env(&cli.overrides())?;
    log::debug!("Configuration: {:?}", config);

    let client = SheetClient::new(&config.api);
    match migrate::run(&client, &config, cli.dry_run).await? {
        MigrationOutcome::DryRun { rows, .. } => {
            let payload =
                serde_json::to_string_pretty(&rows).context("Failed to render dry-run payload")?;
            println!("{}", payload);
            println!(
                "{}",
                format!("Dry run: {} rows would be added", rows.len()).yellow()
            );
        }
        MigrationOutcome::NothingToAdd { .. } => {
            println!("{}", "Nothing to add".yellow());
        }
        MigrationOutcome::Applied { rows_added, .. } => {
            log::info!("Added {} rows", rows_added);
        }
    }

    Ok(())
}
