//! `pac` - Primorial Anchor Workbench runner.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;

use pac_runtime::report::{render_json, render_text};
use pac_runtime::telemetry::init_logging;
use pac_runtime::{export_csv, Cli, RunError, Runner};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.into_config().context("Invalid arguments")?;
    init_logging(&config.log_level, config.json_logs).context("Failed to initialize logging")?;

    let csv_path = config.csv_path.clone();
    let json = config.json_report;
    let runner = Runner::new(config)?;

    let outcome = match runner.run() {
        Ok(outcome) => outcome,
        Err(RunError::Falsified { source, partial }) => {
            if let Some(path) = &csv_path {
                export_csv(path, &partial)
                    .with_context(|| format!("Failed to export partial records to {}", path.display()))?;
            }
            error!(corrected = partial.len(), "Aborting: {source}");
            return Err(source).context("Law III falsified");
        }
        Err(err) => return Err(err.into()),
    };

    if let Some(path) = &csv_path {
        export_csv(path, &outcome.records)
            .with_context(|| format!("Failed to export records to {}", path.display()))?;
    }

    if json {
        println!("{}", render_json(&outcome).context("Failed to serialize report")?);
    } else {
        print!("{}", render_text(&outcome));
    }
    Ok(())
}
