//! Finpulse CLI - Personal finance snapshots and health scores
//!
//! Usage:
//!   finpulse snapshot --input data.json           Dashboard chart and KPIs
//!   finpulse summary --input export.csv -p 3M     Income, spend, top categories
//!   finpulse evaluate --input data.json           Health score and insights
//!   finpulse report --input data.json             Everything, as grounding JSON

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr).compact())
        .init();

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Snapshot { input, json } => commands::cmd_snapshot(&config, &input, json),
        Commands::Summary { input, json } => commands::cmd_summary(&config, &input, json),
        Commands::Evaluate { input, json } => commands::cmd_evaluate(&config, &input, json),
        Commands::Report { input } => commands::cmd_report(&config, &input),
        Commands::Config => commands::cmd_config(&config, cli.config.as_deref()),
    }
}
