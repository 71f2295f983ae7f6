//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Finpulse - Personal finance snapshots and health scores
#[derive(Parser)]
#[command(name = "finpulse")]
#[command(about = "Dashboard snapshots, spending summaries and health evaluation", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to ~/.config/finpulse/config.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Inputs shared by every view command
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Dataset file (.json or .csv); repeat to combine several
    #[arg(short, long = "input", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Period: 1W, 1M, 3M, 1Y, ALL (defaults to the configured period)
    #[arg(short, long)]
    pub period: Option<String>,

    /// Reference time, RFC 3339 or YYYY-MM-DD (defaults to now)
    #[arg(long)]
    pub now: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the dashboard snapshot
    Snapshot {
        #[command(flatten)]
        input: InputArgs,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Summarize income, spend and top categories for the period
    Summary {
        #[command(flatten)]
        input: InputArgs,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Score financial health and list insights
    Evaluate {
        #[command(flatten)]
        input: InputArgs,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print snapshot, summary and evaluation as one JSON document
    Report {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Show the resolved configuration
    Config,
}
