//! Shared utilities for the view commands
//!
//! - `load_config` - Resolve the config file
//! - `load_inputs` - Read and combine every `--input` file
//! - `resolve_period` / `resolve_now` - Turn flags into core types
//! - `prepare` - All of the above for one command invocation

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use finpulse_core::import::{load_dataset, parse_date, Dataset};
use finpulse_core::{Config, Period};

use crate::cli::InputArgs;

/// Everything a view command needs once flags are resolved
#[derive(Debug)]
pub struct Prepared {
    pub dataset: Dataset,
    pub period: Period,
    pub now: DateTime<Utc>,
}

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    Config::load(path).context("Failed to load config")
}

/// Load each input file and concatenate accounts and transactions
pub fn load_inputs(paths: &[PathBuf]) -> Result<Dataset> {
    let mut dataset = Dataset::default();
    for path in paths {
        let loaded = load_dataset(path)
            .with_context(|| format!("Failed to load {}", path.display()))?;
        dataset.extend(loaded);
    }
    tracing::debug!(
        files = paths.len(),
        accounts = dataset.accounts.len(),
        transactions = dataset.transactions.len(),
        "Inputs loaded"
    );
    Ok(dataset)
}

/// `--period` if given, otherwise the configured default
pub fn resolve_period(flag: Option<&str>, config: &Config) -> Result<Period> {
    match flag {
        Some(p) => p.parse::<Period>().map_err(anyhow::Error::msg),
        None => Ok(config.snapshot.default_period),
    }
}

/// `--now` if given, otherwise the current time
pub fn resolve_now(flag: Option<&str>) -> Result<DateTime<Utc>> {
    match flag {
        Some(s) => parse_date(s).context("Invalid --now (use RFC 3339 or YYYY-MM-DD)"),
        None => Ok(Utc::now()),
    }
}

pub fn prepare(config: &Config, args: &InputArgs) -> Result<Prepared> {
    let period = resolve_period(args.period.as_deref(), config)?;
    let now = resolve_now(args.now.as_deref())?;
    let dataset = load_inputs(&args.inputs)?;
    Ok(Prepared {
        dataset,
        period,
        now,
    })
}
