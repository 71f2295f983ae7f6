//! Report command implementation

use anyhow::{Context, Result};
use finpulse_core::report::{build_report, FinanceReport};
use finpulse_core::Config;

use super::{prepare, Prepared};
use crate::cli::InputArgs;

pub fn report_for(config: &Config, prepared: &Prepared) -> FinanceReport {
    build_report(
        config,
        prepared.period,
        &prepared.dataset.accounts,
        &prepared.dataset.transactions,
        prepared.now,
    )
}

/// Print the combined report as compact grounding JSON
pub fn cmd_report(config: &Config, args: &InputArgs) -> Result<()> {
    let prepared = prepare(config, args)?;
    let report = report_for(config, &prepared);
    let json = report
        .to_grounding_json()
        .context("Failed to serialize report")?;
    println!("{}", json);
    Ok(())
}
