//! Summary command implementation

use anyhow::{Context, Result};
use finpulse_core::summary::{summarize_for, transactions_in_window, SpendingSummary};
use finpulse_core::Config;

use super::{format_amount, prepare, truncate, Prepared};
use crate::cli::InputArgs;

/// Summary over the same window the snapshot charts
pub fn summary_for(prepared: &Prepared) -> SpendingSummary {
    let windowed = transactions_in_window(
        &prepared.dataset.transactions,
        prepared.period,
        prepared.now,
    );
    summarize_for(prepared.period.as_str(), &windowed)
}

pub fn cmd_summary(config: &Config, args: &InputArgs, json: bool) -> Result<()> {
    let prepared = prepare(config, args)?;
    let summary = summary_for(&prepared);

    if json {
        let out = serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?;
        println!("{}", out);
        return Ok(());
    }

    println!();
    println!("💵 Spending summary ({})", summary.timeframe);
    println!("   ─────────────────────────────────────────────");
    println!("   Income:  {:>12}", format_amount(summary.income));
    println!("   Spend:   {:>12}", format_amount(summary.spend));
    println!("   Net:     {:>12}", format_amount(summary.net));

    if summary.top_categories.is_empty() {
        println!();
        println!("   No spending in this period.");
    } else {
        println!();
        println!("   Top categories");
        for entry in &summary.top_categories {
            let share = if summary.spend > 0.0 {
                entry.amount / summary.spend * 100.0
            } else {
                0.0
            };
            println!(
                "   {:<24} {:>10}  {:>5.1}%",
                truncate(&entry.category, 24),
                format_amount(entry.amount),
                share
            );
        }
    }
    println!();
    Ok(())
}
