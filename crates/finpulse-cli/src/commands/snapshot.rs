//! Snapshot command implementation

use anyhow::{Context, Result};
use finpulse_core::snapshot::{build, build_empty, Snapshot};
use finpulse_core::Config;

use super::{format_amount, format_pct, prepare, truncate, Prepared};
use crate::cli::InputArgs;

/// Snapshot for the prepared inputs; empty inputs give the zero snapshot
pub fn snapshot_for(prepared: &Prepared) -> Snapshot {
    let Prepared {
        dataset,
        period,
        now,
    } = prepared;
    if dataset.is_empty() {
        build_empty(*period)
    } else {
        build(*period, &dataset.accounts, &dataset.transactions, *now)
    }
}

pub fn cmd_snapshot(config: &Config, args: &InputArgs, json: bool) -> Result<()> {
    let prepared = prepare(config, args)?;
    let snapshot = snapshot_for(&prepared);

    if json {
        let out =
            serde_json::to_string_pretty(&snapshot).context("Failed to serialize snapshot")?;
        println!("{}", out);
        return Ok(());
    }

    print_snapshot(&snapshot);
    Ok(())
}

fn print_snapshot(snapshot: &Snapshot) {
    let k = &snapshot.kpis;
    let currency = snapshot.currency_code.as_deref().unwrap_or("");

    println!();
    println!("📈 Snapshot ({})", snapshot.period);
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   Balance:        {} {}  ({} vs last week)",
        format_amount(k.current_balance),
        currency,
        format_pct(k.current_balance_trend_pct)
    );
    println!(
        "   Spent (30d):    {} {}  ({} vs prior 30d)",
        format_amount(k.monthly_spend),
        currency,
        format_pct(k.monthly_spend_trend_pct)
    );
    println!(
        "   Savings rate:   {:.0}%  ({:+.1} pts)",
        k.savings_rate * 100.0,
        k.savings_rate_trend_pct_points
    );
    println!(
        "   Upcoming bills: {} {}  (next {} days)",
        format_amount(k.upcoming_bills),
        currency,
        k.upcoming_bills_due_in_days
    );

    println!();
    println!(
        "   {:<8} {:>9} {:>11} {:>9} {:>14}",
        "Bucket", "Total", "Essentials", "Leisure", "Subscriptions"
    );
    for (i, label) in snapshot.labels.iter().enumerate() {
        println!(
            "   {:<8} {:>9} {:>11} {:>9} {:>14}",
            label,
            snapshot.series.total[i],
            snapshot.series.essentials[i],
            snapshot.series.leisure[i],
            snapshot.series.subscriptions[i]
        );
    }

    if !snapshot.recent_transactions.is_empty() {
        println!();
        println!("   Recent activity");
        for tx in &snapshot.recent_transactions {
            let category = tx.category.map(|c| c.as_str()).unwrap_or("income");
            println!(
                "   {}  {:<28} {:>10.2}  {}",
                tx.date.format("%Y-%m-%d"),
                truncate(tx.counterparty_label.as_deref().unwrap_or(&tx.name), 28),
                tx.amount,
                category
            );
        }
    }
    println!();
}
