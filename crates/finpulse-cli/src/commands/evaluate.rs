//! Evaluate command implementation

use anyhow::{Context, Result};
use finpulse_core::evaluate::{evaluate_with, Evaluation, EvaluationStatus, Severity};
use finpulse_core::Config;

use super::{prepare, snapshot_for, summary_for, Prepared};
use crate::cli::InputArgs;

pub fn evaluation_for(config: &Config, prepared: &Prepared) -> Evaluation {
    let snapshot = snapshot_for(prepared);
    let summary = summary_for(prepared);
    evaluate_with(&config.evaluation, &snapshot, Some(&summary))
}

pub fn cmd_evaluate(config: &Config, args: &InputArgs, json: bool) -> Result<()> {
    let prepared = prepare(config, args)?;
    let evaluation = evaluation_for(config, &prepared);

    if json {
        let out = serde_json::to_string_pretty(&evaluation)
            .context("Failed to serialize evaluation")?;
        println!("{}", out);
        return Ok(());
    }

    println!();
    match (evaluation.status, evaluation.score) {
        (EvaluationStatus::Ok, Some(score)) => println!("🩺 Financial health: {}/100", score),
        _ => println!("🩺 Financial health: not enough data"),
    }
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   {}", evaluation.summary);

    if !evaluation.insights.is_empty() {
        println!();
        for insight in &evaluation.insights {
            let icon = match insight.severity {
                Severity::Info => "💡",
                Severity::Warn => "⚠️ ",
                Severity::Risk => "🚨",
            };
            println!("   {} {}", icon, insight.title);
            println!("      {}", insight.detail);
        }
    }

    println!();
    println!("   Next steps:");
    for action in &evaluation.next_actions {
        println!("     → {} ({})", action.label, action.route);
    }
    println!();
    Ok(())
}
