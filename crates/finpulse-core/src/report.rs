//! Finance report - snapshot, spending summary and evaluation in one view
//!
//! This is the payload the dashboard API returns and the assistant receives as
//! grounding context.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::Result;
use crate::evaluate::{evaluate_with, Evaluation};
use crate::models::{Account, Period, Transaction};
use crate::snapshot::{build, build_empty, Snapshot};
use crate::summary::{summarize_for, transactions_in_window, SpendingSummary};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceReport {
    pub generated_at: DateTime<Utc>,
    pub snapshot: Snapshot,
    pub spending_summary: SpendingSummary,
    pub evaluation: Evaluation,
}

impl FinanceReport {
    /// Compact JSON for embedding in an assistant prompt
    pub fn to_grounding_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Run snapshot -> summary -> evaluation for one period
///
/// The spending summary covers the same window the snapshot charts. With no
/// accounts and no transactions at all, the empty snapshot is used.
pub fn build_report(
    config: &Config,
    period: Period,
    accounts: &[Account],
    transactions: &[Transaction],
    now: DateTime<Utc>,
) -> FinanceReport {
    let snapshot = if accounts.is_empty() && transactions.is_empty() {
        build_empty(period)
    } else {
        build(period, accounts, transactions, now)
    };

    let windowed = transactions_in_window(transactions, period, now);
    let spending_summary = summarize_for(period.as_str(), &windowed);
    let evaluation = evaluate_with(&config.evaluation, &snapshot, Some(&spending_summary));

    tracing::info!(
        period = period.as_str(),
        accounts = accounts.len(),
        transactions = transactions.len(),
        status = evaluation.status.as_str(),
        "Finance report built"
    );

    FinanceReport {
        generated_at: now,
        snapshot,
        spending_summary,
        evaluation,
    }
}
