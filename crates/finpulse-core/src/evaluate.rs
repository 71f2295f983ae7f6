//! Evaluation Engine - heuristic financial health score
//!
//! Reads a [`Snapshot`] (and optionally a [`SpendingSummary`]) and produces a
//! 0-100 score, short insights, and links to act on them. The output is shown
//! on the dashboard and handed to the assistant as precomputed grounding, so
//! it must be deterministic for a given input.
//!
//! ## Score
//!
//! Starts at 50. Each adjustment is clamped on its own before summing:
//!
//! | term | formula | range |
//! |------|---------|-------|
//! | savings | `(savingsRate - 0.20) * 120` | -30..40 |
//! | spend trend | `-spendTrend * 25` | -15..15 |
//! | balance trend | `balanceTrend * 20` | -10..10 |
//! | concentration | `-(top1Share - 0.35) * 40` | -12..0 |

use serde::{Deserialize, Serialize};

use crate::config::EvaluationConfig;
use crate::snapshot::{clamp, Snapshot};
use crate::summary::SpendingSummary;

const BASE_SCORE: f64 = 50.0;
const TARGET_SAVINGS_RATE: f64 = 0.20;
const CONCENTRATION_THRESHOLD: f64 = 0.35;
const TREND_ALERT: f64 = 0.15;
const CONCENTRATION_ALERT: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationStatus {
    Ok,
    NoData,
}

impl EvaluationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::NoData => "no_data",
        }
    }
}

/// Severity level of an insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational - no action needed
    Info,
    /// Worth a look
    Warn,
    /// Likely hurting the user's finances
    Risk,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Risk => "risk",
        }
    }

    /// Numeric priority for sorting (higher = more urgent)
    pub fn priority(&self) -> u8 {
        match self {
            Severity::Info => 1,
            Severity::Warn => 2,
            Severity::Risk => 3,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub severity: Severity,
    pub title: String,
    pub detail: String,
}

impl Insight {
    fn new(severity: Severity, title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity,
            title: title.into(),
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NextAction {
    pub label: String,
    pub route: String,
}

impl NextAction {
    fn new(label: impl Into<String>, route: &str) -> Self {
        Self {
            label: label.into(),
            route: route.to_string(),
        }
    }
}

/// Inputs that drove the score, echoed back for display and grounding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationMetrics {
    pub savings_rate: f64,
    pub spend_trend_pct: f64,
    pub balance_trend_pct: f64,
    pub monthly_spend: f64,
    pub current_balance: f64,
    pub upcoming_bills: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub income: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spend: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top1_share: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub status: EvaluationStatus,
    /// 0-100, null when there is no data
    pub score: Option<u8>,
    pub summary: String,
    pub insights: Vec<Insight>,
    pub next_actions: Vec<NextAction>,
    pub metrics: EvaluationMetrics,
}

/// Evaluate with default routes and currency symbol
pub fn evaluate(snapshot: &Snapshot, summary: Option<&SpendingSummary>) -> Evaluation {
    evaluate_with(&EvaluationConfig::default(), snapshot, summary)
}

pub fn evaluate_with(
    config: &EvaluationConfig,
    snapshot: &Snapshot,
    summary: Option<&SpendingSummary>,
) -> Evaluation {
    let metrics = collect_metrics(snapshot, summary);

    if has_no_data(snapshot) {
        tracing::debug!(period = snapshot.period.as_str(), "No data to evaluate");
        return no_data(config, metrics);
    }

    let score = score(&metrics);
    let insights = insights(config, snapshot, summary, &metrics);
    let summary_text = summary_sentences(config, snapshot, &metrics, score);

    tracing::debug!(
        period = snapshot.period.as_str(),
        score,
        insights = insights.len(),
        "Evaluation complete"
    );

    Evaluation {
        status: EvaluationStatus::Ok,
        score: Some(score),
        summary: summary_text,
        insights,
        next_actions: vec![
            NextAction::new("View dashboard", &config.dashboard_route),
            NextAction::new("Manage connections", &config.connections_route),
        ],
        metrics,
    }
}

/// No transactions, a flat chart, and zero headline KPIs
fn has_no_data(snapshot: &Snapshot) -> bool {
    let k = &snapshot.kpis;
    snapshot.recent_transactions.is_empty()
        && snapshot.is_flat()
        && k.current_balance == 0.0
        && k.monthly_spend == 0.0
        && k.savings_rate == 0.0
}

fn no_data(config: &EvaluationConfig, metrics: EvaluationMetrics) -> Evaluation {
    Evaluation {
        status: EvaluationStatus::NoData,
        score: None,
        summary: "There isn't enough data to evaluate your finances yet. \
                  Connect an account to get a health score."
            .to_string(),
        insights: vec![Insight::new(
            Severity::Info,
            "Connect your accounts",
            "Link a bank account so spending, savings rate and trends can be calculated.",
        )],
        next_actions: vec![
            NextAction::new("Connect a bank account", &config.connections_route),
            NextAction::new("Go to dashboard", &config.dashboard_route),
        ],
        metrics,
    }
}

fn collect_metrics(snapshot: &Snapshot, summary: Option<&SpendingSummary>) -> EvaluationMetrics {
    let k = &snapshot.kpis;
    let top = summary.and_then(|s| s.top_category().map(|top| (s, top)));

    // Share of spend in the leading category; absent without spend or categories
    let top1_share = top.and_then(|(s, top)| {
        (s.spend > 0.0).then(|| clamp(top.amount / s.spend, 0.0, 1.0))
    });

    EvaluationMetrics {
        savings_rate: k.savings_rate,
        spend_trend_pct: k.monthly_spend_trend_pct,
        balance_trend_pct: k.current_balance_trend_pct,
        monthly_spend: k.monthly_spend,
        current_balance: k.current_balance,
        upcoming_bills: k.upcoming_bills,
        income: summary.map(|s| s.income),
        spend: summary.map(|s| s.spend),
        top_category: top1_share.and(top.map(|(_, top)| top.category.clone())),
        top1_share,
    }
}

fn score(m: &EvaluationMetrics) -> u8 {
    let mut score = BASE_SCORE;
    score += clamp((m.savings_rate - TARGET_SAVINGS_RATE) * 120.0, -30.0, 40.0);
    score += clamp(-m.spend_trend_pct * 25.0, -15.0, 15.0);
    score += clamp(m.balance_trend_pct * 20.0, -10.0, 10.0);
    if let Some(share) = m.top1_share {
        score -= clamp((share - CONCENTRATION_THRESHOLD) * 40.0, 0.0, 12.0);
    }
    score.round().clamp(0.0, 100.0) as u8
}

fn insights(
    config: &EvaluationConfig,
    snapshot: &Snapshot,
    summary: Option<&SpendingSummary>,
    m: &EvaluationMetrics,
) -> Vec<Insight> {
    let mut insights = Vec::new();

    if let Some(s) = summary {
        if m.savings_rate == 0.0 && s.income == 0.0 && s.spend > 0.0 {
            insights.push(Insight::new(
                Severity::Warn,
                "Income not detected",
                "No income showed up in this period, so your savings rate reads as 0%. \
                 Connect the account your pay lands in for an accurate picture.",
            ));
        }
    }

    if m.spend_trend_pct > TREND_ALERT {
        insights.push(Insight::new(
            Severity::Risk,
            "Spending is trending up",
            format!(
                "You spent {}% more in the last 30 days than in the 30 days before.",
                percent(m.spend_trend_pct)
            ),
        ));
    } else if m.spend_trend_pct < -TREND_ALERT {
        insights.push(Insight::new(
            Severity::Info,
            "Spending is trending down",
            format!(
                "You spent {}% less in the last 30 days than in the 30 days before.",
                percent(m.spend_trend_pct.abs())
            ),
        ));
    }

    if m.upcoming_bills > 0.0 {
        insights.push(Insight::new(
            Severity::Info,
            "Upcoming bills",
            format!(
                "About {} in subscription charges may come due in the next {} days.",
                money(config, snapshot, m.upcoming_bills),
                snapshot.kpis.upcoming_bills_due_in_days
            ),
        ));
    }

    if let (Some(share), Some(category)) = (m.top1_share, m.top_category.as_deref()) {
        if share > CONCENTRATION_ALERT {
            insights.push(Insight::new(
                Severity::Warn,
                format!("{} dominates your spending", category),
                format!(
                    "{} accounts for {}% of what you spent in this period.",
                    category,
                    percent(share)
                ),
            ));
        }
    }

    insights
}

fn summary_sentences(
    config: &EvaluationConfig,
    snapshot: &Snapshot,
    m: &EvaluationMetrics,
    score: u8,
) -> String {
    let mut sentences = vec![
        format!("Your financial health score is {}/100.", score),
        format!(
            "You spent about {} in the last 30 days.",
            money(config, snapshot, m.monthly_spend)
        ),
        format!("Your savings rate is {}%.", percent(m.savings_rate)),
    ];
    if let (Some(share), Some(category)) = (m.top1_share, m.top_category.as_deref()) {
        sentences.push(format!(
            "{} makes up {}% of your spending.",
            category,
            percent(share)
        ));
    }
    sentences.join(" ")
}

/// A ratio as a rounded whole percent
fn percent(ratio: f64) -> i64 {
    (ratio * 100.0).round() as i64
}

/// Rounded amount with thousands separators. Uses the configured symbol for
/// USD or unknown currency, otherwise suffixes the ISO code.
fn money(config: &EvaluationConfig, snapshot: &Snapshot, amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if rounded < 0 { "-" } else { "" };

    match snapshot.currency_code.as_deref() {
        Some(code) if code != "USD" => format!("{}{} {}", sign, grouped, code),
        _ => format!("{}{}{}", sign, config.currency_symbol, grouped),
    }
}
