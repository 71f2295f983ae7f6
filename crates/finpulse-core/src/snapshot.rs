//! Snapshot Builder
//!
//! Turns raw transaction and account rows into the per-period dashboard view:
//! a bucketed spending series split by [`SpendCategory`], trailing-window KPIs,
//! and the most recent transactions.
//!
//! Chart bucketing and KPIs are independent. The chart covers
//! `[now - window, now]` for the requested [`Period`]; the KPIs always use fixed
//! trailing 30-day (and prior 30-day) windows.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::category::{classify, SpendCategory};
use crate::models::{normalize_currency, Account, Period, Transaction};

/// Number of entries in `recentTransactions`
pub const RECENT_TRANSACTION_LIMIT: usize = 4;

/// Fixed due-in estimate reported with `upcomingBills`
pub const UPCOMING_BILLS_DUE_IN_DAYS: u32 = 7;

const KPI_WINDOW_DAYS: i64 = 30;
const BALANCE_TREND_DAYS: i64 = 7;

const SPEND_TREND_BOUND: f64 = 0.9;
const SAVINGS_RATE_MAX: f64 = 0.95;
const SAVINGS_TREND_BOUND_PTS: f64 = 50.0;
const BALANCE_TREND_BOUND: f64 = 0.5;

/// Per-bucket spending, one value per bucket in each sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub total: Vec<i64>,
    pub essentials: Vec<i64>,
    pub leisure: Vec<i64>,
    pub subscriptions: Vec<i64>,
}

impl Series {
    fn zeroed(len: usize) -> Self {
        Self {
            total: vec![0; len],
            essentials: vec![0; len],
            leisure: vec![0; len],
            subscriptions: vec![0; len],
        }
    }
}

/// Headline numbers shown above the chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpis {
    pub current_balance: f64,
    /// Fractional change vs the balance 7 days ago, in [-0.5, 0.5]
    pub current_balance_trend_pct: f64,
    pub monthly_spend: f64,
    /// Fractional change vs the prior 30 days, in [-0.9, 0.9]
    pub monthly_spend_trend_pct: f64,
    /// In [0, 0.95]
    pub savings_rate: f64,
    /// Percentage-point delta vs the prior 30 days, in [-50, 50]
    pub savings_rate_trend_pct_points: f64,
    pub upcoming_bills: f64,
    pub upcoming_bills_due_in_days: u32,
}

impl Kpis {
    fn zeroed() -> Self {
        Self {
            current_balance: 0.0,
            current_balance_trend_pct: 0.0,
            monthly_spend: 0.0,
            monthly_spend_trend_pct: 0.0,
            savings_rate: 0.0,
            savings_rate_trend_pct_points: 0.0,
            upcoming_bills: 0.0,
            upcoming_bills_due_in_days: UPCOMING_BILLS_DUE_IN_DAYS,
        }
    }
}

/// Display record for the "recent activity" list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentTransaction {
    pub id: String,
    pub date: DateTime<Utc>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counterparty_label: Option<String>,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
    /// Only present for expenses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<SpendCategory>,
}

impl RecentTransaction {
    fn from_transaction(tx: &Transaction) -> Self {
        Self {
            id: tx.id.clone(),
            date: tx.date,
            name: tx.name.clone(),
            counterparty_label: tx.counterparty_label.clone(),
            amount: tx.amount,
            currency_code: tx.currency_code.clone(),
            category: tx
                .is_expense()
                .then(|| classify(tx.category.as_deref())),
        }
    }
}

/// Derived per-period view. Built fresh per request, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub period: Period,
    pub currency_code: Option<String>,
    pub labels: Vec<String>,
    pub series: Series,
    /// Same values as `series.total`
    pub points: Vec<i64>,
    pub kpis: Kpis,
    pub recent_transactions: Vec<RecentTransaction>,
}

impl Snapshot {
    /// True when every chart point is zero
    pub fn is_flat(&self) -> bool {
        self.points.iter().all(|p| *p == 0) && self.series.total.iter().all(|p| *p == 0)
    }
}

/// Snapshot for a user with no data: zero series of the configured length and
/// zero KPIs. Labels are positional since there is no reference time.
pub fn build_empty(period: Period) -> Snapshot {
    let count = period.bucket_count();
    let series = Series::zeroed(count);

    Snapshot {
        period,
        currency_code: None,
        labels: (1..=count).map(|i| i.to_string()).collect(),
        points: series.total.clone(),
        series,
        kpis: Kpis::zeroed(),
        recent_transactions: Vec::new(),
    }
}

/// Build the snapshot for `period` as of `now`
pub fn build(
    period: Period,
    accounts: &[Account],
    transactions: &[Transaction],
    now: DateTime<Utc>,
) -> Snapshot {
    let usable: Vec<&Transaction> = transactions
        .iter()
        .filter(|tx| {
            let finite = tx.amount.is_finite();
            if !finite {
                tracing::warn!(id = %tx.id, "Skipping transaction with non-finite amount");
            }
            finite
        })
        .collect();

    let window_start = now - Duration::days(period.window_days());
    let (series, charted, skipped) = bucket_expenses(period, &usable, window_start, now);
    let labels = bucket_labels(period, window_start);
    let kpis = compute_kpis(accounts, &usable, &series, now);

    tracing::debug!(
        period = period.as_str(),
        transactions = usable.len(),
        charted,
        skipped,
        "Snapshot built"
    );

    Snapshot {
        period,
        currency_code: infer_currency(accounts),
        labels,
        points: series.total.clone(),
        series,
        kpis,
        recent_transactions: recent_transactions(&usable),
    }
}

/// Bucket width in milliseconds for `period`
fn bucket_width_ms(period: Period) -> f64 {
    Duration::days(period.window_days()).num_milliseconds() as f64 / period.bucket_count() as f64
}

/// Accumulate expense magnitudes per bucket. Returns the rounded series plus
/// counts of charted and out-of-window expenses.
fn bucket_expenses(
    period: Period,
    transactions: &[&Transaction],
    window_start: DateTime<Utc>,
    now: DateTime<Utc>,
) -> (Series, usize, usize) {
    let count = period.bucket_count();
    let width = bucket_width_ms(period);

    let mut total = vec![0.0_f64; count];
    let mut essentials = vec![0.0_f64; count];
    let mut leisure = vec![0.0_f64; count];
    let mut subscriptions = vec![0.0_f64; count];
    let (mut charted, mut skipped) = (0, 0);

    for tx in transactions.iter().filter(|tx| tx.is_expense()) {
        if tx.date < window_start || tx.date > now {
            skipped += 1;
            continue;
        }

        let offset = (tx.date - window_start).num_milliseconds() as f64;
        let index = ((offset / width).floor() as usize).min(count - 1);
        let magnitude = tx.magnitude();

        total[index] += magnitude;
        match classify(tx.category.as_deref()) {
            SpendCategory::Essentials => essentials[index] += magnitude,
            SpendCategory::Leisure => leisure[index] += magnitude,
            SpendCategory::Subscriptions => subscriptions[index] += magnitude,
        }
        charted += 1;
    }

    let round = |values: Vec<f64>| -> Vec<i64> {
        values.into_iter().map(|v| v.round() as i64).collect()
    };
    let series = Series {
        total: round(total),
        essentials: round(essentials),
        leisure: round(leisure),
        subscriptions: round(subscriptions),
    };

    (series, charted, skipped)
}

fn bucket_labels(period: Period, window_start: DateTime<Utc>) -> Vec<String> {
    let width = bucket_width_ms(period);
    let format = match period {
        Period::OneWeek => "%a",
        Period::OneMonth | Period::ThreeMonths => "%b %-d",
        Period::OneYear => "%b",
        Period::All => "%b %y",
    };

    (0..period.bucket_count())
        .map(|i| {
            let start = window_start + Duration::milliseconds((width * i as f64).round() as i64);
            start.format(format).to_string()
        })
        .collect()
}

/// Income and spend totals over one window
#[derive(Debug, Default, Clone, Copy)]
struct Flows {
    income: f64,
    spend: f64,
}

impl Flows {
    fn collect(transactions: &[&Transaction], in_window: impl Fn(&Transaction) -> bool) -> Self {
        let mut flows = Flows::default();
        for tx in transactions.iter().copied() {
            if !in_window(tx) {
                continue;
            }
            if tx.is_expense() {
                flows.spend += tx.magnitude();
            } else {
                flows.income += tx.amount;
            }
        }
        flows
    }

    fn savings_rate(&self) -> f64 {
        if self.income > 0.0 {
            clamp((self.income - self.spend) / self.income, 0.0, SAVINGS_RATE_MAX)
        } else {
            0.0
        }
    }
}

fn compute_kpis(
    accounts: &[Account],
    transactions: &[&Transaction],
    series: &Series,
    now: DateTime<Utc>,
) -> Kpis {
    let this_start = now - Duration::days(KPI_WINDOW_DAYS);
    let prev_start = this_start - Duration::days(KPI_WINDOW_DAYS);

    let this30 = Flows::collect(transactions, |tx| tx.date >= this_start && tx.date <= now);
    let prev30 = Flows::collect(transactions, |tx| {
        tx.date >= prev_start && tx.date < this_start
    });

    let monthly_spend_trend_pct = if prev30.spend == 0.0 {
        0.0
    } else {
        clamp(
            (this30.spend - prev30.spend) / prev30.spend,
            -SPEND_TREND_BOUND,
            SPEND_TREND_BOUND,
        )
    };

    let savings_rate = this30.savings_rate();
    let savings_rate_trend_pct_points = clamp(
        (savings_rate - prev30.savings_rate()) * 100.0,
        -SAVINGS_TREND_BOUND_PTS,
        SAVINGS_TREND_BOUND_PTS,
    );

    let current_balance: f64 = accounts
        .iter()
        .filter_map(|a| a.current_balance)
        .filter(|b| b.is_finite())
        .sum();
    let balance_start = now - Duration::days(BALANCE_TREND_DAYS);
    let net_recent: f64 = transactions
        .iter()
        .filter(|tx| tx.date >= balance_start && tx.date <= now)
        .map(|tx| tx.amount)
        .sum();
    let prior_balance = current_balance - net_recent;
    let current_balance_trend_pct = if prior_balance == 0.0 {
        0.0
    } else {
        clamp(
            (current_balance - prior_balance) / prior_balance.abs(),
            -BALANCE_TREND_BOUND,
            BALANCE_TREND_BOUND,
        )
    };

    // Rough heuristic: half of what subscriptions cost over the charted window
    let upcoming_bills = series.subscriptions.iter().sum::<i64>() as f64 / 2.0;

    Kpis {
        current_balance,
        current_balance_trend_pct,
        monthly_spend: this30.spend,
        monthly_spend_trend_pct,
        savings_rate,
        savings_rate_trend_pct_points,
        upcoming_bills,
        upcoming_bills_due_in_days: UPCOMING_BILLS_DUE_IN_DAYS,
    }
}

/// Most frequent valid currency among accounts; ties go to the first seen
fn infer_currency(accounts: &[Account]) -> Option<String> {
    let mut counts: Vec<(String, usize)> = Vec::new();

    for code in accounts
        .iter()
        .filter_map(|a| a.currency_code.as_deref())
        .filter_map(normalize_currency)
    {
        match counts.iter_mut().find(|(c, _)| *c == code) {
            Some((_, n)) => *n += 1,
            None => counts.push((code, 1)),
        }
    }

    let mut best: Option<(String, usize)> = None;
    for (code, n) in counts {
        if best.as_ref().map_or(true, |(_, top)| n > *top) {
            best = Some((code, n));
        }
    }
    best.map(|(code, _)| code)
}

fn recent_transactions(transactions: &[&Transaction]) -> Vec<RecentTransaction> {
    let mut ordered: Vec<&Transaction> = transactions.to_vec();
    // Stable sort keeps input order for identical timestamps
    ordered.sort_by(|a, b| b.date.cmp(&a.date));

    ordered
        .into_iter()
        .take(RECENT_TRANSACTION_LIMIT)
        .map(RecentTransaction::from_transaction)
        .collect()
}

/// Clamp that maps NaN to zero
pub(crate) fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(min, max)
    }
}
