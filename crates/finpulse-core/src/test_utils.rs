//! Test utilities for finpulse-core
//!
//! Fixture builders shared by unit tests, integration tests and the CLI tests.
//! Every fixture is anchored to [`fixed_now`] so window arithmetic is
//! deterministic.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::models::{Account, Transaction};

static COUNTER: AtomicU64 = AtomicU64::new(0);

/// The reference "now" used by fixtures: 2026-03-15 12:00:00 UTC
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap()
}

pub fn days_ago(days: i64) -> DateTime<Utc> {
    fixed_now() - Duration::days(days)
}

pub fn hours_ago(hours: i64) -> DateTime<Utc> {
    fixed_now() - Duration::hours(hours)
}

/// Build a transaction with a unique id
pub fn transaction(date: DateTime<Utc>, amount: f64, category: Option<&str>) -> Transaction {
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    Transaction {
        id: format!("tx_{}", n),
        date,
        name: format!("Transaction {}", n),
        counterparty_label: None,
        amount,
        currency_code: Some("USD".to_string()),
        category: category.map(str::to_string),
    }
}

/// An outflow of `magnitude` (the sign is applied here)
pub fn expense(date: DateTime<Utc>, magnitude: f64, category: Option<&str>) -> Transaction {
    transaction(date, -magnitude.abs(), category)
}

pub fn income(date: DateTime<Utc>, amount: f64) -> Transaction {
    transaction(date, amount.abs(), None)
}

pub fn account(current_balance: f64, currency: Option<&str>) -> Account {
    Account {
        current_balance: Some(current_balance),
        available_balance: None,
        currency_code: currency.map(str::to_string),
    }
}

/// Approximate float comparison for KPI assertions
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}
