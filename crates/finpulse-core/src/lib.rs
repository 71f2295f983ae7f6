//! Finpulse Core Library
//!
//! Aggregation core for the Finpulse finance dashboard:
//! - Snapshot builder (chart series, KPIs, recent transactions)
//! - Spending summary (income, spend, top categories)
//! - Rule-based evaluation (health score, insights, next actions)
//! - Input loading for provider JSON exports and CSV files
//! - Layered TOML configuration

pub mod category;
pub mod config;
pub mod error;
pub mod evaluate;
pub mod import;
pub mod models;
pub mod report;
pub mod snapshot;
pub mod summary;

/// Fixtures for building transactions against a fixed clock
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use category::{classify, SpendCategory};
pub use config::{Config, EvaluationConfig, SnapshotSettings};
pub use error::{Error, Result};
pub use evaluate::{
    evaluate, evaluate_with, Evaluation, EvaluationMetrics, EvaluationStatus, Insight, NextAction,
    Severity,
};
pub use import::{load_dataset, load_json, parse_csv, Dataset};
pub use models::{Account, Period, Transaction};
pub use report::{build_report, FinanceReport};
pub use snapshot::{build, build_empty, Kpis, RecentTransaction, Series, Snapshot};
pub use summary::{
    summarize, summarize_for, transactions_in_window, CategoryAmount, SpendingSummary,
};
