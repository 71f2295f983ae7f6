//! Domain models for finpulse

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A bank transaction as handed to the aggregation core
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub date: DateTime<Utc>,
    pub name: String,
    /// Merchant or counterparty display name, when the provider knows it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counterparty_label: Option<String>,
    /// Negative = expense, positive = income
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Transaction {
    pub fn is_expense(&self) -> bool {
        self.amount < 0.0
    }

    /// Absolute value of the amount
    pub fn magnitude(&self) -> f64 {
        self.amount.abs()
    }
}

/// A linked account; only balances and currency matter to the core
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_balance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_balance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_code: Option<String>,
}

/// Chart period selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "1W")]
    OneWeek,
    #[default]
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "3M")]
    ThreeMonths,
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "ALL")]
    All,
}

impl Period {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneWeek => "1W",
            Self::OneMonth => "1M",
            Self::ThreeMonths => "3M",
            Self::OneYear => "1Y",
            Self::All => "ALL",
        }
    }

    /// Number of chart buckets for this period
    pub fn bucket_count(&self) -> usize {
        match self {
            Self::OneWeek => 7,
            Self::OneMonth => 12,
            Self::ThreeMonths => 18,
            Self::OneYear => 12,
            Self::All => 22,
        }
    }

    /// Lookback window covered by the chart, in days
    pub fn window_days(&self) -> i64 {
        match self {
            Self::OneWeek => 7,
            Self::OneMonth => 30,
            Self::ThreeMonths => 90,
            Self::OneYear => 365,
            Self::All => 730,
        }
    }

    pub fn all() -> &'static [Period] {
        &[
            Self::OneWeek,
            Self::OneMonth,
            Self::ThreeMonths,
            Self::OneYear,
            Self::All,
        ]
    }
}

impl std::str::FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "1W" => Ok(Self::OneWeek),
            "1M" => Ok(Self::OneMonth),
            "3M" => Ok(Self::ThreeMonths),
            "1Y" => Ok(Self::OneYear),
            "ALL" => Ok(Self::All),
            _ => Err(format!(
                "Unknown period: {}. Available: 1W, 1M, 3M, 1Y, ALL",
                s
            )),
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Normalize a currency code to uppercase ISO-4217 shape
///
/// Returns None unless the trimmed code is exactly three ASCII letters.
pub fn normalize_currency(code: &str) -> Option<String> {
    let code = code.trim();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Some(code.to_ascii_uppercase())
    } else {
        None
    }
}
