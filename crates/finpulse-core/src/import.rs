//! Input loading for provider exports
//!
//! JSON datasets hold `accounts` and `transactions` arrays. Every record names
//! its origin in a `source` field and is decoded against that shape only:
//!
//! - `plaid` - bank-aggregation rows; amounts are positive for outflows, so
//!   the sign is flipped on the way in
//! - `manual` - rows already in finpulse's convention (positive = inflow)
//!
//! A record with an unknown source or a malformed body fails the load with
//! [`Error::UnrecognizedRecord`] instead of being dropped.
//!
//! CSV files carry transactions only:
//! `date,name,amount[,category][,currency][,counterparty]`

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{Account, Transaction};

/// Accounts and transactions loaded from one or more files
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dataset {
    pub accounts: Vec<Account>,
    pub transactions: Vec<Transaction>,
}

impl Dataset {
    pub fn extend(&mut self, other: Dataset) {
        self.accounts.extend(other.accounts);
        self.transactions.extend(other.transactions);
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty() && self.transactions.is_empty()
    }
}

/// Load a dataset, picking the parser from the file extension
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let dataset = match extension.as_deref() {
        Some("json") => load_json(File::open(path)?)?,
        Some("csv") => Dataset {
            accounts: Vec::new(),
            transactions: parse_csv(File::open(path)?)?,
        },
        _ => {
            return Err(Error::Import(format!(
                "Unsupported input format: {} (expected .json or .csv)",
                path.display()
            )))
        }
    };

    debug!(
        path = %path.display(),
        accounts = dataset.accounts.len(),
        transactions = dataset.transactions.len(),
        "Loaded dataset"
    );
    Ok(dataset)
}

/// Load a JSON dataset
pub fn load_json<R: Read>(reader: R) -> Result<Dataset> {
    let raw: RawDataset = serde_json::from_reader(reader)?;

    let accounts = raw
        .accounts
        .into_iter()
        .enumerate()
        .map(|(index, value)| decode_account(index, value))
        .collect::<Result<Vec<_>>>()?;

    let transactions = raw
        .transactions
        .into_iter()
        .enumerate()
        .map(|(index, value)| decode_transaction(index, value))
        .collect::<Result<Vec<_>>>()?;

    Ok(Dataset {
        accounts,
        transactions,
    })
}

#[derive(Debug, Deserialize)]
struct RawDataset {
    #[serde(default)]
    accounts: Vec<serde_json::Value>,
    #[serde(default)]
    transactions: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
enum RawTransaction {
    Plaid(PlaidTransaction),
    Manual(ManualTransaction),
}

#[derive(Debug, Deserialize)]
struct PlaidTransaction {
    transaction_id: String,
    date: String,
    #[serde(default)]
    datetime: Option<String>,
    name: String,
    #[serde(default)]
    merchant_name: Option<String>,
    /// Positive = money out of the account
    amount: f64,
    #[serde(default)]
    iso_currency_code: Option<String>,
    #[serde(default)]
    unofficial_currency_code: Option<String>,
    #[serde(default)]
    personal_finance_category: Option<PlaidCategory>,
    /// Legacy category hierarchy, most specific last
    #[serde(default)]
    category: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct PlaidCategory {
    primary: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ManualTransaction {
    #[serde(default)]
    id: Option<String>,
    date: String,
    name: String,
    #[serde(default)]
    counterparty_label: Option<String>,
    amount: f64,
    #[serde(default)]
    currency_code: Option<String>,
    #[serde(default)]
    category: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "source", rename_all = "lowercase")]
enum RawAccount {
    Plaid(PlaidAccount),
    Manual(ManualAccount),
}

#[derive(Debug, Deserialize)]
struct PlaidAccount {
    balances: PlaidBalances,
}

#[derive(Debug, Deserialize)]
struct PlaidBalances {
    #[serde(default)]
    current: Option<f64>,
    #[serde(default)]
    available: Option<f64>,
    #[serde(default)]
    iso_currency_code: Option<String>,
    #[serde(default)]
    unofficial_currency_code: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ManualAccount {
    #[serde(default)]
    current_balance: Option<f64>,
    #[serde(default)]
    available_balance: Option<f64>,
    #[serde(default)]
    currency_code: Option<String>,
}

fn decode_account(index: usize, value: serde_json::Value) -> Result<Account> {
    let raw: RawAccount =
        serde_json::from_value(value).map_err(|e| Error::UnrecognizedRecord {
            kind: "account",
            index,
            reason: e.to_string(),
        })?;

    Ok(match raw {
        RawAccount::Plaid(a) => Account {
            current_balance: a.balances.current,
            available_balance: a.balances.available,
            currency_code: a
                .balances
                .iso_currency_code
                .or(a.balances.unofficial_currency_code),
        },
        RawAccount::Manual(a) => Account {
            current_balance: a.current_balance,
            available_balance: a.available_balance,
            currency_code: a.currency_code,
        },
    })
}

fn decode_transaction(index: usize, value: serde_json::Value) -> Result<Transaction> {
    let unrecognized = |reason: String| Error::UnrecognizedRecord {
        kind: "transaction",
        index,
        reason,
    };

    let raw: RawTransaction =
        serde_json::from_value(value).map_err(|e| unrecognized(e.to_string()))?;

    match raw {
        RawTransaction::Plaid(t) => {
            let date = parse_date(t.datetime.as_deref().unwrap_or(t.date.as_str()))
                .map_err(|e| unrecognized(e.to_string()))?;
            let category = t
                .personal_finance_category
                .map(|c| c.primary)
                .or_else(|| t.category.and_then(|mut c| c.pop()));

            Ok(Transaction {
                id: t.transaction_id,
                date,
                name: t.name,
                counterparty_label: t.merchant_name,
                amount: -t.amount,
                currency_code: t.iso_currency_code.or(t.unofficial_currency_code),
                category,
            })
        }
        RawTransaction::Manual(t) => {
            let date = parse_date(&t.date).map_err(|e| unrecognized(e.to_string()))?;
            let id = t
                .id
                .unwrap_or_else(|| generate_id(&date, &t.name, t.amount));

            Ok(Transaction {
                id,
                date,
                name: t.name,
                counterparty_label: t.counterparty_label,
                amount: t.amount,
                currency_code: t.currency_code,
                category: t.category,
            })
        }
    }
}

/// Parse an RFC 3339 timestamp or a bare date (midnight UTC)
///
/// Bare dates accept `YYYY-MM-DD` and `MM/DD/YYYY`.
pub fn parse_date(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%m/%d/%Y"))
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| Error::InvalidData(format!("Unrecognized date: {}", s)))
}

/// Stable id for records that arrive without one
fn generate_id(date: &DateTime<Utc>, name: &str, amount: f64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(date.to_rfc3339().as_bytes());
    hasher.update(name.as_bytes());
    hasher.update(amount.to_be_bytes());
    hex::encode(hasher.finalize())
}

/// Parse a CSV transaction export
///
/// Columns are matched by header name (case-insensitive); `description` is
/// accepted for `name`. Amounts may carry `$` and thousands separators.
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let columns = CsvColumns::from_headers(&headers)?;
    let mut transactions = Vec::new();

    for (row, result) in rdr.records().enumerate() {
        let record = result?;
        // Header is line 1
        let line = row + 2;

        if record.iter().all(|field| field.is_empty()) {
            continue;
        }

        let date_str = field(&record, Some(columns.date))
            .ok_or_else(|| Error::Import(format!("Missing date on line {}", line)))?;
        let date = parse_date(date_str)
            .map_err(|e| Error::Import(format!("Line {}: {}", line, e)))?;

        let name = field(&record, Some(columns.name))
            .ok_or_else(|| Error::Import(format!("Missing name on line {}", line)))?
            .to_string();

        let amount_str = field(&record, Some(columns.amount))
            .ok_or_else(|| Error::Import(format!("Missing amount on line {}", line)))?;
        let amount = parse_amount(amount_str).ok_or_else(|| {
            Error::Import(format!("Invalid amount '{}' on line {}", amount_str, line))
        })?;

        transactions.push(Transaction {
            id: generate_id(&date, &name, amount),
            date,
            name,
            counterparty_label: field(&record, columns.counterparty).map(str::to_string),
            amount,
            currency_code: field(&record, columns.currency).map(str::to_string),
            category: field(&record, columns.category).map(str::to_string),
        });
    }

    Ok(transactions)
}

struct CsvColumns {
    date: usize,
    name: usize,
    amount: usize,
    category: Option<usize>,
    currency: Option<usize>,
    counterparty: Option<usize>,
}

impl CsvColumns {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |names: &[&str]| {
            headers
                .iter()
                .position(|h| names.iter().any(|n| h.eq_ignore_ascii_case(n)))
        };
        let require = |names: &[&str]| {
            find(names).ok_or_else(|| {
                Error::Import(format!("CSV missing required column: {}", names[0]))
            })
        };

        Ok(Self {
            date: require(&["date"])?,
            name: require(&["name", "description"])?,
            amount: require(&["amount"])?,
            category: find(&["category"]),
            currency: find(&["currency", "currency_code"]),
            counterparty: find(&["counterparty", "merchant"]),
        })
    }
}

/// Non-empty field at `index`
fn field(record: &StringRecord, index: Option<usize>) -> Option<&str> {
    index
        .and_then(|i| record.get(i))
        .filter(|value| !value.is_empty())
}

fn parse_amount(s: &str) -> Option<f64> {
    let cleaned: String = s.chars().filter(|c| *c != '$' && *c != ',').collect();
    cleaned.trim().parse::<f64>().ok().filter(|a| a.is_finite())
}
