//! Spending Summary - income, spend and top categories

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Period, Transaction};

/// Maximum number of entries in `topCategories`
pub const TOP_CATEGORY_LIMIT: usize = 8;

/// Label used when a transaction has no category
pub const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAmount {
    pub category: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingSummary {
    pub timeframe: String,
    pub income: f64,
    pub spend: f64,
    /// `income - spend`
    pub net: f64,
    pub top_categories: Vec<CategoryAmount>,
}

impl SpendingSummary {
    /// The leading category, if any spend was categorized
    pub fn top_category(&self) -> Option<&CategoryAmount> {
        self.top_categories.first()
    }
}

/// Summarize transactions under the `"all"` timeframe label
pub fn summarize(transactions: &[Transaction]) -> SpendingSummary {
    summarize_for("all", transactions)
}

/// Summarize transactions, labelling the result with `timeframe`
///
/// Categories are ordered by amount descending, then by name so equal amounts
/// come out the same regardless of input order.
pub fn summarize_for(timeframe: impl Into<String>, transactions: &[Transaction]) -> SpendingSummary {
    let mut income = 0.0;
    let mut spend = 0.0;
    let mut by_category: Vec<CategoryAmount> = Vec::new();

    for tx in transactions.iter().filter(|tx| tx.amount.is_finite()) {
        if !tx.is_expense() {
            income += tx.amount;
            continue;
        }

        let magnitude = tx.magnitude();
        spend += magnitude;

        let label = tx
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(UNCATEGORIZED);

        match by_category.iter_mut().find(|c| c.category == label) {
            Some(entry) => entry.amount += magnitude,
            None => by_category.push(CategoryAmount {
                category: label.to_string(),
                amount: magnitude,
            }),
        }
    }

    by_category.sort_by(|a, b| {
        b.amount
            .total_cmp(&a.amount)
            .then_with(|| a.category.cmp(&b.category))
    });
    by_category.truncate(TOP_CATEGORY_LIMIT);

    SpendingSummary {
        timeframe: timeframe.into(),
        income,
        spend,
        net: income - spend,
        top_categories: by_category,
    }
}

/// Transactions dated within the chart window of `period` ending at `now`
pub fn transactions_in_window(
    transactions: &[Transaction],
    period: Period,
    now: DateTime<Utc>,
) -> Vec<Transaction> {
    let start = now - Duration::days(period.window_days());
    transactions
        .iter()
        .filter(|tx| tx.date >= start && tx.date <= now)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{days_ago, expense, fixed_now, income, transaction};

    #[test]
    fn test_income_spend_and_categories() {
        let txs = vec![
            transaction(days_ago(1), 1000.0, None),
            transaction(days_ago(1), -200.0, Some("Groceries")),
            transaction(days_ago(1), -100.0, Some("Streaming")),
        ];
        let summary = summarize(&txs);

        assert_eq!(summary.income, 1000.0);
        assert_eq!(summary.spend, 300.0);
        assert_eq!(summary.net, 700.0);
        assert_eq!(
            summary.top_categories,
            vec![
                CategoryAmount {
                    category: "Groceries".into(),
                    amount: 200.0
                },
                CategoryAmount {
                    category: "Streaming".into(),
                    amount: 100.0
                },
            ]
        );
        assert_eq!(summary.timeframe, "all");
    }

    #[test]
    fn test_blank_and_missing_categories_are_uncategorized() {
        let txs = vec![
            expense(days_ago(1), 10.0, None),
            expense(days_ago(1), 5.0, Some("   ")),
            expense(days_ago(1), 1.0, Some(" Dining ")),
        ];
        let summary = summarize(&txs);

        assert_eq!(summary.top_categories[0].category, UNCATEGORIZED);
        assert_eq!(summary.top_categories[0].amount, 15.0);
        assert_eq!(summary.top_categories[1].category, "Dining");
    }

    #[test]
    fn test_zero_amount_counts_as_income_side() {
        let txs = vec![transaction(days_ago(1), 0.0, Some("Fees"))];
        let summary = summarize(&txs);
        assert_eq!(summary.income, 0.0);
        assert_eq!(summary.spend, 0.0);
        assert!(summary.top_categories.is_empty());
    }

    #[test]
    fn test_top_categories_truncated_and_sorted() {
        let txs: Vec<_> = (1..=10)
            .map(|i| expense(days_ago(1), i as f64 * 10.0, Some(format!("Cat{:02}", i).as_str())))
            .collect();
        let summary = summarize(&txs);

        assert_eq!(summary.top_categories.len(), TOP_CATEGORY_LIMIT);
        assert_eq!(summary.top_categories[0].category, "Cat10");
        assert_eq!(summary.top_categories[7].category, "Cat03");
        assert!(summary
            .top_categories
            .windows(2)
            .all(|w| w[0].amount >= w[1].amount));
    }

    #[test]
    fn test_ties_break_by_name_not_input_order() {
        let forward = vec![
            expense(days_ago(1), 50.0, Some("Zoo")),
            expense(days_ago(1), 50.0, Some("Art")),
        ];
        let backward: Vec<_> = forward.iter().rev().cloned().collect();

        let a = summarize(&forward);
        let b = summarize(&backward);
        assert_eq!(a.top_categories, b.top_categories);
        assert_eq!(a.top_categories[0].category, "Art");
    }

    #[test]
    fn test_transactions_in_window() {
        let txs = vec![
            income(days_ago(3), 100.0),
            expense(days_ago(10), 20.0, None),
            expense(fixed_now() + Duration::hours(1), 20.0, None),
        ];
        let in_week = transactions_in_window(&txs, Period::OneWeek, fixed_now());
        assert_eq!(in_week.len(), 1);

        let in_month = transactions_in_window(&txs, Period::OneMonth, fixed_now());
        assert_eq!(in_month.len(), 2);

        let summary = summarize_for(Period::OneMonth.as_str(), &in_month);
        assert_eq!(summary.timeframe, "1M");
        assert_eq!(summary.net, 80.0);
    }
}
