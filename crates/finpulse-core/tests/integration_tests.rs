//! Integration tests for finpulse-core
//!
//! These tests exercise the full import → snapshot → summary → evaluate workflow.

use chrono::{DateTime, TimeZone, Utc};
use finpulse_core::{
    build, build_empty, build_report, evaluate, import::load_json, parse_csv, summarize_for,
    transactions_in_window, Config, EvaluationStatus, Period, Severity, SpendCategory,
};

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap()
}

/// Mixed-source dataset anchored to `fixed_now`:
/// - payroll 5 days ago (Plaid, outflow-positive so -4000 is income)
/// - rent 10 days ago, a subscription 2 days ago
/// - groceries 40 days ago, in the prior 30-day window only
fn household_json() -> &'static str {
    r#"{
        "accounts": [
            {"source": "plaid", "balances": {"current": 5000.0, "iso_currency_code": "USD"}}
        ],
        "transactions": [
            {"source": "plaid", "transaction_id": "pay_1", "date": "2026-03-10",
             "datetime": "2026-03-10T12:00:00Z", "name": "ACME PAYROLL", "amount": -4000.0,
             "iso_currency_code": "USD", "category": ["Transfer", "Payroll"]},
            {"source": "manual", "id": "rent_mar", "date": "2026-03-05T12:00:00Z",
             "name": "Landlord", "amount": -1500.0, "currencyCode": "USD", "category": "Rent"},
            {"source": "plaid", "transaction_id": "nflx_1", "date": "2026-03-13",
             "datetime": "2026-03-13T12:00:00Z", "name": "NETFLIX.COM", "merchant_name": "Netflix",
             "amount": 20.0, "iso_currency_code": "USD",
             "personal_finance_category": {"primary": "SUBSCRIPTION"}},
            {"source": "manual", "id": "groc_feb", "date": "2026-02-03T12:00:00Z",
             "name": "Grocer", "amount": -1000.0, "category": "Groceries"}
        ]
    }"#
}

// =============================================================================
// Snapshot
// =============================================================================

#[test]
fn test_import_to_snapshot() {
    let dataset = load_json(household_json().as_bytes()).expect("Failed to load dataset");
    assert_eq!(dataset.transactions.len(), 4);

    let snapshot = build(
        Period::OneMonth,
        &dataset.accounts,
        &dataset.transactions,
        fixed_now(),
    );

    assert_eq!(snapshot.currency_code.as_deref(), Some("USD"));
    assert_eq!(snapshot.labels.len(), Period::OneMonth.bucket_count());

    // The February groceries sit outside the 30-day chart window
    assert_eq!(snapshot.points.iter().sum::<i64>(), 1520);
    assert_eq!(snapshot.series.subscriptions.iter().sum::<i64>(), 20);
    assert_eq!(snapshot.series.essentials.iter().sum::<i64>(), 1500);

    assert_eq!(snapshot.kpis.current_balance, 5000.0);
    assert_eq!(snapshot.kpis.monthly_spend, 1520.0);
    assert!((snapshot.kpis.monthly_spend_trend_pct - 0.52).abs() < 1e-9);
    assert!((snapshot.kpis.savings_rate - 0.62).abs() < 1e-9);
    assert_eq!(snapshot.kpis.upcoming_bills, 10.0);

    let recent: Vec<_> = snapshot
        .recent_transactions
        .iter()
        .map(|t| t.id.as_str())
        .collect();
    assert_eq!(recent, vec!["nflx_1", "pay_1", "rent_mar", "groc_feb"]);
    assert_eq!(
        snapshot.recent_transactions[0].category,
        Some(SpendCategory::Subscriptions)
    );
    assert_eq!(snapshot.recent_transactions[1].category, None);
}

// =============================================================================
// Summary + Evaluation
// =============================================================================

#[test]
fn test_full_evaluation_workflow() {
    let dataset = load_json(household_json().as_bytes()).unwrap();
    let now = fixed_now();

    let snapshot = build(Period::OneMonth, &dataset.accounts, &dataset.transactions, now);
    let windowed = transactions_in_window(&dataset.transactions, Period::OneMonth, now);
    let summary = summarize_for("1M", &windowed);

    assert_eq!(summary.income, 4000.0);
    assert_eq!(summary.spend, 1520.0);
    assert_eq!(summary.top_categories[0].category, "Rent");
    assert_eq!(summary.top_categories[1].category, "SUBSCRIPTION");

    let evaluation = evaluate(&snapshot, Some(&summary));
    assert_eq!(evaluation.status, EvaluationStatus::Ok);
    assert!(evaluation.score.is_some());

    let titles: Vec<_> = evaluation
        .insights
        .iter()
        .map(|i| (i.severity, i.title.as_str()))
        .collect();
    assert_eq!(
        titles,
        vec![
            (Severity::Risk, "Spending is trending up"),
            (Severity::Info, "Upcoming bills"),
            (Severity::Warn, "Rent dominates your spending"),
        ]
    );
    assert!(evaluation.summary.contains("$1,520"));
    assert_eq!(evaluation.metrics.top_category.as_deref(), Some("Rent"));

    // Same input, same output
    assert_eq!(evaluation, evaluate(&snapshot, Some(&summary)));
}

#[test]
fn test_empty_workflow() {
    let snapshot = build_empty(Period::ThreeMonths);
    let evaluation = evaluate(&snapshot, None);

    assert_eq!(evaluation.status, EvaluationStatus::NoData);
    assert_eq!(evaluation.score, None);
    assert_eq!(evaluation.next_actions[0].route, "/connections");
}

// =============================================================================
// CSV + Report
// =============================================================================

#[test]
fn test_csv_report() {
    let csv = "date,name,amount,category\n\
               2026-03-01,Paycheck,3000,\n\
               2026-03-08,Airline,-600,Travel\n\
               2026-03-12,Cafe,-25.50,Dining\n";
    let transactions = parse_csv(csv.as_bytes()).expect("Failed to parse CSV");

    let report = build_report(
        &Config::default(),
        Period::OneMonth,
        &[],
        &transactions,
        fixed_now(),
    );

    assert_eq!(report.snapshot.series.leisure.iter().sum::<i64>(), 600);
    assert_eq!(report.snapshot.currency_code, None);
    assert_eq!(report.spending_summary.spend, 625.5);
    assert_eq!(report.evaluation.status, EvaluationStatus::Ok);

    let json: serde_json::Value =
        serde_json::from_str(&report.to_grounding_json().unwrap()).unwrap();
    assert_eq!(json["spendingSummary"]["topCategories"][0]["category"], "Travel");
    assert!(json["snapshot"]["currencyCode"].is_null());
}
