//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::path::{Path, PathBuf};

use finpulse_core::evaluate::EvaluationStatus;
use finpulse_core::test_utils::fixed_now;
use finpulse_core::{Config, Period};
use tempfile::TempDir;

use crate::cli::InputArgs;
use crate::commands::{self, format_amount, format_pct, truncate};

const DATASET_JSON: &str = r#"{
    "accounts": [
        {"source": "manual", "currentBalance": 2400.0, "currencyCode": "USD"}
    ],
    "transactions": [
        {"source": "manual", "id": "t1", "date": "2026-03-01", "name": "Payroll", "amount": 3200.0},
        {"source": "manual", "id": "t2", "date": "2026-03-03", "name": "Rent", "amount": -1400.0, "category": "Housing"},
        {"source": "manual", "id": "t3", "date": "2026-03-12", "name": "Spotify", "amount": -11.99, "category": "Streaming"},
        {"source": "manual", "id": "t4", "date": "2025-11-20", "name": "Hotel", "amount": -300.0, "category": "Travel"}
    ]
}"#;

const EXPORT_CSV: &str = "date,name,amount,category\n\
                          2026-03-10,Cinema,-24.00,Entertainment\n\
                          2026-03-11,Pharmacy,-18.25,\n";

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn args(inputs: Vec<PathBuf>, period: Option<&str>) -> InputArgs {
    InputArgs {
        inputs,
        period: period.map(str::to_string),
        now: Some(fixed_now().to_rfc3339()),
    }
}

// ========== Shared Utility Tests ==========

#[test]
fn test_resolve_period() {
    let config = Config::default();
    assert_eq!(
        commands::resolve_period(None, &config).unwrap(),
        Period::OneMonth
    );
    assert_eq!(
        commands::resolve_period(Some("3m"), &config).unwrap(),
        Period::ThreeMonths
    );
    assert_eq!(
        commands::resolve_period(Some("all"), &config).unwrap(),
        Period::All
    );

    let err = commands::resolve_period(Some("2W"), &config).unwrap_err();
    assert!(err.to_string().contains("Available"));
}

#[test]
fn test_resolve_period_uses_config_default() {
    let config = Config::from_toml("[snapshot]\ndefault_period = \"1Y\"").unwrap();
    assert_eq!(
        commands::resolve_period(None, &config).unwrap(),
        Period::OneYear
    );
}

#[test]
fn test_resolve_now() {
    assert_eq!(
        commands::resolve_now(Some("2026-03-15T12:00:00Z")).unwrap(),
        fixed_now()
    );
    assert!(commands::resolve_now(Some("2026-03-15")).is_ok());
    assert!(commands::resolve_now(Some("last tuesday")).is_err());
    assert!(commands::resolve_now(None).is_ok());
}

#[test]
fn test_load_inputs_concatenates_files() {
    let dir = TempDir::new().unwrap();
    let json = write_file(&dir, "data.json", DATASET_JSON);
    let csv = write_file(&dir, "export.csv", EXPORT_CSV);

    let dataset = commands::load_inputs(&[json, csv]).unwrap();
    assert_eq!(dataset.accounts.len(), 1);
    assert_eq!(dataset.transactions.len(), 6);
}

#[test]
fn test_load_inputs_missing_file() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.json");

    let err = commands::load_inputs(&[missing]).unwrap_err();
    assert!(err.to_string().contains("nope.json"));
}

#[test]
fn test_load_inputs_rejects_unknown_source() {
    let dir = TempDir::new().unwrap();
    let path = write_file(
        &dir,
        "bad.json",
        r#"{"transactions": [{"source": "venmo", "amount": 5}]}"#,
    );

    let err = commands::load_inputs(&[path]).unwrap_err();
    assert!(format!("{:#}", err).contains("transaction"));
}

// ========== View Tests ==========

#[test]
fn test_summary_for_uses_period_window() {
    let dir = TempDir::new().unwrap();
    let json = write_file(&dir, "data.json", DATASET_JSON);
    let config = Config::default();

    let month = commands::prepare(&config, &args(vec![json.clone()], Some("1M"))).unwrap();
    let summary = commands::summary_for(&month);
    assert_eq!(summary.timeframe, "1M");
    assert_eq!(summary.income, 3200.0);
    assert!((summary.spend - 1411.99).abs() < 1e-9);
    assert_eq!(summary.top_categories[0].category, "Housing");

    // The November hotel only shows up in the wider windows
    let year = commands::prepare(&config, &args(vec![json], Some("1Y"))).unwrap();
    let summary = commands::summary_for(&year);
    assert!(summary.top_categories.iter().any(|c| c.category == "Travel"));
}

#[test]
fn test_snapshot_for_empty_inputs() {
    let dir = TempDir::new().unwrap();
    let csv = write_file(&dir, "empty.csv", "date,name,amount\n");
    let config = Config::default();

    let prepared = commands::prepare(&config, &args(vec![csv], Some("1W"))).unwrap();
    let snapshot = commands::snapshot_for(&prepared);
    assert_eq!(snapshot, finpulse_core::build_empty(Period::OneWeek));

    let evaluation = commands::evaluation_for(&config, &prepared);
    assert_eq!(evaluation.status, EvaluationStatus::NoData);
}

#[test]
fn test_evaluation_for_uses_configured_routes() {
    let dir = TempDir::new().unwrap();
    let json = write_file(&dir, "data.json", DATASET_JSON);
    let config =
        Config::from_toml("[evaluation]\nconnections_route = \"/settings/banks\"").unwrap();

    let prepared = commands::prepare(&config, &args(vec![json], None)).unwrap();
    let evaluation = commands::evaluation_for(&config, &prepared);

    assert_eq!(evaluation.status, EvaluationStatus::Ok);
    assert!(evaluation
        .next_actions
        .iter()
        .any(|a| a.route == "/settings/banks"));
}

#[test]
fn test_report_for_matches_views() {
    let dir = TempDir::new().unwrap();
    let json = write_file(&dir, "data.json", DATASET_JSON);
    let config = Config::default();

    let prepared = commands::prepare(&config, &args(vec![json], Some("1M"))).unwrap();
    let report = commands::report_for(&config, &prepared);

    assert_eq!(report.snapshot, commands::snapshot_for(&prepared));
    assert_eq!(report.spending_summary, commands::summary_for(&prepared));
    assert_eq!(report.evaluation, commands::evaluation_for(&config, &prepared));
}

// ========== Command Tests ==========

#[test]
fn test_cmd_views() {
    let dir = TempDir::new().unwrap();
    let json = write_file(&dir, "data.json", DATASET_JSON);
    let csv = write_file(&dir, "export.csv", EXPORT_CSV);
    let config = Config::default();
    let input = args(vec![json, csv], None);

    for json_out in [false, true] {
        assert!(commands::cmd_snapshot(&config, &input, json_out).is_ok());
        assert!(commands::cmd_summary(&config, &input, json_out).is_ok());
        assert!(commands::cmd_evaluate(&config, &input, json_out).is_ok());
    }
    assert!(commands::cmd_report(&config, &input).is_ok());
}

#[test]
fn test_cmd_views_bad_period() {
    let dir = TempDir::new().unwrap();
    let json = write_file(&dir, "data.json", DATASET_JSON);
    let input = args(vec![json], Some("weekly"));

    assert!(commands::cmd_snapshot(&Config::default(), &input, false).is_err());
}

#[test]
fn test_cmd_config() {
    let dir = TempDir::new().unwrap();
    let path = write_file(&dir, "config.toml", "[snapshot]\ndefault_period = \"3M\"\n");

    let config = commands::load_config(Some(path.as_path())).unwrap();
    assert_eq!(config.snapshot.default_period, Period::ThreeMonths);
    assert_eq!(commands::config_source(Some(path.as_path())), path.display().to_string());
    assert!(commands::cmd_config(&config, Some(path.as_path())).is_ok());
}

#[test]
fn test_load_config_missing_explicit() {
    let err = commands::load_config(Some(Path::new("/nonexistent/finpulse.toml"))).unwrap_err();
    assert!(format!("{:#}", err).contains("not found"));
}

// ========== Formatting Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("short", 10), "short");
    assert_eq!(truncate("exactly10!", 10), "exactly10!");
    assert_eq!(truncate("this is a long string", 10), "this is...");
    assert_eq!(truncate("café crème brûlée", 8), "café ...");
}

#[test]
fn test_format_amount() {
    assert_eq!(format_amount(0.0), "0");
    assert_eq!(format_amount(999.4), "999");
    assert_eq!(format_amount(1520.0), "1,520");
    assert_eq!(format_amount(-1234567.0), "-1,234,567");
}

#[test]
fn test_format_pct() {
    assert_eq!(format_pct(0.12), "+12%");
    assert_eq!(format_pct(-0.5), "-50%");
    assert_eq!(format_pct(0.0), "+0%");
}
