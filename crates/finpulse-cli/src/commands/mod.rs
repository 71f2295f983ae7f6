//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Shared utilities (config, input loading, period and clock resolution)
//! - `config` - Show the resolved configuration
//! - `evaluate` - Health score and insights
//! - `report` - Combined grounding JSON
//! - `snapshot` - Dashboard chart, KPIs and recent activity
//! - `summary` - Income, spend and top categories

pub mod config;
pub mod core;
pub mod evaluate;
pub mod report;
pub mod snapshot;
pub mod summary;

// Re-export command functions for main.rs
pub use config::*;
pub use core::*;
pub use evaluate::*;
pub use report::*;
pub use snapshot::*;
pub use summary::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Whole-unit amount with thousands separators, e.g. `-1,234`
pub fn format_amount(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut out = String::new();
    if rounded < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Signed percent for a fractional ratio, e.g. `+12%`
pub fn format_pct(ratio: f64) -> String {
    format!("{:+.0}%", ratio * 100.0)
}
