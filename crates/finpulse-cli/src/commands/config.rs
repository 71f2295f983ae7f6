//! Config command implementation

use std::path::Path;

use anyhow::{Context, Result};
use finpulse_core::config::default_config_path;
use finpulse_core::Config;

/// Where the active config came from, for display
pub fn config_source(explicit: Option<&Path>) -> String {
    match explicit {
        Some(path) => path.display().to_string(),
        None => match default_config_path() {
            Some(path) if path.exists() => path.display().to_string(),
            Some(path) => format!("(defaults; {} not found)", path.display()),
            None => "(defaults)".to_string(),
        },
    }
}

pub fn cmd_config(config: &Config, explicit: Option<&Path>) -> Result<()> {
    println!();
    println!("⚙️  Configuration");
    println!("   ─────────────────────────────────────────────");
    println!("   Source: {}", config_source(explicit));
    println!();

    let rendered =
        serde_json::to_string_pretty(config).context("Failed to serialize config")?;
    for line in rendered.lines() {
        println!("   {}", line);
    }
    println!();
    Ok(())
}
