//! Configuration
//!
//! Built once at process start and passed down explicitly; nothing in the
//! aggregation core reads the environment.
//!
//! ## Resolution
//!
//! 1. An explicit path (e.g. `--config`) must exist and parse
//! 2. Otherwise the platform config file (~/.config/finpulse/config.toml) if present
//! 3. Otherwise built-in defaults
//!
//! ```toml
//! [snapshot]
//! default_period = "3M"
//!
//! [evaluation]
//! dashboard_route = "/dashboard"
//! connections_route = "/settings/connections"
//! currency_symbol = "$"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::Period;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Config {
    pub snapshot: SnapshotSettings,
    pub evaluation: EvaluationConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SnapshotSettings {
    /// Period used when the caller doesn't pick one
    pub default_period: Period,
}

/// Settings the evaluation engine needs for its text and links
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationConfig {
    pub dashboard_route: String,
    pub connections_route: String,
    /// Prefix for amounts when the snapshot currency is unknown or USD
    pub currency_symbol: String,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            dashboard_route: "/dashboard".to_string(),
            connections_route: "/connections".to_string(),
            currency_symbol: "$".to_string(),
        }
    }
}

impl Config {
    /// Load config using the resolution order above
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                Self::from_file(path)
            }
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        let config = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Parse TOML, layering any provided values over the defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

        let mut config = Config::default();

        if let Some(snapshot) = raw.snapshot {
            if let Some(period) = snapshot.default_period {
                config.snapshot.default_period = period.parse().map_err(Error::Config)?;
            }
        }

        if let Some(evaluation) = raw.evaluation {
            if let Some(route) = evaluation.dashboard_route {
                config.evaluation.dashboard_route = route;
            }
            if let Some(route) = evaluation.connections_route {
                config.evaluation.connections_route = route;
            }
            if let Some(symbol) = evaluation.currency_symbol {
                config.evaluation.currency_symbol = symbol;
            }
        }

        Ok(config)
    }
}

/// Default config location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("finpulse").join("config.toml"))
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    snapshot: Option<RawSnapshot>,
    evaluation: Option<RawEvaluation>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSnapshot {
    default_period: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawEvaluation {
    dashboard_route: Option<String>,
    connections_route: Option<String>,
    currency_symbol: Option<String>,
}
