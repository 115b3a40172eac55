//! Analytics configuration
//!
//! Config is loaded with a two-layer resolution:
//! 1. An explicit path, or the override in the data dir
//!    (~/.local/share/tally/config/analytics.toml) if it exists
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Keys missing from a file keep their built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::analytics::AnalyticsOptions;
use crate::error::{Error, Result};
use crate::models::Granularity;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/analytics.toml");

/// Default forecast horizon in days
pub const DEFAULT_DAYS_AHEAD: u32 = 30;

/// Effective analytics settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    pub days_ahead: u32,
    pub granularity: Granularity,
    pub top_n: Option<usize>,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            days_ahead: DEFAULT_DAYS_AHEAD,
            granularity: Granularity::Monthly,
            top_n: None,
        }
    }
}

impl AnalyticsConfig {
    /// Load from the override location, falling back to embedded defaults
    pub fn load() -> Result<Self> {
        load_config(None)
    }

    /// Load from an explicit file; a missing file falls back to defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        load_config(Some(path))
    }

    /// Parse a TOML document on top of the built-in defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        parse_config(content)
    }

    /// Report options seeded from this config
    pub fn options(&self) -> AnalyticsOptions {
        AnalyticsOptions {
            days_ahead: self.days_ahead,
            granularity: self.granularity,
            top_n: self.top_n,
        }
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("tally").join("config").join("analytics.toml"))
}

/// Load configuration (override first, then default)
fn load_config(override_path: Option<&Path>) -> Result<AnalyticsConfig> {
    let path = match override_path {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path(),
    };

    let content = match path {
        Some(path) if path.exists() => {
            tracing::debug!(path = %path.display(), "Loading config override");
            fs::read_to_string(&path)
                .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?
        }
        _ => DEFAULT_CONFIG.to_string(),
    };

    parse_config(&content)
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    forecast: Option<RawForecast>,
    aggregation: Option<RawAggregation>,
}

#[derive(Debug, Deserialize)]
struct RawForecast {
    days_ahead: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct RawAggregation {
    granularity: Option<String>,
    top_n: Option<usize>,
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<AnalyticsConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = AnalyticsConfig::default();

    if let Some(forecast) = raw.forecast {
        if let Some(days) = forecast.days_ahead {
            if days == 0 {
                return Err(Error::Config(
                    "forecast.days_ahead must be greater than zero".to_string(),
                ));
            }
            config.days_ahead = days;
        }
    }

    if let Some(aggregation) = raw.aggregation {
        if let Some(granularity) = aggregation.granularity {
            config.granularity = granularity.parse().map_err(Error::Config)?;
        }
        if let Some(top_n) = aggregation.top_n {
            if top_n == 0 {
                return Err(Error::Config(
                    "aggregation.top_n must be greater than zero".to_string(),
                ));
            }
            config.top_n = Some(top_n);
        }
    }

    Ok(config)
}
