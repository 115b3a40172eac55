//! Shared command utilities
//!
//! This module contains:
//! - `load_series` - Read a transaction file (JSON or CSV by extension)
//! - `load_config` - Resolve the analytics config
//! - `resolve_options` - Merge command-line flags over config defaults
//! - `resolve_range` - Parse `--from` / `--to` into a date range

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tally_core::import::{parse_csv, parse_json};
use tally_core::models::Granularity;
use tally_core::{AnalyticsConfig, AnalyticsOptions, TransactionSeries};

/// Load transactions from `path`; `.json` files are JSON, anything else CSV
pub fn load_series(path: &Path) -> Result<TransactionSeries> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let reader = BufReader::new(file);

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let series = if is_json {
        parse_json(reader)
    } else {
        parse_csv(reader)
    }
    .with_context(|| format!("Failed to parse {}", path.display()))?;

    tracing::debug!(path = %path.display(), records = series.len(), "Loaded transactions");
    Ok(series)
}

/// Load config from an explicit path, or the default override location
pub fn load_config(path: Option<&Path>) -> Result<AnalyticsConfig> {
    match path {
        Some(path) => AnalyticsConfig::load_from(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => AnalyticsConfig::load().context("Failed to load config"),
    }
}

/// Command-line flags take precedence over config values
pub fn resolve_options(
    config: &AnalyticsConfig,
    days: Option<u32>,
    granularity: Option<&str>,
    top: Option<usize>,
) -> Result<AnalyticsOptions> {
    let mut options = config.options();

    if let Some(days) = days {
        options.days_ahead = days;
    }
    if let Some(granularity) = granularity {
        options.granularity = granularity
            .parse::<Granularity>()
            .map_err(|e| anyhow::anyhow!(e))?;
    }
    if top.is_some() {
        options.top_n = top;
    }

    options.validate()?;
    Ok(options)
}

/// Parse optional `--from` / `--to` bounds; a missing side is open-ended
pub fn resolve_range(
    from: Option<&str>,
    to: Option<&str>,
) -> Result<Option<(NaiveDate, NaiveDate)>> {
    if from.is_none() && to.is_none() {
        return Ok(None);
    }

    let parse = |s: &str, flag: &str| {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("Invalid {} date format (use YYYY-MM-DD)", flag))
    };

    let from_date = from.map(|s| parse(s, "--from")).transpose()?;
    let to_date = to.map(|s| parse(s, "--to")).transpose()?;

    let range = (
        from_date.unwrap_or(NaiveDate::MIN),
        to_date.unwrap_or(NaiveDate::MAX),
    );
    if range.0 > range.1 {
        anyhow::bail!("--from {} is after --to {}", range.0, range.1);
    }

    Ok(Some(range))
}
