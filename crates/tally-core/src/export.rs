//! Report export to JSON and CSV
//!
//! Supports:
//! - Full report as pretty-printed JSON
//! - Period and category aggregates as CSV tables

use std::fmt;
use std::str::FromStr;

use csv::Writer;

use crate::analytics::AnalyticsReport;
use crate::error::{Error, Result};
use crate::models::AggregateBucket;

/// Export format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    PeriodsCsv,
    CategoriesCsv,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::PeriodsCsv => "periods-csv",
            Self::CategoriesCsv => "categories-csv",
        }
    }

    /// Render `report` in this format
    pub fn render(&self, report: &AnalyticsReport) -> Result<String> {
        match self {
            Self::Json => report_to_json(report),
            Self::PeriodsCsv => periods_to_csv(&report.period_aggregates),
            Self::CategoriesCsv => categories_to_csv(&report.category_aggregates),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "periods-csv" | "periods" => Ok(Self::PeriodsCsv),
            "categories-csv" | "categories" => Ok(Self::CategoriesCsv),
            _ => Err(format!(
                "Unknown export format: {} (valid: json, periods-csv, categories-csv)",
                s
            )),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Serialize a report as pretty JSON
pub fn report_to_json(report: &AnalyticsReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Period buckets as CSV: `period,income,expenses,net,transactions`
pub fn periods_to_csv(buckets: &[AggregateBucket]) -> Result<String> {
    let mut wtr = Writer::from_writer(Vec::new());
    wtr.write_record(["period", "income", "expenses", "net", "transactions"])?;

    for bucket in buckets {
        wtr.write_record([
            bucket.key.clone(),
            format!("{:.2}", bucket.income_total),
            format!("{:.2}", bucket.expense_total),
            format!("{:.2}", bucket.net()),
            bucket.transaction_count.to_string(),
        ])?;
    }

    finish(wtr)
}

/// Category buckets as CSV: `category,expenses,transactions`
pub fn categories_to_csv(buckets: &[AggregateBucket]) -> Result<String> {
    let mut wtr = Writer::from_writer(Vec::new());
    wtr.write_record(["category", "expenses", "transactions"])?;

    for bucket in buckets {
        wtr.write_record([
            bucket.key.clone(),
            format!("{:.2}", bucket.expense_total),
            bucket.transaction_count.to_string(),
        ])?;
    }

    finish(wtr)
}

fn finish(wtr: Writer<Vec<u8>>) -> Result<String> {
    let bytes = wtr
        .into_inner()
        .map_err(|e| Error::Io(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| Error::InvalidInput(format!("Invalid UTF-8 in export: {}", e)))
}
