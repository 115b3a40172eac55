//! CSV and JSON transaction import

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use serde::Deserialize;
use std::io::Read;
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{TransactionKind, TransactionRecord, TransactionSeries};

/// Category assigned when the source leaves it blank
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Column positions resolved from the header row
#[derive(Debug)]
struct Columns {
    id: Option<usize>,
    date: usize,
    amount: usize,
    category: Option<usize>,
    description: Option<usize>,
    kind: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };

        let required = |name: &str| {
            find(name).ok_or_else(|| Error::InvalidInput(format!("Missing '{}' column", name)))
        };

        Ok(Self {
            id: find("id"),
            date: required("date")?,
            amount: required("amount")?,
            category: find("category"),
            description: find("description"),
            kind: find("type"),
        })
    }
}

/// Parse a CSV export into a series
///
/// Columns are matched by header name in any order. `date` and `amount`
/// are required; `id`, `category`, `description` and `type` are optional.
/// Rows without an id are numbered from 1 in file order. When a `type`
/// column is present, its value (income or expense) decides the sign and
/// the amount column is read as a magnitude.
pub fn parse_csv<R: Read>(reader: R) -> Result<TransactionSeries> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = Columns::from_headers(rdr.headers()?)?;
    let mut series = TransactionSeries::new();

    for (index, result) in rdr.records().enumerate() {
        let record = result?;
        let row = index + 1;
        let field = |col: usize| record.get(col).unwrap_or("");
        let optional = |col: Option<usize>| col.map(|c| field(c)).unwrap_or("");

        let id = match optional(columns.id) {
            "" => row as i64,
            raw => raw
                .parse::<i64>()
                .map_err(|_| Error::InvalidInput(format!("Row {}: invalid id '{}'", row, raw)))?,
        };

        let date = parse_date(field(columns.date))
            .map_err(|e| Error::InvalidInput(format!("Row {}: {}", row, e)))?;

        let mut amount = parse_amount(field(columns.amount))
            .map_err(|e| Error::InvalidInput(format!("Row {}: {}", row, e)))?;

        if let Some(kind) = columns.kind.map(|c| field(c)).filter(|s| !s.is_empty()) {
            amount = match kind.parse::<TransactionKind>() {
                Ok(TransactionKind::Expense) => -amount.abs(),
                Ok(TransactionKind::Income) => amount.abs(),
                Ok(TransactionKind::Neutral) => amount,
                Err(e) => return Err(Error::InvalidInput(format!("Row {}: {}", row, e))),
            };
        }

        series.push(TransactionRecord::new(
            id,
            date,
            amount,
            normalize_category(optional(columns.category)),
            optional(columns.description),
        ));
    }

    debug!("Parsed {} CSV transactions", series.len());
    Ok(series)
}

/// A transaction as it arrives in JSON, before date parsing and validation
///
/// `id`, `category` and `description` may be omitted. `date` accepts the
/// same formats as CSV imports.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTransaction {
    pub id: Option<i64>,
    pub date: String,
    pub amount: f64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
}

/// Parse a JSON array of records into a series
pub fn parse_json<R: Read>(reader: R) -> Result<TransactionSeries> {
    let raw: Vec<RawTransaction> = serde_json::from_reader(reader)?;
    let series = series_from_raw(raw)?;

    debug!("Parsed {} JSON transactions", series.len());
    Ok(series)
}

/// Build a validated series from raw records
///
/// Rows are numbered from 1. Records without an id take their row number,
/// and an unparsable date is an `InvalidInput` naming the row.
pub fn series_from_raw(raw: Vec<RawTransaction>) -> Result<TransactionSeries> {
    let mut series = TransactionSeries::new();

    for (index, r) in raw.into_iter().enumerate() {
        let row = index + 1;
        let date =
            parse_date(&r.date).map_err(|e| Error::InvalidInput(format!("Row {}: {}", row, e)))?;

        series.push(TransactionRecord::new(
            r.id.unwrap_or(row as i64),
            date,
            r.amount,
            normalize_category(&r.category),
            r.description,
        ));
    }

    series.validate()?;
    Ok(series)
}

/// Parse a date string in various common formats
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();

    let formats = [
        "%Y-%m-%d", // 2024-01-15
        "%m/%d/%Y", // 01/15/2024
        "%m/%d/%y", // 01/15/24
        "%m-%d-%Y", // 01-15-2024
    ];

    for fmt in formats {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(date);
        }
    }

    Err(Error::InvalidInput(format!("Unable to parse date: {}", s)))
}

/// Parse an amount string, handling currency symbols and commas
///
/// Parenthesized amounts are negative. NaN and infinities are rejected.
pub fn parse_amount(s: &str) -> Result<f64> {
    let cleaned: String = s
        .trim()
        .replace(['$', ',', ' '], "")
        .replace('(', "-")
        .replace(')', "");

    let amount = cleaned
        .parse::<f64>()
        .map_err(|_| Error::InvalidInput(format!("Unable to parse amount: {}", s)))?;

    if !amount.is_finite() {
        return Err(Error::InvalidInput(format!("Amount is not finite: {}", s)));
    }

    Ok(amount)
}

/// Trim and title-case a category, defaulting blank ones
///
/// Every letter following a non-letter is uppercased and the rest are
/// lowercased, so "food & drink" becomes "Food & Drink".
pub fn normalize_category(s: &str) -> String {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return UNCATEGORIZED.to_string();
    }

    let mut out = String::with_capacity(trimmed.len());
    let mut word_start = true;
    for c in trimmed.chars() {
        if c.is_alphabetic() {
            if word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            word_start = false;
        } else {
            out.push(c);
            word_start = true;
        }
    }
    out
}
