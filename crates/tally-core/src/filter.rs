//! Transaction filter builder
//!
//! Mirrors the store's "transactions matching a date/category filter"
//! accessor so callers can narrow a series before analysis.

use chrono::NaiveDate;

use crate::models::{TransactionKind, TransactionRecord, TransactionSeries};

/// Builder for narrowing a transaction series
///
/// The lifetime `'query` is how long borrowed filter parameters
/// (the category name) must remain valid.
#[derive(Debug, Default, Clone)]
pub struct TransactionFilter<'query> {
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub category: Option<&'query str>,
    pub kind: Option<TransactionKind>,
}

impl<'query> TransactionFilter<'query> {
    /// Create a new filter builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set date range filter (inclusive on both ends)
    pub fn date_range(mut self, range: Option<(NaiveDate, NaiveDate)>) -> Self {
        self.date_range = range;
        self
    }

    /// Set category filter (case-insensitive exact match)
    pub fn category(mut self, category: Option<&'query str>) -> Self {
        self.category = category;
        self
    }

    /// Set transaction kind filter
    pub fn kind(mut self, kind: Option<TransactionKind>) -> Self {
        self.kind = kind;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.date_range.is_none() && self.category.is_none() && self.kind.is_none()
    }

    pub fn matches(&self, record: &TransactionRecord) -> bool {
        if let Some((from, to)) = self.date_range {
            if record.date < from || record.date > to {
                return false;
            }
        }

        if let Some(category) = self.category {
            if !record.category.eq_ignore_ascii_case(category.trim()) {
                return false;
            }
        }

        if let Some(kind) = self.kind {
            if record.kind() != kind {
                return false;
            }
        }

        true
    }

    /// Copy matching records into a new series, preserving order
    pub fn apply(&self, series: &TransactionSeries) -> TransactionSeries {
        let filtered: TransactionSeries = series
            .iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect();

        tracing::debug!(
            input = series.len(),
            matched = filtered.len(),
            "Applied transaction filter"
        );

        filtered
    }
}
