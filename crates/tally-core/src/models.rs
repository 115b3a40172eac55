//! Domain models for Tally

use chrono::{Datelike, Days, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A single signed monetary event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: i64,
    pub date: NaiveDate,
    /// Negative = expense, positive = income, zero = neither
    pub amount: f64,
    pub category: String,
    #[serde(default)]
    pub description: String,
}

/// Transaction type derived from the amount sign
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
    Neutral,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Neutral => "neutral",
        }
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            "neutral" => Ok(Self::Neutral),
            _ => Err(format!(
                "Unknown transaction kind: {} (valid: income, expense, neutral)",
                s
            )),
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TransactionRecord {
    pub fn new(
        id: i64,
        date: NaiveDate,
        amount: f64,
        category: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id,
            date,
            amount,
            category: category.into(),
            description: description.into(),
        }
    }

    pub fn kind(&self) -> TransactionKind {
        if self.amount > 0.0 {
            TransactionKind::Income
        } else if self.amount < 0.0 {
            TransactionKind::Expense
        } else {
            TransactionKind::Neutral
        }
    }

    pub fn is_income(&self) -> bool {
        self.amount > 0.0
    }

    pub fn is_expense(&self) -> bool {
        self.amount < 0.0
    }

    /// Absolute value of the amount
    pub fn magnitude(&self) -> f64 {
        self.amount.abs()
    }
}

/// An unordered collection of transactions, the unit of analysis
///
/// Producers may hand records over in any order (the store returns them
/// newest first). Anything time-indexed goes through [`sorted_by_date`],
/// which is stable so same-day records keep their insertion order.
///
/// [`sorted_by_date`]: TransactionSeries::sorted_by_date
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionSeries {
    records: Vec<TransactionRecord>,
}

impl TransactionSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: TransactionRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TransactionRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Borrowed view of the records, oldest first
    pub fn sorted_by_date(&self) -> Vec<&TransactionRecord> {
        let mut sorted: Vec<&TransactionRecord> = self.records.iter().collect();
        sorted.sort_by_key(|r| r.date);
        sorted
    }

    pub fn expenses(&self) -> impl Iterator<Item = &TransactionRecord> {
        self.records.iter().filter(|r| r.is_expense())
    }

    pub fn incomes(&self) -> impl Iterator<Item = &TransactionRecord> {
        self.records.iter().filter(|r| r.is_income())
    }

    /// Expense amounts as positive magnitudes, in series order
    pub fn expense_magnitudes(&self) -> Vec<f64> {
        self.expenses().map(|r| r.magnitude()).collect()
    }

    /// Earliest and latest record dates
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.iter().map(|r| r.date).min()?;
        let last = self.records.iter().map(|r| r.date).max()?;
        Some((first, last))
    }

    /// Reject records whose amount is NaN or infinite
    pub fn validate(&self) -> Result<()> {
        for record in &self.records {
            if !record.amount.is_finite() {
                return Err(Error::InvalidInput(format!(
                    "transaction {} has non-finite amount {}",
                    record.id, record.amount
                )));
            }
        }
        Ok(())
    }

    pub fn summary(&self) -> Summary {
        let mut summary = Summary {
            transaction_count: self.records.len(),
            ..Default::default()
        };

        for record in &self.records {
            match record.kind() {
                TransactionKind::Income => {
                    summary.total_income += record.amount;
                    summary.income_count += 1;
                }
                TransactionKind::Expense => {
                    summary.total_expenses += record.magnitude();
                    summary.expense_count += 1;
                }
                TransactionKind::Neutral => {}
            }
        }

        summary.net_balance = summary.total_income - summary.total_expenses;
        summary
    }
}

impl From<Vec<TransactionRecord>> for TransactionSeries {
    fn from(records: Vec<TransactionRecord>) -> Self {
        Self { records }
    }
}

impl FromIterator<TransactionRecord> for TransactionSeries {
    fn from_iter<I: IntoIterator<Item = TransactionRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a TransactionSeries {
    type Item = &'a TransactionRecord;
    type IntoIter = std::slice::Iter<'a, TransactionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Dashboard totals for a series
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_income: f64,
    /// Sum of expense magnitudes (positive)
    pub total_expenses: f64,
    pub net_balance: f64,
    pub transaction_count: usize,
    pub income_count: usize,
    pub expense_count: usize,
}

// ========== Aggregate Models ==========

/// Report time granularity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[default]
    Monthly,
    Weekly,
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Weekly => "weekly",
        }
    }

    /// First day of the period containing `date` (Mondays for weeks)
    pub fn period_start(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Self::Monthly => date - Duration::days(i64::from(date.day0())),
            Self::Weekly => {
                date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
            }
        }
    }

    /// Start of the period following the one starting at `start`
    pub fn next_period_start(&self, start: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Monthly => start.checked_add_months(Months::new(1)),
            Self::Weekly => start.checked_add_days(Days::new(7)),
        }
    }

    /// Period key: `YYYY-MM` for months, ISO `YYYY-Www` for weeks
    pub fn period_key(&self, date: NaiveDate) -> String {
        match self {
            Self::Monthly => date.format("%Y-%m").to_string(),
            Self::Weekly => {
                let week = date.iso_week();
                format!("{}-W{:02}", week.year(), week.week())
            }
        }
    }
}

impl std::str::FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "monthly" => Ok(Self::Monthly),
            "weekly" => Ok(Self::Weekly),
            _ => Err(format!(
                "Unknown granularity: {} (valid: monthly, weekly)",
                s
            )),
        }
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Summed income/expense totals keyed by period or category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateBucket {
    /// Period key (`2024-03`, `2024-W09`) or category name
    pub key: String,
    pub income_total: f64,
    /// Sum of expense magnitudes (positive)
    pub expense_total: f64,
    pub transaction_count: usize,
}

impl AggregateBucket {
    pub fn empty(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            income_total: 0.0,
            expense_total: 0.0,
            transaction_count: 0,
        }
    }

    pub fn net(&self) -> f64 {
        self.income_total - self.expense_total
    }
}

/// Share of total expense attributed to one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub category: String,
    pub amount: f64,
    /// Percentage of total expense, one decimal place
    pub percentage: f64,
}
