//! Period and category aggregation
//!
//! Period buckets cover every period between the first and last record,
//! so charts never get a ragged x-axis. Category buckets only count
//! expenses ("where does my money go") and an explicit fold-back bucket
//! keeps the total conserved under top-N truncation.

use std::collections::{BTreeMap, HashMap};

use crate::models::{AggregateBucket, CategoryShare, Granularity, TransactionSeries};

/// Key of the fold-back bucket produced by top-N truncation
pub const OTHER_CATEGORY: &str = "Other";

/// Groups a series by calendar period and by category
#[derive(Debug, Clone, Copy, Default)]
pub struct TrendAggregator;

impl TrendAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Income and expense totals per period, oldest period first
    pub fn by_period(
        &self,
        series: &TransactionSeries,
        granularity: Granularity,
    ) -> Vec<AggregateBucket> {
        let Some((first, last)) = series.date_range() else {
            return Vec::new();
        };

        // Keyed by period start so iteration order is chronological
        let mut periods: BTreeMap<chrono::NaiveDate, AggregateBucket> = BTreeMap::new();

        let last_start = granularity.period_start(last);
        let mut cursor = Some(granularity.period_start(first));
        while let Some(start) = cursor {
            if start > last_start {
                break;
            }
            periods.insert(start, AggregateBucket::empty(granularity.period_key(start)));
            cursor = granularity.next_period_start(start);
        }

        for record in series {
            let start = granularity.period_start(record.date);
            let bucket = periods
                .entry(start)
                .or_insert_with(|| AggregateBucket::empty(granularity.period_key(start)));

            bucket.transaction_count += 1;
            if record.is_income() {
                bucket.income_total += record.amount;
            } else if record.is_expense() {
                bucket.expense_total += record.magnitude();
            }
        }

        tracing::debug!(
            granularity = granularity.as_str(),
            periods = periods.len(),
            "Aggregated series by period"
        );

        periods.into_values().collect()
    }

    /// Expense totals per category, largest first
    ///
    /// With `top_n`, only the `n` largest categories are kept and the rest
    /// are summed into a trailing [`OTHER_CATEGORY`] bucket. A category that
    /// is itself named "Other" always lands in that bucket.
    pub fn by_category(
        &self,
        series: &TransactionSeries,
        top_n: Option<usize>,
    ) -> Vec<AggregateBucket> {
        let mut totals: HashMap<&str, AggregateBucket> = HashMap::new();

        for record in series.expenses() {
            let bucket = totals
                .entry(record.category.as_str())
                .or_insert_with(|| AggregateBucket::empty(record.category.as_str()));
            bucket.expense_total += record.magnitude();
            bucket.transaction_count += 1;
        }

        let mut buckets: Vec<AggregateBucket> = totals.into_values().collect();
        sort_by_expense(&mut buckets);

        let Some(limit) = top_n else {
            return buckets;
        };

        let (mut others, ranked): (Vec<_>, Vec<_>) = buckets
            .into_iter()
            .partition(|b| b.key == OTHER_CATEGORY);

        let mut kept = Vec::new();
        for bucket in ranked {
            if kept.len() < limit {
                kept.push(bucket);
            } else {
                others.push(bucket);
            }
        }

        if !others.is_empty() {
            let mut fold = AggregateBucket::empty(OTHER_CATEGORY);
            for bucket in &others {
                fold.expense_total += bucket.expense_total;
                fold.transaction_count += bucket.transaction_count;
            }

            tracing::debug!(
                folded = others.len(),
                amount = fold.expense_total,
                "Folded excluded categories into Other"
            );
            kept.push(fold);
        }

        kept
    }

    /// Percentage of total expense per category, largest first
    pub fn category_shares(&self, series: &TransactionSeries) -> Vec<CategoryShare> {
        let buckets = self.by_category(series, None);
        let total: f64 = buckets.iter().map(|b| b.expense_total).sum();

        if total <= 0.0 {
            return Vec::new();
        }

        buckets
            .into_iter()
            .map(|b| CategoryShare {
                percentage: round_to(b.expense_total / total * 100.0, 1),
                amount: b.expense_total,
                category: b.key,
            })
            .collect()
    }
}

/// Descending expense total, ties broken alphabetically
fn sort_by_expense(buckets: &mut [AggregateBucket]) {
    buckets.sort_by(|a, b| {
        b.expense_total
            .total_cmp(&a.expense_total)
            .then_with(|| a.key.cmp(&b.key))
    });
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
