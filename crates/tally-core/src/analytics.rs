//! Single entry point for a full analytics pass
//!
//! The facade validates its inputs, runs every component over the same
//! series and bundles the results into one immutable [`AnalyticsReport`].
//! An insufficient-data forecast is not fatal: the report carries
//! `forecast: None` and the reason instead.

use serde::{Deserialize, Serialize};

use crate::aggregate::TrendAggregator;
use crate::config::DEFAULT_DAYS_AHEAD;
use crate::error::{Error, Result};
use crate::forecast::{ForecastEngine, ForecastResult};
use crate::insights::{Insight, InsightGenerator};
use crate::models::{AggregateBucket, CategoryShare, Granularity, Summary, TransactionSeries};
use crate::statistics::{Statistics, StatisticsCalculator};

/// Parameters of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsOptions {
    pub days_ahead: u32,
    pub granularity: Granularity,
    pub top_n: Option<usize>,
}

impl Default for AnalyticsOptions {
    fn default() -> Self {
        Self {
            days_ahead: DEFAULT_DAYS_AHEAD,
            granularity: Granularity::Monthly,
            top_n: None,
        }
    }
}

impl AnalyticsOptions {
    pub fn with_days_ahead(mut self, days: u32) -> Self {
        self.days_ahead = days;
        self
    }

    pub fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = granularity;
        self
    }

    pub fn with_top_n(mut self, top_n: Option<usize>) -> Self {
        self.top_n = top_n;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.days_ahead == 0 {
            return Err(Error::InvalidInput(
                "days_ahead must be greater than zero".to_string(),
            ));
        }
        if self.top_n == Some(0) {
            return Err(Error::InvalidInput(
                "top_n must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Everything the presentation layer needs, computed in one pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsReport {
    pub options: AnalyticsOptions,
    pub summary: Summary,
    /// Statistics over expense magnitudes
    pub statistics: Statistics,
    pub period_aggregates: Vec<AggregateBucket>,
    pub category_aggregates: Vec<AggregateBucket>,
    pub category_shares: Vec<CategoryShare>,
    pub forecast: Option<ForecastResult>,
    /// Why `forecast` is missing, if it is
    pub forecast_unavailable: Option<String>,
    pub insights: Vec<Insight>,
}

impl AnalyticsReport {
    /// Insight messages in rule order
    pub fn insight_messages(&self) -> Vec<&str> {
        self.insights.iter().map(|i| i.message.as_str()).collect()
    }
}

/// Runs statistics, aggregation, forecasting and insights over one series
#[derive(Debug, Clone, Default)]
pub struct AnalyticsFacade {
    options: AnalyticsOptions,
    statistics: StatisticsCalculator,
    aggregator: TrendAggregator,
    forecaster: ForecastEngine,
    insights: InsightGenerator,
}

impl AnalyticsFacade {
    pub fn new(options: AnalyticsOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    pub fn options(&self) -> &AnalyticsOptions {
        &self.options
    }

    /// Compute the full report for `series`
    pub fn compute(&self, series: &TransactionSeries) -> Result<AnalyticsReport> {
        self.options.validate()?;
        series.validate()?;

        let summary = series.summary();
        let statistics = self.statistics.compute(&series.expense_magnitudes());
        let period_aggregates = self.aggregator.by_period(series, self.options.granularity);
        let category_aggregates = self.aggregator.by_category(series, self.options.top_n);
        let category_shares = self.aggregator.category_shares(series);

        let (forecast, forecast_unavailable) =
            match self.forecaster.forecast(series, self.options.days_ahead) {
                Ok(result) => (Some(result), None),
                Err(e @ Error::InsufficientData { .. }) => {
                    tracing::warn!(error = %e, "Forecast unavailable");
                    (None, Some(e.to_string()))
                }
                Err(e) => return Err(e),
            };

        let insights = self.insights.evaluate(&statistics, forecast.as_ref());

        tracing::info!(
            transactions = summary.transaction_count,
            periods = period_aggregates.len(),
            categories = category_aggregates.len(),
            has_forecast = forecast.is_some(),
            "Computed analytics report"
        );

        Ok(AnalyticsReport {
            options: self.options,
            summary,
            statistics,
            period_aggregates,
            category_aggregates,
            category_shares,
            forecast,
            forecast_unavailable,
            insights,
        })
    }
}
