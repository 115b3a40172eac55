//! Tally Core Library
//!
//! Transaction analytics and forecasting for the Tally personal finance tool:
//! - Descriptive statistics over expense amounts
//! - Period and category aggregation with top-N fold-back
//! - Ordinary-least-squares spending forecast with R² confidence
//! - Deterministic rule-based insights
//! - One-call analytics facade producing an immutable report
//! - CSV/JSON import, JSON/CSV export and TOML configuration

pub mod aggregate;
pub mod analytics;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod forecast;
pub mod import;
pub mod insights;
pub mod models;
pub mod statistics;

pub use aggregate::{TrendAggregator, OTHER_CATEGORY};
pub use analytics::{AnalyticsFacade, AnalyticsOptions, AnalyticsReport};
pub use config::AnalyticsConfig;
pub use error::{Error, Result};
pub use export::ExportFormat;
pub use filter::TransactionFilter;
pub use forecast::{
    fit_linear, ConfidenceLevel, ForecastEngine, ForecastResult, LinearFit, TrendLabel,
    TREND_EPSILON,
};
pub use insights::{Insight, InsightGenerator, InsightKind, Severity};
pub use models::{
    AggregateBucket, CategoryShare, Granularity, Summary, TransactionKind, TransactionRecord,
    TransactionSeries,
};
pub use statistics::{Statistics, StatisticsCalculator};
