//! Analytics handlers
//!
//! Every endpoint computes from the request body alone. Fields the caller
//! omits fall back to the server's analytics config. Transactions go through
//! the same date parsing and validation as a JSON import, so a bad record is
//! a 400 naming its row.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;

use crate::{AppError, AppState};
use tally_core::import::{series_from_raw, RawTransaction};
use tally_core::models::Granularity;
use tally_core::{
    AnalyticsFacade, AnalyticsReport, ForecastEngine, ForecastResult, Statistics,
    StatisticsCalculator,
};

/// Request body for a full report
#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    pub transactions: Vec<RawTransaction>,
    pub days_ahead: Option<u32>,
    pub granularity: Option<Granularity>,
    pub top_n: Option<usize>,
}

/// Request body for descriptive statistics
#[derive(Debug, Deserialize)]
pub struct StatisticsRequest {
    pub amounts: Vec<f64>,
}

/// Request body for a forecast
#[derive(Debug, Deserialize)]
pub struct ForecastRequest {
    pub transactions: Vec<RawTransaction>,
    pub days_ahead: Option<u32>,
}

/// POST /api/report - Full analytics report
pub async fn report(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ReportRequest>, JsonRejection>,
) -> Result<Json<AnalyticsReport>, AppError> {
    let Json(body) = payload?;
    let transactions = series_from_raw(body.transactions)?;

    let mut options = state.config.analytics.options();
    if let Some(days) = body.days_ahead {
        options.days_ahead = days;
    }
    if let Some(granularity) = body.granularity {
        options.granularity = granularity;
    }
    if body.top_n.is_some() {
        options.top_n = body.top_n;
    }

    let report = AnalyticsFacade::new(options).compute(&transactions)?;

    tracing::debug!(
        transactions = transactions.len(),
        has_forecast = report.forecast.is_some(),
        "Served report"
    );

    Ok(Json(report))
}

/// POST /api/statistics - Descriptive statistics of raw amounts
pub async fn statistics(
    payload: Result<Json<StatisticsRequest>, JsonRejection>,
) -> Result<Json<Statistics>, AppError> {
    let Json(body) = payload?;
    if body.amounts.iter().any(|a| !a.is_finite()) {
        return Err(AppError::bad_request("Amounts must be finite numbers"));
    }

    Ok(Json(StatisticsCalculator::new().compute(&body.amounts)))
}

/// POST /api/forecast - Linear spending forecast
///
/// Returns 422 when there are fewer than two expenses and 400 for a
/// malformed body or record.
pub async fn forecast(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ForecastRequest>, JsonRejection>,
) -> Result<Json<ForecastResult>, AppError> {
    let Json(body) = payload?;
    let transactions = series_from_raw(body.transactions)?;

    let days_ahead = body
        .days_ahead
        .unwrap_or(state.config.analytics.days_ahead);

    let result = ForecastEngine::new().forecast(&transactions, days_ahead)?;
    Ok(Json(result))
}
