//! Expense forecasting with ordinary least squares
//!
//! Fits `magnitude = slope * day_offset + intercept` over the expense records
//! of a series and extrapolates the line `days_ahead` days past the last
//! expense. R² doubles as the confidence score.
//!
//! A series with no variance to explain (every magnitude identical, or every
//! expense on the same day) is not an error: it produces a flat fit through
//! the mean with `r_squared = 0`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};
use crate::models::TransactionSeries;
use crate::statistics::bounded_mean;

/// Minimum number of expense records needed to fit a line
pub const MIN_FORECAST_RECORDS: usize = 2;

/// Slope magnitude (currency units per day) below which a trend is flat
pub const TREND_EPSILON: f64 = 0.01;

/// R² above which a forecast is considered highly reliable
pub const HIGH_CONFIDENCE_R2: f64 = 0.8;

/// R² above which a forecast is considered moderately reliable
pub const MODERATE_CONFIDENCE_R2: f64 = 0.5;

/// Direction of the fitted spending line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendLabel {
    Increasing,
    Decreasing,
    Flat,
}

impl TrendLabel {
    /// Classify a daily slope against [`TREND_EPSILON`]
    pub fn from_slope(slope: f64) -> Self {
        if slope > TREND_EPSILON {
            TrendLabel::Increasing
        } else if slope < -TREND_EPSILON {
            TrendLabel::Decreasing
        } else {
            TrendLabel::Flat
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TrendLabel::Increasing => "increasing",
            TrendLabel::Decreasing => "decreasing",
            TrendLabel::Flat => "flat",
        }
    }
}

impl fmt::Display for TrendLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Qualitative reading of R²
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceLevel {
    High,
    Moderate,
    Low,
}

impl ConfidenceLevel {
    pub fn from_r_squared(r_squared: f64) -> Self {
        if r_squared > HIGH_CONFIDENCE_R2 {
            ConfidenceLevel::High
        } else if r_squared > MODERATE_CONFIDENCE_R2 {
            ConfidenceLevel::Moderate
        } else {
            ConfidenceLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLevel::High => "high",
            ConfidenceLevel::Moderate => "moderate",
            ConfidenceLevel::Low => "low",
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of fitting a line to (x, y) points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination, clamped into [0, 1]
    pub r_squared: f64,
}

impl LinearFit {
    /// Value of the fitted line at `x`
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

/// Closed-form least-squares fit
///
/// When either axis has zero variance the fit is flat through the mean of y
/// with `r_squared = 0`. An empty slice fits the zero line.
pub fn fit_linear(points: &[(f64, f64)]) -> LinearFit {
    if points.is_empty() {
        return LinearFit {
            slope: 0.0,
            intercept: 0.0,
            r_squared: 0.0,
        };
    }

    let mean_x = bounded_mean(points.iter().map(|p| p.0));
    let mean_y = bounded_mean(points.iter().map(|p| p.1));

    let (mut s_xx, mut s_xy, mut ss_tot) = (0.0, 0.0, 0.0);
    for &(x, y) in points {
        let dx = x - mean_x;
        let dy = y - mean_y;
        s_xx += dx * dx;
        s_xy += dx * dy;
        ss_tot += dy * dy;
    }

    if ss_tot == 0.0 {
        // Every y is identical
        return LinearFit {
            slope: 0.0,
            intercept: points[0].1,
            r_squared: 0.0,
        };
    }

    if s_xx == 0.0 {
        return LinearFit {
            slope: 0.0,
            intercept: mean_y,
            r_squared: 0.0,
        };
    }

    let slope = s_xy / s_xx;
    let intercept = mean_y - slope * mean_x;

    let ss_res: f64 = points
        .iter()
        .map(|&(x, y)| {
            let residual = y - (slope * x + intercept);
            residual * residual
        })
        .sum();

    LinearFit {
        slope,
        intercept,
        r_squared: (1.0 - ss_res / ss_tot).clamp(0.0, 1.0),
    }
}

/// Projected spending for a horizon past the last expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    /// Fitted value `days_ahead` days after the last expense, never negative
    pub prediction: f64,
    /// Regression slope in currency units per day
    pub daily_rate: f64,
    pub intercept: f64,
    pub r_squared: f64,
    pub days_ahead: u32,
    pub trend_label: TrendLabel,
    pub confidence: ConfidenceLevel,
    /// Number of expense records the line was fitted on
    pub sample_size: usize,
}

/// Linear forecaster over the expense side of a series
#[derive(Debug, Clone, Copy, Default)]
pub struct ForecastEngine;

impl ForecastEngine {
    pub fn new() -> Self {
        Self
    }

    /// Fit expenses and project `days_ahead` days past the last one
    pub fn forecast(&self, series: &TransactionSeries, days_ahead: u32) -> Result<ForecastResult> {
        if days_ahead == 0 {
            return Err(Error::InvalidInput(
                "days_ahead must be greater than zero".to_string(),
            ));
        }
        series.validate()?;

        let expenses: Vec<_> = series
            .sorted_by_date()
            .into_iter()
            .filter(|r| r.is_expense())
            .collect();

        if expenses.len() < MIN_FORECAST_RECORDS {
            return Err(Error::InsufficientData {
                required: MIN_FORECAST_RECORDS,
                found: expenses.len(),
            });
        }

        let origin = expenses[0].date;
        let points: Vec<(f64, f64)> = expenses
            .iter()
            .map(|r| ((r.date - origin).num_days() as f64, r.magnitude()))
            .collect();

        let fit = fit_linear(&points);
        let last_offset = points.last().map(|p| p.0).unwrap_or(0.0);
        let prediction = fit.predict(last_offset + f64::from(days_ahead)).max(0.0);

        let result = ForecastResult {
            prediction,
            daily_rate: fit.slope,
            intercept: fit.intercept,
            r_squared: fit.r_squared,
            days_ahead,
            trend_label: TrendLabel::from_slope(fit.slope),
            confidence: ConfidenceLevel::from_r_squared(fit.r_squared),
            sample_size: expenses.len(),
        };

        tracing::debug!(
            samples = result.sample_size,
            slope = result.daily_rate,
            r_squared = result.r_squared,
            prediction = result.prediction,
            "Fitted expense forecast"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionRecord;
    use chrono::{Duration, NaiveDate};

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    /// One expense per consecutive day with the given magnitudes
    fn daily_expenses(magnitudes: &[f64]) -> TransactionSeries {
        magnitudes
            .iter()
            .enumerate()
            .map(|(i, m)| {
                TransactionRecord::new(
                    i as i64 + 1,
                    start() + Duration::days(i as i64),
                    -m,
                    "Food",
                    "",
                )
            })
            .collect()
    }

    #[test]
    fn test_perfect_line() {
        let result = ForecastEngine::new()
            .forecast(&daily_expenses(&[10.0, 20.0, 30.0, 40.0, 50.0]), 1)
            .unwrap();

        assert!((result.daily_rate - 10.0).abs() < 1e-9);
        assert!((result.intercept - 10.0).abs() < 1e-9);
        assert!((result.prediction - 60.0).abs() < 1e-9);
        assert!((result.r_squared - 1.0).abs() < 1e-9);
        assert_eq!(result.trend_label, TrendLabel::Increasing);
        assert_eq!(result.confidence, ConfidenceLevel::High);
        assert_eq!(result.sample_size, 5);
    }

    #[test]
    fn test_unsorted_input_is_sorted_by_date() {
        let mut records: Vec<TransactionRecord> =
            daily_expenses(&[10.0, 20.0, 30.0, 40.0, 50.0]).records().to_vec();
        records.reverse();
        let series: TransactionSeries = records.into();

        let result = ForecastEngine::new().forecast(&series, 1).unwrap();
        assert!((result.prediction - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_constant_series_is_flat() {
        let result = ForecastEngine::new()
            .forecast(&daily_expenses(&[50.0; 5]), 30)
            .unwrap();

        assert_eq!(result.daily_rate, 0.0);
        assert_eq!(result.r_squared, 0.0);
        assert_eq!(result.trend_label, TrendLabel::Flat);
        assert_eq!(result.prediction, 50.0);
        assert_eq!(result.confidence, ConfidenceLevel::Low);
    }

    #[test]
    fn test_constant_inexact_amount_predicts_itself() {
        for value in [19.99, 33.33, 0.1] {
            let result = ForecastEngine::new()
                .forecast(&daily_expenses(&[value; 5]), 30)
                .unwrap();

            assert_eq!(result.prediction, value);
            assert_eq!(result.intercept, value);
            assert_eq!(result.daily_rate, 0.0);
            assert_eq!(result.r_squared, 0.0);
            assert_eq!(result.trend_label, TrendLabel::Flat);
        }
    }

    #[test]
    fn test_same_day_expenses_are_flat() {
        let series: TransactionSeries = vec![
            TransactionRecord::new(1, start(), -10.0, "Food", ""),
            TransactionRecord::new(2, start(), -30.0, "Food", ""),
        ]
        .into();

        let result = ForecastEngine::new().forecast(&series, 7).unwrap();
        assert_eq!(result.daily_rate, 0.0);
        assert_eq!(result.r_squared, 0.0);
        assert_eq!(result.prediction, 20.0);
        assert_eq!(result.trend_label, TrendLabel::Flat);
    }

    #[test]
    fn test_insufficient_data() {
        let engine = ForecastEngine::new();

        for series in [TransactionSeries::new(), daily_expenses(&[25.0])] {
            match engine.forecast(&series, 30) {
                Err(Error::InsufficientData { required, found }) => {
                    assert_eq!(required, 2);
                    assert_eq!(found, series.len());
                }
                other => panic!("expected InsufficientData, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_income_is_ignored() {
        let mut series = daily_expenses(&[40.0]);
        series.push(TransactionRecord::new(2, start(), 3000.0, "Salary", ""));
        series.push(TransactionRecord::new(3, start(), 0.0, "Adjustment", ""));

        assert!(matches!(
            ForecastEngine::new().forecast(&series, 30),
            Err(Error::InsufficientData { found: 1, .. })
        ));
    }

    #[test]
    fn test_zero_horizon_is_invalid() {
        let result = ForecastEngine::new().forecast(&daily_expenses(&[1.0, 2.0]), 0);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_non_finite_amount_is_invalid() {
        let mut series = daily_expenses(&[1.0, 2.0]);
        series.push(TransactionRecord::new(9, start(), f64::NEG_INFINITY, "Food", ""));
        let result = ForecastEngine::new().forecast(&series, 30);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_prediction_never_negative() {
        let result = ForecastEngine::new()
            .forecast(&daily_expenses(&[100.0, 80.0, 60.0, 40.0, 20.0]), 30)
            .unwrap();

        assert_eq!(result.trend_label, TrendLabel::Decreasing);
        assert_eq!(result.prediction, 0.0);
    }

    #[test]
    fn test_r_squared_in_unit_interval() {
        let noisy = [12.0, 95.0, 3.0, 47.0, 60.0, 8.0, 120.0, 33.0];
        let result = ForecastEngine::new()
            .forecast(&daily_expenses(&noisy), 14)
            .unwrap();
        assert!((0.0..=1.0).contains(&result.r_squared));
    }

    #[test]
    fn test_trend_epsilon() {
        assert_eq!(TrendLabel::from_slope(0.005), TrendLabel::Flat);
        assert_eq!(TrendLabel::from_slope(-0.01), TrendLabel::Flat);
        assert_eq!(TrendLabel::from_slope(0.02), TrendLabel::Increasing);
        assert_eq!(TrendLabel::from_slope(-0.5), TrendLabel::Decreasing);
    }

    #[test]
    fn test_confidence_bands() {
        assert_eq!(ConfidenceLevel::from_r_squared(0.95), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_r_squared(0.8), ConfidenceLevel::Moderate);
        assert_eq!(ConfidenceLevel::from_r_squared(0.6), ConfidenceLevel::Moderate);
        assert_eq!(ConfidenceLevel::from_r_squared(0.5), ConfidenceLevel::Low);
    }

    #[test]
    fn test_fit_linear_degenerate_x() {
        let fit = fit_linear(&[(3.0, 1.0), (3.0, 5.0)]);
        assert_eq!(fit.slope, 0.0);
        assert_eq!(fit.intercept, 3.0);
        assert_eq!(fit.r_squared, 0.0);
    }

    #[test]
    fn test_fit_linear_constant_y_is_exact() {
        let fit = fit_linear(&[(0.0, 0.1), (1.0, 0.1), (2.0, 0.1)]);
        assert_eq!(fit.slope, 0.0);
        assert_eq!(fit.intercept, 0.1);
        assert_eq!(fit.predict(10.0), 0.1);
        assert_eq!(fit.r_squared, 0.0);
    }
}
