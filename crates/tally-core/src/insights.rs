//! Rule-based spending insights
//!
//! Turns computed statistics and an optional forecast into a short, ordered
//! list of human-readable observations. The rule table is fixed:
//!
//! 1. Spending level (mean expense)
//! 2. Variability (coefficient of variation)
//! 3. Distribution shape (skewness)
//! 4. Trend direction
//! 5. Projection over the horizon
//! 6. Forecast confidence
//!
//! Rules 2 and 3 are skipped when there are no expenses. Rules 4 to 6 need a
//! forecast and are replaced by a single "not enough history" insight
//! without one. Output depends only on the inputs.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::forecast::{ConfidenceLevel, ForecastResult, TrendLabel};
use crate::statistics::Statistics;

/// Mean expense below this is "small everyday purchases"
pub const SMALL_MEAN_EXPENSE: f64 = 50.0;
/// Mean expense below this (and above the small band) is "moderate"
pub const MODERATE_MEAN_EXPENSE: f64 = 200.0;
/// Coefficient of variation below this is "consistent"
pub const CONSISTENT_CV: f64 = 0.25;
/// Coefficient of variation below this (and above consistent) is "moderate"
pub const MODERATE_CV: f64 = 0.75;
/// Skewness above this means a few large purchases dominate
pub const HIGH_SKEWNESS: f64 = 1.0;

/// Which rule produced an insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    NoData,
    SpendingLevel,
    Variability,
    Distribution,
    Trend,
    Projection,
    Confidence,
    NoForecast,
}

impl InsightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsightKind::NoData => "no_data",
            InsightKind::SpendingLevel => "spending_level",
            InsightKind::Variability => "variability",
            InsightKind::Distribution => "distribution",
            InsightKind::Trend => "trend",
            InsightKind::Projection => "projection",
            InsightKind::Confidence => "confidence",
            InsightKind::NoForecast => "no_forecast",
        }
    }
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How much attention an insight deserves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational - no action needed
    Info,
    /// Worth attention but not urgent
    Attention,
    /// Should be addressed soon
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Attention => "attention",
            Severity::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single observation about the data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub severity: Severity,
    pub message: String,
}

impl Insight {
    fn new(kind: InsightKind, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            message: message.into(),
        }
    }
}

/// Deterministic rule table over statistics and forecast
#[derive(Debug, Clone, Copy, Default)]
pub struct InsightGenerator;

impl InsightGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Insight messages in rule order
    pub fn generate(&self, stats: &Statistics, forecast: Option<&ForecastResult>) -> Vec<String> {
        self.evaluate(stats, forecast)
            .into_iter()
            .map(|i| i.message)
            .collect()
    }

    /// Structured insights in rule order
    pub fn evaluate(&self, stats: &Statistics, forecast: Option<&ForecastResult>) -> Vec<Insight> {
        let mut insights = Vec::new();

        if stats.count == 0 {
            insights.push(Insight::new(
                InsightKind::NoData,
                Severity::Info,
                "No expense data yet. Add expense transactions to see spending insights.",
            ));
        } else {
            insights.push(spending_level(stats));
            insights.push(variability(stats));
            if stats.skewness > HIGH_SKEWNESS {
                insights.push(Insight::new(
                    InsightKind::Distribution,
                    Severity::Attention,
                    format!(
                        "A few large purchases dominate your spending (skewness {:.2}).",
                        stats.skewness
                    ),
                ));
            }
        }

        match forecast {
            Some(forecast) => {
                insights.push(trend(forecast));
                insights.push(Insight::new(
                    InsightKind::Projection,
                    Severity::Info,
                    format!(
                        "Based on your spending history, you will spend approximately ${:.2} over the next {} days.",
                        forecast.prediction, forecast.days_ahead
                    ),
                ));
                insights.push(confidence(forecast));
            }
            None => insights.push(Insight::new(
                InsightKind::NoForecast,
                Severity::Info,
                "Not enough expense history to forecast. Add at least two expenses to see a trend.",
            )),
        }

        tracing::debug!(count = insights.len(), "Generated insights");
        insights
    }
}

fn spending_level(stats: &Statistics) -> Insight {
    let message = if stats.mean < SMALL_MEAN_EXPENSE {
        format!(
            "Your average expense is ${:.2}, mostly small everyday purchases.",
            stats.mean
        )
    } else if stats.mean < MODERATE_MEAN_EXPENSE {
        format!("Your average expense is ${:.2}, a moderate level.", stats.mean)
    } else {
        format!(
            "Your average expense is ${:.2}, driven by large purchases.",
            stats.mean
        )
    };

    Insight::new(InsightKind::SpendingLevel, Severity::Info, message)
}

fn variability(stats: &Statistics) -> Insight {
    let cv = stats.coefficient_of_variation();

    if cv < CONSISTENT_CV {
        Insight::new(
            InsightKind::Variability,
            Severity::Info,
            "Your expenses are consistent in size.",
        )
    } else if cv < MODERATE_CV {
        Insight::new(
            InsightKind::Variability,
            Severity::Info,
            "Your expenses vary moderately in size.",
        )
    } else {
        Insight::new(
            InsightKind::Variability,
            Severity::Attention,
            format!(
                "Your expenses are irregular (standard deviation ${:.2} against a ${:.2} average).",
                stats.std_dev, stats.mean
            ),
        )
    }
}

fn trend(forecast: &ForecastResult) -> Insight {
    let rate = forecast.daily_rate.abs();

    match forecast.trend_label {
        TrendLabel::Increasing => Insight::new(
            InsightKind::Trend,
            Severity::Warning,
            format!(
                "Your spending is increasing by ${:.2}/day. Consider reviewing your budget to control expenses.",
                rate
            ),
        ),
        TrendLabel::Decreasing => Insight::new(
            InsightKind::Trend,
            Severity::Info,
            format!(
                "Great news! Your spending is decreasing by ${:.2}/day. You're on track with your savings goals!",
                rate
            ),
        ),
        TrendLabel::Flat => Insight::new(
            InsightKind::Trend,
            Severity::Info,
            "Your spending is relatively stable. No significant changes detected in your spending pattern.",
        ),
    }
}

fn confidence(forecast: &ForecastResult) -> Insight {
    let r2 = forecast.r_squared;

    match forecast.confidence {
        ConfidenceLevel::High => Insight::new(
            InsightKind::Confidence,
            Severity::Info,
            format!(
                "High confidence (R² = {:.3}): a strong linear pattern was found, these predictions are reliable.",
                r2
            ),
        ),
        ConfidenceLevel::Moderate => Insight::new(
            InsightKind::Confidence,
            Severity::Info,
            format!(
                "Moderate confidence (R² = {:.3}): your spending has some variability, use predictions as guidance.",
                r2
            ),
        ),
        ConfidenceLevel::Low => Insight::new(
            InsightKind::Confidence,
            Severity::Attention,
            format!(
                "Low confidence (R² = {:.3}): your spending pattern is irregular. Consider adding more transaction data for better predictions.",
                r2
            ),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statistics;

    fn forecast(slope: f64, r_squared: f64) -> ForecastResult {
        ForecastResult {
            prediction: 420.0,
            daily_rate: slope,
            intercept: 10.0,
            r_squared,
            days_ahead: 30,
            trend_label: TrendLabel::from_slope(slope),
            confidence: ConfidenceLevel::from_r_squared(r_squared),
            sample_size: 12,
        }
    }

    fn kinds(insights: &[Insight]) -> Vec<InsightKind> {
        insights.iter().map(|i| i.kind).collect()
    }

    #[test]
    fn test_rule_order_with_forecast() {
        let stats = statistics::compute(&[5.0, 6.0, 5.5, 90.0]);
        let insights = InsightGenerator::new().evaluate(&stats, Some(&forecast(2.5, 0.9)));

        assert_eq!(
            kinds(&insights),
            vec![
                InsightKind::SpendingLevel,
                InsightKind::Variability,
                InsightKind::Distribution,
                InsightKind::Trend,
                InsightKind::Projection,
                InsightKind::Confidence,
            ]
        );
        assert_eq!(insights[3].severity, Severity::Warning);
        assert!(insights[3].message.contains("$2.50/day"));
        assert!(insights[4].message.contains("$420.00 over the next 30 days"));
        assert!(insights[5].message.starts_with("High confidence"));
    }

    #[test]
    fn test_empty_stats_without_forecast() {
        let insights = InsightGenerator::new().evaluate(&Statistics::default(), None);
        assert_eq!(
            kinds(&insights),
            vec![InsightKind::NoData, InsightKind::NoForecast]
        );
    }

    #[test]
    fn test_spending_level_bands() {
        let generator = InsightGenerator::new();
        let small = generator.generate(&statistics::compute(&[10.0, 20.0]), None);
        let moderate = generator.generate(&statistics::compute(&[50.0, 50.0]), None);
        let large = generator.generate(&statistics::compute(&[500.0, 700.0]), None);

        assert!(small[0].contains("small everyday"));
        assert!(moderate[0].contains("moderate level"));
        assert!(large[0].contains("large purchases"));
    }

    #[test]
    fn test_variability_bands() {
        let generator = InsightGenerator::new();
        let steady = generator.evaluate(&statistics::compute(&[100.0, 100.0, 100.0]), None);
        let wild = generator.evaluate(&statistics::compute(&[1.0, 300.0, 2.0]), None);

        assert!(steady[1].message.contains("consistent"));
        assert_eq!(wild[1].severity, Severity::Attention);
        assert!(wild[1].message.contains("irregular"));
    }

    #[test]
    fn test_trend_wording() {
        let stats = statistics::compute(&[40.0, 60.0]);
        let generator = InsightGenerator::new();

        let down = generator.generate(&stats, Some(&forecast(-1.25, 0.6)));
        assert!(down[2].starts_with("Great news!"));
        assert!(down[2].contains("$1.25/day"));
        assert!(down[4].starts_with("Moderate confidence"));

        let flat = generator.generate(&stats, Some(&forecast(0.0, 0.0)));
        assert!(flat[2].contains("relatively stable"));
        assert!(flat[4].starts_with("Low confidence"));
    }

    #[test]
    fn test_deterministic() {
        let stats = statistics::compute(&[45.5, 12.99, 89.99, 150.0, 32.5]);
        let fc = forecast(0.75, 0.42);
        let generator = InsightGenerator::new();

        let first = generator.generate(&stats, Some(&fc));
        for _ in 0..5 {
            assert_eq!(generator.generate(&stats, Some(&fc)), first);
        }
    }
}
