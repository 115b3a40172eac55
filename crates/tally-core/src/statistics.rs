//! Descriptive statistics over an amount series
//!
//! Never fails: empty input yields all-zero statistics so the presentation
//! layer can render without branching on missing values.

use serde::{Deserialize, Serialize};

/// Minimum sample size for skewness and kurtosis
pub const MIN_MOMENT_SAMPLES: usize = 3;

/// Descriptive statistics for a list of amounts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub count: usize,
    pub sum: f64,
    pub mean: f64,
    pub median: f64,
    /// Most frequent value; smallest of the tied values on ties
    pub mode: f64,
    /// Sample standard deviation (n - 1 denominator)
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub percentile_25: f64,
    pub percentile_75: f64,
    /// Population skewness (m3 / m2^1.5), 0 below three samples
    pub skewness: f64,
    /// Fisher excess kurtosis (m4 / m2^2 - 3), 0 below three samples
    pub kurtosis: f64,
}

impl Statistics {
    /// Coefficient of variation (std_dev / mean), 0 when the mean is 0
    pub fn coefficient_of_variation(&self) -> f64 {
        if self.mean == 0.0 {
            0.0
        } else {
            self.std_dev / self.mean.abs()
        }
    }
}

/// Stateless calculator
#[derive(Debug, Clone, Copy, Default)]
pub struct StatisticsCalculator;

impl StatisticsCalculator {
    pub fn new() -> Self {
        Self
    }

    pub fn compute(&self, amounts: &[f64]) -> Statistics {
        compute(amounts)
    }
}

/// Compute descriptive statistics for `amounts`
pub fn compute(amounts: &[f64]) -> Statistics {
    if amounts.is_empty() {
        return Statistics::default();
    }

    let count = amounts.len();
    let n = count as f64;
    let sum: f64 = amounts.iter().sum();

    let mut sorted = amounts.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mean = (sum / n).clamp(sorted[0], sorted[count - 1]);

    let median = percentile(&sorted, 50.0);

    let std_dev = if count > 1 {
        let variance = amounts.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
        variance.sqrt()
    } else {
        0.0
    };

    let (skewness, kurtosis) = moments(amounts, mean);

    Statistics {
        count,
        sum,
        mean,
        median,
        mode: mode_of_sorted(&sorted),
        std_dev,
        min: sorted[0],
        max: sorted[count - 1],
        percentile_25: percentile(&sorted, 25.0),
        percentile_75: percentile(&sorted, 75.0),
        skewness,
        kurtosis,
    }
}

/// Arithmetic mean kept inside `[min, max]`
///
/// Rounding in the running sum can push `sum / n` just outside the range
/// of the inputs (three copies of 0.1 average to 0.10000000000000002).
/// A constant series therefore always averages to exactly its value.
/// Returns 0 for no values.
pub fn bounded_mean<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    let (mut sum, mut count) = (0.0, 0usize);
    let (mut min, mut max) = (f64::INFINITY, f64::NEG_INFINITY);
    for v in values {
        sum += v;
        count += 1;
        min = min.min(v);
        max = max.max(v);
    }

    if count == 0 {
        return 0.0;
    }
    (sum / count as f64).clamp(min, max)
}

/// Linear-interpolated percentile of an ascending slice
///
/// Uses the rank `p / 100 * (n - 1)` and interpolates between the two
/// neighbouring order statistics. Returns 0 for an empty slice.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }

    let rank = (p.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;

    if lower == upper {
        sorted[lower]
    } else {
        let weight = rank - lower as f64;
        sorted[lower] + (sorted[upper] - sorted[lower]) * weight
    }
}

/// Running totals of `amounts` in order
pub fn cumulative_sum(amounts: &[f64]) -> Vec<f64> {
    amounts
        .iter()
        .scan(0.0, |total, x| {
            *total += x;
            Some(*total)
        })
        .collect()
}

/// Mode over the frequency table of an ascending slice
///
/// Equal values are adjacent after sorting, so each run is one table entry.
/// Only a strictly higher count replaces the current best, which makes the
/// smallest value win any tie.
fn mode_of_sorted(sorted: &[f64]) -> f64 {
    let mut best_value = 0.0;
    let mut best_count = 0usize;

    let mut i = 0;
    while i < sorted.len() {
        let value = sorted[i];
        let mut run = 1;
        while i + run < sorted.len() && sorted[i + run] == value {
            run += 1;
        }

        if run > best_count {
            best_count = run;
            best_value = value;
        }
        i += run;
    }

    best_value
}

/// Population skewness and excess kurtosis
fn moments(amounts: &[f64], mean: f64) -> (f64, f64) {
    if amounts.len() < MIN_MOMENT_SAMPLES {
        return (0.0, 0.0);
    }

    let n = amounts.len() as f64;
    let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
    for x in amounts {
        let d = x - mean;
        let d2 = d * d;
        m2 += d2;
        m3 += d2 * d;
        m4 += d2 * d2;
    }
    m2 /= n;
    m3 /= n;
    m4 /= n;

    if m2 == 0.0 {
        return (0.0, 0.0);
    }

    (m3 / m2.powf(1.5), m4 / (m2 * m2) - 3.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_empty_is_all_zero() {
        assert_eq!(compute(&[]), Statistics::default());
    }

    #[test]
    fn test_basic_statistics() {
        let stats = compute(&[5.0, 1.0, 4.0, 2.0, 3.0]);

        assert_eq!(stats.count, 5);
        assert!(approx(stats.sum, 15.0));
        assert!(approx(stats.mean, 3.0));
        assert!(approx(stats.median, 3.0));
        assert!(approx(stats.std_dev, 2.5f64.sqrt()));
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 5.0);
        assert!(approx(stats.percentile_25, 2.0));
        assert!(approx(stats.percentile_75, 4.0));
        assert!(approx(stats.skewness, 0.0));
        assert!(approx(stats.kurtosis, -1.3));
    }

    #[test]
    fn test_single_value() {
        let stats = compute(&[42.0]);
        assert_eq!(stats.mean, 42.0);
        assert_eq!(stats.median, 42.0);
        assert_eq!(stats.mode, 42.0);
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.percentile_25, 42.0);
        assert_eq!(stats.percentile_75, 42.0);
    }

    #[test]
    fn test_even_count_median_interpolates() {
        let stats = compute(&[10.0, 20.0, 30.0, 40.0]);
        assert!(approx(stats.median, 25.0));
        assert!(approx(stats.percentile_25, 17.5));
        assert!(approx(stats.percentile_75, 32.5));
    }

    #[test]
    fn test_mode_tie_picks_smallest() {
        assert_eq!(compute(&[10.0, 10.0, 20.0, 20.0]).mode, 10.0);
        assert_eq!(compute(&[20.0, 20.0, 10.0, 10.0]).mode, 10.0);
        // All unique: every value ties at one
        assert_eq!(compute(&[7.0, 3.0, 9.0]).mode, 3.0);
    }

    #[test]
    fn test_mode_most_frequent() {
        assert_eq!(compute(&[1.0, 5.0, 5.0, 5.0, 2.0, 2.0]).mode, 5.0);
    }

    #[test]
    fn test_moments_need_three_points() {
        let stats = compute(&[1.0, 100.0]);
        assert_eq!(stats.skewness, 0.0);
        assert_eq!(stats.kurtosis, 0.0);
    }

    #[test]
    fn test_moments_of_constant_series() {
        let stats = compute(&[50.0, 50.0, 50.0, 50.0]);
        assert_eq!(stats.skewness, 0.0);
        assert_eq!(stats.kurtosis, 0.0);
        assert_eq!(stats.std_dev, 0.0);
    }

    #[test]
    fn test_right_skew_is_positive() {
        let stats = compute(&[1.0, 2.0, 10.0]);
        assert!((stats.skewness - 0.6746).abs() < 1e-3);
    }

    #[test]
    fn test_constant_series_with_inexact_sums() {
        for value in [0.1, 0.7, 19.99, 33.33] {
            for n in 2..=12 {
                let amounts = vec![value; n];
                let stats = compute(&amounts);

                assert_eq!(stats.mean, value, "mean of {} x {}", n, value);
                assert_eq!(stats.median, value);
                assert_eq!(stats.std_dev, 0.0);
                assert_eq!(stats.skewness, 0.0);
                assert_eq!(stats.kurtosis, 0.0);
            }
        }
    }

    #[test]
    fn test_bounded_mean() {
        assert_eq!(bounded_mean([0.1, 0.1, 0.1]), 0.1);
        assert_eq!(bounded_mean(vec![33.33; 6]), 33.33);
        assert!((bounded_mean([1.0, 2.0, 6.0]) - 3.0).abs() < 1e-12);
        assert_eq!(bounded_mean(std::iter::empty::<f64>()), 0.0);
    }

    #[test]
    fn test_bounds_hold() {
        let samples: [&[f64]; 6] = [
            &[45.5, 12.99, 89.99, 150.0, 32.5, 25.0, 75.0, 60.0],
            &[0.01],
            &[-3.0, 8.0, 8.0, -1.5],
            &[1e6, 1.0, 2.0],
            &[0.1, 0.1, 0.1],
            &[33.33, 33.33, 33.33, 33.33, 33.33, 33.33],
        ];

        for amounts in samples {
            let stats = compute(amounts);
            assert!(stats.min <= stats.mean && stats.mean <= stats.max);
            assert!(stats.min <= stats.median && stats.median <= stats.max);
            assert!(stats.percentile_25 <= stats.median);
            assert!(stats.median <= stats.percentile_75);
        }
    }

    #[test]
    fn test_percentile_edges() {
        let sorted = [1.0, 2.0, 3.0];
        assert_eq!(percentile(&sorted, 0.0), 1.0);
        assert_eq!(percentile(&sorted, 100.0), 3.0);
        assert_eq!(percentile(&[], 50.0), 0.0);
    }

    #[test]
    fn test_cumulative_sum() {
        assert_eq!(cumulative_sum(&[1.0, 2.0, 3.5]), vec![1.0, 3.0, 6.5]);
        assert!(cumulative_sum(&[]).is_empty());
    }

    #[test]
    fn test_coefficient_of_variation() {
        let stats = compute(&[10.0, 10.0]);
        assert_eq!(stats.coefficient_of_variation(), 0.0);
        assert_eq!(Statistics::default().coefficient_of_variation(), 0.0);
    }
}
