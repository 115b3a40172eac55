//! Report command implementations

use std::path::Path;

use anyhow::Result;
use chrono::NaiveDate;
use tally_core::models::{AggregateBucket, Granularity, Summary};
use tally_core::{
    AnalyticsFacade, AnalyticsOptions, AnalyticsReport, Error, ForecastEngine, ForecastResult,
    Insight, Severity, Statistics, StatisticsCalculator, TransactionFilter, TrendAggregator,
};

use super::{load_series, truncate};

pub fn cmd_report(
    file: &Path,
    options: AnalyticsOptions,
    range: Option<(NaiveDate, NaiveDate)>,
    category: Option<&str>,
    json: bool,
) -> Result<()> {
    let series = load_series(file)?;
    let filter = TransactionFilter::new().date_range(range).category(category);
    let series = if filter.is_empty() {
        series
    } else {
        filter.apply(&series)
    };

    let report = AnalyticsFacade::new(options).compute(&series)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(&report);
    Ok(())
}

pub fn cmd_stats(file: &Path) -> Result<()> {
    let series = load_series(file)?;
    let stats = StatisticsCalculator::new().compute(&series.expense_magnitudes());

    println!();
    println!("📊 Expense Statistics");
    println!("   ─────────────────────────────────────────────────────────────");
    print_statistics(&stats);
    Ok(())
}

pub fn cmd_trends(file: &Path, granularity: Granularity) -> Result<()> {
    let series = load_series(file)?;
    let buckets = TrendAggregator::new().by_period(&series, granularity);

    println!();
    println!("📈 Trends ({})", granularity.as_str());
    println!("   ─────────────────────────────────────────────────────────────");
    print_periods(&buckets);
    Ok(())
}

pub fn cmd_categories(file: &Path, top_n: Option<usize>) -> Result<()> {
    let series = load_series(file)?;
    let buckets = TrendAggregator::new().by_category(&series, top_n);

    println!();
    println!("🏷️  Spending by Category");
    println!("   ─────────────────────────────────────────────────────────────");
    print_categories(&buckets);
    Ok(())
}

pub fn cmd_forecast(file: &Path, days_ahead: u32) -> Result<()> {
    let series = load_series(file)?;

    println!();
    println!("🔮 {}-Day Spending Forecast", days_ahead);
    println!("   ─────────────────────────────────────────────────────────────");

    match ForecastEngine::new().forecast(&series, days_ahead) {
        Ok(forecast) => print_forecast(&forecast),
        Err(Error::InsufficientData { required, found }) => {
            println!(
                "   Not enough data: need at least {} expenses, found {}.",
                required, found
            );
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

fn print_report(report: &AnalyticsReport) {
    println!();
    println!("💰 Summary");
    println!("   ─────────────────────────────────────────────────────────────");
    print_summary(&report.summary);

    println!();
    println!("📊 Expense Statistics");
    println!("   ─────────────────────────────────────────────────────────────");
    print_statistics(&report.statistics);

    println!();
    println!("📈 Trends ({})", report.options.granularity.as_str());
    println!("   ─────────────────────────────────────────────────────────────");
    print_periods(&report.period_aggregates);

    println!();
    println!("🏷️  Spending by Category");
    println!("   ─────────────────────────────────────────────────────────────");
    print_categories(&report.category_aggregates);

    println!();
    println!("🔮 {}-Day Spending Forecast", report.options.days_ahead);
    println!("   ─────────────────────────────────────────────────────────────");
    match (&report.forecast, &report.forecast_unavailable) {
        (Some(forecast), _) => print_forecast(forecast),
        (None, Some(reason)) => println!("   {}", reason),
        (None, None) => println!("   Forecast unavailable."),
    }

    println!();
    println!("💡 Insights");
    println!("   ─────────────────────────────────────────────────────────────");
    for insight in &report.insights {
        println!("   {} {}", severity_icon(insight), insight.message);
    }
}

fn print_summary(summary: &Summary) {
    println!(
        "   Income:   ${:>12.2}  ({} transactions)",
        summary.total_income, summary.income_count
    );
    println!(
        "   Expenses: ${:>12.2}  ({} transactions)",
        summary.total_expenses, summary.expense_count
    );
    println!("   Net:      ${:>12.2}", summary.net_balance);
}

fn print_statistics(stats: &Statistics) {
    if stats.count == 0 {
        println!("   No expenses found.");
        return;
    }

    println!("   {:16} {:>10}", "Count", stats.count);
    println!("   {:16} {:>10.2}", "Total", stats.sum);
    println!("   {:16} {:>10.2}", "Mean", stats.mean);
    println!("   {:16} {:>10.2}", "Median", stats.median);
    println!("   {:16} {:>10.2}", "Mode", stats.mode);
    println!("   {:16} {:>10.2}", "Std deviation", stats.std_dev);
    println!("   {:16} {:>10.2}", "Min", stats.min);
    println!("   {:16} {:>10.2}", "25th percentile", stats.percentile_25);
    println!("   {:16} {:>10.2}", "75th percentile", stats.percentile_75);
    println!("   {:16} {:>10.2}", "Max", stats.max);
    println!("   {:16} {:>10.3}", "Skewness", stats.skewness);
    println!("   {:16} {:>10.3}", "Kurtosis", stats.kurtosis);
}

fn print_periods(buckets: &[AggregateBucket]) {
    if buckets.is_empty() {
        println!("   No transactions found.");
        return;
    }

    println!(
        "   {:10} │ {:>10} │ {:>10} │ {:>10} │ {:>5}",
        "Period", "Income", "Expenses", "Net", "Count"
    );
    println!("   ───────────┼────────────┼────────────┼────────────┼───────");

    for bucket in buckets {
        println!(
            "   {:10} │ {:>10.2} │ {:>10.2} │ {:>10.2} │ {:>5}",
            bucket.key,
            bucket.income_total,
            bucket.expense_total,
            bucket.net(),
            bucket.transaction_count
        );
    }
}

fn print_categories(buckets: &[AggregateBucket]) {
    if buckets.is_empty() {
        println!("   No expenses found.");
        return;
    }

    let total: f64 = buckets.iter().map(|b| b.expense_total).sum();

    println!(
        "   {:25} │ {:>10} │ {:>6} │ {:>5}",
        "Category", "Amount", "%", "Count"
    );
    println!("   ──────────────────────────┼────────────┼────────┼───────");

    for bucket in buckets {
        let percentage = if total > 0.0 {
            bucket.expense_total / total * 100.0
        } else {
            0.0
        };
        println!(
            "   {:25} │ {:>10.2} │ {:>5.1}% │ {:>5}",
            truncate(&bucket.key, 25),
            bucket.expense_total,
            percentage,
            bucket.transaction_count
        );
    }

    println!("   ──────────────────────────┼────────────┼────────┼───────");
    println!("   {:25} │ {:>10.2} │", "Total", total);
}

fn print_forecast(forecast: &ForecastResult) {
    println!(
        "   Predicted spend:  ${:.2} over the next {} days",
        forecast.prediction, forecast.days_ahead
    );
    println!(
        "   Daily rate:       ${:.2}/day ({})",
        forecast.daily_rate, forecast.trend_label
    );
    println!(
        "   Confidence:       {} (R² = {:.3}, {} expenses)",
        forecast.confidence, forecast.r_squared, forecast.sample_size
    );
}

fn severity_icon(insight: &Insight) -> &'static str {
    match insight.severity {
        Severity::Info => "•",
        Severity::Attention => "⚠️ ",
        Severity::Warning => "🚨",
    }
}
