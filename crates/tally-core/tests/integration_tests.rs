//! Integration tests for tally-core
//!
//! These tests exercise the full import → analyze → export workflow.

use tally_core::{
    export::{categories_to_csv, periods_to_csv, report_to_json},
    import::{parse_csv, parse_json},
    AnalyticsConfig, AnalyticsFacade, AnalyticsOptions, AnalyticsReport, Error, ForecastEngine,
    Granularity, InsightGenerator, InsightKind, StatisticsCalculator, TransactionFilter,
    TransactionKind, TransactionSeries, TrendAggregator, TrendLabel,
};

/// Three months of household transactions, newest first like the store
/// returns them, with an empty February.
fn household_csv() -> &'static str {
    r#"id,date,amount,category,description
10,2024-03-28,-89.99,shopping,Clothes
9,2024-03-15,-150.00,utilities,Electric bill
8,2024-03-10,-60.00,food,Groceries
7,2024-03-01,"2,500.00",salary,Monthly paycheck
6,2024-01-25,-32.50,food,Restaurant
5,2024-01-20,-25.00,entertainment,Movie tickets
4,2024-01-15,-75.00,food,Groceries
3,2024-01-10,-12.99,transportation,Gas
2,2024-01-05,-45.50,food,Grocery shopping
1,2024-01-01,"2,500.00",salary,Monthly paycheck"#
}

fn household() -> TransactionSeries {
    parse_csv(household_csv().as_bytes()).expect("Failed to parse CSV")
}

// =============================================================================
// Workflow Tests
// =============================================================================

#[test]
fn test_full_report_workflow() {
    let series = household();
    assert_eq!(series.len(), 10);

    let report = AnalyticsFacade::default()
        .compute(&series)
        .expect("Failed to compute report");

    // Summary cards
    assert_eq!(report.summary.total_income, 5000.0);
    assert!((report.summary.total_expenses - 490.98).abs() < 1e-9);
    assert!((report.summary.net_balance - 4509.02).abs() < 1e-9);
    assert_eq!(report.summary.expense_count, 8);

    // Statistics are over expense magnitudes
    assert_eq!(report.statistics.count, 8);
    assert_eq!(report.statistics.min, 12.99);
    assert_eq!(report.statistics.max, 150.0);

    // February has no records but still gets a bucket
    let keys: Vec<&str> = report
        .period_aggregates
        .iter()
        .map(|b| b.key.as_str())
        .collect();
    assert_eq!(keys, vec!["2024-01", "2024-02", "2024-03"]);
    assert_eq!(report.period_aggregates[1].transaction_count, 0);

    // Categories were title-cased on import
    assert_eq!(report.category_aggregates[0].key, "Food");
    assert!((report.category_aggregates[0].expense_total - 213.0).abs() < 1e-9);

    let forecast = report.forecast.as_ref().expect("forecast available");
    assert_eq!(forecast.sample_size, 8);
    assert!((0.0..=1.0).contains(&forecast.r_squared));
    assert!(forecast.prediction >= 0.0);

    assert!(!report.insights.is_empty());
    assert_eq!(report.insights[0].kind, InsightKind::SpendingLevel);
}

#[test]
fn test_report_survives_json_export() {
    let report = AnalyticsFacade::default().compute(&household()).unwrap();
    let json = report_to_json(&report).unwrap();
    let parsed: AnalyticsReport = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed.period_aggregates, report.period_aggregates);
    assert_eq!(parsed.insights, report.insights);
}

#[test]
fn test_csv_exports() {
    let report = AnalyticsFacade::new(AnalyticsOptions::default().with_top_n(Some(2)))
        .compute(&household())
        .unwrap();

    let periods = periods_to_csv(&report.period_aggregates).unwrap();
    assert_eq!(periods.lines().count(), 4);

    let categories = categories_to_csv(&report.category_aggregates).unwrap();
    let last = categories.lines().last().unwrap();
    assert!(last.starts_with("Other,"));
}

#[test]
fn test_json_import_matches_csv_import() {
    let json = serde_json::to_string(&household()).unwrap();
    let series = parse_json(json.as_bytes()).unwrap();
    assert_eq!(series, household());
}

#[test]
fn test_filtered_report() {
    let series = household();
    let january = TransactionFilter::new()
        .date_range(Some((
            chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            chrono::NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )))
        .kind(Some(TransactionKind::Expense))
        .apply(&series);

    let report = AnalyticsFacade::new(AnalyticsOptions::default().with_granularity(Granularity::Weekly))
        .compute(&january)
        .unwrap();

    assert_eq!(report.summary.total_income, 0.0);
    assert_eq!(report.statistics.count, 5);
    assert!(report.period_aggregates.iter().all(|b| b.key.starts_with("2024-W")));
}

#[test]
fn test_config_seeds_options() {
    let config = AnalyticsConfig::from_toml("[forecast]\ndays_ahead = 7\n").unwrap();
    let report = AnalyticsFacade::new(config.options())
        .compute(&household())
        .unwrap();
    assert_eq!(report.forecast.unwrap().days_ahead, 7);
}

// =============================================================================
// Component Property Tests
// =============================================================================

#[test]
fn test_statistics_bounds() {
    let calculator = StatisticsCalculator::new();
    for amounts in [
        vec![45.5, 12.99, 89.99, 150.0],
        vec![3.0],
        vec![1.0, 1.0, 1.0, 1000.0],
    ] {
        let stats = calculator.compute(&amounts);
        assert!(stats.min <= stats.mean && stats.mean <= stats.max);
        assert!(stats.min <= stats.median && stats.median <= stats.max);
    }

    assert_eq!(calculator.compute(&[10.0, 10.0, 20.0, 20.0]).mode, 10.0);
}

#[test]
fn test_top_n_fold_back() {
    let csv = "date,amount,category\n\
               2024-01-01,-100,Food\n\
               2024-01-02,-300,Rent\n\
               2024-01-03,-50,Transport\n\
               2024-01-04,-20,Shopping\n";
    let series = parse_csv(csv.as_bytes()).unwrap();

    let buckets = TrendAggregator::new().by_category(&series, Some(2));
    let pairs: Vec<(&str, f64)> = buckets
        .iter()
        .map(|b| (b.key.as_str(), b.expense_total))
        .collect();
    assert_eq!(pairs, vec![("Rent", 300.0), ("Food", 100.0), ("Other", 70.0)]);
}

#[test]
fn test_forecast_properties() {
    let csv = "date,amount,category\n\
               2024-01-01,-10,Food\n\
               2024-01-02,-20,Food\n\
               2024-01-03,-30,Food\n\
               2024-01-04,-40,Food\n\
               2024-01-05,-50,Food\n";
    let series = parse_csv(csv.as_bytes()).unwrap();
    let result = ForecastEngine::new().forecast(&series, 1).unwrap();
    assert!((result.daily_rate - 10.0).abs() < 1e-9);
    assert!((result.intercept - 10.0).abs() < 1e-9);
    assert!((result.prediction - 60.0).abs() < 1e-9);

    let constant = "date,amount,category\n\
                    2024-01-01,-50,Food\n\
                    2024-01-02,-50,Food\n\
                    2024-01-03,-50,Food\n\
                    2024-01-04,-50,Food\n\
                    2024-01-05,-50,Food\n";
    let series = parse_csv(constant.as_bytes()).unwrap();
    let result = ForecastEngine::new().forecast(&series, 30).unwrap();
    assert_eq!(result.daily_rate, 0.0);
    assert_eq!(result.trend_label, TrendLabel::Flat);
    assert_eq!(result.prediction, 50.0);

    let single = parse_csv("date,amount\n2024-01-01,-5\n".as_bytes()).unwrap();
    assert!(matches!(
        ForecastEngine::new().forecast(&single, 30),
        Err(Error::InsufficientData { required: 2, found: 1 })
    ));
}

#[test]
fn test_insights_are_deterministic() {
    let report = AnalyticsFacade::default().compute(&household()).unwrap();
    let generator = InsightGenerator::new();

    let first = generator.generate(&report.statistics, report.forecast.as_ref());
    let second = generator.generate(&report.statistics, report.forecast.as_ref());
    assert_eq!(first, second);
    assert_eq!(first, report.insight_messages());
}
