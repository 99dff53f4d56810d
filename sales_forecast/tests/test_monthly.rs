mod common;

use approx::assert_relative_eq;
use common::date;
use pretty_assertions::assert_eq;
use rstest::rstest;
use sales_forecast::models::ForecastResult;
use sales_forecast::{aggregate_daily_to_monthly, Confidence, DailyForecastPoint, Method, Product};

fn points(values: Vec<f64>, anchor: chrono::NaiveDate) -> Vec<DailyForecastPoint> {
    ForecastResult::new(values, anchor)
        .unwrap()
        .into_points(&Product::unknown(1), Method::SimpleAverage, Confidence::Medium)
}

#[test]
fn test_empty_forecast_has_no_months() {
    assert_eq!(aggregate_daily_to_monthly(&[]), None);
}

#[test]
fn test_buckets_span_year_boundary() {
    // Dec 30, Dec 31, Jan 1, Jan 2
    let daily = points(vec![1.0, 2.0, 3.0, 4.0], date(2024, 12, 29));

    let monthly = aggregate_daily_to_monthly(&daily).unwrap();

    let keys: Vec<_> = monthly.iter().map(|m| m.year_month.as_str()).collect();
    assert_eq!(keys, vec!["2024-12", "2025-01"]);
    assert_relative_eq!(monthly[0].total_quantity, 3.0);
    assert_relative_eq!(monthly[0].average_daily_quantity, 1.5);
    assert_relative_eq!(monthly[1].total_quantity, 7.0);
    assert_eq!(monthly[1].days, 2);
}

#[test]
fn test_single_digit_months_are_zero_padded() {
    let daily = points(vec![2.0], date(2024, 2, 29));

    let monthly = aggregate_daily_to_monthly(&daily).unwrap();
    assert_eq!(monthly[0].year_month, "2024-03");
}

#[rstest]
#[case(1)]
#[case(30)]
#[case(95)]
fn test_totals_are_conserved(#[case] horizon: usize) {
    let values: Vec<f64> = (0..horizon).map(|i| 0.25 * (i % 9) as f64 + 1.0).collect();
    let daily = points(values, date(2024, 1, 20));

    let monthly = aggregate_daily_to_monthly(&daily).unwrap();

    let daily_total: f64 = daily.iter().map(|p| p.predicted_quantity).sum();
    let monthly_total: f64 = monthly.iter().map(|m| m.total_quantity).sum();
    assert_relative_eq!(daily_total, monthly_total, epsilon = 1e-9);

    let days: usize = monthly.iter().map(|m| m.days).sum();
    assert_eq!(days, horizon);
    assert!(monthly.windows(2).all(|w| w[0].year_month < w[1].year_month));
}
