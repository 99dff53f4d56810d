//! Aggregation of daily forecasts into calendar months

use crate::models::DailyForecastPoint;
use crate::utils::year_month_key;
use chrono::Datelike;
use serde::Serialize;
use std::collections::BTreeMap;

/// Forecast totals for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyForecast {
    /// `YYYY-MM`
    pub year_month: String,
    /// Sum of the month's daily predictions
    pub total_quantity: f64,
    /// Mean of the month's daily predictions
    pub average_daily_quantity: f64,
    /// Number of forecast days falling in the month
    pub days: usize,
}

/// Bucket daily points by month, ascending
///
/// Returns `None` for an empty input so callers can tell "no forecast" apart
/// from a forecast that happens to cover no months.
pub fn aggregate_daily_to_monthly(points: &[DailyForecastPoint]) -> Option<Vec<MonthlyForecast>> {
    if points.is_empty() {
        return None;
    }

    let mut buckets: BTreeMap<(i32, u32), (f64, usize, String)> = BTreeMap::new();
    for point in points {
        let entry = buckets
            .entry((point.date.year(), point.date.month()))
            .or_insert_with(|| (0.0, 0, year_month_key(point.date)));
        entry.0 += point.predicted_quantity;
        entry.1 += 1;
    }

    Some(
        buckets
            .into_values()
            .map(|(total, days, year_month)| MonthlyForecast {
                year_month,
                total_quantity: total,
                average_daily_quantity: total / days as f64,
                days,
            })
            .collect(),
    )
}
