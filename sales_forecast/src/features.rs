//! Feature table construction for per-product sales history

use crate::data::SaleRecord;
use crate::error::{ForecastError, Result};
use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// One historical sale with its calendar and lag features
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureRow {
    pub date: NaiveDate,
    pub quantity: f64,
    /// 0 = Monday ... 6 = Sunday
    pub day_of_week: u32,
    pub day_of_month: u32,
    pub month: u32,
    pub day_of_year: u32,
    pub is_weekend: bool,
    /// Quantity of the preceding row, 0 for the first row
    pub prev_quantity: f64,
}

impl FeatureRow {
    /// Regressor vector in model column order
    pub fn regressors(&self) -> Vec<f64> {
        regressors_for(self.date, self.prev_quantity)
    }
}

/// Regressors for a date and lag value: day of week, day of month, month, weekend flag, lag
pub fn regressors_for(date: NaiveDate, prev_quantity: f64) -> Vec<f64> {
    let day_of_week = date.weekday().num_days_from_monday();
    vec![
        day_of_week as f64,
        date.day() as f64,
        date.month() as f64,
        if day_of_week >= 5 { 1.0 } else { 0.0 },
        prev_quantity,
    ]
}

/// Sort sales by date and derive the feature table
///
/// Rows sharing a date keep their input order. A non-finite quantity is a
/// malformed row and fails the whole build.
pub fn build_features(sales: &[SaleRecord]) -> Result<Vec<FeatureRow>> {
    if let Some(bad) = sales.iter().find(|s| !s.quantity.is_finite()) {
        return Err(ForecastError::DataError(format!(
            "Sale {} on {} has non-finite quantity {}",
            bad.id, bad.date, bad.quantity
        )));
    }

    let mut sorted: Vec<&SaleRecord> = sales.iter().collect();
    sorted.sort_by_key(|s| s.date);

    let mut rows = Vec::with_capacity(sorted.len());
    let mut prev_quantity = 0.0;
    for sale in sorted {
        let day_of_week = sale.date.weekday().num_days_from_monday();
        rows.push(FeatureRow {
            date: sale.date,
            quantity: sale.quantity,
            day_of_week,
            day_of_month: sale.date.day(),
            month: sale.date.month(),
            day_of_year: sale.date.ordinal(),
            is_weekend: day_of_week >= 5,
            prev_quantity,
        });
        prev_quantity = sale.quantity;
    }

    Ok(rows)
}
