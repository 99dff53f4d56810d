//! Linear regression on calendar and lag features
//!
//! The scaler and the least-squares fit live inside the trained model, which
//! is built and dropped within a single forecast call.

use crate::error::{ForecastError, Result};
use crate::features::{regressors_for, FeatureRow};
use crate::models::{Confidence, DemandModel, ForecastResult, Method, TrainedDemandModel};
use crate::utils::future_dates;
use chrono::NaiveDate;
use sales_math::{LinearRegression, StandardScaler};

/// Regression of quantity on day of week, day of month, month, weekend flag and lag
#[derive(Debug, Clone)]
pub struct CalendarRegression {
    /// Name of the model
    name: String,
    /// Rows required before fitting
    min_rows: usize,
}

/// Fitted calendar regression
#[derive(Debug, Clone)]
pub struct TrainedCalendarRegression {
    scaler: StandardScaler,
    model: LinearRegression,
    last_date: NaiveDate,
    last_quantity: f64,
}

impl CalendarRegression {
    /// Create a regression that refuses to fit fewer than `min_rows` rows
    pub fn new(min_rows: usize) -> Result<Self> {
        if min_rows < 2 {
            return Err(ForecastError::InvalidParameter(
                "Regression needs at least 2 rows".to_string(),
            ));
        }

        Ok(Self {
            name: "Linear Regression".to_string(),
            min_rows,
        })
    }
}

impl Default for CalendarRegression {
    fn default() -> Self {
        Self {
            name: "Linear Regression".to_string(),
            min_rows: 30,
        }
    }
}

impl DemandModel for CalendarRegression {
    type Trained = TrainedCalendarRegression;

    fn train(&self, rows: &[FeatureRow]) -> Result<Self::Trained> {
        if rows.len() < self.min_rows {
            return Err(ForecastError::ValidationError(format!(
                "Insufficient data for regression. Need at least {} rows, have {}.",
                self.min_rows,
                rows.len()
            )));
        }

        let x: Vec<Vec<f64>> = rows.iter().map(FeatureRow::regressors).collect();
        let y: Vec<f64> = rows.iter().map(|r| r.quantity).collect();

        let (scaler, x_scaled) = StandardScaler::fit_transform(&x)?;
        let model = LinearRegression::fit(&x_scaled, &y)?;

        // Rows are date-sorted, so the last one is the latest sale
        let last = &rows[rows.len() - 1];
        Ok(TrainedCalendarRegression {
            scaler,
            model,
            last_date: last.date,
            last_quantity: last.quantity,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedDemandModel for TrainedCalendarRegression {
    fn forecast(&self, horizon: usize) -> Result<ForecastResult> {
        // Only the first future day sees a real lag; later days get 0
        let x_future: Vec<Vec<f64>> = future_dates(self.last_date, horizon)
            .into_iter()
            .enumerate()
            .map(|(i, date)| {
                let lag = if i == 0 { self.last_quantity } else { 0.0 };
                regressors_for(date, lag)
            })
            .collect();

        let x_scaled = self.scaler.transform(&x_future)?;
        let values = self.model.predict(&x_scaled)?;

        ForecastResult::new(values, self.last_date)
    }

    fn method(&self) -> Method {
        Method::LinearRegression
    }

    fn confidence(&self) -> Confidence {
        Confidence::High
    }
}
