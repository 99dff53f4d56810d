//! Average-based demand models
//!
//! Both models forecast a constant. `SimpleAverage` repeats the mean of the
//! whole history from a caller-chosen anchor date, `MovingAverage` repeats the
//! mean of the latest observations starting after the last sale.

use crate::error::{ForecastError, Result};
use crate::features::FeatureRow;
use crate::models::{Confidence, DemandModel, ForecastResult, Method, TrainedDemandModel};
use chrono::NaiveDate;
use sales_math::{mean, tail_mean};

/// Historical mean repeated over the horizon
#[derive(Debug, Clone)]
pub struct SimpleAverage {
    /// Name of the model
    name: String,
    /// Day before the first forecasted day
    anchor: NaiveDate,
    /// Lower bound applied to the mean
    floor: Option<f64>,
    /// Value used when there is no history at all
    default_value: Option<f64>,
    confidence: Confidence,
}

/// Trained simple average
#[derive(Debug, Clone)]
pub struct TrainedSimpleAverage {
    value: f64,
    anchor: NaiveDate,
    confidence: Confidence,
}

impl SimpleAverage {
    /// Create a simple average forecasting the days after `anchor`
    pub fn new(anchor: NaiveDate) -> Self {
        Self {
            name: "Simple Average".to_string(),
            anchor,
            floor: None,
            default_value: None,
            confidence: Confidence::Medium,
        }
    }

    /// Never forecast less than `floor`
    pub fn with_floor(mut self, floor: f64) -> Self {
        self.floor = Some(floor);
        self
    }

    /// Forecast `value` when trained on an empty table
    pub fn with_default(mut self, value: f64) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Override the confidence label
    pub fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = confidence;
        self
    }
}

impl DemandModel for SimpleAverage {
    type Trained = TrainedSimpleAverage;

    fn train(&self, rows: &[FeatureRow]) -> Result<Self::Trained> {
        let quantities: Vec<f64> = rows.iter().map(|r| r.quantity).collect();

        let mut value = match (quantities.is_empty(), self.default_value) {
            (true, Some(default)) => default,
            _ => mean(&quantities)?,
        };
        if let Some(floor) = self.floor {
            value = value.max(floor);
        }

        Ok(TrainedSimpleAverage {
            value,
            anchor: self.anchor,
            confidence: self.confidence,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedDemandModel for TrainedSimpleAverage {
    fn forecast(&self, horizon: usize) -> Result<ForecastResult> {
        ForecastResult::flat(self.value, horizon, self.anchor)
    }

    fn method(&self) -> Method {
        Method::SimpleAverage
    }

    fn confidence(&self) -> Confidence {
        self.confidence
    }
}

/// Mean of the most recent observations repeated after the last sale
#[derive(Debug, Clone)]
pub struct MovingAverage {
    /// Name of the model
    name: String,
    /// Window size
    window: usize,
}

/// Trained moving average
#[derive(Debug, Clone)]
pub struct TrainedMovingAverage {
    value: f64,
    last_date: NaiveDate,
}

impl MovingAverage {
    /// Create a new moving average model
    pub fn new(window: usize) -> Result<Self> {
        if window == 0 {
            return Err(ForecastError::InvalidParameter(
                "Window size must be positive".to_string(),
            ));
        }

        Ok(Self {
            name: format!("Moving Average (window={})", window),
            window,
        })
    }
}

impl DemandModel for MovingAverage {
    type Trained = TrainedMovingAverage;

    fn train(&self, rows: &[FeatureRow]) -> Result<Self::Trained> {
        let last_date = rows.last().map(|r| r.date).ok_or_else(|| {
            ForecastError::DataError("Empty feature table for moving average".to_string())
        })?;

        let quantities: Vec<f64> = rows.iter().map(|r| r.quantity).collect();
        let value = tail_mean(&quantities, self.window)?;

        Ok(TrainedMovingAverage { value, last_date })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TrainedDemandModel for TrainedMovingAverage {
    fn forecast(&self, horizon: usize) -> Result<ForecastResult> {
        ForecastResult::flat(self.value, horizon, self.last_date)
    }

    fn method(&self) -> Method {
        Method::MovingAverage
    }

    fn confidence(&self) -> Confidence {
        Confidence::Medium
    }
}
