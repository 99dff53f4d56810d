//! Forecasting strategies for per-product daily demand
//!
//! Each strategy is a model that is trained on a feature table and then
//! produces a run of daily values. The predictor turns those values into
//! labelled `DailyForecastPoint`s.

use crate::data::Product;
use crate::error::{ForecastError, Result};
use crate::features::FeatureRow;
use crate::utils::future_dates;
use chrono::NaiveDate;
use sales_math::round_to;
use serde::{Serialize, Serializer};
use std::fmt;

pub mod average;
pub mod regression;

/// Qualitative confidence of a forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        };
        f.write_str(label)
    }
}

/// Why the engine produced a flat low-confidence forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FallbackReason {
    /// The catalogue is empty
    NoProducts,
    /// No sales have been recorded at all
    NoSalesData,
    /// Sales exist, but none for the requested product
    NoProductSales,
    /// The feature table came out empty
    FeaturePrepFailed,
    /// Recovery could not resolve the product
    ProductNotFound,
    /// Recovery found no recent sales for the product
    NoSalesHistory,
    /// Recovery itself hit malformed data
    Error,
}

impl FallbackReason {
    /// Tag appended to `fallback_` in the method name
    pub fn as_str(&self) -> &'static str {
        match self {
            FallbackReason::NoProducts => "no_products",
            FallbackReason::NoSalesData => "no_sales_data",
            FallbackReason::NoProductSales => "no_product_sales",
            FallbackReason::FeaturePrepFailed => "feature_prep_failed",
            FallbackReason::ProductNotFound => "produk_tidak_ditemukan",
            FallbackReason::NoSalesHistory => "tidak_ada_data_penjualan",
            FallbackReason::Error => "error",
        }
    }
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FallbackReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Strategy that produced a forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    LinearRegression,
    SimpleAverage,
    MovingAverage,
    Fallback(FallbackReason),
}

impl Method {
    /// Whether this is one of the flat fallback forecasts
    pub fn is_fallback(&self) -> bool {
        matches!(self, Method::Fallback(_))
    }

    /// Human-readable label for chart annotations
    pub fn label(&self) -> &'static str {
        match self {
            Method::LinearRegression => "Linear Regression",
            Method::SimpleAverage => "Simple Average",
            Method::MovingAverage => "Moving Average",
            Method::Fallback(_) => "Estimate",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::LinearRegression => f.write_str("regresi_linear"),
            Method::SimpleAverage => f.write_str("rata_rata_sederhana"),
            Method::MovingAverage => f.write_str("rata_rata_bergerak"),
            Method::Fallback(reason) => write!(f, "fallback_{}", reason),
        }
    }
}

impl Serialize for Method {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Predicted demand for one future day
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyForecastPoint {
    pub date: NaiveDate,
    /// Non-negative, rounded to 2 decimals
    pub predicted_quantity: f64,
    pub confidence: Confidence,
    pub method: Method,
    pub product_id: u32,
    pub product_name: String,
    pub variant: Option<String>,
}

/// Forecast values for consecutive days
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastResult {
    /// Forecasted values, one per day
    values: Vec<f64>,
    /// Day before the first forecasted day
    anchor: NaiveDate,
}

impl ForecastResult {
    /// Create a forecast running for `values.len()` days after `anchor`
    pub fn new(values: Vec<f64>, anchor: NaiveDate) -> Result<Self> {
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(ForecastError::ValidationError(format!(
                "Forecast contains non-finite value {}",
                bad
            )));
        }

        Ok(Self { values, anchor })
    }

    /// Same value for every day of the horizon
    pub fn flat(value: f64, horizon: usize, anchor: NaiveDate) -> Result<Self> {
        Self::new(vec![value; horizon], anchor)
    }

    /// Get the forecasted values
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of days forecasted
    pub fn horizon(&self) -> usize {
        self.values.len()
    }

    /// Day before the first forecasted day
    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    /// Label the values as daily points for `product`
    ///
    /// Values are clamped at zero and rounded to 2 decimals.
    pub fn into_points(
        self,
        product: &Product,
        method: Method,
        confidence: Confidence,
    ) -> Vec<DailyForecastPoint> {
        future_dates(self.anchor, self.values.len())
            .into_iter()
            .zip(self.values)
            .map(|(date, value)| DailyForecastPoint {
                date,
                predicted_quantity: non_negative(round_to(value, 2)),
                confidence,
                method,
                product_id: product.id,
                product_name: product.name.clone(),
                variant: product.variant.clone(),
            })
            .collect()
    }
}

/// Clamp to zero, normalizing negative zero
pub(crate) fn non_negative(value: f64) -> f64 {
    if value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Trained demand model
pub trait TrainedDemandModel: fmt::Debug {
    /// Generate forecast for future days
    fn forecast(&self, horizon: usize) -> Result<ForecastResult>;

    /// Method tag attached to the points
    fn method(&self) -> Method;

    /// Confidence attached to the points
    fn confidence(&self) -> Confidence;
}

/// Demand model that can be trained on a feature table
pub trait DemandModel: fmt::Debug + Clone {
    /// The type of trained model produced
    type Trained: TrainedDemandModel;

    /// Train the model on a product's feature table
    fn train(&self, rows: &[FeatureRow]) -> Result<Self::Trained>;

    /// Get the name of the model
    fn name(&self) -> &str;
}

/// Train `model` on `rows`, forecast `horizon` days and label the result
pub fn run_model<M: DemandModel>(
    model: &M,
    rows: &[FeatureRow],
    horizon: usize,
    product: &Product,
) -> Result<Vec<DailyForecastPoint>> {
    let trained = model.train(rows)?;
    let forecast = trained.forecast(horizon)?;
    Ok(forecast.into_points(product, trained.method(), trained.confidence()))
}
