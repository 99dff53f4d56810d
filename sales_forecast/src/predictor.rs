//! Forecast strategy selection
//!
//! `SalesPredictor::predict_sales` walks a fixed decision tree: missing data
//! leads to a flat fallback, short histories to a simple average, and 30 or
//! more feature rows to the calendar regression. Any error on that path is
//! logged and answered by an independent recovery path that refetches a
//! 90-day history.

use crate::config::ForecastConfig;
use crate::data::{Product, ProductId, SaleRecord, SalesRepository};
use crate::error::{ForecastError, Result};
use crate::features::{build_features, FeatureRow};
use crate::models::average::{MovingAverage, SimpleAverage};
use crate::models::regression::CalendarRegression;
use crate::models::{
    run_model, Confidence, DailyForecastPoint, DemandModel, FallbackReason, ForecastResult,
    Method,
};
use crate::monthly::{aggregate_daily_to_monthly, MonthlyForecast};
use chrono::{Local, NaiveDate};
use sales_math::{mean, round_to};
use serde::Serialize;
use tracing::{debug, info, warn};

/// How a forecast was obtained
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ForecastOutcome {
    /// A model-based strategy ran on the product's history
    Modeled,
    /// Data was missing and a flat forecast was produced
    Fallback { reason: FallbackReason },
    /// The primary path failed and the recovery path answered
    Recovered { cause: String },
}

/// Result of one forecast call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesForecast {
    /// One point per day of the horizon
    pub daily: Vec<DailyForecastPoint>,
    /// The product forecast, or a placeholder when it could not be resolved
    pub product: Product,
    /// Monthly totals; `None` when the path that answered does not aggregate
    pub monthly: Option<Vec<MonthlyForecast>>,
    pub outcome: ForecastOutcome,
}

impl SalesForecast {
    /// Method of the first point, if any
    pub fn method(&self) -> Option<Method> {
        self.daily.first().map(|p| p.method)
    }

    /// Confidence of the first point, if any
    pub fn confidence(&self) -> Option<Confidence> {
        self.daily.first().map(|p| p.confidence)
    }

    /// Sum of the daily predictions
    pub fn total_quantity(&self) -> f64 {
        self.daily.iter().map(|p| p.predicted_quantity).sum()
    }
}

/// Per-product sales forecaster over a data-access implementation
#[derive(Debug, Clone)]
pub struct SalesPredictor<R> {
    repo: R,
    config: ForecastConfig,
    /// Fixed "today"; the local date when unset
    today: Option<NaiveDate>,
}

impl<R: SalesRepository> SalesPredictor<R> {
    /// Create a predictor with the default configuration
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            config: ForecastConfig::default(),
            today: None,
        }
    }

    /// Create a predictor with a validated configuration
    pub fn with_config(repo: R, config: ForecastConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            repo,
            config,
            today: None,
        })
    }

    /// Pin the date that fallback and simple-average forecasts start after
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    /// Date that wall-clock anchored forecasts start after
    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Get the data-access implementation
    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Get the configuration
    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Forecast daily sales of a product for the next `days_ahead` days
    ///
    /// Only data-access failures on the recovery path are returned as errors.
    pub fn predict_sales(&self, product_id: ProductId, days_ahead: usize) -> Result<SalesForecast> {
        match self.primary_forecast(product_id, days_ahead) {
            Ok(forecast) => Ok(forecast),
            Err(err) => {
                warn!(product_id, error = %err, "forecast failed, using recovery path");
                self.recover(product_id, days_ahead, err.to_string())
            }
        }
    }

    /// Forecast demand of a product; same strategies as `predict_sales`
    pub fn predict_demand(&self, product_id: ProductId, days_ahead: usize) -> Result<SalesForecast> {
        self.predict_sales(product_id, days_ahead)
    }

    /// Forecast with the configured default horizon
    pub fn predict_default(&self, product_id: ProductId) -> Result<SalesForecast> {
        self.predict_sales(product_id, self.config.default_horizon_days)
    }

    fn primary_forecast(&self, product_id: ProductId, days_ahead: usize) -> Result<SalesForecast> {
        let products = self.repo.products()?;
        if products.is_empty() {
            let product = Product::unknown(product_id);
            let daily = self.fallback_points(&product, days_ahead, FallbackReason::NoProducts)?;
            let monthly = aggregate_daily_to_monthly(&daily);
            return Ok(SalesForecast {
                daily,
                product,
                monthly,
                outcome: ForecastOutcome::Fallback {
                    reason: FallbackReason::NoProducts,
                },
            });
        }

        let product = products
            .into_iter()
            .find(|p| p.id == product_id)
            .ok_or(ForecastError::ProductNotFound(product_id))?;

        let sales = self.repo.sales_data()?;
        if sales.is_empty() {
            return self.fallback(product, days_ahead, FallbackReason::NoSalesData);
        }

        let product_sales: Vec<SaleRecord> = sales
            .into_iter()
            .filter(|detail| detail.sale.product_id == product_id)
            .map(|detail| detail.sale)
            .collect();
        if product_sales.is_empty() {
            return self.fallback(product, days_ahead, FallbackReason::NoProductSales);
        }

        let rows = build_features(&product_sales)?;
        if rows.is_empty() {
            return self.fallback(product, days_ahead, FallbackReason::FeaturePrepFailed);
        }

        let daily = if rows.len() < self.config.min_regression_rows {
            let model = SimpleAverage::new(self.today()).with_floor(1.0);
            debug!(product_id, rows = rows.len(), model = model.name(), "selected model");
            run_model(&model, &rows, days_ahead, &product)?
        } else {
            let model = CalendarRegression::new(self.config.min_regression_rows)?;
            debug!(product_id, rows = rows.len(), model = model.name(), "selected model");
            run_model(&model, &rows, days_ahead, &product)?
        };

        let monthly = aggregate_daily_to_monthly(&daily);
        Ok(SalesForecast {
            daily,
            product,
            monthly,
            outcome: ForecastOutcome::Modeled,
        })
    }

    fn recover(
        &self,
        product_id: ProductId,
        days_ahead: usize,
        cause: String,
    ) -> Result<SalesForecast> {
        let recovered = |daily: Vec<DailyForecastPoint>, product: Product| SalesForecast {
            daily,
            product,
            monthly: None,
            outcome: ForecastOutcome::Recovered {
                cause: cause.clone(),
            },
        };

        let product = match self.repo.product_by_id(product_id)? {
            Some(product) => product,
            None => {
                let product = Product::unknown(product_id);
                let daily =
                    self.fallback_points(&product, days_ahead, FallbackReason::ProductNotFound)?;
                return Ok(recovered(daily, product));
            }
        };

        let history = self
            .repo
            .sales_history(Some(product_id), Some(self.config.recovery_history_days))?;
        if history.is_empty() {
            let daily = self.fallback_points(&product, days_ahead, FallbackReason::NoSalesHistory)?;
            return Ok(recovered(daily, product));
        }

        let daily = match build_features(&history)
            .and_then(|rows| self.recovery_model(&rows, days_ahead, &product))
        {
            Ok(daily) => daily,
            Err(err) => {
                warn!(product_id, error = %err, "recovery path failed, using fallback");
                self.fallback_points(&product, days_ahead, FallbackReason::Error)?
            }
        };

        Ok(recovered(daily, product))
    }

    fn recovery_model(
        &self,
        rows: &[FeatureRow],
        days_ahead: usize,
        product: &Product,
    ) -> Result<Vec<DailyForecastPoint>> {
        if rows.len() < self.config.recovery_min_rows {
            let model = SimpleAverage::new(self.today())
                .with_default(1.0)
                .with_confidence(Confidence::Low);
            run_model(&model, rows, days_ahead, product)
        } else {
            let model = MovingAverage::new(self.config.moving_average_window)?;
            run_model(&model, rows, days_ahead, product)
        }
    }

    fn fallback(
        &self,
        product: Product,
        days_ahead: usize,
        reason: FallbackReason,
    ) -> Result<SalesForecast> {
        let daily = self.fallback_points(&product, days_ahead, reason)?;
        Ok(SalesForecast {
            daily,
            product,
            monthly: None,
            outcome: ForecastOutcome::Fallback { reason },
        })
    }

    /// Flat low-confidence forecast from today, at the recent mean or 1
    fn fallback_points(
        &self,
        product: &Product,
        days_ahead: usize,
        reason: FallbackReason,
    ) -> Result<Vec<DailyForecastPoint>> {
        info!(product_id = product.id, reason = %reason, "using fallback forecast");

        let recent: Vec<f64> = self
            .repo
            .sales_history(Some(product.id), Some(self.config.fallback_lookback_days))?
            .into_iter()
            .map(|sale| sale.quantity)
            .filter(|q| q.is_finite())
            .collect();

        let default_quantity = mean(&recent)
            .ok()
            .filter(|m| *m != 0.0)
            .unwrap_or(1.0);

        let forecast =
            ForecastResult::flat(round_to(default_quantity, 2), days_ahead, self.today())?;
        Ok(forecast.into_points(product, Method::Fallback(reason), Confidence::Low))
    }
}
