//! Forecast engine configuration
//!
//! Every knob has a default matching the engine's documented behaviour, so an
//! empty configuration source yields a working engine.

use crate::error::{ForecastError, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Tunables for the forecasting engine and restock recommender
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Horizon used when the caller does not pass one
    pub default_horizon_days: usize,
    /// Feature rows needed before the regression strategy is used
    pub min_regression_rows: usize,
    /// Lookback window averaged by the fallback generator
    pub fallback_lookback_days: u32,
    /// History window refetched by the recovery path
    pub recovery_history_days: u32,
    /// Rows needed by the recovery path before it switches to a moving average
    pub recovery_min_rows: usize,
    /// Window of the recovery-path moving average
    pub moving_average_window: usize,
    /// Horizon of the demand forecast behind restock recommendations
    pub restock_horizon_days: usize,
    /// Safety stock as a share of predicted demand
    pub safety_stock_ratio: f64,
    /// Average daily demand at or above which urgency is High
    pub high_urgency_daily: f64,
    /// Average daily demand at or above which urgency is Medium
    pub medium_urgency_daily: f64,
    /// History window shown next to a forecast in chart data
    pub chart_history_days: u32,
    /// Number of products listed in sales trends
    pub top_products: usize,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            default_horizon_days: 30,
            min_regression_rows: 30,
            fallback_lookback_days: 30,
            recovery_history_days: 90,
            recovery_min_rows: 7,
            moving_average_window: 7,
            restock_horizon_days: 30,
            safety_stock_ratio: 0.2,
            high_urgency_daily: 10.0,
            medium_urgency_daily: 5.0,
            chart_history_days: 90,
            top_products: 5,
        }
    }
}

impl ForecastConfig {
    /// Validate that the configuration describes a usable engine
    pub fn validate(&self) -> Result<()> {
        if self.default_horizon_days == 0 || self.restock_horizon_days == 0 {
            return Err(ForecastError::InvalidParameter(
                "Forecast horizons must be positive".to_string(),
            ));
        }

        if self.min_regression_rows < 2 {
            return Err(ForecastError::InvalidParameter(
                "Regression needs at least 2 rows".to_string(),
            ));
        }

        if self.moving_average_window == 0 || self.recovery_min_rows == 0 {
            return Err(ForecastError::InvalidParameter(
                "Moving average window and recovery row count must be positive".to_string(),
            ));
        }

        if !(self.safety_stock_ratio >= 0.0 && self.safety_stock_ratio.is_finite()) {
            return Err(ForecastError::InvalidParameter(format!(
                "Safety stock ratio must be non-negative, got {}",
                self.safety_stock_ratio
            )));
        }

        if self.medium_urgency_daily >= self.high_urgency_daily {
            return Err(ForecastError::InvalidParameter(format!(
                "Medium urgency threshold ({}) must be below high ({})",
                self.medium_urgency_daily, self.high_urgency_daily
            )));
        }

        Ok(())
    }
}

/// Application configuration for the reporting binary
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub forecast: ForecastConfig,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

impl AppConfig {
    /// Load from an optional config file and `SALES_FORECAST__*` environment variables
    pub fn load(file: Option<&str>) -> Result<Self> {
        let app_config: AppConfig = config::Config::builder()
            .add_source(config::File::with_name(file.unwrap_or("sales_forecast")).required(false))
            .add_source(config::Environment::with_prefix("SALES_FORECAST").separator("__"))
            .build()?
            .try_deserialize()?;

        app_config.forecast.validate()?;
        Ok(app_config)
    }
}
