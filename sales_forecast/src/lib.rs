//! # Sales Forecast
//!
//! Per-product sales forecasting for a materials retailer.
//!
//! ## Features
//!
//! - Typed products and sales read through the `SalesRepository` trait
//! - In-memory and CSV-backed stores
//! - Calendar and lag feature table per product
//! - Strategy selection between linear regression, simple average, moving
//!   average and flat fallbacks, with a recovery path for failed forecasts
//! - Monthly aggregation of daily forecasts
//! - Restock recommendations with urgency tiers
//! - Chart data, sales trends and report summaries
//!
//! ## Strategy selection
//!
//! | Situation                         | Method                  | Confidence |
//! |-----------------------------------|-------------------------|------------|
//! | 30 or more feature rows           | `regresi_linear`        | high       |
//! | 1 to 29 feature rows              | `rata_rata_sederhana`   | medium     |
//! | No products, sales or history     | `fallback_<reason>`     | low        |
//! | Primary path failed, ≥ 7 rows     | `rata_rata_bergerak`    | medium     |
//! | Primary path failed, < 7 rows     | `rata_rata_sederhana`   | low        |
//!
//! Regression and moving-average forecasts start the day after the last sale;
//! every other forecast starts the day after today.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use sales_forecast::{MemoryStore, SalesPredictor};
//!
//! let mut store = MemoryStore::new();
//! let cement = store.add_product("Cement", Some("50kg"), Some("Building"), 65_000)?;
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! for day in 0..10 {
//!     store.add_sale(start + chrono::Duration::days(day), cement.id, 4.0, 65_000)?;
//! }
//!
//! let predictor = SalesPredictor::new(&store).with_today(start + chrono::Duration::days(10));
//! let forecast = predictor.predict_sales(cement.id, 30)?;
//! assert_eq!(forecast.daily.len(), 30);
//! assert_eq!(forecast.daily[0].predicted_quantity, 4.0);
//! # Ok::<(), sales_forecast::ForecastError>(())
//! ```

pub mod chart;
pub mod config;
pub mod data;
pub mod error;
pub mod features;
pub mod logging;
pub mod models;
pub mod monthly;
pub mod predictor;
pub mod reports;
pub mod restock;
pub mod store;
pub mod utils;

// Re-export commonly used types
pub use crate::config::{AppConfig, ForecastConfig};
pub use crate::data::{Product, ProductId, SaleDetail, SaleRecord, SalesRepository};
pub use crate::error::{ForecastError, Result};
pub use crate::models::{Confidence, DailyForecastPoint, FallbackReason, Method};
pub use crate::monthly::{aggregate_daily_to_monthly, MonthlyForecast};
pub use crate::predictor::{ForecastOutcome, SalesForecast, SalesPredictor};
pub use crate::restock::{RestockRecommendation, Urgency};
pub use crate::store::{DataLoader, MemoryStore};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
