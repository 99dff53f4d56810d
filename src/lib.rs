//! # Material Sales Workspace
//!
//! Facade over the workspace crates:
//!
//! - [`sales_math`]: averages, feature scaling and least-squares regression
//! - [`sales_forecast`]: the forecasting engine, stores, restock advice and reports
//!
//! ## Example
//!
//! ```
//! use material_sales_workspace::forecast::{MemoryStore, SalesPredictor};
//!
//! let store = MemoryStore::new();
//! let predictor = SalesPredictor::new(&store);
//! let forecast = predictor.predict_sales(1, 7).unwrap();
//! assert_eq!(forecast.daily.len(), 7);
//! assert!(forecast.daily.iter().all(|p| p.method.is_fallback()));
//! ```

pub use sales_forecast as forecast;
pub use sales_math as math;
