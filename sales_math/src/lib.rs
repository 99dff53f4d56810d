//! # Sales Math
//!
//! Numeric building blocks for the sales forecasting engine.
//! This crate provides the averaging, scaling and regression routines the
//! forecasters are assembled from. Every routine is a pure function of its
//! input or an owned value fitted once and then queried.

use thiserror::Error;

pub mod averages;
pub mod regression;
pub mod scaling;

pub use averages::{mean, round_to, tail_mean, SimpleMovingAverage};
pub use regression::LinearRegression;
pub use scaling::StandardScaler;

/// Errors that can occur in forecasting calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for sales math operations
pub type Result<T> = std::result::Result<T, MathError>;

/// Reject matrices whose rows disagree in width or hold non-finite values
pub(crate) fn check_matrix(rows: &[Vec<f64>]) -> Result<usize> {
    let width = match rows.first() {
        Some(first) => first.len(),
        None => {
            return Err(MathError::InsufficientData(
                "At least one row is required".to_string(),
            ))
        }
    };

    for (i, row) in rows.iter().enumerate() {
        if row.len() != width {
            return Err(MathError::InvalidInput(format!(
                "Row {} has {} columns, expected {}",
                i,
                row.len(),
                width
            )));
        }
        if row.iter().any(|v| !v.is_finite()) {
            return Err(MathError::InvalidInput(format!(
                "Row {} contains a non-finite value",
                i
            )));
        }
    }

    Ok(width)
}
