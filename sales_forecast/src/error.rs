//! Error types for the sales_forecast crate

use sales_math::MathError;
use thiserror::Error;

/// Custom error types for the sales_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Malformed or inconsistent sales rows
    #[error("Data error: {0}")]
    DataError(String),

    /// Error related to parameter validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The requested product is not part of the catalogue
    #[error("Product {0} not found")]
    ProductNotFound(u32),

    /// Failure reported by the data-access layer
    #[error("Repository error: {0}")]
    RepositoryError(String),

    /// Error from mathematical operations
    #[error("Math error: {0}")]
    MathError(#[from] MathError),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from CSV decoding
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Error from configuration loading
    #[error("Config error: {0}")]
    ConfigError(#[from] config::ConfigError),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl ForecastError {
    /// Whether the error came from the data-access layer rather than the engine
    pub fn is_repository(&self) -> bool {
        matches!(
            self,
            ForecastError::RepositoryError(_) | ForecastError::IoError(_) | ForecastError::CsvError(_)
        )
    }
}
