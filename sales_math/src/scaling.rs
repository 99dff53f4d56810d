//! Feature standardization
//!
//! `StandardScaler` removes the per-column mean and divides by the population
//! standard deviation observed at fit time. Columns with no spread are only
//! centered.

use crate::{check_matrix, MathError, Result};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Spread below which a column is treated as constant
const MIN_SCALE: f64 = 1e-10;

/// Per-column standardization fitted on a training matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    means: Vec<f64>,
    scales: Vec<f64>,
}

impl StandardScaler {
    /// Fit the scaler on row-major training data
    pub fn fit(rows: &[Vec<f64>]) -> Result<Self> {
        let width = check_matrix(rows)?;

        let mut means = Vec::with_capacity(width);
        let mut scales = Vec::with_capacity(width);
        for col in 0..width {
            let column: Vec<f64> = rows.iter().map(|row| row[col]).collect();
            let mean = column.iter().mean();
            let std_dev = column.iter().population_std_dev();

            means.push(mean);
            scales.push(if std_dev.is_finite() && std_dev > MIN_SCALE {
                std_dev
            } else {
                1.0
            });
        }

        Ok(Self { means, scales })
    }

    /// Standardize rows with the fitted statistics
    pub fn transform(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let width = check_matrix(rows)?;
        if width != self.means.len() {
            return Err(MathError::InvalidInput(format!(
                "Scaler was fitted on {} columns, got {}",
                self.means.len(),
                width
            )));
        }

        Ok(rows
            .iter()
            .map(|row| {
                row.iter()
                    .zip(self.means.iter().zip(self.scales.iter()))
                    .map(|(value, (mean, scale))| (value - mean) / scale)
                    .collect()
            })
            .collect())
    }

    /// Fit on `rows` and return them standardized
    pub fn fit_transform(rows: &[Vec<f64>]) -> Result<(Self, Vec<Vec<f64>>)> {
        let scaler = Self::fit(rows)?;
        let scaled = scaler.transform(rows)?;
        Ok((scaler, scaled))
    }

    /// Column means seen at fit time
    pub fn means(&self) -> &[f64] {
        &self.means
    }

    /// Column scales seen at fit time
    pub fn scales(&self) -> &[f64] {
        &self.scales
    }
}
