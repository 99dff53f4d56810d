//! Averaging helpers used by the shortcut forecasting strategies
//!
//! Contains:
//! - Arithmetic mean of a series
//! - Fixed-decimal rounding of predicted quantities
//! - Simple Moving Average (SMA) over the most recent observations

use crate::{MathError, Result};
use statrs::statistics::Statistics;
use std::collections::VecDeque;

/// Arithmetic mean of a non-empty series
pub fn mean(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(MathError::InsufficientData(
            "Cannot average an empty series".to_string(),
        ));
    }

    Ok(values.iter().mean())
}

/// Round a value to the given number of decimal places
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Mean of the last `window` values, or of the whole series when it is shorter
pub fn tail_mean(values: &[f64], window: usize) -> Result<f64> {
    let mut sma = SimpleMovingAverage::new(window.min(values.len()).max(1))?;
    for &value in values {
        sma.update(value)?;
    }
    sma.value()
}

/// Simple Moving Average (SMA) implementation
#[derive(Debug, Clone)]
pub struct SimpleMovingAverage {
    period: usize,
    values: VecDeque<f64>,
    sum: f64,
}

impl SimpleMovingAverage {
    /// Create a new Simple Moving Average with the specified period
    pub fn new(period: usize) -> Result<Self> {
        if period == 0 {
            return Err(MathError::InvalidInput(
                "Period must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            period,
            values: VecDeque::with_capacity(period),
            sum: 0.0,
        })
    }

    /// Update the SMA with a new value
    pub fn update(&mut self, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(MathError::InvalidInput(format!(
                "Cannot average non-finite value {}",
                value
            )));
        }

        self.values.push_back(value);
        self.sum += value;

        // Drop the oldest value once the window is full
        if self.values.len() > self.period {
            if let Some(old_value) = self.values.pop_front() {
                self.sum -= old_value;
            }
        }

        Ok(())
    }

    /// Get the current SMA value
    pub fn value(&self) -> Result<f64> {
        if self.values.len() < self.period {
            return Err(MathError::InsufficientData(format!(
                "Not enough data for SMA calculation. Need {} values, have {}.",
                self.period,
                self.values.len()
            )));
        }

        Ok(self.sum / self.period as f64)
    }

    /// Get the current period
    pub fn period(&self) -> usize {
        self.period
    }

    /// Reset the SMA, clearing all values
    pub fn reset(&mut self) {
        self.values.clear();
        self.sum = 0.0;
    }
}
