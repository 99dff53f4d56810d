//! Multivariate ordinary least squares
//!
//! Fits `y = intercept + X·b` by solving the centered normal equations with
//! Gauss-Jordan elimination. Columns that are linearly dependent on earlier
//! ones (including all-zero columns) receive a zero coefficient.

use crate::{check_matrix, MathError, Result};
use serde::{Deserialize, Serialize};

/// Relative pivot size below which a column is treated as dependent
const PIVOT_TOLERANCE: f64 = 1e-10;

/// Fitted linear regression model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegression {
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LinearRegression {
    /// Fit the model on row-major features `x` and targets `y`
    pub fn fit(x: &[Vec<f64>], y: &[f64]) -> Result<Self> {
        let width = check_matrix(x)?;
        if x.len() != y.len() {
            return Err(MathError::InvalidInput(format!(
                "Feature rows ({}) don't match targets ({})",
                x.len(),
                y.len()
            )));
        }
        if y.iter().any(|v| !v.is_finite()) {
            return Err(MathError::InvalidInput(
                "Targets contain a non-finite value".to_string(),
            ));
        }

        let n = x.len() as f64;
        let x_means: Vec<f64> = (0..width)
            .map(|col| x.iter().map(|row| row[col]).sum::<f64>() / n)
            .collect();
        let y_mean = y.iter().sum::<f64>() / n;

        // Centered normal equations: (XᵀX) b = Xᵀy
        let mut gram = vec![vec![0.0; width]; width];
        let mut moment = vec![0.0; width];
        for (row, &target) in x.iter().zip(y.iter()) {
            let centered: Vec<f64> = row.iter().zip(&x_means).map(|(v, m)| v - m).collect();
            let dy = target - y_mean;
            for i in 0..width {
                moment[i] += centered[i] * dy;
                for j in 0..width {
                    gram[i][j] += centered[i] * centered[j];
                }
            }
        }

        let coefficients = solve_normal_equations(gram, moment)?;
        let intercept = y_mean
            - coefficients
                .iter()
                .zip(&x_means)
                .map(|(b, m)| b * m)
                .sum::<f64>();

        if !intercept.is_finite() {
            return Err(MathError::CalculationError(
                "Regression produced a non-finite intercept".to_string(),
            ));
        }

        Ok(Self {
            coefficients,
            intercept,
        })
    }

    /// Predict targets for row-major features
    pub fn predict(&self, x: &[Vec<f64>]) -> Result<Vec<f64>> {
        if x.is_empty() {
            return Ok(Vec::new());
        }

        let width = check_matrix(x)?;
        if width != self.coefficients.len() {
            return Err(MathError::InvalidInput(format!(
                "Model was fitted on {} features, got {}",
                self.coefficients.len(),
                width
            )));
        }

        Ok(x.iter()
            .map(|row| {
                self.intercept
                    + row
                        .iter()
                        .zip(&self.coefficients)
                        .map(|(v, b)| v * b)
                        .sum::<f64>()
            })
            .collect())
    }

    /// Get the R-squared value (coefficient of determination)
    pub fn r_squared(&self, x: &[Vec<f64>], y: &[f64]) -> Result<f64> {
        let predicted = self.predict(x)?;
        if predicted.len() != y.len() || y.is_empty() {
            return Err(MathError::InvalidInput(
                "Features and targets must have the same non-zero length".to_string(),
            ));
        }

        let y_mean = y.iter().sum::<f64>() / y.len() as f64;
        let ss_total: f64 = y.iter().map(|v| (v - y_mean).powi(2)).sum();
        let ss_residual: f64 = y
            .iter()
            .zip(&predicted)
            .map(|(v, p)| (v - p).powi(2))
            .sum();

        if ss_total.abs() < 1e-10 {
            return Err(MathError::CalculationError(
                "Cannot calculate R-squared: total sum of squares is too small".to_string(),
            ));
        }

        Ok(1.0 - ss_residual / ss_total)
    }

    /// Fitted coefficients, one per feature column
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Fitted intercept
    pub fn intercept(&self) -> f64 {
        self.intercept
    }
}

/// Solve a symmetric positive semi-definite system, zeroing dependent columns
fn solve_normal_equations(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>> {
    let n = b.len();
    let scale = a
        .iter()
        .enumerate()
        .map(|(i, row)| row[i].abs())
        .fold(1.0_f64, f64::max);
    let tolerance = PIVOT_TOLERANCE * scale;

    let mut pivot_of_column = vec![None; n];
    let mut row = 0;
    for col in 0..n {
        if row == n {
            break;
        }

        // Partial pivoting over the remaining rows
        let best = (row..n)
            .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))
            .unwrap_or(row);
        if a[best][col].abs() <= tolerance {
            continue;
        }
        a.swap(row, best);
        b.swap(row, best);

        let pivot = a[row][col];
        for k in col..n {
            a[row][k] /= pivot;
        }
        b[row] /= pivot;

        for other in 0..n {
            if other == row {
                continue;
            }
            let factor = a[other][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[other][k] -= factor * a[row][k];
            }
            b[other] -= factor * b[row];
        }

        pivot_of_column[col] = Some(row);
        row += 1;
    }

    let coefficients: Vec<f64> = pivot_of_column
        .iter()
        .map(|pivot| pivot.map_or(0.0, |r| b[r]))
        .collect();

    if coefficients.iter().any(|c| !c.is_finite()) {
        return Err(MathError::CalculationError(
            "Normal equations produced a non-finite coefficient".to_string(),
        ));
    }

    Ok(coefficients)
}
