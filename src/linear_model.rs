//! Linear models for regression.
//!
//! Includes Ordinary Least Squares (OLS) linear regression, the `linear`
//! role of the temperature ensemble.

use crate::error::Result;
use crate::primitives::{Matrix, Vector};
use crate::traits::Estimator;
use serde::{Deserialize, Serialize};

/// Ordinary Least Squares (OLS) linear regression.
///
/// Fits a linear model by minimizing the residual sum of squares between
/// observed and predicted targets.
///
/// # Solver
///
/// Uses normal equations: `β = (X^T X)^-1 X^T y` via Cholesky decomposition.
///
/// # Examples
///
/// ```
/// use cultivar::prelude::*;
///
/// // y = 2x + 1
/// let x = Matrix::from_vec(4, 1, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
/// let y = Vector::from_slice(&[3.0, 5.0, 7.0, 9.0]);
///
/// let mut model = LinearRegression::new();
/// model.fit(&x, &y).unwrap();
/// assert!(model.score(&x, &y) > 0.99);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegression {
    /// Coefficients for features (excluding intercept).
    coefficients: Option<Vector<f32>>,
    /// Intercept (bias) term.
    intercept: f32,
    /// Whether to fit an intercept.
    fit_intercept: bool,
}

impl Default for LinearRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LinearRegression {
    /// Creates a new `LinearRegression` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            coefficients: None,
            intercept: 0.0,
            fit_intercept: true,
        }
    }

    /// Sets whether to fit an intercept term.
    #[must_use]
    pub fn with_intercept(mut self, fit_intercept: bool) -> Self {
        self.fit_intercept = fit_intercept;
        self
    }

    /// Returns the coefficients (excluding intercept).
    ///
    /// # Panics
    ///
    /// Panics if the model is not fitted.
    #[must_use]
    pub fn coefficients(&self) -> &Vector<f32> {
        self.coefficients
            .as_ref()
            .expect("Model not fitted. Call fit() first.")
    }

    /// Returns the intercept term.
    #[must_use]
    pub fn intercept(&self) -> f32 {
        self.intercept
    }

    /// Returns true if the model has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.coefficients.is_some()
    }

    /// Adds an intercept column of ones to the design matrix.
    fn add_intercept_column(x: &Matrix<f32>) -> Result<Matrix<f32>> {
        let (n_rows, n_cols) = x.shape();
        let mut data = Vec::with_capacity(n_rows * (n_cols + 1));

        for i in 0..n_rows {
            data.push(1.0);
            for j in 0..n_cols {
                data.push(x.get(i, j));
            }
        }

        Matrix::from_vec(n_rows, n_cols + 1, data).map_err(Into::into)
    }
}

impl Estimator for LinearRegression {
    /// Fits the linear regression model using normal equations.
    ///
    /// # Errors
    ///
    /// Returns an error if dimensions don't match, the system is
    /// underdetermined, or the Gram matrix is not positive definite.
    fn fit(&mut self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<()> {
        let (n_samples, n_features) = x.shape();

        if n_samples != y.len() {
            return Err("Number of samples must match target length".into());
        }
        if n_samples == 0 {
            return Err("Cannot fit with zero samples".into());
        }

        let required_samples = if self.fit_intercept {
            n_features + 1
        } else {
            n_features
        };
        if n_samples < required_samples {
            return Err("Insufficient samples for the number of features".into());
        }

        let x_design = if self.fit_intercept {
            Self::add_intercept_column(x)?
        } else {
            x.clone()
        };

        let xt = x_design.transpose();
        let xtx = xt.matmul(&x_design)?;
        let xty = xt.matvec(y)?;
        let beta = xtx.cholesky_solve(&xty)?;

        if self.fit_intercept {
            self.intercept = beta[0];
            self.coefficients = Some(beta.slice(1, n_features + 1));
        } else {
            self.intercept = 0.0;
            self.coefficients = Some(beta);
        }

        Ok(())
    }

    /// Predicts target values for input data.
    ///
    /// # Panics
    ///
    /// Panics if the model is not fitted.
    fn predict(&self, x: &Matrix<f32>) -> Vector<f32> {
        let coefficients = self
            .coefficients
            .as_ref()
            .expect("Model not fitted. Call fit() first.");

        let result = x
            .matvec(coefficients)
            .expect("Matrix dimensions don't match coefficients");

        result.add_scalar(self.intercept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let model = LinearRegression::new();
        assert!(!model.is_fitted());
    }

    #[test]
    fn test_simple_regression() {
        // y = 2x + 1
        let x = Matrix::from_vec(4, 1, vec![1.0, 2.0, 3.0, 4.0]).expect("valid");
        let y = Vector::from_slice(&[3.0, 5.0, 7.0, 9.0]);

        let mut model = LinearRegression::new();
        model.fit(&x, &y).expect("fit");

        assert!(model.is_fitted());
        let coef = model.coefficients();
        assert!((coef[0] - 2.0).abs() < 1e-4);
        assert!((model.intercept() - 1.0).abs() < 1e-4);

        let predictions = model.predict(&x);
        for i in 0..4 {
            assert!((predictions[i] - y[i]).abs() < 1e-4);
        }

        assert!((model.score(&x, &y) - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_multivariate_regression() {
        // y = 1 + 2*x1 + 3*x2
        let x = Matrix::from_vec(4, 2, vec![1.0, 1.0, 2.0, 1.0, 1.0, 2.0, 2.0, 2.0]).expect("valid");
        let y = Vector::from_slice(&[6.0, 8.0, 9.0, 11.0]);

        let mut model = LinearRegression::new();
        model.fit(&x, &y).expect("fit");

        let coef = model.coefficients();
        assert!((coef[0] - 2.0).abs() < 1e-3);
        assert!((coef[1] - 3.0).abs() < 1e-3);
        assert!((model.intercept() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_without_intercept() {
        // y = 4x, no bias
        let x = Matrix::from_vec(3, 1, vec![1.0, 2.0, 3.0]).expect("valid");
        let y = Vector::from_slice(&[4.0, 8.0, 12.0]);

        let mut model = LinearRegression::new().with_intercept(false);
        model.fit(&x, &y).expect("fit");

        assert_eq!(model.intercept(), 0.0);
        assert!((model.coefficients()[0] - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_sample_target_mismatch_errors() {
        let x = Matrix::from_vec(3, 1, vec![1.0, 2.0, 3.0]).expect("valid");
        let y = Vector::from_slice(&[1.0, 2.0]);

        let mut model = LinearRegression::new();
        assert!(model.fit(&x, &y).is_err());
    }

    #[test]
    fn test_underdetermined_errors() {
        let x = Matrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).expect("valid");
        let y = Vector::from_slice(&[1.0, 2.0]);

        let mut model = LinearRegression::new();
        assert!(model.fit(&x, &y).is_err());
    }
}
