//! Core traits for regressors and transformers.
//!
//! These traits define the API contracts shared by all model families, so
//! the temperature ensemble can blend linear and tree-based regressors
//! through one capability interface.

use crate::error::Result;
use crate::primitives::{Matrix, Vector};

/// Primary trait for supervised regressors.
///
/// Regressors implement fit/predict/score following sklearn conventions.
/// Every model family usable in the temperature ensemble (linear, forest,
/// boosted) implements this trait, so ensembling never depends on a
/// concrete model type.
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
/// let r2 = model.score(&x, &y);
/// assert!(r2 > 0.99);
/// ```
pub trait Estimator {
    /// Fits the model to training data.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails (dimension mismatch, degenerate
    /// system, etc.).
    fn fit(&mut self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<()>;

    /// Predicts target values for input data.
    fn predict(&self, x: &Matrix<f32>) -> Vector<f32>;

    /// Computes the R² score on the given data.
    fn score(&self, x: &Matrix<f32>, y: &Vector<f32>) -> f32 {
        let y_pred = self.predict(x);
        crate::metrics::r_squared(&y_pred, y)
    }
}

/// Trait for data transformers (scalers, encoders).
///
/// # Examples
///
/// ```
/// use cultivar::prelude::*;
///
/// let x = Matrix::from_vec(3, 1, vec![1.0, 2.0, 3.0]).unwrap();
/// let mut scaler = StandardScaler::new();
/// let scaled = scaler.fit_transform(&x).unwrap();
/// assert_eq!(scaled.shape(), (3, 1));
/// ```
pub trait Transformer {
    /// Fits the transformer to data.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails.
    fn fit(&mut self, x: &Matrix<f32>) -> Result<()>;

    /// Transforms data using fitted parameters.
    ///
    /// # Errors
    ///
    /// Returns an error if the transformer is not fitted.
    fn transform(&self, x: &Matrix<f32>) -> Result<Matrix<f32>>;

    /// Fits and transforms in one step.
    ///
    /// # Errors
    ///
    /// Returns an error if fitting fails.
    fn fit_transform(&mut self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
        self.fit(x)?;
        self.transform(x)
    }
}
