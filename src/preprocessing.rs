//! Feature normalization.
//!
//! The scaler is fit once over the training corpus and the resulting
//! per-feature parameters are applied identically at train and inference
//! time. Callers must transform inference inputs with the exact scaler the
//! models were trained against; mixing scalers is a caller error and is not
//! validated here.

use crate::error::{CultivarError, Result};
use crate::primitives::Matrix;
use crate::traits::Transformer;
use serde::{Deserialize, Serialize};

/// Minimum standard deviation before a feature is treated as constant.
const MIN_STD: f32 = 1e-8;

/// Standardizes features by removing the mean and scaling to unit variance.
///
/// The standard score of a sample x is: z = (x - mean) / std
///
/// A feature with (near-)zero variance gets its stored std replaced by 1.0
/// at fit time, so `transform` never divides by zero and the feature passes
/// through centered but unscaled.
///
/// # Example
///
/// ```
/// use cultivar::prelude::*;
///
/// let data = Matrix::from_vec(3, 2, vec![
///     0.0, 0.0,
///     1.0, 10.0,
///     2.0, 20.0,
/// ]).expect("valid matrix dimensions");
///
/// let mut scaler = StandardScaler::new();
/// let scaled = scaler.fit_transform(&data).expect("fit_transform should succeed");
///
/// let (n_rows, n_cols) = scaled.shape();
/// for j in 0..n_cols {
///     let mut sum = 0.0;
///     for i in 0..n_rows {
///         sum += scaled.get(i, j);
///     }
///     assert!((sum / n_rows as f32).abs() < 1e-5, "Mean should be ~0");
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Mean of each feature (computed during fit).
    mean: Option<Vec<f32>>,
    /// Standard deviation of each feature (computed during fit,
    /// zero-variance features stored as 1.0).
    std: Option<Vec<f32>>,
}

impl Default for StandardScaler {
    fn default() -> Self {
        Self::new()
    }
}

impl StandardScaler {
    /// Creates a new, unfitted `StandardScaler`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mean: None,
            std: None,
        }
    }

    /// Returns the mean of each feature.
    ///
    /// # Panics
    ///
    /// Panics if the scaler is not fitted.
    #[must_use]
    pub fn mean(&self) -> &[f32] {
        self.mean
            .as_ref()
            .expect("Scaler not fitted. Call fit() first.")
    }

    /// Returns the standard deviation of each feature.
    ///
    /// # Panics
    ///
    /// Panics if the scaler is not fitted.
    #[must_use]
    pub fn std(&self) -> &[f32] {
        self.std
            .as_ref()
            .expect("Scaler not fitted. Call fit() first.")
    }

    /// Returns true if the scaler has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.mean.is_some()
    }

    /// Transforms data back to original scale.
    ///
    /// # Errors
    ///
    /// Returns an error if the scaler is not fitted or dimensions mismatch.
    pub fn inverse_transform(&self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
        let mean = self
            .mean
            .as_ref()
            .ok_or_else(|| CultivarError::from("Scaler not fitted"))?;
        let std = self
            .std
            .as_ref()
            .ok_or_else(|| CultivarError::from("Scaler not fitted"))?;

        let (n_samples, n_features) = x.shape();
        if n_features != mean.len() {
            return Err(CultivarError::dimension_mismatch(
                "features",
                mean.len(),
                n_features,
            ));
        }

        let mut result = vec![0.0; n_samples * n_features];
        for i in 0..n_samples {
            for j in 0..n_features {
                result[i * n_features + j] = x.get(i, j) * std[j] + mean[j];
            }
        }

        Matrix::from_vec(n_samples, n_features, result).map_err(Into::into)
    }
}

impl Transformer for StandardScaler {
    fn fit(&mut self, x: &Matrix<f32>) -> Result<()> {
        let (n_samples, n_features) = x.shape();
        if n_samples == 0 {
            return Err("Cannot fit scaler on zero samples".into());
        }

        let mut mean = vec![0.0; n_features];
        for i in 0..n_samples {
            for j in 0..n_features {
                mean[j] += x.get(i, j);
            }
        }
        for m in &mut mean {
            *m /= n_samples as f32;
        }

        let mut std = vec![0.0; n_features];
        for i in 0..n_samples {
            for j in 0..n_features {
                let d = x.get(i, j) - mean[j];
                std[j] += d * d;
            }
        }
        for s in &mut std {
            *s = (*s / n_samples as f32).sqrt();
            // Constant feature: pass through unscaled instead of dividing by zero
            if *s < MIN_STD {
                *s = 1.0;
            }
        }

        self.mean = Some(mean);
        self.std = Some(std);
        Ok(())
    }

    fn transform(&self, x: &Matrix<f32>) -> Result<Matrix<f32>> {
        let mean = self
            .mean
            .as_ref()
            .ok_or_else(|| CultivarError::from("Scaler not fitted"))?;
        let std = self
            .std
            .as_ref()
            .ok_or_else(|| CultivarError::from("Scaler not fitted"))?;

        let (n_samples, n_features) = x.shape();
        if n_features != mean.len() {
            return Err(CultivarError::dimension_mismatch(
                "features",
                mean.len(),
                n_features,
            ));
        }

        let mut result = vec![0.0; n_samples * n_features];
        for i in 0..n_samples {
            for j in 0..n_features {
                result[i * n_features + j] = (x.get(i, j) - mean[j]) / std[j];
            }
        }

        Matrix::from_vec(n_samples, n_features, result).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_data() -> Matrix<f32> {
        Matrix::from_vec(
            5,
            2,
            vec![1.0, 10.0, 2.0, 20.0, 3.0, 30.0, 4.0, 40.0, 5.0, 50.0],
        )
        .expect("valid")
    }

    #[test]
    fn test_transform_without_fit_errors() {
        let scaler = StandardScaler::new();
        assert!(scaler.transform(&sample_data()).is_err());
    }

    #[test]
    fn test_fit_zero_samples_errors() {
        let mut scaler = StandardScaler::new();
        let x = Matrix::from_vec(0, 2, vec![]).expect("valid");
        assert!(scaler.fit(&x).is_err());
    }

    #[test]
    fn test_scaled_columns_have_zero_mean_unit_std() {
        let x = sample_data();
        let mut scaler = StandardScaler::new();
        let scaled = scaler.fit_transform(&x).expect("fit_transform");

        let (n, p) = scaled.shape();
        for j in 0..p {
            let mean: f32 = (0..n).map(|i| scaled.get(i, j)).sum::<f32>() / n as f32;
            let var: f32 = (0..n).map(|i| (scaled.get(i, j) - mean).powi(2)).sum::<f32>() / n as f32;
            assert!(mean.abs() < 1e-5, "column {j} mean={mean}, expected ~0");
            assert!((var - 1.0).abs() < 1e-4, "column {j} var={var}, expected ~1");
        }
    }

    #[test]
    fn test_zero_variance_feature_uses_unit_scale() {
        let x = Matrix::from_vec(4, 2, vec![7.0, 1.0, 7.0, 2.0, 7.0, 3.0, 7.0, 4.0]).expect("valid");
        let mut scaler = StandardScaler::new();
        scaler.fit(&x).expect("fit");

        assert_eq!(scaler.std()[0], 1.0);

        // Constant column centers to exactly zero, no NaN/inf
        let scaled = scaler.transform(&x).expect("transform");
        for i in 0..4 {
            assert_eq!(scaled.get(i, 0), 0.0);
            assert!(scaled.get(i, 0).is_finite());
        }
    }

    #[test]
    fn test_inverse_transform_roundtrip() {
        let x = sample_data();
        let mut scaler = StandardScaler::new();
        let scaled = scaler.fit_transform(&x).expect("fit_transform");
        let recovered = scaler.inverse_transform(&scaled).expect("inverse");

        let (n, p) = x.shape();
        for i in 0..n {
            for j in 0..p {
                assert!(
                    (x.get(i, j) - recovered.get(i, j)).abs() < 1e-4,
                    "round-trip error at [{i},{j}]: original={}, recovered={}",
                    x.get(i, j),
                    recovered.get(i, j)
                );
            }
        }
    }

    #[test]
    fn test_feature_count_mismatch_errors() {
        let mut scaler = StandardScaler::new();
        scaler.fit(&sample_data()).expect("fit");
        let narrow = Matrix::from_vec(2, 1, vec![1.0, 2.0]).expect("valid");
        assert!(scaler.transform(&narrow).is_err());
    }

    mod roundtrip_property {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(20))]

            #[test]
            fn transform_inverse_recovers_original(
                n in 4..=12usize,
                seed in 0..200u32,
            ) {
                let data: Vec<f32> = (0..n * 4)
                    .map(|i| ((i as f32 + seed as f32) * 0.37).sin() * 100.0)
                    .collect();
                let x = Matrix::from_vec(n, 4, data).expect("valid");

                let mut scaler = StandardScaler::new();
                let scaled = scaler.fit_transform(&x).expect("fit_transform");
                let recovered = scaler.inverse_transform(&scaled).expect("inverse");

                for i in 0..n {
                    for j in 0..4 {
                        prop_assert!(
                            (x.get(i, j) - recovered.get(i, j)).abs() < 1e-3,
                            "round-trip error at [{},{}]", i, j
                        );
                    }
                }
            }
        }
    }
}
