//! Weighted ensembling for the temperature target.
//!
//! Three independently trained regressor families (linear, forest, boosted)
//! are blended by a weighted average. The blend structure is fixed; the
//! weight values are configuration.

use crate::error::Result;
use crate::linear_model::LinearRegression;
use crate::primitives::{Matrix, Vector};
use crate::traits::Estimator;
use crate::tree::{GradientBoostingRegressor, RandomForestRegressor};
use serde::{Deserialize, Serialize};

/// Per-role blend weights for the temperature ensemble.
///
/// Weighted-average semantics: the weights need not sum to 1, the blend
/// divides by their total.
///
/// # Examples
///
/// ```
/// use cultivar::ensemble::EnsembleWeights;
///
/// let weights = EnsembleWeights::default();
/// let blended = weights.weighted_average(10.0, 20.0, 30.0);
/// assert!((blended - 22.0).abs() < 1e-5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnsembleWeights {
    /// Weight of the linear regression role
    pub linear: f32,
    /// Weight of the random forest role
    pub forest: f32,
    /// Weight of the gradient boosting role
    pub boosted: f32,
}

impl Default for EnsembleWeights {
    /// The reference configuration: {linear: 0.2, forest: 0.4, boosted: 0.4}.
    fn default() -> Self {
        Self {
            linear: 0.2,
            forest: 0.4,
            boosted: 0.4,
        }
    }
}

impl EnsembleWeights {
    /// Blends three per-role predictions into one value.
    #[must_use]
    pub fn weighted_average(&self, linear: f32, forest: f32, boosted: f32) -> f32 {
        let total = self.linear + self.forest + self.boosted;
        (linear * self.linear + forest * self.forest + boosted * self.boosted) / total
    }
}

/// The three-role temperature ensemble.
///
/// Owns one fitted regressor per role plus the blend weights. Each role is
/// trained independently on the same scaled features and targets;
/// prediction blends the three outputs with [`EnsembleWeights`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemperatureEnsemble {
    linear: LinearRegression,
    forest: RandomForestRegressor,
    boosted: GradientBoostingRegressor,
    weights: EnsembleWeights,
}

impl TemperatureEnsemble {
    /// Creates an unfitted ensemble from its member configurations.
    #[must_use]
    pub fn new(
        linear: LinearRegression,
        forest: RandomForestRegressor,
        boosted: GradientBoostingRegressor,
        weights: EnsembleWeights,
    ) -> Self {
        Self {
            linear,
            forest,
            boosted,
            weights,
        }
    }

    /// Returns the configured blend weights.
    #[must_use]
    pub fn weights(&self) -> EnsembleWeights {
        self.weights
    }

    /// Fits all three roles on the same (scaled) features and targets.
    ///
    /// # Errors
    ///
    /// Returns an error if any member fails to fit.
    pub fn fit(&mut self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<()> {
        self.linear.fit(x, y)?;
        self.forest.fit(x, y)?;
        self.boosted.fit(x, y)?;
        Ok(())
    }

    /// Predicts blended values for the given (scaled) samples.
    ///
    /// # Panics
    ///
    /// Panics if any member is unfitted.
    #[must_use]
    pub fn predict(&self, x: &Matrix<f32>) -> Vector<f32> {
        let linear = self.linear.predict(x);
        let forest = self.forest.predict(x);
        let boosted = self.boosted.predict(x);

        let blended: Vec<f32> = (0..x.n_rows())
            .map(|i| self.weights.weighted_average(linear[i], forest[i], boosted[i]))
            .collect();
        Vector::from_vec(blended)
    }

    /// Returns true if every role has been fitted.
    #[must_use]
    pub fn is_fitted(&self) -> bool {
        self.linear.is_fitted() && self.forest.is_fitted() && self.boosted.is_fitted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_weights() {
        let w = EnsembleWeights::default();
        assert_eq!(w.linear, 0.2);
        assert_eq!(w.forest, 0.4);
        assert_eq!(w.boosted, 0.4);
    }

    #[test]
    fn test_weighted_average_reference_case() {
        // 0.2*10 + 0.4*20 + 0.4*30 = 22.0
        let w = EnsembleWeights::default();
        assert!((w.weighted_average(10.0, 20.0, 30.0) - 22.0).abs() < 1e-6);
    }

    #[test]
    fn test_weights_need_not_sum_to_one() {
        let w = EnsembleWeights {
            linear: 1.0,
            forest: 1.0,
            boosted: 2.0,
        };
        // (10 + 20 + 2*30) / 4 = 22.5
        assert!((w.weighted_average(10.0, 20.0, 30.0) - 22.5).abs() < 1e-6);
    }

    #[test]
    fn test_ensemble_fit_and_predict_linear_data() {
        // y = 3x - 1: every family can track this closely on training data
        let x = Matrix::from_vec(
            10,
            1,
            vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0],
        )
        .expect("valid");
        let y = Vector::from_vec(x.as_slice().iter().map(|&v| 3.0 * v - 1.0).collect());

        let mut ensemble = TemperatureEnsemble::new(
            LinearRegression::new(),
            RandomForestRegressor::new(10)
                .with_max_depth(6)
                .with_random_state(42),
            GradientBoostingRegressor::new()
                .with_n_estimators(50)
                .with_max_depth(2),
            EnsembleWeights::default(),
        );
        assert!(!ensemble.is_fitted());
        ensemble.fit(&x, &y).expect("fit");
        assert!(ensemble.is_fitted());

        let preds = ensemble.predict(&x);
        for i in 0..preds.len() {
            assert!(
                (preds[i] - y[i]).abs() < 3.0,
                "blended prediction {} too far from {} at {i}",
                preds[i],
                y[i]
            );
        }
    }

    #[test]
    fn test_ensemble_blend_is_between_member_extremes() {
        let x = Matrix::from_vec(6, 1, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).expect("valid");
        let y = Vector::from_slice(&[2.0, 4.0, 6.0, 8.0, 10.0, 12.0]);

        let mut ensemble = TemperatureEnsemble::new(
            LinearRegression::new(),
            RandomForestRegressor::new(5)
                .with_max_depth(3)
                .with_random_state(1),
            GradientBoostingRegressor::new().with_n_estimators(20),
            EnsembleWeights::default(),
        );
        ensemble.fit(&x, &y).expect("fit");

        let linear = ensemble.linear.predict(&x);
        let forest = ensemble.forest.predict(&x);
        let boosted = ensemble.boosted.predict(&x);
        let blended = ensemble.predict(&x);

        for i in 0..blended.len() {
            let lo = linear[i].min(forest[i]).min(boosted[i]);
            let hi = linear[i].max(forest[i]).max(boosted[i]);
            assert!(
                blended[i] >= lo - 1e-4 && blended[i] <= hi + 1e-4,
                "blend {} outside member range [{lo}, {hi}] at {i}",
                blended[i]
            );
        }
    }
}
