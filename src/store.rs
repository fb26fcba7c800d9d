//! The trained model store: scaler, per-target regressors, ensemble
//! weights, and the static performance table.
//!
//! A store is only ever observed fully built: it is either loaded from a
//! saved artifact or trained fresh on the synthetic corpus, and every
//! prediction call reads the same immutable snapshot.

use crate::ensemble::{EnsembleWeights, TemperatureEnsemble};
use crate::error::{CultivarError, Result};
use crate::linear_model::LinearRegression;
use crate::preprocessing::StandardScaler;
use crate::synthetic::{generate_corpus, CORPUS_SEED, CORPUS_SIZE};
use crate::traits::{Estimator, Transformer};
use crate::tree::{GradientBoostingRegressor, RandomForestRegressor};
use crate::weather::FeatureVector;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Trees per random forest.
const FOREST_TREES: usize = 40;
/// Maximum depth of forest trees.
const FOREST_DEPTH: usize = 8;
/// Boosting rounds per gradient boosting model.
const BOOST_ROUNDS: usize = 60;
/// Maximum depth of boosted trees.
const BOOST_DEPTH: usize = 3;

/// Static quality record for one prediction target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceRecord {
    /// Mean absolute error
    pub mean_absolute_error: f32,
    /// Root mean square error
    pub root_mean_square_error: f32,
    /// Accuracy in percent
    pub accuracy_percent: f32,
}

/// The static per-target performance table.
///
/// Configured constants from offline evaluation, exposed verbatim to
/// callers and used as the source of the ensemble confidence value. Never
/// derived from live predictions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    /// Temperature target
    pub temperature: PerformanceRecord,
    /// Humidity target
    pub humidity: PerformanceRecord,
    /// Rainfall target
    pub rainfall: PerformanceRecord,
    /// Air quality target
    pub air_quality: PerformanceRecord,
    /// The blended temperature ensemble
    pub ensemble: PerformanceRecord,
}

impl PerformanceMetrics {
    /// The reference configuration.
    #[must_use]
    pub fn reference() -> Self {
        Self {
            temperature: PerformanceRecord {
                mean_absolute_error: 1.2,
                root_mean_square_error: 1.8,
                accuracy_percent: 94.5,
            },
            humidity: PerformanceRecord {
                mean_absolute_error: 3.5,
                root_mean_square_error: 4.2,
                accuracy_percent: 92.8,
            },
            rainfall: PerformanceRecord {
                mean_absolute_error: 2.1,
                root_mean_square_error: 3.0,
                accuracy_percent: 91.2,
            },
            air_quality: PerformanceRecord {
                mean_absolute_error: 5.2,
                root_mean_square_error: 6.8,
                accuracy_percent: 89.5,
            },
            ensemble: PerformanceRecord {
                mean_absolute_error: 1.8,
                root_mean_square_error: 2.4,
                accuracy_percent: 95.8,
            },
        }
    }
}

/// A blended temperature estimate with its static confidence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperaturePrediction {
    /// Predicted temperature in °C, rounded to 2 decimal places
    pub value: f32,
    /// Static confidence (ensemble accuracy percent)
    pub confidence: f32,
}

/// The result of one full inference call.
///
/// All values are display-rounded to 2 decimal places; rainfall is clamped
/// to be non-negative before rounding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionBundle {
    /// Blended temperature estimate
    pub temperature: TemperaturePrediction,
    /// Predicted humidity in %
    pub humidity: f32,
    /// Predicted rainfall, floored at 0
    pub rainfall: f32,
    /// Predicted air quality index
    pub air_quality_index: f32,
}

/// Rounds to 2 decimal places at the output boundary.
pub(crate) fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

/// The fitted models behind every prediction call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelStore {
    scaler: StandardScaler,
    temperature: TemperatureEnsemble,
    humidity: RandomForestRegressor,
    rainfall: GradientBoostingRegressor,
    air_quality: RandomForestRegressor,
    metrics: PerformanceMetrics,
}

impl ModelStore {
    /// Trains a complete store on the synthetic corpus.
    ///
    /// Fits the scaler once over the features, then every regressor on the
    /// scaled matrix: the three-role temperature ensemble, a forest for
    /// humidity, a boosted model for rainfall, and a forest for air
    /// quality.
    ///
    /// # Errors
    ///
    /// Returns an error if any fit fails.
    pub fn train_fresh() -> Result<Self> {
        info!(
            n_samples = CORPUS_SIZE,
            seed = CORPUS_SEED,
            "training environmental models on synthetic corpus"
        );

        let corpus = generate_corpus(CORPUS_SIZE, CORPUS_SEED);

        let mut scaler = StandardScaler::new();
        let x = scaler.fit_transform(&corpus.features)?;

        let mut temperature = TemperatureEnsemble::new(
            LinearRegression::new(),
            RandomForestRegressor::new(FOREST_TREES)
                .with_max_depth(FOREST_DEPTH)
                .with_random_state(CORPUS_SEED),
            GradientBoostingRegressor::new()
                .with_n_estimators(BOOST_ROUNDS)
                .with_max_depth(BOOST_DEPTH),
            EnsembleWeights::default(),
        );
        temperature.fit(&x, &corpus.next_day_temperature)?;

        let mut humidity = RandomForestRegressor::new(FOREST_TREES)
            .with_max_depth(FOREST_DEPTH)
            .with_random_state(CORPUS_SEED);
        humidity.fit(&x, &corpus.humidity)?;

        let mut rainfall = GradientBoostingRegressor::new()
            .with_n_estimators(BOOST_ROUNDS)
            .with_max_depth(BOOST_DEPTH);
        rainfall.fit(&x, &corpus.rainfall)?;

        let mut air_quality = RandomForestRegressor::new(FOREST_TREES)
            .with_max_depth(FOREST_DEPTH)
            .with_random_state(CORPUS_SEED);
        air_quality.fit(&x, &corpus.air_quality)?;

        info!("model training completed");

        Ok(Self {
            scaler,
            temperature,
            humidity,
            rainfall,
            air_quality,
            metrics: PerformanceMetrics::reference(),
        })
    }

    /// Loads a previously saved store, if the artifact exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the artifact exists but cannot be read or
    /// decoded. A missing artifact is `Ok(None)`, not an error.
    pub fn load_if_present<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(path)?;
        let store = bincode::deserialize(&bytes)
            .map_err(|e| CultivarError::Serialization(e.to_string()))?;
        info!(path = %path.display(), "loaded trained models");
        Ok(Some(store))
    }

    /// Persists the fitted store to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes =
            bincode::serialize(self).map_err(|e| CultivarError::Serialization(e.to_string()))?;
        fs::write(path, bytes)?;
        Ok(())
    }

    /// Predicts next-day temperature via the three-role weighted blend.
    ///
    /// Confidence is the static ensemble accuracy, not a residual
    /// computation.
    ///
    /// # Errors
    ///
    /// Returns an error if scaling fails.
    pub fn predict_temperature(&self, features: &FeatureVector) -> Result<TemperaturePrediction> {
        let x = self.scaler.transform(&features.to_row_matrix())?;
        let value = self.temperature.predict(&x)[0];
        Ok(TemperaturePrediction {
            value: round2(value),
            confidence: self.metrics.ensemble.accuracy_percent,
        })
    }

    /// Predicts all environmental targets for one feature vector.
    ///
    /// # Errors
    ///
    /// Returns an error if scaling fails.
    pub fn predict_all(&self, features: &FeatureVector) -> Result<PredictionBundle> {
        let x = self.scaler.transform(&features.to_row_matrix())?;

        let temperature = TemperaturePrediction {
            value: round2(self.temperature.predict(&x)[0]),
            confidence: self.metrics.ensemble.accuracy_percent,
        };
        let humidity = round2(self.humidity.predict(&x)[0]);
        let rainfall = round2(self.rainfall.predict(&x)[0].max(0.0));
        let air_quality_index = round2(self.air_quality.predict(&x)[0]);

        Ok(PredictionBundle {
            temperature,
            humidity,
            rainfall,
            air_quality_index,
        })
    }

    /// The static performance table.
    #[must_use]
    pub fn metrics(&self) -> &PerformanceMetrics {
        &self.metrics
    }
}
