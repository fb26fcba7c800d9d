//! The prediction engine facade.
//!
//! One `ForecastEngine` lives for the process and owns the active
//! [`ModelStore`] behind a read-write lock. Prediction paths take a cheap
//! `Arc` snapshot under a read lock; `retrain` builds a complete
//! replacement store off-lock and swaps it in, so concurrent callers never
//! observe a half-replaced model and a failed retrain leaves the previous
//! store active.
//!
//! Per-request failures are converted into structured failure envelopes
//! (`success: false` plus the error message) instead of propagating.

use crate::advisor::{self, Recommendation, DEFAULT_CROP};
use crate::error::{CultivarError, Result};
use crate::risk::{self, RiskAlert};
use crate::store::{ModelStore, PerformanceMetrics, PredictionBundle, TemperaturePrediction};
use crate::weather::{self, FeatureVector, WeatherInput};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use tracing::{info, warn};

/// A crop advice request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropQuery {
    /// Crop to evaluate; unknown or missing values resolve to rice
    #[serde(default)]
    pub crop_type: Option<String>,
    /// Current temperature in °C; missing takes the documented default
    #[serde(default)]
    pub temperature: Option<f32>,
    /// Current humidity in %; missing takes the documented default
    #[serde(default)]
    pub humidity: Option<f32>,
}

/// Envelope for a prediction request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictResponse {
    /// Whether the request succeeded
    pub success: bool,
    /// Blended temperature estimate for current conditions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature_prediction: Option<TemperaturePrediction>,
    /// Per-day predictions over the sampled forecast window
    #[serde(default)]
    pub forecast_predictions: Vec<PredictionBundle>,
    /// Risk alerts derived from the predictions
    #[serde(default)]
    pub risks: Vec<RiskAlert>,
    /// Response time
    pub timestamp: DateTime<Utc>,
    /// Failure description when `success` is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Envelope for a crop advice request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropResponse {
    /// Whether the request succeeded
    pub success: bool,
    /// The crop the advice applies to (after fallback resolution)
    pub crop_type: String,
    /// Per-parameter recommendations
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
    /// 0-100 suitability score
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compatibility_score: Option<f32>,
    /// Response time
    pub timestamp: DateTime<Utc>,
    /// Failure description when `success` is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The process-lifetime prediction engine.
///
/// # Examples
///
/// ```no_run
/// use cultivar::engine::ForecastEngine;
/// use cultivar::weather::WeatherInput;
///
/// let engine = ForecastEngine::new().with_artifact("models.bin");
/// engine.initialize().unwrap();
///
/// let response = engine.predict(&WeatherInput::default());
/// assert!(response.success);
/// ```
#[derive(Debug, Default)]
pub struct ForecastEngine {
    store: RwLock<Option<Arc<ModelStore>>>,
    artifact: Option<PathBuf>,
}

impl ForecastEngine {
    /// Creates an uninitialized engine.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: RwLock::new(None),
            artifact: None,
        }
    }

    /// Sets the path used to load and persist trained artifacts.
    #[must_use]
    pub fn with_artifact<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.artifact = Some(path.into());
        self
    }

    /// Load-or-train initialization.
    ///
    /// Loads the saved store if an artifact path is configured and the
    /// artifact exists; otherwise trains fresh on the synthetic corpus and
    /// persists the result. Both paths converge to the same ready state.
    ///
    /// # Errors
    ///
    /// Returns an error if loading, training, or persisting fails. The
    /// engine stays unready on error.
    pub fn initialize(&self) -> Result<()> {
        if let Some(path) = &self.artifact {
            if let Some(store) = ModelStore::load_if_present(path)? {
                self.swap_store(store)?;
                return Ok(());
            }
        }

        let store = ModelStore::train_fresh()?;
        if let Some(path) = &self.artifact {
            store.save(path)?;
            info!(path = %path.display(), "persisted trained models");
        }
        self.swap_store(store)
    }

    /// Whether a trained store is active.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.store.read().map(|guard| guard.is_some()).unwrap_or(false)
    }

    /// Rebuilds the model store from scratch and swaps it in atomically.
    ///
    /// The replacement is fully trained (and persisted, if an artifact
    /// path is configured) before the active store is touched; on any
    /// failure the previous store remains in effect.
    ///
    /// # Errors
    ///
    /// Returns an error if training or persisting the replacement fails.
    pub fn retrain(&self) -> Result<()> {
        info!("retraining model store");
        let store = ModelStore::train_fresh()?;
        if let Some(path) = &self.artifact {
            store.save(path)?;
        }
        self.swap_store(store)
    }

    /// The static performance table, exposed verbatim.
    #[must_use]
    pub fn performance_metrics(&self) -> PerformanceMetrics {
        PerformanceMetrics::reference()
    }

    /// Runs a full prediction request.
    ///
    /// Extracts features from the current snapshot (defaults for missing
    /// fields, wind converted to km/h), blends the temperature ensemble,
    /// predicts every target for each sampled forecast day, and evaluates
    /// the risk rules. Failures yield a `success: false` envelope.
    #[must_use]
    pub fn predict(&self, input: &WeatherInput) -> PredictResponse {
        match self.predict_inner(input) {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "prediction request failed");
                PredictResponse {
                    success: false,
                    temperature_prediction: None,
                    forecast_predictions: Vec::new(),
                    risks: Vec::new(),
                    timestamp: Utc::now(),
                    error: Some(e.to_string()),
                }
            }
        }
    }

    fn predict_inner(&self, input: &WeatherInput) -> Result<PredictResponse> {
        let store = self.snapshot("predict")?;

        let features = FeatureVector::from_snapshot(&input.current);
        let temperature_prediction = store.predict_temperature(&features)?;

        let samples = weather::sample_daily(&input.forecast_series);
        let mut forecast_predictions = Vec::with_capacity(samples.len());
        for sample in &samples {
            forecast_predictions.push(store.predict_all(&FeatureVector::from_snapshot(sample))?);
        }

        let risks = risk::assess(&temperature_prediction, &features, &forecast_predictions);

        Ok(PredictResponse {
            success: true,
            temperature_prediction: Some(temperature_prediction),
            forecast_predictions,
            risks,
            timestamp: Utc::now(),
            error: None,
        })
    }

    /// Runs a crop advice request.
    ///
    /// Missing query fields take the documented defaults; unknown crops
    /// resolve to rice. The advisor itself is model-free, but the request
    /// still requires a ready engine so advice is never served by a
    /// process that cannot also predict.
    #[must_use]
    pub fn crop_recommendations(&self, query: &CropQuery) -> CropResponse {
        let crop_type = query
            .crop_type
            .clone()
            .unwrap_or_else(|| DEFAULT_CROP.to_string());

        match self.snapshot("crop recommendations") {
            Ok(_) => {
                let temperature = query
                    .temperature
                    .unwrap_or(weather::DEFAULT_TEMPERATURE);
                let humidity = query.humidity.unwrap_or(weather::DEFAULT_HUMIDITY);
                let (recommendations, score) =
                    advisor::recommend(&crop_type, temperature, humidity);

                CropResponse {
                    success: true,
                    crop_type,
                    recommendations,
                    compatibility_score: Some(score),
                    timestamp: Utc::now(),
                    error: None,
                }
            }
            Err(e) => {
                warn!(error = %e, "crop recommendation request failed");
                CropResponse {
                    success: false,
                    crop_type,
                    recommendations: Vec::new(),
                    compatibility_score: None,
                    timestamp: Utc::now(),
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Takes an immutable snapshot of the active store.
    fn snapshot(&self, operation: &str) -> Result<Arc<ModelStore>> {
        let guard = self
            .store
            .read()
            .map_err(|_| CultivarError::from("model store lock poisoned"))?;
        guard
            .as_ref()
            .cloned()
            .ok_or_else(|| CultivarError::model_not_ready(operation))
    }

    fn swap_store(&self, store: ModelStore) -> Result<()> {
        let mut guard = self
            .store
            .write()
            .map_err(|_| CultivarError::from("model store lock poisoned"))?;
        *guard = Some(Arc::new(store));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::weather::WeatherSnapshot;

    #[test]
    fn test_unready_engine_reports_model_not_ready() {
        let engine = ForecastEngine::new();
        assert!(!engine.is_ready());

        let response = engine.predict(&WeatherInput::default());
        assert!(!response.success);
        assert!(response.temperature_prediction.is_none());
        assert!(response
            .error
            .as_deref()
            .is_some_and(|e| e.contains("Model not ready")));
    }

    #[test]
    fn test_unready_engine_refuses_crop_advice() {
        let engine = ForecastEngine::new();
        let response = engine.crop_recommendations(&CropQuery::default());
        assert!(!response.success);
        assert!(response.recommendations.is_empty());
        assert_eq!(response.crop_type, "rice");
    }

    #[test]
    fn test_performance_metrics_available_before_initialization() {
        let engine = ForecastEngine::new();
        let metrics = engine.performance_metrics();
        assert_eq!(metrics.ensemble.accuracy_percent, 95.8);
    }

    #[test]
    fn test_failure_envelope_serializes_without_payload_fields() {
        let engine = ForecastEngine::new();
        let response = engine.predict(&WeatherInput::default());
        let json = serde_json::to_value(&response).expect("serialize");

        assert_eq!(json["success"], false);
        assert!(json.get("temperaturePrediction").is_none());
        assert!(json.get("error").is_some());
        assert!(json.get("timestamp").is_some());
    }

    #[test]
    fn test_crop_query_deserializes_with_defaults() {
        let query: CropQuery = serde_json::from_str("{}").expect("deserialize");
        assert!(query.crop_type.is_none());
        assert!(query.temperature.is_none());

        let query: CropQuery =
            serde_json::from_str(r#"{"cropType": "wheat", "temperature": 20.0}"#)
                .expect("deserialize");
        assert_eq!(query.crop_type.as_deref(), Some("wheat"));
        assert_eq!(query.temperature, Some(20.0));
    }

    #[test]
    fn test_sampled_forecast_is_capped() {
        // Sampling is pure; verify through the weather module the engine uses
        let series = vec![WeatherSnapshot::default(); 500];
        assert_eq!(weather::sample_daily(&series).len(), 7);
    }
}
