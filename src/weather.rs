//! Weather input boundary: snapshots, feature extraction, forecast sampling.
//!
//! The upstream weather provider reports wind in m/s; the models were fit
//! on km/h, so extraction converts. Missing fields take documented default
//! values rather than being dropped.

use crate::primitives::Matrix;
use serde::{Deserialize, Serialize};

/// Fallback temperature (°C) when the input omits it.
pub const DEFAULT_TEMPERATURE: f32 = 28.0;
/// Fallback humidity (%) when the input omits it.
pub const DEFAULT_HUMIDITY: f32 = 75.0;
/// Fallback pressure (hPa) when the input omits it.
pub const DEFAULT_PRESSURE: f32 = 1013.0;
/// Fallback wind speed (m/s) when the input omits it.
pub const DEFAULT_WIND_SPEED_MS: f32 = 3.0;

/// m/s to km/h conversion factor. Part of the input contract: the models
/// are fit on km/h features.
pub const MS_TO_KMH: f32 = 3.6;

/// Number of features per sample.
pub const N_FEATURES: usize = 4;

/// Forecast entries per sampled point (3-hour data, one sample per day).
pub const FORECAST_STRIDE: usize = 8;
/// Maximum forecast entries considered (7 days of 3-hour data).
pub const FORECAST_WINDOW: usize = 56;

/// One weather observation as reported by the upstream provider.
///
/// All fields are optional; extraction substitutes defaults.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    /// Air temperature in °C
    #[serde(default)]
    pub temperature: Option<f32>,
    /// Relative humidity in %
    #[serde(default)]
    pub humidity: Option<f32>,
    /// Atmospheric pressure in hPa
    #[serde(default)]
    pub pressure: Option<f32>,
    /// Wind speed in m/s (provider units)
    #[serde(default)]
    pub wind_speed_meters_per_second: Option<f32>,
}

/// A prediction request: current conditions plus an optional forecast
/// series of same-shaped records at 3-hour intervals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherInput {
    /// Current observed conditions
    pub current: WeatherSnapshot,
    /// Future samples, one entry per 3 hours
    #[serde(default)]
    pub forecast_series: Vec<WeatherSnapshot>,
}

/// The fixed-order model input: [temperature °C, humidity %, pressure hPa,
/// wind km/h].
///
/// The order is part of the model contract and must match the order used
/// at fit time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f32; N_FEATURES]);

impl FeatureVector {
    /// Builds a feature vector from raw values already in model units.
    #[must_use]
    pub fn new(temperature: f32, humidity: f32, pressure: f32, wind_speed_kmh: f32) -> Self {
        Self([temperature, humidity, pressure, wind_speed_kmh])
    }

    /// Extracts features from a snapshot, substituting defaults for missing
    /// fields and converting wind from m/s to km/h.
    #[must_use]
    pub fn from_snapshot(snapshot: &WeatherSnapshot) -> Self {
        Self([
            snapshot.temperature.unwrap_or(DEFAULT_TEMPERATURE),
            snapshot.humidity.unwrap_or(DEFAULT_HUMIDITY),
            snapshot.pressure.unwrap_or(DEFAULT_PRESSURE),
            snapshot
                .wind_speed_meters_per_second
                .unwrap_or(DEFAULT_WIND_SPEED_MS)
                * MS_TO_KMH,
        ])
    }

    /// The ordered feature values.
    #[must_use]
    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    /// Temperature in °C.
    #[must_use]
    pub fn temperature(&self) -> f32 {
        self.0[0]
    }

    /// Humidity in %.
    #[must_use]
    pub fn humidity(&self) -> f32 {
        self.0[1]
    }

    /// Pressure in hPa.
    #[must_use]
    pub fn pressure(&self) -> f32 {
        self.0[2]
    }

    /// Wind speed in km/h.
    #[must_use]
    pub fn wind_speed_kmh(&self) -> f32 {
        self.0[3]
    }

    /// The value the air-quality risk rule reads.
    ///
    /// Inherited quirk, preserved deliberately: this is the 4th feature
    /// slot, which holds wind speed (km/h) unless the caller constructed
    /// the vector with a real AQI reading in that position. See the risk
    /// module.
    #[must_use]
    pub fn air_quality_slot(&self) -> f32 {
        self.0[3]
    }

    /// The features as a 1-row matrix, ready for scaling and prediction.
    #[must_use]
    pub fn to_row_matrix(&self) -> Matrix<f32> {
        Matrix::from_vec(1, N_FEATURES, self.0.to_vec())
            .expect("feature row dimensions are consistent by construction")
    }
}

/// Samples a forecast series down to daily entries.
///
/// Takes every [`FORECAST_STRIDE`]th entry from the first
/// [`FORECAST_WINDOW`] entries, so 3-hour data yields at most 7 daily
/// samples.
#[must_use]
pub fn sample_daily(series: &[WeatherSnapshot]) -> Vec<WeatherSnapshot> {
    series
        .iter()
        .take(FORECAST_WINDOW)
        .step_by(FORECAST_STRIDE)
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_snapshot() -> WeatherSnapshot {
        WeatherSnapshot {
            temperature: Some(30.0),
            humidity: Some(60.0),
            pressure: Some(1005.0),
            wind_speed_meters_per_second: Some(5.0),
        }
    }

    #[test]
    fn test_extraction_converts_wind_to_kmh() {
        let features = FeatureVector::from_snapshot(&full_snapshot());
        assert_eq!(features.temperature(), 30.0);
        assert_eq!(features.humidity(), 60.0);
        assert_eq!(features.pressure(), 1005.0);
        assert!((features.wind_speed_kmh() - 18.0).abs() < 1e-6);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let features = FeatureVector::from_snapshot(&WeatherSnapshot::default());
        assert_eq!(features.temperature(), 28.0);
        assert_eq!(features.humidity(), 75.0);
        assert_eq!(features.pressure(), 1013.0);
        assert!((features.wind_speed_kmh() - 10.8).abs() < 1e-5);
    }

    #[test]
    fn test_air_quality_slot_is_fourth_feature() {
        let features = FeatureVector::new(25.0, 70.0, 1010.0, 120.0);
        assert_eq!(features.air_quality_slot(), 120.0);
        assert_eq!(features.air_quality_slot(), features.wind_speed_kmh());
    }

    #[test]
    fn test_to_row_matrix_shape_and_order() {
        let features = FeatureVector::new(1.0, 2.0, 3.0, 4.0);
        let row = features.to_row_matrix();
        assert_eq!(row.shape(), (1, 4));
        assert_eq!(row.as_slice(), &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_sample_daily_stride() {
        let series = vec![WeatherSnapshot::default(); 24];
        let samples = sample_daily(&series);
        // Entries 0, 8, 16
        assert_eq!(samples.len(), 3);
    }

    #[test]
    fn test_sample_daily_caps_at_seven() {
        let series = vec![WeatherSnapshot::default(); 200];
        let samples = sample_daily(&series);
        assert_eq!(samples.len(), 7);
    }

    #[test]
    fn test_sample_daily_empty() {
        assert!(sample_daily(&[]).is_empty());
    }

    #[test]
    fn test_snapshot_deserializes_camel_case() {
        let snapshot: WeatherSnapshot = serde_json::from_str(
            r#"{"temperature": 22.5, "windSpeedMetersPerSecond": 4.0}"#,
        )
        .expect("deserialize");
        assert_eq!(snapshot.temperature, Some(22.5));
        assert_eq!(snapshot.wind_speed_meters_per_second, Some(4.0));
        assert_eq!(snapshot.humidity, None);
    }
}
