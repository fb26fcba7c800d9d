//! Agricultural risk assessment rules.
//!
//! Pure functions from predictions and current conditions to categorized
//! alerts. Rules are evaluated independently in a fixed sequence (heat,
//! drought, air quality); any subset may fire and alerts are never
//! deduplicated.

use crate::store::{PredictionBundle, TemperaturePrediction};
use crate::weather::FeatureVector;
use serde::{Deserialize, Serialize};

/// Predicted temperature above this (°C) signals heat stress.
pub const HEAT_STRESS_THRESHOLD: f32 = 35.0;
/// Mean forecast rainfall below this signals drought.
pub const DROUGHT_RAINFALL_THRESHOLD: f32 = 2.0;
/// Current air-quality reading above this signals pollution stress.
pub const AIR_QUALITY_THRESHOLD: f32 = 100.0;

/// Alert severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Advisory only
    Low,
    /// Action recommended
    Medium,
    /// Immediate action required
    High,
}

/// Category of an agricultural risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskType {
    /// Predicted temperature exceeds crop stress levels
    HeatStress,
    /// Insufficient rainfall over the forecast window
    Drought,
    /// Polluted air over the field
    AirQuality,
}

/// One categorized risk with a remediation hint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAlert {
    /// Risk category
    #[serde(rename = "type")]
    pub risk_type: RiskType,
    /// How urgent the alert is
    pub severity: Severity,
    /// Human-readable description
    pub message: String,
    /// Suggested remediation
    pub recommendation: String,
}

/// Evaluates all risk rules against a prediction and current conditions.
///
/// `forecast_bundles` are the per-day predictions over the sampled
/// forecast window. The drought rule averages their rainfall; with an
/// empty window the rule is skipped outright rather than treating the
/// mean of nothing as zero rainfall.
///
/// The air-quality rule reads the 4th current feature slot, which carries
/// wind speed unless the caller supplied a true AQI reading there (see
/// [`FeatureVector::air_quality_slot`]).
#[must_use]
pub fn assess(
    temp_prediction: &TemperaturePrediction,
    current: &FeatureVector,
    forecast_bundles: &[PredictionBundle],
) -> Vec<RiskAlert> {
    let mut risks = Vec::new();

    if temp_prediction.value > HEAT_STRESS_THRESHOLD {
        risks.push(RiskAlert {
            risk_type: RiskType::HeatStress,
            severity: Severity::High,
            message: "Extreme heat predicted - crop stress likely".to_string(),
            recommendation: "Increase irrigation, apply mulch, consider shade structures"
                .to_string(),
        });
    }

    if !forecast_bundles.is_empty() {
        let avg_rainfall = forecast_bundles.iter().map(|b| b.rainfall).sum::<f32>()
            / forecast_bundles.len() as f32;
        if avg_rainfall < DROUGHT_RAINFALL_THRESHOLD {
            risks.push(RiskAlert {
                risk_type: RiskType::Drought,
                severity: Severity::Medium,
                message: "Low rainfall predicted for coming week".to_string(),
                recommendation: "Plan irrigation schedule and ensure water availability"
                    .to_string(),
            });
        }
    }

    if current.air_quality_slot() > AIR_QUALITY_THRESHOLD {
        risks.push(RiskAlert {
            risk_type: RiskType::AirQuality,
            severity: Severity::Medium,
            message: "Poor air quality detected".to_string(),
            recommendation: "Monitor crop health for pollution stress symptoms".to_string(),
        });
    }

    risks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prediction(value: f32) -> TemperaturePrediction {
        TemperaturePrediction {
            value,
            confidence: 95.8,
        }
    }

    fn bundle_with_rainfall(rainfall: f32) -> PredictionBundle {
        PredictionBundle {
            temperature: prediction(28.0),
            humidity: 75.0,
            rainfall,
            air_quality_index: 50.0,
        }
    }

    #[test]
    fn test_hot_prediction_fires_only_heat_alert() {
        let features = FeatureVector::new(36.0, 75.0, 1013.0, 50.0);
        let risks = assess(&prediction(36.0), &features, &[]);

        assert_eq!(risks.len(), 1);
        assert_eq!(risks[0].risk_type, RiskType::HeatStress);
        assert_eq!(risks[0].severity, Severity::High);
    }

    #[test]
    fn test_no_alerts_for_benign_conditions() {
        let features = FeatureVector::new(28.0, 75.0, 1013.0, 10.0);
        let bundles = vec![bundle_with_rainfall(5.0); 7];
        assert!(assess(&prediction(28.0), &features, &bundles).is_empty());
    }

    #[test]
    fn test_heat_threshold_is_exclusive() {
        let features = FeatureVector::new(35.0, 75.0, 1013.0, 10.0);
        assert!(assess(&prediction(35.0), &features, &[]).is_empty());
    }

    #[test]
    fn test_drought_fires_on_low_mean_rainfall() {
        let features = FeatureVector::new(28.0, 75.0, 1013.0, 10.0);
        let bundles = vec![bundle_with_rainfall(1.0); 7];
        let risks = assess(&prediction(28.0), &features, &bundles);

        assert_eq!(risks.len(), 1);
        assert_eq!(risks[0].risk_type, RiskType::Drought);
        assert_eq!(risks[0].severity, Severity::Medium);
    }

    #[test]
    fn test_drought_skipped_for_empty_forecast() {
        // The mean over an empty window is undefined, not zero: no alert.
        let features = FeatureVector::new(28.0, 75.0, 1013.0, 10.0);
        assert!(assess(&prediction(28.0), &features, &[]).is_empty());
    }

    #[test]
    fn test_drought_uses_mean_not_any_single_day() {
        let features = FeatureVector::new(28.0, 75.0, 1013.0, 10.0);
        // One dry day but a wet mean: 0 + 6*4 = 24 / 7 > 2
        let mut bundles = vec![bundle_with_rainfall(4.0); 6];
        bundles.push(bundle_with_rainfall(0.0));
        assert!(assess(&prediction(28.0), &features, &bundles).is_empty());
    }

    #[test]
    fn test_air_quality_fires_on_high_slot_value() {
        let features = FeatureVector::new(28.0, 75.0, 1013.0, 120.0);
        let risks = assess(&prediction(28.0), &features, &[]);

        assert_eq!(risks.len(), 1);
        assert_eq!(risks[0].risk_type, RiskType::AirQuality);
        assert_eq!(risks[0].severity, Severity::Medium);
    }

    #[test]
    fn test_all_rules_can_fire_together() {
        let features = FeatureVector::new(38.0, 75.0, 1013.0, 150.0);
        let bundles = vec![bundle_with_rainfall(0.5); 7];
        let risks = assess(&prediction(38.0), &features, &bundles);

        assert_eq!(risks.len(), 3);
        let types: Vec<RiskType> = risks.iter().map(|r| r.risk_type).collect();
        assert!(types.contains(&RiskType::HeatStress));
        assert!(types.contains(&RiskType::Drought));
        assert!(types.contains(&RiskType::AirQuality));
    }

    #[test]
    fn test_alert_serializes_with_type_tag() {
        let features = FeatureVector::new(36.0, 75.0, 1013.0, 10.0);
        let risks = assess(&prediction(36.0), &features, &[]);
        let json = serde_json::to_value(&risks[0]).expect("serialize");

        assert_eq!(json["type"], "heat_stress");
        assert_eq!(json["severity"], "high");
    }
}
