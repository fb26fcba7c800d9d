//! Crop suitability advice.
//!
//! Pure threshold rules from a crop's environmental requirements to
//! per-parameter recommendations and a 0-100 compatibility score. The
//! requirement table is fixed at compile time; unknown crops fall back to
//! the default crop instead of erroring.

use serde::{Deserialize, Serialize};

/// Crop used when a requested crop type is unknown.
pub const DEFAULT_CROP: &str = "rice";

/// Score penalty per degree outside the optimal temperature range.
const TEMPERATURE_PENALTY: f32 = 10.0;
/// Score penalty per percentage point outside the optimal humidity range.
/// Intentionally lower than the temperature penalty.
const HUMIDITY_PENALTY: f32 = 5.0;

/// Environmental requirements for one crop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropRequirement {
    /// Optimal temperature range in °C
    pub temperature_range: [f32; 2],
    /// Optimal relative humidity range in %
    pub humidity_range: [f32; 2],
    /// Optimal annual rainfall range in mm
    pub optimal_rainfall_range: [f32; 2],
}

const RICE: CropRequirement = CropRequirement {
    temperature_range: [20.0, 35.0],
    humidity_range: [70.0, 90.0],
    optimal_rainfall_range: [1500.0, 2000.0],
};

const WHEAT: CropRequirement = CropRequirement {
    temperature_range: [12.0, 25.0],
    humidity_range: [50.0, 70.0],
    optimal_rainfall_range: [500.0, 750.0],
};

const COTTON: CropRequirement = CropRequirement {
    temperature_range: [21.0, 30.0],
    humidity_range: [60.0, 80.0],
    optimal_rainfall_range: [600.0, 1200.0],
};

/// Looks up a crop's requirements, falling back to rice for unknown keys.
#[must_use]
pub fn requirements_for(crop_type: &str) -> &'static CropRequirement {
    match crop_type {
        "rice" => &RICE,
        "wheat" => &WHEAT,
        "cotton" => &COTTON,
        _ => &RICE,
    }
}

/// Recommendation class.
///
/// Temperature above range maps to `Critical`; every other excursion,
/// including humidity in both directions, is a `Warning`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationKind {
    /// Parameter is inside the optimal range
    Success,
    /// Parameter needs attention
    Warning,
    /// Parameter needs immediate intervention
    Critical,
}

/// Which weather parameter a recommendation concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parameter {
    /// Air temperature
    Temperature,
    /// Relative humidity
    Humidity,
}

/// One actionable recommendation for a crop under current conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Recommendation class
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    /// The parameter this concerns
    pub parameter: Parameter,
    /// Human-readable assessment
    pub message: String,
    /// Suggested action
    pub action: String,
}

fn midpoint(range: [f32; 2]) -> f32 {
    (range[0] + range[1]) / 2.0
}

fn within(value: f32, range: [f32; 2]) -> bool {
    range[0] <= value && value <= range[1]
}

/// Score for one parameter: 100 inside the range, otherwise 100 minus the
/// distance from the range midpoint times the penalty, floored at 0.
fn range_score(value: f32, range: [f32; 2], penalty: f32) -> f32 {
    if within(value, range) {
        100.0
    } else {
        (100.0 - (value - midpoint(range)).abs() * penalty).max(0.0)
    }
}

/// 0-100 measure of how well current conditions match a crop's needs.
///
/// Average of the temperature and humidity scores, rounded to 1 decimal
/// place.
#[must_use]
pub fn compatibility_score(temperature: f32, humidity: f32, req: &CropRequirement) -> f32 {
    let temp_score = range_score(temperature, req.temperature_range, TEMPERATURE_PENALTY);
    let humidity_score = range_score(humidity, req.humidity_range, HUMIDITY_PENALTY);
    let combined = (temp_score + humidity_score) / 2.0;
    (combined * 10.0).round() / 10.0
}

/// Produces per-parameter recommendations and the compatibility score for
/// a crop under the given conditions.
///
/// Unknown crop types resolve to [`DEFAULT_CROP`]'s requirements.
#[must_use]
pub fn recommend(crop_type: &str, temperature: f32, humidity: f32) -> (Vec<Recommendation>, f32) {
    let req = requirements_for(crop_type);
    let mut recommendations = Vec::with_capacity(2);

    if temperature < req.temperature_range[0] {
        recommendations.push(Recommendation {
            kind: RecommendationKind::Warning,
            parameter: Parameter::Temperature,
            message: format!("Temperature ({temperature}°C) is below optimal range"),
            action: "Consider protective measures like mulching or row covers".to_string(),
        });
    } else if temperature > req.temperature_range[1] {
        recommendations.push(Recommendation {
            kind: RecommendationKind::Critical,
            parameter: Parameter::Temperature,
            message: format!("Temperature ({temperature}°C) is above optimal range"),
            action: "Increase irrigation frequency and consider shade netting".to_string(),
        });
    } else {
        recommendations.push(Recommendation {
            kind: RecommendationKind::Success,
            parameter: Parameter::Temperature,
            message: "Temperature is within optimal range".to_string(),
            action: "Continue normal operations".to_string(),
        });
    }

    if humidity < req.humidity_range[0] {
        recommendations.push(Recommendation {
            kind: RecommendationKind::Warning,
            parameter: Parameter::Humidity,
            message: format!("Humidity ({humidity}%) is low"),
            action: "Increase irrigation frequency".to_string(),
        });
    } else if humidity > req.humidity_range[1] {
        recommendations.push(Recommendation {
            kind: RecommendationKind::Warning,
            parameter: Parameter::Humidity,
            message: format!("Humidity ({humidity}%) is high"),
            action: "Monitor for fungal diseases and ensure proper ventilation".to_string(),
        });
    } else {
        recommendations.push(Recommendation {
            kind: RecommendationKind::Success,
            parameter: Parameter::Humidity,
            message: "Humidity levels are optimal".to_string(),
            action: "Maintain current irrigation schedule".to_string(),
        });
    }

    let score = compatibility_score(temperature, humidity, req);
    (recommendations, score)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(recommendations: &[Recommendation]) -> Vec<RecommendationKind> {
        recommendations.iter().map(|r| r.kind).collect()
    }

    #[test]
    fn test_rice_in_optimal_conditions_scores_100() {
        let (recommendations, score) = recommend("rice", 28.0, 75.0);

        assert_eq!(recommendations.len(), 2);
        assert_eq!(
            kinds(&recommendations),
            vec![RecommendationKind::Success, RecommendationKind::Success]
        );
        assert_eq!(score, 100.0);
    }

    #[test]
    fn test_wheat_in_rice_weather_is_stressed() {
        let (recommendations, score) = recommend("wheat", 28.0, 75.0);

        // 28 > 25: critical; 75 > 70: warning
        assert_eq!(
            kinds(&recommendations),
            vec![RecommendationKind::Critical, RecommendationKind::Warning]
        );
        assert_eq!(recommendations[0].parameter, Parameter::Temperature);
        assert_eq!(recommendations[1].parameter, Parameter::Humidity);

        // temp: 100 - |28 - 18.5| * 10 = 5; humidity: 100 - |75 - 60| * 5 = 25
        // average = 15.0
        assert_eq!(score, 15.0);
    }

    #[test]
    fn test_cold_temperature_is_warning_not_critical() {
        let (recommendations, _) = recommend("rice", 10.0, 75.0);
        assert_eq!(recommendations[0].kind, RecommendationKind::Warning);
        assert!(recommendations[0].message.contains("below optimal"));
    }

    #[test]
    fn test_humidity_warnings_both_directions() {
        let (low, _) = recommend("rice", 28.0, 40.0);
        assert_eq!(low[1].kind, RecommendationKind::Warning);
        assert!(low[1].message.contains("low"));

        let (high, _) = recommend("rice", 28.0, 95.0);
        assert_eq!(high[1].kind, RecommendationKind::Warning);
        assert!(high[1].message.contains("high"));
    }

    #[test]
    fn test_unknown_crop_falls_back_to_rice() {
        assert_eq!(requirements_for("quinoa"), &RICE);

        let (recommendations, score) = recommend("quinoa", 28.0, 75.0);
        assert_eq!(
            kinds(&recommendations),
            vec![RecommendationKind::Success, RecommendationKind::Success]
        );
        assert_eq!(score, 100.0);
    }

    #[test]
    fn test_range_boundaries_are_inclusive() {
        let (recommendations, score) = recommend("rice", 35.0, 90.0);
        assert_eq!(
            kinds(&recommendations),
            vec![RecommendationKind::Success, RecommendationKind::Success]
        );
        assert_eq!(score, 100.0);
    }

    #[test]
    fn test_score_floors_at_zero() {
        // Far outside both ranges: each component hits its 0 floor
        let (_, score) = recommend("wheat", 60.0, 0.0);
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_score_rounded_to_one_decimal() {
        // temp in range: 100; humidity 91: 100 - |91 - 80| * 5 = 45
        // average = 72.5
        let (_, score) = recommend("rice", 28.0, 91.0);
        assert_eq!(score, 72.5);
    }

    #[test]
    fn test_cotton_table_values() {
        let req = requirements_for("cotton");
        assert_eq!(req.temperature_range, [21.0, 30.0]);
        assert_eq!(req.humidity_range, [60.0, 80.0]);
        assert_eq!(req.optimal_rainfall_range, [600.0, 1200.0]);
    }

    #[test]
    fn test_recommendation_serializes_with_type_tag() {
        let (recommendations, _) = recommend("rice", 40.0, 75.0);
        let json = serde_json::to_value(&recommendations[0]).expect("serialize");

        assert_eq!(json["type"], "critical");
        assert_eq!(json["parameter"], "temperature");
    }
}
