//! Crop prediction models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::WeatherSnapshot;

/// Four-level suitability bucket, ordered from worst to best
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SuitabilityClass {
    Low,
    Medium,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl SuitabilityClass {
    /// Bucket for a (soil match, season match) pair
    pub fn for_matches(soil_match: bool, season_match: bool) -> Self {
        match (soil_match, season_match) {
            (true, true) => SuitabilityClass::VeryHigh,
            (true, false) => SuitabilityClass::High,
            (false, true) => SuitabilityClass::Medium,
            (false, false) => SuitabilityClass::Low,
        }
    }

    /// Half-open confidence band `[low, high)` a local score is drawn from
    pub fn confidence_band(&self) -> (f64, f64) {
        match self {
            SuitabilityClass::VeryHigh => (0.75, 0.95),
            SuitabilityClass::High => (0.55, 0.70),
            SuitabilityClass::Medium => (0.45, 0.60),
            SuitabilityClass::Low => (0.25, 0.40),
        }
    }
}

impl std::fmt::Display for SuitabilityClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SuitabilityClass::VeryHigh => write!(f, "Very High"),
            SuitabilityClass::High => write!(f, "High"),
            SuitabilityClass::Medium => write!(f, "Medium"),
            SuitabilityClass::Low => write!(f, "Low"),
        }
    }
}

/// A single ranked crop recommendation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CropPrediction {
    pub crop: String,
    pub suitability_class: SuitabilityClass,
    /// In [0, 1], two decimals
    pub confidence: f64,
    pub season: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hindi_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<String>,
}

/// The location a prediction was requested for
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PredictionLocation {
    pub state: String,
    pub district: String,
    pub soil_type: String,
}

/// Full answer returned to the UI
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionResult {
    pub predictions: Vec<CropPrediction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<WeatherSnapshot>,
    pub location: PredictionLocation,
    #[serde(rename = "isFromFallback")]
    pub is_from_fallback: bool,
    pub timestamp: DateTime<Utc>,
}

/// Body returned by the remote prediction service.
///
/// Same shape as [`PredictionResult`] without the fallback flag and timestamp,
/// which the caller stamps itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemotePrediction {
    pub predictions: Vec<CropPrediction>,
    #[serde(default)]
    pub weather: Option<WeatherSnapshot>,
    #[serde(default)]
    pub location: Option<PredictionLocation>,
}

/// Maximum number of crops in a result
pub const MAX_PREDICTIONS: usize = 6;

/// Sort by confidence, highest first, and keep the top [`MAX_PREDICTIONS`].
///
/// The sort is stable, so equal confidences keep their input order.
pub fn rank_predictions(mut predictions: Vec<CropPrediction>) -> Vec<CropPrediction> {
    predictions.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
    predictions.truncate(MAX_PREDICTIONS);
    predictions
}

impl PredictionResult {
    /// Stamp a remote body as a live (non-fallback) result.
    ///
    /// Predictions are re-ranked so the ordering and size invariants hold
    /// regardless of what the remote service sent.
    pub fn from_remote(
        remote: RemotePrediction,
        requested: PredictionLocation,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            predictions: rank_predictions(remote.predictions),
            weather: remote.weather,
            location: remote.location.unwrap_or(requested),
            is_from_fallback: false,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prediction(crop: &str, confidence: f64) -> CropPrediction {
        CropPrediction {
            crop: crop.to_string(),
            suitability_class: SuitabilityClass::High,
            confidence,
            season: "kharif".to_string(),
            category: "cereal".to_string(),
            hindi_name: None,
            reasons: Vec::new(),
        }
    }

    #[test]
    fn test_class_ordering() {
        assert!(SuitabilityClass::VeryHigh > SuitabilityClass::High);
        assert!(SuitabilityClass::High > SuitabilityClass::Medium);
        assert!(SuitabilityClass::Medium > SuitabilityClass::Low);
    }

    #[test]
    fn test_class_serializes_with_space() {
        let json = serde_json::to_string(&SuitabilityClass::VeryHigh).unwrap();
        assert_eq!(json, "\"Very High\"");
        let parsed: SuitabilityClass = serde_json::from_str("\"Very High\"").unwrap();
        assert_eq!(parsed, SuitabilityClass::VeryHigh);
        assert_eq!(SuitabilityClass::VeryHigh.to_string(), "Very High");
    }

    #[test]
    fn test_rank_is_stable_and_capped() {
        let input = vec![
            prediction("A", 0.5),
            prediction("B", 0.9),
            prediction("C", 0.5),
            prediction("D", 0.7),
            prediction("E", 0.1),
            prediction("F", 0.3),
            prediction("G", 0.8),
        ];
        let ranked = rank_predictions(input);
        let names: Vec<&str> = ranked.iter().map(|p| p.crop.as_str()).collect();
        assert_eq!(names, vec!["B", "G", "D", "A", "C", "F"]);
    }

    #[test]
    fn test_result_uses_fallback_field_name() {
        let result = PredictionResult {
            predictions: vec![],
            weather: None,
            location: PredictionLocation {
                state: "Maharashtra".to_string(),
                district: "Pune".to_string(),
                soil_type: "black".to_string(),
            },
            is_from_fallback: true,
            timestamp: Utc::now(),
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["isFromFallback"], serde_json::Value::Bool(true));
        assert_eq!(value["location"]["soil_type"], "black");
        assert!(value.get("weather").is_none());
    }

    #[test]
    fn test_from_remote_keeps_requested_location_when_missing() {
        let remote = RemotePrediction {
            predictions: vec![prediction("Rice", 0.4), prediction("Cotton", 0.8)],
            weather: None,
            location: None,
        };
        let requested = PredictionLocation {
            state: "Maharashtra".to_string(),
            district: "Nagpur".to_string(),
            soil_type: "black".to_string(),
        };
        let result = PredictionResult::from_remote(remote, requested.clone(), Utc::now());
        assert!(!result.is_from_fallback);
        assert_eq!(result.location, requested);
        assert_eq!(result.predictions[0].crop, "Cotton");
    }

    mod ranking_properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn ranked_list_is_capped_sorted_and_stable(
                confidences in proptest::collection::vec(0u8..=20, 0..15),
            ) {
                let input: Vec<CropPrediction> = confidences
                    .iter()
                    .enumerate()
                    .map(|(i, c)| prediction(&i.to_string(), f64::from(*c) / 20.0))
                    .collect();
                let ranked = rank_predictions(input.clone());

                prop_assert_eq!(ranked.len(), input.len().min(MAX_PREDICTIONS));
                for pair in ranked.windows(2) {
                    prop_assert!(pair[0].confidence >= pair[1].confidence);
                    if pair[0].confidence == pair[1].confidence {
                        let a: usize = pair[0].crop.parse().unwrap();
                        let b: usize = pair[1].crop.parse().unwrap();
                        prop_assert!(a < b);
                    }
                }
                if let (Some(last), Some(max_dropped)) = (
                    ranked.last(),
                    input
                        .iter()
                        .filter(|p| !ranked.contains(p))
                        .map(|p| p.confidence)
                        .reduce(f64::max),
                ) {
                    prop_assert!(last.confidence >= max_dropped);
                }
            }
        }
    }
}
