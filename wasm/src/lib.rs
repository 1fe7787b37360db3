//! WebAssembly module for the Shetkari Mitra crop advisor
//!
//! Provides client-side computation for:
//! - Current agricultural season
//! - Offline crop suitability predictions
//! - District and state lookups from the bundled tables
//! - Mandi dashboard filter cascade

use chrono::Utc;
use shared::{
    FallbackPredictor, MandiSelection, RandomSource, ReferenceData, Season, SeededRandom, SoilKind,
};
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;

/// Jitter from the browser's `Math.random`
struct JsRandom;

impl RandomSource for JsRandom {
    fn next_float(&mut self, min: f64, max: f64) -> f64 {
        if max <= min {
            return min;
        }
        min + js_sys::Math::random() * (max - min)
    }
}

fn season_for(month: Option<u32>) -> Season {
    month.map(Season::from_month).unwrap_or_else(Season::current)
}

fn run_offline(
    state: &str,
    district: &str,
    soil_type: &str,
    season: Season,
    rng: &mut dyn RandomSource,
) -> Result<String, JsValue> {
    let reference = ReferenceData::builtin();
    let result = FallbackPredictor::new(&reference)
        .with_default_soil(SoilKind::default())
        .predict(state, district, soil_type, season, rng, Utc::now());
    serde_json::to_string(&result)
        .map_err(|e| JsValue::from_str(&format!("Failed to encode predictions: {}", e)))
}

/// Season for a calendar month (1 = January)
#[wasm_bindgen]
pub fn current_season_for_month(month: u32) -> String {
    Season::from_month(month).to_string()
}

/// Predict crops without network access.
///
/// `month` (1 = January) defaults to the current month when omitted.
#[wasm_bindgen]
pub fn predict_offline(
    state: &str,
    district: &str,
    soil_type: &str,
    month: Option<u32>,
) -> Result<String, JsValue> {
    run_offline(state, district, soil_type, season_for(month), &mut JsRandom)
}

/// Reproducible offline prediction for a given seed
#[wasm_bindgen]
pub fn predict_offline_seeded(
    state: &str,
    district: &str,
    soil_type: &str,
    month: u32,
    seed: u64,
) -> Result<String, JsValue> {
    run_offline(
        state,
        district,
        soil_type,
        Season::from_month(month),
        &mut SeededRandom::from_seed_u64(seed),
    )
}

/// States with bundled district data, as a JSON array
#[wasm_bindgen]
pub fn list_states() -> String {
    serde_json::to_string(&ReferenceData::builtin().state_names()).unwrap_or_else(|_| "[]".into())
}

/// Districts of a state as a JSON array; empty for an unknown state
#[wasm_bindgen]
pub fn list_districts(state: &str) -> String {
    serde_json::to_string(&ReferenceData::builtin().district_names(state))
        .unwrap_or_else(|_| "[]".into())
}

/// Valid mandi selection for the bundled filter table, as JSON
#[wasm_bindgen]
pub fn resolve_mandi_selection(district: &str, market: &str, crop: &str) -> Result<String, JsValue> {
    let requested = MandiSelection {
        district: district.to_string(),
        market: market.to_string(),
        crop: crop.to_string(),
    };
    let cascade = ReferenceData::builtin().mandi_filters().resolve(&requested);
    serde_json::to_string(&cascade)
        .map_err(|e| JsValue::from_str(&format!("Failed to encode selection: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_for_month() {
        assert_eq!(current_season_for_month(7), "kharif");
        assert_eq!(current_season_for_month(1), "rabi");
        assert_eq!(current_season_for_month(4), "zaid");
        assert_eq!(current_season_for_month(12), "rabi");
    }

    #[test]
    fn test_seeded_prediction_is_reproducible() {
        let first = predict_offline_seeded("Maharashtra", "Pune", "black", 7, 42).unwrap();
        let second = predict_offline_seeded("Maharashtra", "Pune", "black", 7, 42).unwrap();

        let a: PredictionResult = serde_json::from_str(&first).unwrap();
        let b: PredictionResult = serde_json::from_str(&second).unwrap();
        assert_eq!(a.predictions, b.predictions);
        assert!(a.is_from_fallback);
        assert!(!a.predictions.is_empty() && a.predictions.len() <= 6);
    }

    #[test]
    fn test_seeded_prediction_unknown_district() {
        let json = predict_offline_seeded("Maharashtra", "Atlantis", "black", 1, 42).unwrap();
        let result: PredictionResult = serde_json::from_str(&json).unwrap();
        assert!(result.predictions.is_empty());
        assert!(result.weather.is_some());
    }

    #[test]
    fn test_lookups() {
        let states: Vec<String> = serde_json::from_str(&list_states()).unwrap();
        assert_eq!(states, vec!["Maharashtra".to_string()]);

        let districts: Vec<String> = serde_json::from_str(&list_districts("Maharashtra")).unwrap();
        assert!(districts.contains(&"Nashik".to_string()));
        assert_eq!(list_districts("Goa"), "[]");
    }

    #[test]
    fn test_mandi_selection() {
        let json = resolve_mandi_selection("Solapur", "Rahata", "Tur").unwrap();
        let cascade: MandiCascade = serde_json::from_str(&json).unwrap();
        assert_eq!(cascade.selection.market, "Pandharpur");
        assert_eq!(cascade.selection.crop, "Maize");
    }
}
