//! Crop suitability scoring and the on-device fallback predictor
//!
//! Used when the remote prediction service cannot answer. Every crop in the
//! reference table that is plausible for the soil is scored from two facts:
//! does it grow in this soil, and can it be sown this season. Confidence is
//! jittered inside a fixed band per combination, so randomness is injected
//! through [`RandomSource`] to keep results reproducible in tests.

use chrono::{DateTime, Utc};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::models::{
    rank_predictions, CropPrediction, CropProfile, PredictionLocation, PredictionResult, Season,
    SoilKind, SuitabilityClass, WeatherSnapshot,
};
use crate::reference::ReferenceData;

// ============================================================================
// Randomness
// ============================================================================

/// Source of uniform jitter
pub trait RandomSource {
    /// A value in `[min, max)`; returns `min` for an empty range
    fn next_float(&mut self, min: f64, max: f64) -> f64;
}

/// Adapts any `rand` generator
pub struct RngSource<R>(pub R);

impl<R: RngCore> RandomSource for RngSource<R> {
    fn next_float(&mut self, min: f64, max: f64) -> f64 {
        if max <= min {
            return min;
        }
        self.0.gen_range(min..max)
    }
}

/// Deterministic source for replays and tests
pub type SeededRandom = RngSource<ChaCha8Rng>;

impl RngSource<ChaCha8Rng> {
    pub fn from_seed_u64(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }
}

/// Frozen source: always lands at the same relative position of the range
#[derive(Debug, Clone, Copy)]
pub struct FixedRandom {
    fraction: f64,
}

impl FixedRandom {
    /// `fraction` is clamped into `[0, 1)`
    pub fn new(fraction: f64) -> Self {
        let fraction = if fraction.is_finite() {
            fraction.clamp(0.0, 1.0 - f64::EPSILON)
        } else {
            0.0
        };
        Self { fraction }
    }

    /// Always returns the lower bound
    pub fn lowest() -> Self {
        Self::new(0.0)
    }
}

impl RandomSource for FixedRandom {
    fn next_float(&mut self, min: f64, max: f64) -> f64 {
        if max <= min {
            return min;
        }
        min + self.fraction * (max - min)
    }
}

// ============================================================================
// Mock weather
// ============================================================================

/// Plausible conditions for a season, used when no live weather is available.
///
/// `None` yields fixed moderate values without jitter.
pub fn mock_weather(season: Option<Season>, rng: &mut dyn RandomSource) -> WeatherSnapshot {
    let (temperature, humidity, rainfall, description) = match season {
        Some(Season::Kharif) => (
            rng.next_float(28.0, 33.0),
            rng.next_float(70.0, 85.0),
            rng.next_float(80.0, 130.0),
            "Monsoon season - good for Kharif crops",
        ),
        Some(Season::Rabi) => (
            rng.next_float(18.0, 26.0),
            rng.next_float(50.0, 65.0),
            rng.next_float(10.0, 30.0),
            "Winter season - ideal for Rabi crops",
        ),
        Some(Season::Zaid) => (
            rng.next_float(32.0, 40.0),
            rng.next_float(40.0, 60.0),
            rng.next_float(5.0, 20.0),
            "Summer season - suitable for short-duration crops",
        ),
        None => (25.0, 60.0, 30.0, "Moderate weather conditions"),
    };

    WeatherSnapshot {
        temperature,
        humidity,
        rainfall,
        description: description.to_string(),
    }
}

// ============================================================================
// Scoring
// ============================================================================

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Whether a crop enters the candidate pool for a soil at all.
///
/// Either the soil is in the crop's compatible set, or one of the soil's
/// favored tags appears inside the crop's category tag or lower-cased name.
pub fn is_candidate(crop: &CropProfile, favored: &[String], soil_match: bool) -> bool {
    if soil_match {
        return true;
    }
    let name = crop.name.to_lowercase();
    let category = crop.category.as_str();
    favored
        .iter()
        .any(|tag| category.contains(tag.as_str()) || name.contains(tag.as_str()))
}

/// Score one crop.
///
/// `soil_label` is the soil's display name, used in the soil reason.
pub fn score_crop(
    crop: &CropProfile,
    soil_label: &str,
    season: Season,
    soil_match: bool,
    season_match: bool,
    rng: &mut dyn RandomSource,
) -> CropPrediction {
    let class = SuitabilityClass::for_matches(soil_match, season_match);
    let (low, high) = class.confidence_band();
    let confidence = round2(rng.next_float(low, high)).clamp(0.0, 1.0);

    let mut reasons = Vec::with_capacity(4);
    if soil_match {
        reasons.push(format!("Suitable for {} soil", soil_label));
    }
    if season_match {
        reasons.push(format!("Ideal for {} season planting", season));
    }
    reasons.push(format!(
        "Optimal temperature: {}-{}°C",
        crop.temp_min, crop.temp_max
    ));
    reasons.push(format!("Category: {}", crop.category.label()));

    CropPrediction {
        crop: crop.name.clone(),
        suitability_class: class,
        confidence,
        season: crop.season.as_str().to_string(),
        category: crop.category.as_str().to_string(),
        hindi_name: Some(crop.local_name.clone()),
        reasons,
    }
}

// ============================================================================
// Fallback predictor
// ============================================================================

/// Synthesizes predictions from the reference tables alone
#[derive(Debug, Clone, Copy)]
pub struct FallbackPredictor<'a> {
    reference: &'a ReferenceData,
    default_soil: SoilKind,
}

impl<'a> FallbackPredictor<'a> {
    pub fn new(reference: &'a ReferenceData) -> Self {
        Self {
            reference,
            default_soil: SoilKind::default(),
        }
    }

    /// Soil whose favored list drives inclusion when the requested one is unknown
    pub fn with_default_soil(mut self, soil: SoilKind) -> Self {
        self.default_soil = soil;
        self
    }

    /// Every plausible crop for the soil, scored, in reference-table order.
    ///
    /// An unknown `soil_id` matches no crop's soil set; the default soil's
    /// favored list then decides inclusion, so candidates score Medium or Low.
    pub fn candidates(
        &self,
        soil_id: &str,
        season: Season,
        rng: &mut dyn RandomSource,
    ) -> Vec<CropPrediction> {
        let soil = self.reference.soil_by_id(soil_id);
        let favored = soil
            .or_else(|| self.reference.soil(self.default_soil))
            .map(|s| s.suitable_crops.as_slice())
            .unwrap_or_default();
        let soil_label = soil.map(|s| s.name.as_str()).unwrap_or(soil_id);

        self.reference
            .crops()
            .iter()
            .filter_map(|crop| {
                let soil_match = crop.grows_in(soil_id);
                if !is_candidate(crop, favored, soil_match) {
                    return None;
                }
                let season_match = crop.season.matches(season);
                Some(score_crop(
                    crop,
                    soil_label,
                    season,
                    soil_match,
                    season_match,
                    &mut *rng,
                ))
            })
            .collect()
    }

    /// Full fallback result for a location.
    ///
    /// A (state, district) pair missing from the district table yields an
    /// empty prediction list; weather is attached either way.
    pub fn predict(
        &self,
        state: &str,
        district: &str,
        soil_id: &str,
        season: Season,
        rng: &mut dyn RandomSource,
        timestamp: DateTime<Utc>,
    ) -> PredictionResult {
        let predictions = if self.reference.district(state, district).is_some() {
            rank_predictions(self.candidates(soil_id, season, rng))
        } else {
            Vec::new()
        };

        PredictionResult {
            predictions,
            weather: Some(mock_weather(Some(season), rng)),
            location: PredictionLocation {
                state: state.to_string(),
                district: district.to_string(),
                soil_type: soil_id.to_string(),
            },
            is_from_fallback: true,
            timestamp,
        }
    }
}
