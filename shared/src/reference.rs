//! Compiled-in reference tables for soils, districts, crops and mandi filters
//!
//! The tables are built once into a [`ReferenceData`] value and then only read.
//! Crop order is significant: it breaks ties when ranking equal confidences.

use std::collections::BTreeMap;

use crate::models::{
    CropCategory, CropProfile, CropSeason, DistrictInfo, Level, MandiFilters, SoilKind, SoilType,
    StateDistricts,
};
use crate::types::GpsCoordinates;

/// Immutable soils, districts, crops and mandi datasets
#[derive(Debug, Clone)]
pub struct ReferenceData {
    soils: BTreeMap<SoilKind, SoilType>,
    states: Vec<StateDistricts>,
    crops: Vec<CropProfile>,
    mandi: MandiFilters,
}

impl ReferenceData {
    pub fn new(
        soils: BTreeMap<SoilKind, SoilType>,
        states: Vec<StateDistricts>,
        crops: Vec<CropProfile>,
        mandi: MandiFilters,
    ) -> Self {
        Self {
            soils,
            states,
            crops,
            mandi,
        }
    }

    /// The datasets shipped with the application
    pub fn builtin() -> Self {
        Self::new(
            builtin_soils(),
            builtin_states(),
            builtin_crops(),
            builtin_mandi_filters(),
        )
    }

    pub fn soil(&self, kind: SoilKind) -> Option<&SoilType> {
        self.soils.get(&kind)
    }

    /// Look up a soil by its lowercase identifier, e.g. "black"
    pub fn soil_by_id(&self, soil_id: &str) -> Option<&SoilType> {
        SoilKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == soil_id)
            .and_then(|kind| self.soil(kind))
    }

    /// Soil table keyed by identifier, the shape served to clients
    pub fn soil_catalog(&self) -> BTreeMap<String, SoilType> {
        self.soils
            .iter()
            .map(|(kind, soil)| (kind.as_str().to_string(), soil.clone()))
            .collect()
    }

    pub fn state_names(&self) -> Vec<String> {
        self.states.iter().map(|s| s.state.clone()).collect()
    }

    /// District names for a state; empty for an unknown state
    pub fn district_names(&self, state: &str) -> Vec<String> {
        self.states
            .iter()
            .find(|s| s.state == state)
            .map(|s| s.districts.iter().map(|d| d.name.clone()).collect())
            .unwrap_or_default()
    }

    /// Exact, case-sensitive (state, district) lookup
    pub fn district(&self, state: &str, district: &str) -> Option<&DistrictInfo> {
        self.states
            .iter()
            .find(|s| s.state == state)
            .and_then(|s| s.districts.iter().find(|d| d.name == district))
    }

    pub fn crops(&self) -> &[CropProfile] {
        &self.crops
    }

    pub fn crop(&self, name: &str) -> Option<&CropProfile> {
        self.crops.iter().find(|c| c.name == name)
    }

    /// District -> market -> commodity table for the price dashboard
    pub fn mandi_filters(&self) -> &MandiFilters {
        &self.mandi
    }
}

impl Default for ReferenceData {
    fn default() -> Self {
        Self::builtin()
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn soil(
    name: &str,
    description: &str,
    fertility: Level,
    suitable_crops: &[&str],
    regions: &[&str],
    water_retention: Level,
) -> SoilType {
    SoilType {
        name: name.to_string(),
        description: description.to_string(),
        fertility,
        suitable_crops: strings(suitable_crops),
        regions: strings(regions),
        water_retention: Some(water_retention),
    }
}

fn builtin_soils() -> BTreeMap<SoilKind, SoilType> {
    BTreeMap::from([
        (
            SoilKind::Alluvial,
            soil(
                "Alluvial Soil",
                "Found in river valleys and deltas, highly fertile",
                Level::High,
                &["wheat", "rice", "sugarcane", "cotton", "maize", "pulses", "vegetables"],
                &["Punjab", "Haryana", "Uttar Pradesh", "Bihar", "West Bengal"],
                Level::Medium,
            ),
        ),
        (
            SoilKind::Black,
            soil(
                "Black Soil (Regur)",
                "Also called black cotton soil, rich in clay and retains moisture",
                Level::High,
                &["cotton", "soybean", "sorghum", "wheat", "groundnut", "sunflower", "citrus"],
                &["Maharashtra", "Gujarat", "Madhya Pradesh", "Karnataka"],
                Level::High,
            ),
        ),
        (
            SoilKind::Red,
            soil(
                "Red Soil",
                "Rich in iron content, found in tropical regions",
                Level::Medium,
                &["groundnut", "millets", "tobacco", "vegetables", "fruits", "pulses"],
                &["Tamil Nadu", "Karnataka", "Andhra Pradesh", "Odisha"],
                Level::Low,
            ),
        ),
        (
            SoilKind::Laterite,
            soil(
                "Laterite Soil",
                "Formed in hot and wet tropical areas, acidic in nature",
                Level::Low,
                &["tea", "coffee", "rubber", "cashew", "coconut", "tapioca"],
                &["Kerala", "Karnataka", "Maharashtra", "Goa"],
                Level::Low,
            ),
        ),
        (
            SoilKind::Desert,
            soil(
                "Desert Soil (Arid)",
                "Sandy with low organic matter, found in arid regions",
                Level::Low,
                &["barley", "dates", "cotton", "millets"],
                &["Rajasthan", "Gujarat"],
                Level::Low,
            ),
        ),
        (
            SoilKind::Mountain,
            soil(
                "Mountain Soil",
                "Found in hilly regions, rich in humus",
                Level::Medium,
                &["tea", "coffee", "spices", "fruits", "vegetables"],
                &["Himachal Pradesh", "Uttarakhand", "Jammu Kashmir"],
                Level::Medium,
            ),
        ),
        (
            SoilKind::Saline,
            soil(
                "Saline/Alkaline Soil",
                "High salt content, found in coastal and arid areas",
                Level::Low,
                &["rice", "sugarbeet", "cotton"],
                &["Gujarat", "Rajasthan", "Punjab", "Coastal areas"],
                Level::Low,
            ),
        ),
    ])
}

fn district(name: &str, lat: f64, lon: f64, climate: &str) -> DistrictInfo {
    DistrictInfo {
        name: name.to_string(),
        coordinates: GpsCoordinates::new(lat, lon),
        climate: climate.to_string(),
    }
}

fn builtin_states() -> Vec<StateDistricts> {
    vec![StateDistricts {
        state: "Maharashtra".to_string(),
        districts: vec![
            district("Mumbai", 19.076, 72.8777, "tropical_wet"),
            district("Pune", 18.5204, 73.8567, "semi_arid"),
            district("Nashik", 19.9975, 73.7898, "semi_arid"),
            district("Nagpur", 21.1458, 79.0882, "tropical_wet_dry"),
            district("Aurangabad", 19.8762, 75.3433, "semi_arid"),
            district("Solapur", 17.6599, 75.9064, "semi_arid"),
            district("Kolhapur", 16.705, 74.2433, "tropical_wet"),
            district("Ahmednagar", 19.0948, 74.7480, "semi_arid"),
            district("Satara", 17.6805, 74.0183, "semi_arid"),
            district("Sangli", 16.8524, 74.5815, "semi_arid"),
            district("Jalgaon", 21.0077, 75.5626, "semi_arid"),
            district("Latur", 18.4088, 76.5604, "semi_arid"),
            district("Amravati", 20.9374, 77.7796, "tropical_wet_dry"),
            district("Akola", 20.7002, 77.0082, "semi_arid"),
            district("Buldhana", 20.5292, 76.1842, "semi_arid"),
            district("Yavatmal", 20.3888, 78.1204, "tropical_wet_dry"),
            district("Wardha", 20.7453, 78.5985, "tropical_wet_dry"),
            district("Chandrapur", 19.9615, 79.2961, "tropical_wet_dry"),
            district("Nanded", 19.1383, 77.3210, "semi_arid"),
            district("Parbhani", 19.2704, 76.7604, "semi_arid"),
            district("Beed", 18.9891, 75.7601, "semi_arid"),
            district("Jalna", 19.8347, 75.8802, "semi_arid"),
        ],
    }]
}

fn crop(
    name: &str,
    category: CropCategory,
    season: CropSeason,
    (temp_min, temp_max, temp_optimal): (f64, f64, f64),
    (rainfall_min, rainfall_max): (f64, f64),
    local_name: &str,
    soil_types: &[SoilKind],
) -> CropProfile {
    CropProfile {
        name: name.to_string(),
        category,
        season,
        temp_min,
        temp_max,
        temp_optimal,
        rainfall_min,
        rainfall_max,
        local_name: local_name.to_string(),
        soil_types: soil_types.to_vec(),
    }
}

fn builtin_crops() -> Vec<CropProfile> {
    use CropCategory::*;
    use SoilKind::*;

    vec![
        crop("Wheat", Cereal, CropSeason::Rabi, (10.0, 25.0, 18.0), (50.0, 100.0), "गहू", &[Alluvial, Black, Red]),
        crop("Rice", Cereal, CropSeason::Kharif, (20.0, 35.0, 25.0), (150.0, 300.0), "तांदूळ", &[Alluvial, Black, Laterite]),
        crop("Cotton", CashCrop, CropSeason::Kharif, (21.0, 35.0, 28.0), (50.0, 100.0), "कापूस", &[Black, Alluvial, Red]),
        crop("Soybean", Oilseed, CropSeason::Kharif, (20.0, 32.0, 26.0), (60.0, 100.0), "सोयाबीन", &[Black, Alluvial]),
        crop("Sugarcane", CashCrop, CropSeason::Perennial, (20.0, 35.0, 28.0), (75.0, 150.0), "ऊस", &[Alluvial, Black]),
        crop("Onion", Vegetable, CropSeason::Rabi, (13.0, 30.0, 20.0), (50.0, 75.0), "कांदा", &[Alluvial, Red, Black]),
        crop("Tomato", Vegetable, CropSeason::All, (15.0, 32.0, 24.0), (40.0, 60.0), "टोमॅटो", &[Alluvial, Red, Black]),
        crop("Pomegranate", Fruit, CropSeason::Perennial, (18.0, 35.0, 28.0), (50.0, 80.0), "डाळिंब", &[Black, Red, Alluvial]),
        crop("Groundnut", Oilseed, CropSeason::Kharif, (22.0, 32.0, 27.0), (50.0, 100.0), "शेंगदाणे", &[Red, Alluvial, Black]),
        crop("Jowar", Cereal, CropSeason::Kharif, (25.0, 35.0, 30.0), (40.0, 60.0), "ज्वारी", &[Black, Red, Alluvial]),
        crop("Bajra", Cereal, CropSeason::Kharif, (25.0, 38.0, 32.0), (30.0, 50.0), "बाजरी", &[Red, Desert, Alluvial]),
        crop("Maize", Cereal, CropSeason::Kharif, (18.0, 32.0, 25.0), (60.0, 110.0), "मका", &[Alluvial, Red, Black]),
        crop("Grapes", Fruit, CropSeason::Perennial, (15.0, 35.0, 25.0), (50.0, 90.0), "द्राक्षे", &[Black, Alluvial, Red]),
        crop("Banana", Fruit, CropSeason::Perennial, (20.0, 35.0, 27.0), (100.0, 200.0), "केळी", &[Alluvial, Laterite, Black]),
        crop("TurDal", Pulse, CropSeason::Kharif, (20.0, 35.0, 28.0), (60.0, 100.0), "तूर डाळ", &[Black, Red, Alluvial]),
    ]
}

fn markets(entries: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
    entries
        .iter()
        .map(|(market, crops)| (market.to_string(), strings(crops)))
        .collect()
}

fn builtin_mandi_filters() -> MandiFilters {
    MandiFilters::new(BTreeMap::from([
        (
            "Ahmednagar".to_string(),
            markets(&[
                ("Rahata", &["Tomato", "Onion", "Soybean", "Wheat", "Pomegranate"]),
                ("Kopargaon", &["Tomato", "Onion", "Soybean", "Maize"]),
                ("Sangamner", &["Tomato", "Onion", "Pomegranate"]),
            ]),
        ),
        (
            "Pune".to_string(),
            markets(&[
                ("Pune", &["Tomato", "Onion", "Potato", "Ginger", "Garlic"]),
                ("Manchar", &["Tomato", "Onion", "Potato"]),
                ("Junnar", &["Tomato", "Onion", "Banana"]),
            ]),
        ),
        (
            "Nashik".to_string(),
            markets(&[
                ("Nashik", &["Onion", "Tomato", "Grapes", "Pomegranate"]),
                ("Lasalgaon", &["Onion", "Tomato", "Maize"]),
                ("Yeola", &["Onion", "Tomato", "Maize"]),
            ]),
        ),
        (
            "Solapur".to_string(),
            markets(&[
                ("Solapur", &["Onion", "Maize", "Pomegranate", "Tur"]),
                ("Pandharpur", &["Maize", "Jowar", "Pomegranate"]),
            ]),
        ),
    ]))
}
