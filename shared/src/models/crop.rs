//! Crop agronomic profiles

use serde::{Deserialize, Serialize};

use super::{CropSeason, SoilKind};
use crate::types::Language;

/// Crop category
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CropCategory {
    Cereal,
    Oilseed,
    Pulse,
    Vegetable,
    Fruit,
    CashCrop,
}

impl CropCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            CropCategory::Cereal => "cereal",
            CropCategory::Oilseed => "oilseed",
            CropCategory::Pulse => "pulse",
            CropCategory::Vegetable => "vegetable",
            CropCategory::Fruit => "fruit",
            CropCategory::CashCrop => "cash_crop",
        }
    }

    /// Human label, e.g. "cash crop"
    pub fn label(&self) -> String {
        self.as_str().replacen('_', " ", 1)
    }
}

impl std::fmt::Display for CropCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference profile for a crop
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CropProfile {
    pub name: String,
    pub category: CropCategory,
    pub season: CropSeason,
    pub temp_min: f64,
    pub temp_max: f64,
    pub temp_optimal: f64,
    pub rainfall_min: f64,
    pub rainfall_max: f64,
    /// Name in the local (Marathi) script
    #[serde(rename = "hindi_name")]
    pub local_name: String,
    pub soil_types: Vec<SoilKind>,
}

impl CropProfile {
    /// True when `soil_id` is one of this crop's compatible soils.
    ///
    /// Comparison is exact against the lowercase identifiers, so an unknown
    /// identifier never matches.
    pub fn grows_in(&self, soil_id: &str) -> bool {
        self.soil_types.iter().any(|soil| soil.as_str() == soil_id)
    }

    pub fn display_name(&self, language: Language) -> &str {
        match language {
            Language::Marathi => &self.local_name,
            Language::English => &self.name,
        }
    }
}
