//! Soil type models

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ReferenceError;

/// Major Indian soil groups
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum SoilKind {
    Alluvial,
    #[default]
    Black,
    Red,
    Laterite,
    Desert,
    Mountain,
    Saline,
}

impl SoilKind {
    pub const ALL: [SoilKind; 7] = [
        SoilKind::Alluvial,
        SoilKind::Black,
        SoilKind::Red,
        SoilKind::Laterite,
        SoilKind::Desert,
        SoilKind::Mountain,
        SoilKind::Saline,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SoilKind::Alluvial => "alluvial",
            SoilKind::Black => "black",
            SoilKind::Red => "red",
            SoilKind::Laterite => "laterite",
            SoilKind::Desert => "desert",
            SoilKind::Mountain => "mountain",
            SoilKind::Saline => "saline",
        }
    }
}

impl std::fmt::Display for SoilKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SoilKind {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        SoilKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| ReferenceError::UnknownSoilType(s.to_string()))
    }
}

/// Three-step qualitative scale used for fertility and water retention
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Low,
    Medium,
    High,
}

/// Agronomic description of a soil group
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SoilType {
    pub name: String,
    pub description: String,
    pub fertility: Level,
    /// Crop names or category tags this soil favors
    pub suitable_crops: Vec<String>,
    pub regions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub water_retention: Option<Level>,
}
