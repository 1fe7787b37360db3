//! Indian agricultural seasons

use chrono::{DateTime, Datelike, Local, TimeZone};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ReferenceError;

/// Sowing season resolved from the calendar
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    /// Monsoon sowing, June - October
    Kharif,
    /// Winter sowing, November - March
    Rabi,
    /// Short summer cycle, April - May
    Zaid,
}

impl Season {
    pub const ALL: [Season; 3] = [Season::Kharif, Season::Rabi, Season::Zaid];

    /// Resolve the season for a 1-indexed calendar month.
    ///
    /// Out-of-range values wrap modulo 12, with 0 read as December, so every
    /// input maps to exactly one season.
    pub fn from_month(month: u32) -> Self {
        match month % 12 {
            6..=10 => Season::Kharif,
            11 | 0..=3 => Season::Rabi,
            _ => Season::Zaid,
        }
    }

    /// Season for a date in the farmer's own time zone
    pub fn for_date<Tz: TimeZone>(date: &DateTime<Tz>) -> Self {
        Self::from_month(date.month())
    }

    /// Season for today's date on the local clock
    pub fn current() -> Self {
        Self::for_date(&Local::now())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Kharif => "kharif",
            Season::Rabi => "rabi",
            Season::Zaid => "zaid",
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Season {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kharif" => Ok(Season::Kharif),
            "rabi" => Ok(Season::Rabi),
            "zaid" => Ok(Season::Zaid),
            _ => Err(ReferenceError::UnknownSeason(s.to_string())),
        }
    }
}

/// Growing season recorded on a crop profile
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CropSeason {
    Kharif,
    Rabi,
    Zaid,
    /// Standing crop, in the field year-round
    Perennial,
    /// Can be sown in any season
    All,
}

impl CropSeason {
    /// True when a crop of this season can be planted in `season`
    pub fn matches(&self, season: Season) -> bool {
        match self {
            CropSeason::Perennial | CropSeason::All => true,
            CropSeason::Kharif => season == Season::Kharif,
            CropSeason::Rabi => season == Season::Rabi,
            CropSeason::Zaid => season == Season::Zaid,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CropSeason::Kharif => "kharif",
            CropSeason::Rabi => "rabi",
            CropSeason::Zaid => "zaid",
            CropSeason::Perennial => "perennial",
            CropSeason::All => "all",
        }
    }
}

impl std::fmt::Display for CropSeason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
