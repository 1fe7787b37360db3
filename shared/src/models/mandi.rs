//! Mandi (market yard) filter models
//!
//! The price dashboard narrows district -> market -> commodity. A selection
//! that no longer exists in the current filter table is re-pointed at the
//! first valid market and then the first valid commodity.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Commodities traded per market, per district
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct MandiFilters {
    districts: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

/// District, market and commodity picked on the dashboard; empty means none
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MandiSelection {
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub market: String,
    #[serde(default)]
    pub crop: String,
}

/// Dropdown contents and the valid selection they imply
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MandiCascade {
    pub districts: Vec<String>,
    pub markets: Vec<String>,
    pub crops: Vec<String>,
    pub selection: MandiSelection,
}

impl MandiFilters {
    pub fn new(districts: BTreeMap<String, BTreeMap<String, Vec<String>>>) -> Self {
        Self { districts }
    }

    pub fn is_empty(&self) -> bool {
        self.districts.is_empty()
    }

    pub fn district_names(&self) -> Vec<String> {
        self.districts.keys().cloned().collect()
    }

    /// Markets of a district in name order; empty for an unknown district
    pub fn market_names(&self, district: &str) -> Vec<String> {
        self.districts
            .get(district)
            .map(|markets| markets.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Commodities of a market in table order
    pub fn commodities(&self, district: &str, market: &str) -> &[String] {
        self.districts
            .get(district)
            .and_then(|markets| markets.get(market))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Turn a possibly stale selection into a valid one.
    ///
    /// A known district keeps its market and commodity when they are still
    /// listed, otherwise the first market and then its first commodity are
    /// chosen. An unknown district yields an empty selection and no markets.
    pub fn resolve(&self, requested: &MandiSelection) -> MandiCascade {
        let districts = self.district_names();
        if !self.districts.contains_key(&requested.district) {
            return MandiCascade {
                districts,
                ..MandiCascade::default()
            };
        }

        let markets = self.market_names(&requested.district);
        let market = pick(&markets, &requested.market);
        let crops = self.commodities(&requested.district, &market).to_vec();
        let crop = pick(&crops, &requested.crop);

        MandiCascade {
            districts,
            markets,
            crops,
            selection: MandiSelection {
                district: requested.district.clone(),
                market,
                crop,
            },
        }
    }
}

/// Keep `current` if offered, else fall to the first option, else nothing
fn pick(options: &[String], current: &str) -> String {
    if options.iter().any(|o| o == current) {
        current.to_string()
    } else {
        options.first().cloned().unwrap_or_default()
    }
}
