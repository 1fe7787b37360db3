//! District location models

use serde::{Deserialize, Serialize};

use crate::types::GpsCoordinates;

/// Location and climate class of a district
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DistrictInfo {
    pub name: String,
    #[serde(flatten)]
    pub coordinates: GpsCoordinates,
    /// Free-form climate tag, e.g. "semi_arid"
    pub climate: String,
}

/// Districts of one state, in table order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StateDistricts {
    pub state: String,
    pub districts: Vec<DistrictInfo>,
}
