//! Weather data models

use serde::{Deserialize, Serialize};

/// Weather conditions attached to a prediction
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherSnapshot {
    pub temperature: f64,
    pub humidity: f64,
    pub rainfall: f64,
    pub description: String,
}
