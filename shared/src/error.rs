//! Errors raised while interpreting reference identifiers and prediction payloads

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReferenceError {
    #[error("Unknown soil type: {0}")]
    UnknownSoilType(String),

    #[error("Unknown season: {0}")]
    UnknownSeason(String),

    #[error("Invalid prediction for {crop}: {reason}")]
    InvalidPrediction { crop: String, reason: &'static str },
}
