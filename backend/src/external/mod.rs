//! External API integrations

pub mod prediction_api;

pub use prediction_api::{PredictionApiClient, PredictionApiError};
