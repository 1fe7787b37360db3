//! Business logic services for the Shetkari Mitra gateway

pub mod prediction;

pub use prediction::CropPredictionService;
