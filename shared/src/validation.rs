//! Validation utilities for crop predictions
//!
//! Remote prediction bodies are checked here before they are trusted, and
//! locally scored predictions can be checked against their class band.

use crate::error::ReferenceError;
use crate::models::{CropPrediction, RemotePrediction, SuitabilityClass, MAX_PREDICTIONS};

// ============================================================================
// Prediction Validations
// ============================================================================

/// Validate that a confidence value is a finite number in [0, 1]
pub fn validate_confidence(confidence: f64) -> Result<(), &'static str> {
    if !confidence.is_finite() {
        return Err("Confidence must be a finite number");
    }
    if !(0.0..=1.0).contains(&confidence) {
        return Err("Confidence must be between 0 and 1");
    }
    Ok(())
}

/// Validate a single prediction coming from outside the process
pub fn validate_prediction(prediction: &CropPrediction) -> Result<(), ReferenceError> {
    if prediction.crop.trim().is_empty() {
        return Err(ReferenceError::InvalidPrediction {
            crop: prediction.crop.clone(),
            reason: "Crop name must not be empty",
        });
    }
    validate_confidence(prediction.confidence).map_err(|reason| {
        ReferenceError::InvalidPrediction {
            crop: prediction.crop.clone(),
            reason,
        }
    })
}

/// Validate every prediction in a remote service body
pub fn validate_remote_prediction(remote: &RemotePrediction) -> Result<(), ReferenceError> {
    remote.predictions.iter().try_for_each(validate_prediction)
}

/// Check that a locally scored prediction sits inside its class band.
///
/// The band's upper bound is inclusive because confidences are rounded to two
/// decimals after being drawn.
pub fn class_matches_confidence(class: SuitabilityClass, confidence: f64) -> bool {
    let (low, high) = class.confidence_band();
    confidence >= low && confidence <= high
}

/// Validate ordering and size of a ranked prediction list
pub fn validate_ranking(predictions: &[CropPrediction]) -> Result<(), &'static str> {
    if predictions.len() > MAX_PREDICTIONS {
        return Err("Too many predictions");
    }
    if predictions
        .windows(2)
        .any(|pair| pair[0].confidence < pair[1].confidence)
    {
        return Err("Predictions must be sorted by confidence, highest first");
    }
    Ok(())
}
