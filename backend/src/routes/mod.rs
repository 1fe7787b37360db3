//! Route definitions for the Shetkari Mitra gateway

use axum::{
    routing::{get, post},
    Router,
};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Crop prediction with local fallback
        .nest("/crop-prediction", crop_prediction_routes())
        // Mandi dashboard filters with local fallback
        .nest("/mandi", mandi_routes())
}

/// Crop prediction and reference lookups
fn crop_prediction_routes() -> Router<AppState> {
    Router::new()
        .route("/predict", post(handlers::predict))
        .route("/season", get(handlers::get_current_season))
        .route("/states", get(handlers::list_states))
        .route("/districts/:state", get(handlers::list_districts))
        .route("/soil-types", get(handlers::list_soil_types))
        .route("/crops", get(handlers::list_crops))
        .route("/crops/:name", get(handlers::get_crop))
}

/// Mandi dashboard filter lookups
fn mandi_routes() -> Router<AppState> {
    Router::new()
        .route("/filters", get(handlers::list_mandi_filters))
        .route("/selection", get(handlers::resolve_mandi_selection))
}
