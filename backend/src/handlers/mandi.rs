//! HTTP handlers for the mandi price dashboard filters

use axum::{
    extract::{Query, State},
    Json,
};
use shared::{MandiCascade, MandiFilters, MandiSelection};

use crate::AppState;

/// District -> market -> commodity table
pub async fn list_mandi_filters(State(state): State<AppState>) -> Json<MandiFilters> {
    Json(state.predictions.mandi_filters().await)
}

/// Re-select market and commodity so the dashboard never shows a stale choice
pub async fn resolve_mandi_selection(
    State(state): State<AppState>,
    Query(requested): Query<MandiSelection>,
) -> Json<MandiCascade> {
    Json(state.predictions.mandi_selection(&requested).await)
}
