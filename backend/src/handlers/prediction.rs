//! HTTP handlers for crop prediction endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};
use shared::{CropProfile, Language, PredictionResult, Season, SoilKind, SoilType};
use std::collections::BTreeMap;
use validator::{Validate, ValidationError};

use crate::error::{AppError, AppResult};
use crate::AppState;

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// Body of a prediction request
#[derive(Debug, Deserialize, Validate)]
pub struct PredictInput {
    #[validate(length(max = 100), custom = "not_blank")]
    pub state: String,
    #[validate(length(max = 100), custom = "not_blank")]
    pub district: String,
    pub soil_type: Option<String>,
}

/// Predict suitable crops for a location
pub async fn predict(
    State(state): State<AppState>,
    input: Result<Json<PredictInput>, JsonRejection>,
) -> AppResult<Json<PredictionResult>> {
    let Json(input) = input.map_err(|rejection| AppError::ValidationError(rejection.body_text()))?;
    input.validate()?;

    let service = &state.predictions;
    let soil = match input.soil_type.as_deref().map(str::parse::<SoilKind>) {
        Some(Ok(soil)) => soil,
        requested => {
            tracing::debug!(
                ?requested,
                default = %service.default_soil(),
                "Using default soil type"
            );
            service.default_soil()
        }
    };

    let result = service
        .predict(input.state.trim(), input.district.trim(), soil)
        .await;
    Ok(Json(result))
}

#[derive(Serialize)]
pub struct StatesResponse {
    pub states: Vec<String>,
}

/// List states with district data
pub async fn list_states(State(state): State<AppState>) -> Json<StatesResponse> {
    Json(StatesResponse {
        states: state.predictions.states().await,
    })
}

#[derive(Serialize)]
pub struct DistrictsResponse {
    pub districts: Vec<String>,
}

/// List districts of a state
pub async fn list_districts(
    State(state): State<AppState>,
    Path(state_name): Path<String>,
) -> Json<DistrictsResponse> {
    Json(DistrictsResponse {
        districts: state.predictions.districts(&state_name).await,
    })
}

/// Soil catalog keyed by soil identifier
pub async fn list_soil_types(State(state): State<AppState>) -> Json<BTreeMap<String, SoilType>> {
    Json(state.predictions.soil_types().await)
}

/// Query parameters for the crop catalog
#[derive(Debug, Deserialize)]
pub struct CropsQuery {
    pub lang: Option<Language>,
}

/// Crop profile with a name in the requested language
#[derive(Serialize)]
pub struct CropListing {
    pub display_name: String,
    #[serde(flatten)]
    pub profile: CropProfile,
}

impl CropListing {
    fn new(profile: &CropProfile, language: Language) -> Self {
        Self {
            display_name: profile.display_name(language).to_string(),
            profile: profile.clone(),
        }
    }
}

/// List the crop catalog
pub async fn list_crops(
    State(state): State<AppState>,
    Query(query): Query<CropsQuery>,
) -> Json<Vec<CropListing>> {
    let language = query.lang.unwrap_or_default();
    Json(
        state
            .predictions
            .crops()
            .iter()
            .map(|crop| CropListing::new(crop, language))
            .collect(),
    )
}

/// Get one crop profile by name
pub async fn get_crop(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Query(query): Query<CropsQuery>,
) -> AppResult<Json<CropListing>> {
    let crop = state
        .predictions
        .reference()
        .crop(&name)
        .ok_or_else(|| AppError::NotFound(format!("Crop {}", name)))?;
    Ok(Json(CropListing::new(crop, query.lang.unwrap_or_default())))
}

#[derive(Serialize)]
pub struct SeasonResponse {
    pub season: Season,
    pub month: u32,
}

/// Current agricultural season
pub async fn get_current_season() -> Json<SeasonResponse> {
    let today = Local::now();
    Json(SeasonResponse {
        season: Season::for_date(&today),
        month: today.month(),
    })
}
