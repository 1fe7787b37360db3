//! Crop prediction service
//!
//! Asks the remote prediction service first and falls back to the compiled-in
//! dataset when it does not answer in time, answers with an error status, or
//! sends a body we cannot trust. The fallback is the normal degraded mode, so
//! none of these failures reach the caller.

use chrono::Utc;
use shared::{
    validate_remote_prediction, CropProfile, FallbackPredictor, MandiCascade, MandiFilters,
    MandiSelection, PredictionLocation, PredictionResult, RandomSource, ReferenceData,
    ReferenceError, RngSource, Season, SoilKind, SoilType,
};
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::external::{PredictionApiClient, PredictionApiError};

/// Why a remote call was abandoned in favor of local data
#[derive(Error, Debug)]
pub enum FallbackCause {
    #[error("no answer within {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Remote(#[from] PredictionApiError),

    #[error("untrusted response: {0}")]
    Invalid(#[from] ReferenceError),
}

/// Crop prediction service with local fallback
#[derive(Clone)]
pub struct CropPredictionService {
    client: PredictionApiClient,
    reference: Arc<ReferenceData>,
    timeout: Duration,
    default_soil: SoilKind,
}

impl CropPredictionService {
    pub fn new(client: PredictionApiClient, reference: Arc<ReferenceData>, timeout: Duration) -> Self {
        Self {
            client,
            reference,
            timeout,
            default_soil: SoilKind::default(),
        }
    }

    /// Soil substituted when a request omits one or names an unknown one
    pub fn with_default_soil(mut self, soil: SoilKind) -> Self {
        self.default_soil = soil;
        self
    }

    pub fn default_soil(&self) -> SoilKind {
        self.default_soil
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    pub fn api_url(&self) -> &str {
        self.client.base_url()
    }

    /// Predict suitable crops for a location.
    ///
    /// Never fails: any problem with the remote service yields a result built
    /// from the local dataset with `is_from_fallback` set.
    pub async fn predict(&self, state: &str, district: &str, soil: SoilKind) -> PredictionResult {
        match self.try_remote(state, district, soil.as_str()).await {
            Ok(result) => {
                tracing::debug!(
                    state,
                    district,
                    count = result.predictions.len(),
                    "Prediction served by remote service"
                );
                result
            }
            Err(cause) => {
                tracing::warn!(
                    state,
                    district,
                    %cause,
                    "Prediction service failed, using local dataset"
                );
                let mut rng = RngSource(rand::thread_rng());
                self.fallback(state, district, soil.as_str(), Season::current(), &mut rng)
            }
        }
    }

    /// Single remote attempt raced against the configured deadline
    pub async fn try_remote(
        &self,
        state: &str,
        district: &str,
        soil_id: &str,
    ) -> Result<PredictionResult, FallbackCause> {
        let remote = self
            .with_deadline(self.client.predict(state, district, soil_id))
            .await?;
        validate_remote_prediction(&remote)?;

        let requested = PredictionLocation {
            state: state.to_string(),
            district: district.to_string(),
            soil_type: soil_id.to_string(),
        };
        Ok(PredictionResult::from_remote(remote, requested, Utc::now()))
    }

    /// Build a prediction from the reference tables only
    pub fn fallback(
        &self,
        state: &str,
        district: &str,
        soil_id: &str,
        season: Season,
        rng: &mut dyn RandomSource,
    ) -> PredictionResult {
        FallbackPredictor::new(&self.reference)
            .with_default_soil(self.default_soil)
            .predict(state, district, soil_id, season, rng, Utc::now())
    }

    /// States from the service, or the local district table's states
    pub async fn states(&self) -> Vec<String> {
        match self.with_deadline(self.client.states()).await {
            Ok(Some(states)) => states,
            Ok(None) => self.reference.state_names(),
            Err(cause) => {
                tracing::warn!(%cause, "State lookup failed, using local dataset");
                self.reference.state_names()
            }
        }
    }

    /// Districts of a state from the service, or from the local table
    pub async fn districts(&self, state: &str) -> Vec<String> {
        match self.with_deadline(self.client.districts(state)).await {
            Ok(Some(districts)) => districts,
            Ok(None) => self.reference.district_names(state),
            Err(cause) => {
                tracing::warn!(state, %cause, "District lookup failed, using local dataset");
                self.reference.district_names(state)
            }
        }
    }

    /// Soil catalog from the service, or the local soil table
    pub async fn soil_types(&self) -> BTreeMap<String, SoilType> {
        match self.with_deadline(self.client.soil_types()).await {
            Ok(soils) => soils,
            Err(cause) => {
                tracing::warn!(%cause, "Soil type lookup failed, using local dataset");
                self.reference.soil_catalog()
            }
        }
    }

    /// Mandi filter table from the service; an empty table counts as a failure
    pub async fn mandi_filters(&self) -> MandiFilters {
        match self.with_deadline(self.client.mandi_filters()).await {
            Ok(filters) if !filters.is_empty() => filters,
            Ok(_) => {
                tracing::debug!("Mandi filter table empty, using local dataset");
                self.reference.mandi_filters().clone()
            }
            Err(cause) => {
                tracing::warn!(%cause, "Mandi filter lookup failed, using local dataset");
                self.reference.mandi_filters().clone()
            }
        }
    }

    /// Resolve a dashboard selection against the current mandi filters
    pub async fn mandi_selection(&self, requested: &MandiSelection) -> MandiCascade {
        self.mandi_filters().await.resolve(requested)
    }

    /// Local crop catalog
    pub fn crops(&self) -> &[CropProfile] {
        self.reference.crops()
    }

    async fn with_deadline<T>(
        &self,
        call: impl Future<Output = Result<T, PredictionApiError>>,
    ) -> Result<T, FallbackCause> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(FallbackCause::Timeout(self.timeout)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::Path,
        http::StatusCode,
        routing::{get, post},
        Json, Router,
    };
    use serde_json::{json, Value};
    use shared::{validate_ranking, FixedRandom, SuitabilityClass};
    use std::time::Instant;

    /// Serve `router` on an ephemeral local port and return its base URL
    async fn spawn_stub(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn service(base_url: &str, timeout: Duration) -> CropPredictionService {
        CropPredictionService::new(
            PredictionApiClient::new(base_url),
            Arc::new(ReferenceData::builtin()),
            timeout,
        )
    }

    /// Nothing listens on port 1
    fn offline_service() -> CropPredictionService {
        service("http://127.0.0.1:1", Duration::from_secs(2))
    }

    fn remote_prediction(crop: &str, confidence: f64) -> Value {
        json!({
            "crop": crop,
            "suitability_class": "High",
            "confidence": confidence,
            "season": "kharif",
            "category": "cereal"
        })
    }

    #[tokio::test]
    async fn test_remote_success_is_ranked_and_not_fallback() {
        let body = json!({
            "predictions": [
                remote_prediction("Rice", 0.41),
                remote_prediction("Cotton", 0.92),
                remote_prediction("Maize", 0.55),
                remote_prediction("Jowar", 0.73),
                remote_prediction("Bajra", 0.12),
                remote_prediction("Soybean", 0.88),
                remote_prediction("Tomato", 0.67),
            ],
            "weather": {"temperature": 29.5, "humidity": 80.0, "rainfall": 110.0, "description": "Live"}
        });
        let router = Router::new().route(
            "/api/v1/predict",
            post(move |Json(request): Json<Value>| {
                let body = body.clone();
                async move {
                    assert_eq!(request["soil_type"], "black");
                    Json(body)
                }
            }),
        );
        let base = spawn_stub(router).await;

        let result = service(&base, Duration::from_secs(5))
            .predict("Maharashtra", "Pune", SoilKind::Black)
            .await;

        assert!(!result.is_from_fallback);
        assert_eq!(result.predictions.len(), 6);
        assert!(validate_ranking(&result.predictions).is_ok());
        assert_eq!(result.predictions[0].crop, "Cotton");
        assert_eq!(result.location.district, "Pune");
        assert_eq!(result.weather.unwrap().description, "Live");
    }

    #[tokio::test]
    async fn test_server_error_falls_back() {
        let router = Router::new().route(
            "/api/v1/predict",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model not loaded") }),
        );
        let base = spawn_stub(router).await;
        let service = service(&base, Duration::from_secs(5));

        let cause = service
            .try_remote("Maharashtra", "Pune", "black")
            .await
            .unwrap_err();
        assert!(matches!(
            cause,
            FallbackCause::Remote(PredictionApiError::Status { status, .. })
                if status.as_u16() == 500
        ));

        let result = service.predict("Maharashtra", "Pune", SoilKind::Black).await;
        assert!(result.is_from_fallback);
        assert!(!result.predictions.is_empty());
        assert!(validate_ranking(&result.predictions).is_ok());
    }

    #[tokio::test]
    async fn test_malformed_body_falls_back() {
        let router = Router::new().route(
            "/api/v1/predict",
            post(|| async { "<html>gateway</html>" }),
        );
        let base = spawn_stub(router).await;

        let result = service(&base, Duration::from_secs(5))
            .predict("Maharashtra", "Nashik", SoilKind::Red)
            .await;
        assert!(result.is_from_fallback);
        assert_eq!(result.location.soil_type, "red");
    }

    #[tokio::test]
    async fn test_out_of_range_confidence_falls_back() {
        let router = Router::new().route(
            "/api/v1/predict",
            post(|| async { Json(json!({"predictions": [remote_prediction("Rice", 87.0)]})) }),
        );
        let base = spawn_stub(router).await;
        let service = service(&base, Duration::from_secs(5));

        let cause = service
            .try_remote("Maharashtra", "Pune", "black")
            .await
            .unwrap_err();
        assert!(matches!(cause, FallbackCause::Invalid(_)));
    }

    #[tokio::test]
    async fn test_slow_service_times_out_to_fallback() {
        let router = Router::new().route(
            "/api/v1/predict",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Json(json!({"predictions": []}))
            }),
        );
        let base = spawn_stub(router).await;
        let service = service(&base, Duration::from_millis(200));

        let started = Instant::now();
        let result = service.predict("Maharashtra", "Pune", SoilKind::Black).await;

        assert!(result.is_from_fallback);
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_unreachable_service_falls_back() {
        let result = offline_service()
            .predict("Maharashtra", "Kolhapur", SoilKind::Alluvial)
            .await;
        assert!(result.is_from_fallback);
        assert!(result.predictions.len() <= 6);
        assert!(result.weather.is_some());
    }

    #[tokio::test]
    async fn test_unknown_district_offline_is_empty() {
        let result = offline_service()
            .predict("Maharashtra", "Gotham", SoilKind::Black)
            .await;
        assert!(result.is_from_fallback);
        assert!(result.predictions.is_empty());
    }

    #[tokio::test]
    async fn test_lookups_fall_back_to_reference_tables() {
        let service = offline_service();
        assert_eq!(service.states().await, vec!["Maharashtra".to_string()]);
        assert_eq!(service.districts("Maharashtra").await.len(), 22);
        assert!(service.districts("Kerala").await.is_empty());
        assert_eq!(service.soil_types().await.len(), 7);
    }

    #[tokio::test]
    async fn test_lookups_prefer_remote() {
        let router = Router::new()
            .route("/api/v1/states", get(|| async { Json(json!({"states": ["Punjab"]})) }))
            .route(
                "/api/v1/districts/:state",
                get(|Path(state): Path<String>| async move {
                    Json(json!({"districts": [format!("{} Central", state)]}))
                }),
            );
        let base = spawn_stub(router).await;
        let service = service(&base, Duration::from_secs(5));

        assert_eq!(service.states().await, vec!["Punjab".to_string()]);
        assert_eq!(
            service.districts("Tamil Nadu").await,
            vec!["Tamil Nadu Central".to_string()]
        );
        // No soil-types route on the stub: 404 routes to the local table
        assert_eq!(service.soil_types().await.len(), 7);
    }

    #[tokio::test]
    async fn test_lookup_without_field_uses_local_table() {
        let router = Router::new().route("/api/v1/states", get(|| async { Json(json!({})) }));
        let base = spawn_stub(router).await;

        let states = service(&base, Duration::from_secs(5)).states().await;
        assert_eq!(states, vec!["Maharashtra".to_string()]);
    }

    #[test]
    fn test_fallback_with_frozen_source() {
        let service = offline_service();
        let mut rng = FixedRandom::lowest();
        let result = service.fallback("Maharashtra", "Pune", "alluvial", Season::Rabi, &mut rng);

        let wheat = result
            .predictions
            .iter()
            .find(|p| p.crop == "Wheat")
            .unwrap();
        assert_eq!(wheat.suitability_class, SuitabilityClass::VeryHigh);
        assert_eq!(wheat.confidence, 0.75);
        assert!(result.is_from_fallback);
    }

    fn selection(district: &str, market: &str, crop: &str) -> MandiSelection {
        MandiSelection {
            district: district.to_string(),
            market: market.to_string(),
            crop: crop.to_string(),
        }
    }

    #[tokio::test]
    async fn test_mandi_filters_fall_back_when_offline() {
        let service = offline_service();
        let filters = service.mandi_filters().await;
        assert_eq!(&filters, service.reference().mandi_filters());

        let cascade = service
            .mandi_selection(&selection("Nashik", "Rahata", "Tomato"))
            .await;
        assert_eq!(cascade.selection, selection("Nashik", "Lasalgaon", "Tomato"));
    }

    #[tokio::test]
    async fn test_mandi_filters_prefer_remote() {
        let router = Router::new().route(
            "/filters",
            get(|| async { Json(json!({"Kolhapur": {"Kolhapur": ["Jaggery", "Onion"]}})) }),
        );
        let base = spawn_stub(router).await;
        let service = service(&base, Duration::from_secs(5));

        let cascade = service
            .mandi_selection(&selection("Kolhapur", "", "Onion"))
            .await;
        assert_eq!(cascade.districts, vec!["Kolhapur".to_string()]);
        assert_eq!(cascade.selection, selection("Kolhapur", "Kolhapur", "Onion"));

        // Districts from the local table are unknown to the live one
        let cascade = service
            .mandi_selection(&selection("Pune", "Pune", "Tomato"))
            .await;
        assert_eq!(cascade.selection, MandiSelection::default());
    }

    #[tokio::test]
    async fn test_empty_mandi_filters_fall_back() {
        let router = Router::new().route("/filters", get(|| async { Json(json!({})) }));
        let base = spawn_stub(router).await;
        let service = service(&base, Duration::from_secs(5));

        assert_eq!(
            service.mandi_filters().await.district_names(),
            vec!["Ahmednagar", "Nashik", "Pune", "Solapur"]
        );
    }

    #[tokio::test]
    async fn test_remote_soil_without_water_retention_is_served() {
        let router = Router::new().route(
            "/api/v1/soil-types",
            get(|| async {
                Json(json!({
                    "alluvial": {
                        "name": "Alluvial Soil",
                        "description": "River deltas",
                        "fertility": "high",
                        "suitable_crops": ["wheat"],
                        "regions": ["Punjab"]
                    }
                }))
            }),
        );
        let base = spawn_stub(router).await;

        let soils = service(&base, Duration::from_secs(5)).soil_types().await;
        assert_eq!(soils.len(), 1);
        assert_eq!(soils["alluvial"].water_retention, None);
    }
}
