//! Crop prediction API client
//!
//! Client for the ML crop prediction service. The service is optional: every
//! caller has a local fallback, so this client only reports what went wrong.

use reqwest::{Client, StatusCode, Url};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use shared::{MandiFilters, RemotePrediction, SoilType};
use std::collections::BTreeMap;
use thiserror::Error;

/// Failure talking to the prediction service
#[derive(Error, Debug)]
pub enum PredictionApiError {
    #[error("invalid prediction service URL: {0}")]
    InvalidUrl(String),

    #[error("prediction service request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("prediction service returned {status}: {body}")]
    Status { status: StatusCode, body: String },
}

/// Client for the crop prediction microservice
#[derive(Clone)]
pub struct PredictionApiClient {
    http_client: Client,
    base_url: String,
}

/// Request body for `POST /api/v1/predict`
#[derive(Debug, Serialize)]
pub struct PredictRequest<'a> {
    pub state: &'a str,
    pub district: &'a str,
    pub soil_type: &'a str,
}

#[derive(Debug, Deserialize)]
struct StatesResponse {
    states: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct DistrictsResponse {
    districts: Option<Vec<String>>,
}

impl PredictionApiClient {
    /// Create a new client for the service at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Create a client around a preconfigured `reqwest::Client`
    pub fn with_client(http_client: Client, base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Ask the service for a ranked crop list
    pub async fn predict(
        &self,
        state: &str,
        district: &str,
        soil_type: &str,
    ) -> Result<RemotePrediction, PredictionApiError> {
        let url = self.endpoint(&["api", "v1", "predict"])?;
        let body = PredictRequest {
            state,
            district,
            soil_type,
        };

        let response = self.http_client.post(url).json(&body).send().await?;
        Self::decode(response).await
    }

    /// States known to the service; `None` when the body has no `states` field
    pub async fn states(&self) -> Result<Option<Vec<String>>, PredictionApiError> {
        let data: StatesResponse = self.get_json(&["api", "v1", "states"]).await?;
        Ok(data.states)
    }

    /// Districts of a state; `None` when the body has no `districts` field
    pub async fn districts(&self, state: &str) -> Result<Option<Vec<String>>, PredictionApiError> {
        let data: DistrictsResponse = self.get_json(&["api", "v1", "districts", state]).await?;
        Ok(data.districts)
    }

    /// Soil catalog keyed by soil identifier
    pub async fn soil_types(&self) -> Result<BTreeMap<String, SoilType>, PredictionApiError> {
        self.get_json(&["api", "v1", "soil-types"]).await
    }

    /// Mandi district -> market -> commodity table
    pub async fn mandi_filters(&self) -> Result<MandiFilters, PredictionApiError> {
        self.get_json(&["filters"]).await
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, PredictionApiError> {
        let url = self.endpoint(segments)?;
        let response = self.http_client.get(url).send().await?;
        Self::decode(response).await
    }

    /// Build `<base_url>/<segments...>`, percent-encoding each segment
    fn endpoint(&self, segments: &[&str]) -> Result<Url, PredictionApiError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| PredictionApiError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| PredictionApiError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, PredictionApiError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PredictionApiError::Status { status, body });
        }

        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_encodes_segments() {
        let client = PredictionApiClient::new("http://localhost:8000/");
        let url = client
            .endpoint(&["api", "v1", "districts", "Tamil Nadu"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/v1/districts/Tamil%20Nadu"
        );
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client = PredictionApiClient::new("http://ml.internal/crop");
        let url = client.endpoint(&["api", "v1", "predict"]).unwrap();
        assert_eq!(url.as_str(), "http://ml.internal/crop/api/v1/predict");
    }

    #[test]
    fn test_filters_endpoint_is_unversioned() {
        let client = PredictionApiClient::new("http://localhost:8000");
        let url = client.endpoint(&["filters"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/filters");
    }

    #[test]
    fn test_invalid_base_url() {
        let client = PredictionApiClient::new("not a url");
        assert!(matches!(
            client.endpoint(&["api"]),
            Err(PredictionApiError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_predict_request_body() {
        let body = PredictRequest {
            state: "Maharashtra",
            district: "Pune",
            soil_type: "black",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"state": "Maharashtra", "district": "Pune", "soil_type": "black"})
        );
    }
}
