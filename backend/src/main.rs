//! Shetkari Mitra - Crop Prediction Gateway
//!
//! Forwards crop suitability requests to the prediction service and
//! answers from local reference tables when it is slow or unavailable.

use axum::{
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use shared::ReferenceData;
use std::{any::Any, net::SocketAddr, sync::Arc};
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod external;
mod handlers;
mod routes;
mod services;

pub use config::Config;

use error::AppError;
use external::PredictionApiClient;
use services::CropPredictionService;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub predictions: CropPredictionService,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sm_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::load()?;

    tracing::info!("Starting Shetkari Mitra crop prediction gateway");
    tracing::info!("Environment: {}", config.environment);

    let default_soil = config.prediction.default_soil()?;
    let http_client = reqwest::Client::builder()
        .user_agent(concat!("shetkari-mitra/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let predictions = CropPredictionService::new(
        PredictionApiClient::with_client(http_client, config.prediction.api_url.clone()),
        Arc::new(ReferenceData::builtin()),
        config.prediction.timeout(),
    )
    .with_default_soil(default_soil);

    tracing::info!(
        api_url = %config.prediction.api_url,
        timeout_ms = config.prediction.timeout_ms,
        %default_soil,
        "Prediction service configured"
    );

    // Create application state
    let state = AppState {
        config: Arc::new(config.clone()),
        predictions,
    };

    // Build application
    let app = create_app(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes and middleware
fn create_app(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Turn a handler panic into the standard bilingual error body
fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    AppError::Internal(format!("handler panicked: {}", detail)).into_response()
}

/// Root endpoint
async fn root() -> &'static str {
    "Shetkari Mitra Crop Prediction API v1.0"
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
