//! Configuration management for the Shetkari Mitra gateway
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with SM_ prefix

use config::{builder::DefaultState, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use shared::{ReferenceError, SoilKind};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Remote crop prediction service configuration
    pub prediction: PredictionConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PredictionConfig {
    /// Base URL of the crop prediction service
    pub api_url: String,

    /// Deadline for each call to the prediction service, in milliseconds
    pub timeout_ms: u64,

    /// Soil used when a request omits it or names an unknown one
    pub default_soil_type: String,
}

impl PredictionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn default_soil(&self) -> Result<SoilKind, ReferenceError> {
        self.default_soil_type.parse()
    }
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("SM_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = Self::with_defaults(&environment)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (SM_ prefix)
            .add_source(Self::environment_source())
            .build()?;

        config.try_deserialize()
    }

    fn with_defaults(environment: &str) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        config::Config::builder()
            .set_default("environment", environment)?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("prediction.api_url", "http://127.0.0.1:8000")?
            .set_default("prediction.timeout_ms", 15000)?
            .set_default("prediction.default_soil_type", "black")
    }

    /// `SM_PREDICTION__API_URL` sets `prediction.api_url`
    fn environment_source() -> Environment {
        Environment::with_prefix("SM")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig::default(),
            prediction: PredictionConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:8000".to_string(),
            timeout_ms: 15000,
            default_soil_type: "black".to_string(),
        }
    }
}
