//! Configuration management for the crop prediction server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides with CROP_ prefix

use std::time::Duration;

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Prediction flow configuration
    pub prediction: PredictionConfig,

    /// Remote inference service configuration
    #[serde(default)]
    pub inference: InferenceConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

/// Which predictor backs the flows
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PredictorKind {
    /// Fixed payload after a simulated delay
    Mock,
    /// HTTP inference service
    Remote,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PredictionConfig {
    pub backend: PredictorKind,

    /// Simulated latency of the mock predictor, in milliseconds
    pub delay_ms: u64,

    /// Upper bound on a single prediction, in seconds
    pub timeout_secs: u64,

    /// Most sessions held at once; the oldest is evicted beyond this
    pub max_sessions: usize,

    /// Sessions older than this are swept on the next create, in seconds
    pub session_ttl_secs: u64,
}

impl PredictionConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            backend: PredictorKind::Mock,
            delay_ms: 3000,
            timeout_secs: 30,
            max_sessions: 1000,
            session_ttl_secs: 3600,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct InferenceConfig {
    /// Inference API endpoint
    pub api_endpoint: Option<String>,

    /// Inference API key
    pub api_key: Option<String>,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("CROP_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("prediction.backend", "mock")?
            .set_default("prediction.delay_ms", 3000)?
            .set_default("prediction.timeout_secs", 30)?
            .set_default("prediction.max_sessions", 1000)?
            .set_default("prediction.session_ttl_secs", 3600)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (CROP_ prefix)
            .add_source(
                Environment::with_prefix("CROP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject combinations the server cannot start with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.prediction.backend == PredictorKind::Remote
            && self.inference.api_endpoint.is_none()
        {
            return Err(ConfigError::Message(
                "prediction.backend = remote requires inference.api_endpoint".to_string(),
            ));
        }
        if self.prediction.timeout_secs == 0 {
            return Err(ConfigError::Message(
                "prediction.timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.prediction.max_sessions == 0 {
            return Err(ConfigError::Message(
                "prediction.max_sessions must be greater than zero".to_string(),
            ));
        }
        Ok(())
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

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig::default(),
            prediction: PredictionConfig::default(),
            inference: InferenceConfig::default(),
        }
    }
}
