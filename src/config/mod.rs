//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `CLINIX_TRIAGE` prefix and nested values use double underscores as separators.
//! Every section has defaults, so an empty environment yields a working
//! keyword-parser, baseline-model setup.
//!
//! # Example
//!
//! ```no_run
//! use clinix_triage::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Urgent at {}", config.triage.urgent_threshold);
//! ```

mod ai;
mod error;
mod logging;
mod model;
mod triage;

pub use ai::{AiConfig, AiProvider};
pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;
pub use model::ModelConfig;
pub use triage::TriageConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Decision thresholds and safety override set
    #[serde(default)]
    pub triage: TriageConfig,

    /// Risk model artifact
    #[serde(default)]
    pub model: ModelConfig,

    /// AI provider configuration (OpenAI/Anthropic)
    #[serde(default)]
    pub ai: AiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `CLINIX_TRIAGE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `CLINIX_TRIAGE__TRIAGE__URGENT_THRESHOLD=0.85` -> `triage.urgent_threshold = 0.85`
    /// - `CLINIX_TRIAGE__TRIAGE__ALWAYS_URGENT=severe_chest_pain,fracture` -> list
    /// - `CLINIX_TRIAGE__AI__PROVIDER=anthropic` -> `ai.provider = anthropic`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CLINIX_TRIAGE")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("triage.always_urgent")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for inverted or out-of-range thresholds,
    /// unknown red flags, a top-K of zero, unsupported schema versions, a
    /// selected AI provider without a key, or a malformed log directive.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.triage.validate()?;
        self.model.validate()?;
        self.ai.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}
