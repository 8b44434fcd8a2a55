//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `INKWELL` prefix and nested values use double underscores as separators.
//! Every section has defaults, so an empty environment yields a local setup
//! against an Ollama server on localhost.
//!
//! # Example
//!
//! ```no_run
//! use inkwell_pipeline::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Generating with {}", config.generation.model);
//! ```

mod error;
mod events;
mod generation;
mod logging;
mod storage;

pub use error::{ConfigError, ValidationError};
pub use events::EventsConfig;
pub use generation::GenerationConfig;
pub use logging::LoggingConfig;
pub use storage::StorageConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Text generation service (endpoint, model, timeout)
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Image and artifact directories
    #[serde(default)]
    pub storage: StorageConfig,

    /// Event bus dispatch
    #[serde(default)]
    pub events: EventsConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `INKWELL` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `INKWELL__GENERATION__MODEL=llama3` -> `generation.model = llama3`
    /// - `INKWELL__EVENTS__DISPATCH_MODE=inline` -> `events.dispatch_mode = inline`
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
                    .prefix("INKWELL")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Loads configuration and validates it in one step.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::LoadError` for unparseable values and
    /// `ConfigError::ValidationFailed` for parseable but invalid ones.
    pub fn load_validated() -> Result<Self, ConfigError> {
        let config = Self::load()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.generation.validate()?;
        self.storage.validate()?;
        Ok(())
    }
}
