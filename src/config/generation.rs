//! Text generation service configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Generation service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    /// Full URL of the generate endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model name sent with every request
    #[serde(default = "default_model")]
    pub model: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Bearer token for deployments behind an authenticating proxy
    pub api_key: Option<String>,
}

impl GenerationConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// API key if one is set and non-empty
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.is_empty())
    }

    /// Validate generation configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(ValidationError::InvalidEndpoint);
        }
        if self.model.trim().is_empty() {
            return Err(ValidationError::MissingRequired("GENERATION__MODEL"));
        }
        if self.timeout_secs == 0 || self.timeout_secs > 600 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            timeout_secs: default_timeout(),
            api_key: None,
        }
    }
}

fn default_endpoint() -> String {
    "http://localhost:11434/api/generate".to_string()
}

fn default_model() -> String {
    "mistral".to_string()
}

fn default_timeout() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_config_defaults() {
        let config = GenerationConfig::default();
        assert_eq!(config.endpoint, "http://localhost:11434/api/generate");
        assert_eq!(config.model, "mistral");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.api_key().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_api_key_is_ignored() {
        let config = GenerationConfig {
            api_key: Some(String::new()),
            ..Default::default()
        };
        assert!(config.api_key().is_none());
    }

    #[test]
    fn test_validation_rejects_bad_endpoint() {
        let config = GenerationConfig {
            endpoint: "localhost:11434".to_string(),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidEndpoint));
    }

    #[test]
    fn test_validation_rejects_bad_timeout() {
        for timeout_secs in [0, 601] {
            let config = GenerationConfig {
                timeout_secs,
                ..Default::default()
            };
            assert_eq!(config.validate(), Err(ValidationError::InvalidTimeout));
        }
    }

    #[test]
    fn test_validation_rejects_blank_model() {
        let config = GenerationConfig {
            model: "  ".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ValidationError::MissingRequired(_))));
    }
}
