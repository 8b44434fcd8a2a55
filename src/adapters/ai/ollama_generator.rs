//! Ollama Generator - TextGenerator over the Ollama generate endpoint.
//!
//! Sends one non-streaming request per prompt and returns the `response`
//! field of the reply.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OllamaConfig::new("http://localhost:11434/api/generate")
//!     .with_model("mistral")
//!     .with_timeout(Duration::from_secs(30));
//!
//! let generator = OllamaGenerator::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ports::{GenerationError, TextGenerator};

/// Configuration for the Ollama generator.
#[derive(Debug, Clone)]
pub struct OllamaConfig {
    /// Full URL of the generate endpoint.
    pub endpoint: String,
    /// Model name sent with every request.
    pub model: String,
    /// Bound on every request, connect included.
    pub timeout: Duration,
    /// Optional bearer token for proxied deployments.
    api_key: Option<Secret<String>>,
}

impl OllamaConfig {
    /// Creates a configuration for the given endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            model: "mistral".to_string(),
            timeout: Duration::from_secs(30),
            api_key: None,
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the bearer token.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(Secret::new(api_key.into()));
        self
    }
}

/// Text generator backed by an Ollama server.
pub struct OllamaGenerator {
    config: OllamaConfig,
    client: Client,
}

impl OllamaGenerator {
    /// Creates a generator with the given configuration.
    pub fn new(config: OllamaConfig) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenerationError::transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn map_send_error(&self, e: reqwest::Error) -> GenerationError {
        if e.is_timeout() {
            GenerationError::Timeout {
                timeout_ms: u64::try_from(self.config.timeout.as_millis()).unwrap_or(u64::MAX),
            }
        } else if e.is_connect() {
            GenerationError::transport(format!("Connection failed: {}", e))
        } else {
            GenerationError::transport(e.to_string())
        }
    }
}

#[async_trait]
impl TextGenerator for OllamaGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let request = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
        };

        let mut builder = self
            .client
            .post(&self.config.endpoint)
            .header("Content-Type", "application/json")
            .json(&request);
        if let Some(ref key) = self.config.api_key {
            builder = builder.bearer_auth(key.expose_secret());
        }

        let response = builder.send().await.map_err(|e| self.map_send_error(e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.map_send_error(e))?;

        tracing::debug!(
            model = %self.config.model,
            status = status.as_u16(),
            body = %body,
            "Generation service replied"
        );

        if !status.is_success() {
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let envelope: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| GenerationError::malformed(format!("invalid JSON body: {}", e)))?;

        envelope
            .response
            .ok_or_else(|| GenerationError::malformed("missing 'response' field"))
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}
