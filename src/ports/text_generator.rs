//! Text Generator Port - Interface for the external generation service.
//!
//! Consumers hand over a prompt and get back the raw generated text. What
//! the text means is the parsers' business, not the generator's.
//!
//! # Example
//!
//! ```ignore
//! let text = generator.generate(&PromptFormat::V1.story_analysis(&story.content)).await?;
//! let draft = parse_structured_analysis(&text)?;
//! ```

use async_trait::async_trait;
use thiserror::Error;

/// Port for a prompt-in, text-out generation service.
///
/// Implementations must bound every call with a timeout and must report an
/// envelope without generated text as [`GenerationError::MalformedResponse`],
/// never as an empty string.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for a prompt.
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Model identifier, for logging.
    fn model(&self) -> &str;
}

/// Generation service errors.
///
/// All of them are recoverable: callers abort the current run, they do not crash.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// Request did not complete within the configured timeout.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// Configured timeout.
        timeout_ms: u64,
    },

    /// Connection or I/O failure talking to the service.
    #[error("transport error: {0}")]
    Transport(String),

    /// Service answered with a non-success status.
    #[error("unexpected status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },

    /// Service answered, but the envelope lacks the generated text.
    #[error("malformed upstream response: {0}")]
    MalformedResponse(String),
}

impl GenerationError {
    /// Creates a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates a malformed response error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    /// Returns true if a retry could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            GenerationError::Timeout { .. } | GenerationError::Transport(_) => true,
            GenerationError::Status { status, .. } => *status >= 500 || *status == 429,
            GenerationError::MalformedResponse(_) => false,
        }
    }
}
