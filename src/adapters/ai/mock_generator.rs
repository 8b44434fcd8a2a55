//! Mock Text Generator for testing.
//!
//! Returns queued replies in order and records every prompt it receives,
//! so consumers can be exercised without a generation server.
//!
//! # Example
//!
//! ```ignore
//! let generator = MockTextGenerator::new()
//!     .with_response(r#"{"analysis": "Good", "tips": [], "performance_score": 7}"#)
//!     .with_error(GenerationError::Timeout { timeout_ms: 30_000 });
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{GenerationError, TextGenerator};

/// Mock text generator. Clones share the queue and the call history.
#[derive(Debug, Clone)]
pub struct MockTextGenerator {
    replies: Arc<Mutex<VecDeque<Result<String, GenerationError>>>>,
    /// Returned once the queue is exhausted.
    fallback: Option<String>,
    delay: Duration,
    calls: Arc<Mutex<Vec<String>>>,
}

impl Default for MockTextGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTextGenerator {
    /// Creates a mock with an empty queue and no fallback.
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            fallback: None,
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queues a successful reply.
    pub fn with_response(self, text: impl Into<String>) -> Self {
        self.replies.lock().unwrap().push_back(Ok(text.into()));
        self
    }

    /// Queues an error.
    pub fn with_error(self, error: GenerationError) -> Self {
        self.replies.lock().unwrap().push_back(Err(error));
        self
    }

    /// Reply used for every call once the queue is empty.
    pub fn with_fallback(mut self, text: impl Into<String>) -> Self {
        self.fallback = Some(text.into());
        self
    }

    /// Sets simulated latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns the number of calls made.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Returns all prompts received, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn next_reply(&self) -> Result<String, GenerationError> {
        let queued = self.replies.lock().unwrap().pop_front();
        match queued {
            Some(reply) => reply,
            None => self
                .fallback
                .clone()
                .ok_or_else(|| GenerationError::transport("mock reply queue exhausted")),
        }
    }
}

#[async_trait]
impl TextGenerator for MockTextGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.calls.lock().unwrap().push(prompt.to_string());

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        self.next_reply()
    }

    fn model(&self) -> &str {
        "mock-model"
    }
}
