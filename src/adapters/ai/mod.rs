//! Text generation adapters.
//!
//! Implementations of the TextGenerator port.
//!
//! ## Available Adapters
//!
//! - `OllamaGenerator` - Ollama-compatible HTTP generate endpoint
//! - `MockTextGenerator` - Queued replies for testing

mod mock_generator;
mod ollama_generator;

pub use mock_generator::MockTextGenerator;
pub use ollama_generator::{OllamaConfig, OllamaGenerator};
