//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the pipeline to external systems:
//! - `events` - In-memory event bus
//! - `ai` - Text generation clients (Ollama, mock)
//! - `pdf` - Comic rendering with lopdf
//! - `storage` - Local filesystem for images and comics
//! - `memory` - In-memory story store

pub mod ai;
pub mod events;
pub mod memory;
pub mod pdf;
pub mod storage;

pub use ai::{MockTextGenerator, OllamaConfig, OllamaGenerator};
pub use events::{DispatchMode, InMemoryEventBus};
pub use memory::{InMemoryStoryStore, StoreOperation};
pub use pdf::LopdfComicRenderer;
pub use storage::LocalArtifactStorage;
