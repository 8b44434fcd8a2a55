//! Application layer - Consumers, services and pipeline wiring.
//!
//! This layer orchestrates domain operations and coordinates between ports.

mod errors;
pub mod handlers;
pub mod pipeline;
pub mod services;

pub use errors::PipelineError;
pub use handlers::{ComicGenerationHandler, GeneratedComic, StoryAnalysisHandler};
pub use pipeline::{register_story_pipeline, PipelineDeps};
pub use services::WritingAssistant;
