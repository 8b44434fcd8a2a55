//! Event handlers for the story pipeline.
//!
//! - `StoryAnalysisHandler` - Stores model feedback on a completed story
//! - `ComicGenerationHandler` - Renders and records a comic of the story

mod comic_generation_handler;
mod story_analysis_handler;

pub use comic_generation_handler::{ComicGenerationHandler, GeneratedComic};
pub use story_analysis_handler::StoryAnalysisHandler;
