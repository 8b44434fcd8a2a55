//! Story module - the completed story and its sentence-level content units.

mod events;
mod content;

pub use events::{CompletedStoryRef, StoryCompleted, STORY_COMPLETED};
pub use content::{ContentUnit, Story};
