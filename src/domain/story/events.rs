//! Story domain events.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{EventId, StoryId, Timestamp};

/// Topic published when a user finishes composing a story.
pub const STORY_COMPLETED: &str = "story.completed.v1";

/// Published when a user finishes composing a story.
///
/// Carries only the story identifier; consumers fetch whatever they need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryCompleted {
    pub event_id: EventId,
    pub story_id: StoryId,
    pub completed_at: Timestamp,
}

impl StoryCompleted {
    /// Creates a completion event for the given story, stamped now.
    pub fn new(story_id: StoryId) -> Self {
        Self {
            event_id: EventId::new(),
            story_id,
            completed_at: Timestamp::now(),
        }
    }
}

/// The part of a completion payload consumers act on.
///
/// Producers may publish just `{"story_id": N}`; the envelope already
/// carries the event id and time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CompletedStoryRef {
    pub story_id: StoryId,
}

crate::domain_event!(
    StoryCompleted,
    event_type = "story.completed.v1",
    aggregate_id = story_id,
    aggregate_type = "Story",
    occurred_at = completed_at,
    event_id = event_id
);
