//! StoryContentProvider port - read access to completed stories.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, StoryId};
use crate::domain::story::{ContentUnit, Story};

/// Port for reading the stories the pipeline processes.
///
/// Implementations return `ErrorCode::StoryNotFound` for unknown stories.
#[async_trait]
pub trait StoryContentProvider: Send + Sync {
    /// Fetch a story by its identifier.
    async fn get_story(&self, id: StoryId) -> Result<Story, DomainError>;

    /// Fetch the story's content units, ordered by position.
    async fn get_content_units(&self, id: StoryId) -> Result<Vec<ContentUnit>, DomainError>;
}
