//! StoryResultSink port - write-back of pipeline results.

use async_trait::async_trait;

use crate::domain::analysis::StoryAnalysis;
use crate::domain::comic::Artifact;
use crate::domain::foundation::{DomainError, StoryId};

/// Port for persisting what the consumers produce.
///
/// Each method is a single write: a consumer calls it at most once per run,
/// after everything it writes has been computed.
#[async_trait]
pub trait StoryResultSink: Send + Sync {
    /// Store the analysis on the story, replacing any previous one.
    async fn update_story_analysis(
        &self,
        id: StoryId,
        analysis: &StoryAnalysis,
    ) -> Result<(), DomainError>;

    /// Record a rendered comic.
    async fn save_artifact(&self, artifact: Artifact) -> Result<(), DomainError>;
}
