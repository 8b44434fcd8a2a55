//! StoryAnalysisHandler - produces written feedback for a completed story.
//!
//! On `story.completed.v1` it fetches the story, asks the generator for a
//! JSON analysis, parses it and stores it on the story. Nothing is written
//! unless every earlier step succeeded.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::application::PipelineError;
use crate::domain::analysis::{parse_structured_analysis, StoryAnalysis};
use crate::domain::feedback::PromptFormat;
use crate::domain::foundation::{DomainError, EventEnvelope, StoryId, Timestamp};
use crate::domain::story::CompletedStoryRef;
use crate::ports::{EventHandler, StoryContentProvider, StoryResultSink, TextGenerator};

/// Handles StoryCompleted events by analyzing and annotating the story.
pub struct StoryAnalysisHandler {
    stories: Arc<dyn StoryContentProvider>,
    results: Arc<dyn StoryResultSink>,
    generator: Arc<dyn TextGenerator>,
    prompts: PromptFormat,
}

impl StoryAnalysisHandler {
    pub fn new(
        stories: Arc<dyn StoryContentProvider>,
        results: Arc<dyn StoryResultSink>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        Self {
            stories,
            results,
            generator,
            prompts: PromptFormat::default(),
        }
    }

    /// Uses a specific prompt format.
    pub fn with_prompt_format(mut self, prompts: PromptFormat) -> Self {
        self.prompts = prompts;
        self
    }

    /// Runs one analysis and persists it.
    pub async fn analyze(&self, story_id: StoryId) -> Result<StoryAnalysis, PipelineError> {
        let story = self.stories.get_story(story_id).await?;

        let prompt = self.prompts.story_analysis(&story.content);
        let response = self.generator.generate(&prompt).await?;
        let analysis = parse_structured_analysis(&response)?.finalize(Timestamp::now());

        self.results
            .update_story_analysis(story_id, &analysis)
            .await?;

        info!(
            story_id = %story_id,
            model = self.generator.model(),
            performance_score = analysis.performance_score,
            tips = analysis.tips.len(),
            "Story analysis stored"
        );
        Ok(analysis)
    }
}

#[async_trait]
impl EventHandler for StoryAnalysisHandler {
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
        let payload: CompletedStoryRef = event
            .payload_as()
            .map_err(|e| PipelineError::InvalidPayload(e.to_string()))?;

        debug!(story_id = %payload.story_id, event_id = %event.event_id, "Analyzing completed story");
        self.analyze(payload.story_id).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "StoryAnalysisHandler"
    }
}
