//! Wiring of the story completion pipeline.
//!
//! Called once at startup: both consumers subscribe to `story.completed.v1`
//! on the given bus. Producers then publish
//! `StoryCompleted::new(story_id).to_envelope()`.

use std::sync::Arc;

use crate::application::handlers::{ComicGenerationHandler, StoryAnalysisHandler};
use crate::domain::story::STORY_COMPLETED;
use crate::ports::{
    ArtifactStorage, ComicRenderer, EventSubscriber, StoryContentProvider, StoryResultSink,
    TextGenerator,
};

/// Collaborators shared by the pipeline's consumers.
#[derive(Clone)]
pub struct PipelineDeps {
    pub stories: Arc<dyn StoryContentProvider>,
    pub results: Arc<dyn StoryResultSink>,
    pub generator: Arc<dyn TextGenerator>,
    pub storage: Arc<dyn ArtifactStorage>,
    pub renderer: Arc<dyn ComicRenderer>,
}

/// Subscribes the analysis and comic consumers to story completions.
pub fn register_story_pipeline(subscriber: &dyn EventSubscriber, deps: PipelineDeps) {
    let analysis = StoryAnalysisHandler::new(
        Arc::clone(&deps.stories),
        Arc::clone(&deps.results),
        deps.generator,
    );
    let comics = ComicGenerationHandler::new(deps.stories, deps.results, deps.storage, deps.renderer);

    subscriber.subscribe(STORY_COMPLETED, Arc::new(analysis));
    subscriber.subscribe(STORY_COMPLETED, Arc::new(comics));

    tracing::info!(event_type = STORY_COMPLETED, "Story pipeline registered");
}
