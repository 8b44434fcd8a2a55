//! Inkwell pipeline runner.
//!
//! Loads a completed story from a JSON file, publishes its completion on an
//! in-process bus and waits for the analysis and comic consumers to finish.
//!
//! ```text
//! inkwell-pipeline story.json
//! ```
//!
//! The file holds `{"story": {...}, "units": [...]}`.

use std::error::Error;
use std::sync::Arc;

use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use inkwell_pipeline::adapters::{
    InMemoryEventBus, InMemoryStoryStore, LocalArtifactStorage, LopdfComicRenderer, OllamaConfig,
    OllamaGenerator,
};
use inkwell_pipeline::application::{register_story_pipeline, PipelineDeps};
use inkwell_pipeline::config::{AppConfig, LoggingConfig};
use inkwell_pipeline::domain::foundation::SerializableDomainEvent;
use inkwell_pipeline::domain::story::{ContentUnit, Story, StoryCompleted};
use inkwell_pipeline::ports::EventPublisher;

#[derive(Deserialize)]
struct StoryFile {
    story: Story,
    #[serde(default)]
    units: Vec<ContentUnit>,
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load_validated()?;
    init_tracing(&config.logging);

    let path = std::env::args()
        .nth(1)
        .ok_or("usage: inkwell-pipeline <story.json>")?;
    let file: StoryFile = serde_json::from_str(&tokio::fs::read_to_string(&path).await?)?;
    let story_id = file.story.id;
    let owner_id = file.story.owner_id;

    let mut ollama = OllamaConfig::new(&config.generation.endpoint)
        .with_model(&config.generation.model)
        .with_timeout(config.generation.timeout());
    if let Some(key) = config.generation.api_key() {
        ollama = ollama.with_api_key(key);
    }

    let store = Arc::new(InMemoryStoryStore::new());
    store.insert_story(file.story, file.units);

    let bus = InMemoryEventBus::with_mode(config.events.dispatch_mode);
    register_story_pipeline(
        &bus,
        PipelineDeps {
            stories: store.clone(),
            results: store.clone(),
            generator: Arc::new(OllamaGenerator::new(ollama)?),
            storage: Arc::new(LocalArtifactStorage::new(
                &config.storage.image_dir,
                &config.storage.artifact_dir,
            )),
            renderer: Arc::new(LopdfComicRenderer::new()),
        },
    );

    tracing::info!(story_id = %story_id, mode = ?bus.mode(), "Publishing story completion");
    bus.publish(
        StoryCompleted::new(story_id)
            .to_envelope()
            .with_user_id(owner_id.to_string()),
    )
    .await?;
    bus.drain().await;

    match store.analysis_for(story_id) {
        Some(analysis) => tracing::info!(
            story_id = %story_id,
            performance_score = analysis.performance_score,
            analysis = %analysis.analysis,
            "Analysis available"
        ),
        None => tracing::warn!(story_id = %story_id, "No analysis was stored"),
    }
    for artifact in store.artifacts() {
        tracing::info!(story_id = %story_id, location = %artifact.download_location, "Comic available");
    }

    Ok(())
}
