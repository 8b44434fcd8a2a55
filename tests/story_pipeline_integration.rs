//! Integration tests for the story completion pipeline.
//!
//! These tests verify the end-to-end flow:
//! 1. A producer publishes `story.completed.v1` on the in-memory bus
//! 2. The bus fans out to the analysis and comic consumers
//! 3. The analysis consumer stores parsed feedback on the story
//! 4. The comic consumer writes a PDF and records the artifact
//!
//! Uses the in-memory store, a mock generator, the real PDF renderer and
//! local storage in a temporary directory.

use async_trait::async_trait;
use image::RgbImage;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

use inkwell_pipeline::adapters::{
    DispatchMode, InMemoryEventBus, InMemoryStoryStore, LocalArtifactStorage, LopdfComicRenderer,
    MockTextGenerator,
};
use inkwell_pipeline::application::{register_story_pipeline, PipelineDeps};
use inkwell_pipeline::domain::comic::{ComicLayout, RenderSummary};
use inkwell_pipeline::domain::foundation::{
    DomainError, EventEnvelope, SerializableDomainEvent, StoryId, UserId,
};
use inkwell_pipeline::domain::story::{ContentUnit, Story, StoryCompleted, STORY_COMPLETED};
use inkwell_pipeline::ports::{
    ComicRenderer, EventHandler, EventPublisher, EventSubscriber, GenerationError, RenderError,
    RenderedComic,
};

// =============================================================================
// Test Infrastructure
// =============================================================================

const ANALYSIS_REPLY: &str = r#"Sure! Here is the analysis:
{"analysis": "A charming tale with a clear arc.", "tips": ["Use more adjectives", "Vary openings"], "performance_score": 87}
Hope this helps."#;

/// Renderer decorator that remembers what went on the page.
struct RecordingRenderer {
    inner: LopdfComicRenderer,
    summaries: Mutex<Vec<RenderSummary>>,
}

impl RecordingRenderer {
    fn new() -> Self {
        Self {
            inner: LopdfComicRenderer::new(),
            summaries: Mutex::new(Vec::new()),
        }
    }

    fn summaries(&self) -> Vec<RenderSummary> {
        self.summaries.lock().unwrap().clone()
    }
}

impl ComicRenderer for RecordingRenderer {
    fn render(&self, layout: &ComicLayout) -> Result<RenderedComic, RenderError> {
        let rendered = self.inner.render(layout)?;
        self.summaries.lock().unwrap().push(rendered.summary);
        Ok(rendered)
    }

    fn extension(&self) -> &'static str {
        self.inner.extension()
    }
}

struct Harness {
    dir: TempDir,
    bus: InMemoryEventBus,
    store: Arc<InMemoryStoryStore>,
    generator: MockTextGenerator,
    renderer: Arc<RecordingRenderer>,
}

impl Harness {
    fn new(mode: DispatchMode, generator: MockTextGenerator) -> Self {
        let dir = TempDir::new().unwrap();
        let images = dir.path().join("storyImages");
        std::fs::create_dir_all(&images).unwrap();
        RgbImage::new(6, 3).save(images.join("castle.png")).unwrap();
        RgbImage::new(6, 3).save(images.join("dragon.png")).unwrap();

        let store = Arc::new(InMemoryStoryStore::new());
        store.insert_story(
            Story {
                id: StoryId::new(42),
                title: "The Dragon and the Castle".to_string(),
                content: "There was a castle. A dragon came. Everyone had tea.".to_string(),
                owner_id: UserId::new(7),
            },
            vec![
                ContentUnit::new(0, "There was a castle.").with_image("uploads/castle.png"),
                ContentUnit::new(1, "A dragon come.")
                    .with_corrected_text("A dragon came.")
                    .with_image("dragon.png"),
                ContentUnit::new(2, "Everyone had tea.").with_image("teacup.png"),
            ],
        );

        let renderer = Arc::new(RecordingRenderer::new());
        let bus = InMemoryEventBus::with_mode(mode);
        register_story_pipeline(
            &bus,
            PipelineDeps {
                stories: store.clone(),
                results: store.clone(),
                generator: Arc::new(generator.clone()),
                storage: Arc::new(LocalArtifactStorage::new(images, dir.path().join("comics"))),
                renderer: renderer.clone(),
            },
        );

        Self {
            dir,
            bus,
            store,
            generator,
            renderer,
        }
    }

    fn comic_path(&self) -> PathBuf {
        self.dir.path().join("comics").join("comic_42.pdf")
    }

    async fn complete_story(&self) {
        self.bus
            .publish(StoryCompleted::new(StoryId::new(42)).to_envelope())
            .await
            .unwrap();
    }
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn completed_story_produces_analysis_and_comic() {
    let harness = Harness::new(
        DispatchMode::Detached,
        MockTextGenerator::new().with_response(ANALYSIS_REPLY),
    );

    harness.complete_story().await;
    harness.bus.drain().await;

    // Analysis consumer
    let analysis = harness.store.analysis_for(StoryId::new(42)).unwrap();
    assert_eq!(analysis.analysis, "A charming tale with a clear arc.");
    assert_eq!(analysis.tips.len(), 2);
    assert_eq!(analysis.performance_score, 87);
    assert_eq!(harness.generator.call_count(), 1);

    // Comic consumer
    let summaries = harness.renderer.summaries();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].text_blocks, 3);
    assert_eq!(summaries[0].images_embedded, 2);

    let bytes = std::fs::read(harness.comic_path()).unwrap();
    let doc = lopdf::Document::load_mem(&bytes).unwrap();
    assert_eq!(doc.get_pages().len(), summaries[0].pages);

    let artifacts = harness.store.artifacts();
    assert_eq!(artifacts.len(), 1);
    assert_eq!(artifacts[0].owner_id, UserId::new(7));
    assert_eq!(artifacts[0].title, "The Dragon and the Castle");
    assert_eq!(artifacts[0].thumbnail, "uploads/castle.png");
    assert!(!artifacts[0].download_location.is_empty());
    assert!(artifacts[0].download_location.ends_with("comic_42.pdf"));
}

#[tokio::test]
async fn inline_dispatch_finishes_before_publish_returns() {
    let harness = Harness::new(
        DispatchMode::Inline,
        MockTextGenerator::new().with_response(ANALYSIS_REPLY),
    );

    harness.complete_story().await;

    assert!(harness.store.analysis_for(StoryId::new(42)).is_some());
    assert_eq!(harness.store.artifacts().len(), 1);
}

#[tokio::test]
async fn bare_story_id_payload_reaches_both_consumers() {
    let harness = Harness::new(
        DispatchMode::Inline,
        MockTextGenerator::new().with_response(ANALYSIS_REPLY),
    );

    harness
        .bus
        .publish(EventEnvelope::new(
            STORY_COMPLETED,
            "42",
            "Story",
            serde_json::json!({"story_id": 42}),
        ))
        .await
        .unwrap();

    assert!(harness.store.analysis_for(StoryId::new(42)).is_some());
    assert_eq!(harness.store.artifacts().len(), 1);
}

#[tokio::test]
async fn repeated_completion_writes_analysis_twice() {
    let harness = Harness::new(
        DispatchMode::Detached,
        MockTextGenerator::new().with_fallback(ANALYSIS_REPLY),
    );

    harness.complete_story().await;
    harness.complete_story().await;
    harness.bus.drain().await;

    assert_eq!(harness.store.analysis_write_count(StoryId::new(42)), 2);
    assert_eq!(harness.store.artifacts().len(), 2);
}

#[tokio::test]
async fn generation_failure_does_not_affect_comic() {
    let harness = Harness::new(
        DispatchMode::Detached,
        MockTextGenerator::new().with_error(GenerationError::Status {
            status: 500,
            body: "model crashed".to_string(),
        }),
    );

    harness.complete_story().await;
    harness.bus.drain().await;

    assert_eq!(harness.store.analysis_write_count(StoryId::new(42)), 0);
    assert_eq!(harness.store.artifacts().len(), 1);
    assert!(harness.comic_path().exists());
}

#[tokio::test]
async fn malformed_analysis_reply_writes_nothing() {
    let harness = Harness::new(
        DispatchMode::Detached,
        MockTextGenerator::new().with_response(r#"{"analysis": "Nice", "tips": []}"#),
    );

    harness.complete_story().await;
    harness.bus.drain().await;

    assert!(harness.store.analysis_for(StoryId::new(42)).is_none());
    assert_eq!(harness.store.artifacts().len(), 1);
}

#[tokio::test]
async fn slow_generation_does_not_delay_comic() {
    let harness = Harness::new(
        DispatchMode::Detached,
        MockTextGenerator::new()
            .with_response(ANALYSIS_REPLY)
            .with_delay(Duration::from_millis(1500)),
    );

    harness.complete_story().await;

    tokio::time::timeout(Duration::from_secs(1), async {
        while harness.store.artifacts().is_empty() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("comic waited on the analysis consumer");
    assert!(harness.store.analysis_for(StoryId::new(42)).is_none());

    harness.bus.drain().await;
    assert!(harness.store.analysis_for(StoryId::new(42)).is_some());
}

#[tokio::test]
async fn panicking_subscriber_does_not_stop_pipeline() {
    struct Exploding(Arc<AtomicUsize>);

    #[async_trait]
    impl EventHandler for Exploding {
        async fn handle(&self, _: EventEnvelope) -> Result<(), DomainError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            panic!("subscriber bug");
        }
        fn name(&self) -> &'static str {
            "Exploding"
        }
    }

    let harness = Harness::new(
        DispatchMode::Detached,
        MockTextGenerator::new().with_response(ANALYSIS_REPLY),
    );
    let calls = Arc::new(AtomicUsize::new(0));
    harness.bus.subscribe(STORY_COMPLETED, Arc::new(Exploding(calls.clone())));

    harness.complete_story().await;
    harness.bus.drain().await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(harness.store.analysis_for(StoryId::new(42)).is_some());
    assert_eq!(harness.store.artifacts().len(), 1);
}

#[tokio::test]
async fn unknown_story_produces_nothing() {
    let harness = Harness::new(
        DispatchMode::Detached,
        MockTextGenerator::new().with_response(ANALYSIS_REPLY),
    );

    harness
        .bus
        .publish(StoryCompleted::new(StoryId::new(999)).to_envelope())
        .await
        .unwrap();
    harness.bus.drain().await;

    assert_eq!(harness.generator.call_count(), 0);
    assert!(harness.store.artifacts().is_empty());
    assert!(!harness.dir.path().join("comics").join("comic_999.pdf").exists());
}

#[tokio::test]
async fn other_topics_reach_no_consumer() {
    let harness = Harness::new(
        DispatchMode::Detached,
        MockTextGenerator::new().with_response(ANALYSIS_REPLY),
    );

    harness
        .bus
        .publish(EventEnvelope::new(
            "story.archived.v1",
            "42",
            "Story",
            serde_json::json!({"story_id": 42}),
        ))
        .await
        .unwrap();
    harness.bus.drain().await;

    assert_eq!(harness.generator.call_count(), 0);
    assert!(harness.store.artifacts().is_empty());
}
