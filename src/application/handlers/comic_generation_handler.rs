//! ComicGenerationHandler - renders a completed story as a comic.
//!
//! On `story.completed.v1` it loads the story and its content units, pulls
//! in whatever panel images exist, renders the document, writes it to
//! artifact storage and records it. A fetch failure writes no file; a render
//! or write failure creates no record.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::application::PipelineError;
use crate::domain::comic::{select_thumbnail, Artifact, ComicLayout, ComicPanel, PanelImage, RenderSummary};
use crate::domain::foundation::{DomainError, EventEnvelope, StoryId, Timestamp};
use crate::domain::story::{CompletedStoryRef, ContentUnit};
use crate::ports::{
    ArtifactStorage, ComicRenderer, EventHandler, RenderError, RenderedComic, StoryContentProvider,
    StoryResultSink,
};

/// Outcome of one comic run.
#[derive(Debug, Clone)]
pub struct GeneratedComic {
    pub artifact: Artifact,
    pub summary: RenderSummary,
}

/// Handles StoryCompleted events by producing a comic artifact.
pub struct ComicGenerationHandler {
    stories: Arc<dyn StoryContentProvider>,
    results: Arc<dyn StoryResultSink>,
    storage: Arc<dyn ArtifactStorage>,
    renderer: Arc<dyn ComicRenderer>,
}

impl ComicGenerationHandler {
    pub fn new(
        stories: Arc<dyn StoryContentProvider>,
        results: Arc<dyn StoryResultSink>,
        storage: Arc<dyn ArtifactStorage>,
        renderer: Arc<dyn ComicRenderer>,
    ) -> Self {
        Self {
            stories,
            results,
            storage,
            renderer,
        }
    }

    /// Runs one comic generation and records the artifact.
    pub async fn generate(&self, story_id: StoryId) -> Result<GeneratedComic, PipelineError> {
        let story = self.stories.get_story(story_id).await?;
        let units = self.stories.get_content_units(story_id).await?;

        let mut panels = Vec::with_capacity(units.len());
        for unit in &units {
            panels.push(ComicPanel {
                text: unit.display_text().to_string(),
                image: self.load_image(story_id, unit).await,
            });
        }
        let layout = ComicLayout {
            title: story.title.clone(),
            panels,
        };

        let rendered = self.render(layout).await?;
        let path = self
            .storage
            .write_artifact(story_id, self.renderer.extension(), &rendered.bytes)
            .await?;
        let location = path.display().to_string();

        let artifact = Artifact {
            owner_id: story.owner_id,
            title: story.title,
            thumbnail: select_thumbnail(&units),
            view_location: location.clone(),
            download_location: location,
            completed_at: Timestamp::now(),
        };
        self.results.save_artifact(artifact.clone()).await?;

        let summary = rendered.summary;
        info!(
            story_id = %story_id,
            path = %artifact.download_location,
            pages = summary.pages,
            images_embedded = summary.images_embedded,
            images_skipped = summary.images_skipped,
            "Comic generated"
        );
        Ok(GeneratedComic { artifact, summary })
    }

    /// Renders off the async workers so other consumers keep running.
    async fn render(&self, layout: ComicLayout) -> Result<RenderedComic, RenderError> {
        let renderer = Arc::clone(&self.renderer);
        tokio::task::spawn_blocking(move || renderer.render(&layout))
            .await
            .map_err(|e| RenderError::Aborted(e.to_string()))?
    }

    /// Loads a unit's image; any failure leaves the panel without one.
    async fn load_image(&self, story_id: StoryId, unit: &ContentUnit) -> Option<PanelImage> {
        let reference = unit.image()?;
        match self.storage.read_image(reference).await {
            Ok(bytes) => Some(PanelImage {
                name: reference.to_string(),
                bytes,
            }),
            Err(e) => {
                warn!(
                    story_id = %story_id,
                    position = unit.position,
                    image = reference,
                    error = %e,
                    "Panel image unavailable, rendering text only"
                );
                None
            }
        }
    }
}

#[async_trait]
impl EventHandler for ComicGenerationHandler {
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
        let payload: CompletedStoryRef = event
            .payload_as()
            .map_err(|e| PipelineError::InvalidPayload(e.to_string()))?;

        debug!(story_id = %payload.story_id, event_id = %event.event_id, "Generating comic");
        self.generate(payload.story_id).await?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "ComicGenerationHandler"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryStoryStore, LocalArtifactStorage, LopdfComicRenderer, StoreOperation};
    use crate::domain::foundation::{ErrorCode, SerializableDomainEvent, UserId};
    use crate::domain::story::{Story, StoryCompleted, STORY_COMPLETED};
    use image::RgbImage;
    use std::time::{Duration, Instant};
    use tempfile::TempDir;

    struct Fixture {
        dir: TempDir,
        store: Arc<InMemoryStoryStore>,
        storage: Arc<LocalArtifactStorage>,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let images = dir.path().join("images");
            std::fs::create_dir_all(&images).unwrap();
            RgbImage::new(4, 2).save(images.join("cat.png")).unwrap();
            RgbImage::new(4, 2).save(images.join("dog.png")).unwrap();

            let store = Arc::new(InMemoryStoryStore::new());
            store.insert_story(
                Story {
                    id: StoryId::new(5),
                    title: "Pets".to_string(),
                    content: "Cats. Dogs. Fish.".to_string(),
                    owner_id: UserId::new(2),
                },
                vec![
                    ContentUnit::new(0, "cats").with_corrected_text("Cats.").with_image("http://cdn/img/cat.png"),
                    ContentUnit::new(1, "Dogs.").with_image("dog.png"),
                    ContentUnit::new(2, "Fish.").with_image("missing.png"),
                ],
            );

            let storage = Arc::new(LocalArtifactStorage::new(images, dir.path().join("comics")));
            Self { dir, store, storage }
        }

        fn handler(&self) -> ComicGenerationHandler {
            self.handler_with(Arc::new(LopdfComicRenderer::new()))
        }

        fn handler_with(&self, renderer: Arc<dyn ComicRenderer>) -> ComicGenerationHandler {
            ComicGenerationHandler::new(
                self.store.clone(),
                self.store.clone(),
                self.storage.clone(),
                renderer,
            )
        }

        fn comic_path(&self) -> std::path::PathBuf {
            self.dir.path().join("comics/comic_5.pdf")
        }
    }

    struct FailingRenderer;

    impl ComicRenderer for FailingRenderer {
        fn render(&self, _: &ComicLayout) -> Result<RenderedComic, RenderError> {
            Err(RenderError::Encode("out of paper".to_string()))
        }
        fn extension(&self) -> &'static str {
            "pdf"
        }
    }

    /// Holds its thread the way a large render does.
    struct SlowRenderer(Duration);

    impl ComicRenderer for SlowRenderer {
        fn render(&self, layout: &ComicLayout) -> Result<RenderedComic, RenderError> {
            std::thread::sleep(self.0);
            LopdfComicRenderer::new().render(layout)
        }
        fn extension(&self) -> &'static str {
            "pdf"
        }
    }

    struct PanickingRenderer;

    impl ComicRenderer for PanickingRenderer {
        fn render(&self, _: &ComicLayout) -> Result<RenderedComic, RenderError> {
            panic!("renderer bug");
        }
        fn extension(&self) -> &'static str {
            "pdf"
        }
    }

    #[tokio::test]
    async fn generates_comic_and_records_artifact() {
        let fixture = Fixture::new();

        let comic = fixture.handler().generate(StoryId::new(5)).await.unwrap();

        assert_eq!(comic.summary.text_blocks, 3);
        assert_eq!(comic.summary.images_embedded, 2);
        assert!(fixture.comic_path().exists());

        let artifacts = fixture.store.artifacts();
        assert_eq!(artifacts.len(), 1);
        let artifact = &artifacts[0];
        assert_eq!(artifact.owner_id, UserId::new(2));
        assert_eq!(artifact.title, "Pets");
        assert_eq!(artifact.thumbnail, "http://cdn/img/cat.png");
        assert_eq!(artifact.download_location, fixture.comic_path().display().to_string());
        assert_eq!(artifact.view_location, artifact.download_location);
    }

    #[tokio::test]
    async fn handles_event_payload() {
        let fixture = Fixture::new();
        let event = StoryCompleted::new(StoryId::new(5)).to_envelope();

        fixture.handler().handle(event).await.unwrap();

        assert_eq!(fixture.store.artifacts().len(), 1);
    }

    #[tokio::test]
    async fn handles_bare_story_id_payload() {
        let fixture = Fixture::new();
        let event = EventEnvelope::new(STORY_COMPLETED, "5", "Story", serde_json::json!({"story_id": 5}));

        fixture.handler().handle(event).await.unwrap();

        assert_eq!(fixture.store.artifacts().len(), 1);
        assert!(fixture.comic_path().exists());
    }

    #[tokio::test]
    async fn fetch_failure_writes_no_file() {
        let fixture = Fixture::new();
        fixture.store.fail_on(StoreOperation::GetContentUnits);

        let err = fixture.handler().generate(StoryId::new(5)).await.unwrap_err();

        assert!(matches!(err, PipelineError::Store(_)));
        assert!(!fixture.comic_path().exists());
        assert!(fixture.store.artifacts().is_empty());
    }

    #[tokio::test]
    async fn render_failure_creates_no_record() {
        let fixture = Fixture::new();

        let err = fixture
            .handler_with(Arc::new(FailingRenderer))
            .handle(StoryCompleted::new(StoryId::new(5)).to_envelope())
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::RenderFailed);
        assert!(!fixture.comic_path().exists());
        assert!(fixture.store.artifacts().is_empty());
    }

    #[tokio::test]
    async fn renderer_panic_is_a_render_failure() {
        let fixture = Fixture::new();

        let err = fixture
            .handler_with(Arc::new(PanickingRenderer))
            .generate(StoryId::new(5))
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Render(RenderError::Aborted(_))));
        assert!(!fixture.comic_path().exists());
        assert!(fixture.store.artifacts().is_empty());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn slow_render_leaves_runtime_responsive() {
        let fixture = Fixture::new();
        let handler = Arc::new(fixture.handler_with(Arc::new(SlowRenderer(Duration::from_millis(500)))));

        let task = tokio::spawn({
            let handler = handler.clone();
            async move { handler.generate(StoryId::new(5)).await }
        });

        let mut worst = Duration::ZERO;
        while !task.is_finished() {
            let tick = Instant::now();
            tokio::time::sleep(Duration::from_millis(5)).await;
            worst = worst.max(tick.elapsed());
        }

        task.await.unwrap().unwrap();
        assert!(worst < Duration::from_millis(250), "runtime stalled for {:?}", worst);
        assert_eq!(fixture.store.artifacts().len(), 1);
    }

    #[tokio::test]
    async fn write_failure_creates_no_record() {
        let fixture = Fixture::new();
        let blocker = fixture.dir.path().join("blocked");
        std::fs::write(&blocker, b"file, not dir").unwrap();
        let storage = Arc::new(LocalArtifactStorage::new(fixture.dir.path().join("images"), blocker));
        let handler = ComicGenerationHandler::new(
            fixture.store.clone(),
            fixture.store.clone(),
            storage,
            Arc::new(LopdfComicRenderer::new()),
        );

        let err = handler.generate(StoryId::new(5)).await.unwrap_err();

        assert!(matches!(err, PipelineError::Storage(_)));
        assert!(fixture.store.artifacts().is_empty());
    }

    #[tokio::test]
    async fn story_without_images_has_empty_thumbnail() {
        let fixture = Fixture::new();
        fixture.store.insert_story(
            Story {
                id: StoryId::new(6),
                title: "Plain".to_string(),
                content: "Words.".to_string(),
                owner_id: UserId::new(2),
            },
            vec![ContentUnit::new(0, "Words.")],
        );

        let comic = fixture.handler().generate(StoryId::new(6)).await.unwrap();

        assert_eq!(comic.artifact.thumbnail, "");
        assert_eq!(comic.summary.images_embedded, 0);
        assert_eq!(comic.summary.text_blocks, 1);
    }
}
