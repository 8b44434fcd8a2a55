//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the pipeline and the outside world. Adapters implement these ports.
//!
//! ## Event Ports
//!
//! - `EventPublisher` - Port for publishing domain events
//! - `EventSubscriber` - Port for subscribing to domain events
//! - `EventHandler` - Handler that processes incoming events
//!
//! ## Generation Ports
//!
//! - `TextGenerator` - Prompt-in, text-out generation service
//!
//! ## Story Ports
//!
//! - `StoryContentProvider` - Reads stories and their content units
//! - `StoryResultSink` - Writes analyses and comic records
//!
//! ## Comic Ports
//!
//! - `ComicRenderer` - Renders a comic layout into a document
//! - `ArtifactStorage` - Loads panel images, stores rendered documents

mod artifact_storage;
mod comic_renderer;
mod event_publisher;
mod event_subscriber;
mod story_reader;
mod story_result_sink;
mod text_generator;

pub use artifact_storage::{ArtifactStorage, StorageError};
pub use comic_renderer::{ComicRenderer, RenderError, RenderedComic};
pub use event_publisher::EventPublisher;
pub use event_subscriber::{EventHandler, EventSubscriber};
pub use story_reader::StoryContentProvider;
pub use story_result_sink::StoryResultSink;
pub use text_generator::{GenerationError, TextGenerator};
