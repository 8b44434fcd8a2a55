//! EventSubscriber port - Interface for subscribing to domain events.
//!
//! This port defines how consumers register interest in domain events
//! without knowing who publishes them.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Handler for processing domain events.
///
/// Implementations should be:
/// - **Self-contained** - Fetch what they need from their own collaborators
/// - **Isolated** - Errors are logged by the bus and go nowhere else
///
/// # Example
///
/// ```ignore
/// struct ComicGenerationHandler { /* ... */ }
///
/// #[async_trait]
/// impl EventHandler for ComicGenerationHandler {
///     async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
///         let payload: StoryCompleted = event.payload_as()?;
///         // Render the comic...
///         Ok(())
///     }
///
///     fn name(&self) -> &'static str {
///         "ComicGenerationHandler"
///     }
/// }
/// ```
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Process an event.
    ///
    /// A payload that does not match what the handler expects is the
    /// handler's own error to report.
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError>;

    /// Handler name for logging.
    fn name(&self) -> &'static str;
}

/// Port for subscribing to domain events.
///
/// Subscriptions are made once during startup and live for the process
/// lifetime; there is no unsubscribe.
///
/// # Example
///
/// ```ignore
/// subscriber.subscribe(STORY_COMPLETED, analysis_handler);
/// subscriber.subscribe(STORY_COMPLETED, comic_handler);
/// ```
pub trait EventSubscriber: Send + Sync {
    /// Subscribe handler to a specific event type.
    fn subscribe(&self, event_type: &str, handler: Arc<dyn EventHandler>);
}
