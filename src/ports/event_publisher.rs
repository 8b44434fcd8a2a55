//! EventPublisher port - Interface for publishing domain events.
//!
//! This port defines how producers publish events without knowing which
//! consumers, if any, react to them.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Port for publishing domain events.
///
/// Implementations must ensure:
/// - Every handler subscribed to the event type is invoked exactly once
/// - A topic without subscribers is a successful no-op
/// - Handler failures are never reported back to the publisher
///
/// # Example
///
/// ```ignore
/// let event = StoryCompleted::new(story_id);
/// publisher.publish(event.to_envelope()).await?;
/// ```
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a single event.
    ///
    /// An `Err` means the event could not be dispatched at all, never that
    /// a consumer failed.
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError>;
}
