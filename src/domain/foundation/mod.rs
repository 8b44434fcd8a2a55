//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, event infrastructure and error types
//! that form the vocabulary of the story pipeline.

mod errors;
mod events;
mod ids;
mod timestamp;

pub use errors::{DomainError, ErrorCode};
pub use events::{
    DomainEvent, EventEnvelope, EventId, EventMetadata, SerializableDomainEvent,
};
pub use ids::{StoryId, UserId};
pub use timestamp::Timestamp;
