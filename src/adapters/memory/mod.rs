//! In-process story persistence.

mod in_memory_story_store;

pub use in_memory_story_store::{InMemoryStoryStore, StoreOperation};
