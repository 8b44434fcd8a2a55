//! Event bus adapters.
//!
//! - `InMemoryEventBus` - In-process publish/subscribe with a selectable
//!   [`DispatchMode`]

mod in_memory;

pub use in_memory::{DispatchMode, InMemoryEventBus};
