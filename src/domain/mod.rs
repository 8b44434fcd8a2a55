//! Domain layer - story pipeline vocabulary and pure logic.
//!
//! Nothing in here performs I/O. Consumers in `application` combine these
//! types with the ports.

pub mod analysis;
pub mod comic;
pub mod feedback;
pub mod foundation;
pub mod story;
