//! Request/response services built on the text generator.

mod writing_assistant;

pub use writing_assistant::WritingAssistant;
