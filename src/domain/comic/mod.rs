//! Comic module - the rendered artifact of a completed story.
//!
//! A comic is laid out as a title page followed by one panel per content
//! unit: the unit's image when it could be loaded, then its text.

mod artifact;
mod layout;

pub use artifact::{select_thumbnail, Artifact};
pub use layout::{ComicLayout, ComicPanel, PanelImage, RenderSummary};
