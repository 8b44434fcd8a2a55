//! Comic Renderer Port - turns a layout into document bytes.

use thiserror::Error;

use crate::domain::comic::{ComicLayout, RenderSummary};

/// Port for rendering a comic layout into a document.
///
/// # Contract
///
/// - Title page first, then each panel in layout order
/// - A panel image that cannot be decoded is skipped; its text still renders
/// - Output is the complete document; nothing is written to disk
/// - Rendering is CPU bound; async callers run it on the blocking pool
pub trait ComicRenderer: Send + Sync {
    /// Render the layout.
    fn render(&self, layout: &ComicLayout) -> Result<RenderedComic, RenderError>;

    /// File extension of the produced documents (without the dot).
    fn extension(&self) -> &'static str;
}

/// A rendered document and what went into it.
#[derive(Debug, Clone)]
pub struct RenderedComic {
    pub bytes: Vec<u8>,
    pub summary: RenderSummary,
}

/// Errors that abort a whole render.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to encode document: {0}")]
    Encode(String),

    /// The render task panicked or was cancelled.
    #[error("render task aborted: {0}")]
    Aborted(String),
}
