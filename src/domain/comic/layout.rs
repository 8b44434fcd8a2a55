//! Renderer-independent description of a comic.

/// Everything a renderer needs to produce the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComicLayout {
    pub title: String,
    pub panels: Vec<ComicPanel>,
}

/// One content unit as it appears in the comic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComicPanel {
    pub text: String,
    pub image: Option<PanelImage>,
}

/// Encoded image bytes loaded for a panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelImage {
    /// File name the bytes were loaded from, for logging.
    pub name: String,
    pub bytes: Vec<u8>,
}

/// What a renderer actually put on the page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderSummary {
    pub pages: usize,
    pub text_blocks: usize,
    pub images_embedded: usize,
    /// Images present in the layout that could not be decoded.
    pub images_skipped: usize,
}
