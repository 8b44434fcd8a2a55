//! Document rendering adapters.

mod lopdf_renderer;

pub use lopdf_renderer::LopdfComicRenderer;
