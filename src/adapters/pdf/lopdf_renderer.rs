//! PDF comic renderer built on lopdf.
//!
//! Produces an A4 document: a title page, then the panels flowing top to
//! bottom across as many pages as they need. Each panel is its image (scaled
//! to the content width) followed by its wrapped text.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::RgbImage;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

use crate::domain::comic::{ComicLayout, ComicPanel, PanelImage, RenderSummary};
use crate::ports::{ComicRenderer, RenderError, RenderedComic};

const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 42;
const CONTENT_WIDTH: i64 = PAGE_WIDTH - 2 * MARGIN;
const CONTENT_HEIGHT: i64 = PAGE_HEIGHT - 2 * MARGIN;
/// Tallest an image may be drawn, leaving room for its text on the page.
const MAX_IMAGE_HEIGHT: i64 = CONTENT_HEIGHT * 3 / 5;

const TITLE_SIZE: i64 = 24;
const TITLE_LEADING: i64 = 30;
const BODY_SIZE: i64 = 12;
const BODY_LEADING: i64 = 16;
const IMAGE_GAP: i64 = 8;
const PANEL_GAP: i64 = 24;

const BODY_FONT: &str = "F1";
const TITLE_FONT: &str = "F2";
const UNTITLED: &str = "Untitled";

/// Renders comics to PDF.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfComicRenderer;

impl LopdfComicRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl ComicRenderer for LopdfComicRenderer {
    fn render(&self, layout: &ComicLayout) -> Result<RenderedComic, RenderError> {
        let mut builder = PdfBuilder::new();

        let title = match layout.title.trim() {
            "" => UNTITLED,
            title => title,
        };
        builder.write_text(title, TITLE_FONT, TITLE_SIZE, TITLE_LEADING);
        builder.next_page()?;

        for panel in &layout.panels {
            builder.write_panel(panel)?;
        }

        builder.finish()
    }

    fn extension(&self) -> &'static str {
        "pdf"
    }
}

/// Operations and image references of the page being written.
struct PageDraft {
    operations: Vec<Operation>,
    images: Vec<(String, ObjectId)>,
    /// Baseline of the next element, measured from the page bottom.
    cursor: i64,
}

impl PageDraft {
    fn new() -> Self {
        Self {
            operations: Vec::new(),
            images: Vec::new(),
            cursor: PAGE_HEIGHT - MARGIN,
        }
    }

    fn is_blank(&self) -> bool {
        self.operations.is_empty()
    }

    fn remaining(&self) -> i64 {
        self.cursor - MARGIN
    }
}

struct PdfBuilder {
    doc: Document,
    pages_id: ObjectId,
    body_font_id: ObjectId,
    title_font_id: ObjectId,
    page_ids: Vec<ObjectId>,
    page: PageDraft,
    image_count: usize,
    summary: RenderSummary,
}

impl PdfBuilder {
    fn new() -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let body_font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let title_font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
            "Encoding" => "WinAnsiEncoding",
        });

        Self {
            doc,
            pages_id,
            body_font_id,
            title_font_id,
            page_ids: Vec::new(),
            page: PageDraft::new(),
            image_count: 0,
            summary: RenderSummary::default(),
        }
    }

    fn write_panel(&mut self, panel: &ComicPanel) -> Result<(), RenderError> {
        if let Some(image) = &panel.image {
            match decode(image) {
                Some(rgb) => {
                    self.place_image(rgb)?;
                    self.summary.images_embedded += 1;
                }
                None => self.summary.images_skipped += 1,
            }
        }

        if !panel.text.trim().is_empty() {
            self.write_text(&panel.text, BODY_FONT, BODY_SIZE, BODY_LEADING);
            self.summary.text_blocks += 1;
        }

        self.page.cursor -= PANEL_GAP;
        Ok(())
    }

    fn write_text(&mut self, text: &str, font: &str, size: i64, leading: i64) {
        for line in wrap(text, max_chars(size)) {
            if self.page.remaining() < leading {
                // Text overflow never fails; a broken page is the worst case
                if let Err(e) = self.next_page() {
                    tracing::warn!(error = %e, "Failed to start page for overflowing text");
                    return;
                }
            }
            self.page.cursor -= leading;
            let baseline = self.page.cursor;
            self.page.operations.extend([
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec![Object::Name(font.as_bytes().to_vec()), Object::Integer(size)]),
                Operation::new("Td", vec![Object::Integer(MARGIN), Object::Integer(baseline)]),
                Operation::new("Tj", vec![Object::string_literal(to_win_ansi(&line))]),
                Operation::new("ET", vec![]),
            ]);
        }
    }

    fn place_image(&mut self, rgb: RgbImage) -> Result<(), RenderError> {
        let (width, height) = fit(rgb.width(), rgb.height());
        if self.page.remaining() < height && !self.page.is_blank() {
            self.next_page()?;
        }

        let stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => Object::Integer(i64::from(rgb.width())),
                "Height" => Object::Integer(i64::from(rgb.height())),
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => Object::Integer(8),
                "Filter" => "FlateDecode",
            },
            deflate(rgb.as_raw())?,
        );
        let image_id = self.doc.add_object(stream);
        self.image_count += 1;
        let name = format!("Im{}", self.image_count);

        let bottom = self.page.cursor - height;
        self.page.operations.extend([
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    Object::Integer(width),
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(height),
                    Object::Integer(MARGIN),
                    Object::Integer(bottom),
                ],
            ),
            Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())]),
            Operation::new("Q", vec![]),
        ]);
        self.page.images.push((name, image_id));
        self.page.cursor = bottom - IMAGE_GAP;
        Ok(())
    }

    /// Closes the current page and starts a fresh one.
    fn next_page(&mut self) -> Result<(), RenderError> {
        let draft = std::mem::replace(&mut self.page, PageDraft::new());
        self.flush(draft)
    }

    fn flush(&mut self, draft: PageDraft) -> Result<(), RenderError> {
        let content = Content {
            operations: draft.operations,
        }
        .encode()
        .map_err(|e| RenderError::Encode(e.to_string()))?;
        let content_id = self.doc.add_object(Stream::new(dictionary! {}, content));

        let mut xobjects = Dictionary::new();
        for (name, id) in draft.images {
            xobjects.set(name, id);
        }

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "Contents" => content_id,
            "Resources" => dictionary! {
                "Font" => dictionary! {
                    BODY_FONT => self.body_font_id,
                    TITLE_FONT => self.title_font_id,
                },
                "XObject" => xobjects,
            },
        });
        self.page_ids.push(page_id);
        Ok(())
    }

    fn finish(mut self) -> Result<RenderedComic, RenderError> {
        if !self.page.is_blank() {
            let draft = std::mem::replace(&mut self.page, PageDraft::new());
            self.flush(draft)?;
        }

        let count = self.page_ids.len();
        let kids: Vec<Object> = self.page_ids.iter().map(|id| Object::Reference(*id)).collect();
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(count as i64),
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(PAGE_WIDTH),
                Object::Integer(PAGE_HEIGHT),
            ],
        };
        self.doc.objects.insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        self.doc
            .save_to(&mut bytes)
            .map_err(|e| RenderError::Encode(e.to_string()))?;

        self.summary.pages = count;
        Ok(RenderedComic {
            bytes,
            summary: self.summary,
        })
    }
}

fn decode(image: &PanelImage) -> Option<RgbImage> {
    match image::load_from_memory(&image.bytes) {
        Ok(decoded) => Some(decoded.to_rgb8()),
        Err(e) => {
            tracing::warn!(image = %image.name, error = %e, "Skipping undecodable panel image");
            None
        }
    }
}

/// Zlib stream for a `FlateDecode` filter.
fn deflate(raw: &[u8]) -> Result<Vec<u8>, RenderError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(raw)
        .map_err(|e| RenderError::Encode(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| RenderError::Encode(e.to_string()))
}

/// Drawn size of an image: content width, capped in height, aspect kept.
fn fit(width: u32, height: u32) -> (i64, i64) {
    let (w, h) = (f64::from(width.max(1)), f64::from(height.max(1)));
    let mut draw_w = CONTENT_WIDTH as f64;
    let mut draw_h = draw_w * h / w;
    if draw_h > MAX_IMAGE_HEIGHT as f64 {
        draw_h = MAX_IMAGE_HEIGHT as f64;
        draw_w = draw_h * w / h;
    }
    ((draw_w.round() as i64).max(1), (draw_h.round() as i64).max(1))
}

/// Characters per line for Helvetica at the given size (average glyph ~0.5em).
fn max_chars(size: i64) -> usize {
    ((CONTENT_WIDTH * 2 / size).max(1)) as usize
}

/// Greedy word wrap; words longer than a line are split.
fn wrap(text: &str, max: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max {
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            let rest = word.split_off(max);
            lines.push(word.into_iter().collect());
            word = rest;
        }

        let needed = if line.is_empty() { word.len() } else { line.chars().count() + 1 + word.len() };
        if needed > max {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.extend(word);
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Latin-1 subset of WinAnsi; anything else becomes '?'.
fn to_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match u32::from(c) {
            code @ 0x20..=0x7e | code @ 0xa0..=0xff => code as u8,
            _ => b'?',
        })
        .collect()
}
