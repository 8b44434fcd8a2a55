//! Story read models handed to the pipeline by the persistence layer.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{StoryId, UserId};

/// A story as the content provider returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    pub id: StoryId,
    pub title: String,
    /// Full story text, used as the analysis prompt body.
    pub content: String,
    pub owner_id: UserId,
}

/// One sentence of a story, optionally illustrated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentUnit {
    /// Position within the story; units are rendered in ascending order.
    pub position: u32,
    /// Sentence as the user wrote it.
    pub text: String,
    /// Sentence after model correction. Empty when no correction was stored.
    #[serde(default)]
    pub corrected_text: String,
    /// Image reference (URL or path). Only its file name is used on disk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_reference: Option<String>,
}

impl ContentUnit {
    /// Creates an unillustrated unit with no stored correction.
    pub fn new(position: u32, text: impl Into<String>) -> Self {
        Self {
            position,
            text: text.into(),
            corrected_text: String::new(),
            image_reference: None,
        }
    }

    /// Sets the corrected sentence.
    pub fn with_corrected_text(mut self, corrected: impl Into<String>) -> Self {
        self.corrected_text = corrected.into();
        self
    }

    /// Sets the image reference.
    pub fn with_image(mut self, reference: impl Into<String>) -> Self {
        self.image_reference = Some(reference.into());
        self
    }

    /// Text to show for this unit: the correction when present, else the original.
    pub fn display_text(&self) -> &str {
        if self.corrected_text.trim().is_empty() {
            &self.text
        } else {
            &self.corrected_text
        }
    }

    /// Image reference if it is present and non-blank.
    pub fn image(&self) -> Option<&str> {
        self.image_reference
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }
}
