//! Persisted record of a rendered comic.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, UserId};
use crate::domain::story::ContentUnit;

/// Record of one rendered comic. Never mutated; regeneration creates a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub owner_id: UserId,
    pub title: String,
    /// Image reference of the first illustrated unit, or empty.
    pub thumbnail: String,
    pub view_location: String,
    pub download_location: String,
    pub completed_at: Timestamp,
}

/// Picks the first image reference in content order, or an empty string.
pub fn select_thumbnail(units: &[ContentUnit]) -> String {
    units
        .iter()
        .find_map(ContentUnit::image)
        .map(str::to_string)
        .unwrap_or_default()
}
