//! Artifact Storage Port - filesystem access for comic generation.
//!
//! Images are read from an input location keyed by file name; rendered
//! documents are written to an output location keyed by story.

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

use crate::domain::foundation::StoryId;

/// Port for loading panel images and storing rendered comics.
///
/// # Contract
///
/// Implementations must:
/// - Resolve images by the file-name component of the reference only
/// - Write artifacts atomically (no partial file on failure)
/// - Return the location of the written artifact
#[async_trait]
pub trait ArtifactStorage: Send + Sync {
    /// Read an image by reference. `NotFound` when it does not exist.
    async fn read_image(&self, reference: &str) -> Result<Vec<u8>, StorageError>;

    /// Write a rendered artifact for a story, returning where it landed.
    async fn write_artifact(
        &self,
        story_id: StoryId,
        extension: &str,
        bytes: &[u8],
    ) -> Result<PathBuf, StorageError>;
}

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("file not found: {0}")]
    NotFound(String),

    #[error("invalid reference: {0}")]
    InvalidReference(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl StorageError {
    /// Creates an I/O error.
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io(message.into())
    }

    /// Creates a not found error.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }
}
