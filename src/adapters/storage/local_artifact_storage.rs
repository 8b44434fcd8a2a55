//! Local Filesystem Storage Adapter - Implementation of ArtifactStorage.
//!
//! Reads panel images from one directory and writes rendered comics into
//! another.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::domain::foundation::StoryId;
use crate::ports::{ArtifactStorage, StorageError};

/// Local filesystem storage for comic generation.
///
/// # Directory Structure
///
/// ```text
/// {image_dir}/
/// ├── cat.png
/// └── dog.jpg
/// {artifact_dir}/
/// ├── comic_1.pdf
/// └── comic_2.pdf
/// ```
///
/// Image references may carry any directory prefix; only the final
/// component is looked up in `image_dir`.
///
/// Artifacts are written to a `comic_{id}.{ext}.*.tmp` file, synced, then renamed,
/// so a failed write never leaves a partial document behind.
#[derive(Debug, Clone)]
pub struct LocalArtifactStorage {
    image_dir: PathBuf,
    artifact_dir: PathBuf,
}

impl LocalArtifactStorage {
    /// Creates storage over the given image and artifact directories.
    pub fn new(image_dir: impl Into<PathBuf>, artifact_dir: impl Into<PathBuf>) -> Self {
        Self {
            image_dir: image_dir.into(),
            artifact_dir: artifact_dir.into(),
        }
    }

    /// Returns the artifact directory.
    pub fn artifact_dir(&self) -> &Path {
        &self.artifact_dir
    }

    /// Returns the path an artifact for the story would be written to.
    pub fn artifact_path(&self, story_id: StoryId, extension: &str) -> PathBuf {
        self.artifact_dir
            .join(format!("comic_{}.{}", story_id, extension))
    }

    /// Unique per write, so concurrent runs for one story never share it.
    fn temp_path(&self, story_id: StoryId, extension: &str) -> PathBuf {
        self.artifact_dir
            .join(format!("comic_{}.{}.{}.tmp", story_id, extension, Uuid::new_v4()))
    }

    /// Resolves a reference to a path inside `image_dir` by its file name.
    fn image_path(&self, reference: &str) -> Result<PathBuf, StorageError> {
        let name = base_name(reference)
            .ok_or_else(|| StorageError::InvalidReference(reference.to_string()))?;
        Ok(self.image_dir.join(name))
    }
}

/// Final path component of a reference, accepting either separator.
fn base_name(reference: &str) -> Option<&str> {
    let name = reference
        .trim()
        .rsplit(|c| c == '/' || c == '\\')
        .next()?;
    match name {
        "" | "." | ".." => None,
        name => Some(name),
    }
}

#[async_trait]
impl ArtifactStorage for LocalArtifactStorage {
    async fn read_image(&self, reference: &str) -> Result<Vec<u8>, StorageError> {
        let path = self.image_path(reference)?;

        fs::read(&path).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StorageError::not_found(path.display().to_string())
            } else {
                StorageError::io(format!("Failed to read image {}: {}", path.display(), e))
            }
        })
    }

    async fn write_artifact(
        &self,
        story_id: StoryId,
        extension: &str,
        bytes: &[u8],
    ) -> Result<PathBuf, StorageError> {
        fs::create_dir_all(&self.artifact_dir).await.map_err(|e| {
            StorageError::io(format!(
                "Failed to create artifact directory {}: {}",
                self.artifact_dir.display(),
                e
            ))
        })?;

        let temp_path = self.temp_path(story_id, extension);
        let final_path = self.artifact_path(story_id, extension);

        if let Err(e) = write_synced(&temp_path, bytes).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e);
        }

        if let Err(e) = fs::rename(&temp_path, &final_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(StorageError::io(format!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                final_path.display(),
                e
            )));
        }

        tracing::debug!(story_id = %story_id, path = %final_path.display(), bytes = bytes.len(), "Artifact written");
        Ok(final_path)
    }
}

async fn write_synced(path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    let mut file = fs::File::create(path).await.map_err(|e| {
        StorageError::io(format!("Failed to create temp file {}: {}", path.display(), e))
    })?;

    file.write_all(bytes).await.map_err(|e| {
        StorageError::io(format!("Failed to write to temp file {}: {}", path.display(), e))
    })?;

    file.sync_all().await.map_err(|e| {
        StorageError::io(format!("Failed to sync temp file {}: {}", path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn storage(dir: &TempDir) -> LocalArtifactStorage {
        LocalArtifactStorage::new(dir.path().join("images"), dir.path().join("comics"))
    }

    #[test]
    fn base_name_takes_last_component() {
        assert_eq!(base_name("cat.png"), Some("cat.png"));
        assert_eq!(base_name("/uploads/2024/cat.png"), Some("cat.png"));
        assert_eq!(base_name("C:\\pics\\cat.png"), Some("cat.png"));
        assert_eq!(base_name("../../etc/passwd"), Some("passwd"));
        assert_eq!(base_name(""), None);
        assert_eq!(base_name("dir/"), None);
        assert_eq!(base_name(".."), None);
    }

    #[tokio::test]
    async fn read_image_resolves_by_basename() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);
        std::fs::create_dir_all(dir.path().join("images")).unwrap();
        std::fs::write(dir.path().join("images/cat.png"), b"png-bytes").unwrap();

        let bytes = storage.read_image("/somewhere/else/cat.png").await.unwrap();
        assert_eq!(bytes, b"png-bytes");
    }

    #[tokio::test]
    async fn read_missing_image_is_not_found() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);

        let err = storage.read_image("ghost.png").await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));

        let err = storage.read_image("  ").await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidReference(_)));
    }

    #[tokio::test]
    async fn write_artifact_creates_dir_and_names_by_story() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);

        let path = storage
            .write_artifact(StoryId::new(7), "pdf", b"%PDF-1.5")
            .await
            .unwrap();

        assert_eq!(path, dir.path().join("comics/comic_7.pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.5");
        let leftovers = std::fs::read_dir(dir.path().join("comics"))
            .unwrap()
            .filter(|e| e.as_ref().unwrap().file_name().to_string_lossy().ends_with(".tmp"))
            .count();
        assert_eq!(leftovers, 0);
    }

    #[tokio::test]
    async fn write_artifact_replaces_previous_file() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);

        storage.write_artifact(StoryId::new(1), "pdf", b"old").await.unwrap();
        let path = storage.write_artifact(StoryId::new(1), "pdf", b"new").await.unwrap();

        assert_eq!(std::fs::read(path).unwrap(), b"new");
    }

    #[tokio::test]
    async fn concurrent_writes_for_one_story_both_succeed() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);

        let (a, b) = tokio::join!(
            storage.write_artifact(StoryId::new(3), "pdf", b"first"),
            storage.write_artifact(StoryId::new(3), "pdf", b"second"),
        );

        assert!(a.is_ok() && b.is_ok());
        let content = std::fs::read(dir.path().join("comics/comic_3.pdf")).unwrap();
        assert!(content == b"first" || content == b"second");
    }

    #[tokio::test]
    async fn failed_rename_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let storage = storage(&dir);
        // A non-empty directory at the final path makes the rename fail
        let occupied = dir.path().join("comics/comic_4.pdf");
        std::fs::create_dir_all(&occupied).unwrap();
        std::fs::write(occupied.join("keep"), b"x").unwrap();

        let err = storage
            .write_artifact(StoryId::new(4), "pdf", b"data")
            .await
            .unwrap_err();

        assert!(matches!(err, StorageError::Io(_)));
        let leftovers = std::fs::read_dir(dir.path().join("comics"))
            .unwrap()
            .filter(|e| e.as_ref().unwrap().file_name().to_string_lossy().ends_with(".tmp"))
            .count();
        assert_eq!(leftovers, 0);
    }

    #[tokio::test]
    async fn write_artifact_fails_when_dir_is_a_file() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("comics");
        std::fs::write(&blocker, b"not a dir").unwrap();
        let storage = LocalArtifactStorage::new(dir.path(), &blocker);

        let err = storage
            .write_artifact(StoryId::new(1), "pdf", b"data")
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Io(_)));
    }
}
