//! Filesystem locations for comic generation

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory panel images are read from
    #[serde(default = "default_image_dir")]
    pub image_dir: PathBuf,

    /// Directory rendered comics are written to
    #[serde(default = "default_artifact_dir")]
    pub artifact_dir: PathBuf,
}

impl StorageConfig {
    /// Validate storage configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.image_dir.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("STORAGE__IMAGE_DIR"));
        }
        if self.artifact_dir.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("STORAGE__ARTIFACT_DIR"));
        }
        if self.image_dir == self.artifact_dir {
            return Err(ValidationError::SharedStorageDir);
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            image_dir: default_image_dir(),
            artifact_dir: default_artifact_dir(),
        }
    }
}

fn default_image_dir() -> PathBuf {
    PathBuf::from("working/storyImages")
}

fn default_artifact_dir() -> PathBuf {
    PathBuf::from("working/comics")
}
