//! Filesystem adapters for panel images and rendered comics.

mod local_artifact_storage;

pub use local_artifact_storage::LocalArtifactStorage;
