//! Errors of a single consumer run.

use thiserror::Error;

use crate::domain::analysis::AnalysisParseError;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{GenerationError, RenderError, StorageError};

/// Why a consumer run was aborted.
///
/// Every variant is local to the run; handlers hand it to the bus as a
/// [`DomainError`], which logs it and moves on.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid event payload: {0}")]
    InvalidPayload(String),

    #[error("story access failed: {0}")]
    Store(#[from] DomainError),

    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("analysis response rejected: {0}")]
    Parse(#[from] AnalysisParseError),

    #[error("render failed: {0}")]
    Render(#[from] RenderError),

    #[error("artifact storage failed: {0}")]
    Storage(#[from] StorageError),
}

impl PipelineError {
    /// Error code reported to the bus.
    pub fn code(&self) -> ErrorCode {
        match self {
            PipelineError::InvalidPayload(_) => ErrorCode::InvalidEventPayload,
            PipelineError::Store(e) => e.code,
            PipelineError::Generation(_) => ErrorCode::GenerationFailed,
            PipelineError::Parse(_) => ErrorCode::AnalysisParseFailed,
            PipelineError::Render(_) => ErrorCode::RenderFailed,
            PipelineError::Storage(_) => ErrorCode::StorageFailed,
        }
    }
}

impl From<PipelineError> for DomainError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Store(e) => e,
            other => DomainError::new(other.code(), other.to_string()),
        }
    }
}
