//! Batch runner error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::plan::PlanError;

/// Errors that reject a batch before any file is processed.
#[derive(Error, Debug)]
pub enum BatchError {
    #[error("A batch is already running")]
    AlreadyRunning,

    #[error("No files to convert")]
    EmptyQueue,

    #[error("No failed files to retry")]
    NothingToRetry,

    #[error("ffmpeg executable not found")]
    ToolUnavailable,

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error("Failed to create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for batch operations.
pub type BatchResult<T> = Result<T, BatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(BatchError::AlreadyRunning.to_string(), "A batch is already running");
        assert_eq!(BatchError::EmptyQueue.to_string(), "No files to convert");
        assert_eq!(
            BatchError::Plan(PlanError::MissingTargetFormat).to_string(),
            "No target format selected"
        );
    }
}
