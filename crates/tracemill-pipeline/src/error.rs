//! Error types for the pipeline crate.

use thiserror::Error;
use tracemill_camtools::CamToolError;

/// Errors that abort a batch.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A task failed; the whole batch is abandoned.
    #[error("Task '{file}' failed: {source}")]
    Task {
        file: String,
        #[source]
        source: CamToolError,
    },

    /// A newer run was started before this one finished.
    #[error("Run superseded by a newer request")]
    Superseded,

    /// The batch input could not be fingerprinted.
    #[error("Cache key error: {0}")]
    Fingerprint(#[from] tracemill_core::Error),
}

impl PipelineError {
    pub fn task(file: impl Into<String>, source: impl Into<CamToolError>) -> Self {
        Self::Task {
            file: file.into(),
            source: source.into(),
        }
    }
}

/// Result type alias for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_error_names_the_file() {
        let err = PipelineError::task(
            "top.gtl",
            CamToolError::GeometryError("boolean union failed".to_string()),
        );
        assert_eq!(
            err.to_string(),
            "Task 'top.gtl' failed: Geometry error: boolean union failed"
        );
    }
}
