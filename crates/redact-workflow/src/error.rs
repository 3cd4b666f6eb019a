use redact_core::{ArtifactKind, CoreError, ValidationError};
use std::fmt;
use thiserror::Error;

use crate::StageKind;

pub type Result<T> = std::result::Result<T, WorkflowError>;

/// Classes of backend work; at most one of each is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionClass {
    Upload,
    Detect,
    Redact,
    Download(ArtifactKind),
    RefreshDownloads,
}

impl fmt::Display for ActionClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionClass::Upload => f.write_str("upload"),
            ActionClass::Detect => f.write_str("detect"),
            ActionClass::Redact => f.write_str("redact"),
            ActionClass::Download(kind) => write!(f, "{} download", kind),
            ActionClass::RefreshDownloads => f.write_str("download info refresh"),
        }
    }
}

/// Errors returned to the caller of a workflow action.
///
/// Backend failures are not in here: they become error states or notices.
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0} already in progress")]
    Busy(ActionClass),

    #[error("Cannot {action} in stage {stage}")]
    InvalidStage {
        action: &'static str,
        stage: StageKind,
    },

    /// Last availability check said the backend cannot serve this artifact
    #[error("{0} is not available for download")]
    Unavailable(ArtifactKind),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(CoreError),
}

impl From<CoreError> for WorkflowError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::Validation(v) => WorkflowError::Validation(v),
            CoreError::Io(io) => WorkflowError::Io(io),
            other => WorkflowError::Core(other),
        }
    }
}
