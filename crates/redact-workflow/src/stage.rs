//! Workflow stages and error states

use redact_core::DocumentRef;
use redact_gateway::GatewayError;
use std::fmt;

/// Name of a stage, without payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    Empty,
    Uploading,
    Detecting,
    PreviewReady,
    Redacting,
    ResultReady,
    Error,
}

impl StageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StageKind::Empty => "empty",
            StageKind::Uploading => "uploading",
            StageKind::Detecting => "detecting",
            StageKind::PreviewReady => "preview_ready",
            StageKind::Redacting => "redacting",
            StageKind::ResultReady => "result_ready",
            StageKind::Error => "error",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the operator may do from an error state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remedy {
    /// Replay the failed step with the same input
    Retry,
    /// Discard the session and start over
    NewSession,
}

/// Why a stage failed
#[derive(Debug, Clone, PartialEq)]
pub enum FailureCause {
    Backend(GatewayError),
    /// Detection succeeded but found nothing to redact
    NothingDetected,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ErrorState {
    /// Stage whose transition failed
    pub stage: StageKind,
    pub message: String,
    pub document_ref: Option<DocumentRef>,
    pub remedies: Vec<Remedy>,
    pub cause: FailureCause,
}

impl ErrorState {
    pub(crate) fn backend(
        stage: StageKind,
        error: GatewayError,
        document_ref: Option<DocumentRef>,
    ) -> Self {
        Self {
            stage,
            message: error.user_message(),
            document_ref,
            remedies: vec![Remedy::Retry, Remedy::NewSession],
            cause: FailureCause::Backend(error),
        }
    }

    pub(crate) fn nothing_detected(document_ref: DocumentRef) -> Self {
        Self {
            stage: StageKind::Detecting,
            message: "no sensitive data found".to_string(),
            document_ref: Some(document_ref),
            remedies: vec![Remedy::NewSession],
            cause: FailureCause::NothingDetected,
        }
    }

    pub fn offers(&self, remedy: Remedy) -> bool {
        self.remedies.contains(&remedy)
    }
}

impl fmt::Display for ErrorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.stage, self.message)?;
        if let Some(doc) = &self.document_ref {
            write!(f, " (document {})", doc)?;
        }
        Ok(())
    }
}

/// Current position in the upload → detect → preview → redact → result flow
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Stage {
    #[default]
    Empty,
    Uploading,
    Detecting,
    PreviewReady,
    Redacting,
    ResultReady,
    Error(ErrorState),
}

impl Stage {
    pub fn kind(&self) -> StageKind {
        match self {
            Stage::Empty => StageKind::Empty,
            Stage::Uploading => StageKind::Uploading,
            Stage::Detecting => StageKind::Detecting,
            Stage::PreviewReady => StageKind::PreviewReady,
            Stage::Redacting => StageKind::Redacting,
            Stage::ResultReady => StageKind::ResultReady,
            Stage::Error(_) => StageKind::Error,
        }
    }

    /// A backend call for this stage is outstanding
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Stage::Uploading | Stage::Detecting | Stage::Redacting)
    }

    pub fn error(&self) -> Option<&ErrorState> {
        match self {
            Stage::Error(state) => Some(state),
            _ => None,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Error(state) => write!(f, "error: {}", state),
            other => f.write_str(other.kind().as_str()),
        }
    }
}
