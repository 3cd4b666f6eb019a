//! Session state owned by the workflow controller

use redact_core::{
    ArtifactKind, DetectedData, Document, DocumentRef, DownloadAvailability, RedactionResult,
    SelectionState,
};
use std::path::PathBuf;

use crate::Stage;

/// A downloaded artifact written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedArtifact {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub size_bytes: u64,
    /// blake3 digest, hex encoded
    pub checksum: String,
}

/// Everything known about the current document session.
///
/// Mutated only by [`crate::Workflow`]. Views read [`SessionSnapshot`]s.
#[derive(Debug, Default)]
pub struct SessionStore {
    pub(crate) stage: Stage,
    /// Last submitted document, kept so a failed upload can be resubmitted
    pub(crate) pending: Option<Document>,
    pub(crate) document_ref: Option<DocumentRef>,
    pub(crate) detected: Option<DetectedData>,
    pub(crate) selection: Option<SelectionState>,
    pub(crate) result: Option<RedactionResult>,
    pub(crate) downloads: Option<DownloadAvailability>,
    pub(crate) saved: Vec<SavedArtifact>,
    /// Non-fatal message for the current stage (failed redact, failed download)
    pub(crate) notice: Option<String>,
    /// Bumped on every reset; completions from older sessions are dropped
    pub(crate) epoch: u64,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn document_ref(&self) -> Option<&DocumentRef> {
        self.document_ref.as_ref()
    }

    pub fn detected(&self) -> Option<&DetectedData> {
        self.detected.as_ref()
    }

    pub fn selection(&self) -> Option<&SelectionState> {
        self.selection.as_ref()
    }

    pub fn result(&self) -> Option<&RedactionResult> {
        self.result.as_ref()
    }

    pub fn downloads(&self) -> Option<&DownloadAvailability> {
        self.downloads.as_ref()
    }

    /// Drop the whole session and move to a fresh epoch
    pub(crate) fn clear(&mut self) {
        let epoch = self.epoch + 1;
        *self = Self {
            epoch,
            ..Self::default()
        };
    }

    /// Store detection output and seed the safety-first selection
    pub(crate) fn set_detected(&mut self, detected: DetectedData) {
        self.selection = Some(SelectionState::seeded(&detected));
        self.detected = Some(detected);
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            stage: self.stage.clone(),
            document_ref: self.document_ref.clone(),
            file_name: self.pending.as_ref().map(|d| d.file_name.clone()),
            detected: self.detected.clone(),
            selection: self.selection.clone(),
            result: self.result.clone(),
            downloads: self.downloads.clone(),
            saved: self.saved.clone(),
            notice: self.notice.clone(),
        }
    }
}

/// Read-only copy of the session handed to views
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub stage: Stage,
    pub document_ref: Option<DocumentRef>,
    pub file_name: Option<String>,
    pub detected: Option<DetectedData>,
    pub selection: Option<SelectionState>,
    pub result: Option<RedactionResult>,
    pub downloads: Option<DownloadAvailability>,
    pub saved: Vec<SavedArtifact>,
    pub notice: Option<String>,
}

impl SessionSnapshot {
    pub fn selected_count(&self) -> usize {
        self.selection.as_ref().map_or(0, SelectionState::selected_count)
    }

    pub fn total_count(&self) -> usize {
        self.detected.as_ref().map_or(0, DetectedData::total_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redact_core::SensitiveType;

    #[test]
    fn test_set_detected_seeds_full_selection() {
        let mut store = SessionStore::new();
        let data: DetectedData = [(SensitiveType::Pan, vec!["ABCDE1234F".to_string()])]
            .into_iter()
            .collect();
        store.set_detected(data);

        let snapshot = store.snapshot();
        assert_eq!(snapshot.selected_count(), 1);
        assert_eq!(snapshot.total_count(), 1);
    }

    #[test]
    fn test_clear_advances_epoch() {
        let mut store = SessionStore::new();
        store.document_ref = Some(DocumentRef::new("abc"));
        store.stage = Stage::ResultReady;
        store.notice = Some("x".to_string());

        store.clear();
        assert_eq!(store.epoch, 1);
        assert_eq!(store.stage, Stage::Empty);
        assert!(store.document_ref().is_none());
        assert!(store.notice.is_none());
    }
}
