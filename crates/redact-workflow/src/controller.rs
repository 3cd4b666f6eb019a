//! Workflow controller
//!
//! Drives one document through upload, detection, selection, redaction and
//! download. Backend calls run as spawned tasks; their completions come back
//! over a channel and are applied one at a time by [`Workflow::next_event`],
//! so the session store has a single writer.

use redact_core::{
    ArtifactKind, DetectedData, Document, DocumentRef, DownloadAvailability, RedactionResult,
    SelectionState, SensitiveType,
};
use redact_gateway::{Backend, DownloadedArtifact, GatewayError};
use std::collections::HashSet;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::store::{SavedArtifact, SessionSnapshot, SessionStore};
use crate::{ActionClass, ErrorState, Remedy, Result, Stage, StageKind, WorkflowError};

#[derive(Debug, Clone)]
pub struct WorkflowOptions {
    /// Upper bound for every backend call
    pub request_timeout: Duration,
    pub max_file_size_bytes: u64,
    /// Where downloaded artifacts are written
    pub download_dir: PathBuf,
}

impl Default for WorkflowOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            max_file_size_bytes: 10 * 1024 * 1024,
            download_dir: PathBuf::from("."),
        }
    }
}

/// Something that changed while applying a backend completion
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowEvent {
    Uploaded(DocumentRef),
    Detected { types: usize, items: usize },
    Redacted { redacted_count: usize },
    Saved(SavedArtifact),
    DownloadsRefreshed(DownloadAvailability),
    /// A stage failed and the workflow moved to an error state
    Failed(ErrorState),
    /// A non-fatal failure; the stage did not change
    Notice(String),
}

enum Outcome {
    Uploaded(redact_gateway::Result<DocumentRef>),
    Detected(DocumentRef, redact_gateway::Result<DetectedData>),
    Redacted(redact_gateway::Result<RedactionResult>),
    Downloaded(ArtifactKind, redact_gateway::Result<DownloadedArtifact>),
    Refreshed(redact_gateway::Result<DownloadAvailability>),
}

struct Completion {
    epoch: u64,
    outcome: Outcome,
}

pub struct Workflow {
    backend: Arc<dyn Backend>,
    options: WorkflowOptions,
    store: SessionStore,
    busy: HashSet<ActionClass>,
    refresh_queued: bool,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
}

impl Workflow {
    pub fn new(backend: Arc<dyn Backend>, options: WorkflowOptions) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            backend,
            options,
            store: SessionStore::new(),
            busy: HashSet::new(),
            refresh_queued: false,
            tx,
            rx,
        }
    }

    pub fn stage(&self) -> &Stage {
        self.store.stage()
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.store.snapshot()
    }

    pub fn is_busy(&self, class: ActionClass) -> bool {
        self.busy.contains(&class)
    }

    /// Nothing is in flight
    pub fn is_idle(&self) -> bool {
        self.busy.is_empty()
    }

    /// Validate a document and start uploading it.
    ///
    /// Any previous session is discarded. Validation failures leave the
    /// stage untouched and never reach the backend.
    pub fn submit_upload(&mut self, document: Document) -> Result<()> {
        self.ensure_stage_idle()?;
        document.validate(self.options.max_file_size_bytes)?;

        self.clear_session();
        self.start_upload(document);
        Ok(())
    }

    /// Replay the step that failed, with the same input
    pub fn retry(&mut self) -> Result<()> {
        let failed = match &self.store.stage {
            Stage::Error(state) if state.offers(Remedy::Retry) => state.clone(),
            other => {
                return Err(WorkflowError::InvalidStage {
                    action: "retry",
                    stage: other.kind(),
                });
            }
        };

        match failed.stage {
            StageKind::Uploading => {
                let document = self.store.pending.clone().ok_or(WorkflowError::InvalidStage {
                    action: "retry upload",
                    stage: StageKind::Error,
                })?;
                info!(file_name = %document.file_name, "Retrying upload");
                self.start_upload(document);
            }
            StageKind::Detecting => {
                let doc = failed
                    .document_ref
                    .or_else(|| self.store.document_ref.clone())
                    .ok_or(WorkflowError::InvalidStage {
                        action: "retry detection",
                        stage: StageKind::Error,
                    })?;
                info!(document_ref = %doc, "Retrying detection");
                self.start_detect(doc);
            }
            stage => {
                return Err(WorkflowError::InvalidStage {
                    action: "retry",
                    stage,
                });
            }
        }
        Ok(())
    }

    /// Discard the session and return to `Empty`
    pub fn reset(&mut self) {
        info!(
            document_ref = ?self.store.document_ref.as_ref().map(|d| d.as_str()),
            "Starting new session"
        );
        self.clear_session();
    }

    /// Flip one detected occurrence
    pub fn toggle(&mut self, ty: &SensitiveType, index: usize) -> Result<bool> {
        let (_, selection) = self.editable("toggle")?;
        let selected = selection.toggle(ty, index)?;
        debug!(ty = %ty, index, selected, "Toggled item");
        Ok(selected)
    }

    /// Flip every occurrence equal to `value`
    pub fn toggle_value(&mut self, ty: &SensitiveType, value: &str) -> Result<bool> {
        let (detected, selection) = self.editable("toggle")?;
        let selected = selection.toggle_value(detected, ty, value)?;
        debug!(ty = %ty, selected, "Toggled value");
        Ok(selected)
    }

    pub fn select_all(&mut self, ty: &SensitiveType) -> Result<()> {
        let (_, selection) = self.editable("select")?;
        selection.select_all(ty)?;
        Ok(())
    }

    pub fn deselect_all(&mut self, ty: &SensitiveType) -> Result<()> {
        let (_, selection) = self.editable("deselect")?;
        selection.deselect_all(ty)?;
        Ok(())
    }

    /// Freeze the selection and start redaction.
    ///
    /// With nothing selected this returns `EmptySelection` and makes no
    /// backend call.
    pub fn submit_redact(&mut self) -> Result<()> {
        if self.is_busy(ActionClass::Redact) {
            return Err(WorkflowError::Busy(ActionClass::Redact));
        }

        let (detected, selection) = self.editable("redact")?;
        let request = selection.build_request(detected)?;
        let doc = self.current_ref("redact")?;

        info!(
            document_ref = %doc,
            items = request.item_count(),
            types = request.items_to_redact.len(),
            "Submitting redaction"
        );
        self.store.notice = None;
        self.store.stage = Stage::Redacting;
        self.busy.insert(ActionClass::Redact);

        let backend = Arc::clone(&self.backend);
        let limit = self.options.request_timeout;
        self.dispatch(async move {
            Outcome::Redacted(bounded(limit, backend.redact(&doc, &request)).await)
        });
        Ok(())
    }

    /// Fetch one artifact and save it to the download directory.
    ///
    /// Refused when the cached availability reports the artifact missing.
    /// Before the first availability check the request goes through.
    pub fn request_download(&mut self, kind: ArtifactKind) -> Result<()> {
        self.ensure_result("download")?;
        let class = ActionClass::Download(kind);
        if self.is_busy(class) {
            return Err(WorkflowError::Busy(class));
        }
        if self
            .store
            .downloads
            .as_ref()
            .is_some_and(|d| !d.is_available(kind))
        {
            return Err(WorkflowError::Unavailable(kind));
        }
        let doc = self.current_ref("download")?;

        info!(document_ref = %doc, kind = %kind, "Requesting download");
        self.busy.insert(class);

        let backend = Arc::clone(&self.backend);
        let limit = self.options.request_timeout;
        self.dispatch(async move {
            Outcome::Downloaded(kind, bounded(limit, backend.download(&doc, kind)).await)
        });
        Ok(())
    }

    /// Ask for fresh download availability.
    ///
    /// A request made while a refresh is in flight is folded into a single
    /// follow-up refresh.
    pub fn refresh_downloads(&mut self) -> Result<()> {
        self.ensure_result("refresh downloads")?;
        self.request_refresh();
        Ok(())
    }

    /// Apply the next backend completion.
    ///
    /// Returns `None` once nothing is in flight. Completions belonging to a
    /// session that has since been reset are dropped.
    pub async fn next_event(&mut self) -> Option<WorkflowEvent> {
        loop {
            if self.busy.is_empty() {
                return None;
            }

            let completion = self.rx.recv().await?;
            if completion.epoch != self.store.epoch {
                debug!(epoch = completion.epoch, "Dropping completion from old session");
                continue;
            }

            return Some(self.apply(completion.outcome).await);
        }
    }

    /// Apply completions until nothing is in flight
    pub async fn settle(&mut self) -> Vec<WorkflowEvent> {
        let mut events = Vec::new();
        while let Some(event) = self.next_event().await {
            events.push(event);
        }
        events
    }

    async fn apply(&mut self, outcome: Outcome) -> WorkflowEvent {
        match outcome {
            Outcome::Uploaded(result) => {
                self.busy.remove(&ActionClass::Upload);
                match result {
                    Ok(doc) => {
                        info!(document_ref = %doc, "Upload complete");
                        self.store.document_ref = Some(doc.clone());
                        self.start_detect(doc.clone());
                        WorkflowEvent::Uploaded(doc)
                    }
                    Err(e) => self.fail(StageKind::Uploading, e),
                }
            }

            Outcome::Detected(doc, result) => {
                self.busy.remove(&ActionClass::Detect);
                match result {
                    Ok(data) if data.is_empty() => {
                        warn!(document_ref = %doc, "No sensitive data found");
                        let state = ErrorState::nothing_detected(doc);
                        self.store.stage = Stage::Error(state.clone());
                        WorkflowEvent::Failed(state)
                    }
                    Ok(data) => {
                        let types = data.type_count();
                        let items = data.total_count();
                        info!(document_ref = %doc, types, items, "Detection complete");
                        self.store.set_detected(data);
                        self.store.stage = Stage::PreviewReady;
                        WorkflowEvent::Detected { types, items }
                    }
                    Err(e) => self.fail(StageKind::Detecting, e),
                }
            }

            Outcome::Redacted(result) => {
                self.busy.remove(&ActionClass::Redact);
                match result {
                    Ok(result) => {
                        let redacted_count = result.redacted_count;
                        info!(redacted_count, "Redaction complete");
                        self.store.result = Some(result);
                        self.store.stage = Stage::ResultReady;
                        self.request_refresh();
                        WorkflowEvent::Redacted { redacted_count }
                    }
                    Err(e) => {
                        warn!(kind = e.kind(), status = ?e.status(), "Redaction failed");
                        let message = format!("Redaction failed: {}", e.user_message());
                        self.store.notice = Some(message.clone());
                        self.store.stage = Stage::PreviewReady;
                        WorkflowEvent::Notice(message)
                    }
                }
            }

            Outcome::Downloaded(kind, result) => {
                self.busy.remove(&ActionClass::Download(kind));
                let event = match result {
                    Ok(artifact) => match self.save(artifact).await {
                        Ok(saved) => {
                            self.store.saved.push(saved.clone());
                            WorkflowEvent::Saved(saved)
                        }
                        Err(e) => {
                            warn!(kind = %kind, error = %e, "Failed to save download");
                            self.notice(format!("Could not save {}: {}", kind, e))
                        }
                    },
                    Err(e) => {
                        warn!(kind = %kind, error_kind = e.kind(), status = ?e.status(), "Download failed");
                        self.notice(format!("Download failed: {}", e.user_message()))
                    }
                };
                self.request_refresh();
                event
            }

            Outcome::Refreshed(result) => {
                self.busy.remove(&ActionClass::RefreshDownloads);
                let availability = result.unwrap_or_else(|e| {
                    warn!(error_kind = e.kind(), "Download info refresh failed");
                    DownloadAvailability::unavailable(e.user_message())
                });
                self.store.downloads = Some(availability.clone());

                if std::mem::take(&mut self.refresh_queued) {
                    self.request_refresh();
                }
                WorkflowEvent::DownloadsRefreshed(availability)
            }
        }
    }

    fn start_upload(&mut self, document: Document) {
        info!(
            file_name = %document.file_name,
            size_mb = document.size_mb(),
            "Uploading document"
        );
        self.store.pending = Some(document.clone());
        self.store.stage = Stage::Uploading;
        self.busy.insert(ActionClass::Upload);

        let backend = Arc::clone(&self.backend);
        let limit = self.options.request_timeout;
        self.dispatch(async move { Outcome::Uploaded(bounded(limit, backend.upload(&document)).await) });
    }

    fn start_detect(&mut self, doc: DocumentRef) {
        debug!(document_ref = %doc, "Starting detection");
        self.store.stage = Stage::Detecting;
        self.busy.insert(ActionClass::Detect);

        let backend = Arc::clone(&self.backend);
        let limit = self.options.request_timeout;
        self.dispatch(async move {
            let result = bounded(limit, backend.detect(&doc)).await;
            Outcome::Detected(doc, result)
        });
    }

    fn request_refresh(&mut self) {
        let Some(doc) = self.store.document_ref.clone() else {
            return;
        };

        if self.is_busy(ActionClass::RefreshDownloads) {
            debug!(document_ref = %doc, "Refresh already running, queueing one more");
            self.refresh_queued = true;
            return;
        }

        self.busy.insert(ActionClass::RefreshDownloads);
        let backend = Arc::clone(&self.backend);
        let limit = self.options.request_timeout;
        self.dispatch(async move {
            Outcome::Refreshed(bounded(limit, backend.download_info(&doc)).await)
        });
    }

    fn dispatch<F>(&self, call: F)
    where
        F: Future<Output = Outcome> + Send + 'static,
    {
        let tx = self.tx.clone();
        let epoch = self.store.epoch;
        tokio::spawn(async move {
            let outcome = call.await;
            // The receiver lives as long as the workflow
            let _ = tx.send(Completion { epoch, outcome });
        });
    }

    async fn save(&self, artifact: DownloadedArtifact) -> std::io::Result<SavedArtifact> {
        tokio::fs::create_dir_all(&self.options.download_dir).await?;
        let path = self.options.download_dir.join(&artifact.file_name);
        tokio::fs::write(&path, &artifact.bytes).await?;

        let checksum = blake3::hash(&artifact.bytes).to_hex().to_string();
        info!(
            kind = %artifact.kind,
            path = %path.display(),
            size_bytes = artifact.bytes.len(),
            checksum = %checksum,
            "Saved artifact"
        );

        Ok(SavedArtifact {
            kind: artifact.kind,
            path,
            size_bytes: artifact.bytes.len() as u64,
            checksum,
        })
    }

    fn fail(&mut self, stage: StageKind, error: GatewayError) -> WorkflowEvent {
        warn!(
            stage = %stage,
            kind = error.kind(),
            status = ?error.status(),
            "Stage failed: {}",
            error.user_message()
        );
        let state = ErrorState::backend(stage, error, self.store.document_ref.clone());
        self.store.stage = Stage::Error(state.clone());
        WorkflowEvent::Failed(state)
    }

    fn notice(&mut self, message: String) -> WorkflowEvent {
        self.store.notice = Some(message.clone());
        WorkflowEvent::Notice(message)
    }

    fn clear_session(&mut self) {
        self.store.clear();
        self.busy.clear();
        self.refresh_queued = false;
    }

    fn ensure_stage_idle(&self) -> Result<()> {
        let class = match self.store.stage {
            Stage::Uploading => ActionClass::Upload,
            Stage::Detecting => ActionClass::Detect,
            Stage::Redacting => ActionClass::Redact,
            _ => return Ok(()),
        };
        Err(WorkflowError::Busy(class))
    }

    fn ensure_result(&self, action: &'static str) -> Result<()> {
        match self.store.stage {
            Stage::ResultReady => Ok(()),
            ref other => Err(WorkflowError::InvalidStage {
                action,
                stage: other.kind(),
            }),
        }
    }

    fn current_ref(&self, action: &'static str) -> Result<DocumentRef> {
        self.store
            .document_ref
            .clone()
            .ok_or(WorkflowError::InvalidStage {
                action,
                stage: self.store.stage.kind(),
            })
    }

    /// Detected data and the mutable selection, only while previewing
    fn editable(&mut self, action: &'static str) -> Result<(&DetectedData, &mut SelectionState)> {
        let stage = self.store.stage.kind();
        if stage != StageKind::PreviewReady {
            return Err(WorkflowError::InvalidStage { action, stage });
        }

        match (self.store.detected.as_ref(), self.store.selection.as_mut()) {
            (Some(detected), Some(selection)) => Ok((detected, selection)),
            _ => Err(WorkflowError::InvalidStage { action, stage }),
        }
    }
}

/// Bound a backend call by the request timeout
async fn bounded<T>(
    limit: Duration,
    call: impl Future<Output = redact_gateway::Result<T>>,
) -> redact_gateway::Result<T> {
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(GatewayError::Transport("request timed out".to_string())),
    }
}
