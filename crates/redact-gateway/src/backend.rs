//! Backend trait

use async_trait::async_trait;
use redact_core::{
    ArtifactKind, DetectedData, Document, DocumentRef, DownloadAvailability, RedactionRequest,
    RedactionResult,
};
use std::fmt;

use crate::{HealthStatus, Result, VerificationStatus};

/// A downloaded artifact held in memory until the caller saves it
#[derive(Clone)]
pub struct DownloadedArtifact {
    pub kind: ArtifactKind,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for DownloadedArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DownloadedArtifact")
            .field("kind", &self.kind)
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size_bytes", &self.bytes.len())
            .finish()
    }
}

/// One operation per backend capability.
///
/// Implementations normalize every failure into a `GatewayError`; callers
/// never see raw transport errors.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Upload a document and receive the ref scoping all later calls
    async fn upload(&self, document: &Document) -> Result<DocumentRef>;

    /// Run detection. An empty map is a valid success.
    async fn detect(&self, doc: &DocumentRef) -> Result<DetectedData>;

    /// Redact the selected items
    async fn redact(&self, doc: &DocumentRef, request: &RedactionRequest)
        -> Result<RedactionResult>;

    /// What can currently be downloaded
    async fn download_info(&self, doc: &DocumentRef) -> Result<DownloadAvailability>;

    /// Fetch one artifact
    async fn download(&self, doc: &DocumentRef, kind: ArtifactKind) -> Result<DownloadedArtifact>;

    /// Verification status of a finished redaction
    async fn verification(&self, doc: &DocumentRef) -> Result<VerificationStatus>;

    async fn health(&self) -> Result<HealthStatus>;
}
