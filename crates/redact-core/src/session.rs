//! Session-scoped records issued by the backend

use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

/// Opaque backend-issued identifier for one uploaded document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentRef(String);

impl DocumentRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of a successful redact call. Never mutated until reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedactionResult {
    pub download_ref: String,
    pub verification_ref: String,
    pub redacted_count: usize,
    #[serde(with = "time::serde::timestamp")]
    pub completed_at: OffsetDateTime,
}

/// Downloadable outputs of a redaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// The redacted PDF
    Pdf,
    /// JSON verification report
    Report,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 2] = [ArtifactKind::Pdf, ArtifactKind::Report];

    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Pdf => "pdf",
            ArtifactKind::Report => "report",
        }
    }

    /// File name used when saving locally
    pub fn file_name(&self, doc: &DocumentRef) -> String {
        match self {
            ArtifactKind::Pdf => format!("redacted_document_{}.pdf", doc),
            ArtifactKind::Report => format!("verification_report_{}.json", doc),
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ArtifactKind::Pdf => crate::PDF_CONTENT_TYPE,
            ArtifactKind::Report => "application/json",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cached view of what the backend can serve for download
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DownloadAvailability {
    pub pdf_available: bool,
    pub report_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_size_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf_size_mb: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_size_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_size_kb: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    #[serde(
        default,
        with = "time::serde::timestamp::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub refreshed_at: Option<OffsetDateTime>,
}

impl DownloadAvailability {
    /// Availability after a failed refresh: nothing downloadable
    pub fn unavailable(error: impl Into<String>) -> Self {
        Self {
            last_error: Some(error.into()),
            refreshed_at: Some(OffsetDateTime::now_utc()),
            ..Default::default()
        }
    }

    pub fn is_available(&self, kind: ArtifactKind) -> bool {
        match kind {
            ArtifactKind::Pdf => self.pdf_available,
            ArtifactKind::Report => self.report_available,
        }
    }

    /// "2.5 MB" or "Size unknown"
    pub fn pdf_size_text(&self) -> String {
        match self.pdf_size_mb {
            Some(mb) if mb > 0.0 => format!("{} MB", mb),
            _ => "Size unknown".to_string(),
        }
    }
}
