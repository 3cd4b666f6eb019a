//! Wire types for the redaction backend

use indexmap::IndexMap;
use redact_core::{DetectedData, DownloadAvailability, SensitiveType};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub(crate) struct UploadResponse {
    #[serde(default)]
    pub success: bool,
    pub file_id: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DetectResponse {
    #[serde(default)]
    pub success: bool,
    pub detected_data: Option<DetectedData>,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RedactResponse {
    pub success: Option<bool>,
    #[serde(default)]
    pub download_url: String,
    #[serde(default)]
    pub verification_url: String,
    #[serde(default)]
    pub redacted_count: usize,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DownloadInfoResponse {
    #[serde(default)]
    pub pdf_available: bool,
    #[serde(default)]
    pub report_available: bool,
    pub pdf_size: Option<u64>,
    pub pdf_size_mb: Option<f64>,
    pub report_size: Option<u64>,
    pub report_size_kb: Option<f64>,
    pub error: Option<String>,
}

impl DownloadInfoResponse {
    pub fn into_availability(self) -> DownloadAvailability {
        DownloadAvailability {
            pdf_available: self.pdf_available,
            report_available: self.report_available,
            pdf_size_bytes: self.pdf_size,
            pdf_size_mb: self.pdf_size_mb,
            report_size_bytes: self.report_size,
            report_size_kb: self.report_size_kb,
            last_error: self.error,
            refreshed_at: Some(time::OffsetDateTime::now_utc()),
        }
    }
}

/// FastAPI-style `{"detail": ...}` or `{"message": ...}` error body
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    detail: Option<serde_json::Value>,
    message: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        match self.detail {
            Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s),
            Some(serde_json::Value::Null) | None => self.message.filter(|m| !m.is_empty()),
            Some(other) => Some(other.to_string()),
        }
    }
}

/// `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}

/// `GET /verify/{ref}`. The raw redacted values in the report are not kept.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerificationStatus {
    pub file_id: Option<String>,
    pub redaction_timestamp: Option<String>,
    pub summary: Option<VerificationSummary>,
    pub file_status: Option<FileStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerificationSummary {
    #[serde(default)]
    pub total_redacted: usize,
    #[serde(default)]
    pub by_type: IndexMap<SensitiveType, usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileStatus {
    #[serde(default)]
    pub redacted_pdf_exists: bool,
    #[serde(default)]
    pub report_exists: bool,
    #[serde(default)]
    pub redacted_pdf_size: u64,
}
