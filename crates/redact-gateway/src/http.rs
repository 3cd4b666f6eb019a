//! HTTP+JSON implementation of the backend contract

use async_trait::async_trait;
use redact_core::{
    ArtifactKind, DetectedData, Document, DocumentRef, DownloadAvailability, RedactionRequest,
    RedactionResult,
};
use reqwest::{Client, Response, Url, multipart};
use serde::de::DeserializeOwned;
use std::time::Duration;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::backend::{Backend, DownloadedArtifact};
use crate::fallback::MethodFallback;
use crate::types::{
    DetectResponse, DownloadInfoResponse, ErrorBody, RedactResponse, UploadResponse,
};
use crate::{GatewayError, HealthStatus, Result, VerificationStatus};

/// Gateway talking to the redaction backend over HTTP
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
    base: Url,
    detect_policy: MethodFallback,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("redact/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::InvalidRequest(format!("Failed to create HTTP client: {}", e)))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        let base = Url::parse(&base_url)
            .map_err(|e| GatewayError::InvalidRequest(format!("Invalid base URL '{}': {}", base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(GatewayError::InvalidRequest(format!(
                "Base URL cannot carry a path: {}",
                base_url
            )));
        }

        Ok(Self {
            client,
            base_url,
            base,
            detect_policy: MethodFallback::detect(),
        })
    }

    /// Replace the method fallback used for detection
    pub fn with_detect_policy(mut self, policy: MethodFallback) -> Self {
        self.detect_policy = policy;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Base URL plus path segments. Each segment is percent-encoded, so a
    /// document ref can never add segments, a query or a fragment.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Send the same logical request through each step of `policy`
    async fn send_with_fallback(
        &self,
        operation: &'static str,
        policy: &MethodFallback,
        url: Url,
    ) -> Result<Response> {
        let mut tried = Vec::new();

        for step in policy.steps() {
            tried.push(step.method.to_string());
            let response = self.client.request(step.method.clone(), url.clone()).send().await?;
            let status = response.status();

            if (step.fall_through_on)(status) {
                debug!(operation, method = %step.method, status = status.as_u16(), "Falling through to next method");
                continue;
            }

            return Ok(response);
        }

        warn!(operation, tried = %tried.join(", "), "No method accepted");
        Err(GatewayError::ProtocolMismatch {
            operation,
            tried: tried.join(", "),
        })
    }
}

/// Turn a non-2xx response into a normalized error
async fn rejection(response: Response) -> GatewayError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    match serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(ErrorBody::into_message)
    {
        Some(message) => GatewayError::ServerRejected {
            status: status.as_u16(),
            message,
        },
        None => GatewayError::ServerRejectedOpaque {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
        },
    }
}

/// Check status and decode a JSON body
async fn json_body<T: DeserializeOwned>(response: Response) -> Result<T> {
    if !response.status().is_success() {
        return Err(rejection(response).await);
    }

    let body = response.bytes().await?;
    serde_json::from_slice(&body).map_err(|e| GatewayError::InvalidResponse(e.to_string()))
}

#[async_trait]
impl Backend for HttpGateway {
    async fn upload(&self, document: &Document) -> Result<DocumentRef> {
        let part = multipart::Part::bytes(document.bytes.clone())
            .file_name(document.file_name.clone())
            .mime_str(&document.content_type)
            .map_err(|e| GatewayError::InvalidRequest(e.to_string()))?;
        let form = multipart::Form::new().part("file", part);

        info!(file_name = %document.file_name, size_bytes = document.size_bytes(), "Uploading document");
        let response = self
            .client
            .post(self.url(&["upload", ""]))
            .multipart(form)
            .send()
            .await?;

        let upload: UploadResponse = json_body(response).await?;
        match upload.file_id {
            Some(id) if upload.success && !id.is_empty() => {
                info!(document_ref = %id, "Upload accepted");
                Ok(DocumentRef::new(id))
            }
            _ => Err(GatewayError::Unsuccessful(
                upload.message.unwrap_or_else(|| "Upload failed".to_string()),
            )),
        }
    }

    async fn detect(&self, doc: &DocumentRef) -> Result<DetectedData> {
        let url = self.url(&["data", doc.as_str()]);
        let response = self
            .send_with_fallback("detect", &self.detect_policy, url)
            .await?;

        let detect: DetectResponse = json_body(response).await?;
        match detect.detected_data {
            Some(data) if detect.success => {
                info!(document_ref = %doc, items = data.total_count(), types = data.type_count(), "Detection finished");
                Ok(data)
            }
            _ => Err(GatewayError::Unsuccessful(
                detect
                    .message
                    .unwrap_or_else(|| "No data detected in document".to_string()),
            )),
        }
    }

    async fn redact(
        &self,
        doc: &DocumentRef,
        request: &RedactionRequest,
    ) -> Result<RedactionResult> {
        info!(document_ref = %doc, items = request.item_count(), "Requesting redaction");
        let response = self
            .client
            .post(self.url(&["redact", doc.as_str()]))
            .json(request)
            .send()
            .await?;

        let redact: RedactResponse = json_body(response).await?;
        if redact.success == Some(false) {
            return Err(GatewayError::Unsuccessful(
                redact.message.unwrap_or_else(|| "Redaction failed".to_string()),
            ));
        }

        info!(document_ref = %doc, redacted = redact.redacted_count, "Redaction finished");
        Ok(RedactionResult {
            download_ref: redact.download_url,
            verification_ref: redact.verification_url,
            redacted_count: redact.redacted_count,
            completed_at: OffsetDateTime::now_utc(),
        })
    }

    async fn download_info(&self, doc: &DocumentRef) -> Result<DownloadAvailability> {
        let response = self
            .client
            .get(self.url(&["download", doc.as_str(), "info"]))
            .send()
            .await?;

        let info: DownloadInfoResponse = json_body(response).await?;
        debug!(document_ref = %doc, pdf = info.pdf_available, report = info.report_available, "Download info");
        Ok(info.into_availability())
    }

    async fn download(&self, doc: &DocumentRef, kind: ArtifactKind) -> Result<DownloadedArtifact> {
        let url = match kind {
            ArtifactKind::Pdf => self.url(&["download", doc.as_str()]),
            ArtifactKind::Report => self.url(&["download", doc.as_str(), "report"]),
        };

        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(rejection(response).await);
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
            .unwrap_or_else(|| kind.content_type().to_string());
        let bytes = response.bytes().await?.to_vec();

        info!(document_ref = %doc, kind = %kind, size_bytes = bytes.len(), "Downloaded artifact");
        Ok(DownloadedArtifact {
            kind,
            file_name: kind.file_name(doc),
            content_type,
            bytes,
        })
    }

    async fn verification(&self, doc: &DocumentRef) -> Result<VerificationStatus> {
        let response = self
            .client
            .get(self.url(&["verify", doc.as_str()]))
            .send()
            .await?;
        json_body(response).await
    }

    async fn health(&self) -> Result<HealthStatus> {
        let response = self.client.get(self.url(&["health"])).send().await?;
        json_body(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let gateway = HttpGateway::new("http://localhost:8000/", Duration::from_secs(1)).unwrap();
        assert_eq!(gateway.base_url(), "http://localhost:8000");
        assert_eq!(
            gateway.url(&["upload", ""]).as_str(),
            "http://localhost:8000/upload/"
        );
    }

    #[test]
    fn test_base_path_is_kept() {
        let gateway = HttpGateway::new("http://host/api/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            gateway.url(&["download", "abc", "info"]).as_str(),
            "http://host/api/download/abc/info"
        );
    }

    #[test]
    fn test_document_ref_is_one_escaped_segment() {
        let gateway = HttpGateway::new("http://localhost:8000", Duration::from_secs(1)).unwrap();
        assert_eq!(
            gateway.url(&["data", "ab?x=1"]).as_str(),
            "http://localhost:8000/data/ab%3Fx=1"
        );
        assert_eq!(
            gateway.url(&["data", "a/b#c"]).as_str(),
            "http://localhost:8000/data/a%2Fb%23c"
        );
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let err = HttpGateway::new("not a url", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, GatewayError::InvalidRequest(_)));
    }
}
