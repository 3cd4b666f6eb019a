//! Documents selected for upload

use std::fmt;
use std::path::Path;

use crate::{Result, ValidationError};

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

const PDF_MAGIC: &[u8] = b"%PDF-";

/// A local file about to be uploaded
#[derive(Clone)]
pub struct Document {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Document {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Read a file from disk and classify it
    pub async fn from_path(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("document")
            .to_string();
        let content_type = Self::classify(&file_name, &bytes).to_string();

        Ok(Self {
            file_name,
            content_type,
            bytes,
        })
    }

    /// Guess a content type from the extension or the PDF magic header
    pub fn classify(file_name: &str, bytes: &[u8]) -> &'static str {
        let has_pdf_extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));

        if has_pdf_extension || bytes.starts_with(PDF_MAGIC) {
            PDF_CONTENT_TYPE
        } else {
            "application/octet-stream"
        }
    }

    pub fn is_pdf(&self) -> bool {
        self.content_type == PDF_CONTENT_TYPE
    }

    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn size_mb(&self) -> f64 {
        self.bytes.len() as f64 / (1024.0 * 1024.0)
    }

    /// Checks done before upload: non-empty, a PDF, within the size limit
    pub fn validate(&self, max_bytes: u64) -> std::result::Result<(), ValidationError> {
        if self.bytes.is_empty() {
            return Err(ValidationError::EmptyFile(self.file_name.clone()));
        }

        if !self.is_pdf() {
            return Err(ValidationError::NotADocument {
                file_name: self.file_name.clone(),
                content_type: self.content_type.clone(),
            });
        }

        if self.size_bytes() > max_bytes {
            return Err(ValidationError::TooLarge {
                size_mb: self.size_mb(),
                limit_mb: max_bytes / (1024 * 1024),
            });
        }

        Ok(())
    }
}

// Never dump file contents into logs
impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("size_bytes", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMIT: u64 = 10 * 1024 * 1024;

    fn pdf(bytes: &[u8]) -> Document {
        Document::new("scan.pdf", PDF_CONTENT_TYPE, bytes.to_vec())
    }

    #[test]
    fn test_classify_by_extension_and_magic() {
        assert_eq!(Document::classify("a.PDF", b""), PDF_CONTENT_TYPE);
        assert_eq!(Document::classify("upload", b"%PDF-1.7\n"), PDF_CONTENT_TYPE);
        assert_eq!(
            Document::classify("notes.txt", b"hello"),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_validate_rejects_empty_file() {
        let err = pdf(b"").validate(LIMIT).unwrap_err();
        assert_eq!(err, ValidationError::EmptyFile("scan.pdf".to_string()));
    }

    #[test]
    fn test_validate_rejects_non_pdf() {
        let doc = Document::new("notes.txt", "text/plain", b"hello".to_vec());
        assert!(matches!(
            doc.validate(LIMIT),
            Err(ValidationError::NotADocument { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_oversized() {
        let doc = pdf(&[b'x'; 2048]);
        assert!(matches!(
            doc.validate(1024),
            Err(ValidationError::TooLarge { .. })
        ));
        assert!(doc.validate(LIMIT).is_ok());
    }

    #[test]
    fn test_debug_hides_contents() {
        let debug = format!("{:?}", pdf(b"%PDF-secret"));
        assert!(!debug.contains("secret"));
        assert!(debug.contains("size_bytes"));
    }

    #[tokio::test]
    async fn test_from_path_reads_and_classifies() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("statement");
        std::fs::write(&path, b"%PDF-1.4 body").unwrap();

        let doc = Document::from_path(&path).await.unwrap();
        assert_eq!(doc.file_name, "statement");
        assert!(doc.is_pdf());
        assert_eq!(doc.size_bytes(), 13);
    }
}
