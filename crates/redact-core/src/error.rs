use thiserror::Error;

/// Problems caught locally, before anything reaches the backend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("No file selected")]
    MissingFile,

    #[error("File is empty: {0}")]
    EmptyFile(String),

    #[error("Only PDF files are allowed. Received: {content_type} ({file_name})")]
    NotADocument {
        file_name: String,
        content_type: String,
    },

    #[error("File size {size_mb:.2} MB exceeds {limit_mb} MB limit")]
    TooLarge { size_mb: f64, limit_mb: u64 },

    #[error("Nothing selected for redaction")]
    EmptySelection,

    #[error("Unknown data type: {0}")]
    UnknownType(String),

    #[error("No {ty} item at position {index}")]
    IndexOutOfRange { ty: String, index: usize },

    #[error("Value was not detected for {0}")]
    ValueNotDetected(String),

    #[error("Selection no longer matches detected data for {0}")]
    StaleSelection(String),
}

#[derive(Error, Debug)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
