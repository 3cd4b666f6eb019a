//! Core domain models and logic for redact
//!
//! This crate contains:
//! - Domain models (SensitiveType, DetectedData, Document, RedactionResult)
//! - Selection policy (safety-first default selection, toggles, request payload)
//! - Display masking for detected values

pub mod detected;
pub mod document;
pub mod error;
pub mod mask;
pub mod selection;
pub mod sensitive;
pub mod session;

pub use detected::DetectedData;
pub use document::{Document, PDF_CONTENT_TYPE};
pub use error::{CoreError, Result, ValidationError};
pub use mask::mask_value;
pub use selection::{Coverage, RedactionRequest, SelectionState};
pub use sensitive::SensitiveType;
pub use session::{ArtifactKind, DocumentRef, DownloadAvailability, RedactionResult};
