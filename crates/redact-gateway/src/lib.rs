//! Backend gateway for redact
//!
//! This crate provides:
//! - The `Backend` trait (one operation per backend capability)
//! - `HttpGateway`, the HTTP+JSON implementation
//! - Method fallback policies and error normalization

pub mod backend;
pub mod error;
pub mod fallback;
pub mod http;
pub mod types;

pub use backend::{Backend, DownloadedArtifact};
pub use error::{GatewayError, Result};
pub use fallback::{FallbackStep, MethodFallback};
pub use http::HttpGateway;
pub use types::{FileStatus, HealthStatus, VerificationStatus, VerificationSummary};
