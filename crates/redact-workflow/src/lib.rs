//! Session workflow for redact
//!
//! This crate provides:
//! - `SessionStore`, the single owner of session state
//! - `Workflow`, the stage machine that drives the backend
//! - Stage and error-state types shown to views

pub mod controller;
pub mod error;
pub mod stage;
pub mod store;

pub use controller::{Workflow, WorkflowEvent, WorkflowOptions};
pub use error::{ActionClass, Result, WorkflowError};
pub use stage::{ErrorState, FailureCause, Remedy, Stage, StageKind};
pub use store::{SavedArtifact, SessionSnapshot, SessionStore};
