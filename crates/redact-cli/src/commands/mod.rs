pub mod completions;
pub mod config;
pub mod download;
pub mod health;
pub mod info;
pub mod process;
pub mod scan;
pub mod verify;

use anyhow::{Context, Result, bail};
use redact_config::Config;
use redact_core::{Document, mask_value};
use redact_gateway::HttpGateway;
use redact_workflow::{
    Remedy, SessionSnapshot, Stage, Workflow, WorkflowEvent, WorkflowOptions,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub fn gateway(config: &Config) -> Result<HttpGateway> {
    HttpGateway::new(&config.backend.base_url, config.backend.request_timeout())
        .context("Failed to create backend client")
}

pub fn workflow(config: &Config, out: Option<PathBuf>) -> Result<Workflow> {
    let options = WorkflowOptions {
        request_timeout: config.backend.request_timeout(),
        max_file_size_bytes: config.upload.max_file_size_bytes(),
        download_dir: out.unwrap_or_else(|| config.download.output_dir.clone()),
    };
    Ok(Workflow::new(Arc::new(gateway(config)?), options))
}

/// Read, upload and detect, stopping at the preview
pub async fn upload_and_detect(wf: &mut Workflow, file: &Path) -> Result<()> {
    let document = Document::from_path(file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;

    wf.submit_upload(document)?;
    drive(wf).await;

    match wf.stage() {
        Stage::PreviewReady => Ok(()),
        Stage::Error(state) => {
            let mut hint = String::new();
            if state.offers(Remedy::Retry) {
                hint.push_str("\n  The backend may be temporarily unavailable; try again.");
            }
            if state.remedies == [Remedy::NewSession] {
                hint.push_str("\n  Try a different document.");
            }
            bail!("{}{}", state, hint)
        }
        other => bail!("Unexpected stage after detection: {}", other),
    }
}

/// Apply completions until the workflow is idle, reporting each one
pub async fn drive(wf: &mut Workflow) {
    while let Some(event) = wf.next_event().await {
        report(&event);
    }
}

fn report(event: &WorkflowEvent) {
    match event {
        WorkflowEvent::Uploaded(doc) => println!("✓ Uploaded: {}", doc),
        WorkflowEvent::Detected { types, items } => {
            println!("✓ Detected {} items across {} types", items, types)
        }
        WorkflowEvent::Redacted { redacted_count } => {
            println!("✓ Redacted {} items", redacted_count)
        }
        WorkflowEvent::Saved(saved) => {
            println!("✓ Saved {} ({} bytes)", saved.path.display(), saved.size_bytes);
            println!("  blake3: {}", saved.checksum);
        }
        WorkflowEvent::DownloadsRefreshed(_) => {}
        WorkflowEvent::Failed(state) => eprintln!("✗ {}", state),
        WorkflowEvent::Notice(message) => eprintln!("! {}", message),
    }
}

/// Masked listing of detected items and their selection
pub fn print_preview(snapshot: &SessionSnapshot) {
    let (Some(detected), Some(selection)) = (&snapshot.detected, &snapshot.selection) else {
        return;
    };

    if let Some(doc) = &snapshot.document_ref {
        println!("Document: {}", doc);
    }
    println!(
        "Selected for redaction: {} of {}",
        selection.selected_count(),
        selection.total_count()
    );

    for (ty, values) in detected.iter() {
        println!(
            "\n  {} ({}/{})",
            ty.display_name(),
            selection.selected_in(ty),
            values.len()
        );
        for (index, value) in values.iter().enumerate() {
            let mark = if selection.is_selected(ty, index) { "x" } else { " " };
            println!("    [{}] {}", mark, mask_value(ty, value));
        }
    }
    println!();
}
