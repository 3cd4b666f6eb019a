use anyhow::{Result, anyhow, bail};
use redact_config::{Config, DownloadConfig};
use redact_core::{ArtifactKind, DownloadAvailability, SensitiveType, ValidationError};
use redact_workflow::{Stage, Workflow, WorkflowError};
use std::path::PathBuf;
use tracing::debug;

use super::{drive, print_preview, upload_and_detect, workflow};

pub async fn handle(
    file: PathBuf,
    keep: Vec<String>,
    keep_value: Vec<String>,
    out: Option<PathBuf>,
    no_download: bool,
    config: &Config,
) -> Result<()> {
    let mut wf = workflow(config, out)?;
    upload_and_detect(&mut wf, &file).await?;

    let detected = wf.snapshot().detected.unwrap_or_default();
    for name in &keep {
        let ty = parse_type(name);
        if detected.contains_type(&ty) {
            wf.deselect_all(&ty)?;
            println!("  Keeping all {} items", ty.display_name());
        } else {
            println!("  No {} items detected; nothing to keep", ty.display_name());
        }
    }
    for pair in &keep_value {
        keep_single_value(&mut wf, pair)?;
    }

    print_preview(&wf.snapshot());

    match wf.submit_redact() {
        Err(WorkflowError::Validation(ValidationError::EmptySelection)) => {
            println!("Nothing selected for redaction; document left unchanged.");
            return Ok(());
        }
        other => other?,
    }
    drive(&mut wf).await;

    let snapshot = wf.snapshot();
    if snapshot.stage != Stage::ResultReady {
        bail!(
            "{}",
            snapshot
                .notice
                .unwrap_or_else(|| format!("Redaction did not finish ({})", snapshot.stage))
        );
    }

    if let Some(result) = &snapshot.result {
        println!("  Download: {}", result.download_ref);
        println!("  Verification: {}", result.verification_ref);
    }
    if let Some(downloads) = &snapshot.downloads {
        println!("  PDF size: {}", downloads.pdf_size_text());
    }

    if no_download {
        return Ok(());
    }

    for kind in ArtifactKind::ALL {
        if !wanted(&config.download, kind) {
            continue;
        }
        if offered(snapshot.downloads.as_ref(), kind) {
            wf.request_download(kind)?;
        } else {
            println!("  Skipping {}: not available on the backend", kind);
        }
    }
    drive(&mut wf).await;

    if let Some(notice) = wf.snapshot().notice {
        bail!(notice);
    }

    Ok(())
}

/// Deselect every occurrence of one value, given as `TYPE=VALUE`
fn keep_single_value(wf: &mut Workflow, pair: &str) -> Result<()> {
    let (name, value) = pair
        .split_once('=')
        .ok_or_else(|| anyhow!("Expected TYPE=VALUE, got '{}'", pair))?;
    let ty = parse_type(name);

    let snapshot = wf.snapshot();
    let still_selected = match (&snapshot.detected, &snapshot.selection) {
        (Some(detected), Some(selection)) => detected
            .values(&ty)
            .iter()
            .enumerate()
            .any(|(i, v)| v == value && selection.is_selected(&ty, i)),
        _ => false,
    };

    if still_selected {
        wf.toggle_value(&ty, value)?;
        debug!(ty = %ty, "Value kept unredacted");
    } else if !snapshot
        .detected
        .as_ref()
        .is_some_and(|d| d.values(&ty).iter().any(|v| v == value))
    {
        return Err(WorkflowError::Validation(ValidationError::ValueNotDetected(ty.to_string())).into());
    }
    Ok(())
}

/// Operator-typed tag, matched case-insensitively
fn parse_type(name: &str) -> SensitiveType {
    match name.parse() {
        Ok(ty) => ty,
        Err(never) => match never {},
    }
}

fn wanted(config: &DownloadConfig, kind: ArtifactKind) -> bool {
    match kind {
        ArtifactKind::Pdf => config.save_pdf,
        ArtifactKind::Report => config.save_report,
    }
}

/// Only ask for artifacts the last availability check reported
fn offered(downloads: Option<&DownloadAvailability>, kind: ArtifactKind) -> bool {
    downloads.is_some_and(|d| d.is_available(kind))
}
