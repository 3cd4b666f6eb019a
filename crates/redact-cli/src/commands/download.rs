use anyhow::{Context, Result};
use redact_config::Config;
use redact_core::{ArtifactKind, DocumentRef};
use redact_gateway::Backend;
use std::path::PathBuf;

use super::gateway;

pub async fn handle(
    document: String,
    kind: ArtifactKind,
    out: Option<PathBuf>,
    config: &Config,
) -> Result<()> {
    let doc = DocumentRef::new(document);
    let artifact = gateway(config)?.download(&doc, kind).await?;

    let dir = out.unwrap_or_else(|| config.download.output_dir.clone());
    tokio::fs::create_dir_all(&dir).await?;
    let path = dir.join(&artifact.file_name);
    tokio::fs::write(&path, &artifact.bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("✓ Saved {} ({} bytes)", path.display(), artifact.bytes.len());
    println!("  blake3: {}", blake3::hash(&artifact.bytes).to_hex());

    Ok(())
}
