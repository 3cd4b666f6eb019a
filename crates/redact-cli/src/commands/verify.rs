use anyhow::Result;
use redact_config::Config;
use redact_core::DocumentRef;
use redact_gateway::Backend;

use super::gateway;

pub async fn handle(document: String, config: &Config) -> Result<()> {
    let doc = DocumentRef::new(document);
    let status = gateway(config)?.verification(&doc).await?;

    println!("Document: {}", doc);
    if let Some(ts) = &status.redaction_timestamp {
        println!("  Redacted at: {}", ts);
    }

    if let Some(summary) = &status.summary {
        println!("  Total redacted: {}", summary.total_redacted);
        for (ty, count) in &summary.by_type {
            println!("    {}: {}", ty.display_name(), count);
        }
    }

    if let Some(files) = &status.file_status {
        println!(
            "  Redacted PDF: {}",
            if files.redacted_pdf_exists { "present" } else { "missing" }
        );
        println!(
            "  Report: {}",
            if files.report_exists { "present" } else { "missing" }
        );
        if files.redacted_pdf_exists {
            println!("  PDF size: {} bytes", files.redacted_pdf_size);
        }
    }

    Ok(())
}
