use anyhow::Result;
use redact_config::Config;
use redact_core::DocumentRef;
use redact_gateway::Backend;

use super::gateway;

pub async fn handle(document: String, config: &Config) -> Result<()> {
    let doc = DocumentRef::new(document);
    let availability = gateway(config)?.download_info(&doc).await?;

    println!("Document: {}", doc);
    println!(
        "  Redacted PDF: {} ({})",
        if availability.pdf_available { "available" } else { "not available" },
        availability.pdf_size_text()
    );
    match availability.report_size_kb {
        Some(kb) if availability.report_available => {
            println!("  Verification report: available ({} KB)", kb)
        }
        _ if availability.report_available => println!("  Verification report: available"),
        _ => println!("  Verification report: not available"),
    }
    if let Some(error) = &availability.last_error {
        println!("  Error: {}", error);
    }

    Ok(())
}
