use anyhow::{Result, bail};
use redact_config::Config;
use redact_gateway::Backend;

use super::gateway;

pub async fn handle(config: &Config) -> Result<()> {
    let status = gateway(config)?.health().await?;

    if !status.is_ok() {
        bail!("Backend at {} reports status '{}'", config.backend.base_url, status.status);
    }

    println!("✓ Backend at {} is healthy", config.backend.base_url);
    Ok(())
}
