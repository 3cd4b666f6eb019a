use anyhow::Result;
use redact_config::Config;
use std::path::PathBuf;

use super::{print_preview, upload_and_detect, workflow};

pub async fn handle(file: PathBuf, config: &Config) -> Result<()> {
    let mut wf = workflow(config, None)?;
    upload_and_detect(&mut wf, &file).await?;
    print_preview(&wf.snapshot());
    Ok(())
}
