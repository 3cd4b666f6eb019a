use anyhow::Result;
use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::Cli;

pub fn handle(shell: Shell) -> Result<()> {
    clap_complete::generate(shell, &mut Cli::command(), "redact", &mut std::io::stdout());
    Ok(())
}
