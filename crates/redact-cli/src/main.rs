mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use redact_config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();

    let mut config = Config::load()?;
    if let Some(url) = cli.api_url {
        config.backend.base_url = url;
    }

    match cli.command {
        cli::Commands::Process {
            file,
            keep,
            keep_value,
            out,
            no_download,
        } => commands::process::handle(file, keep, keep_value, out, no_download, &config).await,
        cli::Commands::Scan { file } => commands::scan::handle(file, &config).await,
        cli::Commands::Info { document } => commands::info::handle(document, &config).await,
        cli::Commands::Download {
            document,
            kind,
            out,
        } => commands::download::handle(document, kind.into(), out, &config).await,
        cli::Commands::Verify { document } => commands::verify::handle(document, &config).await,
        cli::Commands::Health => commands::health::handle(&config).await,
        cli::Commands::Config(cmd) => commands::config::handle(cmd, &config),
        cli::Commands::Completions { shell } => commands::completions::handle(shell),
    }
}
