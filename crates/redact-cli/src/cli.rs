use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use redact_core::ArtifactKind;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "redact")]
#[command(about = "Detect and redact sensitive data in PDF documents", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Backend base URL (overrides the config file)
    #[arg(long, global = true, env = "REDACT_API_BASE_URL")]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Upload, detect, redact and download in one go
    Process {
        /// PDF to redact
        file: PathBuf,

        /// Leave every item of this type unredacted (e.g. Email, PAN)
        #[arg(long, value_name = "TYPE")]
        keep: Vec<String>,

        /// Leave one value unredacted
        #[arg(long, value_name = "TYPE=VALUE")]
        keep_value: Vec<String>,

        /// Directory for downloaded files (default from config)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Skip downloading the results
        #[arg(long)]
        no_download: bool,
    },

    /// Upload and detect only, showing a masked preview
    Scan {
        /// PDF to scan
        file: PathBuf,
    },

    /// Show what can be downloaded for a document
    Info {
        /// Document reference returned by upload
        document: String,
    },

    /// Download a redacted PDF or verification report
    Download {
        /// Document reference returned by upload
        document: String,

        #[arg(long, value_enum, default_value = "pdf")]
        kind: KindArg,

        /// Output directory (default from config)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Show verification status of a redacted document
    Verify {
        /// Document reference returned by upload
        document: String,
    },

    /// Check that the backend is reachable
    Health,

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the config file location
    Path,

    /// Print the effective configuration
    Show,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum KindArg {
    Pdf,
    Report,
}

impl From<KindArg> for ArtifactKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Pdf => ArtifactKind::Pdf,
            KindArg::Report => ArtifactKind::Report,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_process_opt_outs() {
        let cli = Cli::try_parse_from([
            "redact",
            "--api-url",
            "http://backend:9000",
            "process",
            "scan.pdf",
            "--keep",
            "Email",
            "--keep-value",
            "PAN=ABCDE1234F",
            "--no-download",
        ])
        .unwrap();

        assert_eq!(cli.api_url.as_deref(), Some("http://backend:9000"));
        match cli.command {
            Commands::Process {
                file,
                keep,
                keep_value,
                out,
                no_download,
            } => {
                assert_eq!(file, PathBuf::from("scan.pdf"));
                assert_eq!(keep, vec!["Email"]);
                assert_eq!(keep_value, vec!["PAN=ABCDE1234F"]);
                assert!(out.is_none());
                assert!(no_download);
            }
            _ => panic!("expected process"),
        }
    }

    #[test]
    fn test_download_kind_defaults_to_pdf() {
        let cli = Cli::try_parse_from(["redact", "download", "abc123"]).unwrap();
        match cli.command {
            Commands::Download { kind, .. } => {
                assert_eq!(ArtifactKind::from(kind), ArtifactKind::Pdf)
            }
            _ => panic!("expected download"),
        }
    }
}
