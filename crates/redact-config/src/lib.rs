use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding `backend.base_url`
pub const BASE_URL_ENV: &str = "REDACT_API_BASE_URL";

/// Configuration for redact (~/.config/redact/config.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub upload: UploadConfig,

    #[serde(default)]
    pub download: DownloadConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Upper bound for any single backend call
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(default = "default_true")]
    pub save_pdf: bool,

    #[serde(default = "default_true")]
    pub save_report: bool,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: default_max_file_size_mb(),
        }
    }
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            save_pdf: true,
            save_report: true,
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_file_size_mb() -> u64 {
    10
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_true() -> bool {
    true
}

impl BackendConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl UploadConfig {
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }
}

impl Config {
    /// Load config from default location or create default if not found.
    /// `REDACT_API_BASE_URL` wins over the file.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = Self::load_from(&Self::config_path())?;
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.trim().is_empty() {
                tracing::debug!(base_url = %url, "Using base URL from environment");
                config.backend.base_url = url;
            }
        }
        Ok(config)
    }

    /// Load config from `path`, writing defaults there if it doesn't exist
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            // Create default config file
            let config = Config::default();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let content = toml::to_string_pretty(&config)?;
            std::fs::write(path, content)?;
            Ok(config)
        }
    }

    /// Reject values that would make every backend call fail
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.backend.request_timeout_secs == 0 {
            anyhow::bail!("backend.request_timeout_secs must be at least 1");
        }
        Ok(())
    }

    /// Get config file path
    pub fn config_path() -> PathBuf {
        if let Some(dirs) = directories::ProjectDirs::from("com", "redact", "redact") {
            dirs.config_dir().join("config.toml")
        } else {
            PathBuf::from("~/.redact/config.toml")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.backend.base_url, "http://localhost:8000");
        assert_eq!(config.backend.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.upload.max_file_size_bytes(), 10 * 1024 * 1024);
        assert!(config.download.save_pdf && config.download.save_report);
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.backend.base_url, config.backend.base_url);
        assert_eq!(parsed.upload.max_file_size_mb, 10);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let toml_str = r#"
[backend]
base_url = "https://redact.example.org"

[download]
save_report = false
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.backend.base_url, "https://redact.example.org");
        assert_eq!(config.backend.request_timeout_secs, 30);
        assert!(config.download.save_pdf);
        assert!(!config.download.save_report);
        assert_eq!(config.upload.max_file_size_mb, 10);
    }

    #[test]
    fn test_load_from_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.backend.base_url, "http://localhost:8000");

        std::fs::write(&path, "[upload]\nmax_file_size_mb = 25\n").unwrap();
        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.upload.max_file_size_mb, 25);
    }

    #[test]
    fn test_huge_size_limit_saturates() {
        let upload = UploadConfig {
            max_file_size_mb: u64::MAX,
        };
        assert_eq!(upload.max_file_size_bytes(), u64::MAX);
    }

    #[test]
    fn test_zero_timeout_rejected_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[backend]\nrequest_timeout_secs = 0\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("request_timeout_secs"));

        std::fs::write(&path, "[backend]\nrequest_timeout_secs = 1\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.backend.request_timeout(), Duration::from_secs(1));
    }
}
