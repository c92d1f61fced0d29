//! Configuration management for docwizard using the prefer crate.
//!
//! Precedence, lowest to highest: built-in defaults, config file
//! (`docwizard.{toml,yaml,json}` discovered by prefer, or `--config`),
//! `DOCWIZARD_*` / `LLM_*` environment variables, CLI flags.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::llm::LlmConfig;

/// Default bind address (matches the port the wizard has always used).
pub const DEFAULT_BIND: &str = "127.0.0.1:5002";

/// Default maximum upload size in MiB.
pub const DEFAULT_MAX_UPLOAD_MB: u64 = 10;

/// Default idle lifetime of a wizard session in minutes.
pub const DEFAULT_SESSION_TTL_MINUTES: u64 = 30;

/// Default lifetime of a share link in hours.
pub const DEFAULT_SHARE_TTL_HOURS: u64 = 24;

/// Subdirectory of the data directory that holds uploads.
pub const UPLOADS_SUBDIR: &str = "uploads";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse {format} config: {message}")]
    Parse {
        format: &'static str,
        message: String,
    },
}

/// Application settings, fully resolved.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base data directory.
    pub data_dir: PathBuf,
    /// Where uploaded and editor documents are written.
    pub upload_dir: PathBuf,
    /// Directory holding downloadable templates and samples.
    pub assets_dir: PathBuf,
    /// Address to listen on.
    pub bind: String,
    /// Externally visible base URL, used in share links.
    pub public_url: Option<String>,
    /// Maximum request body for uploads, in bytes.
    pub max_upload_bytes: usize,
    /// Idle session lifetime.
    pub session_ttl: Duration,
    /// Share link lifetime.
    pub share_ttl: Duration,
    /// `pdftotext` binary name or path.
    pub pdftotext: String,
    /// LLM settings for analysis.
    pub llm: LlmConfig,
}

impl Default for Settings {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."))
            .join("docwizard");

        Self {
            upload_dir: data_dir.join(UPLOADS_SUBDIR),
            data_dir,
            assets_dir: PathBuf::from("."),
            bind: DEFAULT_BIND.to_string(),
            public_url: None,
            max_upload_bytes: (DEFAULT_MAX_UPLOAD_MB * 1024 * 1024) as usize,
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_MINUTES * 60),
            share_ttl: Duration::from_secs(DEFAULT_SHARE_TTL_HOURS * 3600),
            pdftotext: "pdftotext".to_string(),
            llm: LlmConfig::default(),
        }
    }
}

impl Settings {
    /// Create settings rooted at a custom data directory.
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self {
            upload_dir: data_dir.join(UPLOADS_SUBDIR),
            data_dir,
            ..Default::default()
        }
    }

    /// Move the data directory. Uploads follow it unless the config named
    /// an upload directory of its own.
    pub fn relocate_data_dir(&mut self, data_dir: PathBuf, config: &Config) {
        if config.upload_dir.is_none() {
            self.upload_dir = data_dir.join(UPLOADS_SUBDIR);
        }
        self.data_dir = data_dir;
    }

    /// Make sure writable directories exist.
    pub fn ensure_directories(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.upload_dir)
    }

    /// Base URL for links handed to other people.
    pub fn public_base_url(&self) -> String {
        match self.public_url {
            Some(ref url) => url.trim_end_matches('/').to_string(),
            None => format!("http://{}", self.bind),
        }
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Data directory path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,
    /// Upload directory (defaults to `<data_dir>/uploads`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_dir: Option<String>,
    /// Directory containing `templates/` and `samples/` downloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assets_dir: Option<String>,
    /// Bind address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<String>,
    /// Public base URL for share links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_url: Option<String>,
    /// Maximum upload size in MiB.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_upload_mb: Option<u64>,
    /// Idle session lifetime in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_ttl_minutes: Option<u64>,
    /// Share link lifetime in hours.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub share_ttl_hours: Option<u64>,
    /// `pdftotext` binary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pdftotext: Option<String>,
    /// LLM configuration for analysis.
    #[serde(default, skip_serializing_if = "LlmConfig::is_default")]
    pub llm: LlmConfig,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration using prefer crate for discovery.
    pub async fn load() -> Self {
        match prefer::load("docwizard").await {
            Ok(pref_config) => match pref_config.source_path() {
                Some(path) => match Self::load_from_path(path).await {
                    Ok(config) => config,
                    Err(e) => {
                        tracing::warn!("Ignoring config file: {}", e);
                        Self::default()
                    }
                },
                None => Self::default(),
            },
            Err(_) => Self::default(),
        }
    }

    /// Load configuration from a specific file path.
    /// Supports JSON, TOML and YAML based on file extension.
    pub async fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");
        let mut config = Self::parse(&contents, ext)?;
        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parse config text in the format named by `ext`.
    pub fn parse(contents: &str, ext: &str) -> Result<Self, ConfigError> {
        match ext {
            "toml" => toml::from_str(contents).map_err(|e| ConfigError::Parse {
                format: "TOML",
                message: e.to_string(),
            }),
            "yaml" | "yml" => serde_yaml::from_str(contents).map_err(|e| ConfigError::Parse {
                format: "YAML",
                message: e.to_string(),
            }),
            _ => serde_json::from_str(contents).map_err(|e| ConfigError::Parse {
                format: "JSON",
                message: e.to_string(),
            }),
        }
    }

    /// Get the base directory for resolving relative paths.
    pub fn base_dir(&self) -> Option<PathBuf> {
        self.source_path
            .as_ref()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    /// Overlay `DOCWIZARD_*` environment variables.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok().filter(|v| !v.is_empty()))
    }

    pub fn with_overrides_from(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(v) = var("DOCWIZARD_DATA_DIR") {
            self.data_dir = Some(v);
        }
        if let Some(v) = var("DOCWIZARD_UPLOAD_DIR") {
            self.upload_dir = Some(v);
        }
        if let Some(v) = var("DOCWIZARD_ASSETS_DIR") {
            self.assets_dir = Some(v);
        }
        if let Some(v) = var("DOCWIZARD_BIND") {
            self.bind = Some(v);
        }
        if let Some(v) = var("DOCWIZARD_PUBLIC_URL") {
            self.public_url = Some(v);
        }
        if let Some(n) = var("DOCWIZARD_MAX_UPLOAD_MB").and_then(|v| v.parse().ok()) {
            self.max_upload_mb = Some(n);
        }
        if let Some(n) = var("DOCWIZARD_SESSION_TTL_MINUTES").and_then(|v| v.parse().ok()) {
            self.session_ttl_minutes = Some(n);
        }
        if let Some(n) = var("DOCWIZARD_SHARE_TTL_HOURS").and_then(|v| v.parse().ok()) {
            self.share_ttl_hours = Some(n);
        }
        if let Some(v) = var("DOCWIZARD_PDFTOTEXT") {
            self.pdftotext = Some(v);
        }
        self.llm = self.llm.with_overrides_from(&var);
        self
    }

    /// Apply this config to settings, resolving relative paths against `base_dir`.
    pub fn apply_to_settings(&self, settings: &mut Settings, base_dir: &Path) {
        if let Some(ref data_dir) = self.data_dir {
            settings.data_dir = resolve_path(data_dir, base_dir);
            settings.upload_dir = settings.data_dir.join(UPLOADS_SUBDIR);
        }
        if let Some(ref upload_dir) = self.upload_dir {
            settings.upload_dir = resolve_path(upload_dir, base_dir);
        }
        if let Some(ref assets_dir) = self.assets_dir {
            settings.assets_dir = resolve_path(assets_dir, base_dir);
        }
        if let Some(ref bind) = self.bind {
            settings.bind = bind.clone();
        }
        if let Some(ref url) = self.public_url {
            match url::Url::parse(url) {
                Ok(_) => settings.public_url = Some(url.clone()),
                Err(e) => tracing::warn!("Ignoring invalid public_url {:?}: {}", url, e),
            }
        }
        if let Some(mb) = self.max_upload_mb {
            settings.max_upload_bytes = usize::try_from(mb.saturating_mul(1024 * 1024)).unwrap_or(usize::MAX);
        }
        if let Some(minutes) = self.session_ttl_minutes {
            settings.session_ttl = Duration::from_secs(minutes.saturating_mul(60));
        }
        if let Some(hours) = self.share_ttl_hours {
            settings.share_ttl = Duration::from_secs(hours.saturating_mul(3600));
        }
        if let Some(ref bin) = self.pdftotext {
            settings.pdftotext = bin.clone();
        }
        settings.llm = self.llm.clone();
    }
}

/// Expand `~` and environment references, then anchor relative paths.
fn resolve_path(raw: &str, base_dir: &Path) -> PathBuf {
    let expanded = shellexpand::full(raw)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| raw.to_string());
    let path = PathBuf::from(expanded);
    if path.is_absolute() {
        path
    } else {
        base_dir.join(path)
    }
}

/// Load settings from an explicit config file or by discovery.
pub async fn load_settings(config_path: Option<&Path>) -> anyhow::Result<(Settings, Config)> {
    let config = match config_path {
        Some(path) => Config::load_from_path(path).await?,
        None => Config::load().await,
    }
    .with_env_overrides();

    let base_dir = config
        .base_dir()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    let mut settings = Settings::default();
    config.apply_to_settings(&mut settings, &base_dir);

    tracing::debug!(
        "Settings: data_dir={}, upload_dir={}, llm={:?}/{}",
        settings.data_dir.display(),
        settings.upload_dir.display(),
        settings.llm.provider,
        settings.llm.model
    );

    Ok((settings, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_toml() {
        let config = Config::parse(
            r#"
            data_dir = "state"
            max_upload_mb = 25
            public_url = "https://docs.example.org/"

            [llm]
            provider = "ollama"
            model = "llama3.1:8b"
            "#,
            "toml",
        )
        .unwrap();

        let mut settings = Settings::default();
        config.apply_to_settings(&mut settings, Path::new("/srv/wizard"));

        assert_eq!(settings.data_dir, PathBuf::from("/srv/wizard/state"));
        assert_eq!(settings.upload_dir, PathBuf::from("/srv/wizard/state/uploads"));
        assert_eq!(settings.max_upload_bytes, 25 * 1024 * 1024);
        assert_eq!(settings.public_base_url(), "https://docs.example.org");
        assert_eq!(settings.llm.model, "llama3.1:8b");
        assert_eq!(settings.llm.max_tokens, 1500);
    }

    #[test]
    fn test_parse_yaml_and_json() {
        let yaml = Config::parse("bind: 0.0.0.0:8080\nsession_ttl_minutes: 5\n", "yaml").unwrap();
        assert_eq!(yaml.bind.as_deref(), Some("0.0.0.0:8080"));
        assert_eq!(yaml.session_ttl_minutes, Some(5));

        let json = Config::parse(r#"{"upload_dir": "/var/uploads"}"#, "json").unwrap();
        assert_eq!(json.upload_dir.as_deref(), Some("/var/uploads"));
    }

    #[test]
    fn test_parse_error_names_format() {
        let err = Config::parse("data_dir = ", "toml").unwrap_err();
        assert!(err.to_string().contains("TOML"));
    }

    #[test]
    fn test_invalid_public_url_ignored() {
        let config = Config {
            public_url: Some("not a url".to_string()),
            ..Default::default()
        };
        let mut settings = Settings::default();
        config.apply_to_settings(&mut settings, Path::new("."));
        assert!(settings.public_url.is_none());
        assert_eq!(settings.public_base_url(), "http://127.0.0.1:5002");
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::default().with_overrides_from(|key| match key {
            "DOCWIZARD_BIND" => Some("0.0.0.0:9000".to_string()),
            "DOCWIZARD_MAX_UPLOAD_MB" => Some("3".to_string()),
            "LLM_PROVIDER" => Some("ollama".to_string()),
            _ => None,
        });
        assert_eq!(config.bind.as_deref(), Some("0.0.0.0:9000"));
        assert_eq!(config.max_upload_mb, Some(3));
        assert_eq!(config.llm.endpoint, "http://localhost:11434");
    }

    #[test]
    fn test_relocate_data_dir_keeps_explicit_upload_dir() {
        let config = Config::default().with_overrides_from(|key| match key {
            "DOCWIZARD_UPLOAD_DIR" => Some("/var/uploads".to_string()),
            _ => None,
        });
        let mut settings = Settings::default();
        config.apply_to_settings(&mut settings, Path::new("/"));
        settings.relocate_data_dir(PathBuf::from("/data"), &config);
        assert_eq!(settings.data_dir, PathBuf::from("/data"));
        assert_eq!(settings.upload_dir, PathBuf::from("/var/uploads"));

        let mut settings = Settings::default();
        settings.relocate_data_dir(PathBuf::from("/data"), &Config::default());
        assert_eq!(settings.upload_dir, PathBuf::from("/data/uploads"));
    }

    #[test]
    fn test_huge_limits_saturate() {
        let config = Config {
            max_upload_mb: Some(u64::MAX),
            session_ttl_minutes: Some(u64::MAX),
            share_ttl_hours: Some(u64::MAX),
            ..Default::default()
        };
        let mut settings = Settings::default();
        config.apply_to_settings(&mut settings, Path::new("."));
        assert_eq!(settings.max_upload_bytes, usize::MAX);
        assert_eq!(settings.session_ttl, Duration::from_secs(u64::MAX));
        assert_eq!(settings.share_ttl, Duration::from_secs(u64::MAX));
    }

    #[test]
    fn test_with_data_dir() {
        let settings = Settings::with_data_dir(PathBuf::from("/data"));
        assert_eq!(settings.upload_dir, PathBuf::from("/data/uploads"));
    }
}
