//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.typematchup.toml` files.

use crate::source::pokeapi::DEFAULT_API_URL;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".typematchup.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Type record source settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Output file path. Reports go to stdout when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

/// Settings for fetching type records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// PokeAPI base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// User-Agent header sent with each request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Read records from `{records_dir}/{type}.json` instead of HTTP.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub records_dir: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
            records_dir: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("typematchup/{}", env!("CARGO_PKG_VERSION"))
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Plain text lines (default)
    #[default]
    Text,
    /// Markdown with badge images
    Markdown,
    /// HTML fragment with badge images
    Html,
    /// JSON format
    Json,
}

/// Report rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Output format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Label prefixed to damage-received lines.
    #[serde(default = "default_loss_label")]
    pub loss_label: String,

    /// Label prefixed to damage-dealt lines.
    #[serde(default = "default_win_label")]
    pub win_label: String,

    /// Base URL of the type badge sprites.
    #[serde(default = "default_badge_base_url")]
    pub badge_base_url: String,

    /// Badge width in pixels.
    #[serde(default = "default_badge_width")]
    pub badge_width: u32,

    /// Badge height in pixels.
    #[serde(default = "default_badge_height")]
    pub badge_height: u32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            loss_label: default_loss_label(),
            win_label: default_win_label(),
            badge_base_url: default_badge_base_url(),
            badge_width: default_badge_width(),
            badge_height: default_badge_height(),
        }
    }
}

fn default_loss_label() -> String {
    "Loss".to_string()
}

fn default_win_label() -> String {
    "Win".to_string()
}

fn default_badge_base_url() -> String {
    "https://play.pokemonshowdown.com/sprites/types".to_string()
}

fn default_badge_width() -> u32 {
    32
}

fn default_badge_height() -> u32 {
    14
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load configuration from `dir/.typematchup.toml`.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence, but only when explicitly provided.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref url) = args.api_url {
            self.api.base_url = url.clone();
        }
        if let Some(timeout) = args.timeout {
            self.api.timeout_seconds = timeout;
        }
        if let Some(ref dir) = args.records_dir {
            self.api.records_dir = Some(dir.clone());
        }

        if let Some(format) = args.format {
            self.report.format = format;
        }

        if let Some(ref output) = args.output {
            self.general.output = Some(output.clone());
        }
    }

    /// Check merged settings that a config file may have supplied.
    pub fn validate(&self) -> Result<()> {
        let url = &self.api.base_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            bail!("api.base_url must start with 'http://' or 'https://': {}", url);
        }

        if self.api.timeout_seconds == 0 {
            bail!("api.timeout_seconds must be at least 1");
        }

        if let Some(ref dir) = self.api.records_dir {
            if !dir.is_dir() {
                bail!("api.records_dir is not a directory: {}", dir.display());
            }
        }

        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "https://pokeapi.co/api/v2");
        assert_eq!(config.api.timeout_seconds, 30);
        assert_eq!(config.report.format, OutputFormat::Text);
        assert_eq!(config.report.badge_width, 32);
        assert_eq!(config.report.badge_height, 14);
        assert!(config.general.output.is_none());
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
output = "matchup.md"

[api]
base_url = "http://localhost:8000/api/v2"
records_dir = "saved/types"

[report]
format = "markdown"
loss_label = "Weak"
badge_width = 64
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.output, Some(PathBuf::from("matchup.md")));
        assert_eq!(config.api.base_url, "http://localhost:8000/api/v2");
        assert_eq!(config.api.timeout_seconds, 30);
        assert_eq!(config.api.records_dir, Some(PathBuf::from("saved/types")));
        assert_eq!(config.report.format, OutputFormat::Markdown);
        assert_eq!(config.report.loss_label, "Weak");
        assert_eq!(config.report.win_label, "Win");
        assert_eq!(config.report.badge_width, 64);
        assert_eq!(config.report.badge_height, 14);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[api]"));
        assert!(toml_str.contains("[report]"));

        let reparsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(reparsed.report.badge_base_url, default_badge_base_url());
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_from_dir(dir.path()).unwrap().is_none());

        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[api]\ntimeout_seconds = 5\n",
        )
        .unwrap();
        let config = Config::load_from_dir(dir.path()).unwrap().unwrap();
        assert_eq!(config.api.timeout_seconds, 5);

        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[api\n").unwrap();
        assert!(Config::load_from_dir(dir.path()).is_err());
    }

    #[test]
    fn test_validate_default_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_file_supplied_values() {
        let config: Config = toml::from_str("[api]\nbase_url = \"pokeapi.co/api/v2\"\n").unwrap();
        assert!(config.validate().is_err());

        let config: Config =
            toml::from_str("[api]\nrecords_dir = \"/nonexistent/typematchup/records\"\n").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("api.records_dir"));

        let config: Config = toml::from_str("[api]\ntimeout_seconds = 0\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_accepts_existing_records_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            api: ApiConfig {
                records_dir: Some(dir.path().to_path_buf()),
                ..ApiConfig::default()
            },
            ..Config::default()
        };
        assert!(config.validate().is_ok());
    }
}
