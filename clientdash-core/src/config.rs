//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/clientdash/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/clientdash/` (~/.config/clientdash/)
//! - State/Logs: `$XDG_STATE_HOME/clientdash/` (~/.local/state/clientdash/)

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Spreadsheet export used when no `[sheet] url` is configured.
pub const DEFAULT_SHEET_URL: &str = "https://docs.google.com/spreadsheets/d/1MECiOFwIAVeo73EJbatTHL0VJptR4qhiPQgMxUiVfQw/export?format=csv";

/// Chat webhook used when no `[chat] webhook_url` is configured.
pub const DEFAULT_WEBHOOK_URL: &str =
    "https://toyoureternity.app.n8n.cloud/webhook/a233a074-4789-4a88-8c04-c45632b53895";

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    /// Spreadsheet export source
    #[serde(default)]
    pub sheet: SheetConfig,

    /// Chat webhook settings
    #[serde(default)]
    pub chat: ChatConfig,

    /// Dashboard presentation settings
    #[serde(default)]
    pub display: DisplayConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Spreadsheet export configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SheetConfig {
    /// CSV export URL
    #[serde(default = "default_sheet_url")]
    pub url: String,

    /// HTTP request timeout in seconds. Transport default when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            url: default_sheet_url(),
            timeout_secs: None,
        }
    }
}

impl SheetConfig {
    /// Explicit request timeout, if configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(|secs| Duration::from_secs(secs.max(1)))
    }

    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        validate_http_url("sheet.url", &self.url)
    }
}

fn default_sheet_url() -> String {
    DEFAULT_SHEET_URL.to_string()
}

/// Chat webhook configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChatConfig {
    /// Webhook endpoint receiving `{ message, timestamp }` posts
    #[serde(default = "default_webhook_url")]
    pub webhook_url: String,

    /// HTTP request timeout in seconds. Transport default when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            webhook_url: default_webhook_url(),
            timeout_secs: None,
        }
    }
}

impl ChatConfig {
    /// Explicit request timeout, if configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(|secs| Duration::from_secs(secs.max(1)))
    }

    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        validate_http_url("chat.webhook_url", &self.webhook_url)
    }
}

fn default_webhook_url() -> String {
    DEFAULT_WEBHOOK_URL.to_string()
}

/// Dashboard presentation configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DisplayConfig {
    /// Symbol prefixed to money amounts
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,

    /// Seconds between automatic refreshes (0 disables)
    #[serde(default)]
    pub refresh_interval_secs: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_symbol: default_currency_symbol(),
            refresh_interval_secs: 0,
        }
    }
}

impl DisplayConfig {
    /// Automatic refresh interval, if enabled
    pub fn refresh_interval(&self) -> Option<Duration> {
        match self.refresh_interval_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

fn default_currency_symbol() -> String {
    "₹".to_string()
}

/// Logging configuration
#[derive(Debug, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn validate_http_url(key: &str, url: &str) -> Result<()> {
    let url = url.trim();
    if url.is_empty() {
        return Err(Error::Config(format!("{} must not be empty", key)));
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(Error::Config(format!(
            "{} must be an http(s) URL, got {:?}",
            key, url
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate every section
    pub fn validate(&self) -> Result<()> {
        self.sheet.validate()?;
        self.chat.validate()?;
        Ok(())
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/clientdash/config.toml` (~/.config/clientdash/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("clientdash").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/clientdash/` (~/.local/state/clientdash/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("clientdash")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/clientdash/clientdash.log` (~/.local/state/clientdash/clientdash.log).
    /// Daily rotation appends the date to this name.
    pub fn log_path() -> PathBuf {
        Self::state_dir().join(crate::logging::LOG_FILE_NAME)
    }

    /// Ensure XDG base directory environment variables are set.
    ///
    /// This is mainly for CLI binaries that want explicit, stable path behavior
    /// before invoking other components that read these env vars.
    pub fn ensure_xdg_env() {
        let home = home_dir();

        if std::env::var("XDG_STATE_HOME").is_err() {
            std::env::set_var("XDG_STATE_HOME", home.join(".local/state"));
        }

        if std::env::var("XDG_CONFIG_HOME").is_err() {
            std::env::set_var("XDG_CONFIG_HOME", home.join(".config"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.sheet.url, DEFAULT_SHEET_URL);
        assert_eq!(config.chat.webhook_url, DEFAULT_WEBHOOK_URL);
        assert!(config.sheet.timeout().is_none());
        assert!(config.chat.timeout().is_none());
        assert_eq!(config.display.currency_symbol, "₹");
        assert!(config.display.refresh_interval().is_none());
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[sheet]
url = "https://example.com/export.csv"
timeout_secs = 10

[chat]
webhook_url = "http://localhost:5678/webhook/abc"

[display]
currency_symbol = "$"
refresh_interval_secs = 300

[logging]
level = "debug"
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.sheet.url, "https://example.com/export.csv");
        assert_eq!(config.sheet.timeout(), Some(Duration::from_secs(10)));
        assert_eq!(config.chat.webhook_url, "http://localhost:5678/webhook/abc");
        assert!(config.chat.timeout().is_none());
        assert_eq!(config.display.currency_symbol, "$");
        assert_eq!(
            config.display.refresh_interval(),
            Some(Duration::from_secs(300))
        );
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let toml = r#"
[chat]
timeout_secs = 45
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.chat.webhook_url, DEFAULT_WEBHOOK_URL);
        assert_eq!(config.chat.timeout(), Some(Duration::from_secs(45)));
        assert_eq!(config.sheet.url, DEFAULT_SHEET_URL);
    }

    #[test]
    fn test_url_validation() {
        let sheet = SheetConfig {
            url: "  ".to_string(),
            timeout_secs: None,
        };
        assert!(sheet.validate().is_err());

        let chat = ChatConfig {
            webhook_url: "ftp://example.com/hook".to_string(),
            timeout_secs: None,
        };
        assert!(chat.validate().is_err());

        let chat = ChatConfig {
            webhook_url: "https://example.com/hook".to_string(),
            timeout_secs: None,
        };
        assert!(chat.validate().is_ok());
    }

    #[test]
    fn test_load_from_rejects_invalid_url() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[sheet]\nurl = \"not a url\"\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("sheet.url"));
    }

    #[test]
    fn test_zero_timeout_is_clamped() {
        let sheet = SheetConfig {
            url: DEFAULT_SHEET_URL.to_string(),
            timeout_secs: Some(0),
        };
        assert_eq!(sheet.timeout(), Some(Duration::from_secs(1)));
    }
}
