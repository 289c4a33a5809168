//! Configuration loading and resolution
//!
//! Settings are resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (handled by clap `env` attributes in the binary)
//! 3. TOML config file
//! 4. Built-in default (fallback)
//!
//! The binary gathers tiers 1 and 2 into a [`ConfigOverrides`] and merges it
//! over the TOML file with [`ServiceConfig::resolve`].

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Application directory name under the platform config/data directories
pub const APP_DIR_NAME: &str = "songlib";

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 8080;

/// Default bind host
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default external song-info endpoint
pub const DEFAULT_EXTERNAL_API_URL: &str = "http://localhost:8081/info";

/// Bootstrap configuration loaded from TOML file
///
/// Every field is optional so that a partial file only overrides what it names.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// HTTP server port
    #[serde(default)]
    pub port: Option<u16>,

    /// HTTP bind host
    #[serde(default)]
    pub host: Option<String>,

    /// Path to SQLite database file
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Full URL of the external song-info endpoint (query string is appended)
    #[serde(default)]
    pub external_api_url: Option<String>,

    /// Optional timeout for enrichment requests, in seconds
    #[serde(default)]
    pub external_api_timeout_secs: Option<u64>,

    /// Logging configuration
    #[serde(default)]
    pub logging: TomlLogging,
}

/// `[logging]` table of the TOML file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlLogging {
    pub level: Option<String>,
    pub format: Option<String>,
}

/// Resolved logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines with timestamps
    Text,
    /// One JSON object per event
    Json,
}

impl LogFormat {
    /// Parse a format name; anything other than "json" selects text output
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }
}

/// Values supplied on the command line or through environment variables
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub port: Option<u16>,
    pub host: Option<String>,
    pub database_path: Option<PathBuf>,
    pub external_api_url: Option<String>,
    pub log_level: Option<String>,
    pub log_format: Option<String>,
}

/// Fully resolved service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub external_api_url: String,
    pub external_api_timeout_secs: Option<u64>,
    pub logging: LoggingConfig,
}

impl ServiceConfig {
    /// Merge command-line/environment overrides over the TOML file and defaults
    pub fn resolve(overrides: ConfigOverrides, toml: TomlConfig) -> Self {
        let defaults = LoggingConfig::default();

        let level = overrides
            .log_level
            .or(toml.logging.level)
            .unwrap_or(defaults.level);
        let format = overrides
            .log_format
            .or(toml.logging.format)
            .map(|f| LogFormat::from_name(&f))
            .unwrap_or(defaults.format);

        Self {
            host: overrides
                .host
                .or(toml.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: overrides.port.or(toml.port).unwrap_or(DEFAULT_PORT),
            database_path: overrides
                .database_path
                .or(toml.database_path)
                .unwrap_or_else(default_database_path),
            external_api_url: overrides
                .external_api_url
                .or(toml.external_api_url)
                .unwrap_or_else(|| DEFAULT_EXTERNAL_API_URL.to_string()),
            external_api_timeout_secs: toml.external_api_timeout_secs,
            logging: LoggingConfig { level, format },
        }
    }

    /// Socket address string for the HTTP listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Load the bootstrap TOML file
///
/// With an explicit path the file must exist. Without one, the platform
/// default location is tried and a missing file yields defaults.
pub fn load_toml_config(explicit: Option<&Path>) -> Result<TomlConfig> {
    let path = match explicit {
        Some(path) => {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            path.to_path_buf()
        }
        None => match default_config_path() {
            Some(path) if path.exists() => path,
            _ => {
                warn!("No config file found, using built-in defaults");
                return Ok(TomlConfig::default());
            }
        },
    };

    let content = std::fs::read_to_string(&path)?;
    let config = parse_toml_config(&content)
        .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
    info!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Parse TOML text into a [`TomlConfig`]
pub fn parse_toml_config(content: &str) -> std::result::Result<TomlConfig, toml::de::Error> {
    toml::from_str(content)
}

/// Platform config file location, e.g. `~/.config/songlib/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join("config.toml"))
}

/// Platform database location, e.g. `~/.local/share/songlib/songs.db`
pub fn default_database_path() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join(APP_DIR_NAME).join("songs.db"))
        .unwrap_or_else(|| PathBuf::from("./songlib_data/songs.db"))
}
