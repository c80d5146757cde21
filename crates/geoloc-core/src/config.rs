use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL_ZIP: &str = "http://api.openweathermap.org/geo/1.0/zip";
pub const DEFAULT_BASE_URL_DIRECT: &str = "http://api.openweathermap.org/geo/1.0/direct";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Environment variable that overrides the API key from the config file.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

const APP_DIR: &str = "geoloc";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a single-line message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Geolocation utility settings.
///
/// Keys may be written in lower snake case or in the upper-case form used
/// by older config files (`OPENWEATHER_API_KEY`, `BASE_URL_ZIP`, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// OpenWeather API key (required)
    #[serde(alias = "OPENWEATHER_API_KEY")]
    pub openweather_api_key: String,

    /// Base URL of the postal-code geocoding endpoint
    #[serde(alias = "BASE_URL_ZIP", default = "default_base_url_zip")]
    pub base_url_zip: String,

    /// Base URL of the direct (city/state) geocoding endpoint
    #[serde(alias = "BASE_URL_DIRECT", default = "default_base_url_direct")]
    pub base_url_direct: String,

    /// Location of the JSON response cache
    #[serde(default = "default_cache_path")]
    pub cache_path: PathBuf,

    /// HTTP request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` takes precedence
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Append log events to this file; `""` or `"-"` logs to stderr instead
    #[serde(default = "default_log_file")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

fn default_base_url_zip() -> String {
    DEFAULT_BASE_URL_ZIP.to_string()
}

fn default_base_url_direct() -> String {
    DEFAULT_BASE_URL_DIRECT.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_log_level() -> String {
    "info".to_string()
}

fn app_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

fn default_cache_path() -> PathBuf {
    app_dir().join("cache.json")
}

fn default_log_file() -> Option<PathBuf> {
    Some(app_dir().join("logs").join("geoloc.log"))
}

impl Config {
    /// Build a config in code with default URLs and paths.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            openweather_api_key: api_key.into(),
            base_url_zip: default_base_url_zip(),
            base_url_direct: default_base_url_direct(),
            cache_path: default_cache_path(),
            request_timeout_secs: default_request_timeout_secs(),
            logging: LoggingConfig::default(),
        }
    }

    /// Default location of the config file
    pub fn default_path() -> PathBuf {
        app_dir().join("config.toml")
    }

    /// Load configuration from `explicit`, or from the default path.
    ///
    /// A missing file is an error: there is no usable default API key.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load_from(path),
            None => Self::load_from(&Self::default_path()),
        }
    }

    /// Load configuration from a TOML file, then apply the environment override.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::NotFound(path.display().to_string()),
            _ => ConfigError::Invalid(format!("{}: {}", path.display(), e)),
        })?;

        let mut config = Self::parse(&contents)?;
        config.apply_env_override(std::env::var(API_KEY_ENV).ok());

        if config.openweather_api_key.trim().is_empty() {
            return Err(ConfigError::MissingSetting("openweather_api_key".to_string()));
        }

        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse configuration from TOML text.
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    fn apply_env_override(&mut self, api_key: Option<String>) {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            tracing::debug!("Using API key from {}", API_KEY_ENV);
            self.openweather_api_key = key;
        }
    }

    /// Load configuration and validate it
    ///
    /// Returns an error if validation fails. Warnings are returned rather than
    /// logged, since logging is configured from the loaded config.
    pub fn load_validated(explicit: Option<&Path>) -> Result<(Self, ValidationResult)> {
        let config = Self::load(explicit)?;
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()).into());
        }

        Ok((config, validation))
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        let key = self.openweather_api_key.trim();
        if key.is_empty() {
            result.add_error("openweather_api_key", "API key must not be empty");
        } else if key.starts_with("YOUR_") {
            result.add_warning(
                "openweather_api_key",
                "API key looks like a placeholder - requests will be rejected",
            );
        }

        self.validate_url(&self.base_url_zip, "base_url_zip", &mut result);
        self.validate_url(&self.base_url_direct, "base_url_direct", &mut result);

        if self.request_timeout_secs == 0 {
            result.add_error("request_timeout_secs", "Timeout must be greater than 0");
        } else if self.request_timeout_secs > 120 {
            result.add_warning(
                "request_timeout_secs",
                "Timeout is unusually long (>120 seconds)",
            );
        }

        result
    }

    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }
}
