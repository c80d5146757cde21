//! Logging setup.
//!
//! Called once at startup with the loaded [`LoggingConfig`]. Components take
//! their own `tracing::Span` at construction rather than looking up a shared
//! named logger.

use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Where log events are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

impl std::fmt::Display for LogTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogTarget::Stderr => write!(f, "stderr"),
            LogTarget::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Build the filter: `RUST_LOG` wins, then the configured level, then `info`.
pub fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Where `config` sends log events. No file, an empty path, or `-` means stderr.
pub fn target(config: &LoggingConfig) -> LogTarget {
    match &config.file {
        Some(path) if !path.as_os_str().is_empty() && path != Path::new("-") => {
            LogTarget::File(path.clone())
        }
        _ => LogTarget::Stderr,
    }
}

/// Install the global tracing subscriber.
pub fn init(config: &LoggingConfig) -> Result<LogTarget> {
    let filter = build_filter(&config.level);

    let target = match target(config) {
        LogTarget::File(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .context("Failed to create log directory")?;
            }

            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

            LogTarget::File(path)
        }
        LogTarget::Stderr => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

            LogTarget::Stderr
        }
    };

    tracing::info!("Logging initialized ({})", target);
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_init_creates_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("geoloc.log");
        let config = LoggingConfig {
            level: "debug".to_string(),
            file: Some(path.clone()),
        };

        let target = init(&config).unwrap();
        assert_eq!(target, LogTarget::File(path.clone()));
        assert!(path.exists());

        // A second subscriber cannot be installed in the same process
        assert!(init(&config).is_err());
    }

    #[test]
    fn test_target_from_config() {
        let parse = |logging: &str| {
            Config::parse(&format!("openweather_api_key = \"k\"\n[logging]\n{}", logging))
                .unwrap()
                .logging
        };

        assert_eq!(target(&parse(r#"file = "-""#)), LogTarget::Stderr);
        assert_eq!(target(&parse(r#"file = """#)), LogTarget::Stderr);
        assert_eq!(
            target(&parse(r#"file = "/var/log/geoloc.log""#)),
            LogTarget::File(PathBuf::from("/var/log/geoloc.log"))
        );
        assert!(matches!(target(&parse(r#"level = "debug""#)), LogTarget::File(_)));

        let mut logging = parse("");
        logging.file = None;
        assert_eq!(target(&logging), LogTarget::Stderr);
    }

    #[test]
    fn test_log_target_display() {
        assert_eq!(LogTarget::Stderr.to_string(), "stderr");
        assert_eq!(
            LogTarget::File(PathBuf::from("/tmp/geoloc.log")).to_string(),
            "/tmp/geoloc.log"
        );
    }
}
