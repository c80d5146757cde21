pub mod config;
pub mod error;
pub mod logging;

pub use config::{Config, ConfigValidationError, LoggingConfig, ValidationResult};
pub use error::{AppError, ConfigError, NetworkError, ReqwestErrorExt};
pub use logging::LogTarget;
