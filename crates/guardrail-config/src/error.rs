//! Error types for the configuration crate

use thiserror::Error;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised by configuration loading, validation, and lookup
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No configuration registered for tenant '{tenant}'")]
    TenantNotFound { tenant: String },

    #[error("Invalid configuration for tenant '{tenant}': {message}")]
    Validation { tenant: String, message: String },

    #[error("Invalid protected path pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Failed to serialize configuration: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
