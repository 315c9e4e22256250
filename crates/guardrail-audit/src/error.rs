//! Error types for the audit crate

use thiserror::Error;

/// Result type for audit operations
pub type AuditResult<T> = Result<T, AuditError>;

/// Errors raised by audit persistence
#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Failed to persist violation: {message}")]
    Storage { message: String },

    #[error("Failed to serialize violation: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
