//! Error types for the engine crate

use thiserror::Error;

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Infrastructure-level failures that propagate to the caller. Rule
/// violations never appear here; they are data in the returned
/// [`crate::Decision`].
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    Config(#[from] guardrail_config::ConfigError),

    #[error("Audit query error: {0}")]
    Audit(#[from] guardrail_audit::AuditError),
}
