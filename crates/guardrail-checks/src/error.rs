//! Error types for checker collaborators
//!
//! Checkers themselves never fail: rule violations are data in a
//! `CheckResult`. These errors belong to the injectable stores behind
//! the stateful checkers; a failing store degrades the affected check
//! (fail closed), it never crashes the evaluation.

use thiserror::Error;

/// Errors from a rate-limit state backend
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Rate-limit store unavailable: {message}")]
    Unavailable { message: String },
}

/// Errors from a cumulative spend backend
#[derive(Error, Debug)]
pub enum SpendTrackerError {
    #[error("Spend tracker unavailable: {message}")]
    Unavailable { message: String },
}
