//! Shared domain types for the Guardrail policy-enforcement engine
//!
//! Every crate in the workspace speaks in terms of these types: the
//! severity ladder, the six check categories, the per-request
//! `CheckContext`, and the `CheckResult` each checker produces. Rule
//! violations are always represented as data in a `CheckResult`, never
//! as errors.

pub mod category;
pub mod context;
pub mod result;
pub mod severity;

pub use category::CheckCategory;
pub use context::CheckContext;
pub use result::CheckResult;
pub use severity::{EnforcementLevel, Severity, ViolationAction};
