//! Multi-tenant guardrail decision gate
//!
//! Every cost-incurring or content-producing operation passes through
//! [`PolicyEngine::evaluate`] before executing. Six rule categories are
//! checked against the tenant's configuration, aggregated into a single
//! allow/deny [`Decision`] with an overall severity, and every failed
//! category is appended to the audit trail.
//!
//! The engine is a library-level gate, not a network service. A caller
//! mapping decisions onto HTTP should treat a denial as a 403 with the
//! decision's violation list as the body.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use guardrail_engine::{PolicyEngine, PolicyEngineBuilder};
//! use guardrail_common::CheckContext;
//! use guardrail_config::TenantConfig;
//!
//! let engine = PolicyEngineBuilder::new().build();
//! engine.upsert_config(TenantConfig::new("synqra")).await?;
//!
//! let ctx = CheckContext::new("req-42", "content.generate")
//!     .with_caller("user-7")
//!     .with_cost(0.25)
//!     .with_content("Draft copy for the launch page");
//! let decision = engine.evaluate("synqra", ctx).await?;
//! if !decision.allowed {
//!     // surface decision.violations to the caller
//! }
//! ```

pub mod decision;
pub mod engine;
pub mod error;
pub mod middleware;

pub use decision::{Decision, QuickVerdict};
pub use engine::{PolicyEngine, PolicyEngineBuilder, QuickCheckParams};
pub use error::{EngineError, EngineResult};
pub use middleware::{GateOutcome, GateRejection, PolicyGate};
