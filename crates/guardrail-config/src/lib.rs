//! Tenant rule configuration for the Guardrail engine
//!
//! Supplies the immutable per-tenant rule sets the checkers evaluate
//! against: budget ceilings, rate thresholds, vocabulary lists, privacy
//! windows, and protected path patterns. Configuration is validated at
//! load time so malformed rules surface as [`ConfigError`]s here, never
//! inside a check.

pub mod error;
pub mod loader;
pub mod patch;
pub mod provider;
pub mod types;

pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;
pub use patch::TenantConfigPatch;
pub use provider::{InMemoryConfigStore, TenantConfigProvider};
pub use types::{
    BrandVoiceRules, BudgetRules, ContentSafetyRules, IsolationRules, PrivacyRules,
    RateLimitRules, TenantConfig,
};
