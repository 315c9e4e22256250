//! The polymorphic checker unit

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use guardrail_common::{CheckCategory, CheckContext, CheckResult, Severity};
use guardrail_config::TenantConfig;

/// One rule category's evaluation unit. The orchestrator holds a
/// registry of these and runs whichever report themselves applicable to
/// the request at hand.
#[async_trait]
pub trait Checker: Send + Sync {
    /// Category this checker covers
    fn category(&self) -> CheckCategory;

    /// Whether the context carries the fields this check needs
    fn applies_to(&self, ctx: &CheckContext) -> bool;

    /// Evaluate the category against the tenant's rules. `now` is
    /// injected so stateful checks are testable with simulated time.
    async fn evaluate(
        &self,
        config: &TenantConfig,
        ctx: &CheckContext,
        now: DateTime<Utc>,
    ) -> CheckResult;
}

/// Floor a checker's intrinsic failure severity by the tenant's
/// enforcement level. The enforcement level is a default, never a cap:
/// a critical finding stays critical under soft enforcement, and a
/// medium finding escalates under critical enforcement.
pub fn escalate(intrinsic: Severity, config: &TenantConfig) -> Severity {
    intrinsic.max(config.enforcement.default_severity())
}
