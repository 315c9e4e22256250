//! The policy engine orchestrator

use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use tracing::{debug, warn};
use uuid::Uuid;

use guardrail_audit::{AuditStore, InMemoryAuditStore, Violation, ViolationQuery};
use guardrail_checks::{
    BrandVoiceChecker, BudgetChecker, Checker, ContentSafetyChecker, InMemoryRateLimitStore,
    InMemorySpendTracker, IsolationChecker, PrivacyChecker, RateLimitChecker, RateLimitStore,
    SpendTracker,
};
use guardrail_common::{CheckContext, Severity};
use guardrail_config::{
    InMemoryConfigStore, TenantConfig, TenantConfigPatch, TenantConfigProvider,
};

use crate::decision::{Decision, QuickVerdict};
use crate::error::EngineResult;

/// The decision gate. Holds no per-request state; the only shared
/// mutable state lives behind the injected stores (rate-limit windows,
/// cumulative spend, audit trail).
pub struct PolicyEngine {
    configs: Arc<dyn TenantConfigProvider>,
    audit: Arc<dyn AuditStore>,
    spend: Arc<dyn SpendTracker>,
    checkers: Vec<Arc<dyn Checker>>,
}

/// Optional fields for [`PolicyEngine::quick_check`]
#[derive(Debug, Clone, Default)]
pub struct QuickCheckParams {
    pub caller_identity: Option<String>,
    pub estimated_cost: Option<f64>,
    pub content: Option<String>,
}

impl PolicyEngine {
    /// Start building an engine
    pub fn builder() -> PolicyEngineBuilder {
        PolicyEngineBuilder::new()
    }

    /// Evaluate an operation for a tenant. Configuration problems are
    /// the only hard errors; every rule outcome is data in the
    /// [`Decision`].
    pub async fn evaluate(&self, tenant: &str, ctx: CheckContext) -> EngineResult<Decision> {
        self.evaluate_at(tenant, ctx, Utc::now()).await
    }

    /// Evaluate against an injected clock. Production callers use
    /// [`PolicyEngine::evaluate`]; tests drive the rolling windows with
    /// simulated time.
    pub async fn evaluate_at(
        &self,
        tenant: &str,
        ctx: CheckContext,
        now: DateTime<Utc>,
    ) -> EngineResult<Decision> {
        let config = self.configs.get_config(tenant).await?;
        self.evaluate_config(&config, ctx, now).await
    }

    /// Evaluate with a per-call configuration override. The patch is
    /// merged over the stored config (override wins) and validated; the
    /// stored config itself is untouched.
    pub async fn evaluate_with_overrides(
        &self,
        tenant: &str,
        ctx: CheckContext,
        overrides: TenantConfigPatch,
    ) -> EngineResult<Decision> {
        let base = self.configs.get_config(tenant).await?;
        let merged = overrides.apply(&base);
        merged.validate()?;
        self.evaluate_config(&merged, ctx, Utc::now()).await
    }

    async fn evaluate_config(
        &self,
        config: &TenantConfig,
        ctx: CheckContext,
        now: DateTime<Utc>,
    ) -> EngineResult<Decision> {
        if !config.enabled {
            debug!(tenant = %config.tenant_id, "tenant enforcement disabled, allowing");
            return Ok(Decision {
                allowed: true,
                overall_severity: Severity::Low,
                results: Vec::new(),
                violations: Vec::new(),
            });
        }

        // The checks are independent of one another; run the applicable
        // ones concurrently. Per-identity admission order is serialized
        // inside the rate-limit store, not here.
        let applicable = self.checkers.iter().filter(|c| c.applies_to(&ctx));
        let results = join_all(applicable.map(|c| c.evaluate(config, &ctx, now))).await;

        let allowed = results.iter().all(|r| r.passed);
        let overall_severity = results
            .iter()
            .map(|r| r.severity)
            .max()
            .unwrap_or(Severity::Low);

        let mut violations = Vec::new();
        for result in results.iter().filter(|r| !r.passed) {
            let violation = Violation::from_check(
                config.tenant_id.as_str(),
                result,
                ctx.caller_identity.clone(),
                Some(ctx.request_id.clone()),
            );
            // Audit persistence never blocks the decision; the denial
            // stands even when the trail is unreachable.
            if let Err(e) = self.audit.append(&violation).await {
                warn!(
                    tenant = %config.tenant_id,
                    category = %violation.category,
                    error = %e,
                    "failed to append violation to audit trail"
                );
            }
            violations.push(violation);
        }

        if allowed {
            if let Some(cost) = ctx.estimated_cost {
                // Recording feeds the rolling budget windows. A failed
                // write is logged; the next budget read fails closed.
                if let Err(e) = self.spend.record(&config.tenant_id, cost, now).await {
                    warn!(tenant = %config.tenant_id, error = %e, "failed to record spend");
                }
            }
        } else {
            debug!(
                tenant = %config.tenant_id,
                request = %ctx.request_id,
                severity = %overall_severity,
                violations = violations.len(),
                "operation denied"
            );
        }

        Ok(Decision {
            allowed,
            overall_severity,
            results,
            violations,
        })
    }

    /// Flattened allow/deny for call sites that don't need the full
    /// decision structure
    pub async fn quick_check(
        &self,
        tenant: &str,
        operation: &str,
        params: QuickCheckParams,
    ) -> EngineResult<QuickVerdict> {
        let mut ctx = CheckContext::new(Uuid::new_v4().to_string(), operation);
        ctx.caller_identity = params.caller_identity;
        ctx.estimated_cost = params.estimated_cost;
        ctx.content = params.content;

        let decision = self.evaluate(tenant, ctx).await?;
        Ok(QuickVerdict {
            allowed: decision.allowed,
            reason: decision.reason(),
        })
    }

    /// Read the audit trail
    pub async fn violations(&self, query: ViolationQuery) -> EngineResult<Vec<Violation>> {
        Ok(self.audit.query(&query).await?)
    }

    /// Fetch a tenant's configuration
    pub async fn get_config(&self, tenant: &str) -> EngineResult<TenantConfig> {
        Ok(self.configs.get_config(tenant).await?)
    }

    /// Register or replace a tenant's configuration
    pub async fn upsert_config(&self, config: TenantConfig) -> EngineResult<()> {
        Ok(self.configs.upsert_config(config).await?)
    }

    /// Merge a patch into a tenant's stored configuration
    pub async fn update_config(
        &self,
        tenant: &str,
        patch: TenantConfigPatch,
    ) -> EngineResult<TenantConfig> {
        Ok(self.configs.update_config(tenant, patch).await?)
    }
}

/// Builds a [`PolicyEngine`], defaulting every store to its in-memory
/// implementation. Scaled deployments inject shared backends here; the
/// defaults suit single-instance deployments and tests.
pub struct PolicyEngineBuilder {
    configs: Option<Arc<dyn TenantConfigProvider>>,
    audit: Option<Arc<dyn AuditStore>>,
    spend: Option<Arc<dyn SpendTracker>>,
    rate_store: Option<Arc<dyn RateLimitStore>>,
    extra_checkers: Vec<Arc<dyn Checker>>,
}

impl PolicyEngineBuilder {
    pub fn new() -> Self {
        Self {
            configs: None,
            audit: None,
            spend: None,
            rate_store: None,
            extra_checkers: Vec::new(),
        }
    }

    /// Use a custom tenant configuration provider
    pub fn with_config_provider(mut self, provider: Arc<dyn TenantConfigProvider>) -> Self {
        self.configs = Some(provider);
        self
    }

    /// Use a custom audit store
    pub fn with_audit_store(mut self, store: Arc<dyn AuditStore>) -> Self {
        self.audit = Some(store);
        self
    }

    /// Use a custom spend tracker
    pub fn with_spend_tracker(mut self, tracker: Arc<dyn SpendTracker>) -> Self {
        self.spend = Some(tracker);
        self
    }

    /// Use a custom rate-limit store
    pub fn with_rate_limit_store(mut self, store: Arc<dyn RateLimitStore>) -> Self {
        self.rate_store = Some(store);
        self
    }

    /// Register an additional checker beyond the standard six
    pub fn with_checker(mut self, checker: Arc<dyn Checker>) -> Self {
        self.extra_checkers.push(checker);
        self
    }

    /// Assemble the engine
    pub fn build(self) -> PolicyEngine {
        let configs = self
            .configs
            .unwrap_or_else(|| Arc::new(InMemoryConfigStore::new()));
        let audit = self
            .audit
            .unwrap_or_else(|| Arc::new(InMemoryAuditStore::new()));
        let spend = self
            .spend
            .unwrap_or_else(|| Arc::new(InMemorySpendTracker::new()));
        let rate_store = self
            .rate_store
            .unwrap_or_else(|| Arc::new(InMemoryRateLimitStore::new()));

        let mut checkers: Vec<Arc<dyn Checker>> = vec![
            Arc::new(BudgetChecker::new(spend.clone())),
            Arc::new(RateLimitChecker::new(rate_store)),
            Arc::new(ContentSafetyChecker::new()),
            Arc::new(BrandVoiceChecker::new()),
            Arc::new(PrivacyChecker::new()),
            Arc::new(IsolationChecker::new()),
        ];
        checkers.extend(self.extra_checkers);

        PolicyEngine {
            configs,
            audit,
            spend,
            checkers,
        }
    }
}

impl Default for PolicyEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
