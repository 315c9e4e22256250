//! Tenant isolation boundaries
//!
//! Two checks: cross-tenant target references, and resource paths
//! matched against the tenant's protected glob patterns. Isolation is
//! always applicable since every gated operation names itself.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use guardrail_common::{CheckCategory, CheckContext, CheckResult, Severity};
use guardrail_config::TenantConfig;

use crate::checker::{escalate, Checker};
use crate::path_guard::PathGuard;

/// Checker for tenant boundaries
pub struct IsolationChecker {
    paths: PathGuard,
}

const INTRINSIC_SEVERITY: Severity = Severity::Critical;

impl IsolationChecker {
    pub fn new() -> Self {
        Self {
            paths: PathGuard::new(),
        }
    }
}

impl Default for IsolationChecker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Checker for IsolationChecker {
    fn category(&self) -> CheckCategory {
        CheckCategory::Isolation
    }

    fn applies_to(&self, _ctx: &CheckContext) -> bool {
        // The operation name is always present.
        true
    }

    async fn evaluate(
        &self,
        config: &TenantConfig,
        ctx: &CheckContext,
        now: DateTime<Utc>,
    ) -> CheckResult {
        if !config.isolation.enabled {
            return CheckResult::pass(self.category(), "isolation checks disabled").at(now);
        }

        let rules = &config.isolation;
        let mut violations = Vec::new();

        if rules.prevent_cross_tenant {
            if let Some(target) = ctx.target_tenant.as_deref() {
                if target != config.tenant_id {
                    violations.push(format!(
                        "operation '{}' targets tenant '{}' while running under tenant '{}'",
                        ctx.operation, target, config.tenant_id
                    ));
                }
            }
        }

        if let Some(path) = ctx.resource_path.as_deref() {
            for pattern in self.paths.matching_patterns(&rules.protected_paths, path) {
                violations.push(format!(
                    "path '{}' matches protected pattern '{}'",
                    path, pattern
                ));
            }
        }

        if violations.is_empty() {
            return CheckResult::pass(self.category(), "no isolation boundary violations").at(now);
        }

        CheckResult::fail(
            self.category(),
            escalate(INTRINSIC_SEVERITY, config),
            format!("{} isolation violation(s)", violations.len()),
            violations,
        )
        .with_recommendations(vec![
            "scope the operation to resources owned by the current tenant".to_string(),
        ])
        .at(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_paths() -> TenantConfig {
        let mut config = TenantConfig::new("synqra");
        config.isolation.protected_paths =
            vec!["**/.env*".to_string(), "secrets/**".to_string()];
        config
    }

    #[tokio::test]
    async fn test_cross_tenant_target_names_both_tenants() {
        let checker = IsolationChecker::new();
        let ctx = CheckContext::new("req-1", "asset.read").with_target_tenant("aurafx");

        let result = checker
            .evaluate(&config_with_paths(), &ctx, Utc::now())
            .await;
        assert!(!result.passed);
        assert_eq!(result.severity, Severity::Critical);
        assert!(result.violations[0].contains("synqra"));
        assert!(result.violations[0].contains("aurafx"));
    }

    #[tokio::test]
    async fn test_same_tenant_target_passes() {
        let checker = IsolationChecker::new();
        let ctx = CheckContext::new("req-1", "asset.read").with_target_tenant("synqra");

        let result = checker
            .evaluate(&config_with_paths(), &ctx, Utc::now())
            .await;
        assert!(result.passed);
    }

    #[tokio::test]
    async fn test_cross_tenant_allowed_when_prevention_disabled() {
        let checker = IsolationChecker::new();
        let mut config = config_with_paths();
        config.isolation.prevent_cross_tenant = false;
        let ctx = CheckContext::new("req-1", "asset.read").with_target_tenant("aurafx");

        let result = checker.evaluate(&config, &ctx, Utc::now()).await;
        assert!(result.passed);
    }

    #[tokio::test]
    async fn test_protected_path_is_rejected_naming_the_path() {
        let checker = IsolationChecker::new();
        let ctx = CheckContext::new("req-1", "file.write").with_resource_path(".env.production");

        let result = checker
            .evaluate(&config_with_paths(), &ctx, Utc::now())
            .await;
        assert!(!result.passed);
        assert!(result.violations[0].contains(".env.production"));
        assert!(result.violations[0].contains("**/.env*"));
    }

    #[tokio::test]
    async fn test_unprotected_path_passes() {
        let checker = IsolationChecker::new();
        let ctx = CheckContext::new("req-1", "file.write").with_resource_path("src/app/page.tsx");

        let result = checker
            .evaluate(&config_with_paths(), &ctx, Utc::now())
            .await;
        assert!(result.passed);
    }

    #[tokio::test]
    async fn test_both_boundary_checks_accumulate() {
        let checker = IsolationChecker::new();
        let ctx = CheckContext::new("req-1", "file.write")
            .with_target_tenant("aurafx")
            .with_resource_path("secrets/api.pem");

        let result = checker
            .evaluate(&config_with_paths(), &ctx, Utc::now())
            .await;
        assert_eq!(result.violations.len(), 2);
    }

    #[tokio::test]
    async fn test_applies_without_any_hints() {
        let checker = IsolationChecker::new();
        let ctx = CheckContext::new("req-1", "content.generate");
        assert!(checker.applies_to(&ctx));

        let result = checker
            .evaluate(&config_with_paths(), &ctx, Utc::now())
            .await;
        assert!(result.passed);
    }
}
