//! Property-based tests for decision aggregation.

use proptest::prelude::*;

use guardrail_common::{CheckContext, Severity};
use guardrail_config::TenantConfig;
use guardrail_engine::PolicyEngine;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("test runtime")
}

fn content_strategy() -> impl Strategy<Value = String> {
    r"[A-Za-z ]{0,60}"
}

proptest! {
    /// The aggregate verdict always agrees with the per-check results:
    /// `allowed` iff no check failed, and the overall severity is the
    /// maximum across all ran checks.
    #[test]
    fn prop_decision_aggregation_is_consistent(
        cost in 0.0f64..5.0,
        limit in 0.01f64..5.0,
        content in content_strategy(),
    ) {
        runtime().block_on(async {
            let engine = PolicyEngine::builder().build();
            let mut config = TenantConfig::new("synqra");
            config.budget.per_request_limit = limit;
            config.budget.hourly_limit = 0.0;
            config.budget.daily_limit = 0.0;
            config.budget.monthly_limit = 0.0;
            config.brand_voice.prohibited_terms = vec!["cheap".to_string()];
            engine.upsert_config(config).await.unwrap();

            let ctx = CheckContext::new("req-1", "content.generate")
                .with_cost(cost)
                .with_content(content);
            let decision = engine.evaluate("synqra", ctx).await.unwrap();

            let any_failed = decision.results.iter().any(|r| !r.passed);
            prop_assert_eq!(decision.allowed, !any_failed);

            let max_severity = decision
                .results
                .iter()
                .map(|r| r.severity)
                .max()
                .unwrap_or(Severity::Low);
            prop_assert_eq!(decision.overall_severity, max_severity);

            // One violation per failed check, none for passes.
            let failed = decision.results.iter().filter(|r| !r.passed).count();
            prop_assert_eq!(decision.violations.len(), failed);

            for result in &decision.results {
                prop_assert!(result.is_consistent());
            }
            Ok(())
        })?;
    }

    /// Denials never slip through: whenever the estimated cost exceeds
    /// the per-request limit, the engine denies regardless of content.
    #[test]
    fn prop_budget_breach_always_denies(
        excess in 0.01f64..10.0,
        content in content_strategy(),
    ) {
        runtime().block_on(async {
            let engine = PolicyEngine::builder().build();
            let mut config = TenantConfig::new("synqra");
            config.budget.per_request_limit = 1.0;
            config.budget.hourly_limit = 0.0;
            config.budget.daily_limit = 0.0;
            config.budget.monthly_limit = 0.0;
            engine.upsert_config(config).await.unwrap();

            let ctx = CheckContext::new("req-1", "content.generate")
                .with_cost(1.0 + excess)
                .with_content(content);
            let decision = engine.evaluate("synqra", ctx).await.unwrap();
            prop_assert!(!decision.allowed);
            Ok(())
        })?;
    }
}
