//! Property: every failed category of every evaluation appends exactly
//! one violation to the audit trail, and the trail only ever grows.

use proptest::prelude::*;

use guardrail_audit::ViolationQuery;
use guardrail_common::CheckContext;
use guardrail_config::TenantConfig;
use guardrail_engine::PolicyEngine;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("test runtime")
}

#[derive(Debug, Clone)]
struct Op {
    cost: f64,
    content: String,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    (0.0f64..2.0, r"[a-z ]{0,40}").prop_map(|(cost, content)| Op { cost, content })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_audit_trail_records_every_failed_category(
        ops in prop::collection::vec(op_strategy(), 1..12),
    ) {
        runtime().block_on(async {
            let engine = PolicyEngine::builder().build();
            let mut config = TenantConfig::new("synqra");
            config.budget.per_request_limit = 1.0;
            config.budget.hourly_limit = 0.0;
            config.budget.daily_limit = 0.0;
            config.budget.monthly_limit = 0.0;
            config.brand_voice.prohibited_terms = vec!["cheap".to_string()];
            engine.upsert_config(config).await.unwrap();

            let mut expected_total = 0usize;
            let mut trail_len_before = 0usize;

            for (i, op) in ops.iter().enumerate() {
                let ctx = CheckContext::new(format!("req-{}", i), "content.generate")
                    .with_cost(op.cost)
                    .with_content(op.content.clone());
                let decision = engine.evaluate("synqra", ctx).await.unwrap();

                let failed = decision.results.iter().filter(|r| !r.passed).count();
                prop_assert_eq!(decision.violations.len(), failed);
                expected_total += failed;

                let trail = engine
                    .violations(ViolationQuery::all().for_tenant("synqra"))
                    .await
                    .unwrap();
                // Append-only: the trail never shrinks.
                prop_assert!(trail.len() >= trail_len_before);
                trail_len_before = trail.len();
            }

            let trail = engine
                .violations(ViolationQuery::all().for_tenant("synqra"))
                .await
                .unwrap();
            prop_assert_eq!(trail.len(), expected_total);

            // Every recorded violation belongs to one of our requests.
            for violation in &trail {
                let request = violation.request_id.as_deref().unwrap_or("");
                prop_assert!(request.starts_with("req-"));
                prop_assert_eq!(violation.tenant_id.as_str(), "synqra");
            }
            Ok(())
        })?;
    }
}
