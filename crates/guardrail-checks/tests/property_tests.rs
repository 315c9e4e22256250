//! Property-based tests for guardrail-checks
//!
//! These tests verify correctness properties that should hold across
//! all inputs.

use std::sync::Arc;

use chrono::Utc;
use proptest::prelude::*;

use guardrail_checks::{
    BudgetChecker, Checker, InMemoryRateLimitStore, InMemorySpendTracker, PathGuard,
    RateLimitStore, RateWindows,
};
use guardrail_common::CheckContext;
use guardrail_config::TenantConfig;

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("test runtime")
}

/// Strategy for finite non-negative costs
fn cost_strategy() -> impl Strategy<Value = f64> {
    (0.0f64..10_000.0).prop_map(|c| (c * 10_000.0).round() / 10_000.0)
}

/// Strategy for path-like strings without wildcards
fn path_strategy() -> impl Strategy<Value = String> {
    r"[a-z][a-z0-9_]{0,8}(/[a-z][a-z0-9_.]{0,8}){0,3}"
}

proptest! {
    /// For any cost strictly above the per-request limit the budget
    /// check fails, and the violation quotes both values to four
    /// decimal places.
    #[test]
    fn prop_budget_over_limit_always_fails(
        limit in cost_strategy(),
        excess in 0.0001f64..100.0,
    ) {
        runtime().block_on(async {
            let mut config = TenantConfig::new("synqra");
            config.budget.per_request_limit = limit;
            config.budget.hourly_limit = 0.0;
            config.budget.daily_limit = 0.0;
            config.budget.monthly_limit = 0.0;

            let checker = BudgetChecker::new(Arc::new(InMemorySpendTracker::new()));
            let cost = limit + excess;
            let ctx = CheckContext::new("req-1", "op").with_cost(cost);

            let result = checker.evaluate(&config, &ctx, Utc::now()).await;
            prop_assert!(!result.passed);
            prop_assert!(result.violations[0].contains(&format!("{:.4}", cost)));
            prop_assert!(result.violations[0].contains(&format!("{:.4}", limit)));
            Ok(())
        })?;
    }

    /// For any cost at or below the limit (windows disabled) the budget
    /// check passes.
    #[test]
    fn prop_budget_at_or_under_limit_passes(
        limit in cost_strategy(),
        fraction in 0.0f64..=1.0,
    ) {
        runtime().block_on(async {
            let mut config = TenantConfig::new("synqra");
            config.budget.per_request_limit = limit;
            config.budget.hourly_limit = 0.0;
            config.budget.daily_limit = 0.0;
            config.budget.monthly_limit = 0.0;

            let checker = BudgetChecker::new(Arc::new(InMemorySpendTracker::new()));
            let ctx = CheckContext::new("req-1", "op").with_cost(limit * fraction);

            let result = checker.evaluate(&config, &ctx, Utc::now()).await;
            prop_assert!(result.passed);
            Ok(())
        })?;
    }

    /// `passed` always agrees with the violation list.
    #[test]
    fn prop_check_result_invariant_holds(
        limit in cost_strategy(),
        cost in cost_strategy(),
    ) {
        runtime().block_on(async {
            let mut config = TenantConfig::new("synqra");
            config.budget.per_request_limit = limit;

            let checker = BudgetChecker::new(Arc::new(InMemorySpendTracker::new()));
            let ctx = CheckContext::new("req-1", "op").with_cost(cost);

            let result = checker.evaluate(&config, &ctx, Utc::now()).await;
            prop_assert!(result.is_consistent());
            Ok(())
        })?;
    }

    /// For any burst size, the sliding window admits at most the
    /// ceiling within one minute.
    #[test]
    fn prop_window_never_over_admits(
        ceiling in 1u32..50,
        burst in 1usize..120,
    ) {
        runtime().block_on(async {
            let store = InMemoryRateLimitStore::new();
            let windows = RateWindows {
                per_minute: ceiling,
                per_hour: 10_000,
                per_day: None,
            };
            let now = Utc::now();

            let mut admitted = 0;
            for _ in 0..burst {
                if store.admit("synqra", "user-1", now, &windows).await.unwrap().admitted {
                    admitted += 1;
                }
            }
            prop_assert_eq!(admitted, burst.min(ceiling as usize));
            Ok(())
        })?;
    }

    /// Glob matching is deterministic: the same pattern and path always
    /// produce the same answer.
    #[test]
    fn prop_glob_matching_deterministic(path in path_strategy()) {
        let guard = PathGuard::new();
        let patterns = vec!["**/.env*".to_string(), "secrets/**".to_string()];

        let first = guard.matching_patterns(&patterns, &path);
        let second = guard.matching_patterns(&patterns, &path);
        prop_assert_eq!(first, second);
    }

    /// Patterns are anchored: a literal pattern matches only itself.
    #[test]
    fn prop_glob_literal_patterns_match_exactly(
        path in path_strategy(),
        other in path_strategy(),
    ) {
        let guard = PathGuard::new();
        let patterns = vec![path.clone()];

        prop_assert_eq!(guard.matching_patterns(&patterns, &path).len(), 1);
        if other != path {
            prop_assert!(guard.matching_patterns(&patterns, &other).is_empty());
        }
    }
}
