//! Budget enforcement
//!
//! The per-request ceiling is a plain comparison. The rolling windows
//! (hourly, daily, monthly) need cumulative spend, which lives in an
//! external collaborator behind [`SpendTracker`]; when the collaborator
//! cannot answer, the check fails closed rather than silently passing.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::warn;

use guardrail_common::{CheckCategory, CheckContext, CheckResult, Severity};
use guardrail_config::TenantConfig;

use crate::checker::{escalate, Checker};
use crate::error::SpendTrackerError;

/// Cumulative spend collaborator. The engine records every admitted
/// operation's estimated cost here, so the rolling ceilings are
/// enforceable out of the box; scaled deployments implement this over a
/// shared counter service.
#[async_trait]
pub trait SpendTracker: Send + Sync {
    /// Total spend recorded for the tenant strictly after `since`
    async fn spent_since(
        &self,
        tenant: &str,
        since: DateTime<Utc>,
    ) -> Result<f64, SpendTrackerError>;

    /// Record spend for an admitted operation
    async fn record(
        &self,
        tenant: &str,
        cost: f64,
        at: DateTime<Utc>,
    ) -> Result<(), SpendTrackerError>;
}

/// Longest budget window; spend older than this is unreachable by any
/// ceiling and can be pruned.
const MONTHLY_WINDOW_DAYS: i64 = 30;

/// In-process spend ledger, one entry list per tenant
pub struct InMemorySpendTracker {
    ledgers: DashMap<String, Arc<Mutex<Vec<(DateTime<Utc>, f64)>>>>,
}

impl InMemorySpendTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self {
            ledgers: DashMap::new(),
        }
    }
}

impl Default for InMemorySpendTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpendTracker for InMemorySpendTracker {
    async fn spent_since(
        &self,
        tenant: &str,
        since: DateTime<Utc>,
    ) -> Result<f64, SpendTrackerError> {
        Ok(self
            .ledgers
            .get(tenant)
            .map(|slot| {
                slot.lock()
                    .iter()
                    .filter(|(at, _)| *at > since)
                    .map(|(_, cost)| *cost)
                    .sum()
            })
            .unwrap_or(0.0))
    }

    async fn record(
        &self,
        tenant: &str,
        cost: f64,
        at: DateTime<Utc>,
    ) -> Result<(), SpendTrackerError> {
        let slot = self
            .ledgers
            .entry(tenant.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(Vec::new())))
            .clone();
        let mut ledger = slot.lock();
        let cutoff = at - Duration::days(MONTHLY_WINDOW_DAYS);
        ledger.retain(|(ts, _)| *ts > cutoff);
        ledger.push((at, cost));
        Ok(())
    }
}

/// Checker for spend ceilings
pub struct BudgetChecker {
    tracker: Arc<dyn SpendTracker>,
}

const INTRINSIC_SEVERITY: Severity = Severity::High;

impl BudgetChecker {
    /// Create a checker over the given spend tracker
    pub fn new(tracker: Arc<dyn SpendTracker>) -> Self {
        Self { tracker }
    }
}

#[async_trait]
impl Checker for BudgetChecker {
    fn category(&self) -> CheckCategory {
        CheckCategory::Budget
    }

    fn applies_to(&self, ctx: &CheckContext) -> bool {
        ctx.estimated_cost.is_some()
    }

    async fn evaluate(
        &self,
        config: &TenantConfig,
        ctx: &CheckContext,
        now: DateTime<Utc>,
    ) -> CheckResult {
        if !config.budget.enabled {
            return CheckResult::pass(self.category(), "budget checks disabled").at(now);
        }
        let cost = match ctx.estimated_cost {
            Some(cost) => cost,
            None => return CheckResult::pass(self.category(), "no cost to check").at(now),
        };

        let rules = &config.budget;
        let mut violations = Vec::new();

        if cost > rules.per_request_limit {
            violations.push(format!(
                "estimated cost {:.4} exceeds per-request limit {:.4}",
                cost, rules.per_request_limit
            ));
        }

        // Rolling windows, shortest first; a zero limit disables the
        // window.
        let windows = [
            ("hourly", Duration::hours(1), rules.hourly_limit),
            ("daily", Duration::hours(24), rules.daily_limit),
            (
                "monthly",
                Duration::days(MONTHLY_WINDOW_DAYS),
                rules.monthly_limit,
            ),
        ];
        for (label, window, limit) in windows {
            if limit <= 0.0 {
                continue;
            }
            match self.tracker.spent_since(&config.tenant_id, now - window).await {
                Ok(spent) => {
                    if spent + cost > limit {
                        violations.push(format!(
                            "projected {} spend {:.4} exceeds limit {:.4}",
                            label,
                            spent + cost,
                            limit
                        ));
                    }
                }
                Err(e) => {
                    // Fail closed: unknown cumulative spend must not be
                    // treated as zero.
                    warn!(
                        tenant = %config.tenant_id,
                        window = label,
                        error = %e,
                        "spend tracker unavailable, failing closed"
                    );
                    violations.push(format!(
                        "cumulative spend unavailable; {} ceiling cannot be verified",
                        label
                    ));
                }
            }
        }

        if violations.is_empty() {
            return CheckResult::pass(self.category(), "within budget")
                .with_metadata("estimated_cost", serde_json::json!(cost))
                .at(now);
        }

        CheckResult::fail(
            self.category(),
            escalate(INTRINSIC_SEVERITY, config),
            format!("{} budget violation(s)", violations.len()),
            violations,
        )
        .with_recommendations(vec![
            "reduce the operation's estimated cost".to_string(),
            "raise the tenant budget ceiling or wait for the window to roll".to_string(),
        ])
        .at(now)
    }
}
