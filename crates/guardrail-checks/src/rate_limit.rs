//! Sliding-window rate limiting
//!
//! Admission is recomputed against rolling windows on every request: a
//! request is admitted only while every configured ceiling still has
//! room, and a rejected request is never recorded, so it cannot count
//! against future windows.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::warn;

use guardrail_common::{CheckCategory, CheckContext, CheckResult, Severity};
use guardrail_config::{RateLimitRules, TenantConfig};

use crate::checker::{escalate, Checker};
use crate::error::StoreError;

/// The rolling ceilings a store enforces for one admission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateWindows {
    /// Admitted requests per rolling 60 seconds
    pub per_minute: u32,
    /// Admitted requests per rolling hour
    pub per_hour: u32,
    /// Optional rolling 24-hour ceiling
    pub per_day: Option<u32>,
}

impl RateWindows {
    /// Derive the windows from a tenant's rate-limit rules
    pub fn from_rules(rules: &RateLimitRules) -> Self {
        Self {
            per_minute: rules.requests_per_minute,
            per_hour: rules.requests_per_hour,
            per_day: rules.requests_per_day,
        }
    }

    /// How far back timestamps must be retained: the longest window
    /// with a configured ceiling.
    pub fn horizon(&self) -> Duration {
        if self.per_day.is_some() {
            Duration::hours(24)
        } else {
            Duration::hours(1)
        }
    }
}

/// Counts observed at admission time, before the new request is
/// recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateAdmission {
    /// Whether the request was admitted (and its timestamp recorded)
    pub admitted: bool,
    /// Requests already inside the rolling minute
    pub last_minute: usize,
    /// Requests already inside the rolling hour
    pub last_hour: usize,
    /// Requests already inside the rolling day, when a day ceiling is set
    pub last_day: Option<usize>,
}

/// Keyed sliding-window state. The check-and-record step must be atomic
/// per (tenant, identity) key: two concurrent requests for the same
/// identity must not both be admitted when only one slot remains.
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Atomically prune, count, and (if every ceiling has room) record
    /// `now` for the given key.
    async fn admit(
        &self,
        tenant: &str,
        identity: &str,
        now: DateTime<Utc>,
        windows: &RateWindows,
    ) -> Result<RateAdmission, StoreError>;
}

/// In-process store: one timestamp list per (tenant, identity), each
/// behind its own mutex so admissions for one identity serialize in
/// arrival order while distinct identities proceed in parallel.
pub struct InMemoryRateLimitStore {
    entries: DashMap<(String, String), Arc<Mutex<Vec<DateTime<Utc>>>>>,
}

impl InMemoryRateLimitStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Number of tracked (tenant, identity) keys
    pub fn tracked_keys(&self) -> usize {
        self.entries.len()
    }
}

impl Default for InMemoryRateLimitStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RateLimitStore for InMemoryRateLimitStore {
    async fn admit(
        &self,
        tenant: &str,
        identity: &str,
        now: DateTime<Utc>,
        windows: &RateWindows,
    ) -> Result<RateAdmission, StoreError> {
        let key = (tenant.to_string(), identity.to_string());
        let slot = self
            .entries
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(Vec::new())))
            .clone();

        let mut timestamps = slot.lock();

        // The cutoff is `now - window`; entries strictly greater remain.
        let horizon_cutoff = now - windows.horizon();
        timestamps.retain(|ts| *ts > horizon_cutoff);

        let minute_cutoff = now - Duration::seconds(60);
        let hour_cutoff = now - Duration::hours(1);
        let last_minute = timestamps.iter().filter(|ts| **ts > minute_cutoff).count();
        let last_hour = timestamps.iter().filter(|ts| **ts > hour_cutoff).count();
        let last_day = windows.per_day.map(|_| timestamps.len());

        let mut admitted = last_minute < windows.per_minute as usize
            && last_hour < windows.per_hour as usize;
        if let (Some(ceiling), Some(count)) = (windows.per_day, last_day) {
            admitted = admitted && count < ceiling as usize;
        }

        if admitted {
            timestamps.push(now);
        }

        Ok(RateAdmission {
            admitted,
            last_minute,
            last_hour,
            last_day,
        })
    }
}

/// Checker wrapping a [`RateLimitStore`]
pub struct RateLimitChecker {
    store: Arc<dyn RateLimitStore>,
}

const INTRINSIC_SEVERITY: Severity = Severity::Medium;

impl RateLimitChecker {
    /// Create a checker over the given store
    pub fn new(store: Arc<dyn RateLimitStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Checker for RateLimitChecker {
    fn category(&self) -> CheckCategory {
        CheckCategory::RateLimit
    }

    fn applies_to(&self, ctx: &CheckContext) -> bool {
        ctx.caller_identity.is_some()
    }

    async fn evaluate(
        &self,
        config: &TenantConfig,
        ctx: &CheckContext,
        now: DateTime<Utc>,
    ) -> CheckResult {
        if !config.rate_limit.enabled {
            return CheckResult::pass(self.category(), "rate limiting disabled").at(now);
        }
        let identity = match ctx.caller_identity.as_deref() {
            Some(identity) => identity,
            None => {
                return CheckResult::pass(self.category(), "no caller identity to limit").at(now)
            }
        };

        let windows = RateWindows::from_rules(&config.rate_limit);
        let admission = match self
            .store
            .admit(&config.tenant_id, identity, now, &windows)
            .await
        {
            Ok(admission) => admission,
            Err(e) => {
                // Fail closed: an unreachable store must not grant
                // unbounded admission.
                warn!(
                    tenant = %config.tenant_id,
                    error = %e,
                    "rate-limit store unavailable, failing closed"
                );
                return CheckResult::fail(
                    self.category(),
                    escalate(Severity::High, config),
                    "rate-limit state unavailable",
                    vec!["rate-limit store unreachable; request refused".to_string()],
                )
                .with_recommendations(vec![
                    "retry once the rate-limit backend is reachable".to_string()
                ])
                .at(now);
            }
        };

        if admission.admitted {
            return CheckResult::pass(self.category(), "within rate limits")
                .with_metadata("last_minute", serde_json::json!(admission.last_minute + 1))
                .with_metadata("last_hour", serde_json::json!(admission.last_hour + 1))
                .at(now);
        }

        // Every breached window is its own violation.
        let mut violations = Vec::new();
        if admission.last_minute >= windows.per_minute as usize {
            violations.push(format!(
                "{} requests in the last minute (limit {})",
                admission.last_minute, windows.per_minute
            ));
        }
        if admission.last_hour >= windows.per_hour as usize {
            violations.push(format!(
                "{} requests in the last hour (limit {})",
                admission.last_hour, windows.per_hour
            ));
        }
        if let (Some(ceiling), Some(count)) = (windows.per_day, admission.last_day) {
            if count >= ceiling as usize {
                violations.push(format!(
                    "{} requests in the last day (limit {})",
                    count, ceiling
                ));
            }
        }

        CheckResult::fail(
            self.category(),
            escalate(INTRINSIC_SEVERITY, config),
            format!("rate limit exceeded for caller '{}'", identity),
            violations,
        )
        .with_recommendations(vec![
            "wait for the rolling window to free a slot before retrying".to_string(),
        ])
        .at(now)
    }
}
