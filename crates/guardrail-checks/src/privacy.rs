//! Privacy compliance
//!
//! Three independent rules: an explicit consent flag when tenant policy
//! requires one, a data-minimization cap on metadata volume, and a
//! retention window on recorded timestamps. Any subset can trigger;
//! metadata-only calls with no consent requirement trivially pass.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use guardrail_common::{CheckCategory, CheckContext, CheckResult, Severity};
use guardrail_config::TenantConfig;

use crate::checker::{escalate, Checker};

/// Metadata key carrying the explicit consent flag (`true` to consent)
pub const CONSENT_KEY: &str = "consent";

/// Metadata key carrying the RFC 3339 timestamp of the underlying record
pub const RECORDED_AT_KEY: &str = "recorded_at";

/// Checker for consent, minimization, and retention rules
pub struct PrivacyChecker;

const INTRINSIC_SEVERITY: Severity = Severity::High;

impl PrivacyChecker {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PrivacyChecker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Checker for PrivacyChecker {
    fn category(&self) -> CheckCategory {
        CheckCategory::Privacy
    }

    fn applies_to(&self, ctx: &CheckContext) -> bool {
        ctx.content.is_some() || !ctx.metadata.is_empty()
    }

    async fn evaluate(
        &self,
        config: &TenantConfig,
        ctx: &CheckContext,
        now: DateTime<Utc>,
    ) -> CheckResult {
        if !config.privacy.enabled {
            return CheckResult::pass(self.category(), "privacy checks disabled").at(now);
        }

        let rules = &config.privacy;
        let mut violations = Vec::new();

        // (a) Consent applies to content-bearing operations only.
        if rules.require_consent && ctx.content.is_some() && !ctx.metadata_flag(CONSENT_KEY) {
            violations.push(
                "explicit consent flag missing for content-bearing operation".to_string(),
            );
        }

        // (b) Data minimization.
        if ctx.metadata.len() > rules.max_metadata_keys {
            violations.push(format!(
                "metadata carries {} keys, exceeding the data-minimization cap of {}",
                ctx.metadata.len(),
                rules.max_metadata_keys
            ));
        }

        // (c) Retention.
        if let Some(raw) = ctx.metadata_str(RECORDED_AT_KEY) {
            match DateTime::parse_from_rfc3339(raw) {
                Ok(recorded) => {
                    let age = now.signed_duration_since(recorded.with_timezone(&Utc));
                    if age > Duration::days(rules.retention_days) {
                        violations.push(format!(
                            "recorded data is {} days old, beyond the {}-day retention window",
                            age.num_days(),
                            rules.retention_days
                        ));
                    }
                }
                Err(e) => {
                    debug!(value = raw, error = %e, "unparseable recorded_at metadata");
                }
            }
        }

        if violations.is_empty() {
            return CheckResult::pass(self.category(), "privacy requirements satisfied").at(now);
        }

        CheckResult::fail(
            self.category(),
            escalate(INTRINSIC_SEVERITY, config),
            format!("{} privacy violation(s)", violations.len()),
            violations,
        )
        .with_recommendations(vec![
            "collect an explicit consent flag before processing content".to_string(),
            "trim the metadata bag to the fields the operation needs".to_string(),
            "purge or re-consent records older than the retention window".to_string(),
        ])
        .at(now)
    }
}
