//! Brand voice alignment
//!
//! Prohibited-term scanning and voice-attribute presence run
//! independently; their violations are unioned. Short content is never
//! penalized for lacking tone markers.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use guardrail_common::{CheckCategory, CheckContext, CheckResult, Severity};
use guardrail_config::TenantConfig;

use crate::checker::{escalate, Checker};

/// Checker for tenant vocabulary rules
pub struct BrandVoiceChecker;

const INTRINSIC_SEVERITY: Severity = Severity::Medium;

impl BrandVoiceChecker {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BrandVoiceChecker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Checker for BrandVoiceChecker {
    fn category(&self) -> CheckCategory {
        CheckCategory::BrandVoice
    }

    fn applies_to(&self, ctx: &CheckContext) -> bool {
        ctx.content.is_some()
    }

    async fn evaluate(
        &self,
        config: &TenantConfig,
        ctx: &CheckContext,
        now: DateTime<Utc>,
    ) -> CheckResult {
        if !config.brand_voice.enabled {
            return CheckResult::pass(self.category(), "brand voice checks disabled").at(now);
        }
        let content = match ctx.content.as_deref() {
            Some(content) => content,
            None => return CheckResult::pass(self.category(), "no content to scan").at(now),
        };

        let rules = &config.brand_voice;
        let lowered = content.to_lowercase();
        let mut violations = Vec::new();

        for term in &rules.prohibited_terms {
            if lowered.contains(&term.to_lowercase()) {
                violations.push(format!("prohibited term \"{}\" found in content", term));
            }
        }

        // Tone markers are only required above the length threshold.
        if content.chars().count() > rules.min_length_for_voice
            && !rules.required_attributes.is_empty()
        {
            let has_attribute = rules
                .required_attributes
                .iter()
                .any(|attr| lowered.contains(&attr.to_lowercase()));
            if !has_attribute {
                violations.push(format!(
                    "content lacks required voice attributes (expected one of: {})",
                    rules.required_attributes.join(", ")
                ));
            }
        }

        if violations.is_empty() {
            return CheckResult::pass(self.category(), "content aligns with brand voice").at(now);
        }

        CheckResult::fail(
            self.category(),
            escalate(INTRINSIC_SEVERITY, config),
            format!("{} brand voice violation(s)", violations.len()),
            violations,
        )
        .with_recommendations(vec![
            "rephrase flagged terms in the tenant's approved vocabulary".to_string(),
            "weave at least one required voice attribute into longer copy".to_string(),
        ])
        .at(now)
    }
}
