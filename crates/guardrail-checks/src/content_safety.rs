//! Content safety scanning
//!
//! Two independent detector families run over free-text content: PII
//! (national id numbers, payment-card digit runs, email addresses) and
//! unsafe content (credential disclosure, inline secret tokens, payment
//! detail disclosure). Any match is a top-tier violation; absence of
//! matches is a full pass.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use guardrail_common::{CheckCategory, CheckContext, CheckResult, Severity};
use guardrail_config::TenantConfig;

use crate::checker::{escalate, Checker};

fn compile(label: &'static str, pattern: &str) -> (&'static str, Regex) {
    (
        label,
        Regex::new(pattern).expect("detector pattern must compile"),
    )
}

static PII_DETECTORS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    vec![
        compile("national id number", r"\b\d{3}-\d{2}-\d{4}\b"),
        compile("payment card number", r"\b(?:\d[ -]?){13,16}\b"),
        compile(
            "email address",
            r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b",
        ),
    ]
});

static UNSAFE_DETECTORS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    vec![
        compile(
            "credential disclosure",
            r"(?i)\b(?:password|passwd|credentials?)\b\s*(?:is\b|:|=)\s*\S+",
        ),
        compile(
            "secret token",
            r#"(?i)\b(?:api[_-]?key|secret|token)\b\s*[:=]\s*['"]?[A-Za-z0-9_\-]{16,}|\bsk-[A-Za-z0-9]{20,}\b"#,
        ),
        compile(
            "payment details disclosure",
            r"(?i)\b(?:card\s+number|cvv|cvc|iban|account\s+number)\b\s*(?:is|:|=)?\s*\d+",
        ),
    ]
});

/// Checker for PII and unsafe content
pub struct ContentSafetyChecker;

const INTRINSIC_SEVERITY: Severity = Severity::Critical;

impl ContentSafetyChecker {
    /// Create the checker (detectors are compiled once, process-wide)
    pub fn new() -> Self {
        Self
    }
}

impl Default for ContentSafetyChecker {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Checker for ContentSafetyChecker {
    fn category(&self) -> CheckCategory {
        CheckCategory::ContentSafety
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
        if !config.content_safety.enabled {
            return CheckResult::pass(self.category(), "content safety disabled").at(now);
        }
        let content = match ctx.content.as_deref() {
            Some(content) => content,
            None => return CheckResult::pass(self.category(), "no content to scan").at(now),
        };

        let mut violations = Vec::new();
        if config.content_safety.detect_pii {
            for (label, pattern) in PII_DETECTORS.iter() {
                if pattern.is_match(content) {
                    violations.push(format!("PII detected: {}", label));
                }
            }
        }
        if config.content_safety.detect_unsafe {
            for (label, pattern) in UNSAFE_DETECTORS.iter() {
                if pattern.is_match(content) {
                    violations.push(format!("unsafe content: {}", label));
                }
            }
        }

        if violations.is_empty() {
            return CheckResult::pass(self.category(), "no PII or unsafe content detected")
                .at(now);
        }

        CheckResult::fail(
            self.category(),
            escalate(INTRINSIC_SEVERITY, config),
            format!("{} content safety violation(s)", violations.len()),
            violations,
        )
        .with_recommendations(vec![
            "remove personal or sensitive data before resubmitting".to_string(),
        ])
        .at(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(content: &str) -> CheckContext {
        CheckContext::new("req-1", "content.generate").with_content(content)
    }

    #[tokio::test]
    async fn test_ssn_fails_naming_the_detector() {
        let checker = ContentSafetyChecker::new();
        let config = TenantConfig::new("synqra");

        let result = checker
            .evaluate(&config, &ctx("SSN: 123-45-6789"), Utc::now())
            .await;
        assert!(!result.passed);
        assert_eq!(result.severity, Severity::Critical);
        assert!(result
            .violations
            .iter()
            .any(|v| v.contains("national id number")));
    }

    #[tokio::test]
    async fn test_clean_content_passes() {
        let checker = ContentSafetyChecker::new();
        let config = TenantConfig::new("synqra");

        let result = checker
            .evaluate(&config, &ctx("Our roadmap for Q3"), Utc::now())
            .await;
        assert!(result.passed);
        assert_eq!(result.severity, Severity::Low);
    }

    #[tokio::test]
    async fn test_matches_across_families_accumulate() {
        let checker = ContentSafetyChecker::new();
        let config = TenantConfig::new("synqra");

        let result = checker
            .evaluate(
                &config,
                &ctx("email me at ops@example.com, the password is hunter2"),
                Utc::now(),
            )
            .await;
        assert!(!result.passed);
        assert!(result.violations.iter().any(|v| v.contains("email address")));
        assert!(result
            .violations
            .iter()
            .any(|v| v.contains("credential disclosure")));
    }

    #[tokio::test]
    async fn test_card_number_detected() {
        let checker = ContentSafetyChecker::new();
        let config = TenantConfig::new("synqra");

        let result = checker
            .evaluate(&config, &ctx("pay with 4111 1111 1111 1111 today"), Utc::now())
            .await;
        assert!(!result.passed);
        assert!(result
            .violations
            .iter()
            .any(|v| v.contains("payment card number")));
    }

    #[tokio::test]
    async fn test_secret_token_detected() {
        let checker = ContentSafetyChecker::new();
        let config = TenantConfig::new("synqra");

        let result = checker
            .evaluate(
                &config,
                &ctx("use api_key = a1b2c3d4e5f6g7h8i9j0 for staging"),
                Utc::now(),
            )
            .await;
        assert!(!result.passed);
        assert!(result.violations.iter().any(|v| v.contains("secret token")));
    }

    #[tokio::test]
    async fn test_idempotent_for_identical_input() {
        let checker = ContentSafetyChecker::new();
        let config = TenantConfig::new("synqra");
        let now = Utc::now();

        let first = checker.evaluate(&config, &ctx("SSN: 123-45-6789"), now).await;
        let second = checker.evaluate(&config, &ctx("SSN: 123-45-6789"), now).await;
        assert_eq!(first.passed, second.passed);
        assert_eq!(first.violations, second.violations);
        assert_eq!(first.severity, second.severity);
    }

    #[tokio::test]
    async fn test_disabled_family_is_skipped() {
        let checker = ContentSafetyChecker::new();
        let mut config = TenantConfig::new("synqra");
        config.content_safety.detect_pii = false;

        let result = checker
            .evaluate(&config, &ctx("SSN: 123-45-6789"), Utc::now())
            .await;
        assert!(result.passed);
    }
}
