//! Check results

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::category::CheckCategory;
use crate::severity::Severity;

/// Outcome of a single category's evaluation.
///
/// Invariant: `passed == violations.is_empty()`. The constructors
/// enforce it; deserialized results should be treated as untrusted
/// until [`CheckResult::is_consistent`] has been checked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    /// Whether the category passed
    pub passed: bool,
    /// Category this result belongs to
    pub category: CheckCategory,
    /// Computed severity for this result
    pub severity: Severity,
    /// Human-readable summary
    pub message: String,
    /// One entry per detected violation
    pub violations: Vec<String>,
    /// Self-correction guidance for the caller
    pub recommendations: Vec<String>,
    /// When the check ran
    pub timestamp: DateTime<Utc>,
    /// Free-form metadata echo (counts, matched detectors, ...)
    pub metadata: HashMap<String, serde_json::Value>,
}

impl CheckResult {
    /// A passing result at the lowest severity tier.
    pub fn pass(category: CheckCategory, message: impl Into<String>) -> Self {
        Self {
            passed: true,
            category,
            severity: Severity::Low,
            message: message.into(),
            violations: Vec::new(),
            recommendations: Vec::new(),
            timestamp: Utc::now(),
            metadata: HashMap::new(),
        }
    }

    /// A failing result carrying at least one violation.
    ///
    /// An empty `violations` list is a caller bug; the result is
    /// normalized to carry the message as its single violation so the
    /// invariant holds either way.
    pub fn fail(
        category: CheckCategory,
        severity: Severity,
        message: impl Into<String>,
        violations: Vec<String>,
    ) -> Self {
        let message = message.into();
        let violations = if violations.is_empty() {
            vec![message.clone()]
        } else {
            violations
        };
        Self {
            passed: false,
            category,
            severity,
            message,
            violations,
            recommendations: Vec::new(),
            timestamp: Utc::now(),
            metadata: HashMap::new(),
        }
    }

    /// Attach remediation suggestions
    pub fn with_recommendations(mut self, recommendations: Vec<String>) -> Self {
        self.recommendations = recommendations;
        self
    }

    /// Insert a metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Pin the timestamp (used by checkers that evaluate against an
    /// injected clock)
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// True when the pass flag agrees with the violation list
    pub fn is_consistent(&self) -> bool {
        self.passed == self.violations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_has_no_violations() {
        let result = CheckResult::pass(CheckCategory::Budget, "within budget");
        assert!(result.passed);
        assert!(result.violations.is_empty());
        assert_eq!(result.severity, Severity::Low);
        assert!(result.is_consistent());
    }

    #[test]
    fn test_fail_carries_violations() {
        let result = CheckResult::fail(
            CheckCategory::ContentSafety,
            Severity::Critical,
            "2 content safety violations",
            vec!["ssn detected".into(), "email detected".into()],
        );
        assert!(!result.passed);
        assert_eq!(result.violations.len(), 2);
        assert!(result.is_consistent());
    }

    #[test]
    fn test_fail_with_empty_list_is_normalized() {
        let result = CheckResult::fail(
            CheckCategory::Privacy,
            Severity::High,
            "consent missing",
            Vec::new(),
        );
        assert!(!result.passed);
        assert_eq!(result.violations, vec!["consent missing".to_string()]);
        assert!(result.is_consistent());
    }
}
