//! Aggregated decisions

use serde::{Deserialize, Serialize};

use guardrail_audit::Violation;
use guardrail_common::{CheckCategory, CheckResult, Severity};

/// The outcome of one policy evaluation: every check result (passing
/// ones included, for observability), the violations recorded for the
/// failures, and the aggregate verdict.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    /// True when every evaluated check passed
    pub allowed: bool,
    /// Maximum severity across the evaluated checks
    pub overall_severity: Severity,
    /// All check results, in evaluation order
    pub results: Vec<CheckResult>,
    /// Violations created for this request (already appended to the
    /// audit trail)
    pub violations: Vec<Violation>,
}

impl Decision {
    /// Categories that failed
    pub fn failed_categories(&self) -> Vec<CheckCategory> {
        self.results
            .iter()
            .filter(|r| !r.passed)
            .map(|r| r.category)
            .collect()
    }

    /// Remediation suggestions gathered from every failed check
    pub fn recommendations(&self) -> Vec<String> {
        self.results
            .iter()
            .filter(|r| !r.passed)
            .flat_map(|r| r.recommendations.iter().cloned())
            .collect()
    }

    /// Violation descriptions joined into one caller-facing reason
    pub fn reason(&self) -> Option<String> {
        let lines: Vec<String> = self
            .results
            .iter()
            .filter(|r| !r.passed)
            .flat_map(|r| r.violations.iter().cloned())
            .collect();
        if lines.is_empty() {
            None
        } else {
            Some(lines.join("; "))
        }
    }
}

/// Flattened allow/deny for call sites that don't need the full
/// [`Decision`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickVerdict {
    /// Whether the operation may proceed
    pub allowed: bool,
    /// Joined violation descriptions when denied
    pub reason: Option<String>,
}
