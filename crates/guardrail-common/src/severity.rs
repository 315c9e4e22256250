//! Severity ladder and enforcement levels

use serde::{Deserialize, Serialize};

/// Severity of a check result or violation, ordered from least to most
/// severe. The overall severity of a decision is the maximum across all
/// evaluated checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational; the lowest tier, reported by passing checks
    Low,
    /// Needs attention but does not block on its own
    Medium,
    /// Serious policy breach
    High,
    /// Top tier; violations at this level block the operation
    Critical,
}

impl Severity {
    /// Human-readable label
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tenant-wide enforcement level. This is the engine's *default*
/// severity floor for failed checks, distinct from the severity each
/// check computes for itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnforcementLevel {
    /// Violations are recorded but weighted lightly
    Soft,
    /// Balanced default
    Medium,
    /// Violations escalate to high severity
    Hard,
    /// Every violation blocks
    Critical,
}

impl EnforcementLevel {
    /// Map the enforcement level onto the severity ladder. Failed
    /// checks never report below this floor.
    pub fn default_severity(&self) -> Severity {
        match self {
            EnforcementLevel::Soft => Severity::Low,
            EnforcementLevel::Medium => Severity::Medium,
            EnforcementLevel::Hard => Severity::High,
            EnforcementLevel::Critical => Severity::Critical,
        }
    }
}

impl Default for EnforcementLevel {
    fn default() -> Self {
        EnforcementLevel::Medium
    }
}

/// What happens to an operation that produced a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViolationAction {
    /// Recorded in the audit trail, operation proceeds
    Logged,
    /// Operation is denied
    Blocked,
}

impl ViolationAction {
    /// Critical violations block; everything else is logged.
    pub fn for_severity(severity: Severity) -> Self {
        if severity == Severity::Critical {
            ViolationAction::Blocked
        } else {
            ViolationAction::Logged
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn test_overall_severity_is_max() {
        let severities = [Severity::Low, Severity::Critical, Severity::Medium];
        assert_eq!(
            severities.iter().max().copied(),
            Some(Severity::Critical)
        );
    }

    #[test]
    fn test_enforcement_level_maps_to_severity_floor() {
        assert_eq!(EnforcementLevel::Soft.default_severity(), Severity::Low);
        assert_eq!(EnforcementLevel::Medium.default_severity(), Severity::Medium);
        assert_eq!(EnforcementLevel::Hard.default_severity(), Severity::High);
        assert_eq!(
            EnforcementLevel::Critical.default_severity(),
            Severity::Critical
        );
    }

    #[test]
    fn test_only_critical_blocks() {
        assert_eq!(
            ViolationAction::for_severity(Severity::Critical),
            ViolationAction::Blocked
        );
        assert_eq!(
            ViolationAction::for_severity(Severity::High),
            ViolationAction::Logged
        );
        assert_eq!(
            ViolationAction::for_severity(Severity::Low),
            ViolationAction::Logged
        );
    }

    #[test]
    fn test_severity_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&Severity::Critical).unwrap(),
            "\"critical\""
        );
        let parsed: Severity = serde_json::from_str("\"high\"").unwrap();
        assert_eq!(parsed, Severity::High);
    }
}
