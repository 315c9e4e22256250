//! Violation records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use guardrail_common::{CheckCategory, CheckResult, Severity, ViolationAction};

/// One audited policy violation. Records are append-only; nothing in
/// the engine mutates a violation after it is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// Unique violation id
    pub id: Uuid,
    /// Category of the failed check
    pub category: CheckCategory,
    /// Severity copied from the check result
    pub severity: Severity,
    /// Short description of the rule that was breached
    pub rule: String,
    /// Concatenated violation strings from the check
    pub description: String,
    /// When the violation was recorded
    pub timestamp: DateTime<Utc>,
    /// Tenant the operation ran under
    pub tenant_id: String,
    /// Caller identity, when the request carried one
    pub caller_identity: Option<String>,
    /// Request id for correlation with caller-side logs
    pub request_id: Option<String>,
    /// Whether the operation was blocked or merely logged
    pub action: ViolationAction,
}

impl Violation {
    /// Build a violation from a failed check result.
    ///
    /// The action is derived from the severity: top-tier results block,
    /// everything else is logged.
    pub fn from_check(
        tenant_id: impl Into<String>,
        result: &CheckResult,
        caller_identity: Option<String>,
        request_id: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            category: result.category,
            severity: result.severity,
            rule: result.message.clone(),
            description: result.violations.join("; "),
            timestamp: result.timestamp,
            tenant_id: tenant_id.into(),
            caller_identity,
            request_id,
            action: ViolationAction::for_severity(result.severity),
        }
    }
}
