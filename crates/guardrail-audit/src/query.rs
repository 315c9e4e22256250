//! Violation query filters

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use guardrail_common::{CheckCategory, Severity};

use crate::violation::Violation;

/// Filter for reading the audit trail. All fields are optional and
/// combine with AND semantics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ViolationQuery {
    /// Restrict to one tenant
    pub tenant: Option<String>,
    /// Restrict to one category
    pub category: Option<CheckCategory>,
    /// Restrict to one severity tier
    pub severity: Option<Severity>,
    /// Only violations recorded at or after this instant
    pub since: Option<DateTime<Utc>>,
}

impl ViolationQuery {
    /// Match everything
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_tenant(mut self, tenant: impl Into<String>) -> Self {
        self.tenant = Some(tenant.into());
        self
    }

    pub fn with_category(mut self, category: CheckCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    /// True when the violation satisfies every set filter
    pub fn matches(&self, violation: &Violation) -> bool {
        self.tenant
            .as_deref()
            .map_or(true, |t| violation.tenant_id == t)
            && self.category.map_or(true, |c| violation.category == c)
            && self.severity.map_or(true, |s| violation.severity == s)
            && self.since.map_or(true, |ts| violation.timestamp >= ts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use guardrail_common::CheckResult;

    fn violation(tenant: &str, category: CheckCategory, severity: Severity) -> Violation {
        let result = CheckResult::fail(category, severity, "rule", vec!["v".into()]);
        Violation::from_check(tenant, &result, None, None)
    }

    #[test]
    fn test_empty_query_matches_everything() {
        let v = violation("synqra", CheckCategory::Budget, Severity::High);
        assert!(ViolationQuery::all().matches(&v));
    }

    #[test]
    fn test_filters_combine_with_and() {
        let v = violation("synqra", CheckCategory::Budget, Severity::High);

        let matching = ViolationQuery::all()
            .for_tenant("synqra")
            .with_category(CheckCategory::Budget)
            .with_severity(Severity::High);
        assert!(matching.matches(&v));

        let wrong_tenant = ViolationQuery::all()
            .for_tenant("aurafx")
            .with_category(CheckCategory::Budget);
        assert!(!wrong_tenant.matches(&v));
    }

    #[test]
    fn test_since_is_inclusive() {
        let v = violation("synqra", CheckCategory::Privacy, Severity::Medium);
        assert!(ViolationQuery::all().since(v.timestamp).matches(&v));
        assert!(!ViolationQuery::all()
            .since(v.timestamp + chrono::Duration::seconds(1))
            .matches(&v));
    }
}
