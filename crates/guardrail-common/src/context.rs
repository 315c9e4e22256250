//! Per-request evaluation context

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Input to a policy evaluation: everything the checkers may inspect
/// about the operation being gated. Which checks run depends on which
/// optional fields are populated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckContext {
    /// Request identifier for audit correlation
    pub request_id: String,
    /// Operation being gated (e.g. "content.generate", "campaign.publish")
    pub operation: String,
    /// Caller identity for rate limiting; anonymous callers skip the limiter
    pub caller_identity: Option<String>,
    /// Estimated cost of the operation, in the tenant's billing unit
    pub estimated_cost: Option<f64>,
    /// Free-text content to scan (generated copy, outbound messages)
    pub content: Option<String>,
    /// Target tenant hint for cross-tenant isolation checks
    pub target_tenant: Option<String>,
    /// File or resource path the operation wants to touch
    pub resource_path: Option<String>,
    /// Free-form metadata bag (consent flags, record timestamps, ...)
    pub metadata: HashMap<String, serde_json::Value>,
}

impl CheckContext {
    /// Create a context for the given request and operation
    pub fn new(request_id: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            operation: operation.into(),
            caller_identity: None,
            estimated_cost: None,
            content: None,
            target_tenant: None,
            resource_path: None,
            metadata: HashMap::new(),
        }
    }

    /// Attach a caller identity
    pub fn with_caller(mut self, identity: impl Into<String>) -> Self {
        self.caller_identity = Some(identity.into());
        self
    }

    /// Attach an estimated cost
    pub fn with_cost(mut self, cost: f64) -> Self {
        self.estimated_cost = Some(cost);
        self
    }

    /// Attach content to scan
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Attach a target tenant hint
    pub fn with_target_tenant(mut self, tenant: impl Into<String>) -> Self {
        self.target_tenant = Some(tenant.into());
        self
    }

    /// Attach a resource path
    pub fn with_resource_path(mut self, path: impl Into<String>) -> Self {
        self.resource_path = Some(path.into());
        self
    }

    /// Insert a metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// True when the metadata bag carries the given key set to `true`
    pub fn metadata_flag(&self, key: &str) -> bool {
        matches!(
            self.metadata.get(key),
            Some(serde_json::Value::Bool(true))
        )
    }

    /// Read a metadata entry as a string, if present
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(|v| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_populates_fields() {
        let ctx = CheckContext::new("req-1", "content.generate")
            .with_caller("user-7")
            .with_cost(0.25)
            .with_content("hello")
            .with_metadata("consent", serde_json::json!(true));

        assert_eq!(ctx.request_id, "req-1");
        assert_eq!(ctx.operation, "content.generate");
        assert_eq!(ctx.caller_identity.as_deref(), Some("user-7"));
        assert_eq!(ctx.estimated_cost, Some(0.25));
        assert!(ctx.metadata_flag("consent"));
    }

    #[test]
    fn test_metadata_flag_requires_true_bool() {
        let ctx = CheckContext::new("req-1", "op")
            .with_metadata("consent", serde_json::json!("yes"))
            .with_metadata("optin", serde_json::json!(false));

        assert!(!ctx.metadata_flag("consent"));
        assert!(!ctx.metadata_flag("optin"));
        assert!(!ctx.metadata_flag("missing"));
    }
}
