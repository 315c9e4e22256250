//! Tenant configuration types

use globset::GlobBuilder;
use serde::{Deserialize, Serialize};

use guardrail_common::EnforcementLevel;

use crate::error::{ConfigError, ConfigResult};

/// Complete rule configuration for one tenant. Treated as read-only by
/// every checker; per-call overrides go through
/// [`crate::patch::TenantConfigPatch`] instead of mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TenantConfig {
    /// Tenant identifier (project/customer boundary)
    pub tenant_id: String,
    /// Master switch; a disabled tenant bypasses all checks
    pub enabled: bool,
    /// Default severity floor for failed checks
    pub enforcement: EnforcementLevel,
    /// Spend ceilings
    pub budget: BudgetRules,
    /// Sliding-window request ceilings
    pub rate_limit: RateLimitRules,
    /// PII and unsafe-content scanning
    pub content_safety: ContentSafetyRules,
    /// Vocabulary rules
    pub brand_voice: BrandVoiceRules,
    /// Consent, data minimization, retention
    pub privacy: PrivacyRules,
    /// Cross-tenant and protected-path boundaries
    pub isolation: IsolationRules,
}

/// Spend ceilings, in the tenant's billing unit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BudgetRules {
    pub enabled: bool,
    /// Maximum cost for a single operation
    pub per_request_limit: f64,
    /// Rolling one-hour spend ceiling; zero disables the window
    pub hourly_limit: f64,
    /// Rolling 24-hour spend ceiling; zero disables the window
    pub daily_limit: f64,
    /// Rolling 30-day spend ceiling; zero disables the window
    pub monthly_limit: f64,
}

/// Sliding-window request ceilings per caller identity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RateLimitRules {
    pub enabled: bool,
    /// Admitted requests per rolling 60 seconds
    pub requests_per_minute: u32,
    /// Admitted requests per rolling hour
    pub requests_per_hour: u32,
    /// Optional rolling 24-hour ceiling; extends the prune horizon to a
    /// day when set
    pub requests_per_day: Option<u32>,
}

/// Content safety scanning toggles
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContentSafetyRules {
    pub enabled: bool,
    /// Scan for PII (national ids, payment cards, emails)
    pub detect_pii: bool,
    /// Scan for unsafe content (credential and payment disclosure)
    pub detect_unsafe: bool,
}

/// Brand vocabulary rules
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BrandVoiceRules {
    pub enabled: bool,
    /// Terms that must never appear (case-insensitive substring match)
    pub prohibited_terms: Vec<String>,
    /// At least one must appear in content longer than
    /// `min_length_for_voice`
    pub required_attributes: Vec<String>,
    /// Content at or below this length is not penalized for missing
    /// voice attributes
    pub min_length_for_voice: usize,
}

/// Privacy compliance rules
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PrivacyRules {
    pub enabled: bool,
    /// Require an explicit consent flag in the metadata bag
    pub require_consent: bool,
    /// Data-minimization cap on metadata entries
    pub max_metadata_keys: usize,
    /// Records older than this many days violate retention
    pub retention_days: i64,
}

/// Tenant isolation rules
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IsolationRules {
    pub enabled: bool,
    /// Reject operations targeting a different tenant
    pub prevent_cross_tenant: bool,
    /// Anchored glob patterns for paths the tenant may never touch.
    /// `*` stops at path separators, `**` crosses them.
    pub protected_paths: Vec<String>,
}

impl TenantConfig {
    /// A new tenant with the reference default thresholds
    pub fn new(tenant_id: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            enabled: true,
            enforcement: EnforcementLevel::default(),
            budget: BudgetRules::default(),
            rate_limit: RateLimitRules::default(),
            content_safety: ContentSafetyRules::default(),
            brand_voice: BrandVoiceRules::default(),
            privacy: PrivacyRules::default(),
            isolation: IsolationRules::default(),
        }
    }

    /// Validate the configuration. Called on every store write so
    /// malformed rules surface here rather than inside a check.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.tenant_id.trim().is_empty() {
            return Err(ConfigError::Validation {
                tenant: self.tenant_id.clone(),
                message: "tenant id must not be empty".to_string(),
            });
        }
        for (name, value) in [
            ("budget.per_request_limit", self.budget.per_request_limit),
            ("budget.hourly_limit", self.budget.hourly_limit),
            ("budget.daily_limit", self.budget.daily_limit),
            ("budget.monthly_limit", self.budget.monthly_limit),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Validation {
                    tenant: self.tenant_id.clone(),
                    message: format!("{} must be a non-negative number", name),
                });
            }
        }
        if self.rate_limit.enabled
            && (self.rate_limit.requests_per_minute == 0 || self.rate_limit.requests_per_hour == 0)
        {
            return Err(ConfigError::Validation {
                tenant: self.tenant_id.clone(),
                message: "rate limit windows must admit at least one request".to_string(),
            });
        }
        if self.privacy.retention_days <= 0 {
            return Err(ConfigError::Validation {
                tenant: self.tenant_id.clone(),
                message: "privacy.retention_days must be positive".to_string(),
            });
        }
        for pattern in &self.isolation.protected_paths {
            // Compile once here so check-time compilation cannot fail.
            GlobBuilder::new(pattern)
                .literal_separator(true)
                .build()
                .map_err(|e| ConfigError::InvalidPattern {
                    pattern: pattern.clone(),
                    message: e.to_string(),
                })?;
        }
        Ok(())
    }
}

impl Default for BudgetRules {
    fn default() -> Self {
        Self {
            enabled: true,
            per_request_limit: 1.0,
            hourly_limit: 10.0,
            daily_limit: 50.0,
            monthly_limit: 500.0,
        }
    }
}

impl Default for RateLimitRules {
    fn default() -> Self {
        Self {
            enabled: true,
            requests_per_minute: 60,
            requests_per_hour: 1000,
            requests_per_day: None,
        }
    }
}

impl Default for ContentSafetyRules {
    fn default() -> Self {
        Self {
            enabled: true,
            detect_pii: true,
            detect_unsafe: true,
        }
    }
}

impl Default for BrandVoiceRules {
    fn default() -> Self {
        Self {
            enabled: true,
            prohibited_terms: Vec::new(),
            required_attributes: Vec::new(),
            min_length_for_voice: 100,
        }
    }
}

impl Default for PrivacyRules {
    fn default() -> Self {
        Self {
            enabled: true,
            require_consent: false,
            max_metadata_keys: 20,
            retention_days: 90,
        }
    }
}

impl Default for IsolationRules {
    fn default() -> Self {
        Self {
            enabled: true,
            prevent_cross_tenant: true,
            protected_paths: Vec::new(),
        }
    }
}
