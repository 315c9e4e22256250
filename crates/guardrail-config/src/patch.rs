//! Per-call configuration overrides

use serde::{Deserialize, Serialize};

use crate::types::{
    BrandVoiceRules, BudgetRules, ContentSafetyRules, IsolationRules, PrivacyRules,
    RateLimitRules, TenantConfig,
};
use guardrail_common::EnforcementLevel;

/// Partial tenant configuration. Applying a patch replaces each present
/// rule section wholesale (shallow merge at the section level, override
/// wins); absent sections keep the stored values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TenantConfigPatch {
    pub enabled: Option<bool>,
    pub enforcement: Option<EnforcementLevel>,
    pub budget: Option<BudgetRules>,
    pub rate_limit: Option<RateLimitRules>,
    pub content_safety: Option<ContentSafetyRules>,
    pub brand_voice: Option<BrandVoiceRules>,
    pub privacy: Option<PrivacyRules>,
    pub isolation: Option<IsolationRules>,
}

impl TenantConfigPatch {
    /// An empty patch (applies no changes)
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge this patch over `base`, returning the effective config
    pub fn apply(&self, base: &TenantConfig) -> TenantConfig {
        TenantConfig {
            tenant_id: base.tenant_id.clone(),
            enabled: self.enabled.unwrap_or(base.enabled),
            enforcement: self.enforcement.unwrap_or(base.enforcement),
            budget: self.budget.clone().unwrap_or_else(|| base.budget.clone()),
            rate_limit: self
                .rate_limit
                .clone()
                .unwrap_or_else(|| base.rate_limit.clone()),
            content_safety: self
                .content_safety
                .clone()
                .unwrap_or_else(|| base.content_safety.clone()),
            brand_voice: self
                .brand_voice
                .clone()
                .unwrap_or_else(|| base.brand_voice.clone()),
            privacy: self.privacy.clone().unwrap_or_else(|| base.privacy.clone()),
            isolation: self
                .isolation
                .clone()
                .unwrap_or_else(|| base.isolation.clone()),
        }
    }

    /// True when the patch changes nothing
    pub fn is_empty(&self) -> bool {
        self.enabled.is_none()
            && self.enforcement.is_none()
            && self.budget.is_none()
            && self.rate_limit.is_none()
            && self.content_safety.is_none()
            && self.brand_voice.is_none()
            && self.privacy.is_none()
            && self.isolation.is_none()
    }

    pub fn with_budget(mut self, budget: BudgetRules) -> Self {
        self.budget = Some(budget);
        self
    }

    pub fn with_rate_limit(mut self, rate_limit: RateLimitRules) -> Self {
        self.rate_limit = Some(rate_limit);
        self
    }

    pub fn with_enforcement(mut self, enforcement: EnforcementLevel) -> Self {
        self.enforcement = Some(enforcement);
        self
    }
}
