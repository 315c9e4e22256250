//! Check categories

use serde::{Deserialize, Serialize};

/// The six rule categories evaluated for every gated operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckCategory {
    /// Spend ceilings (per-request and cumulative windows)
    Budget,
    /// Sliding-window request admission
    RateLimit,
    /// PII and unsafe-content detection
    ContentSafety,
    /// Prohibited vocabulary and voice-attribute presence
    BrandVoice,
    /// Consent, data minimization, retention
    Privacy,
    /// Cross-tenant targets and protected resource paths
    Isolation,
}

impl CheckCategory {
    /// Stable identifier used in audit records and log fields
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckCategory::Budget => "budget",
            CheckCategory::RateLimit => "rate_limit",
            CheckCategory::ContentSafety => "content_safety",
            CheckCategory::BrandVoice => "brand_voice",
            CheckCategory::Privacy => "privacy",
            CheckCategory::Isolation => "isolation",
        }
    }

    /// All categories in evaluation order
    pub fn all() -> [CheckCategory; 6] {
        [
            CheckCategory::Budget,
            CheckCategory::RateLimit,
            CheckCategory::ContentSafety,
            CheckCategory::BrandVoice,
            CheckCategory::Privacy,
            CheckCategory::Isolation,
        ]
    }
}

impl std::fmt::Display for CheckCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
