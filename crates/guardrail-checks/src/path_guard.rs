//! Compiled protected-path matching
//!
//! Patterns are anchored full-path globs: `*` matches within one path
//! segment, `**` crosses separators. Each pattern is compiled once and
//! cached, so repeated checks against the same tenant rules never pay
//! compilation again.

use dashmap::DashMap;
use globset::{GlobBuilder, GlobMatcher};
use tracing::warn;

/// Process-wide cache of compiled protected-path globs
pub struct PathGuard {
    compiled: DashMap<String, GlobMatcher>,
}

impl PathGuard {
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            compiled: DashMap::new(),
        }
    }

    /// All patterns from `patterns` that match `path`, in pattern order.
    ///
    /// Patterns are validated when tenant configuration loads, so a
    /// compile failure here means the config bypassed validation; such
    /// a pattern is skipped with a warning rather than silently
    /// matching everything or nothing.
    pub fn matching_patterns<'a>(&self, patterns: &'a [String], path: &str) -> Vec<&'a str> {
        let mut matches = Vec::new();
        for pattern in patterns {
            if !self.compiled.contains_key(pattern) {
                match GlobBuilder::new(pattern).literal_separator(true).build() {
                    Ok(glob) => {
                        self.compiled
                            .insert(pattern.clone(), glob.compile_matcher());
                    }
                    Err(e) => {
                        warn!(pattern = %pattern, error = %e, "skipping uncompilable protected path pattern");
                        continue;
                    }
                }
            }
            if let Some(matcher) = self.compiled.get(pattern) {
                if matcher.is_match(path) {
                    matches.push(pattern.as_str());
                }
            }
        }
        matches
    }

    /// Number of cached compiled patterns
    pub fn cached_patterns(&self) -> usize {
        self.compiled.len()
    }
}

impl Default for PathGuard {
    fn default() -> Self {
        Self::new()
    }
}
