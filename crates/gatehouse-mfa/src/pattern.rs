//! Compiled trigger pattern cache.

use gatehouse_core::PatternCacheConfig;
use regex::Regex;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Read-mostly cache of compiled patterns keyed by pattern source.
///
/// Compilation happens outside the write lock; when two callers race on the
/// same pattern the first insert wins and both get an equivalent `Regex`.
/// The map only ever holds immutable compiled patterns, so a poisoned lock
/// is recovered rather than propagated.
pub struct PatternCache {
    enabled: bool,
    patterns: RwLock<HashMap<String, Regex>>,
}

impl PatternCache {
    /// Create an enabled cache.
    pub fn new() -> Self {
        Self {
            enabled: true,
            patterns: RwLock::new(HashMap::new()),
        }
    }

    /// Create a cache that compiles on every call.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            patterns: RwLock::new(HashMap::new()),
        }
    }

    pub fn from_config(config: &PatternCacheConfig) -> Self {
        if config.enabled { Self::new() } else { Self::disabled() }
    }

    /// Return the compiled pattern, compiling and caching it on first use.
    pub fn get_or_compile(&self, pattern: &str) -> Result<Regex, regex::Error> {
        if !self.enabled {
            return Regex::new(pattern);
        }

        if let Some(re) = self
            .patterns
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(pattern)
        {
            return Ok(re.clone());
        }

        let compiled = Regex::new(pattern)?;
        let mut patterns = self.patterns.write().unwrap_or_else(PoisonError::into_inner);
        Ok(patterns
            .entry(pattern.to_string())
            .or_insert(compiled)
            .clone())
    }

    /// Number of cached patterns.
    pub fn len(&self) -> usize {
        self.patterns
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached pattern (e.g., after the service registry reloads).
    pub fn clear(&self) {
        self.patterns
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Default for PatternCache {
    fn default() -> Self {
        Self::new()
    }
}
