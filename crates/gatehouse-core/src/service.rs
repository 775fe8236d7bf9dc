//! Registered services and their multifactor policies.

use serde::{Deserialize, Serialize};

/// Per-service rule declaring which principal attributes trigger multifactor
/// authentication and which providers handle it.
///
/// A policy without providers, or with a blank trigger name list or blank
/// pattern, is treated as absent: it never triggers and is not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultifactorPolicy {
    /// Comma-delimited list of principal attribute names to inspect
    /// (e.g., "memberOf, eduPersonAffiliation").
    #[serde(default)]
    pub trigger_attribute_names: String,

    /// Regular expression searched for in each value of the trigger attributes.
    #[serde(default)]
    pub value_match_pattern: String,

    /// Multifactor providers this policy escalates to.
    #[serde(default)]
    pub provider_ids: Vec<String>,
}

impl MultifactorPolicy {
    pub fn new(
        trigger_attribute_names: impl Into<String>,
        value_match_pattern: impl Into<String>,
        provider_ids: Vec<String>,
    ) -> Self {
        Self {
            trigger_attribute_names: trigger_attribute_names.into(),
            value_match_pattern: value_match_pattern.into(),
            provider_ids,
        }
    }

    /// Parse the trigger attribute names.
    ///
    /// Entries are trimmed; empty entries and repeats are dropped. Order is
    /// first-seen order.
    pub fn trigger_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for name in self.trigger_attribute_names.split(',') {
            let name = name.trim();
            if !name.is_empty() && !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        names
    }

    /// Provider ids in declared order, without repeats or blank entries.
    pub fn distinct_provider_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = Vec::new();
        for id in &self.provider_ids {
            let id = id.trim();
            if !id.is_empty() && !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }

    /// Whether the policy carries enough data to be evaluated at all.
    pub fn is_actionable(&self) -> bool {
        !self.distinct_provider_ids().is_empty()
            && !self.trigger_names().is_empty()
            && !self.value_match_pattern.trim().is_empty()
    }
}

/// A service known to the service registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredService {
    /// Numeric service identifier.
    pub id: u64,

    /// Service name.
    pub name: String,

    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,

    /// Multifactor policy, if any.
    #[serde(default)]
    pub multifactor_policy: Option<MultifactorPolicy>,

    /// Provider precedence when several providers apply; earlier wins.
    #[serde(default)]
    pub provider_precedence: Vec<String>,
}

impl RegisteredService {
    /// Create a service without a policy.
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            multifactor_policy: None,
            provider_precedence: Vec::new(),
        }
    }

    /// Attach a multifactor policy.
    pub fn with_policy(mut self, policy: MultifactorPolicy) -> Self {
        self.multifactor_policy = Some(policy);
        self
    }

    /// Set provider precedence.
    pub fn with_precedence(mut self, providers: Vec<String>) -> Self {
        self.provider_precedence = providers;
        self
    }

    /// Position of a provider in the declared precedence. Entries are trimmed.
    pub fn precedence_of(&self, provider_id: &str) -> Option<usize> {
        self.provider_precedence
            .iter()
            .position(|p| p.trim() == provider_id.trim())
    }
}
