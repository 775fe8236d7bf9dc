//! Multifactor provider configuration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A multifactor provider available to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider identifier referenced by service policies (e.g., "mfa-duo").
    pub id: String,

    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
}

/// How a provider is picked when a policy lists several.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionStrategy {
    /// Activate every registered candidate.
    All,
    /// Activate one provider, ranked by the service's precedence then by id.
    #[default]
    Precedence,
    /// Activate the lexically smallest provider id.
    Lexical,
}

impl fmt::Display for SelectionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionStrategy::All => write!(f, "all"),
            SelectionStrategy::Precedence => write!(f, "precedence"),
            SelectionStrategy::Lexical => write!(f, "lexical"),
        }
    }
}

/// Provider selection settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SelectionConfig {
    #[serde(default)]
    pub strategy: SelectionStrategy,
}
