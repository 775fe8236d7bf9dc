//! Multifactor provider registry collaborator.

use gatehouse_core::ProviderConfig;
use std::collections::HashSet;

/// Answers whether a provider currently exists.
///
/// Policies can outlive the providers they reference; the resolver uses this
/// to drop stale references before selection.
pub trait ProviderRegistry: Send + Sync {
    fn is_registered(&self, provider_id: &str) -> bool;
}

/// Fixed set of provider ids, typically built from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticProviderRegistry {
    ids: HashSet<String>,
}

impl StaticProviderRegistry {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids
                .into_iter()
                .map(Into::<String>::into)
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty())
                .collect(),
        }
    }

    pub fn from_config(providers: &[ProviderConfig]) -> Self {
        Self::new(providers.iter().map(|p| p.id.clone()))
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl ProviderRegistry for StaticProviderRegistry {
    fn is_registered(&self, provider_id: &str) -> bool {
        self.ids.contains(provider_id)
    }
}
