//! Token registry collaborator.

use gatehouse_core::AccessToken;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Read access to the external token registry.
///
/// Lookups must be side-effect free; the engine never writes through this trait.
pub trait TokenRegistry: Send + Sync {
    /// Find a token by its exact identifier.
    fn lookup(&self, id: &str) -> Option<AccessToken>;
}

/// Process-local registry for development and tests.
#[derive(Debug, Default)]
pub struct InMemoryTokenRegistry {
    tokens: RwLock<HashMap<String, AccessToken>>,
}

impl InMemoryTokenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the registry with tokens.
    pub fn from_tokens(tokens: impl IntoIterator<Item = AccessToken>) -> Self {
        let registry = Self::new();
        for token in tokens {
            registry.insert(token);
        }
        registry
    }

    /// Store a token, returning the one it replaced.
    pub fn insert(&self, token: AccessToken) -> Option<AccessToken> {
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token.id.clone(), token)
    }

    /// Remove a token.
    pub fn remove(&self, id: &str) -> Option<AccessToken> {
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
    }

    pub fn len(&self) -> usize {
        self.tokens.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TokenRegistry for InMemoryTokenRegistry {
    fn lookup(&self, id: &str) -> Option<AccessToken> {
        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatehouse_core::{Authentication, Principal};

    fn token(id: &str) -> AccessToken {
        AccessToken::new(id, Authentication::new(Principal::new("casuser")), ["read"])
    }

    #[test]
    fn test_insert_lookup_remove() {
        let registry = InMemoryTokenRegistry::from_tokens([token("a"), token("b")]);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.lookup("a").unwrap().id, "a");
        assert!(registry.lookup("A").is_none());

        assert!(registry.remove("a").is_some());
        assert!(registry.lookup("a").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_insert_replaces_existing() {
        let registry = InMemoryTokenRegistry::new();
        assert!(registry.insert(token("a")).is_none());
        assert!(registry.insert(token("a").mark_expired()).is_some());
        assert!(registry.lookup("a").unwrap().expired);
    }
}
