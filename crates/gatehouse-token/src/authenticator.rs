//! Token authentication bound to a use site's scope requirement.

use crate::error::TokenError;
use crate::profile::ProfileBuilder;
use crate::registry::TokenRegistry;
use crate::scope::ScopeRequirement;
use crate::validator::TokenValidator;
use gatehouse_core::Profile;
use std::sync::Arc;

/// Validates bearer tokens for one kind of endpoint and builds the caller profile.
///
/// ```rust
/// use gatehouse_core::{AccessToken, Authentication, Principal};
/// use gatehouse_token::{InMemoryTokenRegistry, TokenAuthenticator, UmaProtectionScope};
/// use std::sync::Arc;
///
/// let registry = InMemoryTokenRegistry::new();
/// registry.insert(AccessToken::new(
///     "tok-123",
///     Authentication::new(Principal::new("casuser")),
///     ["uma_protection"],
/// ));
///
/// let authenticator = TokenAuthenticator::new(Arc::new(registry), UmaProtectionScope);
/// let profile = authenticator.authenticate(" tok-123 ").unwrap();
/// assert_eq!(profile.id, "casuser");
/// ```
pub struct TokenAuthenticator<S: ScopeRequirement> {
    validator: TokenValidator,
    requirement: S,
}

impl<S: ScopeRequirement> TokenAuthenticator<S> {
    pub fn new(registry: Arc<dyn TokenRegistry>, requirement: S) -> Self {
        Self {
            validator: TokenValidator::new(registry),
            requirement,
        }
    }

    /// The scope this authenticator requires.
    pub fn required_scope(&self) -> &str {
        self.requirement.required_scope()
    }

    /// Validate the raw token and build the caller profile.
    pub fn authenticate(&self, raw_token: &str) -> Result<Profile, TokenError> {
        let token = self.validator.validate(raw_token, &self.requirement)?;
        Ok(ProfileBuilder::build(&token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::InMemoryTokenRegistry;
    use crate::scope::{RequiredScope, UmaAuthorizationScope, UmaProtectionScope};
    use gatehouse_core::{AccessToken, Authentication, Principal};

    fn registry() -> Arc<InMemoryTokenRegistry> {
        Arc::new(InMemoryTokenRegistry::from_tokens([AccessToken::new(
            "tok-123",
            Authentication::new(Principal::new("casuser")),
            ["uma_protection"],
        )]))
    }

    #[test]
    fn test_scope_differs_per_use_site() {
        let registry = registry();
        let protection = TokenAuthenticator::new(registry.clone(), UmaProtectionScope);
        let authorization = TokenAuthenticator::new(registry, UmaAuthorizationScope);

        assert!(protection.authenticate("tok-123").is_ok());
        assert_eq!(
            authorization.authenticate("tok-123"),
            Err(TokenError::InsufficientScope { required_scope: "uma_authorization".into() })
        );
    }

    #[test]
    fn test_custom_scope() {
        let authenticator = TokenAuthenticator::new(registry(), RequiredScope::new("write"));
        assert_eq!(authenticator.required_scope(), "write");
        assert!(authenticator.authenticate("tok-123").is_err());
    }

    #[test]
    fn test_unknown_token() {
        let authenticator = TokenAuthenticator::new(registry(), UmaProtectionScope);
        assert_eq!(authenticator.authenticate("nope"), Err(TokenError::NotFoundOrExpired));
    }
}
