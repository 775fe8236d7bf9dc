//! Access token validation.

use crate::error::TokenError;
use crate::registry::TokenRegistry;
use crate::scope::ScopeRequirement;
use chrono::{DateTime, Utc};
use gatehouse_core::AccessToken;
use std::sync::Arc;

/// Validates presented bearer tokens against the token registry.
pub struct TokenValidator {
    registry: Arc<dyn TokenRegistry>,
}

impl TokenValidator {
    /// Create a new validator over the given registry.
    pub fn new(registry: Arc<dyn TokenRegistry>) -> Self {
        Self { registry }
    }

    /// Validate a raw bearer token against the current time.
    pub fn validate<S>(&self, raw_token: &str, requirement: &S) -> Result<AccessToken, TokenError>
    where
        S: ScopeRequirement + ?Sized,
    {
        self.validate_at(raw_token, requirement, Utc::now())
    }

    /// Validate a raw bearer token as of `now`.
    ///
    /// The token is trimmed before lookup. The registry's token is returned
    /// unchanged on success.
    pub fn validate_at<S>(
        &self,
        raw_token: &str,
        requirement: &S,
        now: DateTime<Utc>,
    ) -> Result<AccessToken, TokenError>
    where
        S: ScopeRequirement + ?Sized,
    {
        let token_id = raw_token.trim();

        let Some(token) = self.registry.lookup(token_id) else {
            tracing::debug!(cause = "not_found", "Rejecting access token");
            return Err(TokenError::NotFoundOrExpired);
        };

        if token.is_expired_at(now) {
            tracing::debug!(
                cause = "expired",
                principal = %token.authentication.principal.id,
                "Rejecting access token"
            );
            return Err(TokenError::NotFoundOrExpired);
        }

        let required_scope = requirement.required_scope();
        if !token.has_scope(required_scope) {
            tracing::debug!(
                cause = "insufficient_scope",
                required_scope,
                principal = %token.authentication.principal.id,
                "Rejecting access token"
            );
            return Err(TokenError::InsufficientScope {
                required_scope: required_scope.to_string(),
            });
        }

        Ok(token)
    }
}
