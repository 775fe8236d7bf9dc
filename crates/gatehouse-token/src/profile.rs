//! Caller profile construction.

use gatehouse_core::{ACCESS_TOKEN_ATTRIBUTE, AccessToken, Profile, ProfileAttribute};
use std::collections::BTreeMap;

/// Builds the caller profile from a validated access token.
pub struct ProfileBuilder;

impl ProfileBuilder {
    /// Build the profile.
    ///
    /// Attributes are the authentication attributes overlaid with the
    /// principal attributes (principal wins on collision). The token itself
    /// is attached last under [`ACCESS_TOKEN_ATTRIBUTE`].
    pub fn build(token: &AccessToken) -> Profile {
        let authentication = &token.authentication;
        let principal = &authentication.principal;

        let mut attributes: BTreeMap<String, ProfileAttribute> = authentication
            .attributes
            .iter()
            .map(|(name, values)| (name.clone(), ProfileAttribute::Values(values.clone())))
            .collect();
        for (name, values) in &principal.attributes {
            attributes.insert(name.clone(), ProfileAttribute::Values(values.clone()));
        }
        attributes.insert(
            ACCESS_TOKEN_ATTRIBUTE.to_string(),
            ProfileAttribute::AccessToken(token.clone()),
        );

        let profile = Profile {
            id: principal.id.clone(),
            attributes,
            permissions: token.scopes.clone(),
        };

        tracing::debug!(
            principal = %profile.id,
            permissions = ?profile.permissions,
            "Authenticated access token"
        );
        profile
    }
}
