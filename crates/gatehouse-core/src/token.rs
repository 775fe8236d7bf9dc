//! Access tokens and the caller profiles built from them.

use crate::principal::{AttributeValues, Authentication};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Profile attribute key under which the validated access token is attached.
pub const ACCESS_TOKEN_ATTRIBUTE: &str = "access_token";

/// An OAuth access token as held by the token registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    /// Token identifier, matched exactly against the presented bearer value.
    pub id: String,

    /// Granted scopes.
    #[serde(default)]
    pub scopes: BTreeSet<String>,

    /// The authentication the token was issued for.
    pub authentication: Authentication,

    /// Absolute expiration, if the registry tracks one.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,

    /// Expiry state reported by the registry (e.g., revoked or used up).
    #[serde(default)]
    pub expired: bool,
}

impl AccessToken {
    /// Create an unexpired token with the given scopes.
    pub fn new<I, S>(id: impl Into<String>, authentication: Authentication, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            scopes: scopes.into_iter().map(Into::into).collect(),
            authentication,
            expires_at: None,
            expired: false,
        }
    }

    /// Set the absolute expiration.
    pub fn expiring_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Mark the token as expired.
    pub fn mark_expired(mut self) -> Self {
        self.expired = true;
        self
    }

    /// Check expiry against a given instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expired || self.expires_at.is_some_and(|exp| exp <= now)
    }

    /// Check expiry against the current time.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.contains(scope)
    }
}

/// A single profile attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ProfileAttribute {
    /// Identity attribute values.
    Values(AttributeValues),
    /// The validated access token (under [`ACCESS_TOKEN_ATTRIBUTE`]).
    AccessToken(AccessToken),
}

/// The validated caller identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    /// Principal identifier.
    pub id: String,

    /// Merged identity attributes plus the reserved access token attribute.
    pub attributes: BTreeMap<String, ProfileAttribute>,

    /// Granted permissions (the token's scopes).
    pub permissions: BTreeSet<String>,
}

impl Profile {
    pub fn attribute(&self, name: &str) -> Option<&ProfileAttribute> {
        self.attributes.get(name)
    }

    /// Identity attribute values by name; `None` for the reserved token entry.
    pub fn attribute_values(&self, name: &str) -> Option<&AttributeValues> {
        match self.attributes.get(name)? {
            ProfileAttribute::Values(values) => Some(values),
            ProfileAttribute::AccessToken(_) => None,
        }
    }

    /// The access token this profile was built from.
    pub fn access_token(&self) -> Option<&AccessToken> {
        match self.attributes.get(ACCESS_TOKEN_ATTRIBUTE)? {
            ProfileAttribute::AccessToken(token) => Some(token),
            ProfileAttribute::Values(_) => None,
        }
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }
}
