//! Required scope declarations.

/// Scope required by resource-server (protection API) endpoints.
pub const UMA_PROTECTION_SCOPE: &str = "uma_protection";

/// Scope required by requesting-party (authorization API) endpoints.
pub const UMA_AUTHORIZATION_SCOPE: &str = "uma_authorization";

/// Declares which scope a use site requires of a presented token.
pub trait ScopeRequirement: Send + Sync {
    fn required_scope(&self) -> &str;
}

/// Requires [`UMA_PROTECTION_SCOPE`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UmaProtectionScope;

impl ScopeRequirement for UmaProtectionScope {
    fn required_scope(&self) -> &str {
        UMA_PROTECTION_SCOPE
    }
}

/// Requires [`UMA_AUTHORIZATION_SCOPE`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UmaAuthorizationScope;

impl ScopeRequirement for UmaAuthorizationScope {
    fn required_scope(&self) -> &str {
        UMA_AUTHORIZATION_SCOPE
    }
}

/// Requires an arbitrary fixed scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredScope(pub String);

impl RequiredScope {
    pub fn new(scope: impl Into<String>) -> Self {
        Self(scope.into())
    }
}

impl ScopeRequirement for RequiredScope {
    fn required_scope(&self) -> &str {
        &self.0
    }
}

impl ScopeRequirement for str {
    fn required_scope(&self) -> &str {
        self
    }
}

impl ScopeRequirement for String {
    fn required_scope(&self) -> &str {
        self
    }
}
