//! `gatehouse validate` - validate a bearer token and print the caller profile.

use crate::audit::{AuditAction, AuditRecord, AuditSink};
use gatehouse_core::{GatehouseConfig, Profile};
use gatehouse_token::{InMemoryTokenRegistry, RequiredScope, TokenAuthenticator};
use serde_json::json;
use std::sync::Arc;

/// Validate `raw_token` against the configured token fixtures, then record
/// the outcome. The raw token is never written to the audit record.
pub fn run_validate(
    config: &GatehouseConfig,
    raw_token: &str,
    scope: &str,
    audit: &dyn AuditSink,
) -> anyhow::Result<Profile> {
    let registry = Arc::new(InMemoryTokenRegistry::from_tokens(config.tokens.iter().cloned()));
    let authenticator = TokenAuthenticator::new(registry, RequiredScope::new(scope));

    match authenticator.authenticate(raw_token) {
        Ok(profile) => {
            audit.record(AuditRecord::new(
                AuditAction::TokenValidation,
                profile.id.clone(),
                scope,
                json!({ "valid": true, "permissions": profile.permissions }),
            ));
            Ok(profile)
        }
        Err(e) => {
            audit.record(AuditRecord::new(
                AuditAction::TokenValidation,
                "unknown",
                scope,
                json!({ "valid": false, "error": e.to_string() }),
            ));
            Err(e.into())
        }
    }
}
