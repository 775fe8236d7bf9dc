//! # gatehouse-token
//!
//! Bearer access token validation.
//!
//! This crate provides functionality for:
//! - Looking up presented tokens in an external [`TokenRegistry`]
//! - Rejecting missing, expired and under-scoped tokens
//! - Building the caller [`Profile`](gatehouse_core::Profile) from a valid token
//!
//! ## Validation Flow
//!
//! | Step | Failure |
//! |------|---------|
//! | trim and look up the token | [`TokenError::NotFoundOrExpired`] |
//! | check expiry | [`TokenError::NotFoundOrExpired`] |
//! | check the required scope | [`TokenError::InsufficientScope`] |
//! | build the profile | never fails |
//!
//! Missing and expired tokens share one error so callers cannot probe which
//! token ids exist. The distinct cause is only logged at `debug` level.
//!
//! The required scope is declared per use site through [`ScopeRequirement`];
//! [`TokenAuthenticator`] binds one to a registry.

pub mod authenticator;
pub mod error;
pub mod profile;
pub mod registry;
pub mod scope;
pub mod validator;

pub use authenticator::TokenAuthenticator;
pub use error::TokenError;
pub use profile::ProfileBuilder;
pub use registry::{InMemoryTokenRegistry, TokenRegistry};
pub use scope::{
    RequiredScope, ScopeRequirement, UMA_AUTHORIZATION_SCOPE, UMA_PROTECTION_SCOPE,
    UmaAuthorizationScope, UmaProtectionScope,
};
pub use validator::TokenValidator;
