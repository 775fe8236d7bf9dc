//! # gatehouse-core
//!
//! Shared vocabulary for the gatehouse decision engine.
//!
//! The two decision pipelines (multifactor trigger resolution in
//! `gatehouse-mfa`, bearer token validation in `gatehouse-token`) share no
//! runtime state. They only share the types defined here:
//!
//! | Type | Produced by | Consumed by |
//! |------|-------------|-------------|
//! | [`Principal`] / [`Authentication`] | upstream authentication | resolver, profile builder |
//! | [`RegisteredService`] / [`MultifactorPolicy`] | service registry | resolver |
//! | [`AccessToken`] | token issuance / registry | token validator |
//! | [`Profile`] | profile builder | calling layer |
//!
//! None of these are mutated by the engine.

// Configuration types loaded from gatehouse.yaml
pub mod config;

pub mod principal;
pub mod service;
pub mod token;

pub use config::{
    AuditConfig, ConfigError, ConfigFinding, GatehouseConfig, PatternCacheConfig,
    ProviderConfig, SelectionConfig, SelectionStrategy, Severity,
};
pub use principal::{AttributeValues, Attributes, Authentication, Principal};
pub use service::{MultifactorPolicy, RegisteredService};
pub use token::{ACCESS_TOKEN_ATTRIBUTE, AccessToken, Profile, ProfileAttribute};
