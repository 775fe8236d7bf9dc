//! # gatehouse-mfa
//!
//! Multifactor trigger resolution.
//!
//! Given an authenticated principal and the service it is trying to reach,
//! decide whether an additional factor must be enforced. A service's
//! [`MultifactorPolicy`](gatehouse_core::MultifactorPolicy) names principal
//! attributes and a value pattern; if any value of any named attribute
//! matches, the policy's providers (restricted to the ones currently
//! registered) are handed to a [`ProviderSelector`].
//!
//! ## Components
//!
//! | Component | Role |
//! |-----------|------|
//! | [`AttributeMatcher`] | principal attributes x trigger names x pattern -> matched names |
//! | [`ProviderSelector`] | candidate providers -> providers to activate |
//! | [`ProviderRegistry`] | which providers currently exist |
//! | [`PatternCache`] | compiled trigger patterns, shared across resolutions |
//! | [`PolicyResolver`] | the decision itself |
//!
//! Incomplete or absent policy data is a normal negative outcome
//! ([`Resolution::not_triggered`]); only a pattern that does not compile is
//! an error.

pub mod error;
pub mod matcher;
pub mod pattern;
pub mod registry;
pub mod resolver;
pub mod selector;

pub use error::{ResolveError, SelectionError};
pub use matcher::{AttributeMatch, AttributeMatcher};
pub use pattern::PatternCache;
pub use registry::{ProviderRegistry, StaticProviderRegistry};
pub use resolver::{PolicyResolver, Resolution};
pub use selector::{
    AllProvidersSelector, LexicalProviderSelector, ProviderSelector, RankedProviderSelector,
    selector_for,
};
