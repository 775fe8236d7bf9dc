//! Error types for multifactor trigger resolution.

use thiserror::Error;

/// Errors that abort a resolution attempt.
///
/// These are configuration errors: the service's policy data is malformed.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The policy's value pattern is not a valid regular expression.
    #[error("invalid multifactor trigger pattern '{pattern}' for service '{service}': {source}")]
    InvalidPattern {
        service: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Errors raised by provider selection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    /// No candidate provider is left to choose from.
    #[error("no multifactor provider is available for service '{service}'")]
    NoProviderAvailable { service: String },
}
