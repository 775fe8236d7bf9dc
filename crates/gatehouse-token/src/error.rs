//! Error types for token validation.

use thiserror::Error;

/// Errors reported to callers of token validation.
///
/// Raw token values are never part of these messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// The token is unknown or expired. Both cases share this variant.
    #[error("access token is not found or has expired")]
    NotFoundOrExpired,

    /// The token does not carry the scope the endpoint requires.
    #[error("missing scope [{required_scope}]")]
    InsufficientScope { required_scope: String },
}
