//! Error types for request signing.
//!
//! Signing performs no I/O, so the only way it can fail is a malformed input.
//! Every [`AuthError`] variant describes one such invalid argument and is raised
//! synchronously, before any keyed hash is computed.

/// Invalid input passed to one of the signing operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The private key is empty.
    #[error("Private key must not be empty")]
    EmptyPrivateKey,

    /// The private key was rejected by the HMAC implementation.
    #[error("Private key cannot be used as an HMAC key")]
    InvalidPrivateKey,

    /// The HTTP method is empty.
    #[error("HTTP method must not be empty")]
    EmptyMethod,

    /// The HTTP method is not a valid token.
    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    /// A user or public key is empty. Carries the name of the field.
    #[error("{0} must not be empty")]
    EmptyIdentity(&'static str),

    /// The resource URI is not a valid absolute URI.
    #[error("Invalid resource URI: {0}")]
    InvalidUri(String),

    /// The timestamp does not match `YYYY-MM-DDTHH:MM:SSZ`.
    #[error("Invalid timestamp: {0} (expected YYYY-MM-DDTHH:MM:SSZ)")]
    InvalidTimestamp(String),

    /// The URI to sign already carries an `accessToken` parameter.
    #[error("Resource URI already contains an accessToken parameter")]
    AccessTokenPresent,

    /// A derived value cannot be represented as an HTTP header value.
    #[error("Invalid header value for {0}")]
    InvalidHeaderValue(&'static str),

    /// Signer configuration is missing or incomplete.
    #[error("Configuration error: {0}")]
    InvalidConfig(String),
}

/// Convenience result type for signing operations.
pub type AuthResult<T> = Result<T, AuthError>;
