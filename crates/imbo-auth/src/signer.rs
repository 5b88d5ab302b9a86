//! The [`RequestSigner`] façade.
//!
//! Binds one set of [`Credentials`] to the access token and signature
//! operations, and applies them to [`http::Request`] values. The signer holds
//! no mutable state and can be shared freely between threads.

use tracing::debug;

use crate::access_token::{derive_access_token, with_public_key};
use crate::canonical::trim_query_separators;
use crate::config::SignerConfig;
use crate::credentials::Credentials;
use crate::error::AuthResult;
use crate::signature::{SignatureHeaders, derive_signature_headers_at};
use crate::timestamp::Timestamp;

/// Signs request URIs and requests with a fixed set of credentials.
///
/// # Examples
///
/// ```
/// use imbo_auth::{Credentials, RequestSigner, Timestamp};
///
/// let signer = RequestSigner::new(Credentials::for_user("user1", "secret").unwrap());
/// let timestamp = Timestamp::parse("2024-01-01T00:00:00Z").unwrap();
///
/// let mut request = http::Request::delete("http://imbo/users/user1/images/abc123")
///     .body(())
///     .unwrap();
/// signer.sign_request(&mut request, &timestamp).unwrap();
///
/// assert_eq!(
///     request.headers()["x-imbo-authenticate-signature"],
///     "622a914e257747964c896a59846b7d29b4941782ab68d9094bb0808cf1529895"
/// );
/// assert!(request.headers().get("x-imbo-publickey").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct RequestSigner {
    credentials: Credentials,
}

impl RequestSigner {
    /// Create a signer for the given credentials.
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    /// Create a signer from a [`SignerConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::AuthError::InvalidConfig`] if user or private key is missing.
    pub fn from_config(config: &SignerConfig) -> AuthResult<Self> {
        Ok(Self::new(config.credentials()?))
    }

    /// The credentials used by this signer.
    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Append an access token to `resource_uri` (for `GET` and `HEAD` requests).
    ///
    /// # Errors
    ///
    /// See [`derive_access_token`].
    pub fn sign_url(&self, resource_uri: &str) -> AuthResult<String> {
        derive_access_token(
            self.credentials.user(),
            self.credentials.public_key(),
            self.credentials.private_key(),
            resource_uri,
        )
    }

    /// Derive the signature headers for a write request.
    ///
    /// # Errors
    ///
    /// See [`crate::derive_signature_headers`].
    pub fn signature_headers(
        &self,
        method: &str,
        resource_uri: &str,
        timestamp: &Timestamp,
    ) -> AuthResult<SignatureHeaders> {
        derive_signature_headers_at(
            method,
            resource_uri,
            self.credentials.user(),
            self.credentials.public_key(),
            self.credentials.private_key(),
            timestamp,
        )
    }

    /// Sign a write request with query parameters instead of headers.
    ///
    /// Trailing `&` and `?` are dropped and a delegated public key is added to
    /// the URI as `publicKey` before signing, then `signature` and `timestamp`
    /// are appended.
    ///
    /// # Errors
    ///
    /// Same as [`Self::signature_headers`].
    pub fn sign_url_query(
        &self,
        method: &str,
        resource_uri: &str,
        timestamp: &Timestamp,
    ) -> AuthResult<String> {
        let signed_uri = with_public_key(
            self.credentials.user(),
            self.credentials.public_key(),
            trim_query_separators(resource_uri),
        );
        let headers = self.signature_headers(method, &signed_uri, timestamp)?;
        Ok(headers.append_to_uri(&signed_uri))
    }

    /// Sign `request` in place using its own method and URI.
    ///
    /// The URI is signed as rendered by [`http::Uri`]'s `Display`, so it must be
    /// absolute. Existing authentication headers are replaced.
    ///
    /// # Errors
    ///
    /// Returns an [`crate::AuthError`] if signing fails or a header value cannot
    /// be represented. The request is left untouched on error.
    pub fn sign_request<B>(
        &self,
        request: &mut http::Request<B>,
        timestamp: &Timestamp,
    ) -> AuthResult<SignatureHeaders> {
        let uri = request.uri().to_string();
        let headers = self.signature_headers(request.method().as_str(), &uri, timestamp)?;
        headers.apply_to(request.headers_mut())?;

        debug!(
            method = %request.method(),
            uri = %uri,
            "Signed request headers"
        );

        Ok(headers)
    }
}
