//! Signatures for write requests.
//!
//! Mutating requests (`PUT`, `POST`, `DELETE`) are authenticated with an
//! HMAC-SHA256 signature over:
//!
//! ```text
//! <METHOD>|<resource URI>|<public key>|<timestamp>
//! ```
//!
//! The signature and the signed timestamp travel in the
//! `X-Imbo-Authenticate-Signature` and `X-Imbo-Authenticate-Timestamp`
//! headers. A public key that differs from the user is announced with
//! `X-Imbo-PublicKey`. The server also accepts the signature and timestamp as
//! `signature` and `timestamp` query parameters; see
//! [`SignatureHeaders::append_to_uri`].

use http::{HeaderMap, HeaderName, HeaderValue};
use tracing::debug;

use crate::canonical::{
    append_query_param, build_signature_payload, hmac_sha256_hex, validate_absolute_uri,
};
use crate::credentials::ensure_identity;
use crate::error::{AuthError, AuthResult};
use crate::timestamp::Timestamp;

/// Header carrying the hex signature.
pub const SIGNATURE_HEADER: &str = "X-Imbo-Authenticate-Signature";

/// Header carrying the signed timestamp.
pub const TIMESTAMP_HEADER: &str = "X-Imbo-Authenticate-Timestamp";

/// Header announcing a public key that differs from the user.
pub const PUBLIC_KEY_HEADER: &str = "X-Imbo-PublicKey";

/// Query parameter carrying the signature in the query-based variant.
pub const SIGNATURE_PARAM: &str = "signature";

/// Query parameter carrying the timestamp in the query-based variant.
pub const TIMESTAMP_PARAM: &str = "timestamp";

/// The credential set for one signed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeaders {
    signature: String,
    timestamp: Timestamp,
    public_key: Option<String>,
}

impl SignatureHeaders {
    /// The lowercase hex HMAC-SHA256 signature.
    #[must_use]
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// The timestamp that was signed.
    #[must_use]
    pub fn timestamp(&self) -> &Timestamp {
        &self.timestamp
    }

    /// The public key to announce, present only for delegated keys.
    #[must_use]
    pub fn public_key(&self) -> Option<&str> {
        self.public_key.as_deref()
    }

    /// Iterate over `(header name, value)` pairs in a fixed order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            Some((SIGNATURE_HEADER, self.signature.as_str())),
            Some((TIMESTAMP_HEADER, self.timestamp.as_str())),
            self.public_key.as_deref().map(|key| (PUBLIC_KEY_HEADER, key)),
        ]
        .into_iter()
        .flatten()
    }

    /// Insert the headers into `headers`, replacing any previous values.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidHeaderValue`] if the public key contains
    /// bytes that are not allowed in a header value.
    pub fn apply_to(&self, headers: &mut HeaderMap) -> AuthResult<()> {
        // Validate everything first so a failure leaves `headers` unchanged.
        let entries = self
            .iter()
            .map(|(name, value)| {
                let header = HeaderName::from_bytes(name.as_bytes())
                    .map_err(|_| AuthError::InvalidHeaderValue(name))?;
                let value = HeaderValue::from_str(value)
                    .map_err(|_| AuthError::InvalidHeaderValue(name))?;
                Ok((header, value))
            })
            .collect::<AuthResult<Vec<_>>>()?;

        for (header, value) in entries {
            headers.insert(header, value);
        }
        Ok(())
    }

    /// Append the query-based form of the credentials to `signed_uri`.
    ///
    /// `signed_uri` must be the resource URI that was signed. The public key is
    /// not added here: for the query variant it has to be part of the signed
    /// URI already.
    #[must_use]
    pub fn append_to_uri(&self, signed_uri: &str) -> String {
        let uri = append_query_param(signed_uri, SIGNATURE_PARAM, &self.signature);
        append_query_param(&uri, TIMESTAMP_PARAM, self.timestamp.as_str())
    }
}

/// Derive the signature headers for a write request.
///
/// # Errors
///
/// Returns an [`AuthError`] if the method is empty or not a valid HTTP token,
/// if the private key, user or public key is empty, if the timestamp is not
/// `YYYY-MM-DDTHH:MM:SSZ`, or if `resource_uri` is not an absolute URI.
///
/// # Examples
///
/// ```
/// use imbo_auth::derive_signature_headers;
///
/// let headers = derive_signature_headers(
///     "DELETE",
///     "http://imbo/users/user1/images/abc123",
///     "user1",
///     "user1",
///     "secret",
///     "2024-01-01T00:00:00Z",
/// )
/// .unwrap();
/// assert_eq!(
///     headers.signature(),
///     "622a914e257747964c896a59846b7d29b4941782ab68d9094bb0808cf1529895"
/// );
/// assert_eq!(headers.public_key(), None);
/// ```
pub fn derive_signature_headers(
    method: &str,
    resource_uri: &str,
    user: &str,
    public_key: &str,
    private_key: &str,
    timestamp: &str,
) -> AuthResult<SignatureHeaders> {
    let timestamp = Timestamp::parse(timestamp)?;
    sign(method, resource_uri, user, public_key, private_key, timestamp)
}

/// Same as [`derive_signature_headers`] for an already validated timestamp.
pub fn derive_signature_headers_at(
    method: &str,
    resource_uri: &str,
    user: &str,
    public_key: &str,
    private_key: &str,
    timestamp: &Timestamp,
) -> AuthResult<SignatureHeaders> {
    sign(
        method,
        resource_uri,
        user,
        public_key,
        private_key,
        timestamp.clone(),
    )
}

fn sign(
    method: &str,
    resource_uri: &str,
    user: &str,
    public_key: &str,
    private_key: &str,
    timestamp: Timestamp,
) -> AuthResult<SignatureHeaders> {
    validate_method(method)?;
    if private_key.is_empty() {
        return Err(AuthError::EmptyPrivateKey);
    }
    ensure_identity("user", user)?;
    ensure_identity("public key", public_key)?;
    validate_absolute_uri(resource_uri)?;

    let payload = build_signature_payload(method, resource_uri, public_key, timestamp.as_str());

    debug!(payload = %payload, "Built signature payload");

    let signature = hmac_sha256_hex(private_key, &payload)?;
    let public_key = (user != public_key).then(|| public_key.to_owned());

    debug!(
        method,
        user = %user,
        delegated = public_key.is_some(),
        "Derived signature headers"
    );

    Ok(SignatureHeaders {
        signature,
        timestamp,
        public_key,
    })
}

/// The method is signed verbatim, so it only has to be a non-empty HTTP token.
fn validate_method(method: &str) -> AuthResult<()> {
    if method.is_empty() {
        return Err(AuthError::EmptyMethod);
    }
    http::Method::from_bytes(method.as_bytes())
        .map_err(|_| AuthError::InvalidMethod(method.to_owned()))?;
    Ok(())
}
