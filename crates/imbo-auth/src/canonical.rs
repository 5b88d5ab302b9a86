//! Construction of the bytes that get signed.
//!
//! Two strings are ever signed:
//!
//! ```text
//! access token:  <resource URI, including its query string>
//! signature:     <METHOD>|<resource URI>|<public key>|<timestamp>
//! ```
//!
//! The resource URI is used exactly as given. Query parameters are never
//! reordered, decoded, or re-encoded, because the server signs the URI it
//! receives byte for byte. Values this crate appends itself are percent-encoded
//! with the RFC 3986 unreserved set.

use hmac::{Hmac, KeyInit, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use sha2::Sha256;

use crate::error::{AuthError, AuthResult};

type HmacSha256 = Hmac<Sha256>;

/// Separator between the fields of the signature payload.
pub const PAYLOAD_SEPARATOR: char = '|';

/// Characters percent-encoded in query values appended by the signer.
///
/// Everything except the unreserved characters (`A-Z`, `a-z`, `0-9`, `-`,
/// `_`, `.`, `~`) is encoded.
const QUERY_VALUE_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Build the signature payload from its four fields.
///
/// # Examples
///
/// ```
/// use imbo_auth::canonical::build_signature_payload;
///
/// let payload = build_signature_payload(
///     "DELETE",
///     "http://imbo/users/user1/images/abc123",
///     "user1",
///     "2024-01-01T00:00:00Z",
/// );
/// assert_eq!(
///     payload,
///     "DELETE|http://imbo/users/user1/images/abc123|user1|2024-01-01T00:00:00Z"
/// );
/// ```
#[must_use]
pub fn build_signature_payload(
    method: &str,
    resource_uri: &str,
    public_key: &str,
    timestamp: &str,
) -> String {
    [method, resource_uri, public_key, timestamp].join(&PAYLOAD_SEPARATOR.to_string())
}

/// Check that `uri` is an absolute URI (scheme and authority present).
///
/// Only the part before `?` is handed to [`http::Uri`]; the query string is
/// accepted as-is as long as it contains no whitespace or control characters,
/// since image transformation queries use characters such as `[` and `]`.
///
/// # Examples
///
/// ```
/// use imbo_auth::canonical::validate_absolute_uri;
///
/// assert!(validate_absolute_uri("http://imbo/users/u/images/i.png?t[]=thumbnail").is_ok());
/// assert!(validate_absolute_uri("/users/u/images/i.png").is_err());
/// ```
pub fn validate_absolute_uri(uri: &str) -> AuthResult<()> {
    let invalid = || AuthError::InvalidUri(uri.to_owned());

    if uri.is_empty() || uri.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(invalid());
    }

    let (base, _query) = split_query(uri);
    let parsed: http::Uri = base.parse().map_err(|_| invalid())?;
    if parsed.scheme().is_none() || parsed.authority().is_none() {
        return Err(invalid());
    }

    Ok(())
}

/// Drop trailing `&` and `?` characters from `uri`.
///
/// A credential carried in the query string is removed by the server before it
/// recomputes the digest, and the server trims these characters from what is
/// left. URIs signed for the query-carried variants must end the same way.
///
/// # Examples
///
/// ```
/// use imbo_auth::canonical::trim_query_separators;
///
/// assert_eq!(trim_query_separators("http://imbo/x?t[]=a&"), "http://imbo/x?t[]=a");
/// assert_eq!(trim_query_separators("http://imbo/x?"), "http://imbo/x");
/// assert_eq!(trim_query_separators("http://imbo/x"), "http://imbo/x");
/// ```
#[must_use]
pub fn trim_query_separators(uri: &str) -> &str {
    uri.trim_end_matches(['&', '?'])
}

/// Split a URI into the part before `?` and the query string, if any.
#[must_use]
pub fn split_query(uri: &str) -> (&str, Option<&str>) {
    match uri.split_once('?') {
        Some((base, query)) => (base, Some(query)),
        None => (uri, None),
    }
}

/// Whether the query string of `uri` has a parameter named `name`.
#[must_use]
pub fn has_query_param(uri: &str, name: &str) -> bool {
    query_param(uri, name).is_some()
}

/// The raw (still encoded) value of the first parameter named `name`.
#[must_use]
pub fn query_param<'a>(uri: &'a str, name: &str) -> Option<&'a str> {
    let (_, query) = split_query(uri);
    query?
        .split('&')
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

/// Append `name=value` to the query string of `uri`.
///
/// The value is percent-encoded; `name` is appended verbatim. Uses `?` when
/// the URI has no query string yet and `&` otherwise.
///
/// # Examples
///
/// ```
/// use imbo_auth::canonical::append_query_param;
///
/// assert_eq!(append_query_param("http://imbo/a", "k", "v"), "http://imbo/a?k=v");
/// assert_eq!(append_query_param("http://imbo/a?x=1", "k", "a b"), "http://imbo/a?x=1&k=a%20b");
/// ```
#[must_use]
pub fn append_query_param(uri: &str, name: &str, value: &str) -> String {
    let encoded = utf8_percent_encode(value, QUERY_VALUE_ENCODE_SET);
    let separator = match split_query(uri) {
        (_, None) => Some('?'),
        (_, Some(query)) if query.is_empty() || query.ends_with('&') => None,
        (_, Some(_)) => Some('&'),
    };

    let mut result = String::with_capacity(uri.len() + name.len() + value.len() + 2);
    result.push_str(uri);
    if let Some(separator) = separator {
        result.push(separator);
    }
    result.push_str(name);
    result.push('=');
    result.extend(encoded);
    result
}

/// Remove every `name=...` parameter from the query string of `uri`.
///
/// The remaining parameters keep their order and encoding. A query string left
/// empty is dropped together with its `?`.
///
/// # Examples
///
/// ```
/// use imbo_auth::canonical::strip_query_param;
///
/// assert_eq!(
///     strip_query_param("http://imbo/a?t[]=x&accessToken=abc", "accessToken"),
///     "http://imbo/a?t[]=x"
/// );
/// assert_eq!(strip_query_param("http://imbo/a?accessToken=abc", "accessToken"), "http://imbo/a");
/// ```
#[must_use]
pub fn strip_query_param(uri: &str, name: &str) -> String {
    let (base, Some(query)) = split_query(uri) else {
        return uri.to_owned();
    };

    let kept: Vec<&str> = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| pair.split_once('=').map_or(*pair, |(key, _)| key) != name)
        .collect();

    if kept.is_empty() {
        base.to_owned()
    } else {
        format!("{base}?{}", kept.join("&"))
    }
}

/// Compute HMAC-SHA256 of `data` keyed with `key`, hex-encoded in lowercase.
///
/// # Errors
///
/// Returns [`AuthError::EmptyPrivateKey`] for an empty key, or
/// [`AuthError::InvalidPrivateKey`] if the HMAC implementation rejects it.
///
/// # Examples
///
/// ```
/// use imbo_auth::canonical::hmac_sha256_hex;
///
/// let digest = hmac_sha256_hex("key", "The quick brown fox jumps over the lazy dog").unwrap();
/// assert_eq!(digest, "f7bc83f430538424b13298e6aa6fb143ef4d59a14946175997479dbc2d1a3cd8");
/// ```
pub fn hmac_sha256_hex(key: &str, data: &str) -> AuthResult<String> {
    if key.is_empty() {
        return Err(AuthError::EmptyPrivateKey);
    }
    let mut mac =
        HmacSha256::new_from_slice(key.as_bytes()).map_err(|_| AuthError::InvalidPrivateKey)?;
    mac.update(data.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}
