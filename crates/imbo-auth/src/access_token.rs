//! Access tokens for read requests.
//!
//! An access token is the lowercase hex HMAC-SHA256 of the complete request
//! URI, keyed with the private key, and appended as the last query parameter:
//!
//! ```text
//! http://imbo/users/user1/images/abc123.png?t[]=thumbnail&accessToken=<64 hex chars>
//! ```
//!
//! When the public key differs from the user, `publicKey=<key>` must be part
//! of the signed URI so the server knows which private key to verify with.

use tracing::debug;

use crate::canonical::{
    append_query_param, has_query_param, hmac_sha256_hex, trim_query_separators,
    validate_absolute_uri,
};
use crate::credentials::ensure_identity;
use crate::error::{AuthError, AuthResult};

/// Query parameter carrying the access token.
pub const ACCESS_TOKEN_PARAM: &str = "accessToken";

/// Query parameter announcing a public key that differs from the user.
pub const PUBLIC_KEY_PARAM: &str = "publicKey";

/// Derive the access-token URI for `resource_uri`.
///
/// The existing query string is signed as given, minus any trailing `&` or
/// `?`. If `public_key` differs from `user` and the URI carries no `publicKey`
/// parameter yet, one is appended before signing.
///
/// # Errors
///
/// Returns an [`AuthError`] if the private key, user or public key is empty,
/// if `resource_uri` is not an absolute URI, or if it already carries an
/// `accessToken` parameter.
///
/// # Examples
///
/// ```
/// use imbo_auth::derive_access_token;
///
/// let uri = derive_access_token(
///     "user1",
///     "user1",
///     "secret",
///     "http://imbo/users/user1/images/abc123.png?t[]=thumbnail",
/// )
/// .unwrap();
/// assert_eq!(
///     uri,
///     "http://imbo/users/user1/images/abc123.png?t[]=thumbnail\
///      &accessToken=1b91d33f20aa106907b321a85d964642104fb37f95de38d3cd45652011cc508f"
/// );
/// ```
pub fn derive_access_token(
    user: &str,
    public_key: &str,
    private_key: &str,
    resource_uri: &str,
) -> AuthResult<String> {
    if private_key.is_empty() {
        return Err(AuthError::EmptyPrivateKey);
    }
    ensure_identity("user", user)?;
    ensure_identity("public key", public_key)?;
    validate_absolute_uri(resource_uri)?;
    if has_query_param(resource_uri, ACCESS_TOKEN_PARAM) {
        return Err(AuthError::AccessTokenPresent);
    }

    let signed_uri = with_public_key(user, public_key, trim_query_separators(resource_uri));
    let token = hmac_sha256_hex(private_key, &signed_uri)?;

    debug!(
        user = %user,
        public_key = %public_key,
        uri = %signed_uri,
        "Derived access token"
    );

    Ok(append_query_param(&signed_uri, ACCESS_TOKEN_PARAM, &token))
}

/// Add `publicKey=<public_key>` to the URI for delegated keys, unless present.
pub(crate) fn with_public_key(user: &str, public_key: &str, resource_uri: &str) -> String {
    if user == public_key || has_query_param(resource_uri, PUBLIC_KEY_PARAM) {
        resource_uri.to_owned()
    } else {
        append_query_param(resource_uri, PUBLIC_KEY_PARAM, public_key)
    }
}
