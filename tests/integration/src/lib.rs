//! Integration tests for imbo-auth.
//!
//! These tests check the signer against an independent recomputation of the
//! credentials, done the way a verifying Imbo server does it: strip the
//! credential from the request, rebuild the signed bytes and compare digests.

use std::sync::Once;

use hmac::{Hmac, KeyInit, Mac};
use sha2::Sha256;

#[cfg(test)]
mod test_access_token;
#[cfg(test)]
mod test_signature;

static INIT: Once = Once::new();

/// Initialize tracing (once).
pub fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Lowercase hex HMAC-SHA256, computed without going through `imbo-auth`.
#[must_use]
pub fn reference_digest(private_key: &str, data: &str) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(private_key.as_bytes())
        .expect("HMAC can accept keys of any length");
    mac.update(data.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Remove the first `name=value` pair from the query string, the way the
/// server does before recomputing a digest.
#[must_use]
pub fn remove_param(uri: &str, name: &str) -> (String, Option<String>) {
    let Some((base, query)) = uri.split_once('?') else {
        return (uri.to_owned(), None);
    };

    let mut value = None;
    let kept: Vec<&str> = query
        .split('&')
        .filter(|pair| match pair.split_once('=') {
            Some((key, v)) if key == name && value.is_none() => {
                value = Some(v.to_owned());
                false
            }
            _ => true,
        })
        .collect();

    if kept.is_empty() {
        (base.to_owned(), value)
    } else {
        (format!("{base}?{}", kept.join("&")), value)
    }
}

/// Check an access-token URI the way the server would: drop the token, trim
/// trailing `&` and `?`, recompute.
#[must_use]
pub fn accepts_access_token(uri: &str, private_key: &str) -> bool {
    let (signed, token) = remove_param(uri, "accessToken");
    let signed = signed.trim_end_matches(['&', '?']);
    token.is_some_and(|token| token == reference_digest(private_key, signed))
}

/// Check signature headers the way the server would.
#[must_use]
pub fn accepts_signature(
    method: &str,
    uri: &str,
    headers: &http::HeaderMap,
    user: &str,
    private_key: &str,
) -> bool {
    let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

    let (Some(signature), Some(timestamp)) = (
        header("x-imbo-authenticate-signature"),
        header("x-imbo-authenticate-timestamp"),
    ) else {
        return false;
    };
    let public_key = header("x-imbo-publickey").unwrap_or(user);

    let payload = format!("{method}|{uri}|{public_key}|{timestamp}");
    signature == reference_digest(private_key, &payload)
}
