//! Credential pair used to sign requests.
//!
//! A [`Credentials`] value binds the user that owns the resources, the public
//! key presented to the server, and the private key shared with the server
//! out-of-band. The public key may be the user itself or a separate key that
//! the user has granted access to.

use std::fmt;

use crate::error::{AuthError, AuthResult};

/// The identity and shared secret used to derive request credentials.
///
/// The private key is never printed: the [`fmt::Debug`] implementation redacts it.
///
/// # Examples
///
/// ```
/// use imbo_auth::Credentials;
///
/// let creds = Credentials::new("user1", "reader", "secret").unwrap();
/// assert!(creds.is_delegated());
/// assert!(!format!("{creds:?}").contains("secret"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    user: String,
    public_key: String,
    private_key: String,
}

impl Credentials {
    /// Create credentials for a public key that may differ from the user.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::EmptyIdentity`] if the user or public key is empty,
    /// or [`AuthError::EmptyPrivateKey`] if the private key is empty.
    pub fn new(
        user: impl Into<String>,
        public_key: impl Into<String>,
        private_key: impl Into<String>,
    ) -> AuthResult<Self> {
        let user = user.into();
        let public_key = public_key.into();
        let private_key = private_key.into();

        ensure_identity("user", &user)?;
        ensure_identity("public key", &public_key)?;
        if private_key.is_empty() {
            return Err(AuthError::EmptyPrivateKey);
        }

        Ok(Self {
            user,
            public_key,
            private_key,
        })
    }

    /// Create credentials where the public key is the user itself.
    pub fn for_user(user: impl Into<String>, private_key: impl Into<String>) -> AuthResult<Self> {
        let user = user.into();
        Self::new(user.clone(), user, private_key)
    }

    /// The user owning the resources being accessed.
    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    /// The public key presented to the server.
    #[must_use]
    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// The shared secret.
    #[must_use]
    pub fn private_key(&self) -> &str {
        &self.private_key
    }

    /// Whether the public key differs from the user.
    ///
    /// Delegated keys must be announced to the server, either as a `publicKey`
    /// query parameter or as the `X-Imbo-PublicKey` header.
    #[must_use]
    pub fn is_delegated(&self) -> bool {
        self.user != self.public_key
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

pub(crate) fn ensure_identity(field: &'static str, value: &str) -> AuthResult<()> {
    if value.is_empty() {
        return Err(AuthError::EmptyIdentity(field));
    }
    Ok(())
}
