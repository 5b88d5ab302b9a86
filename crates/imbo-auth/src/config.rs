//! Signer configuration.
//!
//! Configuration is driven by environment variables (`IMBO_USER`,
//! `IMBO_PUBLIC_KEY`, `IMBO_PRIVATE_KEY`, `LOG_LEVEL`) or deserialized from a
//! camelCase JSON document.

use crate::credentials::Credentials;
use crate::error::{AuthError, AuthResult};

/// Default log filter for tools built on the signer.
const DEFAULT_LOG_LEVEL: &str = "warn";

/// Configuration for a request signer.
///
/// The private key is accepted on deserialization but never serialized back.
#[derive(Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignerConfig {
    /// The user owning the resources.
    pub user: String,
    /// The presented public key. Falls back to `user` when unset.
    pub public_key: Option<String>,
    /// The shared secret.
    #[serde(skip_serializing)]
    pub private_key: String,
    /// Log filter.
    pub log_level: Option<String>,
}

impl SignerConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = lookup("IMBO_USER") {
            config.user = v;
        }
        if let Some(v) = lookup("IMBO_PUBLIC_KEY").filter(|v| !v.is_empty()) {
            config.public_key = Some(v);
        }
        if let Some(v) = lookup("IMBO_PRIVATE_KEY") {
            config.private_key = v;
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            config.log_level = Some(v);
        }

        config
    }

    /// The effective log filter.
    #[must_use]
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    /// The effective public key. An empty value counts as unset.
    #[must_use]
    pub fn public_key(&self) -> &str {
        self.public_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .unwrap_or(&self.user)
    }

    /// Validate the configuration and build [`Credentials`] from it.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidConfig`] naming the missing setting.
    pub fn credentials(&self) -> AuthResult<Credentials> {
        if self.user.is_empty() {
            return Err(AuthError::InvalidConfig("IMBO_USER is not set".to_owned()));
        }
        if self.private_key.is_empty() {
            return Err(AuthError::InvalidConfig(
                "IMBO_PRIVATE_KEY is not set".to_owned(),
            ));
        }
        Credentials::new(
            self.user.clone(),
            self.public_key().to_owned(),
            self.private_key.clone(),
        )
    }
}

impl std::fmt::Debug for SignerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignerConfig")
            .field("user", &self.user)
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .field("log_level", &self.log_level)
            .finish()
    }
}
