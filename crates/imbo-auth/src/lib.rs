//! Pre-shared key request signing for Imbo clients.
//!
//! Imbo authenticates requests without a handshake: client and server share a
//! private key out-of-band, and the client proves it may perform an operation
//! by sending an HMAC-SHA256 digest computed with that key. This crate builds
//! those digests. It never sends requests and never sees the server's answer.
//!
//! # Overview
//!
//! Two credential forms exist:
//!
//! - **Access tokens** for read requests: the digest of the full request URI,
//!   appended as an `accessToken` query parameter
//!   ([`derive_access_token`]).
//! - **Signatures** for write requests: the digest of
//!   `METHOD|URI|public key|timestamp`, sent in the
//!   `X-Imbo-Authenticate-Signature` and `X-Imbo-Authenticate-Timestamp`
//!   headers ([`derive_signature_headers`]).
//!
//! When the presented public key differs from the user owning the resources,
//! the public key is announced as well (`publicKey` query parameter or
//! `X-Imbo-PublicKey` header).
//!
//! # Usage
//!
//! ```rust
//! use imbo_auth::{Credentials, RequestSigner, Timestamp};
//!
//! let signer = RequestSigner::new(Credentials::new("user1", "reader", "secret").unwrap());
//!
//! // Read access through a signed URL.
//! let url = signer
//!     .sign_url("http://imbo/users/user1/images/abc123.png?t[]=thumbnail")
//!     .unwrap();
//! assert!(url.contains("&publicKey=reader&accessToken="));
//!
//! // Write access through signature headers.
//! let headers = signer
//!     .signature_headers(
//!         "DELETE",
//!         "http://imbo/users/user1/images/abc123",
//!         &Timestamp::parse("2024-01-01T00:00:00Z").unwrap(),
//!     )
//!     .unwrap();
//! assert_eq!(headers.public_key(), Some("reader"));
//! ```
//!
//! # Modules
//!
//! - [`access_token`] - Access tokens for read requests
//! - [`canonical`] - Signed payload construction and URI helpers
//! - [`config`] - Environment and JSON driven signer configuration
//! - [`credentials`] - The user, public key and private key triple
//! - [`error`] - Error types
//! - [`signature`] - Signature headers for write requests
//! - [`signer`] - The [`RequestSigner`] façade
//! - [`timestamp`] - Strict UTC timestamps

pub mod access_token;
pub mod canonical;
pub mod config;
pub mod credentials;
pub mod error;
pub mod signature;
pub mod signer;
pub mod timestamp;

pub use access_token::derive_access_token;
pub use config::SignerConfig;
pub use credentials::Credentials;
pub use error::{AuthError, AuthResult};
pub use signature::{SignatureHeaders, derive_signature_headers, derive_signature_headers_at};
pub use signer::RequestSigner;
pub use timestamp::Timestamp;
