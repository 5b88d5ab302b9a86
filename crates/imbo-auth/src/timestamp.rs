//! UTC timestamps in the signed wire format.
//!
//! Signatures cover the timestamp as text, so the server must receive the exact
//! string that was signed. [`Timestamp`] only holds strings of the form
//! `YYYY-MM-DDTHH:MM:SSZ`: second precision, no fractional part, always UTC.

use std::fmt;

use chrono::{DateTime, Datelike, NaiveDateTime, Utc};

use crate::error::{AuthError, AuthResult};

/// `strftime` format of the wire timestamp.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Length of a well-formed timestamp.
const TIMESTAMP_LEN: usize = 20;

/// A validated `YYYY-MM-DDTHH:MM:SSZ` timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Timestamp(String);

impl Timestamp {
    /// Parse and validate a timestamp string.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidTimestamp`] if the string does not have the
    /// exact `YYYY-MM-DDTHH:MM:SSZ` shape or does not name a real instant.
    ///
    /// # Examples
    ///
    /// ```
    /// use imbo_auth::Timestamp;
    ///
    /// assert!(Timestamp::parse("2024-01-01T00:00:00Z").is_ok());
    /// assert!(Timestamp::parse("2024-01-01T00:00:00.5Z").is_err());
    /// assert!(Timestamp::parse("2024-01-01T00:00:00+00:00").is_err());
    /// ```
    pub fn parse(value: &str) -> AuthResult<Self> {
        if !has_wire_shape(value.as_bytes()) {
            return Err(AuthError::InvalidTimestamp(value.to_owned()));
        }
        NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
            .map_err(|_| AuthError::InvalidTimestamp(value.to_owned()))?;
        Ok(Self(value.to_owned()))
    }

    /// Format a point in time, dropping any sub-second part.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidTimestamp`] for years outside `0..=9999`,
    /// which have no four-digit representation.
    pub fn from_datetime(datetime: DateTime<Utc>) -> AuthResult<Self> {
        if !(0..=9999).contains(&datetime.year()) {
            return Err(AuthError::InvalidTimestamp(datetime.to_rfc3339()));
        }
        Ok(Self::format(datetime))
    }

    /// The current time.
    #[must_use]
    pub fn now() -> Self {
        // The current year always has four digits.
        Self::format(Utc::now())
    }

    fn format(datetime: DateTime<Utc>) -> Self {
        Self(datetime.format(TIMESTAMP_FORMAT).to_string())
    }

    /// The timestamp as it is signed and sent.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Timestamp {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<DateTime<Utc>> for Timestamp {
    type Error = AuthError;

    fn try_from(datetime: DateTime<Utc>) -> Result<Self, Self::Error> {
        Self::from_datetime(datetime)
    }
}

/// Check the fixed-width layout before handing the string to chrono, which
/// would otherwise accept unpadded or over-long fields.
fn has_wire_shape(bytes: &[u8]) -> bool {
    bytes.len() == TIMESTAMP_LEN
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            10 => *b == b'T',
            13 | 16 => *b == b':',
            19 => *b == b'Z',
            _ => b.is_ascii_digit(),
        })
}
