//! Identifier types for groupgate.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A chat-platform member identifier.
///
/// Member IDs are assigned by the chat platform and arrive either as JSON
/// numbers (platform updates) or as decimal strings (payment-provider
/// metadata). The newtype keeps them from being confused with other integers
/// such as group chat IDs.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(i64);

impl MemberId {
    /// Create a member ID from the platform's raw integer.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Return the raw platform integer.
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }

    /// Return the big-endian byte encoding, used as a storage key.
    #[must_use]
    pub fn to_be_bytes(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }

    /// Decode a member ID from its big-endian byte encoding.
    ///
    /// # Errors
    ///
    /// Returns [`IdError::InvalidKey`] if `bytes` is not exactly 8 bytes.
    pub fn from_be_bytes(bytes: &[u8]) -> Result<Self, IdError> {
        let raw: [u8; 8] = bytes.try_into().map_err(|_| IdError::InvalidKey)?;
        Ok(Self(i64::from_be_bytes(raw)))
    }
}

impl FromStr for MemberId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(Self).map_err(|_| IdError::InvalidMemberId)
    }
}

impl From<i64> for MemberId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Debug for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MemberId({})", self.0)
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors that can occur when parsing identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    /// The input is not a valid decimal member ID.
    #[error("invalid member id")]
    InvalidMemberId,

    /// A storage key had the wrong length.
    #[error("invalid member key encoding")]
    InvalidKey,
}
