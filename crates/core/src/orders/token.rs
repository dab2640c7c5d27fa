//! Download tokens.

use std::fmt;

use rand::{RngCore, rngs::OsRng};
use serde::{Deserialize, Serialize};

/// Number of random bytes in a generated token.
pub const DOWNLOAD_TOKEN_BYTES: usize = 32;

/// Opaque capability string granting access to an order's files.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DownloadToken(String);

impl DownloadToken {
    /// Generate a fresh token from the operating system RNG.
    #[must_use]
    pub fn generate() -> Self {
        let mut secret = [0_u8; DOWNLOAD_TOKEN_BYTES];

        OsRng.fill_bytes(&mut secret);

        Self(hex::encode(secret))
    }

    /// Wrap an existing token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exact comparison against a presented token.
    pub fn matches(&self, presented: &str) -> bool {
        self.0 == presented
    }

    /// Consume the wrapper, returning the inner string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for DownloadToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DownloadToken(**redacted**)")
    }
}

impl From<String> for DownloadToken {
    fn from(value: String) -> Self {
        Self(value)
    }
}
