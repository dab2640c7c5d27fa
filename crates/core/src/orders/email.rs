//! Email addresses.

use std::{fmt, str::FromStr, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Local part, single @, dotted domain with a 2+ letter TLD.
static EMAIL_PATTERN: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*\.[A-Za-z]{2,}$").ok()
});

/// Errors raised when parsing an email address.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EmailAddressError {
    /// The value is not a syntactically valid address.
    #[error("`{0}` is not a valid email address")]
    Invalid(String),
}

/// A syntactically valid email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Parse and validate an address.
    ///
    /// # Errors
    ///
    /// Returns [`EmailAddressError::Invalid`] if `value` is not a valid address.
    pub fn parse(value: impl Into<String>) -> Result<Self, EmailAddressError> {
        let value = value.into();

        if is_valid_email(&value) {
            Ok(Self(value))
        } else {
            Err(EmailAddressError::Invalid(value))
        }
    }

    /// The address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Returns true if `value` looks like an email address.
pub fn is_valid_email(value: &str) -> bool {
    value.len() <= 254
        && EMAIL_PATTERN
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(value))
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EmailAddress {
    type Err = EmailAddressError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = EmailAddressError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}
