//! Service authentication

pub(crate) mod middleware;

use std::fmt;

use sha2::{Digest, Sha256};

/// SHA-256 digest of the configured service token.
///
/// Presented tokens are hashed before they are compared.
#[derive(Clone, PartialEq, Eq)]
pub(crate) struct ApiTokenDigest([u8; 32]);

impl ApiTokenDigest {
    pub(crate) fn new(token: &str) -> Self {
        Self(Sha256::digest(token.as_bytes()).into())
    }

    pub(crate) fn matches(&self, presented: &str) -> bool {
        *self == Self::new(presented)
    }
}

impl fmt::Debug for ApiTokenDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiTokenDigest(**redacted**)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_configured_token_matches() {
        let digest = ApiTokenDigest::new("service-token");

        assert!(digest.matches("service-token"), "configured token");
        assert!(!digest.matches("service-token "), "trailing space");
        assert!(!digest.matches(""), "empty token");
    }

    #[test]
    fn debug_output_is_redacted() {
        assert_eq!(
            format!("{:?}", ApiTokenDigest::new("service-token")),
            "ApiTokenDigest(**redacted**)"
        );
    }
}
