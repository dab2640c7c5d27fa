//! Auth Config

use std::fmt;

use clap::Args;

/// Service authentication settings.
#[derive(Args)]
pub struct AuthConfig {
    /// Bearer token accepted on service routes
    #[arg(long, env = "API_TOKEN", hide_env_values = true)]
    pub api_token: String,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("api_token", &"**redacted**")
            .finish()
    }
}
