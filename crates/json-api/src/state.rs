//! State

use std::sync::Arc;

use foundry_app::context::AppContext;

use crate::auth::ApiTokenDigest;

#[derive(Clone)]
pub(crate) struct State {
    pub(crate) app: AppContext,

    /// Digest of the bearer token accepted on service routes
    pub(crate) api_token: ApiTokenDigest,

    /// ISO 4217 code for formatted totals
    pub(crate) currency: String,
}

impl State {
    #[must_use]
    pub(crate) fn new(app: AppContext, api_token: ApiTokenDigest, currency: String) -> Self {
        Self {
            app,
            api_token,
            currency,
        }
    }

    #[must_use]
    pub(crate) fn shared(
        app: AppContext,
        api_token: ApiTokenDigest,
        currency: String,
    ) -> Arc<Self> {
        Arc::new(Self::new(app, api_token, currency))
    }
}
