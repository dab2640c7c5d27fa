//! Errors

use foundry_app::integrations::UpstreamError;
use salvo::http::StatusError;
use tracing::error;

pub(crate) fn into_status_error(error: UpstreamError) -> StatusError {
    error!("mailing list request failed: {error}");

    StatusError::bad_gateway().brief("Mailing list unavailable")
}
