//! Ensure Studio Tag Handler

use salvo::{oapi::extract::PathParam, prelude::*};

use crate::{extensions::*, newsletter::errors::into_status_error};

/// Ensure Studio Tag Handler
///
/// Creates the studio's mailing list tag if it does not exist yet.
#[endpoint(
    tags("newsletter"),
    summary = "Ensure Studio Tag",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Tag exists"),
        (status_code = StatusCode::BAD_REQUEST, description = "Blank studio name"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::BAD_GATEWAY, description = "Mailing list unavailable"),
    ),
)]
pub(crate) async fn handler(
    studio: PathParam<String>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.state()?;
    let studio = studio.into_inner();

    if studio.trim().is_empty() {
        return Err(StatusError::bad_request().brief("Studio name is required"));
    }

    state
        .app
        .mailing_list
        .ensure_tag(studio)
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use foundry_app::integrations::MockMailingList;
    use salvo::test::TestClient;

    use crate::test_helpers::Mocks;

    use super::*;

    #[tokio::test]
    async fn test_ensure_tag_returns_204() {
        let mut mailing_list = MockMailingList::new();

        mailing_list
            .expect_ensure_tag()
            .once()
            .withf(|studio| studio == "north-type")
            .return_once(|_| Ok(()));

        let res = TestClient::put("http://example.com/newsletter/tags/north-type")
            .send(
                &Mocks {
                    mailing_list,
                    ..Mocks::default()
                }
                .service(Router::with_path("newsletter/tags/{studio}").put(handler)),
            )
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NO_CONTENT));
    }
}
