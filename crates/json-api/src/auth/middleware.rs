//! Auth middleware.

use salvo::{http::header::AUTHORIZATION, prelude::*};
use tracing::debug;

use crate::extensions::*;

#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Some(token) = extract_bearer_token(req) else {
        res.render(StatusError::unauthorized().brief("Missing or invalid Authorization header"));
        ctrl.skip_rest();

        return;
    };

    let state = match depot.state() {
        Ok(state) => state,
        Err(error) => {
            res.render(error);
            ctrl.skip_rest();

            return;
        }
    };

    if !state.api_token.matches(token) {
        debug!("rejected request with unknown api token");

        res.render(StatusError::unauthorized().brief("Invalid API token"));
        ctrl.skip_rest();

        return;
    }

    ctrl.call_next(req, depot, res).await;
}

fn extract_bearer_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }

    Some(token)
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, TEST_API_TOKEN};

    use super::*;

    #[salvo::handler]
    async fn protected() -> &'static str {
        "inside"
    }

    fn make_service() -> Service {
        Mocks::default().service(Router::new().hoop(handler).get(protected))
    }

    #[tokio::test]
    async fn test_missing_authorization_header_returns_401() {
        let res = TestClient::get("http://example.com")
            .send(&make_service())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
    }

    #[tokio::test]
    async fn test_non_bearer_authorization_header_returns_401() {
        let res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, format!("Basic {TEST_API_TOKEN}"), true)
            .send(&make_service())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
    }

    #[tokio::test]
    async fn test_invalid_token_returns_401() {
        let res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, "Bearer not-the-token", true)
            .send(&make_service())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));
    }

    #[tokio::test]
    async fn test_valid_token_reaches_handler() -> TestResult {
        let mut res = TestClient::get("http://example.com")
            .add_header(AUTHORIZATION, format!("bearer {TEST_API_TOKEN}"), true)
            .send(&make_service())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(res.take_string().await?, "inside");

        Ok(())
    }
}
