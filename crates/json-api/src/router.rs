//! App Router

use std::sync::Arc;

use salvo::{
    affix_state::inject,
    oapi::{
        OpenApi,
        security::{Http, HttpAuthScheme, SecurityScheme},
        swagger_ui::SwaggerUi,
    },
    prelude::*,
    trailing_slash::remove_slash,
};

use crate::{
    auth, checkout, downloads, healthcheck, newsletter,
    observability::{metrics_handler, request_logging},
    orders,
    state::State,
    webhooks,
};

/// Routes that require the service bearer token.
fn service_routes() -> Router {
    Router::new()
        .hoop(auth::middleware::handler)
        .push(Router::with_path("checkout").post(checkout::create::handler))
        .push(Router::with_path("users/{user}/orders").get(orders::index::handler))
        .push(Router::with_path("orders/{order}/status").put(orders::update_status::handler))
        .push(
            Router::with_path("newsletter")
                .push(Router::with_path("subscriptions").post(newsletter::subscribe::handler))
                .push(Router::with_path("tags/{studio}").put(newsletter::tag::handler)),
        )
}

pub(crate) fn app_router(state: Arc<State>) -> Router {
    let router = Router::new()
        .hoop(CatchPanic::new())
        .hoop(request_logging)
        .hoop(remove_slash())
        .hoop(inject(state))
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(Router::with_path("metrics").get(metrics_handler))
        .push(Router::with_path("order/{order}").get(downloads::get::handler))
        .push(Router::with_path("webhooks/stripe").post(webhooks::stripe::handler))
        .push(service_routes());

    let doc = OpenApi::new("Foundry API", env!("CARGO_PKG_VERSION"))
        .add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
        .merge_router(&router);

    router
        .push(doc.into_router("/api-doc/openapi.json"))
        .push(SwaggerUi::new("/api-doc/openapi.json").into_router("docs"))
}

#[cfg(test)]
mod tests {
    use salvo::{
        http::header::AUTHORIZATION,
        test::{ResponseExt, TestClient},
    };
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, TEST_API_TOKEN};

    use super::*;

    fn service(mocks: Mocks) -> Service {
        Service::new(app_router(mocks.into_state()))
    }

    #[tokio::test]
    async fn test_healthcheck_is_public() {
        let res = TestClient::get("http://example.com/healthcheck")
            .send(&service(Mocks::default()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
    }

    #[tokio::test]
    async fn test_service_routes_require_token() {
        for (method, url) in [
            ("POST", "http://example.com/checkout"),
            ("GET", "http://example.com/users/user-1/orders"),
            ("PUT", "http://example.com/orders/ord-1/status"),
            ("POST", "http://example.com/newsletter/subscriptions"),
            ("PUT", "http://example.com/newsletter/tags/north-type"),
        ] {
            let request = match method {
                "POST" => TestClient::post(url),
                "PUT" => TestClient::put(url),
                _ => TestClient::get(url),
            };

            let res = request.send(&service(Mocks::default())).await;

            assert_eq!(
                res.status_code,
                Some(StatusCode::UNAUTHORIZED),
                "{method} {url} without a token"
            );
        }
    }

    #[tokio::test]
    async fn test_token_opens_service_routes() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .orders
            .expect_list_paid_orders()
            .once()
            .return_once(|_| Ok(Vec::new()));

        let mut res = TestClient::get("http://example.com/users/user-1/orders")
            .add_header(AUTHORIZATION, format!("Bearer {TEST_API_TOKEN}"), true)
            .send(&service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(res.take_string().await?, "[]");

        Ok(())
    }

    #[tokio::test]
    async fn test_openapi_document_lists_routes() -> TestResult {
        let document = TestClient::get("http://example.com/api-doc/openapi.json")
            .send(&service(Mocks::default()))
            .await
            .take_string()
            .await?;

        for path in [
            "/checkout",
            "/order/{order}",
            "/users/{user}/orders",
            "/webhooks/stripe",
        ] {
            assert!(document.contains(path), "expected {path} in openapi document");
        }

        Ok(())
    }
}
