//! Download Link Handler

use foundry::orders::OrderId;
use foundry_app::domain::downloads::DownloadDenied;
use salvo::{
    oapi::extract::{PathParam, QueryParam},
    prelude::*,
};

use crate::{
    extensions::*,
    observability::{DownloadOutcome, record_download},
    orders::models::OrderResponse,
};

const DENIED: &str = "Order not found or link expired";

/// Download Link Handler
///
/// Exchanges an order id and its download token for the order and its files.
/// Every failed lookup gets the same 404.
#[endpoint(
    tags("downloads"),
    summary = "Resolve Download Link",
    responses(
        (status_code = StatusCode::OK, description = "Order with downloadable files"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found or link expired"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<String>,
    token: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.state()?;
    let token = token.into_inner().unwrap_or_default();

    match state
        .app
        .downloads
        .resolve(OrderId::from(order.into_inner()), token)
        .await
    {
        Ok(order) => {
            record_download(DownloadOutcome::Granted);

            Ok(Json(
                OrderResponse::new(order, &state.currency).or_500("failed to format order total")?,
            ))
        }
        Err(DownloadDenied) => {
            record_download(DownloadOutcome::Denied);

            Err(StatusError::not_found().brief(DENIED))
        }
    }
}

#[cfg(test)]
mod tests {
    use foundry::orders::OrderStatus;
    use foundry_app::domain::downloads::MockDownloadsService;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, make_order};

    use super::*;

    fn make_service(downloads: MockDownloadsService) -> Service {
        Mocks {
            downloads,
            ..Mocks::default()
        }
        .service(Router::with_path("order/{order}").get(handler))
    }

    fn denying() -> MockDownloadsService {
        let mut downloads = MockDownloadsService::new();

        downloads
            .expect_resolve()
            .once()
            .return_once(|_, _| Err(DownloadDenied));

        downloads
    }

    #[tokio::test]
    async fn test_matching_token_returns_order() -> TestResult {
        let order = make_order("ord-1", OrderStatus::Paid)?;

        let mut downloads = MockDownloadsService::new();

        downloads
            .expect_resolve()
            .once()
            .withf(|order, token| order.as_str() == "ord-1" && token == "tok-1")
            .return_once(move |_, _| Ok(order));

        let mut res = TestClient::get("http://example.com/order/ord-1?token=tok-1")
            .send(&make_service(downloads))
            .await;

        let body: OrderResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.id, "ord-1");
        assert_eq!(
            body.items.first().map(|item| item.sales_file_urls.clone()),
            Some(vec!["https://files.example/regular.zip".to_string()])
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_token_is_denied() {
        let mut downloads = MockDownloadsService::new();

        downloads
            .expect_resolve()
            .once()
            .withf(|_, token| token.is_empty())
            .return_once(|_, _| Err(DownloadDenied));

        let res = TestClient::get("http://example.com/order/ord-1")
            .send(&make_service(downloads))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn test_denials_are_indistinguishable() -> TestResult {
        let mut wrong_token = TestClient::get("http://example.com/order/ord-1?token=nope")
            .send(&make_service(denying()))
            .await;

        let mut unknown_order = TestClient::get("http://example.com/order/ord-404?token=tok-1")
            .send(&make_service(denying()))
            .await;

        assert_eq!(wrong_token.status_code, Some(StatusCode::NOT_FOUND));
        assert_eq!(unknown_order.status_code, Some(StatusCode::NOT_FOUND));

        let wrong_token = wrong_token.take_string().await?;

        assert!(wrong_token.contains(DENIED), "got {wrong_token}");
        assert_eq!(wrong_token, unknown_order.take_string().await?);

        Ok(())
    }
}
