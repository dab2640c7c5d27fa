//! Per-request span, access log and HTTP metrics.

mod spans;
mod traceparent;

use std::time::Instant;

use salvo::{
    Request, handler,
    http::{StatusCode, header::HeaderValue},
    prelude::{Depot, FlowCtrl, Response},
};
use tracing::Instrument as _;
use tracing::{error, info, warn};
use tracing_opentelemetry::OpenTelemetrySpanExt as _;
use uuid::Uuid;

use super::{init::request_settings, metrics};

const REQUEST_ID_HEADER: &str = "x-request-id";
const REQUEST_ID_DEPOT_KEY: &str = "request_id";

/// The caller's `x-request-id`, or a fresh UUIDv7 when it is absent or blank.
fn request_id(req: &Request) -> String {
    req.header::<String>(REQUEST_ID_HEADER)
        .filter(|supplied| !supplied.trim().is_empty())
        .unwrap_or_else(|| Uuid::now_v7().to_string())
}

#[handler]
pub(crate) async fn request_logging(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    if req.uri().path() == "/metrics" {
        ctrl.call_next(req, depot, res).await;
        return;
    }

    let started = Instant::now();

    let request_id = request_id(req);

    depot.insert(REQUEST_ID_DEPOT_KEY, request_id.clone());

    match HeaderValue::from_str(&request_id) {
        Ok(echoed) => {
            res.headers_mut().insert(REQUEST_ID_HEADER, echoed);
        }
        Err(source) => warn!(%request_id, "request id is not a valid header value: {source}"),
    }

    let method = req.method().to_string();
    let path = req.uri().path().to_owned();
    let remote_addr = req.remote_addr().to_string();
    let names = spans::request_span_name(&method, &path);
    let route = names.route;
    let otel_span_name = names.otel_span_name;
    let _in_flight_request = metrics::InFlightRequestGuard::track();

    let span = tracing::info_span!(
        parent: None,
        "http.request",
        otel.name = %otel_span_name,
        otel.kind = "server",
        request_id = %request_id,
        method = %method,
        route = %route,
        remote_addr = %remote_addr,
        status = tracing::field::Empty,
        duration_ms = tracing::field::Empty
    );

    let settings = request_settings();

    if settings.propagate_parent
        && let Some(parent_context) = traceparent::remote_parent(req.headers())
        && let Err(source) = span.set_parent(parent_context)
    {
        warn!("failed to set parent context on request span: {source}");
    }

    ctrl.call_next(req, depot, res)
        .instrument(span.clone())
        .await;

    let duration = started.elapsed();
    let status = res.status_code.unwrap_or(StatusCode::OK);
    let duration_ms = duration.as_millis();
    let threshold_ms = u128::from(settings.slow_request_threshold_ms);

    metrics::observe_request(&method, &route, status.as_u16(), duration.as_secs_f64());

    span.record("status", status.as_u16());
    span.record("duration_ms", duration_ms);

    span.in_scope(|| {
        info!(status = status.as_u16(), duration_ms, "request.completed");

        if status.is_server_error() {
            error!(
                status = status.as_u16(),
                method = %method,
                path = %path,
                request_id = %request_id,
                "server error response"
            );
        } else if status.is_client_error() {
            warn!(
                status = status.as_u16(),
                method = %method,
                path = %path,
                request_id = %request_id,
                "client error response"
            );
        }

        if duration_ms > threshold_ms {
            warn!(
                method = %method,
                path = %path,
                request_id = %request_id,
                duration_ms,
                threshold_ms,
                "slow request detected"
            );
        }
    });
}

#[cfg(test)]
mod tests {
    use salvo::{
        Router, Service,
        test::{ResponseExt, TestClient},
    };
    use testresult::TestResult;

    use super::*;

    #[handler]
    async fn ok() -> &'static str {
        "ok"
    }

    fn service() -> Service {
        Service::new(
            Router::new()
                .hoop(request_logging)
                .push(Router::with_path("healthcheck").get(ok)),
        )
    }

    fn echoed_id(res: &Response) -> Option<String> {
        res.headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    }

    #[tokio::test]
    async fn request_id_is_echoed() -> TestResult {
        let mut res = TestClient::get("http://example.com/healthcheck")
            .add_header(REQUEST_ID_HEADER, "req-42", true)
            .send(&service())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(echoed_id(&res).as_deref(), Some("req-42"));
        assert_eq!(res.take_string().await?, "ok");

        Ok(())
    }

    #[tokio::test]
    async fn missing_request_id_is_generated() -> TestResult {
        let res = TestClient::get("http://example.com/healthcheck")
            .send(&service())
            .await;

        let generated = echoed_id(&res).ok_or("expected a generated request id")?;

        assert!(Uuid::parse_str(&generated).is_ok(), "got {generated}");

        Ok(())
    }

    #[tokio::test]
    async fn blank_request_id_is_replaced() -> TestResult {
        let res = TestClient::get("http://example.com/healthcheck")
            .add_header(REQUEST_ID_HEADER, "   ", true)
            .send(&service())
            .await;

        let generated = echoed_id(&res).ok_or("expected a generated request id")?;

        assert!(Uuid::parse_str(&generated).is_ok(), "got {generated}");

        Ok(())
    }
}
