//! HTTP span helpers.

#[derive(Debug, Clone)]
pub(super) struct RequestSpanName {
    pub(super) route: String,
    pub(super) otel_span_name: String,
}

pub(super) fn request_span_name(method: &str, path: &str) -> RequestSpanName {
    let route = route_template(path);
    let otel_span_name = format!("{method} {route}");

    RequestSpanName {
        route,
        otel_span_name,
    }
}

/// Replace caller-chosen path segments with their route parameter names so
/// metric labels stay bounded.
fn route_template(path: &str) -> String {
    let mut route = String::new();
    let mut previous = "";

    for segment in path.split('/').filter(|segment| !segment.is_empty()) {
        let templated = match previous {
            "order" | "orders" => "{order}",
            "users" => "{user}",
            "tags" => "{studio}",
            _ => segment,
        };

        route.push('/');
        route.push_str(templated);

        previous = segment;
    }

    if route.is_empty() {
        route.push('/');
    }

    route
}
