use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use std::time::Instant;

use super::MetricsRegistry;

/// Middleware to collect console HTTP request metrics
pub async fn metrics_middleware(
    State(metrics): State<Arc<MetricsRegistry>>,
    req: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let endpoint = endpoint_label(req.uri().path());

    let response = next.run(req).await;

    let status = response.status().as_u16().to_string();
    metrics
        .http_requests_total
        .with_label_values(&[&method, &endpoint, &status])
        .inc();
    metrics
        .http_request_duration_seconds
        .with_label_values(&[&method, &endpoint])
        .observe(start.elapsed().as_secs_f64());

    response
}

/// Collapses the record id of `/users/{id}/...` so label cardinality stays
/// bounded by the route table.
fn endpoint_label(path: &str) -> String {
    let mut segments = path.split('/').filter(|s| !s.is_empty());
    match (segments.next(), segments.next()) {
        (Some("users"), Some(_)) => {
            let rest: Vec<&str> = segments.collect();
            if rest.is_empty() {
                "/users/:id".to_string()
            } else {
                format!("/users/:id/{}", rest.join("/"))
            }
        }
        _ => {
            let trimmed = path.trim_end_matches('/');
            if trimmed.is_empty() {
                "/".to_string()
            } else {
                trimmed.to_string()
            }
        }
    }
}
