//! HTTP request metrics

use crate::metrics::{
    sanitize_path, HTTP_REQUESTS_IN_FLIGHT, HTTP_REQUESTS_TOTAL, HTTP_REQUEST_DURATION_SECONDS,
};
use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

/// Holds one slot of the in-flight gauge; released on drop, including when
/// the client goes away mid-request.
struct InFlight {
    labels: [String; 2],
}

impl InFlight {
    fn enter(method: &str, path: &str) -> Self {
        let labels = [method.to_string(), path.to_string()];
        HTTP_REQUESTS_IN_FLIGHT
            .with_label_values(&[&labels[0], &labels[1]])
            .inc();
        Self { labels }
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        HTTP_REQUESTS_IN_FLIGHT
            .with_label_values(&[&self.labels[0], &self.labels[1]])
            .dec();
    }
}

pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = req.method().as_str().to_string();
    let path = sanitize_path(req.uri().path());
    let _slot = InFlight::enter(&method, &path);

    let response = next.run(req).await;

    let status = response.status().as_u16().to_string();
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[&method, &path, &status])
        .inc();
    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[&method, &path])
        .observe(started.elapsed().as_secs_f64());

    response
}
