//! Request ID middleware

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::Span;
use uuid::Uuid;

const REQUEST_ID: &str = "x-request-id";
const CORRELATION_ID: &str = "x-correlation-id";
const MAX_CLIENT_ID_LEN: usize = 128;

/// Tags every request with a fresh `x-request-id`.
///
/// An acceptable client `x-request-id` comes back as `x-correlation-id` so
/// callers can tie their own logs to ours.
#[tracing::instrument(
    name = "http_request",
    skip_all,
    fields(
        http.method = %req.method(),
        http.route = %req.uri().path(),
        http.response.status_code = tracing::field::Empty,
        request_id = tracing::field::Empty,
        correlation_id = tracing::field::Empty,
    )
)]
pub async fn request_id_middleware(req: Request, next: Next) -> Response {
    let span = Span::current();
    let started = Instant::now();

    let request_id = Uuid::new_v4().to_string();
    span.record("request_id", request_id.as_str());

    let correlation = client_request_id(req.headers());
    if let Some(id) = correlation.as_deref() {
        span.record("correlation_id", id);
    }

    let mut response = next.run(req).await;

    let status = response.status().as_u16();
    span.record("http.response.status_code", status);
    tracing::debug!(
        status,
        duration_ms = started.elapsed().as_millis() as u64,
        "Request completed"
    );

    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        headers.insert(REQUEST_ID, value);
    }
    if let Some(value) = correlation.and_then(|id| HeaderValue::from_str(&id).ok()) {
        headers.insert(CORRELATION_ID, value);
    }

    response
}

/// Client-supplied id, if it is short printable ASCII.
fn client_request_id(headers: &HeaderMap) -> Option<String> {
    let id = headers.get(REQUEST_ID)?.to_str().ok()?.trim();
    let acceptable = !id.is_empty()
        && id.len() <= MAX_CLIENT_ID_LEN
        && id.bytes().all(|b| b.is_ascii_graphic());
    acceptable.then(|| id.to_string())
}
