//! Prometheus scrape endpoint

use crate::{Error, Result};
use axum::{http::header, response::IntoResponse};
use prometheus::{Encoder, TextEncoder};

/// Everything registered with the default registry, in text exposition format.
pub async fn export() -> Result<impl IntoResponse> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder
        .encode(&prometheus::gather(), &mut buffer)
        .map_err(|e| Error::Internal(format!("encode metrics: {e}")))?;

    Ok(([(header::CONTENT_TYPE, encoder.format_type().to_string())], buffer))
}
