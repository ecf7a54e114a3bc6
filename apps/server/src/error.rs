//! Error types for the catalog search server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Malformed options yield an empty page upstream; there is no client-error arm.
        let status = match &self {
            Error::Database(sqlx::Error::PoolTimedOut) => StatusCode::SERVICE_UNAVAILABLE,
            Error::Database(_) | Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        tracing::error!(status = status.as_u16(), "Request failed: {}", self);
        let message = status
            .canonical_reason()
            .unwrap_or("Internal Server Error")
            .to_string();

        let body = Json(json!({
            "status": "error",
            "code": status.as_u16(),
            "message": message,
        }));

        (status, body).into_response()
    }
}
