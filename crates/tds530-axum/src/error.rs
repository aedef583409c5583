//! Axum-specific error types and mappings.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Message of the `/v1/` reply before the first sample.
pub const NO_DATA_MESSAGE: &str = "No data available";

/// Axum-specific error type.
#[derive(Debug, Error)]
pub enum HttpError {
    /// No sample has been received yet.
    ///
    /// The body is `{"error": "No data available"}` with no status field,
    /// which is what existing `/v1/` consumers parse.
    #[error("No data available")]
    NoData,

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<u16>,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, message, with_status) = match self {
            Self::NoData => (
                StatusCode::SERVICE_UNAVAILABLE,
                NO_DATA_MESSAGE.to_string(),
                false,
            ),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg, true),
        };

        let body = ErrorBody {
            error: message,
            status: with_status.then_some(status.as_u16()),
        };

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(err: HttpError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_no_data_body_has_only_error_field() {
        let (status, json) = body_json(HttpError::NoData).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json, serde_json::json!({"error": "No data available"}));
    }

    #[tokio::test]
    async fn test_not_found_includes_status() {
        let (status, json) = body_json(HttpError::NotFound("/nope".to_string())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "/nope");
        assert_eq!(json["status"], 404);
    }
}
