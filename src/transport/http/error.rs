//! HTTP transport error handling
//!
//! Converts handler errors to JSON error bodies with matching status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// HTTP transport errors
#[derive(Debug, thiserror::Error)]
pub enum HttpTransportError {
    #[error("Static page unavailable: {0}")]
    StaticPage(#[source] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl HttpTransportError {
    /// Get HTTP status code for error
    pub fn status_code(&self) -> StatusCode {
        match self {
            HttpTransportError::StaticPage(err) if err.kind() == std::io::ErrorKind::NotFound => {
                StatusCode::NOT_FOUND
            }
            HttpTransportError::StaticPage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            HttpTransportError::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HttpTransportError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        tracing::error!(status = status.as_u16(), "Request failed: {}", self);

        let body = serde_json::json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for HTTP transport operations
pub type Result<T> = std::result::Result<T, HttpTransportError>;
