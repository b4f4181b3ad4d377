use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use thiserror::Error;

use codemasti_phonepe::PhonePeError;

/// API error taxonomy for the site's JSON endpoints.
///
/// Every failure renders as the `{ "success": false, "error": ... }`
/// envelope; the variant picks the status code. Provider error strings stay
/// inside the envelope message so the client can derive its own
/// `{title, message, suggestion}` rendering, but raw stack traces never
/// leave the server.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad or missing input (400). Never retried.
    #[error("{0}")]
    Validation(String),

    /// Duplicate registration email (409). Never retried.
    #[error("{0}")]
    Conflict(String),

    /// Continuation record gone, e.g. a re-finalized payment (404).
    #[error("{0}")]
    NotFound(String),

    /// Email, spreadsheet or gateway provider failure (500).
    #[error("{0}")]
    Upstream(String),

    /// Missing required environment secret (500), surfaced with a
    /// descriptive message rather than crashing the process.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Upstream(_) | Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = %status, "Request rejected");
        }

        (
            status,
            Json(serde_json::json!({
                "success": false,
                "error": self.to_string(),
            })),
        )
            .into_response()
    }
}

impl From<codemasti_core::Error> for ApiError {
    fn from(err: codemasti_core::Error) -> Self {
        use codemasti_core::Error as Core;
        match err {
            Core::Validation(msg) => Self::Validation(msg),
            Core::Conflict(msg) => Self::Conflict(msg),
            Core::Upstream(msg) => Self::Upstream(msg),
            Core::Config(msg) => Self::Config(msg),
        }
    }
}

impl From<PhonePeError> for ApiError {
    fn from(err: PhonePeError) -> Self {
        match err {
            PhonePeError::Config(msg) => Self::Config(msg),
            // Gateway message text passes through; the status code stays 500
            // because the failure is upstream, not the client's.
            other => Self::Upstream(other.to_string()),
        }
    }
}
