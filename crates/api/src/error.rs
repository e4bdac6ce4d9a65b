use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use video2glb_gradio::backend::ReconstructionError;

/// Application-level error type for HTTP handlers.
///
/// Implements [`IntoResponse`] to produce consistent JSON error responses of
/// the form `{"error": "<message>", "code": "<CODE>"}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The request is malformed or missing required fields.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The request body exceeded the configured upload limit.
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// The reconstruction service failed or could not be reached.
    #[error(transparent)]
    Reconstruction(#[from] ReconstructionError),

    /// Reconstruction did not finish within the request budget (seconds).
    #[error("Reconstruction did not finish within {0}s")]
    Timeout(u64),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(err.body_text())
        } else {
            AppError::BadRequest(err.body_text())
        }
    }
}

impl From<MultipartRejection> for AppError {
    fn from(err: MultipartRejection) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(err.body_text())
        } else {
            AppError::BadRequest(err.body_text())
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::PayloadTooLarge(msg) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE", msg.clone())
            }
            AppError::Reconstruction(err) => {
                tracing::error!(error = %err, "Reconstruction failed");
                let code = match err {
                    ReconstructionError::Upstream(_) | ReconstructionError::Api(_) => {
                        "UPSTREAM_ERROR"
                    }
                    _ => "INTERNAL_ERROR",
                };
                (StatusCode::INTERNAL_SERVER_ERROR, code, err.to_string())
            }
            AppError::Timeout(_) => {
                tracing::error!(error = %self, "Reconstruction timed out");
                (StatusCode::INTERNAL_SERVER_ERROR, "UPSTREAM_TIMEOUT", self.to_string())
            }
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg.clone())
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
