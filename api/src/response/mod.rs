use axum::{Json, http::StatusCode, response::IntoResponse, response::Response};
use serde::Serialize;

/// JSON envelope used by every `/api` endpoint.
///
/// ```json
/// {
///   "success": true,
///   "data": { "status": "graded", "score": 2, ... },
///   "message": "Feedback ready"
/// }
/// ```
///
/// On failure `success` is `false`, `data` is the payload type's default (or the error
/// detail), and `message` is what the form shows inline.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub success: bool,
    pub data: T,
    pub message: String,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
        }
    }

    /// Error response carrying `T::default()` as data.
    pub fn error(message: impl Into<String>) -> Self
    where
        T: Default,
    {
        Self {
            success: false,
            data: T::default(),
            message: message.into(),
        }
    }

    /// Error response that still carries a payload (e.g. the failing field names).
    pub fn error_with(data: T, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data,
            message: message.into(),
        }
    }

    /// Pairs the envelope with a status code.
    pub fn with_status(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}
