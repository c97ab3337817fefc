use crate::response::ApiResponse;
use crate::state::AppState;
use axum::{http::StatusCode, response::Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use db::PersistenceError;
use marker::MarkerError;
use serde::Serialize;
use services::SessionError;
use services::session_registry::SessionHandle;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "grader_session";

/// Error payload: the form fields to highlight, if any.
#[derive(Debug, Default, Serialize)]
pub struct ErrorData {
    pub fields: Vec<String>,
}

/// Finds the caller's session, adding a fresh cookie to `jar` when a new one was made.
pub async fn resolve_session(state: &AppState, jar: CookieJar) -> (CookieJar, SessionHandle) {
    let requested = jar
        .get(SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok());

    let (id, handle) = state.sessions().get_or_create(requested).await;
    if requested == Some(id) {
        return (jar, handle);
    }

    let cookie = Cookie::build((SESSION_COOKIE, id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    (jar.add(cookie), handle)
}

pub fn status_for(err: &SessionError) -> StatusCode {
    match err {
        SessionError::Validation(_) => StatusCode::BAD_REQUEST,
        SessionError::NotSubmitted | SessionError::NotGraded | SessionError::AlreadyGraded => {
            StatusCode::CONFLICT
        }
        SessionError::Grading(MarkerError::MissingRubricEntry(_) | MarkerError::Config(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        SessionError::Grading(_) => StatusCode::BAD_GATEWAY,
        SessionError::Persistence(PersistenceError::InvalidRecord(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        SessionError::Persistence(_) => StatusCode::BAD_GATEWAY,
    }
}

/// Maps a controller error to the envelope the form renders inline.
pub fn error_response(err: SessionError) -> Response {
    let status = status_for(&err);
    if status.is_server_error() {
        tracing::error!(error = %err, status = status.as_u16(), "session action failed");
    } else {
        tracing::info!(error = %err, status = status.as_u16(), "session action refused");
    }

    let (fields, message) = match err {
        SessionError::Validation(v) => (v.fields, v.message),
        SessionError::Grading(e) => (Vec::new(), format!("Could not get feedback: {e}")),
        SessionError::Persistence(e) => (Vec::new(), format!("Could not save: {e}")),
        other => (Vec::new(), other.to_string()),
    };

    ApiResponse::error_with(ErrorData { fields }, message).with_status(status)
}
