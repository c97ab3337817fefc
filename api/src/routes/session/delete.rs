use super::common::resolve_session;
use crate::response::ApiResponse;
use crate::state::AppState;
use axum::{Json, extract::State, response::IntoResponse};
use axum_extra::extract::cookie::CookieJar;

/// DELETE /api/session
///
/// Explicit "new submission": discards the held answers and feedback and returns the
/// session to `unsubmitted`. Already saved records are untouched.
///
/// ### Response
/// - `200 OK` with the (now empty) session view, message `"Ready for a new submission"`.
pub async fn reset_session(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let (jar, session) = resolve_session(&state, jar).await;
    let mut session = session.lock().await;
    session.reset();
    (
        jar,
        Json(ApiResponse::success(
            session.view(),
            "Ready for a new submission",
        )),
    )
}
