use super::common::resolve_session;
use crate::response::ApiResponse;
use crate::state::AppState;
use axum::{Json, extract::State, response::IntoResponse};
use axum_extra::extract::cookie::CookieJar;

/// GET /api/session
///
/// Returns the caller's current session so the page can re-render after a reload.
/// Never calls the grading service or the store.
///
/// ### Response
/// - `200 OK`
/// ```json
/// {
///   "success": true,
///   "data": {
///     "status": "graded",
///     "student_id": "20230101",
///     "answers": ["...", "...", "..."],
///     "feedback": [{ "question_number": 1, "verdict": "correct", "explanation": "..." }],
///     "score": 1,
///     "record_id": null
///   },
///   "message": "Session retrieved"
/// }
/// ```
pub async fn get_session(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let (jar, session) = resolve_session(&state, jar).await;
    let view = session.lock().await.view();
    (jar, Json(ApiResponse::success(view, "Session retrieved")))
}
