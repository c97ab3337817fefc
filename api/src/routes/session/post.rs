use super::common::{ErrorData, error_response, resolve_session};
use crate::response::ApiResponse;
use crate::state::AppState;
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use common::SubmissionForm;

/// POST /api/session/submit
///
/// Validates the four form fields and holds the trimmed answers in the session.
/// No external call is made.
///
/// ### Request Body
/// ```json
/// {
///   "student_id": "20230101",
///   "answer_1": "...",
///   "answer_2": "...",
///   "answer_3": "..."
/// }
/// ```
/// Missing fields count as blank.
///
/// ### Responses
/// - `200 OK`: session view with status `"submitted"`.
/// - `400 Bad Request`: a field is blank; `data.fields` lists every blank field.
/// ```json
/// {
///   "success": false,
///   "data": { "fields": ["student_id"] },
///   "message": "Student ID is required"
/// }
/// ```
/// - `409 Conflict`: the session is already graded; reset it first.
/// - `400`/`415`/`422`: the body is not a JSON object of strings, or is not sent as
///   `application/json`. The usual envelope is returned with `data.fields` empty.
pub async fn submit_answers(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<SubmissionForm>, JsonRejection>,
) -> (CookieJar, Response) {
    let (jar, session) = resolve_session(&state, jar).await;

    let Json(form) = match payload {
        Ok(form) => form,
        Err(rejection) => {
            tracing::debug!(status = %rejection.status(), "submit body rejected");
            let response = ApiResponse::error_with(ErrorData::default(), rejection.body_text())
                .with_status(rejection.status());
            return (jar, response);
        }
    };

    let mut session = session.lock().await;

    let response = match session.submit(&form) {
        Ok(()) => Json(ApiResponse::success(session.view(), "Answers submitted")).into_response(),
        Err(err) => error_response(err),
    };
    (jar, response)
}

/// POST /api/session/feedback
///
/// Grades the held answers, one request per question. A graded session returns its
/// cached feedback without calling the grading service again.
///
/// ### Responses
/// - `200 OK`: session view with status `"graded"`, three feedback entries and the score.
/// - `409 Conflict`: nothing has been submitted yet.
/// - `502 Bad Gateway`: the grading service failed or replied with something unparsable.
///   The answers stay submitted and the request can be retried.
pub async fn request_feedback(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Response) {
    let (jar, session) = resolve_session(&state, jar).await;
    let mut session = session.lock().await;

    let graded = session.request_feedback().await.map(|_| ());
    let response = match graded {
        Ok(()) => Json(ApiResponse::success(session.view(), "Feedback ready")).into_response(),
        Err(err) => error_response(err),
    };
    (jar, response)
}

/// POST /api/session/save
///
/// Stores the graded submission as one new row. Saving again returns the same
/// `record_id` without writing a second row.
///
/// ### Responses
/// - `201 Created`: session view with `record_id` set.
/// - `409 Conflict`: the session has not been graded.
/// - `502 Bad Gateway`: the store could not be reached or refused the insert. The
///   feedback stays visible and the request can be retried.
pub async fn save_submission(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Response) {
    let (jar, session) = resolve_session(&state, jar).await;
    let mut session = session.lock().await;

    let saved = session.save().await;
    let response = match saved {
        Ok(_) => ApiResponse::success(session.view(), "Submission saved")
            .with_status(StatusCode::CREATED),
        Err(err) => error_response(err),
    };
    (jar, response)
}
