//! `/api/session` routes.
//!
//! Every handler resolves the caller's session from the `grader_session` cookie
//! (issuing a new one when missing or unknown), locks it, and runs exactly one
//! controller operation. The lock is held across the grading or store call, so a
//! double-clicked action waits and then observes the cached result.

mod common;
mod delete;
mod get;
mod post;

use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub use self::common::SESSION_COOKIE;

/// Builds the `/session` route group.
///
/// # Routes
/// - `GET    /`         → current session view
/// - `DELETE /`         → start a new submission
/// - `POST   /submit`   → validate and hold answers
/// - `POST   /feedback` → grade the held answers (once)
/// - `POST   /save`     → persist graded answers (once)
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get::get_session).delete(delete::reset_session))
        .route("/submit", post(post::submit_answers))
        .route("/feedback", post(post::request_feedback))
        .route("/save", post(post::save_submission))
}
