//! HTTP route entry point for `/api/...`.
//!
//! Route groups:
//! - `/health` → liveness check
//! - `/session` → the caller's grading session (submit, feedback, save, reset)
//!
//! The form page itself (`GET /`) lives in [`page`] and is mounted by [`crate::app`].

use crate::routes::{health::health_routes, session::session_routes};
use crate::state::AppState;
use axum::Router;

pub mod health;
pub mod page;
pub mod session;

/// Builds the `/api` router with state applied.
///
/// # Route Structure:
/// - `/health` → health check, no session involved.
/// - `/session` → session-scoped actions; a `grader_session` cookie is issued on first contact.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health_routes())
        .nest("/session", session_routes().with_state(app_state))
}
