use crate::response::ApiResponse;
use axum::{Json, Router, response::IntoResponse, routing::get};
use serde::Serialize;
use util::config;

#[derive(Debug, Serialize)]
struct HealthStatus {
    status: &'static str,
    service: String,
}

/// Builds the `/health` route group.
pub fn health_routes() -> Router {
    Router::new().route("/", get(health_check))
}

/// GET /api/health
///
/// Liveness check. Touches neither the grading service nor the submission store.
///
/// ### Response
/// - `200 OK`
///
/// ```json
/// {
///   "success": true,
///   "data": { "status": "OK", "service": "answer-grader" },
///   "message": "Health check passed"
/// }
/// ```
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::success(
        HealthStatus {
            status: "OK",
            service: config::project_name(),
        },
        "Health check passed",
    ))
}
