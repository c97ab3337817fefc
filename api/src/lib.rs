//! HTTP surface for the answer grader: the form page, the session cookie and the
//! `/api` JSON routes.

pub mod middleware;
pub mod response;
pub mod routes;
pub mod startup;
pub mod state;

use axum::{Router, middleware::from_fn, routing::get};
use tower_http::cors::CorsLayer;

use crate::middleware::log_request;
use crate::routes::{page::index, routes};
use crate::state::AppState;

/// Builds the full application router: `/` serves the form page, `/api` the JSON routes.
pub fn app(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .nest("/api", routes(app_state))
        .layer(from_fn(log_request))
        .layer(CorsLayer::permissive())
}
