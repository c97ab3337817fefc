use services::{GradingPipeline, SessionRegistry};
use std::time::Duration;

/// Shared state handed to every handler.
///
/// Cloning is cheap: the registry is reference-counted internally, and the grading
/// pipeline behind it holds the rubric, grader and store as `Arc`s.
#[derive(Clone)]
pub struct AppState {
    sessions: SessionRegistry,
}

impl AppState {
    pub fn with_session_ttl(pipeline: GradingPipeline, ttl: Duration) -> Self {
        Self {
            sessions: SessionRegistry::with_ttl(pipeline, ttl),
        }
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }
}
