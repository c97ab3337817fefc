//! Session-level orchestration: the per-user state machine that decides when the
//! grading and persistence collaborators may be called.

pub mod session;
pub mod session_registry;

pub use session::{
    GradingPipeline, SessionController, SessionError, SessionState, SessionStatus, SessionView,
};
pub use session_registry::{DEFAULT_SESSION_TTL, SessionRegistry};
