//! # Marker Library
//!
//! Grades free-text answers against teacher-authored rubrics.
//!
//! ## Key Concepts
//! - **Rubric**: the read-only question → guideline mapping loaded at startup.
//! - **Grader**: the pluggable grading strategy; [`feedback::ai_feedback::LlmGrader`]
//!   asks a chat-completions model one question at a time.
//! - **Verdict parser**: turns raw model output into a [`common::Feedback`] or fails.

pub mod error;
pub mod feedback;
pub mod parsers;
pub mod rubric;
pub mod traits;

pub use error::MarkerError;
pub use feedback::ai_feedback::{GradingConfig, LlmGrader};
pub use rubric::{Rubric, RubricEntry, RubricError};
pub use traits::grader::Grader;
