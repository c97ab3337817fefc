//!
//! # Grader Trait
//!
//! A [`Grader`] turns a validated [`Submission`] into one [`Feedback`] per question.
//! Implementations must preserve question-number ordering and fail as a whole when any
//! single question fails; no partial result is ever returned.
//!

use crate::error::MarkerError;
use crate::rubric::Rubric;
use async_trait::async_trait;
use common::{Feedback, Submission};

#[async_trait]
pub trait Grader: Send + Sync {
    async fn grade(
        &self,
        submission: &Submission,
        rubric: &Rubric,
    ) -> Result<Vec<Feedback>, MarkerError>;
}

/// Checks that `feedback` holds exactly one entry per answer, numbered `1..=3` in order.
pub fn ensure_complete(feedback: &[Feedback]) -> Result<(), MarkerError> {
    match common::sequence_error(feedback) {
        Some(reason) => Err(MarkerError::IncompleteFeedback(reason)),
        None => Ok(()),
    }
}
