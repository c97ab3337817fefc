//! Per-session state machine.
//!
//! ```text
//! Unsubmitted --submit--> SubmittedOk --request_feedback--> Graded
//!      ^                                                       |
//!      +------------------------- reset ----------------------+
//! ```
//!
//! Every external call is guarded by the current state: grading runs only from
//! `SubmittedOk`, saving only from `Graded`, and each at most once per submission.
//! Re-reading the state (`view`) never reaches a collaborator.

use common::{Feedback, Submission, SubmissionForm, ValidationError};
use db::{PersistenceError, RecordId, SubmissionRecord, SubmissionStore};
use marker::traits::grader::ensure_complete;
use marker::{Grader, MarkerError, Rubric};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Grading(#[from] MarkerError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error("no submission yet; submit your answers first")]
    NotSubmitted,

    #[error("answers have not been graded yet")]
    NotGraded,

    #[error("this submission has already been graded; start a new submission to change answers")]
    AlreadyGraded,
}

/// Shared, read-only collaborators every session uses.
#[derive(Clone)]
pub struct GradingPipeline {
    grader: Arc<dyn Grader>,
    store: Arc<dyn SubmissionStore>,
    rubric: Arc<Rubric>,
}

impl GradingPipeline {
    pub fn new(
        grader: Arc<dyn Grader>,
        store: Arc<dyn SubmissionStore>,
        rubric: Arc<Rubric>,
    ) -> Self {
        Self {
            grader,
            store,
            rubric,
        }
    }

    pub fn rubric(&self) -> &Rubric {
        &self.rubric
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Unsubmitted,
    SubmittedOk {
        submission: Submission,
    },
    Graded {
        submission: Submission,
        feedback: Vec<Feedback>,
        saved: Option<RecordId>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Unsubmitted,
    Submitted,
    Graded,
}

/// What the page renders. Built from the state alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionView {
    pub status: SessionStatus,
    pub student_id: Option<String>,
    pub answers: Vec<String>,
    pub feedback: Vec<Feedback>,
    pub score: Option<u8>,
    pub record_id: Option<RecordId>,
}

pub struct SessionController {
    pipeline: GradingPipeline,
    state: SessionState,
}

impl SessionController {
    pub fn new(pipeline: GradingPipeline) -> Self {
        Self {
            pipeline,
            state: SessionState::Unsubmitted,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Validates the form and holds the resulting submission.
    ///
    /// Replaces an ungraded submission; refused once graded. A validation failure
    /// leaves the state untouched.
    pub fn submit(&mut self, form: &SubmissionForm) -> Result<(), SessionError> {
        if matches!(self.state, SessionState::Graded { .. }) {
            return Err(SessionError::AlreadyGraded);
        }

        let submission = form.collect().inspect_err(|err| {
            tracing::info!(fields = ?err.fields, "submission rejected by validation");
        })?;

        tracing::info!(student_id = submission.student_id(), "submission accepted");
        self.state = SessionState::SubmittedOk { submission };
        Ok(())
    }

    /// Grades the held submission, or returns the cached feedback if already graded.
    ///
    /// On failure the session stays in `SubmittedOk` so the student can retry.
    pub async fn request_feedback(&mut self) -> Result<&[Feedback], SessionError> {
        let submission = match &self.state {
            SessionState::Unsubmitted => return Err(SessionError::NotSubmitted),
            SessionState::SubmittedOk { submission } => submission.clone(),
            SessionState::Graded { .. } => {
                tracing::debug!("feedback already cached; not re-grading");
                return Ok(self.cached_feedback());
            }
        };

        let feedback = self
            .pipeline
            .grader
            .grade(&submission, &self.pipeline.rubric)
            .await?;
        ensure_complete(&feedback)?;

        tracing::info!(
            student_id = submission.student_id(),
            correct = feedback.iter().filter(|f| f.verdict.is_correct()).count(),
            "submission graded"
        );

        self.state = SessionState::Graded {
            submission,
            feedback,
            saved: None,
        };
        Ok(self.cached_feedback())
    }

    /// Persists the graded submission once. Later calls return the same id without
    /// touching the store. On failure the feedback stays available for a retry.
    pub async fn save(&mut self) -> Result<RecordId, SessionError> {
        let (submission, feedback) = match &self.state {
            SessionState::Unsubmitted | SessionState::SubmittedOk { .. } => {
                return Err(SessionError::NotGraded);
            }
            SessionState::Graded {
                saved: Some(id), ..
            } => return Ok(*id),
            SessionState::Graded {
                submission,
                feedback,
                saved: None,
            } => (submission, feedback),
        };

        let record = SubmissionRecord::new(submission, feedback)?;
        let id = self.pipeline.store.save(&record).await?;

        if let SessionState::Graded { saved, .. } = &mut self.state {
            *saved = Some(id);
        }
        Ok(id)
    }

    /// Explicit "new submission": the only way back to `Unsubmitted`.
    pub fn reset(&mut self) {
        tracing::debug!("session reset");
        self.state = SessionState::Unsubmitted;
    }

    pub fn view(&self) -> SessionView {
        match &self.state {
            SessionState::Unsubmitted => SessionView {
                status: SessionStatus::Unsubmitted,
                student_id: None,
                answers: Vec::new(),
                feedback: Vec::new(),
                score: None,
                record_id: None,
            },
            SessionState::SubmittedOk { submission } => SessionView {
                status: SessionStatus::Submitted,
                student_id: Some(submission.student_id().to_string()),
                answers: submission.answers().to_vec(),
                feedback: Vec::new(),
                score: None,
                record_id: None,
            },
            SessionState::Graded {
                submission,
                feedback,
                saved,
            } => SessionView {
                status: SessionStatus::Graded,
                student_id: Some(submission.student_id().to_string()),
                answers: submission.answers().to_vec(),
                feedback: feedback.clone(),
                score: Some(feedback.iter().filter(|f| f.verdict.is_correct()).count() as u8),
                record_id: *saved,
            },
        }
    }

    fn cached_feedback(&self) -> &[Feedback] {
        match &self.state {
            SessionState::Graded { feedback, .. } => feedback,
            _ => &[],
        }
    }
}
